use shared::bootstrap::{self, BootstrapDecision};
use shared::fetch::Liveness;
use tracing::debug;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

use crate::app::use_session;
use crate::components::Loading;
use crate::models::app_state::AppState;
use crate::routes::MainRoute;

fn go(navigator: Option<&Navigator>, decision: BootstrapDecision) {
    let (Some(navigator), Some(path)) = (navigator, decision.path()) else {
        return;
    };
    debug!(path, "bootstrap redirect");
    navigator.replace(&MainRoute::for_path(path));
}

/// Entry point for `/` and unknown paths: sends the visitor to their
/// dashboard, the login page, or first-run registration.
#[function_component(HomeRedirect)]
pub fn home_redirect() -> Html {
    let handle = use_session();
    let navigator = use_navigator();
    let session = use_selector(|state: &AppState| state.session.clone());

    use_effect_with((*session).clone(), move |session| {
        let liveness = Liveness::new();
        match bootstrap::immediate(session) {
            Some(decision) => go(navigator.as_ref(), decision),
            None => {
                let session = session.clone();
                let liveness = liveness.clone();
                spawn_local(async move {
                    if let Some(decision) =
                        bootstrap::resolve(&session, handle.client(), &liveness).await
                    {
                        go(navigator.as_ref(), decision);
                    }
                });
            }
        }
        move || liveness.retire()
    });

    html! { <Loading label="Loading" /> }
}
