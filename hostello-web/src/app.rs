use crate::api::HostelloClient;
use crate::models::app_state::{AppState, SessionHandle};
use crate::routes::{self, MainRoute};
use shared::models::ApiError;
use shared::session::{AuthCheck, AuthRecovery};
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_dispatch;

/// The session manager from context.
///
/// # Panics
/// Outside of [`App`], which provides the context.
#[hook]
pub fn use_session() -> SessionHandle {
    require_session(use_context::<SessionHandle>())
}

fn require_session(context: Option<SessionHandle>) -> SessionHandle {
    context.expect("SessionHandle context is provided by App")
}

/// Runs the startup authentication check once, and ends the session when a
/// protected call comes back 401/403. Invalidated sessions go to the login page.
#[function_component(SessionStartup)]
fn session_startup() -> Html {
    let handle = use_session();
    let dispatch = use_dispatch::<AppState>();
    let navigator = use_navigator();

    {
        let handle = handle.clone();
        let dispatch = dispatch.clone();
        let navigator = navigator.clone();
        use_effect_with((), move |_| {
            let client = handle.client().clone();
            client.on_unauthorized(Some(Callback::from(move |error: ApiError| {
                let handle = handle.clone();
                let dispatch = dispatch.clone();
                let navigator = navigator.clone();
                spawn_local(async move {
                    let recovery = handle.manager().recover_from_auth_failure(&error).await;
                    handle.publish(&dispatch);
                    if recovery == AuthRecovery::Expired {
                        info!("session ended by the server");
                        if let Some(navigator) = navigator {
                            navigator.replace(&MainRoute::Login);
                        }
                    }
                });
            })));
            move || client.on_unauthorized(None)
        });
    }

    use_effect_with((), move |_| {
        spawn_local(async move {
            let check = handle.manager().check_auth_status().await;
            handle.publish(&dispatch);
            if let AuthCheck::Invalidated(error) = check {
                warn!(error = %error, "stored session rejected");
                if let Some(navigator) = navigator {
                    navigator.replace(&MainRoute::Login);
                }
            }
        });
        || ()
    });

    html! {}
}

#[function_component(App)]
pub fn app() -> Html {
    let handle = use_memo((), |_| SessionHandle::new(HostelloClient::shared()));

    html! {
        <ContextProvider<SessionHandle> context={(*handle).clone()}>
            <BrowserRouter>
                <SessionStartup />
                <Switch<MainRoute> render={routes::switch} />
            </BrowserRouter>
        </ContextProvider<SessionHandle>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "SessionHandle context is provided by App")]
    fn missing_session_context_is_fatal() {
        let _ = require_session(None);
    }
}
