use crate::{
    app::use_session,
    components::{Banner, Notice, bind_input},
    models::app_state::AppState,
    routes::{LoginNotice, LoginOrigin, MainRoute},
};
use shared::guard::post_login_target;
use shared::validation::validate_login;
use tracing::info;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{use_dispatch, use_selector};

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let handle = use_session();
    let dispatch = use_dispatch::<AppState>();
    let navigator = use_navigator();
    let location = use_location();
    let session = use_selector(|state: &AppState| state.session.clone());

    let origin = location
        .as_ref()
        .and_then(|location| location.state::<LoginOrigin>())
        .map(|origin| origin.0.clone());
    let arrival_notice = location
        .as_ref()
        .and_then(|location| location.state::<LoginNotice>())
        .map(|notice| Notice::success(notice.0.clone()));

    let username = use_state(String::new);
    let password = use_state(String::new);
    let notice = use_state(move || arrival_notice);
    let loading = use_state(|| false);

    if session.is_authenticated {
        let target = post_login_target(session.role(), None);
        return html! { <Redirect<MainRoute> to={MainRoute::for_path(&target)} /> };
    }

    let onsubmit = {
        let username = username.clone();
        let password = password.clone();
        let notice = notice.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *loading {
                return;
            }
            let credentials = match validate_login(&username, &password) {
                Ok(credentials) => credentials,
                Err(error) => {
                    notice.set(Some(Notice::error(error.to_string())));
                    return;
                }
            };
            loading.set(true);
            notice.set(None);

            let handle = handle.clone();
            let dispatch = dispatch.clone();
            let navigator = navigator.clone();
            let origin = origin.clone();
            let notice = notice.clone();
            let loading = loading.clone();
            spawn_local(async move {
                let result = handle.manager().login(&credentials).await;
                handle.publish(&dispatch);
                loading.set(false);
                match result {
                    Ok(outcome) => {
                        let target = post_login_target(outcome.role, origin.as_deref());
                        info!(target = %target, "signed in");
                        if let Some(navigator) = navigator {
                            navigator.replace(&MainRoute::for_path(&target));
                        }
                    }
                    Err(error) => notice.set(Some(Notice::error(error.login_message()))),
                }
            });
        })
    };

    let dismiss = {
        let notice = notice.clone();
        Callback::from(move |()| notice.set(None))
    };

    let is_busy = *loading;

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" {onsubmit}>
                    <h2 class="card-title text-2xl">{"Sign in to Hostello"}</h2>
                    <Banner notice={(*notice).clone()} on_dismiss={dismiss} />
                    <div class="form-control">
                        <label class="label" for="username">
                            <span class="label-text">{"Username or PRN"}</span>
                        </label>
                        <input
                            id="username"
                            class="input input-bordered"
                            type="text"
                            autocomplete="username"
                            value={(*username).clone()}
                            oninput={bind_input(&username)}
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="password">
                            <span class="label-text">{"Password"}</span>
                        </label>
                        <input
                            id="password"
                            class="input input-bordered"
                            type="password"
                            autocomplete="current-password"
                            value={(*password).clone()}
                            oninput={bind_input(&password)}
                        />
                    </div>
                    <div class="form-control mt-6 gap-2">
                        <button class="btn btn-primary" type="submit" disabled={is_busy}>
                            {if is_busy { "Signing in..." } else { "Sign in" }}
                        </button>
                        <Link<MainRoute> to={MainRoute::RootRegister} classes="btn btn-ghost btn-sm">
                            {"Register Root Admin"}
                        </Link<MainRoute>>
                    </div>
                </form>
            </div>
        </div>
    }
}
