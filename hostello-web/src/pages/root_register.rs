use crate::{
    app::use_session,
    components::{Banner, Loading, Notice, bind_input},
    routes::{LoginNotice, MainRoute},
};
use serde_json::Value;
use shared::fetch::Liveness;
use shared::session::RootAdminBackend;
use shared::validation::validate_root_admin;
use tracing::{info, warn};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

const REGISTERED_MESSAGE: &str = "Root admin registered successfully!";

/// Message the backend attached to a successful registration, if any.
fn registration_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .unwrap_or(REGISTERED_MESSAGE)
        .to_string()
}

/// First-run registration of the root administrator.
///
/// Only reachable while no root admin exists; otherwise (or when the check
/// fails) the visitor is sent to the login page.
#[function_component(RootRegisterPage)]
pub fn root_register_page() -> Html {
    let handle = use_session();
    let navigator = use_navigator();
    let checking = use_state(|| true);

    let username = use_state(String::new);
    let mobile_number = use_state(String::new);
    let password = use_state(String::new);
    let confirm_password = use_state(String::new);
    let notice = use_state(|| None::<Notice>);
    let submitting = use_state(|| false);

    {
        let handle = handle.clone();
        let navigator = navigator.clone();
        let checking = checking.clone();
        use_effect_with((), move |()| {
            let liveness = Liveness::new();
            let alive = liveness.clone();
            spawn_local(async move {
                let exists = handle.client().root_admin_exists().await;
                if !alive.is_alive() {
                    return;
                }
                match exists {
                    Ok(false) => checking.set(false),
                    Ok(true) => {
                        info!("root admin already registered");
                        if let Some(navigator) = navigator {
                            navigator.replace(&MainRoute::Login);
                        }
                    }
                    Err(error) => {
                        warn!(error = %error, "system status check failed");
                        if let Some(navigator) = navigator {
                            navigator.replace(&MainRoute::Login);
                        }
                    }
                }
            });
            move || liveness.retire()
        });
    }

    let onsubmit = {
        let username = username.clone();
        let mobile_number = mobile_number.clone();
        let password = password.clone();
        let confirm_password = confirm_password.clone();
        let notice = notice.clone();
        let submitting = submitting.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *submitting {
                return;
            }
            let request =
                match validate_root_admin(&username, &mobile_number, &password, &confirm_password) {
                    Ok(request) => request,
                    Err(error) => {
                        notice.set(Some(Notice::error(error.to_string())));
                        return;
                    }
                };
            submitting.set(true);
            notice.set(None);

            let handle = handle.clone();
            let navigator = navigator.clone();
            let notice = notice.clone();
            let submitting = submitting.clone();
            spawn_local(async move {
                let result = handle.client().register_root_admin(&request).await;
                submitting.set(false);
                match result {
                    Ok(body) => {
                        info!(username = %request.username, "root admin registered");
                        if let Some(navigator) = navigator {
                            navigator.replace_with_state(
                                &MainRoute::Login,
                                LoginNotice(registration_message(&body)),
                            );
                        }
                    }
                    Err(error) => {
                        warn!(error = %error, "root admin registration failed");
                        notice.set(Some(Notice::error(error.message)));
                    }
                }
            });
        })
    };

    if *checking {
        return html! { <Loading label="Checking system status..." /> };
    }

    let dismiss = {
        let notice = notice.clone();
        Callback::from(move |()| notice.set(None))
    };
    let is_busy = *submitting;

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" {onsubmit}>
                    <h2 class="card-title text-2xl">{"Register Root Admin"}</h2>
                    <p class="text-sm text-base-content/70">
                        {"No administrator exists yet. Create the first account to finish setup."}
                    </p>
                    <Banner notice={(*notice).clone()} on_dismiss={dismiss} />
                    <div class="form-control">
                        <label class="label" for="username">
                            <span class="label-text">{"Username"}</span>
                        </label>
                        <input
                            id="username"
                            class="input input-bordered"
                            type="text"
                            value={(*username).clone()}
                            oninput={bind_input(&username)}
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="mobile">
                            <span class="label-text">{"Mobile number"}</span>
                        </label>
                        <input
                            id="mobile"
                            class="input input-bordered"
                            type="tel"
                            value={(*mobile_number).clone()}
                            oninput={bind_input(&mobile_number)}
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
                            autocomplete="new-password"
                            value={(*password).clone()}
                            oninput={bind_input(&password)}
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="confirm-password">
                            <span class="label-text">{"Confirm password"}</span>
                        </label>
                        <input
                            id="confirm-password"
                            class="input input-bordered"
                            type="password"
                            autocomplete="new-password"
                            value={(*confirm_password).clone()}
                            oninput={bind_input(&confirm_password)}
                        />
                    </div>
                    <div class="form-control mt-6 gap-2">
                        <button class="btn btn-primary" type="submit" disabled={is_busy}>
                            {if is_busy { "Registering..." } else { "Register" }}
                        </button>
                        <Link<MainRoute> to={MainRoute::Login} classes="btn btn-ghost btn-sm">
                            {"Back to login"}
                        </Link<MainRoute>>
                    </div>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_message_wins_over_default() {
        assert_eq!(
            registration_message(&json!({ "message": "Root admin created" })),
            "Root admin created"
        );
        assert_eq!(registration_message(&json!({ "message": "" })), REGISTERED_MESSAGE);
        assert_eq!(registration_message(&json!(null)), REGISTERED_MESSAGE);
    }
}
