use shared::guard::{GuardDecision, guard};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

use crate::components::Loading;
use crate::models::app_state::AppState;
use crate::routes::{LoginOrigin, MainRoute};

#[derive(Properties, PartialEq)]
pub struct ProtectedRouteProps {
    pub route: MainRoute,
    pub children: Children,
}

/// Renders its children only when the route guard admits the current session.
#[function_component(ProtectedRoute)]
pub fn protected_route(props: &ProtectedRouteProps) -> Html {
    let session = use_selector(|state: &AppState| state.session.clone());
    let location = props.route.to_path();

    match guard(&session, props.route.allowed_roles(), &location) {
        GuardDecision::Wait => html! { <Loading label="Checking session" /> },
        GuardDecision::RedirectToLogin { from } => html! { <LoginRedirect {from} /> },
        GuardDecision::RedirectTo(path) => {
            html! { <Redirect<MainRoute> to={MainRoute::for_path(path)} /> }
        }
        GuardDecision::Render => html! { <>{ props.children.clone() }</> },
    }
}

#[derive(Properties, PartialEq)]
struct LoginRedirectProps {
    from: Option<String>,
}

/// Replaces the current entry with the login page, remembering where the visitor came from.
#[function_component(LoginRedirect)]
fn login_redirect(props: &LoginRedirectProps) -> Html {
    let navigator = use_navigator();

    use_effect_with(props.from.clone(), move |from| {
        if let Some(navigator) = navigator {
            match from {
                Some(path) => {
                    navigator.replace_with_state(&MainRoute::Login, LoginOrigin(path.clone()));
                }
                None => navigator.replace(&MainRoute::Login),
            }
        }
        || ()
    });

    html! {}
}
