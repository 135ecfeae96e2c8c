use crate::{
    app::use_session, components::notification_badge::NotificationBadge,
    models::app_state::AppState, routes::MainRoute,
};
use shared::models::Role;
use tracing::info;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_icons::{Icon, IconId};
use yew_router::prelude::{Link, use_navigator};
use yewdux::prelude::{use_dispatch, use_selector};

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub current_route: MainRoute,
}

fn nav_routes(role: Option<Role>) -> Vec<(MainRoute, &'static str)> {
    match role {
        Some(Role::Admin) => vec![(MainRoute::AdminDashboard, "Dashboard")],
        Some(Role::Rector) => vec![(MainRoute::RectorDashboard, "Dashboard")],
        Some(Role::Student) => vec![
            (MainRoute::StudentDashboard, "Dashboard"),
            (MainRoute::StudentNotifications, "Notifications"),
        ],
        None => Vec::new(),
    }
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let handle = use_session();
    let dispatch = use_dispatch::<AppState>();
    let navigator = use_navigator();
    let session = use_selector(|state: &AppState| state.session.clone());
    let role = session.role();

    let on_logout = Callback::from(move |_: MouseEvent| {
        let handle = handle.clone();
        let dispatch = dispatch.clone();
        let navigator = navigator.clone();
        spawn_local(async move {
            handle.manager().logout().await;
            handle.publish(&dispatch);
            info!("logged out");
            if let Some(navigator) = navigator {
                navigator.push(&MainRoute::Login);
            }
        });
    });

    let links = nav_routes(role)
        .into_iter()
        .map(|(route, label)| {
            let active = route == props.current_route;
            html! {
                <li>
                    <Link<MainRoute> to={route} classes={classes!(active.then_some("menu-active"))}>
                        {label}
                    </Link<MainRoute>>
                </li>
            }
        })
        .collect::<Html>();

    html! {
        <nav class="navbar justify-between bg-base-300">
            <Link<MainRoute> to={MainRoute::Home} classes="btn btn-ghost text-lg">
                <Icon icon_id={IconId::HeroiconsSolidBuildingOffice2} class="w-6 h-6" />
                {"Hostello"}
            </Link<MainRoute>>
            <ul class="menu menu-horizontal">{links}</ul>
            <div class="flex items-center gap-2">
                {
                    session.user.as_ref().map_or_else(Html::default, |user| html! {
                        <>
                            if role == Some(Role::Student) {
                                <NotificationBadge user_id={user.user_id.clone()} />
                            }
                            <span class="text-sm text-base-content/80">{ user.display_name() }</span>
                        </>
                    })
                }
                <button class="btn btn-ghost btn-sm" onclick={on_logout}>
                    <Icon icon_id={IconId::HeroiconsOutlineArrowRightOnRectangle} class="w-5 h-5" />
                    {"Logout"}
                </button>
            </div>
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn students_get_the_notifications_link() {
        let routes: Vec<MainRoute> = nav_routes(Some(Role::Student))
            .into_iter()
            .map(|(route, _)| route)
            .collect();
        assert_eq!(
            routes,
            vec![MainRoute::StudentDashboard, MainRoute::StudentNotifications]
        );
        assert!(nav_routes(None).is_empty());
    }
}
