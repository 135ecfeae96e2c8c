use shared::fetch::Liveness;
use shared::models::Role;
use shared::notifications::{FetchMode, NotificationCenter};
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_hooks::use_interval;
use yew_icons::{Icon, IconId};
use yew_router::prelude::Link;

use crate::api::HostelloClient;
use crate::app::use_session;
use crate::config::FrontendConfig;
use crate::routes::MainRoute;

#[derive(Properties, PartialEq)]
pub struct NotificationBadgeProps {
    pub user_id: AttrValue,
}

/// Bell icon with the student's unread count, kept fresh by silent polling.
#[function_component(NotificationBadge)]
pub fn notification_badge(props: &NotificationBadgeProps) -> Html {
    let handle = use_session();
    let unread = use_state_eq(|| 0usize);
    let config = use_memo((), |_| FrontendConfig::new());
    let mounted = use_memo((), |_| Liveness::new());

    {
        let mounted = mounted.clone();
        use_effect_with((), move |_| move || mounted.retire());
    }

    let center = {
        let client = handle.client().clone();
        use_memo(props.user_id.clone(), move |user_id| {
            let credentials = client.credentials().clone();
            NotificationCenter::new(client, Role::Student, credentials, Some(user_id.to_string()))
        })
    };

    let poll = {
        let center = center.clone();
        let unread = unread.clone();
        Callback::from(move |mode: FetchMode| {
            let center: Rc<NotificationCenter<HostelloClient>> = center.clone();
            let unread = unread.clone();
            let alive = (*mounted).clone();
            spawn_local(async move {
                if let Err(error) = center.refresh(mode).await {
                    debug!(error = %error, "unread badge refresh failed");
                }
                if alive.is_alive() {
                    unread.set(center.unread_count());
                }
            });
        })
    };

    {
        let poll = poll.clone();
        use_effect_with(props.user_id.clone(), move |_| {
            poll.emit(FetchMode::Silent);
            || ()
        });
    }
    use_interval(move || poll.emit(FetchMode::Silent), config.poll_interval_millis());

    html! {
        <Link<MainRoute> to={MainRoute::StudentNotifications} classes="btn btn-ghost btn-circle">
            <div class="indicator">
                <Icon icon_id={IconId::HeroiconsOutlineBell} class="w-6 h-6" />
                if *unread > 0 {
                    <span class="badge badge-sm badge-error indicator-item">{ *unread }</span>
                }
            </div>
        </Link<MainRoute>>
    }
}
