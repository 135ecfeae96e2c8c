use crate::app::use_session;
use crate::components::{Loading, StatCard};
use crate::models::app_state::AppState;
use crate::routes::MainRoute;
use shared::fetch::Liveness;
use shared::models::{DisplayedNotification, Profile, StudentOverview};
use shared::notifications::merge;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_icons::IconId;
use yew_router::prelude::Link;
use yewdux::prelude::use_selector;

fn profile_field(profile: &Profile, key: &str) -> Option<String> {
    profile.extra.get(key).and_then(|value| match value {
        serde_json::Value::String(text) if !text.is_empty() => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn recent_item(item: &DisplayedNotification) -> Html {
    let record = &item.record;
    html! {
        <li class={classes!("list-row", (!item.read).then_some("font-semibold"))}>
            <div>
                <div>{ record.title.clone() }</div>
                <div class="text-xs text-base-content/60">
                    { record.sent_on().map(|day| day.to_string()).unwrap_or_default() }
                </div>
            </div>
            if record.is_high_priority() {
                <span class="badge badge-error badge-sm">{ record.priority.clone() }</span>
            }
        </li>
    }
}

/// Student landing page: profile summary and the latest notifications.
#[function_component(StudentDashboardPage)]
pub fn student_dashboard_page() -> Html {
    let handle = use_session();
    let user_id = use_selector(|state: &AppState| {
        state.session.user.as_ref().map(|user| user.user_id.clone())
    });
    let overview = use_state(|| None::<StudentOverview>);

    {
        let overview = overview.clone();
        let client = handle.client().clone();
        use_effect_with((), move |()| {
            let liveness = Liveness::new();
            let alive = liveness.clone();
            spawn_local(async move {
                let loaded = client.student_overview().await;
                if alive.is_alive() {
                    overview.set(Some(loaded));
                }
            });
            move || liveness.retire()
        });
    }

    let Some(overview) = (*overview).clone() else {
        return html! { <Loading label="Loading dashboard" /> };
    };

    let read = user_id
        .as_deref()
        .map(|user_id| handle.client().credentials().read_notification_ids(user_id))
        .unwrap_or_default();
    let recent = merge(&overview.recent, &read);
    let unread = recent.iter().filter(|item| !item.read).count();

    let (name, room) = overview.profile.as_ref().map_or((None, None), |profile| {
        (
            profile.first_name.clone().or_else(|| profile.username.clone()),
            profile_field(profile, "roomNo"),
        )
    });

    html! {
        <div class="p-4 space-y-6">
            <h1 class="text-2xl font-bold">
                { format!("Welcome, {}", name.unwrap_or_else(|| "Student".to_string())) }
            </h1>
            <div class="stats stats-vertical lg:stats-horizontal shadow w-full">
                <StatCard
                    title="Room"
                    value={room.unwrap_or_else(|| "Not allotted".to_string())}
                    icon={IconId::HeroiconsOutlineHome}
                />
                <StatCard
                    title="Unread notifications"
                    value={unread.to_string()}
                    icon={IconId::HeroiconsOutlineBell}
                    description="Among the latest"
                />
            </div>
            <div class="card bg-base-200 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title">{"Recent notifications"}</h2>
                    if recent.is_empty() {
                        <p class="text-base-content/70">{"No notifications yet."}</p>
                    } else {
                        <ul class="list">{ for recent.iter().map(recent_item) }</ul>
                    }
                    <div class="card-actions justify-end">
                        <Link<MainRoute> to={MainRoute::StudentNotifications} classes="btn btn-primary btn-sm">
                            {"View all"}
                        </Link<MainRoute>>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_profile_fields_accept_numbers_and_text() {
        let profile: Profile =
            serde_json::from_value(json!({ "role": "STUDENT", "roomNo": 204, "hostel": "" }))
                .unwrap();
        assert_eq!(profile_field(&profile, "roomNo").as_deref(), Some("204"));
        assert_eq!(profile_field(&profile, "hostel"), None);
        assert_eq!(profile_field(&profile, "missing"), None);
    }
}
