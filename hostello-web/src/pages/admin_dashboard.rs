use crate::app::use_session;
use crate::components::{Loading, StatCard};
use shared::fetch::Liveness;
use shared::models::AdminStats;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_icons::IconId;

/// Administrator landing page.
#[function_component(AdminDashboardPage)]
pub fn admin_dashboard_page() -> Html {
    let handle = use_session();
    let stats = use_state(|| None::<AdminStats>);

    {
        let stats = stats.clone();
        use_effect_with((), move |()| {
            let liveness = Liveness::new();
            let alive = liveness.clone();
            spawn_local(async move {
                let loaded = handle.client().admin_stats().await;
                if alive.is_alive() {
                    stats.set(Some(loaded));
                }
            });
            move || liveness.retire()
        });
    }

    let Some(stats) = (*stats).clone() else {
        return html! { <Loading label="Loading dashboard" /> };
    };

    html! {
        <div class="p-4 space-y-6">
            <h1 class="text-2xl font-bold">{"Admin Dashboard"}</h1>
            <div class="stats stats-vertical lg:stats-horizontal shadow w-full">
                <StatCard
                    title="Total users"
                    value={stats.total_users.to_string()}
                    icon={IconId::HeroiconsOutlineUsers}
                />
                <StatCard
                    title="Students"
                    value={stats.total_students.to_string()}
                    icon={IconId::HeroiconsOutlineAcademicCap}
                />
                <StatCard
                    title="Notifications"
                    value={stats.total_notifications.to_string()}
                    icon={IconId::HeroiconsOutlineBell}
                />
                <StatCard
                    title="System status"
                    value={stats.system_status.to_string()}
                    icon={IconId::HeroiconsOutlineServerStack}
                    description="Backend reachability"
                />
            </div>
        </div>
    }
}
