use crate::app::use_session;
use crate::components::{Loading, StatCard};
use chrono::{Local, NaiveDate};
use serde_json::Value;
use shared::fetch::{Liveness, RequestGeneration};
use shared::models::{OutingStudent, RectorStats};
use tracing::debug;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_icons::IconId;

fn room_label(room: Option<&Value>) -> String {
    match room {
        Some(Value::String(room)) => room.clone(),
        Some(Value::Number(room)) => room.to_string(),
        _ => "-".to_string(),
    }
}

fn outing_row(student: &OutingStudent) -> Html {
    let log = &student.log;
    html! {
        <tr>
            <td>{ log.student_name.clone().unwrap_or_default() }</td>
            <td>{ log.prn.clone().unwrap_or_default() }</td>
            <td>{ room_label(student.room_no.as_ref()) }</td>
            <td>{ log.entry_time.clone().or_else(|| log.out_time.clone()).unwrap_or_default() }</td>
        </tr>
    }
}

/// Rector landing page: who is out on the chosen day, pending complaints, room usage.
#[function_component(RectorDashboardPage)]
pub fn rector_dashboard_page() -> Html {
    let handle = use_session();
    let day = use_state(|| Local::now().date_naive());
    let stats = use_state(|| None::<RectorStats>);
    let generation = use_memo((), |_| RequestGeneration::new());

    {
        let stats = stats.clone();
        let generation = generation.clone();
        use_effect_with(*day, move |day| {
            let day = *day;
            let liveness = Liveness::new();
            let alive = liveness.clone();
            let ticket = generation.issue();
            spawn_local(async move {
                let loaded = handle.client().rector_stats(day).await;
                if !alive.is_alive() || !generation.is_current(ticket) {
                    debug!(%day, "dropping stale rector statistics");
                    return;
                }
                stats.set(Some(loaded));
            });
            move || liveness.retire()
        });
    }

    let on_day_change = {
        let day = day.clone();
        Callback::from(move |event: Event| {
            let Some(input) = event.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            if let Ok(picked) = NaiveDate::parse_from_str(&input.value(), "%Y-%m-%d") {
                day.set(picked);
            }
        })
    };

    let Some(stats) = (*stats).clone() else {
        return html! { <Loading label="Loading dashboard" /> };
    };

    html! {
        <div class="p-4 space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-4">
                <h1 class="text-2xl font-bold">{"Rector Dashboard"}</h1>
                <input
                    type="date"
                    class="input input-bordered input-sm"
                    value={day.format("%Y-%m-%d").to_string()}
                    onchange={on_day_change}
                />
            </div>
            <div class="stats stats-vertical lg:stats-horizontal shadow w-full">
                <StatCard
                    title="Students out"
                    value={stats.students_out.len().to_string()}
                    icon={IconId::HeroiconsOutlineArrowRightOnRectangle}
                />
                <StatCard
                    title="Pending complaints"
                    value={stats.pending_complaints.len().to_string()}
                    icon={IconId::HeroiconsOutlineExclamationTriangle}
                />
                <StatCard
                    title="Rooms"
                    value={stats.total_rooms.to_string()}
                    icon={IconId::HeroiconsOutlineHome}
                />
                <StatCard
                    title="Active allocations"
                    value={stats.active_allocations.to_string()}
                    icon={IconId::HeroiconsOutlineKey}
                />
            </div>

            <div class="card bg-base-200 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title">{"Students currently out"}</h2>
                    if stats.students_out.is_empty() {
                        <p class="text-base-content/70">{"Everyone is in."}</p>
                    } else {
                        <table class="table table-zebra">
                            <thead>
                                <tr>
                                    <th>{"Name"}</th>
                                    <th>{"PRN"}</th>
                                    <th>{"Room"}</th>
                                    <th>{"Left at"}</th>
                                </tr>
                            </thead>
                            <tbody>
                                { for stats.students_out.iter().map(outing_row) }
                            </tbody>
                        </table>
                    }
                </div>
            </div>

            <div class="card bg-base-200 shadow-xl">
                <div class="card-body">
                    <h2 class="card-title">{"Pending complaints"}</h2>
                    if stats.pending_complaints.is_empty() {
                        <p class="text-base-content/70">{"No pending complaints."}</p>
                    } else {
                        <ul class="list">
                            { for stats.pending_complaints.iter().map(|complaint| html! {
                                <li class="list-row">
                                    <span class="font-semibold">
                                        { complaint.title.clone().unwrap_or_else(|| "Complaint".to_string()) }
                                    </span>
                                    <span class="text-sm text-base-content/70">
                                        { complaint.description.clone().unwrap_or_default() }
                                    </span>
                                </li>
                            }) }
                        </ul>
                    }
                </div>
            </div>
        </div>
    }
}
