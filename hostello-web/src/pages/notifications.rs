use crate::{
    api::HostelloClient,
    app::use_session,
    components::{Banner, Loading, Notice, sound},
    config::FrontendConfig,
    models::app_state::AppState,
};
use chrono::NaiveDate;
use shared::fetch::Liveness;
use shared::models::{ApiError, DisplayedNotification, RecordId, Role};
use shared::notifications::{
    Arrival, FetchMode, NotificationCenter, NotificationQuery, Pager, ReadAck, ReadFilter, Selection,
};
use std::rc::Rc;
use tracing::{debug, info};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_hooks::use_interval;
use yew_icons::{Icon, IconId};
use yewdux::prelude::use_selector;

type Center = Rc<NotificationCenter<HostelloClient>>;

fn mark_all_notice(failed: usize) -> Notice {
    match failed {
        0 => Notice::success("All notifications marked as read."),
        1 => Notice::error("1 notification could not be marked as read on the server."),
        count => Notice::error(format!(
            "{count} notifications could not be marked as read on the server."
        )),
    }
}

fn deleted_notice(count: usize) -> Notice {
    match count {
        1 => Notice::success("Notification deleted."),
        count => Notice::success(format!("{count} notifications deleted.")),
    }
}

/// Apply `edit` to the query and go back to the first page.
fn set_query(
    query: &UseStateHandle<NotificationQuery>,
    pager: &UseStateHandle<Pager>,
    edit: impl FnOnce(&mut NotificationQuery),
) {
    let mut next = (**query).clone();
    edit(&mut next);
    query.set(next);
    let mut first = **pager;
    first.reset();
    pager.set(first);
}

/// Banner text for a finished poll; nothing once the page is gone.
fn poll_announcement(alive: &Liveness, polled: &Result<Option<Arrival>, ApiError>) -> Option<String> {
    if !alive.is_alive() {
        return None;
    }
    match polled {
        Ok(Some(arrival)) => arrival.announcement(),
        _ => None,
    }
}

fn parse_filter(value: &str) -> ReadFilter {
    match value {
        "unread" => ReadFilter::Unread,
        "read" => ReadFilter::Read,
        _ => ReadFilter::All,
    }
}

#[derive(Properties, PartialEq)]
struct RowProps {
    item: DisplayedNotification,
    selected: bool,
    on_toggle: Callback<RecordId>,
    on_read: Callback<RecordId>,
    on_delete: Callback<RecordId>,
}

#[function_component(NotificationRow)]
fn notification_row(props: &RowProps) -> Html {
    let record = &props.item.record;
    let id = props.item.id().clone();
    let toggle = {
        let id = id.clone();
        props.on_toggle.reform(move |_: Event| id.clone())
    };
    let read = {
        let id = id.clone();
        props.on_read.reform(move |_: MouseEvent| id.clone())
    };
    let delete = props.on_delete.reform(move |_: MouseEvent| id.clone());

    html! {
        <tr class={classes!((!props.item.read).then_some("font-semibold"))}>
            <td>
                <input type="checkbox" class="checkbox checkbox-sm" checked={props.selected} onchange={toggle} />
            </td>
            <td>
                <div>{ record.title.clone() }</div>
                <div class="text-sm font-normal text-base-content/70">{ record.message.clone() }</div>
            </td>
            <td>{ record.sent_on().map(|day| day.to_string()).unwrap_or_default() }</td>
            <td>
                <span class={classes!("badge", "badge-sm", record.is_high_priority().then_some("badge-error"))}>
                    { record.priority.clone() }
                </span>
            </td>
            <td class="flex gap-1">
                if !props.item.read {
                    <button class="btn btn-ghost btn-xs" title="Mark as read" onclick={read}>
                        <Icon icon_id={IconId::HeroiconsOutlineCheck} class="w-4 h-4" />
                    </button>
                }
                <button class="btn btn-ghost btn-xs text-error" title="Delete" onclick={delete}>
                    <Icon icon_id={IconId::HeroiconsOutlineTrash} class="w-4 h-4" />
                </button>
            </td>
        </tr>
    }
}

/// Full notification list for students: filters, paging, read marks and deletion.
#[function_component(NotificationsPage)]
pub fn notifications_page() -> Html {
    let handle = use_session();
    let user_id = use_selector(|state: &AppState| {
        state.session.user.as_ref().map(|user| user.user_id.clone())
    });
    let config = use_memo((), |_| FrontendConfig::new());
    let center: Center = {
        let client = handle.client().clone();
        use_memo((*user_id).clone(), move |user_id| {
            let credentials = client.credentials().clone();
            NotificationCenter::new(client, Role::Student, credentials, user_id.clone())
        })
    };

    let refresh_view = use_force_update();
    let loading = use_state(|| true);
    let notice = use_state(|| None::<Notice>);
    let query = use_state(NotificationQuery::default);
    let pager = use_state(Pager::default);
    let selection = use_state(Selection::default);
    // Tasks spawned from callbacks check this before touching component state.
    let mounted = use_memo((), |_| Liveness::new());

    {
        let mounted = mounted.clone();
        use_effect_with((), move |_| move || mounted.retire());
    }

    {
        let center = center.clone();
        let loading = loading.clone();
        let notice = notice.clone();
        let refresh_view = refresh_view.clone();
        use_effect_with((*user_id).clone(), move |_| {
            let liveness = Liveness::new();
            let alive = liveness.clone();
            spawn_local(async move {
                let result = center.refresh(FetchMode::Loud).await;
                if !alive.is_alive() {
                    return;
                }
                if let Err(error) = result {
                    notice.set(Some(Notice::error(error.message)));
                }
                loading.set(false);
                refresh_view.force_update();
            });
            move || liveness.retire()
        });
    }

    {
        let center = center.clone();
        let notice = notice.clone();
        let refresh_view = refresh_view.clone();
        let mounted = mounted.clone();
        use_interval(
            move || {
                let center = center.clone();
                let notice = notice.clone();
                let refresh_view = refresh_view.clone();
                let alive = (*mounted).clone();
                spawn_local(async move {
                    let polled = center.refresh(FetchMode::Silent).await;
                    if !alive.is_alive() {
                        debug!("dropping poll result after unmount");
                        return;
                    }
                    if let Some(message) = poll_announcement(&alive, &polled) {
                        info!(%message, "notifications arrived");
                        notice.set(Some(Notice::announcement(message)));
                        sound::play_alert();
                    }
                    refresh_view.force_update();
                });
            },
            config.poll_interval_millis(),
        );
    }

    let on_read = {
        let center = center.clone();
        let refresh_view = refresh_view.clone();
        let mounted = mounted.clone();
        Callback::from(move |id: RecordId| {
            let center = center.clone();
            let refresh_view = refresh_view.clone();
            let alive = (*mounted).clone();
            spawn_local(async move {
                if center.mark_as_read(&id).await == ReadAck::LocalOnly {
                    debug!(id = %id, "read mark kept on this device only");
                }
                if alive.is_alive() {
                    refresh_view.force_update();
                }
            });
        })
    };

    let on_read_all = {
        let center = center.clone();
        let notice = notice.clone();
        let refresh_view = refresh_view.clone();
        let mounted = mounted.clone();
        Callback::from(move |_: MouseEvent| {
            let center = center.clone();
            let notice = notice.clone();
            let refresh_view = refresh_view.clone();
            let alive = (*mounted).clone();
            spawn_local(async move {
                let failed = center.mark_all_as_read().await;
                if !alive.is_alive() {
                    return;
                }
                notice.set(Some(mark_all_notice(failed)));
                refresh_view.force_update();
            });
        })
    };

    let on_delete = {
        let center = center.clone();
        let notice = notice.clone();
        let selection = selection.clone();
        let refresh_view = refresh_view.clone();
        let mounted = mounted.clone();
        Callback::from(move |id: RecordId| {
            let center = center.clone();
            let notice = notice.clone();
            let selection = selection.clone();
            let refresh_view = refresh_view.clone();
            let alive = (*mounted).clone();
            spawn_local(async move {
                let deleted = center.delete(&id).await;
                if !alive.is_alive() {
                    return;
                }
                match deleted {
                    Ok(()) => {
                        if selection.contains(&id) {
                            let mut next = (*selection).clone();
                            next.toggle(&id);
                            selection.set(next);
                        }
                        notice.set(Some(deleted_notice(1)));
                    }
                    Err(error) => notice.set(Some(Notice::error(error.message))),
                }
                refresh_view.force_update();
            });
        })
    };

    let on_delete_selected = {
        let center = center.clone();
        let notice = notice.clone();
        let selection = selection.clone();
        let refresh_view = refresh_view.clone();
        Callback::from(move |_: MouseEvent| {
            let ids = selection.ids();
            if ids.is_empty() {
                return;
            }
            let center = center.clone();
            let notice = notice.clone();
            let selection = selection.clone();
            let refresh_view = refresh_view.clone();
            let alive = (*mounted).clone();
            spawn_local(async move {
                let deleted = center.delete_many(&ids).await;
                if !alive.is_alive() {
                    return;
                }
                match deleted {
                    Ok(()) => {
                        selection.set(Selection::default());
                        notice.set(Some(deleted_notice(ids.len())));
                    }
                    Err(error) => notice.set(Some(Notice::error(error.message))),
                }
                refresh_view.force_update();
            });
        })
    };

    let on_toggle = {
        let selection = selection.clone();
        Callback::from(move |id: RecordId| {
            let mut next = (*selection).clone();
            next.toggle(&id);
            selection.set(next);
        })
    };

    let on_filter = {
        let query = query.clone();
        let pager = pager.clone();
        Callback::from(move |event: Event| {
            let value = event
                .target_dyn_into::<HtmlSelectElement>()
                .map(|select| select.value())
                .unwrap_or_default();
            set_query(&query, &pager, |query| query.read = parse_filter(&value));
        })
    };
    let on_search = {
        let query = query.clone();
        let pager = pager.clone();
        Callback::from(move |event: InputEvent| {
            let value = event
                .target_dyn_into::<HtmlInputElement>()
                .map(|input| input.value())
                .unwrap_or_default();
            set_query(&query, &pager, |query| query.search = value);
        })
    };
    let on_date = {
        let query = query.clone();
        let pager = pager.clone();
        Callback::from(move |event: Event| {
            let date = event
                .target_dyn_into::<HtmlInputElement>()
                .and_then(|input| NaiveDate::parse_from_str(&input.value(), "%Y-%m-%d").ok());
            set_query(&query, &pager, |query| query.date = date);
        })
    };

    let dismiss = {
        let notice = notice.clone();
        Callback::from(move |()| notice.set(None))
    };

    if *loading {
        return html! { <Loading label="Loading notifications" /> };
    }

    let filtered = query.apply(&center.displayed());
    let total_pages = pager.total_pages(filtered.len());
    // Deletions can leave the cursor past the last page.
    let mut current = *pager;
    if current.page() > total_pages {
        current.go_to(total_pages, filtered.len());
    }
    let rows = current.slice(&filtered).to_vec();
    let unread = center.unread_count();

    let on_toggle_page = {
        let selection = selection.clone();
        let rows = rows.clone();
        Callback::from(move |_: Event| {
            let mut next = (*selection).clone();
            next.toggle_all(&rows);
            selection.set(next);
        })
    };
    let page_selected = !rows.is_empty() && rows.iter().all(|item| selection.contains(item.id()));

    let go_to = |target: usize| {
        let pager = pager.clone();
        let len = filtered.len();
        Callback::from(move |_: MouseEvent| {
            let mut next = current;
            if next.go_to(target, len) {
                pager.set(next);
            }
        })
    };
    let page = current.page();

    html! {
        <div class="p-4 space-y-4">
            <div class="flex flex-wrap items-center justify-between gap-2">
                <h1 class="text-2xl font-bold">
                    {"Notifications"}
                    if unread > 0 {
                        <span class="badge badge-primary ml-2">{ format!("{unread} unread") }</span>
                    }
                </h1>
                <div class="flex gap-2">
                    <button class="btn btn-sm" disabled={unread == 0} onclick={on_read_all}>
                        {"Mark all as read"}
                    </button>
                    <button class="btn btn-sm btn-error" disabled={selection.is_empty()} onclick={on_delete_selected}>
                        { format!("Delete selected ({})", selection.len()) }
                    </button>
                </div>
            </div>

            <Banner notice={(*notice).clone()} on_dismiss={dismiss} />

            <div class="flex flex-wrap gap-2">
                <select class="select select-bordered select-sm" onchange={on_filter}>
                    <option value="all" selected={query.read == ReadFilter::All}>{"All"}</option>
                    <option value="unread" selected={query.read == ReadFilter::Unread}>{"Unread"}</option>
                    <option value="read" selected={query.read == ReadFilter::Read}>{"Read"}</option>
                </select>
                <input
                    type="search"
                    class="input input-bordered input-sm"
                    placeholder="Search notifications"
                    value={query.search.clone()}
                    oninput={on_search}
                />
                <input
                    type="date"
                    class="input input-bordered input-sm"
                    value={query.date.map(|date| date.format("%Y-%m-%d").to_string()).unwrap_or_default()}
                    onchange={on_date}
                />
            </div>

            if filtered.is_empty() {
                <p class="text-base-content/70">{"No notifications match."}</p>
            } else {
                <table class="table">
                    <thead>
                        <tr>
                            <th>
                                <input type="checkbox" class="checkbox checkbox-sm" checked={page_selected} onchange={on_toggle_page} />
                            </th>
                            <th>{"Notification"}</th>
                            <th>{"Date"}</th>
                            <th>{"Priority"}</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        { for rows.iter().map(|item| html! {
                            <NotificationRow
                                key={item.id().to_string()}
                                item={item.clone()}
                                selected={selection.contains(item.id())}
                                on_toggle={on_toggle.clone()}
                                on_read={on_read.clone()}
                                on_delete={on_delete.clone()}
                            />
                        }) }
                    </tbody>
                </table>
                <div class="join">
                    <button class="join-item btn btn-sm" disabled={page <= 1} onclick={go_to(page.saturating_sub(1))}>{"«"}</button>
                    <button class="join-item btn btn-sm">{ format!("Page {page} of {total_pages}") }</button>
                    <button class="join-item btn btn-sm" disabled={page >= total_pages} onclick={go_to(page + 1)}>{"»"}</button>
                </div>
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn grown_list() -> Arrival {
        Arrival {
            previous: Some(1),
            current: 2,
        }
    }

    #[test]
    fn poll_announces_growth_while_mounted() {
        let alive = Liveness::new();
        assert_eq!(
            poll_announcement(&alive, &Ok(Some(grown_list()))).as_deref(),
            Some("1 new notification received!")
        );
        assert_eq!(poll_announcement(&alive, &Ok(None)), None);
    }

    #[test]
    fn poll_after_unmount_stays_quiet() {
        let alive = Liveness::new();
        alive.retire();
        assert_eq!(poll_announcement(&alive, &Ok(Some(grown_list()))), None);
    }

    #[test]
    fn mark_all_reports_server_failures() {
        assert_eq!(mark_all_notice(0).kind, crate::components::BannerKind::Success);
        assert_eq!(
            mark_all_notice(1).message,
            "1 notification could not be marked as read on the server."
        );
        assert_eq!(
            mark_all_notice(3).message,
            "3 notifications could not be marked as read on the server."
        );
    }

    #[test]
    fn deletion_messages_count_rows() {
        assert_eq!(deleted_notice(1).message, "Notification deleted.");
        assert_eq!(deleted_notice(4).message, "4 notifications deleted.");
    }

    #[test_case("unread", ReadFilter::Unread)]
    #[test_case("read", ReadFilter::Read)]
    #[test_case("all", ReadFilter::All)]
    #[test_case("bogus", ReadFilter::All)]
    fn filter_values(value: &str, expected: ReadFilter) {
        assert_eq!(parse_filter(value), expected);
    }
}
