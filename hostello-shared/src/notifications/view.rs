//! Filtering, paging and selection for the notification list.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::{DisplayedNotification, RecordId};

/// Rows per page of the notification list.
pub const PAGE_SIZE: usize = 10;

/// Read-state filter of the notification list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadFilter {
    /// Every notification.
    #[default]
    All,
    /// Unread ones only.
    Unread,
    /// Read ones only.
    Read,
}

impl ReadFilter {
    /// Whether an item with this read state passes.
    #[must_use]
    pub fn admits(self, read: bool) -> bool {
        match self {
            Self::All => true,
            Self::Unread => !read,
            Self::Read => read,
        }
    }
}

/// Filters applied to the list before paging.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationQuery {
    /// Read-state filter.
    pub read: ReadFilter,
    /// Case-insensitive substring of the title or message; blank matches everything.
    pub search: String,
    /// Only notifications sent on this day.
    pub date: Option<NaiveDate>,
}

impl NotificationQuery {
    /// Whether `item` passes every filter.
    #[must_use]
    pub fn matches(&self, item: &DisplayedNotification) -> bool {
        if !self.read.admits(item.read) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty()
            && !item.record.title.to_lowercase().contains(&needle)
            && !item.record.message.to_lowercase().contains(&needle)
        {
            return false;
        }
        self.date
            .is_none_or(|date| item.record.sent_on() == Some(date))
    }

    /// Items passing every filter, order kept.
    #[must_use]
    pub fn apply(&self, items: &[DisplayedNotification]) -> Vec<DisplayedNotification> {
        items.iter().filter(|item| self.matches(item)).cloned().collect()
    }
}

/// One-based page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    per_page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl Pager {
    /// Cursor on page one; `per_page` is at least one.
    #[must_use]
    pub fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
        }
    }

    /// Current page, one-based.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Pages needed for `len` rows; an empty list still has one page.
    #[must_use]
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.per_page).max(1)
    }

    /// Move to `page`. Requests outside `1..=total_pages` are ignored.
    pub fn go_to(&mut self, page: usize, len: usize) -> bool {
        if page == 0 || page > self.total_pages(len) {
            return false;
        }
        self.page = page;
        true
    }

    /// Back to the first page, e.g. after the filter changed.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Rows of the current page.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.page - 1).saturating_mul(self.per_page).min(items.len());
        let end = start.saturating_add(self.per_page).min(items.len());
        &items[start..end]
    }
}

/// Ids picked for bulk actions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection(BTreeSet<RecordId>);

impl Selection {
    /// Flip membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: &RecordId) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.clone());
            true
        }
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.0.contains(id)
    }

    /// Select every row in `items`, or clear them all if they were already selected.
    pub fn toggle_all(&mut self, items: &[DisplayedNotification]) {
        if !items.is_empty() && items.iter().all(|item| self.0.contains(item.id())) {
            for item in items {
                self.0.remove(item.id());
            }
        } else {
            self.0.extend(items.iter().map(|item| item.id().clone()));
        }
    }

    /// Drop every selection.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Nothing selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selected ids in id order.
    #[must_use]
    pub fn ids(&self) -> Vec<RecordId> {
        self.0.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::notification;
    use test_case::test_case;

    fn displayed(id: i64, read: bool) -> DisplayedNotification {
        DisplayedNotification {
            record: notification(id, false),
            read,
        }
    }

    #[test_case(ReadFilter::All, 3 ; "all")]
    #[test_case(ReadFilter::Unread, 2 ; "unread")]
    #[test_case(ReadFilter::Read, 1 ; "read")]
    fn read_filter(filter: ReadFilter, expected: usize) {
        let items = vec![displayed(1, false), displayed(2, true), displayed(3, false)];
        let query = NotificationQuery {
            read: filter,
            ..Default::default()
        };
        assert_eq!(query.apply(&items).len(), expected);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_message() {
        let mut water = displayed(1, false);
        water.record.title = "Water supply".to_string();
        let mut fees = displayed(2, false);
        fees.record.message = "Pay the MESS fees".to_string();
        let items = vec![water, fees, displayed(3, false)];

        let query = NotificationQuery {
            search: "  water ".to_string(),
            ..Default::default()
        };
        assert_eq!(query.apply(&items)[0].id(), &RecordId::from(1));

        let query = NotificationQuery {
            search: "FEES".to_string(),
            ..Default::default()
        };
        let ids: Vec<RecordId> = query.apply(&items).iter().map(|item| item.id().clone()).collect();
        assert_eq!(ids, vec![RecordId::from(2)]);

        let query = NotificationQuery {
            search: "message body".to_string(),
            ..Default::default()
        };
        assert_eq!(query.apply(&items).len(), 2);
    }

    #[test]
    fn date_filter_matches_calendar_day() {
        let mut other_day = displayed(2, false);
        other_day.record.date = Some("2026-10-18T22:00:00".to_string());
        let items = vec![displayed(1, false), other_day];

        let query = NotificationQuery {
            date: NaiveDate::from_ymd_opt(2026, 10, 19),
            ..Default::default()
        };
        let matched = query.apply(&items);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id(), &RecordId::from(1));
    }

    #[test]
    fn pager_ignores_out_of_range_pages() {
        let rows: Vec<usize> = (0..23).collect();
        let mut pager = Pager::default();
        assert_eq!(pager.total_pages(rows.len()), 3);

        assert!(pager.go_to(3, rows.len()));
        assert_eq!(pager.slice(&rows), &[20, 21, 22]);

        assert!(!pager.go_to(4, rows.len()));
        assert!(!pager.go_to(0, rows.len()));
        assert_eq!(pager.page(), 3);

        pager.reset();
        assert_eq!(pager.slice(&rows).len(), PAGE_SIZE);
    }

    #[test]
    fn pager_survives_shrinking_list() {
        let mut pager = Pager::default();
        assert!(pager.go_to(2, 15));
        let rows: Vec<usize> = (0..4).collect();
        assert!(pager.slice(&rows).is_empty());
        assert_eq!(pager.total_pages(0), 1);
    }

    #[test]
    fn selection_toggles() {
        let items = vec![displayed(1, false), displayed(2, false)];
        let mut selection = Selection::default();

        assert!(selection.toggle(&RecordId::from(1)));
        selection.toggle_all(&items);
        assert_eq!(selection.len(), 2);
        selection.toggle_all(&items);
        assert!(selection.is_empty());
        assert!(selection.toggle(&RecordId::from(2)));
        assert!(selection.contains(&RecordId::from(2)));
        assert_eq!(selection.ids(), vec![RecordId::from(2)]);
    }
}
