//! Local read-state layered over the server's notification list.
//!
//! The server's `isRead` flag is not trusted on its own. A per-user set of
//! ids marked read on this device is merged in, and it can only upgrade an
//! item from unread to read.

use std::collections::BTreeSet;
use tracing::warn;

use crate::models::{DisplayedNotification, Notification, RecordId};
use crate::session::CredentialStore;

/// Display state for `server`: an item is read if the server says so or the id is in `read`.
#[must_use]
pub fn merge(server: &[Notification], read: &BTreeSet<RecordId>) -> Vec<DisplayedNotification> {
    server
        .iter()
        .map(|record| DisplayedNotification {
            read: record.is_read || read.contains(&record.id),
            record: record.clone(),
        })
        .collect()
}

/// Count comparison between two consecutive fetches.
///
/// This is a count delta, not an identity diff: three arrivals and one
/// deletion elsewhere read as two new notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    /// Count held before this fetch; `None` on the first fetch.
    pub previous: Option<usize>,
    /// Count in this fetch.
    pub current: usize,
}

impl Arrival {
    /// How many notifications appear to have arrived since the previous fetch.
    #[must_use]
    pub fn new_count(&self) -> usize {
        self.previous
            .map_or(0, |previous| self.current.saturating_sub(previous))
    }

    /// Banner text when something arrived.
    #[must_use]
    pub fn announcement(&self) -> Option<String> {
        match self.new_count() {
            0 => None,
            1 => Some("1 new notification received!".to_string()),
            count => Some(format!("{count} new notifications received!")),
        }
    }
}

/// Server list plus the user's persisted read set.
#[derive(Debug)]
pub struct ReadStateOverlay {
    credentials: CredentialStore,
    /// Owner of the read set; without one, marks stay in memory only.
    user_id: Option<String>,
    read: BTreeSet<RecordId>,
    server: Vec<Notification>,
    previous_count: Option<usize>,
}

impl ReadStateOverlay {
    /// Load the persisted read set of `user_id`.
    #[must_use]
    pub fn new(credentials: CredentialStore, user_id: Option<String>) -> Self {
        let read = user_id
            .as_deref()
            .map(|user_id| credentials.read_notification_ids(user_id))
            .unwrap_or_default();
        Self {
            credentials,
            user_id,
            read,
            server: Vec::new(),
            previous_count: None,
        }
    }

    /// Ids marked read on this device.
    #[must_use]
    pub fn read_ids(&self) -> &BTreeSet<RecordId> {
        &self.read
    }

    /// Server list merged with the local read set.
    #[must_use]
    pub fn displayed(&self) -> Vec<DisplayedNotification> {
        merge(&self.server, &self.read)
    }

    /// Unread by both the server flag and the local set.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.server
            .iter()
            .filter(|record| !record.is_read && !self.read.contains(&record.id))
            .count()
    }

    /// Replace the server list with a fresh fetch.
    pub fn apply_fetch(&mut self, records: Vec<Notification>) -> Arrival {
        let arrival = Arrival {
            previous: self.previous_count,
            current: records.len(),
        };
        self.previous_count = Some(records.len());
        self.server = records;
        arrival
    }

    /// Add `id` to the read set and persist it. Returns `false` if it was already there.
    pub fn mark_read_local(&mut self, id: &RecordId) -> bool {
        let added = self.read.insert(id.clone());
        if added {
            self.persist();
        }
        added
    }

    /// Mark every held notification read. Returns the ids that were unread before.
    pub fn mark_all_read_local(&mut self) -> Vec<RecordId> {
        let newly_read: Vec<RecordId> = self
            .server
            .iter()
            .filter(|record| !record.is_read && !self.read.contains(&record.id))
            .map(|record| record.id.clone())
            .collect();
        self.read
            .extend(self.server.iter().map(|record| record.id.clone()));
        self.persist();
        newly_read
    }

    /// Drop deleted ids from the list and from the read set.
    pub fn remove(&mut self, ids: &[RecordId]) {
        self.server.retain(|record| !ids.contains(&record.id));
        let before = self.read.len();
        self.read.retain(|id| !ids.contains(id));
        if self.read.len() != before {
            self.persist();
        }
        self.previous_count = Some(self.server.len());
    }

    fn persist(&self) {
        let Some(user_id) = self.user_id.as_deref() else {
            return;
        };
        if let Err(error) = self.credentials.set_read_notification_ids(user_id, &self.read) {
            warn!(error = %error, "failed to persist read notifications");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::notification;
    use test_case::test_case;

    fn overlay() -> (CredentialStore, ReadStateOverlay) {
        let credentials = CredentialStore::in_memory();
        let overlay = ReadStateOverlay::new(credentials.clone(), Some("23UCS001".to_string()));
        (credentials, overlay)
    }

    #[test]
    fn local_read_only_upgrades() {
        let server = vec![notification(1, false), notification(2, true)];
        let read: BTreeSet<RecordId> = [RecordId::from(1)].into_iter().collect();

        let displayed = merge(&server, &read);
        assert!(displayed.iter().all(|item| item.read));

        let displayed = merge(&server, &BTreeSet::new());
        assert!(!displayed[0].read);
        assert!(displayed[1].read);
    }

    #[test]
    fn marked_id_stays_read_across_fetches() {
        let (credentials, mut overlay) = overlay();
        overlay.apply_fetch(vec![notification(7, false)]);
        assert!(overlay.mark_read_local(&RecordId::from(7)));
        assert!(!overlay.mark_read_local(&RecordId::from(7)));

        for _ in 0..3 {
            overlay.apply_fetch(vec![notification(7, false), notification(8, false)]);
            assert_eq!(overlay.unread_count(), 1);
            assert!(overlay.displayed()[0].read);
        }

        let reloaded = ReadStateOverlay::new(credentials, Some("23UCS001".to_string()));
        assert!(reloaded.read_ids().contains(&RecordId::from(7)));
    }

    #[test]
    fn mark_all_reports_previously_unread() {
        let (_, mut overlay) = overlay();
        overlay.apply_fetch(vec![
            notification(1, false),
            notification(2, true),
            notification(3, false),
        ]);
        overlay.mark_read_local(&RecordId::from(3));

        let newly_read = overlay.mark_all_read_local();

        assert_eq!(newly_read, vec![RecordId::from(1)]);
        assert_eq!(overlay.unread_count(), 0);
        assert_eq!(overlay.read_ids().len(), 3);
    }

    #[test]
    fn removal_purges_read_set() {
        let (credentials, mut overlay) = overlay();
        overlay.apply_fetch(vec![notification(1, false), notification(2, false)]);
        overlay.mark_read_local(&RecordId::from(1));

        overlay.remove(&[RecordId::from(1)]);

        assert_eq!(overlay.displayed().len(), 1);
        assert!(credentials.read_notification_ids("23UCS001").is_empty());
    }

    #[test]
    fn without_user_marks_are_not_persisted() {
        let credentials = CredentialStore::in_memory();
        let mut overlay = ReadStateOverlay::new(credentials.clone(), None);
        overlay.apply_fetch(vec![notification(1, false)]);
        overlay.mark_read_local(&RecordId::from(1));

        assert_eq!(overlay.unread_count(), 0);
        assert!(credentials.read_notification_ids("").is_empty());
    }

    #[test_case(None, 6, None ; "first fetch announces nothing")]
    #[test_case(Some(4), 6, Some("2 new notifications received!") ; "two arrived")]
    #[test_case(Some(0), 1, Some("1 new notification received!") ; "one arrived")]
    #[test_case(Some(5), 3, None ; "deletions elsewhere")]
    fn arrival_announcement(previous: Option<usize>, current: usize, expected: Option<&str>) {
        let arrival = Arrival { previous, current };
        assert_eq!(arrival.announcement().as_deref(), expected);
    }

    #[test]
    fn consecutive_fetches_compare_counts() {
        let (_, mut overlay) = overlay();
        let first = overlay.apply_fetch((1..=4).map(|id| notification(id, false)).collect());
        assert_eq!(first.new_count(), 0);

        let second = overlay.apply_fetch((1..=6).map(|id| notification(id, false)).collect());
        assert_eq!(second, Arrival { previous: Some(4), current: 6 });
        assert_eq!(second.new_count(), 2);
    }
}
