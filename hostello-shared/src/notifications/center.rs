//! Notification list state shared by the list view and the unread badge.

use futures_util::future::join_all;
use std::cell::RefCell;
use std::fmt;
use tracing::{debug, info, warn};

use super::overlay::{Arrival, ReadStateOverlay};
use crate::fetch::RequestGeneration;
use crate::models::{ApiError, DisplayedNotification, RecordId, Role};
use crate::session::{CredentialStore, NotificationBackend};

/// How a fetch reports itself to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// User-initiated: failures are returned to the caller.
    Loud,
    /// Polling: failures are logged and otherwise ignored.
    Silent,
}

/// Whether a read mark reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadAck {
    /// The server recorded the mark.
    Synced,
    /// The server call failed; the mark is kept on this device.
    LocalOnly,
}

/// Notification list of one user, with read marks, deletions and
/// superseded-fetch protection.
pub struct NotificationCenter<B> {
    backend: B,
    role: Role,
    overlay: RefCell<ReadStateOverlay>,
    generation: RequestGeneration,
}

impl<B> fmt::Debug for NotificationCenter<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("role", &self.role)
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}

impl<B: NotificationBackend> NotificationCenter<B> {
    /// Empty center for `user_id`, loading their persisted read set.
    pub fn new(backend: B, role: Role, credentials: CredentialStore, user_id: Option<String>) -> Self {
        Self {
            backend,
            role,
            overlay: RefCell::new(ReadStateOverlay::new(credentials, user_id)),
            generation: RequestGeneration::new(),
        }
    }

    /// The gateway this center calls.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Held notifications with their effective read state, in server order.
    pub fn displayed(&self) -> Vec<DisplayedNotification> {
        self.overlay.borrow().displayed()
    }

    /// Held notifications that are unread on both the server and this device.
    pub fn unread_count(&self) -> usize {
        self.overlay.borrow().unread_count()
    }

    /// Re-fetch the list.
    ///
    /// `Ok(None)` means nothing was applied: a newer fetch started while this
    /// one was in flight, or a silent fetch failed.
    ///
    /// # Errors
    /// The backend failure, for [`FetchMode::Loud`] only.
    pub async fn refresh(&self, mode: FetchMode) -> Result<Option<Arrival>, ApiError> {
        let ticket = self.generation.issue();
        let fetched = self.backend.list_notifications(self.role).await;

        if !self.generation.is_current(ticket) {
            debug!("discarding superseded notification fetch");
            return Ok(None);
        }

        match fetched {
            Ok(records) => {
                let arrival = self.overlay.borrow_mut().apply_fetch(records);
                if arrival.new_count() > 0 {
                    info!(count = arrival.new_count(), "new notifications arrived");
                }
                Ok(Some(arrival))
            }
            Err(error) if mode == FetchMode::Silent => {
                warn!(error = %error, "notification poll failed");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    /// Mark `id` read locally, then tell the server.
    pub async fn mark_as_read(&self, id: &RecordId) -> ReadAck {
        self.overlay.borrow_mut().mark_read_local(id);
        match self.backend.mark_read(id).await {
            Ok(()) => ReadAck::Synced,
            Err(error) => {
                warn!(id = %id, error = %error, "server did not record read mark");
                ReadAck::LocalOnly
            }
        }
    }

    /// Mark every held notification read locally, then inform the server of
    /// the ones that were unread. Returns how many server calls failed.
    pub async fn mark_all_as_read(&self) -> usize {
        let newly_read = self.overlay.borrow_mut().mark_all_read_local();
        let results = join_all(newly_read.iter().map(|id| self.backend.mark_read(id))).await;
        let failed = results.iter().filter(|result| result.is_err()).count();
        if failed > 0 {
            warn!(failed, total = newly_read.len(), "some read marks were not recorded");
        }
        failed
    }

    /// A fetch already in flight predates the deletion and is discarded.
    ///
    /// # Errors
    /// The backend failure; the notification stays listed.
    pub async fn delete(&self, id: &RecordId) -> Result<(), ApiError> {
        self.backend.delete_notification(id).await?;
        self.generation.invalidate();
        self.overlay.borrow_mut().remove(std::slice::from_ref(id));
        Ok(())
    }

    /// Delete several notifications in one call. An empty list is a no-op.
    ///
    /// # Errors
    /// The backend failure; every notification stays listed.
    pub async fn delete_many(&self, ids: &[RecordId]) -> Result<(), ApiError> {
        if ids.is_empty() {
            return Ok(());
        }
        self.backend.delete_notifications(ids).await?;
        self.generation.invalidate();
        self.overlay.borrow_mut().remove(ids);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeNotifications, notification};

    fn center(records: Vec<crate::models::Notification>) -> (CredentialStore, NotificationCenter<FakeNotifications>) {
        let credentials = CredentialStore::in_memory();
        let center = NotificationCenter::new(
            FakeNotifications::with(records),
            Role::Student,
            credentials.clone(),
            Some("23UCS001".to_string()),
        );
        (credentials, center)
    }

    #[test]
    fn debug_output_skips_backend() {
        let (_, center) = center(vec![notification(1, false)]);
        let rendered = format!("{center:?}");
        assert!(rendered.starts_with("NotificationCenter { role: Student"));
        assert!(!rendered.contains("FakeNotifications"));
    }

    #[tokio::test]
    async fn growth_between_polls_is_announced() {
        let (_, center) = center((1..=4).map(|id| notification(id, false)).collect());
        let first = center.refresh(FetchMode::Loud).await.unwrap().unwrap();
        assert_eq!(first.announcement(), None);

        center
            .backend()
            .server
            .borrow_mut()
            .extend([notification(5, false), notification(6, false)]);
        let second = center.refresh(FetchMode::Silent).await.unwrap().unwrap();

        assert_eq!(
            second.announcement().as_deref(),
            Some("2 new notifications received!")
        );
        assert_eq!(center.unread_count(), 6);
    }

    #[tokio::test]
    async fn silent_failure_keeps_previous_list() {
        let (_, center) = center(vec![notification(1, false)]);
        center.refresh(FetchMode::Loud).await.unwrap();

        center.backend().list_fails.set(true);
        assert_eq!(center.refresh(FetchMode::Silent).await.unwrap(), None);
        assert!(center.refresh(FetchMode::Loud).await.is_err());
        assert_eq!(center.displayed().len(), 1);
    }

    #[tokio::test]
    async fn read_mark_survives_server_failure_and_refetch() {
        let (credentials, center) = center(vec![notification(1, false), notification(2, false)]);
        center.refresh(FetchMode::Loud).await.unwrap();
        center.backend().mark_read_fails.set(true);

        let ack = center.mark_as_read(&RecordId::from(1)).await;
        assert_eq!(ack, ReadAck::LocalOnly);

        center.refresh(FetchMode::Silent).await.unwrap();
        let displayed = center.displayed();
        assert!(displayed[0].read);
        assert!(!displayed[1].read);
        assert!(credentials
            .read_notification_ids("23UCS001")
            .contains(&RecordId::from(1)));
    }

    #[tokio::test]
    async fn mark_all_calls_server_for_unread_only() {
        let (_, center) = center(vec![
            notification(1, false),
            notification(2, true),
            notification(3, false),
        ]);
        center.refresh(FetchMode::Loud).await.unwrap();
        center.backend().mark_read_fails.set(true);

        let failed = center.mark_all_as_read().await;

        assert_eq!(failed, 2);
        assert_eq!(
            center.backend().marked.borrow().as_slice(),
            &[RecordId::from(1), RecordId::from(3)]
        );
        assert_eq!(center.unread_count(), 0);
    }

    #[tokio::test]
    async fn failed_delete_keeps_item() {
        let (credentials, center) = center(vec![notification(1, false)]);
        center.refresh(FetchMode::Loud).await.unwrap();
        center.mark_as_read(&RecordId::from(1)).await;
        center.backend().delete_fails.set(true);

        let error = center.delete(&RecordId::from(1)).await.unwrap_err();

        assert_eq!(error.message, "delete failed");
        assert_eq!(center.displayed().len(), 1);
        assert!(!credentials.read_notification_ids("23UCS001").is_empty());
    }

    #[tokio::test]
    async fn successful_delete_purges_list_and_read_set() {
        let (credentials, center) = center(vec![notification(1, false), notification(2, false)]);
        center.refresh(FetchMode::Loud).await.unwrap();
        center.mark_as_read(&RecordId::from(1)).await;

        center.delete(&RecordId::from(1)).await.unwrap();

        let remaining: Vec<_> = center.displayed().iter().map(|item| item.id().clone()).collect();
        assert_eq!(remaining, vec![RecordId::from(2)]);
        assert!(credentials.read_notification_ids("23UCS001").is_empty());
    }

    #[tokio::test]
    async fn fetch_started_before_delete_cannot_restore_item() {
        let (_, center) = center((1..=3).map(|id| notification(id, false)).collect());
        center.refresh(FetchMode::Loud).await.unwrap();
        center.backend().hold_list.set(true);

        let (fetched, deleted) = futures_util::join!(center.refresh(FetchMode::Silent), async {
            let outcome = center.delete(&RecordId::from(3)).await;
            center.backend().hold_list.set(false);
            outcome
        });

        deleted.unwrap();
        assert_eq!(fetched.unwrap(), None);
        let ids: Vec<_> = center.displayed().iter().map(|item| item.id().clone()).collect();
        assert_eq!(ids, vec![RecordId::from(1), RecordId::from(2)]);
    }

    #[tokio::test]
    async fn bulk_delete_stales_pending_fetch() {
        let (_, center) = center((1..=3).map(|id| notification(id, false)).collect());
        center.refresh(FetchMode::Loud).await.unwrap();
        center.backend().hold_list.set(true);

        let (fetched, deleted) = futures_util::join!(center.refresh(FetchMode::Loud), async {
            let outcome = center.delete_many(&[RecordId::from(1), RecordId::from(2)]).await;
            center.backend().hold_list.set(false);
            outcome
        });

        deleted.unwrap();
        assert_eq!(fetched.unwrap(), None);
        assert_eq!(center.unread_count(), 1);
    }

    #[tokio::test]
    async fn bulk_delete_of_nothing_makes_no_call() {
        let (_, center) = center(vec![notification(1, false)]);
        center.delete_many(&[]).await.unwrap();
        assert!(center.backend().deleted.borrow().is_empty());

        center.refresh(FetchMode::Loud).await.unwrap();
        center
            .delete_many(&[RecordId::from(1)])
            .await
            .unwrap();
        assert!(center.displayed().is_empty());
    }
}
