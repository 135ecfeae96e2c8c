//! Scripted backends for unit tests.

use async_trait::async_trait;
use serde_json::json;
use std::cell::{Cell, RefCell};

use crate::models::{
    ApiError, LoginRequest, LoginResponse, Notification, Profile, RecordId, RefreshResponse, Role,
};
use crate::session::{AuthBackend, NotificationBackend, RootAdminBackend};

fn unscripted(call: &str) -> ApiError {
    ApiError::transport(format!("no scripted response for {call}"))
}

/// Authentication backend answering from scripted results and recording every call.
#[derive(Default)]
pub struct FakeAuth {
    login: RefCell<Option<Result<LoginResponse, ApiError>>>,
    profile: RefCell<Option<Result<Profile, ApiError>>>,
    refresh: RefCell<Option<Result<RefreshResponse, ApiError>>>,
    logout_fails: Cell<bool>,
    pub calls: RefCell<Vec<String>>,
    pub logout_roles: RefCell<Vec<Option<Role>>>,
    pub login_requests: RefCell<Vec<LoginRequest>>,
}

impl FakeAuth {
    pub fn with_login(self, response: Result<LoginResponse, ApiError>) -> Self {
        *self.login.borrow_mut() = Some(response);
        self
    }

    pub fn with_profile(self, response: Result<Profile, ApiError>) -> Self {
        *self.profile.borrow_mut() = Some(response);
        self
    }

    pub fn with_refresh(self, response: Result<RefreshResponse, ApiError>) -> Self {
        *self.refresh.borrow_mut() = Some(response);
        self
    }

    pub fn failing_logout(self) -> Self {
        self.logout_fails.set(true);
        self
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|call| *call == name).count()
    }
}

#[async_trait(?Send)]
impl AuthBackend for FakeAuth {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.calls.borrow_mut().push("login".to_string());
        self.login_requests.borrow_mut().push(request.clone());
        self.login.borrow().clone().unwrap_or_else(|| Err(unscripted("login")))
    }

    async fn profile(&self) -> Result<Profile, ApiError> {
        self.calls.borrow_mut().push("profile".to_string());
        self.profile.borrow().clone().unwrap_or_else(|| Err(unscripted("profile")))
    }

    async fn refresh_token(&self, _refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        self.calls.borrow_mut().push("refresh".to_string());
        self.refresh.borrow().clone().unwrap_or_else(|| Err(unscripted("refresh")))
    }

    async fn logout(&self, role: Option<Role>) -> Result<(), ApiError> {
        self.calls.borrow_mut().push("logout".to_string());
        self.logout_roles.borrow_mut().push(role);
        if self.logout_fails.get() {
            Err(ApiError::from_response(500, None, None))
        } else {
            Ok(())
        }
    }
}

/// Root admin check that counts how often it was asked.
pub struct FakeRootAdmin {
    answer: Result<bool, ApiError>,
    pub calls: Cell<usize>,
}

impl FakeRootAdmin {
    pub fn answering(answer: Result<bool, ApiError>) -> Self {
        Self {
            answer,
            calls: Cell::new(0),
        }
    }
}

#[async_trait(?Send)]
impl RootAdminBackend for FakeRootAdmin {
    async fn root_admin_exists(&self) -> Result<bool, ApiError> {
        self.calls.set(self.calls.get() + 1);
        self.answer.clone()
    }
}

/// Notification backend holding a mutable server-side list.
#[derive(Default)]
pub struct FakeNotifications {
    pub server: RefCell<Vec<Notification>>,
    pub list_fails: Cell<bool>,
    /// While set, a list call snapshots the server and then waits.
    pub hold_list: Cell<bool>,
    pub mark_read_fails: Cell<bool>,
    pub delete_fails: Cell<bool>,
    pub marked: RefCell<Vec<RecordId>>,
    pub deleted: RefCell<Vec<RecordId>>,
}

impl FakeNotifications {
    pub fn with(records: Vec<Notification>) -> Self {
        let fake = Self::default();
        *fake.server.borrow_mut() = records;
        fake
    }
}

#[async_trait(?Send)]
impl NotificationBackend for FakeNotifications {
    async fn list_notifications(&self, _role: Role) -> Result<Vec<Notification>, ApiError> {
        if self.list_fails.get() {
            return Err(ApiError::transport("offline"));
        }
        let snapshot = self.server.borrow().clone();
        while self.hold_list.get() {
            tokio::task::yield_now().await;
        }
        Ok(snapshot)
    }

    async fn mark_read(&self, id: &RecordId) -> Result<(), ApiError> {
        self.marked.borrow_mut().push(id.clone());
        if self.mark_read_fails.get() {
            Err(ApiError::from_response(500, None, None))
        } else {
            Ok(())
        }
    }

    async fn delete_notification(&self, id: &RecordId) -> Result<(), ApiError> {
        self.delete_notifications(std::slice::from_ref(id)).await
    }

    async fn delete_notifications(&self, ids: &[RecordId]) -> Result<(), ApiError> {
        if self.delete_fails.get() {
            return Err(ApiError::from_response(
                500,
                Some(json!({ "message": "delete failed" })),
                None,
            ));
        }
        self.deleted.borrow_mut().extend(ids.iter().cloned());
        self.server
            .borrow_mut()
            .retain(|notification| !ids.contains(&notification.id));
        Ok(())
    }
}

/// Notification fixture with a server read flag.
pub fn notification(id: i64, is_read: bool) -> Notification {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("Notice {id}"),
        "message": format!("Message body {id}"),
        "date": "2026-10-19T08:00:00",
        "isRead": is_read,
    }))
    .expect("valid notification fixture")
}
