//! Seams to the REST backend.
//!
//! The web client implements these over its HTTP gateway; tests use scripted
//! fakes. Futures are not `Send`: everything runs on the UI event loop.

use async_trait::async_trait;

use crate::models::{
    ApiError, LoginRequest, LoginResponse, Notification, Profile, RecordId, RefreshResponse, Role,
};

/// Authentication endpoints used by the session manager.
#[async_trait(?Send)]
pub trait AuthBackend {
    /// `POST /auth/login`
    ///
    /// # Errors
    /// Any non-2xx status or transport failure.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// Profile of the bearer of the stored access token.
    ///
    /// # Errors
    /// 401/403 when the token is no longer valid; anything else on other failures.
    async fn profile(&self) -> Result<Profile, ApiError>;

    /// `POST /auth/refreshToken`
    ///
    /// # Errors
    /// Any non-2xx status or transport failure.
    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError>;

    /// Role-specific logout route; `None` means the role was not recognised.
    ///
    /// # Errors
    /// Any non-2xx status or transport failure.
    async fn logout(&self, role: Option<Role>) -> Result<(), ApiError>;
}

/// First-run bootstrap check.
#[async_trait(?Send)]
pub trait RootAdminBackend {
    /// `GET /admin/exists`
    ///
    /// # Errors
    /// Any non-2xx status or transport failure.
    async fn root_admin_exists(&self) -> Result<bool, ApiError>;
}

/// Notification endpoints layered under the read-state overlay.
#[async_trait(?Send)]
pub trait NotificationBackend {
    /// # Errors
    /// Any non-2xx status or transport failure.
    async fn list_notifications(&self, role: Role) -> Result<Vec<Notification>, ApiError>;

    /// # Errors
    /// Any non-2xx status or transport failure.
    async fn mark_read(&self, id: &RecordId) -> Result<(), ApiError>;

    /// # Errors
    /// Any non-2xx status or transport failure.
    async fn delete_notification(&self, id: &RecordId) -> Result<(), ApiError>;

    /// # Errors
    /// Any non-2xx status or transport failure.
    async fn delete_notifications(&self, ids: &[RecordId]) -> Result<(), ApiError>;
}
