//! Owner of "who is logged in and as what".
//!
//! [`SessionManager`] derives the in-memory [`Session`] from persisted
//! credentials and the profile endpoint, replaces it on login and tears it
//! down on logout or when the session turns out to be invalid. It never
//! navigates: operations report outcomes and the caller owns the redirect.

use std::cell::{Cell, RefCell};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::backend::AuthBackend;
use super::store::{CredentialStore, StorageError};
use crate::models::{
    ApiError, Credentials, LoginRequest, LoginResponse, Role, SessionUser, dashboard_path,
    normalize_role,
};

/// Shown when a login is refused with 401/403.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please log in again.";
/// Shown for every other login failure without a server message.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";

/// In-memory authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The logged-in user; `None` when anonymous or still loading.
    pub user: Option<SessionUser>,
    /// `true` iff `user` is set and carries a known role.
    pub is_authenticated: bool,
    /// `true` while an authentication check is in flight.
    pub loading: bool,
}

impl Default for Session {
    /// The state at application start: nothing known yet, check pending.
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            loading: true,
        }
    }
}

impl Session {
    /// Settled, logged-out state.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            loading: false,
            ..Self::default()
        }
    }

    /// Settled state for `user`; authenticated only when the role is recognised.
    #[must_use]
    pub fn for_user(user: SessionUser) -> Self {
        Self {
            is_authenticated: user.role().is_some(),
            user: Some(user),
            loading: false,
        }
    }

    /// Parsed role of the current user.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().and_then(SessionUser::role)
    }

    /// Upper-cased, trimmed role string of the current user; `None` when blank or absent.
    #[must_use]
    pub fn normalized_role(&self) -> Option<String> {
        self.user
            .as_ref()
            .and_then(|user| normalize_role(user.role.as_deref()))
    }
}

/// Failures of session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend refused the login with a message.
    #[error("{0}")]
    Rejected(String),
    /// A login or refresh response carried no access token.
    #[error("Invalid login response. Please try again.")]
    MissingAccessToken,
    /// A refresh was requested with no refresh token stored.
    #[error("no refresh token available")]
    MissingRefreshToken,
    /// The profile named a role this client does not know.
    #[error("profile reported an unknown role `{0}`")]
    UnknownRole(String),
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// Credentials could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// HTTP status behind the failure, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(error) => error.status,
            _ => None,
        }
    }

    /// Text for the login form banner.
    #[must_use]
    pub fn login_message(&self) -> String {
        match self {
            Self::Api(error) if error.is_auth_failure() => SESSION_EXPIRED_MESSAGE.to_string(),
            Self::Api(error) if error.is_transport() => LOGIN_FAILED_MESSAGE.to_string(),
            Self::Api(error) => error.message.clone(),
            Self::Storage(_) | Self::UnknownRole(_) | Self::MissingRefreshToken => {
                LOGIN_FAILED_MESSAGE.to_string()
            }
            Self::Rejected(_) | Self::MissingAccessToken => self.to_string(),
        }
    }
}

/// Result of [`SessionManager::check_auth_status`].
#[derive(Debug)]
pub enum AuthCheck {
    /// No stored access token.
    Anonymous,
    /// The profile confirmed the stored token.
    Authenticated(SessionUser),
    /// A stored token did not yield a usable profile. Credentials were
    /// cleared; the caller should navigate to the login page.
    Invalidated(SessionError),
}

/// What a successful login produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// The session user now in place.
    pub user: SessionUser,
    /// Parsed role; `None` for roles this client does not know.
    pub role: Option<Role>,
    /// Where to navigate next.
    pub dashboard_path: &'static str,
}

/// Result of [`SessionManager::recover_from_auth_failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRecovery {
    /// The error was not a 401/403; the session is untouched.
    Unaffected,
    /// Another recovery is still running.
    Pending,
    /// A fresh access token was stored; later requests use it.
    Refreshed,
    /// The session is logged out; the caller should go to the login page.
    Expired,
}

/// Session state machine over an [`AuthBackend`] and a [`CredentialStore`].
pub struct SessionManager<B> {
    backend: B,
    credentials: CredentialStore,
    state: RefCell<Session>,
    recovering: Cell<bool>,
    refreshed_token: RefCell<Option<String>>,
}

impl<B> fmt::Debug for SessionManager<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("state", &self.state)
            .field("recovering", &self.recovering)
            .finish_non_exhaustive()
    }
}

impl<B: AuthBackend> SessionManager<B> {
    /// Manager starting in the loading state; call
    /// [`check_auth_status`](Self::check_auth_status) to settle it.
    pub fn new(backend: B, credentials: CredentialStore) -> Self {
        Self {
            backend,
            credentials,
            state: RefCell::new(Session::default()),
            recovering: Cell::new(false),
            refreshed_token: RefCell::new(None),
        }
    }

    /// The gateway used for session calls.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The persisted credentials this manager reads and clears.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Landing page for `role`; unknown or absent roles land on `/`.
    pub fn dashboard_path(role: Option<&str>) -> &'static str {
        dashboard_path(role)
    }

    fn replace(&self, session: Session) {
        *self.state.borrow_mut() = session;
    }

    /// Remove the persisted credentials and reset the in-memory state. Idempotent.
    pub fn clear_session(&self) {
        self.refreshed_token.borrow_mut().take();
        self.credentials.clear();
        self.replace(Session::anonymous());
    }

    /// Establish the session from the stored token and the profile endpoint.
    ///
    /// Safe to call repeatedly; every call ends with `loading == false`.
    #[instrument(skip(self))]
    pub async fn check_auth_status(&self) -> AuthCheck {
        self.state.borrow_mut().loading = true;

        let Some(token) = self.credentials.access_token() else {
            debug!("no stored access token");
            self.clear_session();
            return AuthCheck::Anonymous;
        };

        let profile = match self.backend.profile().await {
            Ok(profile) => profile,
            Err(error) => {
                warn!(status = ?error.status, error = %error, "profile check failed, clearing session");
                self.clear_session();
                return AuthCheck::Invalidated(error.into());
            }
        };

        let user = profile.into_user(self.credentials.user_id(), Some(token));
        let Some(role) = user.role() else {
            let reported = user.role.clone().unwrap_or_default();
            warn!(role = %reported, "profile carries no usable role, clearing session");
            self.clear_session();
            return AuthCheck::Invalidated(SessionError::UnknownRole(reported));
        };

        if let Err(error) = self.credentials.set_role(Some(role.as_str())) {
            warn!(error = %error, "failed to cache role");
        }
        info!(role = %role, "session restored");
        self.replace(Session::for_user(user.clone()));
        AuthCheck::Authenticated(user)
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    /// Every failure leaves the session fully logged out: transport and
    /// HTTP errors, a response carrying `error`, a response without an
    /// access token, or a storage write that could not complete.
    #[instrument(skip_all, fields(user = %credentials.login_id()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, SessionError> {
        let request = LoginRequest::from(credentials);
        let result = match self.backend.login(&request).await {
            Ok(response) => self.accept_login(credentials, &response),
            Err(error) => Err(error.into()),
        };

        match result {
            Ok(outcome) => {
                info!(role = ?outcome.role, "login succeeded");
                Ok(outcome)
            }
            Err(error) => {
                warn!(error = %error, "login failed, clearing session");
                self.clear_session();
                Err(error)
            }
        }
    }

    fn accept_login(
        &self,
        credentials: &Credentials,
        response: &LoginResponse,
    ) -> Result<LoginOutcome, SessionError> {
        if let Some(message) = response.error.as_deref().filter(|text| !text.is_empty()) {
            return Err(SessionError::Rejected(message.to_string()));
        }
        let token = response
            .access_token()
            .ok_or(SessionError::MissingAccessToken)?;

        let user_id = response.resolve_user_id(credentials);
        let user = response.to_user(&user_id, token);

        self.credentials.set_access_token(token)?;
        self.credentials.set_refresh_token(response.refresh_token())?;
        self.credentials.set_role(user.role.as_deref())?;
        self.credentials.set_user_id(&user.user_id)?;

        let outcome = LoginOutcome {
            role: user.role(),
            dashboard_path: dashboard_path(user.role.as_deref()),
            user: user.clone(),
        };
        self.replace(Session::for_user(user));
        Ok(outcome)
    }

    /// Best-effort remote logout followed by an unconditional local clear.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let role = self
            .state
            .borrow()
            .user
            .as_ref()
            .and_then(|user| user.role.clone())
            .or_else(|| self.credentials.role());

        match role {
            Some(role) => {
                if let Err(error) = self.backend.logout(Role::parse(&role)).await {
                    warn!(error = %error, "remote logout failed");
                }
            }
            None => debug!("no known role, skipping remote logout"),
        }

        self.clear_session();
        info!("logged out");
    }

    /// Swap the stored refresh token for a new access token.
    ///
    /// # Errors
    /// [`SessionError::MissingRefreshToken`] without any network call when
    /// nothing is stored; otherwise the exchange failure. Either way the
    /// session ends logged out.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<String, SessionError> {
        let Some(refresh_token) = self.credentials.refresh_token() else {
            warn!("refresh requested without a stored refresh token");
            self.clear_session();
            return Err(SessionError::MissingRefreshToken);
        };

        let exchanged = self
            .backend
            .refresh_token(&refresh_token)
            .await
            .map_err(SessionError::from)
            .and_then(|response| {
                response
                    .access_token
                    .filter(|token| !token.is_empty())
                    .ok_or(SessionError::MissingAccessToken)
            })
            .and_then(|token| {
                self.credentials.set_access_token(&token)?;
                Ok(token)
            });

        match exchanged {
            Ok(token) => {
                if let Some(user) = self.state.borrow_mut().user.as_mut() {
                    user.token = Some(token.clone());
                }
                *self.refreshed_token.borrow_mut() = Some(token.clone());
                debug!("access token refreshed");
                Ok(token)
            }
            Err(error) => {
                warn!(error = %error, "token refresh failed, logging out");
                self.logout().await;
                Err(error)
            }
        }
    }

    /// React to an error from a protected call.
    ///
    /// A 401 gets one token refresh; a second 401 on the refreshed token, a
    /// 403, or a failed refresh ends the session. The failed request is not
    /// replayed.
    #[instrument(skip_all, fields(status = ?error.status))]
    pub async fn recover_from_auth_failure(&self, error: &ApiError) -> AuthRecovery {
        if !error.is_auth_failure() {
            return AuthRecovery::Unaffected;
        }
        if self.recovering.get() {
            debug!("auth recovery already running");
            return AuthRecovery::Pending;
        }

        let Some(token) = self.credentials.access_token() else {
            self.clear_session();
            return AuthRecovery::Expired;
        };

        self.recovering.set(true);
        let already_refreshed = self.refreshed_token.borrow().as_deref() == Some(token.as_str());
        let recovery = if error.status == Some(401) && !already_refreshed {
            match self.refresh_token().await {
                Ok(_) => AuthRecovery::Refreshed,
                Err(_) => AuthRecovery::Expired,
            }
        } else {
            warn!("protected call rejected, logging out");
            self.logout().await;
            AuthRecovery::Expired
        };
        self.recovering.set(false);
        recovery
    }
}
