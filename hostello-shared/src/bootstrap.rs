//! Where the root path sends a visitor.

use tracing::{debug, warn};

use crate::fetch::Liveness;
use crate::models::{LOGIN_PATH, ROOT_REGISTER_PATH};
use crate::session::{RootAdminBackend, Session};

/// Where to send a visitor who opened the root path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapDecision {
    /// Session check still running.
    Wait,
    /// Logged in: the role's landing page.
    Dashboard(&'static str),
    /// No session and a root administrator exists.
    Login,
    /// No root administrator yet: first-run registration.
    RootRegister,
}

impl BootstrapDecision {
    /// Path to navigate to; `None` while waiting.
    #[must_use]
    pub fn path(self) -> Option<&'static str> {
        match self {
            Self::Wait => None,
            Self::Dashboard(path) => Some(path),
            Self::Login => Some(LOGIN_PATH),
            Self::RootRegister => Some(ROOT_REGISTER_PATH),
        }
    }
}

/// Decision available without I/O; `None` means the root admin check is needed.
#[must_use]
pub fn immediate(session: &Session) -> Option<BootstrapDecision> {
    if session.loading {
        return Some(BootstrapDecision::Wait);
    }
    if session.is_authenticated {
        if let Some(role) = session.role() {
            return Some(BootstrapDecision::Dashboard(role.dashboard_path()));
        }
    }
    None
}

/// Full resolution for the root path.
///
/// Returns `None` when `liveness` was retired while the check was in
/// flight; the caller must not navigate in that case.
pub async fn resolve<B>(session: &Session, backend: &B, liveness: &Liveness) -> Option<BootstrapDecision>
where
    B: RootAdminBackend + ?Sized,
{
    if let Some(decision) = immediate(session) {
        return Some(decision);
    }

    let answer = backend.root_admin_exists().await;
    if !liveness.is_alive() {
        debug!("bootstrap check settled after teardown, ignoring");
        return None;
    }

    Some(match answer {
        Ok(true) => BootstrapDecision::Login,
        Ok(false) => BootstrapDecision::RootRegister,
        Err(error) => {
            warn!(error = %error, "root admin check failed, falling back to login");
            BootstrapDecision::Login
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiError, SessionUser};
    use crate::testing::FakeRootAdmin;

    fn student_session() -> Session {
        Session::for_user(SessionUser {
            user_id: "23UCS001".to_string(),
            role: Some("STUDENT".to_string()),
            username: "23UCS001".to_string(),
            first_name: None,
            mobile_number: None,
            token: Some("tok".to_string()),
        })
    }

    #[tokio::test]
    async fn existing_session_skips_root_admin_check() {
        let backend = FakeRootAdmin::answering(Ok(false));
        let decision = resolve(&student_session(), &backend, &Liveness::new()).await;

        assert_eq!(decision, Some(BootstrapDecision::Dashboard("/student/dashboard")));
        assert_eq!(backend.calls.get(), 0);
    }

    #[tokio::test]
    async fn loading_session_waits_without_calling() {
        let backend = FakeRootAdmin::answering(Ok(true));
        let decision = resolve(&Session::default(), &backend, &Liveness::new()).await;

        assert_eq!(decision, Some(BootstrapDecision::Wait));
        assert_eq!(decision.and_then(BootstrapDecision::path), None);
        assert_eq!(backend.calls.get(), 0);
    }

    #[tokio::test]
    async fn missing_root_admin_goes_to_registration() {
        let backend = FakeRootAdmin::answering(Ok(false));
        let decision = resolve(&Session::anonymous(), &backend, &Liveness::new()).await;

        assert_eq!(decision.and_then(BootstrapDecision::path), Some("/root-register"));
    }

    #[tokio::test]
    async fn existing_root_admin_goes_to_login() {
        let backend = FakeRootAdmin::answering(Ok(true));
        let decision = resolve(&Session::anonymous(), &backend, &Liveness::new()).await;

        assert_eq!(decision, Some(BootstrapDecision::Login));
    }

    #[tokio::test]
    async fn failed_check_fails_safe_to_login() {
        let backend = FakeRootAdmin::answering(Err(ApiError::from_response(500, None, None)));
        let decision = resolve(&Session::anonymous(), &backend, &Liveness::new()).await;

        assert_eq!(decision.and_then(BootstrapDecision::path), Some("/login"));
        assert_eq!(backend.calls.get(), 1);
    }

    #[tokio::test]
    async fn teardown_suppresses_decision() {
        let backend = FakeRootAdmin::answering(Ok(false));
        let liveness = Liveness::new();
        liveness.retire();

        let decision = resolve(&Session::anonymous(), &backend, &liveness).await;

        assert_eq!(decision, None);
    }
}
