//! Per-navigation access decisions.
//!
//! [`guard`] is a pure function of the current [`Session`]; the router
//! re-evaluates it on every navigation and every session change.

use crate::models::{LOGIN_PATH, Role};
use crate::session::Session;

/// Outcome of [`guard`] for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The startup check is still running; show a neutral placeholder.
    Wait,
    /// Not logged in. `from` is the location to return to after login.
    RedirectToLogin { from: Option<String> },
    /// Logged in, but the route belongs to another role.
    RedirectTo(&'static str),
    /// Show the requested page.
    Render,
}

impl GuardDecision {
    /// Target path for redirects, `None` for [`Self::Wait`] and [`Self::Render`].
    #[must_use]
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            Self::RedirectToLogin { .. } => Some(LOGIN_PATH),
            Self::RedirectTo(path) => Some(path),
            Self::Wait | Self::Render => None,
        }
    }
}

/// Decide what the route at `location` shows.
///
/// `allowed` of `None` admits any authenticated user.
#[must_use]
pub fn guard(session: &Session, allowed: Option<&[Role]>, location: &str) -> GuardDecision {
    if session.loading {
        return GuardDecision::Wait;
    }

    let to_login = || GuardDecision::RedirectToLogin {
        from: Some(location.to_string()).filter(|path| !path.is_empty()),
    };
    if !session.is_authenticated {
        return to_login();
    }
    let Some(normalized) = session.normalized_role() else {
        return to_login();
    };

    if let Some(allowed) = allowed {
        let role = Role::parse(&normalized);
        if !role.is_some_and(|role| allowed.contains(&role)) {
            return GuardDecision::RedirectTo(crate::models::dashboard_path(Some(&normalized)));
        }
    }

    GuardDecision::Render
}

/// Roles admitted by the protected route at `path`, judged by its first segment.
///
/// `None` means the path is not role-scoped.
#[must_use]
pub fn roles_for_path(path: &str) -> Option<&'static [Role]> {
    let segment = path.trim_start_matches('/').split('/').next().unwrap_or_default();
    match segment {
        "admin" => Some(&[Role::Admin]),
        "rector" => Some(&[Role::Rector]),
        "student" => Some(&[Role::Student]),
        _ => None,
    }
}

/// Where to go after logging in as `role`: the captured origin when that
/// role may open it, otherwise the role's dashboard.
#[must_use]
pub fn post_login_target(role: Option<Role>, from: Option<&str>) -> String {
    let fallback = role.map_or(crate::models::HOME_PATH, Role::dashboard_path);
    let Some(role) = role else {
        return fallback.to_string();
    };
    match from.and_then(|path| roles_for_path(path).map(|roles| (path, roles))) {
        Some((path, roles)) if roles.contains(&role) => path.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionUser;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    fn session_with_role(role: &str) -> Session {
        Session::for_user(SessionUser {
            user_id: "u-1".to_string(),
            role: Some(role.to_string()),
            username: "user".to_string(),
            first_name: None,
            mobile_number: None,
            token: Some("tok".to_string()),
        })
    }

    #[test]
    fn loading_session_waits() {
        let decision = guard(&Session::default(), Some(&[Role::Admin]), "/admin/dashboard");
        assert_eq!(decision, GuardDecision::Wait);
        assert_eq!(decision.redirect_path(), None);
    }

    #[test]
    fn anonymous_session_goes_to_login_with_origin() {
        let decision = guard(&Session::anonymous(), None, "/student/notifications");
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                from: Some("/student/notifications".to_string())
            }
        );
        assert_eq!(decision.redirect_path(), Some("/login"));
    }

    #[test]
    fn authenticated_flag_without_role_is_anonymous() {
        let mut session = session_with_role("ADMIN");
        if let Some(user) = session.user.as_mut() {
            user.role = Some("  ".to_string());
        }
        let decision = guard(&session, None, "/admin/dashboard");
        assert!(matches!(decision, GuardDecision::RedirectToLogin { .. }));
    }

    #[test_case("ADMIN", "/rector/dashboard", "/admin/dashboard" ; "admin on rector route")]
    #[test_case("STUDENT", "/admin/dashboard", "/student/dashboard" ; "student on admin route")]
    #[test_case("RECTOR", "/student/dashboard", "/rector/dashboard" ; "rector on student route")]
    fn wrong_role_goes_to_own_dashboard(role: &str, location: &str, expected: &'static str) {
        let decision = guard(&session_with_role(role), roles_for_path(location), location);
        assert_eq!(decision, GuardDecision::RedirectTo(expected));
    }

    #[test]
    fn renders_iff_role_is_admitted() {
        let route_sets: [&[Role]; 4] = [
            &[Role::Admin],
            &[Role::Rector],
            &[Role::Student],
            &[Role::Admin, Role::Rector],
        ];
        for role in Role::iter() {
            let session = session_with_role(role.as_str());
            for allowed in route_sets {
                let decision = guard(&session, Some(allowed), "/x");
                if allowed.contains(&role) {
                    assert_eq!(decision, GuardDecision::Render);
                } else {
                    assert_eq!(decision, GuardDecision::RedirectTo(role.dashboard_path()));
                }
            }
            assert_eq!(guard(&session, None, "/x"), GuardDecision::Render);
        }
    }

    #[test_case(Some(Role::Student), Some("/student/notifications"), "/student/notifications" ; "permitted origin")]
    #[test_case(Some(Role::Rector), Some("/admin/dashboard"), "/rector/dashboard" ; "foreign origin")]
    #[test_case(Some(Role::Admin), Some("/login"), "/admin/dashboard" ; "unscoped origin")]
    #[test_case(Some(Role::Admin), None, "/admin/dashboard" ; "no origin")]
    #[test_case(None, Some("/student/dashboard"), "/" ; "no role")]
    fn post_login_destination(role: Option<Role>, from: Option<&str>, expected: &str) {
        assert_eq!(post_login_target(role, from), expected);
    }
}
