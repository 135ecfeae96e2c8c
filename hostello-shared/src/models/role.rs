//! Roles, their landing pages and role-specific routes.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::EnumIter;

/// Entry point for visitors without a session.
pub const LOGIN_PATH: &str = "/login";

/// First-run registration of the root administrator.
pub const ROOT_REGISTER_PATH: &str = "/root-register";

/// Root of the application; also the landing path for unknown roles.
pub const HOME_PATH: &str = "/";

/// Roles recognised by the hostel backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Hostel administration.
    Admin,
    /// Resident warden of a hostel.
    Rector,
    /// Hostel resident.
    Student,
}

/// Backend routes whose path depends on the caller's role.
#[derive(Debug, PartialEq, Eq)]
pub struct RoleEndpoints {
    /// Session termination route.
    pub logout: &'static str,
    /// One-time password request for password resets, if the role has one.
    pub request_otp: Option<&'static str>,
    /// Password reset with a previously issued OTP, if the role has one.
    pub reset_password: Option<&'static str>,
    /// Complaint listing visible to the role.
    pub complaints: &'static str,
    /// Complaint registration route for the role.
    pub register_complaint: &'static str,
}

const ADMIN_ENDPOINTS: RoleEndpoints = RoleEndpoints {
    logout: "/auth/login/admin/logout",
    request_otp: Some("/auth/login/admin/requestotp"),
    reset_password: Some("/auth/login/admin/resetpassword"),
    complaints: "/auth/login/rector/complaints",
    register_complaint: "/auth/login/rector/complaintRegistration",
};

const RECTOR_ENDPOINTS: RoleEndpoints = RoleEndpoints {
    logout: "/auth/login/rector/logout",
    request_otp: Some("/auth/login/rector/request-otp"),
    reset_password: Some("/auth/login/rector/reset-password"),
    complaints: "/auth/login/rector/complaints",
    register_complaint: "/auth/login/rector/complaintRegistration",
};

const STUDENT_ENDPOINTS: RoleEndpoints = RoleEndpoints {
    logout: "/auth/login/student/logout",
    request_otp: None,
    reset_password: None,
    complaints: "/auth/login/student/complaints",
    register_complaint: "/auth/login/student/complaintRegistration",
};

impl Role {
    /// Canonical upper-case spelling used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Rector => "RECTOR",
            Self::Student => "STUDENT",
        }
    }

    /// Landing page for an authenticated user holding this role.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Rector => "/rector/dashboard",
            Self::Student => "/student/dashboard",
        }
    }

    /// Role-specific backend routes.
    #[must_use]
    pub const fn endpoints(self) -> &'static RoleEndpoints {
        match self {
            Self::Admin => &ADMIN_ENDPOINTS,
            Self::Rector => &RECTOR_ENDPOINTS,
            Self::Student => &STUDENT_ENDPOINTS,
        }
    }

    /// Logout route for an optional role; unrecognised roles use the student route.
    #[must_use]
    pub fn logout_path(role: Option<Self>) -> &'static str {
        role.unwrap_or(Self::Student).endpoints().logout
    }

    /// Parse a raw role string, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        normalize_role(Some(raw)).and_then(|role| match role.as_str() {
            "ADMIN" => Some(Self::Admin),
            "RECTOR" => Some(Self::Rector),
            "STUDENT" => Some(Self::Student),
            _ => None,
        })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or("unknown role")
    }
}

/// Upper-case a raw role value, treating blank input as absent.
#[must_use]
pub fn normalize_role(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_uppercase)
}

/// Resolve the landing path for any role spelling, falling back to `/`.
#[must_use]
pub fn dashboard_path(role: Option<&str>) -> &'static str {
    role.and_then(Role::parse)
        .map_or(HOME_PATH, Role::dashboard_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    #[test_case(Some("admin"), "/admin/dashboard" ; "lower case admin")]
    #[test_case(Some("ADMIN"), "/admin/dashboard" ; "upper case admin")]
    #[test_case(Some("Rector"), "/rector/dashboard" ; "mixed case rector")]
    #[test_case(Some("student"), "/student/dashboard" ; "student")]
    #[test_case(Some(" student "), "/student/dashboard" ; "padded student")]
    #[test_case(Some("bogus"), "/" ; "unknown role")]
    #[test_case(Some(""), "/" ; "empty role")]
    #[test_case(None, "/" ; "absent role")]
    fn dashboard_path_normalizes(role: Option<&str>, expected: &str) {
        assert_eq!(dashboard_path(role), expected);
    }

    #[test]
    fn role_roundtrip() {
        for role in Role::iter() {
            assert_eq!(Role::from_str(role.as_str()), Ok(role));
            assert_eq!(Role::parse(&role.as_str().to_lowercase()), Some(role));
            assert_eq!(role.to_string(), role.as_str());
        }
    }

    #[test]
    fn role_serializes_upper_case() {
        let json = serde_json::to_string(&Role::Rector).unwrap();
        assert_eq!(json, "\"RECTOR\"");
    }

    #[test]
    fn normalize_role_blank_is_absent() {
        assert_eq!(normalize_role(Some("   ")), None);
        assert_eq!(normalize_role(Some("warden")), Some("WARDEN".to_string()));
    }

    #[test]
    fn endpoint_table_matches_backend_routes() {
        assert_eq!(Role::Admin.endpoints().logout, "/auth/login/admin/logout");
        assert_eq!(
            Role::Rector.endpoints().request_otp,
            Some("/auth/login/rector/request-otp")
        );
        assert_eq!(Role::Student.endpoints().reset_password, None);
        assert_eq!(Role::logout_path(None), "/auth/login/student/logout");
    }
}
