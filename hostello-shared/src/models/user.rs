//! Users, credentials and the authentication payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::role::{Role, normalize_role};

/// The logged-in user as held by the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Backend user identifier (the PRN for students).
    pub user_id: String,
    /// Upper-cased role as reported by the server.
    pub role: Option<String>,
    /// Name shown in the shell.
    pub username: String,
    /// Given name, when the backend knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    /// Bearer token the user was authenticated with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SessionUser {
    /// Parsed role, if the stored value names a known role.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    /// Best name for greetings: first name, then username, then id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| Some(self.username.as_str()).filter(|name| !name.is_empty()))
            .unwrap_or(self.user_id.as_str())
    }
}

/// Response of the profile endpoint; only `role` is required to mean anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Role as spelled by the server.
    #[serde(default)]
    pub role: Option<String>,
    /// Backend user id.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Student PRN.
    #[serde(default)]
    pub prn: Option<String>,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Contact number.
    #[serde(default)]
    pub mobile_number: Option<String>,
    /// Remaining profile fields, kept for display.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Build the session user from this profile, filling identity gaps from storage.
    #[must_use]
    pub fn into_user(self, stored_user_id: Option<String>, token: Option<String>) -> SessionUser {
        let user_id = first_present([self.user_id, self.prn.clone(), stored_user_id])
            .unwrap_or_default();
        let username = first_present([self.username, self.prn]).unwrap_or_else(|| user_id.clone());
        SessionUser {
            role: normalize_role(self.role.as_deref()),
            first_name: first_present([self.first_name]),
            mobile_number: first_present([self.mobile_number]),
            user_id,
            username,
            token,
        }
    }
}

/// What the login form submits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Username or PRN typed by the user.
    pub username: String,
    /// Explicit user id, used when the form supplies one instead of a username.
    pub user_id: Option<String>,
    /// Password typed by the user.
    pub password: String,
}

impl Credentials {
    /// Credentials for a username/password pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            user_id: None,
            password: password.into(),
        }
    }

    /// Identifier sent to the backend: the username, else the explicit user id.
    #[must_use]
    pub fn login_id(&self) -> String {
        first_present([Some(self.username.clone()), self.user_id.clone()]).unwrap_or_default()
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// See [`Credentials::login_id`].
    pub user_id: String,
    /// Plain password.
    pub password: String,
}

impl From<&Credentials> for LoginRequest {
    fn from(credentials: &Credentials) -> Self {
        Self {
            user_id: credentials.login_id(),
            password: credentials.password.clone(),
        }
    }
}

/// Body returned by `POST /auth/login`.
///
/// The backend has shipped the access token under both `token` and
/// `accessToken`; either is accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Access token, current spelling.
    #[serde(default)]
    pub token: Option<String>,
    /// Access token, older spelling.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Refresh token, when the backend issues one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Role of the account.
    #[serde(default)]
    pub role: Option<String>,
    /// Backend user id.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Student PRN.
    #[serde(default)]
    pub prn: Option<String>,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Contact number.
    #[serde(default)]
    pub mobile_number: Option<String>,
    /// Set by the backend instead of a token when the login was refused.
    #[serde(default)]
    pub error: Option<String>,
}

impl LoginResponse {
    /// The issued access token, `token` taking precedence over `accessToken`.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        [self.token.as_deref(), self.access_token.as_deref()]
            .into_iter()
            .flatten()
            .find(|token| is_present(token))
    }

    /// Refresh token, if one was issued.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|token| is_present(token))
    }

    /// User id resolved through server id, server PRN, then the submitted credentials.
    #[must_use]
    pub fn resolve_user_id(&self, credentials: &Credentials) -> String {
        first_present([
            self.user_id.clone(),
            self.prn.clone(),
            credentials.user_id.clone(),
            Some(credentials.username.clone()),
        ])
        .unwrap_or_default()
    }

    /// Session user built from this response, with `user_id` as the fallback for names.
    #[must_use]
    pub fn to_user(&self, user_id: &str, token: &str) -> SessionUser {
        SessionUser {
            user_id: user_id.to_string(),
            role: normalize_role(self.role.as_deref()),
            username: first_present([self.username.clone()]).unwrap_or_else(|| user_id.to_string()),
            first_name: first_present([self.first_name.clone()]).or_else(|| Some(user_id.to_string())),
            mobile_number: first_present([self.mobile_number.clone()]),
            token: Some(token.to_string()),
        }
    }
}

/// Body of `POST /auth/refreshToken`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The stored refresh token.
    pub refresh_token: String,
}

/// Body returned by `POST /auth/refreshToken`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Newly issued access token.
    #[serde(default, alias = "token")]
    pub access_token: Option<String>,
}

fn is_present(value: &str) -> bool {
    !value.is_empty() && value != "undefined" && value != "null"
}

fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| is_present(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn access_token_accepts_either_field() {
        let only_access: LoginResponse =
            serde_json::from_value(json!({ "accessToken": "tok1" })).unwrap();
        assert_eq!(only_access.access_token(), Some("tok1"));

        let only_token: LoginResponse = serde_json::from_value(json!({ "token": "tok2" })).unwrap();
        assert_eq!(only_token.access_token(), Some("tok2"));

        let neither: LoginResponse = serde_json::from_value(json!({ "role": "ADMIN" })).unwrap();
        assert_eq!(neither.access_token(), None);
    }

    #[test]
    fn user_id_fallback_order() {
        let credentials = Credentials {
            username: "typed".to_string(),
            user_id: Some("explicit".to_string()),
            password: "pw".to_string(),
        };

        let full = LoginResponse {
            user_id: Some("server".to_string()),
            prn: Some("prn".to_string()),
            ..Default::default()
        };
        assert_eq!(full.resolve_user_id(&credentials), "server");

        let prn_only = LoginResponse {
            prn: Some("prn".to_string()),
            ..Default::default()
        };
        assert_eq!(prn_only.resolve_user_id(&credentials), "prn");

        let empty = LoginResponse::default();
        assert_eq!(empty.resolve_user_id(&credentials), "explicit");

        let bare = Credentials::new("typed", "pw");
        assert_eq!(empty.resolve_user_id(&bare), "typed");
    }

    #[test]
    fn user_names_fall_back_to_resolved_id() {
        let response = LoginResponse {
            role: Some("student".to_string()),
            ..Default::default()
        };
        let user = response.to_user("23UCS001", "tok");
        assert_eq!(user.username, "23UCS001");
        assert_eq!(user.first_name.as_deref(), Some("23UCS001"));
        assert_eq!(user.role.as_deref(), Some("STUDENT"));
        assert_eq!(user.role(), Some(Role::Student));
    }

    #[test]
    fn login_request_uses_camel_case() {
        let request = LoginRequest::from(&Credentials::new("23UCS001", "secret1"));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, json!({ "userId": "23UCS001", "password": "secret1" }));
    }

    #[test]
    fn profile_keeps_unknown_fields() {
        let profile: Profile = serde_json::from_value(json!({
            "role": "rector",
            "userId": "r-1",
            "hostelBlock": "B"
        }))
        .unwrap();
        assert_eq!(profile.extra.get("hostelBlock"), Some(&json!("B")));

        let user = profile.into_user(None, Some("tok".to_string()));
        assert_eq!(user.role.as_deref(), Some("RECTOR"));
        assert_eq!(user.user_id, "r-1");
        assert_eq!(user.username, "r-1");
    }

    #[test]
    fn display_name_prefers_first_name() {
        let mut user = LoginResponse::default().to_user("u-1", "tok");
        user.first_name = Some("Asha".to_string());
        assert_eq!(user.display_name(), "Asha");
        user.first_name = None;
        assert_eq!(user.display_name(), "u-1");
    }
}
