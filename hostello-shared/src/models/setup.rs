//! First-run root administrator setup.

use serde::{Deserialize, Serialize};

/// Response of `GET /admin/exists`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootAdminStatus {
    /// `true` once a root administrator is registered.
    #[serde(default)]
    pub exists: bool,
}

/// Body of `POST /admin/register-root`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RootAdminRequest {
    /// Login name of the new administrator.
    pub username: String,
    /// Chosen password.
    pub password: String,
    /// Contact number.
    pub mobile_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_exists_flag_reads_as_false() {
        let status: RootAdminStatus = serde_json::from_value(json!({})).unwrap();
        assert!(!status.exists);
    }

    #[test]
    fn register_request_wire_names() {
        let request = RootAdminRequest {
            username: "root".to_string(),
            password: "secret1".to_string(),
            mobile_number: "9999999999".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["mobileNumber"], "9999999999");
    }
}
