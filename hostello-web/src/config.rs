//! Frontend configuration module
//!
//! Values are baked in at compile time from `HOSTELLO_*` environment variables.

use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "/api";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// How long a success banner stays up.
pub const SUCCESS_BANNER: Duration = Duration::from_secs(3);
/// How long the "new notifications" announcement stays up.
pub const ARRIVAL_BANNER: Duration = Duration::from_secs(5);

/// Frontend configuration for the backend location and polling cadence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Base URL every API path is appended to
    pub api_base_url: String,
    /// Interval between notification polls
    pub poll_interval: Duration,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self::from_values(
            option_env!("HOSTELLO_API_BASE_URL"),
            option_env!("HOSTELLO_POLL_INTERVAL_SECS"),
        )
    }
}

impl FrontendConfig {
    /// Create a new frontend configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw values; blank or unparseable entries fall back to defaults.
    pub fn from_values(api_base_url: Option<&str>, poll_interval_secs: Option<&str>) -> Self {
        let api_base_url = api_base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string();
        let poll_secs = poll_interval_secs
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        Self {
            api_base_url,
            poll_interval: Duration::from_secs(poll_secs),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Poll interval in whole milliseconds, as the timer hooks expect.
    pub fn poll_interval_millis(&self) -> u32 {
        u32::try_from(self.poll_interval.as_millis()).unwrap_or(u32::MAX)
    }
}
