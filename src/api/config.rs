//! API configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::normalize::NormalizeMode;

pub const DEFAULT_API_BASE: &str = "https://assignment.8848digitalerp.com";
pub const DEFAULT_STATE_DIR: &str = ".assignment-portal";

const LOGIN_PATH: &str = "/api/method/assignment.API.access_token.get_access_token";
const LIST_USERS_PATH: &str = "/api/method/assignment.API.all_users_api.get_user";
const SINGLE_USER_PATH: &str = "/api/method/assignment.API.specific_user.get_specific";
const UPDATE_USER_PATH: &str = "/api/resource/Assignment";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

/// Optional HTTP timeouts. `None` leaves the client default in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: Option<u64>,
    pub connect_secs: Option<u64>,
}

impl ApiTimeouts {
    #[must_use]
    pub fn request(&self) -> Option<Duration> {
        self.request_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Option<Duration> {
        self.connect_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub state_dir: PathBuf,
    pub timeouts: ApiTimeouts,
    pub mode: NormalizeMode,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_owned(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            timeouts: ApiTimeouts::default(),
            mode: NormalizeMode::Lenient,
        }
    }
}

impl ApiConfig {
    /// Build typed API config from environment variables.
    ///
    /// Optional:
    /// - `ASSIGNMENT_API_BASE`: backend origin, default [`DEFAULT_API_BASE`]
    /// - `ASSIGNMENT_STATE_DIR`: session storage directory, default [`DEFAULT_STATE_DIR`]
    /// - `ASSIGNMENT_REQUEST_TIMEOUT_SECS`: unset means client default
    /// - `ASSIGNMENT_CONNECT_TIMEOUT_SECS`: unset means client default
    /// - `ASSIGNMENT_STRICT_LOGIN`: `true` requires a token or session id to log in
    ///
    /// # Errors
    ///
    /// Returns an error when a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("ASSIGNMENT_API_BASE")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_owned());
        let state_dir = std::env::var("ASSIGNMENT_STATE_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_DIR), PathBuf::from);
        let timeouts = ApiTimeouts {
            request_secs: env_parse_u64("ASSIGNMENT_REQUEST_TIMEOUT_SECS")?,
            connect_secs: env_parse_u64("ASSIGNMENT_CONNECT_TIMEOUT_SECS")?,
        };
        let mode = match env_bool("ASSIGNMENT_STRICT_LOGIN")? {
            Some(true) => NormalizeMode::Strict,
            Some(false) | None => NormalizeMode::Lenient,
        };

        Ok(Self { base_url: base_url.trim_end_matches('/').to_owned(), state_dir, timeouts, mode })
    }

    /// Replace the base URL, trimming any trailing slash.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().trim_end_matches('/').to_owned();
        self
    }

    #[must_use]
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.base_url)
    }
}

/// Absolute endpoint URLs derived from the API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub list_users: String,
    pub single_user: String,
    pub update_user: String,
}

impl Endpoints {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            login: format!("{base}{LOGIN_PATH}"),
            list_users: format!("{base}{LIST_USERS_PATH}"),
            single_user: format!("{base}{SINGLE_USER_PATH}"),
            update_user: format!("{base}{UPDATE_USER_PATH}"),
        }
    }
}

fn env_parse_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Parse(format!("{key} must be a whole number of seconds, got '{raw}'"))),
        _ => Ok(None),
    }
}

fn env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    let Ok(raw) = std::env::var(key) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Parse(format!("{key} must be a boolean, got '{raw}'"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
