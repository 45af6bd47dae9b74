//! Auth state: the normalized session, its persistence, login and logout.
//!
//! ARCHITECTURE
//! ============
//! The session is the only durable client state. It is written through the
//! `KeyValueStore` port on every change and read back once at construction;
//! a stored session that cannot be read starts the process logged out.
//! Storage failures after construction are logged and never fail a login or
//! logout; the in-memory session stays authoritative for the process.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::api::{ApiClient, ApiError, Credentials};
use crate::normalize::{NormalizeMode, normalize_auth};
use crate::storage::{KeyValueStore, StorageError};

/// Fixed storage key for the persisted session.
pub const STORAGE_KEY: &str = "assignment-auth";

const MISSING_SESSION_MESSAGE: &str =
    "Login response did not include token or session information. Please verify the API.";

/// Locally held proof of authentication plus cached user identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user: Value,
    #[serde(default)]
    pub success_flag: bool,
    /// Login payload exactly as received.
    #[serde(default)]
    pub raw: Value,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_in_at: OffsetDateTime,
}

impl Session {
    /// Token, session id and success flag are alternative proofs; any one suffices.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
            || self.session_id.as_deref().is_some_and(|s| !s.is_empty())
            || self.success_flag
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            token: self.token.clone().filter(|t| !t.is_empty()),
            session_id: self.session_id.clone().filter(|s| !s.is_empty()),
        }
    }

    /// Printable user identity.
    #[must_use]
    pub fn user_label(&self) -> String {
        match &self.user {
            Value::Null => "unknown".to_owned(),
            Value::String(s) => s.clone(),
            other => ["name", "full_name", "email", "user"]
                .iter()
                .find_map(|k| other.get(k).and_then(Value::as_str))
                .map_or_else(|| other.to_string(), str::to_owned),
        }
    }
}

pub struct AuthState {
    client: Arc<ApiClient>,
    store: Arc<dyn KeyValueStore>,
    mode: NormalizeMode,
    session: Option<Session>,
    error: Option<String>,
}

impl AuthState {
    /// Initialise the store and restore any persisted session.
    ///
    /// A stored value that cannot be read or does not parse is treated as no
    /// session and logged as a warning.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be initialised.
    pub fn new(client: Arc<ApiClient>, store: Arc<dyn KeyValueStore>, mode: NormalizeMode) -> Result<Self, StorageError> {
        store.init()?;
        let session = match store.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse stored auth data");
                    if let Err(e) = store.clear(STORAGE_KEY) {
                        tracing::warn!(error = %e, "failed to clear stored auth data");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored auth data");
                None
            }
        };
        Ok(Self { client, store, mode, session, error: None })
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_authenticated)
    }

    /// Credentials for protected calls; empty when logged out.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        self.session.as_ref().map(Session::credentials).unwrap_or_default()
    }

    /// Message of the last failed login, cleared by the next attempt or logout.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Log in and persist the resulting session.
    ///
    /// # Errors
    ///
    /// Any request failure, or `ApiError::MissingSession` when the payload
    /// carries no token, session id, or success evidence. Either way the
    /// previous session is cleared.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session, ApiError> {
        self.error = None;
        match self.request_session(username, password).await {
            Ok(session) => {
                tracing::info!(user = %session.user_label(), "logged in");
                self.replace_session(Some(session.clone()));
                Ok(session)
            }
            Err(e) => {
                tracing::info!(error = %e, "login failed");
                self.error = Some(e.to_string());
                self.replace_session(None);
                Err(e)
            }
        }
    }

    /// Drop the session, its persisted copy, and any error state.
    pub fn logout(&mut self) {
        self.replace_session(None);
        self.error = None;
        tracing::info!("logged out");
    }

    async fn request_session(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let raw = self.client.login_user(username, password).await?.into_value();
        let details = normalize_auth(&raw, Some(username), self.mode);
        if !details.has_identity() {
            return Err(ApiError::MissingSession(
                details.error_text.unwrap_or_else(|| MISSING_SESSION_MESSAGE.to_owned()),
            ));
        }
        Ok(Session {
            token: details.token,
            session_id: details.session_id,
            user: details.user,
            success_flag: details.success_flag,
            raw,
            logged_in_at: OffsetDateTime::now_utc(),
        })
    }

    fn replace_session(&mut self, session: Option<Session>) {
        if let Err(e) = persist(self.store.as_ref(), session.as_ref()) {
            tracing::warn!(error = %e, "failed to persist auth data");
        }
        self.session = session;
    }
}

fn persist(store: &dyn KeyValueStore, session: Option<&Session>) -> Result<(), StorageError> {
    match session {
        Some(session) => store.set(STORAGE_KEY, &serde_json::to_string(session)?),
        None => store.clear(STORAGE_KEY),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
