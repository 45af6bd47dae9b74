//! User detail view: load one record, edit it, save it.
//!
//! The save action is gated by the form's dirty check; after a successful
//! save the server's copy of the record becomes the new baseline.

use std::fmt::Write;

use serde_json::Value;

use super::{StatusMessage, ViewGuard, message_or};
use crate::api::{ApiClient, ApiError, Credentials};
use crate::auth::AuthState;
use crate::normalize::parse_user;
use crate::record::{FormError, UserField, UserForm, UserRecord};

#[derive(Debug)]
pub struct UserDetailView {
    user_name: String,
    guard: ViewGuard,
    loading: bool,
    saving: bool,
    /// Last record received from the server, in wire form.
    initial: Option<Value>,
    form: Option<UserForm>,
    status: Option<StatusMessage>,
}

impl UserDetailView {
    #[must_use]
    pub fn new(user_name: &str) -> Self {
        Self {
            user_name: user_name.to_owned(),
            guard: ViewGuard::new(),
            loading: true,
            saving: false,
            initial: None,
            form: None,
            status: None,
        }
    }

    #[must_use]
    pub fn guard(&self) -> ViewGuard {
        self.guard.clone()
    }

    #[must_use]
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn form(&self) -> Option<&UserForm> {
        self.form.as_ref()
    }

    #[must_use]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.form.as_ref().is_some_and(UserForm::is_dirty)
    }

    /// Whether the save action is enabled.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.is_dirty() && !self.saving
    }

    /// Edit one field of the loaded record.
    ///
    /// # Errors
    ///
    /// `FormError::NotLoaded` before a record has loaded, or the field's
    /// validation error.
    pub fn set_field(&mut self, field: UserField, value: &str) -> Result<(), FormError> {
        self.form.as_mut().ok_or(FormError::NotLoaded)?.set(field, value)
    }

    /// Fetch the record. Does nothing while logged out.
    pub async fn load(&mut self, auth: &AuthState) {
        if !auth.is_authenticated() {
            return;
        }
        self.loading = true;
        self.status = None;

        let result = fetch_record(auth.client(), &self.user_name, &auth.credentials()).await;
        if !self.guard.is_alive() {
            tracing::debug!(user = %self.user_name, "detail view dismissed; dropping response");
            return;
        }
        match result {
            Ok(data) => {
                self.form = Some(UserForm::new(UserRecord::from_value(&data, &self.user_name)));
                self.initial = Some(data);
            }
            Err(e) => self.status = Some(StatusMessage::error(message_or(&e, "Failed to load user."))),
        }
        self.loading = false;
    }

    /// Submit the edited fields. Ignored while the save action is disabled.
    pub async fn save(&mut self, auth: &AuthState) {
        if !self.can_save() {
            return;
        }
        if !auth.is_authenticated() {
            self.status = Some(StatusMessage::error("You must be logged in to perform this action."));
            return;
        }
        let Some(values) = self.form.as_ref().map(|f| f.values().clone()) else {
            return;
        };

        self.saving = true;
        self.status = None;
        let result = auth
            .client()
            .update_user(&self.user_name, &values.to_update_body(), &auth.credentials())
            .await;
        if !self.guard.is_alive() {
            tracing::debug!(user = %self.user_name, "detail view dismissed; dropping save response");
            return;
        }
        match result {
            Ok(payload) => {
                let next = parse_user(&payload.into_value())
                    .unwrap_or_else(|| values.merged_over(self.initial.as_ref().unwrap_or(&Value::Null)));
                let record = UserRecord::from_value(&next, &values.name);
                if let Some(form) = self.form.as_mut() {
                    form.reset(record);
                }
                self.initial = Some(next);
                self.status = Some(StatusMessage::success("User saved successfully."));
                tracing::info!(user = %self.user_name, "user saved");
            }
            Err(e) => self.status = Some(StatusMessage::error(message_or(&e, "Could not save changes."))),
        }
        self.saving = false;
    }

    #[must_use]
    pub fn render(&self) -> String {
        if self.loading {
            return "Loading user...\n".to_owned();
        }
        let title = self
            .form
            .as_ref()
            .map(|f| f.values().name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(self.user_name.as_str());
        let mut out = format!("{title}\nReview and update user details.\n\n");
        if let Some(form) = &self.form {
            for field in UserField::ALL {
                let _ = writeln!(out, "{:<20} {}", format!("{}:", field.label()), form.values().get(field));
            }
        }
        if let Some(status) = &self.status {
            let prefix = if status.is_error() { "error" } else { "ok" };
            let _ = writeln!(out, "\n{prefix}: {}", status.text);
        }
        let save = if self.saving {
            "Saving..."
        } else if self.can_save() {
            "Save changes"
        } else {
            "Save changes (no changes)"
        };
        let _ = writeln!(out, "\n[{save}]");
        out
    }
}

/// Fetch one user record, failing with `ApiError::NotFound` when the payload
/// holds none.
///
/// # Errors
///
/// Any request failure, or `NotFound`.
pub async fn fetch_record(client: &ApiClient, user_name: &str, credentials: &Credentials) -> Result<Value, ApiError> {
    let payload = client.fetch_user_by_name(user_name, credentials).await?;
    parse_user(&payload.into_value()).ok_or(ApiError::NotFound)
}

#[cfg(test)]
#[path = "detail_test.rs"]
mod tests;
