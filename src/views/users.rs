//! User list view.

use std::fmt::Write;

use super::{ViewGuard, message_or};
use crate::auth::AuthState;
use crate::normalize::parse_users;
use crate::record::UserCard;

#[derive(Debug)]
pub struct UsersView {
    guard: ViewGuard,
    loading: bool,
    users: Vec<UserCard>,
    error: Option<String>,
}

impl Default for UsersView {
    fn default() -> Self {
        Self::new()
    }
}

impl UsersView {
    #[must_use]
    pub fn new() -> Self {
        Self { guard: ViewGuard::new(), loading: true, users: Vec::new(), error: None }
    }

    #[must_use]
    pub fn guard(&self) -> ViewGuard {
        self.guard.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn users(&self) -> &[UserCard] {
        &self.users
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the list. Does nothing while logged out.
    pub async fn load(&mut self, auth: &AuthState) {
        if !auth.is_authenticated() {
            return;
        }
        self.loading = true;
        self.error = None;

        let result = auth.client().fetch_users(&auth.credentials()).await;
        if !self.guard.is_alive() {
            tracing::debug!("users view dismissed; dropping response");
            return;
        }
        match result {
            Ok(payload) => {
                self.users = parse_users(&payload.into_value()).iter().map(UserCard::from_value).collect();
            }
            Err(e) => self.error = Some(message_or(&e, "Failed to load users")),
        }
        self.loading = false;
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("Assignment Users\nBrowse all available user records.\n\n");
        if self.loading {
            out.push_str("Loading users...\n");
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "error: {error}");
        }
        if !self.loading && self.error.is_none() && self.users.is_empty() {
            out.push_str("No users were found.\n");
        }
        for card in &self.users {
            let _ = writeln!(out, "- {}  ({})", card.name, card.href());
            for (label, value) in [("Gender", &card.gender), ("Age", &card.age), ("Company", &card.company_name)] {
                if let Some(value) = value {
                    let _ = writeln!(out, "    {label}: {value}");
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
