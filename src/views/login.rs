//! Login view.

use std::fmt::Write;

use super::message_or;
use crate::auth::AuthState;

#[derive(Debug, Clone, Default)]
pub struct LoginView {
    pub username: String,
    pub password: String,
    form_error: Option<String>,
}

impl LoginView {
    #[must_use]
    pub fn new(username: &str, password: &str) -> Self {
        Self { username: username.to_owned(), password: password.to_owned(), form_error: None }
    }

    /// Validate the form and log in. Returns `true` once authenticated.
    pub async fn submit(&mut self, auth: &mut AuthState) -> bool {
        self.form_error = None;

        let username = self.username.trim();
        let password = self.password.trim();
        if username.is_empty() || password.is_empty() {
            self.form_error = Some("Both email and password are required.".to_owned());
            return false;
        }

        match auth.login(username, password).await {
            Ok(_) => true,
            Err(e) => {
                self.form_error = Some(message_or(&e, "Unable to login. Please try again."));
                false
            }
        }
    }

    /// Form validation error first, then the auth holder's last login error.
    #[must_use]
    pub fn error<'a>(&'a self, auth: &'a AuthState) -> Option<&'a str> {
        self.form_error.as_deref().or_else(|| auth.error())
    }

    #[must_use]
    pub fn render(&self, auth: &AuthState) -> String {
        let mut out = String::from("Welcome Back\nLog in to manage the assignment users.\n");
        if let Some(error) = self.error(auth) {
            let _ = writeln!(out, "\nerror: {error}");
        }
        out
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
