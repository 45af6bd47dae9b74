//! Page view models: login, user list, and user detail.
//!
//! DESIGN
//! ======
//! Each view owns its own state and renders to plain text. A view issues at
//! most one request at a time and checks its `ViewGuard` after every await:
//! once the view has been dismissed, a late response is dropped instead of
//! applied. Errors never escape a view; they become its status message.

pub mod detail;
pub mod login;
pub mod users;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::ApiError;
use crate::auth::AuthState;
use crate::routes::Route;

pub use detail::UserDetailView;
pub use login::LoginView;
pub use users::UsersView;

/// Liveness flag shared between a view and whoever may dismiss it.
#[derive(Debug, Clone)]
pub struct ViewGuard {
    alive: Arc<AtomicBool>,
}

impl Default for ViewGuard {
    fn default() -> Self {
        Self { alive: Arc::new(AtomicBool::new(true)) }
    }
}

impl ViewGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dismiss(&self) {
        self.alive.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Error,
    Success,
}

/// User-visible outcome of the last action in a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Error, text: text.into() }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Success, text: text.into() }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// The error's own message, or `fallback` when it has none.
pub(crate) fn message_or(error: &ApiError, fallback: &str) -> String {
    let message = error.to_string();
    if message.trim().is_empty() { fallback.to_owned() } else { message }
}

// =============================================================================
// PAGE DISPATCH
// =============================================================================

/// The view mounted for a resolved route.
pub enum Page {
    Login(LoginView),
    Users(UsersView),
    Detail(UserDetailView),
}

impl Page {
    /// Resolve `route` against the current auth status and mount its view.
    #[must_use]
    pub fn mount(route: Route, auth: &AuthState) -> (Route, Self) {
        let resolved = route.resolve(auth.is_authenticated());
        let page = match &resolved {
            Route::Login => Self::Login(LoginView::default()),
            Route::Users => Self::Users(UsersView::new()),
            Route::UserDetail(name) => Self::Detail(UserDetailView::new(name)),
        };
        (resolved, page)
    }

    /// Run the view's initial load, if it has one.
    pub async fn load(&mut self, auth: &AuthState) {
        match self {
            Self::Login(_) => {}
            Self::Users(view) => view.load(auth).await,
            Self::Detail(view) => view.load(auth).await,
        }
    }

    #[must_use]
    pub fn render(&self, auth: &AuthState) -> String {
        match self {
            Self::Login(view) => view.render(auth),
            Self::Users(view) => view.render(),
            Self::Detail(view) => view.render(),
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
