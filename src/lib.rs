//! # assignment-portal
//!
//! Client for the assignment-user REST backend: authenticate, then list and
//! edit assignment user records.
//!
//! The backend's response shapes are inconsistent, so every payload passes
//! through `normalize` before anything else looks at it. `auth` owns the
//! session and persists it through the `storage` port; `views` hold the
//! login, list and detail page state that the CLI renders.

pub mod api;
pub mod auth;
pub mod normalize;
pub mod record;
pub mod routes;
pub mod storage;
pub mod views;

#[cfg(test)]
mod test_support;
