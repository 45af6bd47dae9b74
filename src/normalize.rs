//! Response normalization for an inconsistent backend contract.
//!
//! DESIGN
//! ======
//! The backend wraps payloads under `message`, `data`, both, or neither, and
//! names the token / session / status fields differently per endpoint. Each
//! extractor here probes a fixed, priority-ordered list of locations and
//! returns a safe default (`None`, `false`, empty) for anything absent or
//! malformed. No function in this module fails.
//!
//! TRADE-OFFS
//! ==========
//! In `NormalizeMode::Lenient` a payload with neither a success nor an error
//! signal is treated as successful. `NormalizeMode::Strict` only applies that
//! default when a token or session id was found, and lets error text win
//! over a success word in the same status string.

use serde_json::Value;

/// How to treat a login payload that carries no explicit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NormalizeMode {
    #[default]
    Lenient,
    Strict,
}

/// Uniform view of a login payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthDetails {
    pub token: Option<String>,
    pub session_id: Option<String>,
    /// Opaque user identifier: usually a string, sometimes an object. `Null` when unknown.
    pub user: Value,
    pub success_flag: bool,
    pub error_text: Option<String>,
}

impl AuthDetails {
    /// True when at least one proof of identity was derived.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        self.token.is_some() || self.session_id.is_some() || self.success_flag
    }
}

/// Extract auth fields from a login payload.
///
/// `fallback_user` (the submitted username) is used when the payload names no user.
#[must_use]
pub fn normalize_auth(payload: &Value, fallback_user: Option<&str>, mode: NormalizeMode) -> AuthDetails {
    let section = unwrap_section(payload);
    let object = section.is_object().then_some(section);
    let inner = field(object, "data");

    let token = first_scalar([
        field(object, "access_token"),
        field(object, "accessToken"),
        field(object, "token"),
        field(object, "auth_token"),
        field(inner, "access_token"),
        payload.get("access_token"),
        payload.get("token"),
    ]);

    let session_id = first_scalar([
        field(object, "sid"),
        field(object, "session_id"),
        field(object, "session"),
        field(inner, "sid"),
        field(inner, "session_id"),
        payload.get("sid"),
    ]);

    let user = first_truthy([
        field(object, "user"),
        field(object, "username"),
        field(object, "usr"),
        field(inner, "user"),
        payload.get("user"),
    ])
    .cloned()
    .or_else(|| fallback_user.filter(|u| !u.is_empty()).map(|u| Value::String(u.to_owned())))
    .unwrap_or(Value::Null);

    let status = [
        field(object, "success"),
        field(object, "status"),
        field(object, "msg"),
        field(object, "message"),
        payload.get("success"),
        payload.get("status"),
        payload.get("msg"),
        payload.get("message"),
    ]
    .into_iter()
    .flatten()
    .find(|v| !v.is_null() && v.as_str() != Some(""));

    let mut success_flag = match status {
        Some(Value::String(s)) => is_success_text(s),
        Some(Value::Bool(b)) => *b,
        _ => false,
    };

    let error_text = first_truthy([field(object, "error"), field(object, "exc"), field(object, "exception")])
        .map(display_text)
        .or_else(|| match status {
            Some(Value::String(s)) if is_error_text(s) => Some(s.clone()),
            _ => None,
        });

    // Strict: an error message outranks a success word inside it ("token expired").
    if mode == NormalizeMode::Strict && error_text.is_some() {
        success_flag = false;
    }

    if !success_flag && error_text.is_none() {
        success_flag = match mode {
            NormalizeMode::Lenient => true,
            NormalizeMode::Strict => token.is_some() || session_id.is_some(),
        };
    }

    AuthDetails { token, session_id, user, success_flag, error_text }
}

/// Extract the user list from a list payload. Anything unrecognized is an empty list.
#[must_use]
pub fn parse_users(payload: &Value) -> Vec<Value> {
    let root = unwrap_section(payload);
    [Some(root), root.get("data"), root.get("message")]
        .into_iter()
        .flatten()
        .find_map(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Extract a single user record, descending one extra `data` / `message` level.
///
/// Returns `None` when the payload holds no object, which callers report as
/// "User not found.".
#[must_use]
pub fn parse_user(payload: &Value) -> Option<Value> {
    let root = unwrap_section(payload);
    if !root.is_object() {
        return None;
    }
    [root.get("data"), root.get("message")]
        .into_iter()
        .flatten()
        .find(|v| v.is_object())
        .or(Some(root))
        .cloned()
}

/// JavaScript-style truthiness: empty strings, zero, `false` and `null` are falsy.
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// `message ?? data ?? payload`
fn unwrap_section(payload: &Value) -> &Value {
    payload
        .get("message")
        .filter(|v| !v.is_null())
        .or_else(|| payload.get("data").filter(|v| !v.is_null()))
        .unwrap_or(payload)
}

fn field<'a>(value: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    value.and_then(|v| v.get(key))
}

fn first_truthy<'a, const N: usize>(candidates: [Option<&'a Value>; N]) -> Option<&'a Value> {
    candidates.into_iter().flatten().find(|v| truthy(v))
}

fn first_scalar<const N: usize>(candidates: [Option<&Value>; N]) -> Option<String> {
    candidates.into_iter().flatten().filter(|v| truthy(v)).find_map(scalar_text)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_success_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("success") || lower.contains("ok") || contains_logged_in(&lower)
}

fn is_error_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("error") || lower.contains("invalid") || lower.contains("failed")
}

// "logged", optional whitespace, "in"
fn contains_logged_in(lower: &str) -> bool {
    lower
        .match_indices("logged")
        .any(|(i, m)| lower[i + m.len()..].trim_start().starts_with("in"))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
