//! Client-visible routes and the auth redirect rules between them.

use std::fmt;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Users,
    UserDetail(String),
}

impl Route {
    /// Parse a client path. Unknown paths resolve to `Login`.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<String> = path
            .split('/')
            .filter(|seg| !seg.is_empty())
            .map(decode_segment)
            .collect();
        match segments.as_slice() {
            [users] if users == "users" => Self::Users,
            [users, name] if users == "users" && !name.is_empty() => Self::UserDetail(name.clone()),
            _ => Self::Login,
        }
    }

    #[must_use]
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// Where navigating to this route actually lands for the given auth status.
    #[must_use]
    pub fn resolve(self, authenticated: bool) -> Self {
        match self {
            Self::Login if authenticated => Self::Users,
            route if route.is_protected() && !authenticated => Self::Login,
            route => route,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_owned(),
            Self::Users => "/users".to_owned(),
            Self::UserDetail(name) => format!("/users/{}", encode_segment(name)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// Same reserved set as JavaScript's `encodeURIComponent`.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte) {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

fn decode_segment(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = (bytes[i] == b'%')
            .then(|| segment.get(i + 1..i + 3))
            .flatten()
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                out.push(byte);
                i += 3;
            }
            None => {
                out.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
