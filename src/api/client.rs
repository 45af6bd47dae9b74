//! REST request helper and the backend endpoint calls built on it.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures surface as `ApiError::Transport`; any non-2xx status
//! becomes `ApiError::Status` carrying the parsed body so views can show the
//! backend's own message. Nothing here retries.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::Value;

use super::config::{ApiConfig, Endpoints};
use super::types::{ApiError, Credentials, Payload};

/// Header carrying the backend session id.
pub const SESSION_HEADER: &str = "X-Frappe-Sid";

const JSON_MIME: &str = "application/json";

/// Per-call request options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions<'a> {
    pub params: &'a [(&'a str, &'a str)],
    pub body: Option<&'a Value>,
    pub credentials: Option<&'a Credentials>,
}

pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl ApiClient {
    /// Build a client for the configured backend. The client keeps a cookie
    /// jar so cookie-based sessions survive across calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeouts.request() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.timeouts.connect() {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(Self { http, endpoints: config.endpoints() })
    }

    /// Issue one REST call and return the parsed body.
    ///
    /// # Errors
    ///
    /// `InvalidUrl` for an unparsable URL, `Transport` when no response
    /// arrives, `Status` for a non-success HTTP status.
    pub async fn request(&self, method: Method, url: &str, opts: RequestOptions<'_>) -> Result<Payload, ApiError> {
        let url = build_url(url, opts.params)?;
        tracing::debug!(%method, path = url.path(), "api request");

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(ACCEPT, JSON_MIME);
        if method != Method::GET {
            request = request.header(CONTENT_TYPE, JSON_MIME);
            if let Some(body) = opts.body {
                request = request.json(body);
            }
        }
        if let Some(credentials) = opts.credentials {
            if let Some(token) = &credentials.token {
                request = request.header(AUTHORIZATION, format!("token {token}"));
            }
            if let Some(session_id) = &credentials.session_id {
                request = request.header(SESSION_HEADER, session_id.as_str());
            }
        }

        let response = request.send().await?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains(JSON_MIME));
        let text = response.text().await?;
        let payload = if is_json {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => Payload::Json(value),
                Err(e) => {
                    tracing::warn!(path = url.path(), error = %e, "response declared JSON but did not parse");
                    Payload::Text(text)
                }
            }
        } else {
            Payload::Text(text)
        };

        if !status.is_success() {
            tracing::debug!(path = url.path(), status = status.as_u16(), "api request failed");
            return Err(ApiError::Status { status: status.as_u16(), message: payload.error_message(), details: payload });
        }
        Ok(payload)
    }

    /// `GET` the login endpoint with `usr` / `pwd` query parameters.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn login_user(&self, username: &str, password: &str) -> Result<Payload, ApiError> {
        let params = [("usr", username), ("pwd", password)];
        let opts = RequestOptions { params: &params, ..RequestOptions::default() };
        self.request(Method::GET, &self.endpoints.login, opts).await
    }

    /// `GET` every assignment user.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn fetch_users(&self, credentials: &Credentials) -> Result<Payload, ApiError> {
        let opts = RequestOptions { credentials: Some(credentials), ..RequestOptions::default() };
        self.request(Method::GET, &self.endpoints.list_users, opts).await
    }

    /// `GET` one assignment user by its `user_name`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn fetch_user_by_name(&self, user_name: &str, credentials: &Credentials) -> Result<Payload, ApiError> {
        let params = [("user_name", user_name)];
        let opts = RequestOptions { params: &params, credentials: Some(credentials), ..RequestOptions::default() };
        self.request(Method::GET, &self.endpoints.single_user, opts).await
    }

    /// `PUT` the editable fields of one assignment user.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn update_user(&self, user_name: &str, body: &Value, credentials: &Credentials) -> Result<Payload, ApiError> {
        let mut url = Url::parse(&self.endpoints.update_user).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.endpoints.update_user.clone()))?
            .pop_if_empty()
            .push(user_name);
        let opts = RequestOptions { body: Some(body), credentials: Some(credentials), ..RequestOptions::default() };
        self.request(Method::PUT, url.as_str(), opts).await
    }
}

fn build_url(url: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
    let mut url = Url::parse(url).map_err(|e| ApiError::InvalidUrl(format!("{url}: {e}")))?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
