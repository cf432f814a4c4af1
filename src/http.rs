//! Request outcome handling shared by the native and browser API clients.
//!
//! Every request carries the stored bearer token. A 401 forces navigation
//! to the login page and fails the request; any other non-2xx response
//! fails it without navigating. Nothing is retried.

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::{Role, StorageError};

/// Chat API endpoints used by the front end
pub mod paths {
    pub const FRONTEND_SETTINGS: &str = "/api/frontend-settings";
    pub const TOKEN: &str = "/api/token";
    pub const CURRENT_USER: &str = "/api/users/me";
}

/// Coarse status classes the request wrapper distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    Unauthorized,
    Failure,
}

pub fn classify(status: u16) -> ResponseClass {
    match status {
        200..=299 => ResponseClass::Success,
        401 => ResponseClass::Unauthorized,
        _ => ResponseClass::Failure,
    }
}

/// The response a failed request carries back to its caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFailure {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpFailure {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    /// `detail` field of a JSON error body, as the chat API sends them
    pub fn detail(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        match value.get("detail")? {
            serde_json::Value::String(detail) => Some(detail.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.status_text.is_empty() {
            write!(f, " {}", self.status_text)?;
        }
        Ok(())
    }
}

/// Errors raised by the API clients
#[derive(Error, Debug)]
pub enum RequestError {
    /// The API rejected the token; the login redirect has been issued
    #[error("Unauthorized: {0}")]
    Unauthorized(HttpFailure),

    #[error("Request failed: {0}")]
    Status(HttpFailure),

    /// No response was received
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RequestError {
    /// The failed response, when one was received
    pub fn response(&self) -> Option<&HttpFailure> {
        match self {
            RequestError::Unauthorized(failure) | RequestError::Status(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RequestError::Unauthorized(_))
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(err: serde_json::Error) -> Self {
        RequestError::Decode(err.to_string())
    }
}

/// Client-side navigation used to force the login page on a 401
pub trait Navigator {
    fn redirect(&self, path: &str);
}

impl<T: Navigator + ?Sized> Navigator for &T {
    fn redirect(&self, path: &str) {
        (**self).redirect(path)
    }
}

/// Navigator that remembers where it was sent
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    targets: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent redirect target
    pub fn last(&self) -> Option<String> {
        self.targets.lock().ok()?.last().cloned()
    }

    pub fn count(&self) -> usize {
        self.targets.lock().map(|t| t.len()).unwrap_or(0)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        if let Ok(mut targets) = self.targets.lock() {
            targets.push(path.to_string());
        }
    }
}

/// `Authorization` header value for `token`
pub fn bearer_header(token: Option<&str>) -> Option<String> {
    token
        .filter(|t| !t.is_empty())
        .map(|t| format!("Bearer {}", t))
}

/// Turn a non-2xx response into the error the caller sees, issuing the
/// login redirect on a 401.
pub fn reject<N: Navigator + ?Sized>(
    failure: HttpFailure,
    navigator: &N,
    login_path: &str,
) -> RequestError {
    match classify(failure.status) {
        ResponseClass::Unauthorized => {
            tracing::warn!(status = failure.status, "Token rejected, redirecting to login");
            navigator.redirect(login_path);
            RequestError::Unauthorized(failure)
        }
        _ => {
            tracing::debug!(status = failure.status, "Request failed");
            RequestError::Status(failure)
        }
    }
}

/// Form body of `POST /api/token`
#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Body of `GET /api/users/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_banned: Option<bool>,
    #[serde(default)]
    pub vip_until: Option<String>,
    #[serde(default)]
    pub coins: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(200), ResponseClass::Success);
        assert_eq!(classify(204), ResponseClass::Success);
        assert_eq!(classify(401), ResponseClass::Unauthorized);
        assert_eq!(classify(403), ResponseClass::Failure);
        assert_eq!(classify(500), ResponseClass::Failure);
        assert_eq!(classify(302), ResponseClass::Failure);
    }

    #[test]
    fn test_bearer_header() {
        assert_eq!(bearer_header(Some("abc")).as_deref(), Some("Bearer abc"));
        assert_eq!(bearer_header(Some("")), None);
        assert_eq!(bearer_header(None), None);
    }

    #[test]
    fn test_reject_unauthorized_redirects() {
        let navigator = RecordingNavigator::new();
        let err = reject(HttpFailure::new(401, "Unauthorized", "{}"), &navigator, "/login");

        assert!(err.is_unauthorized());
        assert_eq!(err.response().unwrap().status, 401);
        assert_eq!(navigator.last().as_deref(), Some("/login"));
    }

    #[test]
    fn test_reject_other_status_does_not_redirect() {
        let navigator = RecordingNavigator::new();
        for status in [400, 403, 404, 500, 503] {
            let err = reject(HttpFailure::new(status, "", "oops"), &navigator, "/login");
            assert!(matches!(err, RequestError::Status(_)));
            assert_eq!(err.response().unwrap().body, "oops");
        }
        assert_eq!(navigator.count(), 0);
    }

    #[test]
    fn test_failure_detail() {
        let failure = HttpFailure::new(400, "Bad Request", r#"{"detail": "Incorrect password"}"#);
        assert_eq!(failure.detail().as_deref(), Some("Incorrect password"));
        assert_eq!(failure.to_string(), "HTTP 400 Bad Request");

        assert_eq!(HttpFailure::new(500, "", "<html>").detail(), None);
    }

    #[test]
    fn test_transport_error_has_no_response() {
        let err = RequestError::Transport("timed out".to_string());
        assert!(err.response().is_none());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_user_profile_deserializes() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"id": 3, "username": "dee", "role": "user", "is_active": true, "coins": 12.5}"#,
        )
        .unwrap();
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.coins, Some(12.5));
        assert_eq!(profile.is_banned, None);
    }
}
