//! HTTP API Client
//!
//! `gloo-net` wrapper for the chat API. Authenticated calls read the token
//! from local storage on every request. A 401 sends the browser to the
//! login page and fails the call with the response attached.

use chatdesk::http::{
    bearer_header, classify, paths, reject, HttpFailure, Navigator, RequestError, ResponseClass,
    UserProfile,
};
use chatdesk::session::store::KEY_TOKEN;
use chatdesk::session::{DurableStorage, LoginResponse};
use chatdesk::settings::FrontendSettings;
use chatdesk::RouterConfig;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::state::shared_storage;

/// Local storage key that overrides the API origin
pub const API_URL_KEY: &str = "apiUrl";

/// API origin; empty means same-origin
pub fn get_api_base() -> String {
    let url = shared_storage()
        .get_item(API_URL_KEY)
        .ok()
        .flatten()
        .unwrap_or_default();
    url.trim_end_matches('/').to_string()
}

fn url(path: &str) -> String {
    join_url(&get_api_base(), path)
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Full page navigation through `window.location`
pub struct WindowNavigator;

impl Navigator for WindowNavigator {
    fn redirect(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().set_href(path) {
            tracing::error!(path, error = ?e, "Failed to redirect");
        }
    }
}

fn login_path() -> String {
    RouterConfig::default().login_path
}

fn authorize(builder: RequestBuilder) -> RequestBuilder {
    let token = match shared_storage().get_item(KEY_TOKEN) {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read token");
            None
        }
    };
    match bearer_header(token.as_deref()) {
        Some(header) => builder.header("Authorization", &header),
        None => builder,
    }
}

/// Authenticated `GET`
pub async fn get<T: DeserializeOwned>(path: &str) -> Result<T, RequestError> {
    let response = authorize(Request::get(&url(path))).send().await;
    finish(response, true).await
}

/// Site settings; sent without credentials
pub async fn fetch_frontend_settings() -> Result<FrontendSettings, RequestError> {
    let response = Request::get(&url(paths::FRONTEND_SETTINGS)).send().await;
    finish(response, false).await
}

/// Exchange credentials for a token
pub async fn login(username: &str, password: &str) -> Result<LoginResponse, RequestError> {
    let form = web_sys::UrlSearchParams::new()
        .map_err(|e| RequestError::Transport(format!("{:?}", e)))?;
    form.append("username", username);
    form.append("password", password);

    let request = Request::post(&url(paths::TOKEN))
        .body(form)
        .map_err(|e| RequestError::Transport(e.to_string()))?;
    finish(request.send().await, false).await
}

pub async fn current_user() -> Result<UserProfile, RequestError> {
    get(paths::CURRENT_USER).await
}

async fn finish<T: DeserializeOwned>(
    response: Result<Response, gloo_net::Error>,
    authenticated: bool,
) -> Result<T, RequestError> {
    let response = response.map_err(|e| RequestError::Transport(e.to_string()))?;
    let body = response
        .text()
        .await
        .map_err(|e| RequestError::Transport(e.to_string()))?;

    if classify(response.status()) == ResponseClass::Success {
        return decode(&body);
    }

    let failure = HttpFailure::new(response.status(), response.status_text(), body);
    if authenticated {
        Err(reject(failure, &WindowNavigator, &login_path()))
    } else {
        Err(RequestError::Status(failure))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, RequestError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("", "/api/token"), "/api/token");
        assert_eq!(join_url("http://api.test/", "/api/token"), "http://api.test/api/token");
    }

    #[test]
    fn test_decode_empty_body() {
        let value: Option<u32> = decode("").unwrap();
        assert_eq!(value, None);
        let value: u32 = decode("7").unwrap();
        assert_eq!(value, 7);
    }
}
