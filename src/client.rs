//! Chat API Client
//!
//! `reqwest` wrapper used by the CLI. Authenticated calls read the token
//! from durable storage on every request, so a login or logout through
//! another handle on the same storage takes effect immediately.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::http::{
    bearer_header, classify, paths, reject, HttpFailure, LoginForm, Navigator, RequestError,
    ResponseClass, UserProfile,
};
use crate::session::store::KEY_TOKEN;
use crate::session::{DurableStorage, LoginResponse};
use crate::settings::FrontendSettings;

/// Chat API client bound to a durable session store
pub struct ApiClient<S, N> {
    client: Client,
    base: ApiConfig,
    login_path: String,
    storage: S,
    navigator: N,
}

impl<S: DurableStorage, N: Navigator> ApiClient<S, N> {
    pub fn new(
        config: &ApiConfig,
        login_path: impl Into<String>,
        storage: S,
        navigator: N,
    ) -> Result<Self, RequestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base: config.clone(),
            login_path: login_path.into(),
            storage,
            navigator,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Send an authenticated request and decode the JSON response.
    ///
    /// A 401 redirects to the login path before failing.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.storage.get_item(KEY_TOKEN)?;
        let mut builder = self.client.request(method, self.base.url(path));
        if let Some(header) = bearer_header(token.as_deref()) {
            builder = builder.header(AUTHORIZATION, header);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = send(builder).await?;
        self.finish(response, true).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Site settings; sent without credentials
    pub async fn fetch_frontend_settings(&self) -> Result<FrontendSettings, RequestError> {
        let builder = self.client.get(self.base.url(paths::FRONTEND_SETTINGS));
        let response = send(builder).await?;
        self.finish(response, false).await
    }

    /// Exchange credentials for a token. Rejected credentials do not
    /// trigger the login redirect.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, RequestError> {
        let form = LoginForm {
            username: username.to_string(),
            password: password.to_string(),
        };
        let builder = self.client.post(self.base.url(paths::TOKEN)).form(&form);
        let response = send(builder).await?;
        self.finish(response, false).await
    }

    pub async fn current_user(&self) -> Result<UserProfile, RequestError> {
        self.get(paths::CURRENT_USER).await
    }

    async fn finish<T: DeserializeOwned>(
        &self,
        response: Response,
        authenticated: bool,
    ) -> Result<T, RequestError> {
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = response
            .bytes()
            .await
            .map_err(|e| RequestError::Transport(e.to_string()))?;

        if classify(status.as_u16()) == ResponseClass::Success {
            return decode(&body);
        }

        let failure = HttpFailure::new(
            status.as_u16(),
            status_text,
            String::from_utf8_lossy(&body).into_owned(),
        );
        if authenticated {
            Err(reject(failure, &self.navigator, &self.login_path))
        } else {
            Err(RequestError::Status(failure))
        }
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, RequestError> {
    builder.send().await.map_err(|e| {
        tracing::debug!(error = %e, "Request did not complete");
        RequestError::Transport(e.to_string())
    })
}

/// An empty body decodes as JSON `null`
fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, RequestError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(body)?)
}
