//! Site settings fetched once at startup from `GET /api/frontend-settings`.

use serde::{Deserialize, Serialize};

use crate::http::RequestError;

/// Title shown until the settings arrive
pub const LOADING_TITLE: &str = "Loading...";

/// Wire shape of the frontend settings endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendSettings {
    pub title: Option<String>,
    pub logo: Option<String>,
    pub vip_benefits: Option<String>,
    pub user_guide: Option<String>,
}

impl FrontendSettings {
    fn placeholder() -> Self {
        Self {
            title: Some(LOADING_TITLE.to_string()),
            ..Self::default()
        }
    }
}

/// Cached site settings plus fetch status
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsStore {
    pub settings: FrontendSettings,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self {
            settings: FrontendSettings::placeholder(),
            loading: false,
            error: None,
        }
    }
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Record the outcome of a fetch. Failures keep whatever was there.
    pub fn apply(&mut self, result: Result<FrontendSettings, RequestError>) {
        self.loading = false;
        match result {
            Ok(settings) => {
                tracing::debug!(title = ?settings.title, "Frontend settings loaded");
                self.settings = settings;
                self.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch frontend settings");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Title to put in the document head
    pub fn document_title(&self) -> Option<&str> {
        non_blank(self.settings.title.as_deref())
    }

    /// Logo URL to use as the favicon
    pub fn favicon(&self) -> Option<&str> {
        non_blank(self.settings.logo.as_deref())
    }

    pub fn user_guide(&self) -> Option<&str> {
        non_blank(self.settings.user_guide.as_deref())
    }

    pub fn vip_benefits(&self) -> Option<&str> {
        non_blank(self.settings.vip_benefits.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
