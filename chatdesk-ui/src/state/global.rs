//! Global Application State
//!
//! Reactive state management using Leptos signals.

use chatdesk::config::RouterConfig;
use chatdesk::router::RouteTable;
use chatdesk::session::SessionStore;
use chatdesk::settings::SettingsStore;
use leptos::*;

use super::storage::{shared_storage, SharedStorage};

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Signed-in user, mirrored into local storage
    pub session: RwSignal<SessionStore<SharedStorage>>,
    /// Site settings fetched at startup
    pub settings: RwSignal<SettingsStore>,
    pub routes: StoredValue<RouteTable>,
    pub router: StoredValue<RouterConfig>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state(settings: SettingsStore) {
    let state = GlobalState {
        session: create_rw_signal(SessionStore::restore(shared_storage())),
        settings: create_rw_signal(settings),
        routes: store_value(RouteTable::standard()),
        router: store_value(RouterConfig::default()),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    pub fn is_authenticated(&self) -> bool {
        self.session.with(|s| s.is_authenticated())
    }

    pub fn is_admin(&self) -> bool {
        self.session.with(|s| s.is_admin())
    }

    pub fn username(&self) -> Option<String> {
        self.session
            .with(|s| s.session().and_then(|session| session.username.clone()))
    }

    /// Landing page for the signed-in user
    pub fn landing(&self) -> String {
        let admin = self.is_admin();
        self.router.with_value(|config| {
            if admin {
                config.admin_landing.clone()
            } else {
                config.default_landing.clone()
            }
        })
    }

    pub fn login_path(&self) -> String {
        self.router.with_value(|config| config.login_path.clone())
    }

    /// Drop the session and erase it from local storage
    pub fn sign_out(&self) {
        let result = self.session.try_update(|s| s.clear_user_info());
        if let Some(Err(e)) = result {
            tracing::warn!(error = %e, "Failed to erase stored session");
        }
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
