//! App Root Component
//!
//! Main application component with routing, the navigation guard and
//! global providers.

use chatdesk::guard::{Navigation, NavigationGuard};
use chatdesk::settings::SettingsStore;
use leptos::*;
use leptos_router::*;

use crate::components::{Nav, Toast};
use crate::head;
use crate::pages::{AdminLayout, AdminSection, Chat, Login, Placeholder, Purchase};
use crate::state::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App(settings: SettingsStore) -> impl IntoView {
    provide_global_state(settings);
    let state = expect_context::<GlobalState>();

    // Favicon follows the site logo
    create_effect(move |_| {
        if let Some(logo) = state.settings.with(|s| s.favicon().map(str::to_string)) {
            head::set_favicon(&logo);
        }
    });

    view! {
        <Router>
            <RouteGuard />
            <div class="min-h-screen bg-gray-50 text-gray-900 flex flex-col">
                <Nav />

                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/" view=Login />
                        <Route path="/login" view=Login />
                        <Route path="/auth/linuxdo/callback" view=|| view! { <Placeholder title="Signing in with LinuxDO" /> } />
                        <Route path="/auth/github/callback" view=|| view! { <Placeholder title="Signing in with GitHub" /> } />
                        <Route path="/register" view=|| view! { <Placeholder title="Register" /> } />
                        <Route path="/forgot-password" view=|| view! { <Placeholder title="Reset password" /> } />
                        <Route path="/chat" view=Chat />
                        <Route path="/research" view=|| view! { <Placeholder title="Research" /> } />
                        <Route path="/console" view=|| view! { <Placeholder title="Console" /> } />
                        <Route path="/purchase" view=Purchase />
                        <Route path="/admin" view=AdminLayout>
                            <Route path="" view=|| view! { <Redirect path="/admin/users" /> } />
                            <Route path="users" view=AdminSection />
                            <Route path="models" view=AdminSection />
                            <Route path="channels" view=AdminSection />
                            <Route path="logs" view=AdminSection />
                            <Route path="ai-logs" view=AdminSection />
                            <Route path="prompts" view=AdminSection />
                            <Route path="marketmodels" view=AdminSection />
                            <Route path="danger-logs" view=AdminSection />
                            <Route path="create-card" view=AdminSection />
                            <Route path="settings" view=AdminSection />
                        </Route>
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <Toast />
            </div>
        </Router>
    }
}

/// Runs the navigation guard whenever the path changes and keeps the
/// document title in step with the page.
#[component]
fn RouteGuard() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let location = use_location();
    let navigate = use_navigate();

    create_effect(move |_| {
        let path = location.pathname.get();

        // Only the login and root pages write to the session
        let decision = state.routes.with_value(|routes| {
            state.router.with_value(|config| {
                let guard = NavigationGuard::new(routes, config);
                if guard.clears_session(&path) {
                    state
                        .session
                        .try_update(|session| guard.before_each(&path, session))
                        .unwrap_or(Navigation::Allow)
                } else {
                    state
                        .session
                        .with_untracked(|session| guard.check(&path, session))
                }
            })
        });

        if let Navigation::Redirect { to } = decision {
            navigate(
                &to,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    create_effect(move |_| {
        let path = location.pathname.get();
        let site = state
            .settings
            .with(|s| s.document_title().map(str::to_string));
        let page = state.routes.with_value(|routes| routes.title_for(&path));

        let title = match (page, site) {
            (Some(page), Some(site)) => format!("{} - {}", page, site),
            (Some(page), None) => page.to_string(),
            (None, Some(site)) => site,
            (None, None) => return,
        };
        head::set_title(&title);
    });
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-500 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/chat"
                class="px-6 py-3 bg-blue-600 hover:bg-blue-700 text-white rounded-lg font-medium"
            >
                "Back to chat"
            </A>
        </div>
    }
}
