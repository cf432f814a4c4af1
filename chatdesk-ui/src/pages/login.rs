//! Login Page
//!
//! Username/password sign-in. Opening this page signs out whoever was
//! signed in; the navigation guard takes care of that.

use leptos::*;
use leptos_router::*;

use crate::api;
use crate::state::GlobalState;

#[component]
pub fn Login() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let navigate = use_navigate();

    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (pending, set_pending) = create_signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        set_pending.set(true);

        let user = username.get_untracked();
        let pass = password.get_untracked();
        let navigate = navigate.clone();

        spawn_local(async move {
            match api::login(&user, &pass).await {
                Ok(response) => {
                    match state.session.try_update(|s| s.set_user_info(&response)) {
                        Some(Err(e)) => {
                            tracing::error!(error = %e, "Failed to store session");
                            state.show_error("Could not save the session in this browser");
                        }
                        _ => {
                            state.show_success(&format!("Welcome, {}", response.username));
                            navigate(&state.landing(), Default::default());
                        }
                    }
                }
                Err(e) => {
                    let message = e
                        .response()
                        .and_then(|r| r.detail())
                        .unwrap_or_else(|| e.to_string());
                    state.show_error(&format!("Login failed: {}", message));
                }
            }
            set_pending.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center min-h-[70vh]">
            <form on:submit=on_submit class="w-full max-w-sm bg-white rounded-xl shadow p-8 space-y-4">
                <h1 class="text-2xl font-bold text-center">"Sign in"</h1>

                <div>
                    <label class="block text-sm text-gray-600 mb-1">"Username"</label>
                    <input
                        type="text"
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                        class="w-full border rounded-lg px-3 py-2"
                    />
                </div>

                <div>
                    <label class="block text-sm text-gray-600 mb-1">"Password"</label>
                    <input
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        class="w-full border rounded-lg px-3 py-2"
                    />
                </div>

                <button
                    type="submit"
                    disabled=move || pending.get()
                    class="w-full py-2 rounded-lg bg-blue-600 text-white disabled:bg-gray-400"
                >
                    {move || if pending.get() { "Signing in..." } else { "Sign in" }}
                </button>

                <div class="flex justify-between text-sm">
                    <A href="/register" class="text-blue-600">"Create account"</A>
                    <A href="/forgot-password" class="text-blue-600">"Forgot password?"</A>
                </div>
            </form>
        </div>
    }
}
