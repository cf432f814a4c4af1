//! Navigation Component
//!
//! Header bar with the site title, links for the signed-in user and the
//! sign-out button.

use leptos::*;
use leptos_router::*;

use crate::state::GlobalState;

#[component]
pub fn Nav() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let navigate = use_navigate();

    let title = move || {
        state
            .settings
            .with(|s| s.document_title().map(str::to_string))
            .unwrap_or_default()
    };
    let logo = move || state.settings.with(|s| s.favicon().map(str::to_string));

    let sign_out = move |_| {
        state.sign_out();
        navigate(&state.login_path(), Default::default());
    };

    view! {
        <nav class="bg-white border-b border-gray-200">
            <div class="container mx-auto px-4 flex items-center justify-between h-14">
                <A href="/chat" class="flex items-center space-x-2">
                    {move || logo().map(|src| view! { <img src=src class="h-8 w-8" alt="" /> })}
                    <span class="text-lg font-semibold">{title}</span>
                </A>

                <Show when=move || state.is_authenticated()>
                    <div class="flex items-center space-x-1">
                        <NavLink href="/chat" label="Chat" />
                        <NavLink href="/research" label="Research" />
                        <NavLink href="/console" label="Console" />
                        <NavLink href="/purchase" label="Purchase" />
                        <Show when=move || state.is_admin()>
                            <NavLink href="/admin" label="Admin" />
                        </Show>
                        <span class="px-3 text-sm text-gray-500">
                            {move || state.username().unwrap_or_default()}
                        </span>
                        <button
                            on:click=sign_out.clone()
                            class="px-3 py-2 rounded-lg text-gray-600 hover:bg-gray-100"
                        >
                            "Sign out"
                        </button>
                    </div>
                </Show>
            </div>
        </nav>
    }
}

#[component]
fn NavLink(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            class="px-3 py-2 rounded-lg text-gray-600 hover:text-gray-900 hover:bg-gray-100"
            active_class="bg-gray-100 text-gray-900"
        >
            {label}
        </A>
    }
}
