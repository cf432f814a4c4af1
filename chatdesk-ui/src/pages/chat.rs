//! Chat Page
//!
//! Shows the site's user guide and a scratch pad whose markdown is
//! rendered the same way chat replies are.

use leptos::*;

use crate::api;
use crate::components::Markdown;
use crate::state::GlobalState;

const SAMPLE: &str = "Type **markdown** here.\n\n```rust\nfn main() {\n    println!(\"hello\");\n}\n```\n";

#[component]
pub fn Chat() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let (draft, set_draft) = create_signal(SAMPLE.to_string());

    let guide = move || state.settings.with(|s| s.user_guide().map(str::to_string));

    // A rejected token sends the browser to the login page from inside the request
    let profile = create_local_resource(
        || (),
        |_| async { api::current_user().await.map_err(|e| e.to_string()) },
    );

    view! {
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            <section class="lg:col-span-2 text-sm text-gray-600">
                {move || profile.get().map(|result| match result {
                    Ok(user) => format!(
                        "Signed in as {} ({}){}",
                        user.username,
                        user.role,
                        user.coins.map(|c| format!(", {} coins", c)).unwrap_or_default()
                    ),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to load profile");
                        String::new()
                    }
                })}
            </section>

            <section class="bg-white rounded-xl shadow p-6">
                <h2 class="text-lg font-semibold mb-4">"User guide"</h2>
                {move || match guide() {
                    Some(text) => view! { <Markdown content=text /> }.into_view(),
                    None => view! { <p class="text-gray-500">"No guide has been published yet."</p> }.into_view(),
                }}
            </section>

            <section class="bg-white rounded-xl shadow p-6 space-y-4">
                <h2 class="text-lg font-semibold">"Preview"</h2>
                <textarea
                    rows="10"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    class="w-full border rounded-lg p-3 font-mono text-sm"
                />
                <Markdown content=Signal::derive(move || draft.get()) />
            </section>
        </div>
    }
}
