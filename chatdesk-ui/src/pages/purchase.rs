//! Card Purchase Page

use leptos::*;

use crate::components::Markdown;
use crate::state::GlobalState;

#[component]
pub fn Purchase() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let benefits = move || state.settings.with(|s| s.vip_benefits().map(str::to_string));

    view! {
        <section class="max-w-2xl mx-auto bg-white rounded-xl shadow p-6">
            <h1 class="text-2xl font-bold mb-4">"VIP benefits"</h1>
            {move || benefits().map(|text| view! { <Markdown content=text /> })}
        </section>
    }
}
