use leptos::*;

/// Page whose content is served elsewhere
#[component]
pub fn Placeholder(title: &'static str) -> impl IntoView {
    view! {
        <section class="max-w-2xl mx-auto bg-white rounded-xl shadow p-6">
            <h1 class="text-2xl font-bold">{title}</h1>
        </section>
    }
}
