//! Admin Pages
//!
//! Layout with a section menu. Sections are titled from the route table.

use leptos::*;
use leptos_router::*;

use crate::state::GlobalState;

const SECTIONS: [&str; 10] = [
    "/admin/users",
    "/admin/models",
    "/admin/channels",
    "/admin/logs",
    "/admin/ai-logs",
    "/admin/prompts",
    "/admin/marketmodels",
    "/admin/danger-logs",
    "/admin/create-card",
    "/admin/settings",
];

#[component]
pub fn AdminLayout() -> impl IntoView {
    let state = expect_context::<GlobalState>();

    let links = SECTIONS
        .into_iter()
        .map(|path| {
            let label = state
                .routes
                .with_value(|routes| routes.title_for(path))
                .unwrap_or(path);
            view! {
                <A
                    href=path
                    class="block px-3 py-2 rounded-lg text-gray-600 hover:bg-gray-100"
                    active_class="bg-gray-100 text-gray-900"
                >
                    {label}
                </A>
            }
        })
        .collect_view();

    view! {
        <div class="flex gap-6">
            <aside class="w-56 shrink-0 space-y-1">{links}</aside>
            <div class="flex-1">
                <Outlet />
            </div>
        </div>
    }
}

/// Placeholder body for an admin section
#[component]
pub fn AdminSection() -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let location = use_location();

    let title = move || {
        let path = location.pathname.get();
        state
            .routes
            .with_value(|routes| routes.title_for(&path))
            .unwrap_or("Admin")
    };

    view! {
        <section class="bg-white rounded-xl shadow p-6">
            <h1 class="text-2xl font-bold">{title}</h1>
        </section>
    }
}
