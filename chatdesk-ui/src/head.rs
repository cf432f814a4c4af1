//! Document head updates driven by the site settings

use wasm_bindgen::JsCast;
use web_sys::HtmlLinkElement;

pub fn set_title(title: &str) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(title);
    }
}

/// Point the page icon at `href`, adding the `<link>` if there is none
pub fn set_favicon(href: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let existing = document
        .query_selector("link[rel~='icon']")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlLinkElement>().ok());

    let link = match existing {
        Some(link) => link,
        None => {
            let Some(link) = document
                .create_element("link")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlLinkElement>().ok())
            else {
                return;
            };
            link.set_rel("icon");
            if let Some(head) = document.head() {
                if let Err(e) = head.append_child(&link) {
                    tracing::warn!(error = ?e, "Failed to add favicon link");
                    return;
                }
            }
            link
        }
    };

    link.set_href(href);
}
