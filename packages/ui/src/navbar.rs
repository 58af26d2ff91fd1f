use dioxus::prelude::*;

use crate::ActivityLogToggle;

/// Top bar: product name, the caller's links, and the activity log toggle.
#[component]
pub fn Navbar(children: Element) -> Element {
    rsx! {
        div {
            class: "navbar",
            span { class: "navbar-brand", "HRMS" }
            div { class: "navbar-links", {children} }
            ActivityLogToggle {}
        }
    }
}
