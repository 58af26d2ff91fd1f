use dioxus::prelude::*;

use crate::activity_log::{use_activity_log, ActivityLog, LogLevel};

const ACTIVITY_LOG_CSS: Asset = asset!("/assets/styling/activity_log.css");

/// Provides the [`ActivityLog`] context and renders the toast and log panel.
#[component]
pub fn ActivityLogProvider(children: Element) -> Element {
    use_context_provider(|| Signal::new(ActivityLog::default()));

    rsx! {
        document::Stylesheet { href: ACTIVITY_LOG_CSS }
        {children}
        Toast {}
        ActivityLogPanel {}
    }
}

/// The latest save outcome, until dismissed.
#[component]
pub fn Toast() -> Element {
    let mut log = use_activity_log();
    let Some(entry) = log().toast_entry().cloned() else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "toast {entry.level.class()}",
            role: "status",
            span { "{entry.message}" }
            button {
                class: "toast-close",
                onclick: move |_| log.write().toast = None,
                "×"
            }
        }
    }
}

#[component]
pub fn ActivityLogPanel() -> Element {
    let mut log = use_activity_log();

    if !log().visible {
        return rsx! {};
    }

    let entries = log().entries.clone();

    rsx! {
        div {
            class: "activity-log-panel",
            div {
                class: "activity-log-header",
                span { "Activity Log" }
                div {
                    class: "activity-log-header-actions",
                    button {
                        onclick: move |_| {
                            let mut log = log.write();
                            log.entries.clear();
                            log.toast = None;
                        },
                        "Clear"
                    }
                    button {
                        onclick: move |_| log.write().visible = false,
                        "Close"
                    }
                }
            }
            div {
                class: "activity-log-entries",
                for entry in entries.iter().rev() {
                    div {
                        key: "{entry.id}",
                        class: "activity-log-entry {entry.level.class()}",
                        span { class: "activity-log-time", "{entry.timestamp}" }
                        span { " {entry.message}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ActivityLogToggle() -> Element {
    let mut log = use_activity_log();
    let count = log().entries.len();
    let has_errors = log().entries.iter().any(|e| e.level == LogLevel::Error);

    rsx! {
        button {
            class: if has_errors { "activity-log-toggle has-errors" } else { "activity-log-toggle" },
            onclick: move |_| {
                let visible = log().visible;
                log.write().visible = !visible;
            },
            title: "Activity log",
            if count > 0 {
                "{count}"
            } else {
                "Log"
            }
        }
    }
}
