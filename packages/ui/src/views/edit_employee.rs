use dioxus::prelude::*;
use store::{delete_document, execute_plan, fetch_tab, EmployeeEditor, EmployeeId, Tab};

use crate::backend::use_backend;
use crate::icons::FaFloppyDisk;
use crate::views::{DocumentsTabView, LeaveTabView, RecordTabView};
use crate::{log_activity, use_activity_log, Icon, LogLevel};

const VIEWS_CSS: Asset = asset!("/assets/styling/views.css");

/// The six-tab employee editor.
///
/// Each tab is fetched the first time it is opened and kept in memory after
/// that; saving applies to the open tab only and refreshes it from the server.
#[component]
pub fn EditEmployeeView(employee_id: EmployeeId) -> Element {
    let backend = use_backend();
    let mut activity_log = use_activity_log();
    let config = backend.config.clone();
    let mut editor = use_signal(move || EmployeeEditor::new(employee_id, config));

    // Track the route param so the effect below re-runs when it changes
    let mut id_signal = use_signal(|| employee_id);
    if *id_signal.peek() != employee_id {
        id_signal.set(employee_id);
    }

    let store = backend.store.clone();
    let activate = use_callback(move |tab: Tab| {
        let Some(ticket) = editor.write().begin_activation(tab) else {
            return;
        };
        let store = store.clone();
        spawn(async move {
            let result = fetch_tab(&store, &ticket).await;
            if let Err(e) = &result {
                log_activity(&mut activity_log, LogLevel::Warning, &e.to_string());
            }
            editor.write().apply_fetch(ticket, result);
        });
    });

    use_effect(move || {
        let id = id_signal();
        let tab = {
            let mut editor = editor.write();
            editor.open(id);
            editor.active_tab()
        };
        activate.call(tab);
    });

    let store = backend.store.clone();
    let save = use_callback(move |_: ()| {
        let plan = match editor.write().prepare_save() {
            Ok(plan) => plan,
            Err(e) => {
                log_activity(&mut activity_log, LogLevel::Error, &e.to_string());
                return;
            }
        };
        let store = store.clone();
        spawn(async move {
            let outcome = execute_plan(&store, &plan).await;
            let result = editor.write().finish_save(&plan, outcome);
            match result {
                Ok(report) => {
                    log_activity(&mut activity_log, LogLevel::Success, &report.message);
                    if editor.peek().should_reload(&plan) {
                        activate.call(plan.tab);
                    }
                }
                Err(e) => log_activity(&mut activity_log, LogLevel::Error, &e.to_string()),
            }
        });
    });

    let store = backend.store.clone();
    let delete = use_callback(move |document_id: u64| {
        let store = store.clone();
        spawn(async move {
            let employee_id = editor.peek().employee_id();
            match delete_document(&store, employee_id, document_id).await {
                Ok(()) => {
                    if editor.peek().employee_id() == employee_id {
                        editor.write().documents_mut().remove_uploaded(document_id);
                    }
                    log_activity(&mut activity_log, LogLevel::Success, "Document deleted");
                }
                Err(e) => log_activity(&mut activity_log, LogLevel::Error, &e.to_string()),
            }
        });
    });

    let (active, loading, saving, title) = {
        let editor = editor.read();
        let active = editor.active_tab();
        (
            active,
            editor.session().is_loading(active),
            editor.is_saving(),
            editor
                .employee_name()
                .unwrap_or_else(|| format!("Employee #{}", editor.employee_id())),
        )
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page",
            div {
                class: "view-header",
                h1 { class: "view-title", "{title}" }
                button {
                    class: "btn btn-primary",
                    disabled: saving || loading,
                    onclick: move |_| save.call(()),
                    Icon { icon: FaFloppyDisk, width: 14, height: 14 }
                    if saving { " Saving..." } else { " Save {active.label()}" }
                }
            }
            nav {
                class: "tab-bar",
                for tab in Tab::ALL {
                    button {
                        key: "{tab.slug()}",
                        class: if tab == active { "tab active" } else { "tab" },
                        onclick: move |_| activate.call(tab),
                        "{tab.label()}"
                    }
                }
            }
            div {
                class: "tab-panel",
                if loading {
                    p { class: "view-muted", "Loading..." }
                }
                {match (active, active.as_record()) {
                    (_, Some(tab)) => rsx! { RecordTabView { editor, tab } },
                    (Tab::Documents, None) => rsx! { DocumentsTabView { editor, on_delete: delete } },
                    (_, None) => rsx! { LeaveTabView { editor } },
                }}
            }
        }
    }
}
