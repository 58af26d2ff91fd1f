use dioxus::prelude::*;
use store::models::PendingFile;
use store::{EmployeeEditor, Tab};

use crate::backend::use_reference_data;
use crate::icons::FaTrash;
use crate::views::ConfirmDialog;
use crate::{log_activity, use_activity_log, Icon, LogLevel};

fn parse_category(value: &str) -> Option<u64> {
    value.parse().ok()
}

/// Uploaded documents plus files picked locally. Picked files are uploaded
/// when the tab is saved.
#[component]
pub fn DocumentsTabView(editor: Signal<EmployeeEditor>, on_delete: EventHandler<u64>) -> Element {
    let mut editor = editor;
    let reference = use_reference_data();
    let mut activity_log = use_activity_log();
    let mut new_category = use_signal(|| Option::<u64>::None);
    let mut confirm_delete = use_signal(|| Option::<(u64, String)>::None);

    let (documents, locked) = {
        let editor = editor.read();
        (editor.documents().clone(), editor.is_locked(Tab::Documents))
    };
    let categories = reference().category_options();

    let handle_files = move |evt: FormEvent| async move {
        for file in evt.files() {
            let name = file.name();
            let content_type = file
                .content_type()
                .unwrap_or_else(|| "application/octet-stream".to_string());
            match file.read_bytes().await {
                Ok(bytes) => {
                    let pending = PendingFile::new(&name, &content_type, bytes.to_vec());
                    if let Some(documents) = editor.write().editable_documents() {
                        documents.add_pending(new_category(), pending, None);
                    }
                }
                Err(e) => {
                    log_activity(&mut activity_log, LogLevel::Warning, &format!("Could not read {name}: {e}"));
                }
            }
        }
    };

    rsx! {
        section {
            class: "documents-uploaded",
            h2 { class: "view-section-title", "Uploaded documents" }
            if documents.uploaded().is_empty() {
                p { class: "view-muted", "No documents uploaded yet." }
            }
            ul {
                for doc in documents.uploaded().iter().cloned() {
                    li {
                        key: "{doc.id}",
                        class: "document-row",
                        span {
                            class: "document-category",
                            {reference().category_name(doc.category_id).unwrap_or("Uncategorised").to_string()}
                        }
                        if let Some(url) = doc.file_url.clone() {
                            a { href: "{url}", target: "_blank", "{doc.file_name}" }
                        } else {
                            span { "{doc.file_name}" }
                        }
                        button {
                            class: "btn btn-icon",
                            title: "Delete document",
                            onclick: move |_| confirm_delete.set(Some((doc.id, doc.file_name.clone()))),
                            Icon { icon: FaTrash, width: 12, height: 12 }
                        }
                    }
                }
            }
        }

        section {
            class: "documents-pending",
            h2 { class: "view-section-title", "Add documents" }
            div {
                class: "document-picker",
                select {
                    disabled: locked,
                    value: new_category().map(|id| id.to_string()).unwrap_or_default(),
                    onchange: move |evt: FormEvent| new_category.set(parse_category(&evt.value())),
                    option { value: "", "Category for new files" }
                    for (value, label) in categories.clone() {
                        option { key: "{value}", value: "{value}", "{label}" }
                    }
                }
                input {
                    r#type: "file",
                    multiple: true,
                    disabled: locked,
                    onchange: handle_files,
                }
            }
            if let Some(error) = documents.error() {
                p { class: "field-error", "{error}" }
            }
            ul {
                for doc in documents.pending().iter().cloned() {
                    li {
                        key: "{doc.key}",
                        class: "document-row pending",
                        span { "{doc.file.name}" }
                        select {
                            disabled: locked,
                            value: doc.category_id.map(|id| id.to_string()).unwrap_or_default(),
                            onchange: move |evt: FormEvent| {
                                if let Some(documents) = editor.write().editable_documents() {
                                    documents.set_pending_category(doc.key, parse_category(&evt.value()));
                                }
                            },
                            option { value: "", "Select category" }
                            for (value, label) in categories.clone() {
                                option { key: "{value}", value: "{value}", "{label}" }
                            }
                        }
                        button {
                            class: "btn btn-icon",
                            title: "Remove",
                            disabled: locked,
                            onclick: move |_| {
                                if let Some(documents) = editor.write().editable_documents() {
                                    documents.remove_pending(doc.key);
                                }
                            },
                            Icon { icon: FaTrash, width: 12, height: 12 }
                        }
                        if let Some(error) = documents.pending_error(doc.key) {
                            p { class: "field-error", "{error}" }
                        }
                    }
                }
            }
        }

        if let Some((document_id, file_name)) = confirm_delete() {
            ConfirmDialog {
                title: "Delete document",
                message: format!("Delete {file_name}? This cannot be undone."),
                confirm_label: "Delete",
                on_confirm: move |_| {
                    confirm_delete.set(None);
                    on_delete.call(document_id);
                },
                on_close: move |_| confirm_delete.set(None),
            }
        }
    }
}
