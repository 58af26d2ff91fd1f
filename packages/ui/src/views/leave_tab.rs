use dioxus::prelude::*;
use store::{EmployeeEditor, LeaveKey, Tab};

use crate::icons::{FaMinus, FaPlus};
use crate::Icon;

/// Leave balances with per-row day adjustments.
///
/// Only one row can carry an adjustment at a time: touching another row
/// discards the pending change on the previous one.
#[component]
pub fn LeaveTabView(editor: Signal<EmployeeEditor>) -> Element {
    let mut editor = editor;
    let (leave, locked) = {
        let editor = editor.read();
        (editor.leave().clone(), editor.is_locked(Tab::Leave))
    };
    let summary = leave.summary();
    let rows: Vec<_> = leave
        .rows()
        .iter()
        .map(|row| {
            (
                row.clone(),
                i64::from(row.addon) - i64::from(row.subtract),
                leave.can_decrement(row.id),
            )
        })
        .collect();

    rsx! {
        div {
            class: "leave-summary",
            for key in LeaveKey::ALL {
                if let Some(card) = summary.get(&key) {
                    div {
                        key: "{key.label()}",
                        class: "leave-card",
                        h3 { "{key.label()}" }
                        p { "Available: {card.available}" }
                        p { "Booked: {card.booked}" }
                        p { class: "view-muted", "Total: {card.total}" }
                    }
                }
            }
        }
        if leave.rows().is_empty() {
            p { class: "view-muted", "No leave balances for this employee." }
        }
        table {
            class: "leave-table",
            thead {
                tr {
                    th { "Leave type" }
                    th { "Total" }
                    th { "Used" }
                    th { "Remaining" }
                    th { "Adjust" }
                }
            }
            tbody {
                for (row, delta, can_decrement) in rows {
                    tr {
                        key: "{row.id}",
                        class: if leave.active_row() == Some(row.id) { "active" } else { "" },
                        td { "{row.leave_type}" }
                        td { "{row.total_count}" }
                        td { "{row.used}" }
                        td {
                            "{row.projected_remaining()}"
                            if row.has_delta() {
                                span {
                                    class: "leave-delta",
                                    " ({delta:+})"
                                }
                            }
                            if let Some(error) = leave.error(row.id) {
                                p { class: "field-error", "{error}" }
                            }
                        }
                        td {
                            button {
                                class: "btn btn-icon",
                                title: "Remove a day",
                                disabled: locked || !can_decrement,
                                onclick: move |_| {
                                    if let Some(leave) = editor.write().editable_leave() {
                                        leave.decrement(row.id);
                                    }
                                },
                                Icon { icon: FaMinus, width: 12, height: 12 }
                            }
                            button {
                                class: "btn btn-icon",
                                title: "Add a day",
                                disabled: locked,
                                onclick: move |_| {
                                    if let Some(leave) = editor.write().editable_leave() {
                                        leave.increment(row.id);
                                    }
                                },
                                Icon { icon: FaPlus, width: 12, height: 12 }
                            }
                        }
                    }
                }
            }
        }
    }
}
