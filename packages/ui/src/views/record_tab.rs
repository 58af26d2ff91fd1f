use dioxus::prelude::*;
use store::schemas::fields;
use store::{EmployeeEditor, RecordTab};

use crate::backend::use_reference_data;
use crate::field::FieldGrid;

/// Basic, address, personal or salary fields of the open employee.
#[component]
pub fn RecordTabView(editor: Signal<EmployeeEditor>, tab: RecordTab) -> Element {
    let mut editor = editor;
    let reference = use_reference_data();
    let (engine, locked) = {
        let editor = editor.read();
        (editor.record(tab).engine().clone(), editor.is_locked(tab.tab()))
    };

    rsx! {
        FieldGrid {
            specs: fields(tab),
            engine,
            reference: reference(),
            disabled: locked,
            on_change: move |(field, value)| {
                if let Some(form) = editor.write().editable_record(tab) {
                    form.engine_mut().handle_change(field, value);
                }
            },
            on_blur: move |field| {
                if let Some(form) = editor.write().editable_record(tab) {
                    form.engine_mut().handle_blur(field);
                }
            },
        }
    }
}
