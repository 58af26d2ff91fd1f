use dioxus::prelude::*;
use store::schemas::CREATE_FIELDS;
use store::{create_employee, CreateEmployeeForm, EmployeeId};

use crate::backend::{use_backend, use_reference_data};
use crate::field::FieldGrid;
use crate::icons::FaUserPlus;
use crate::{log_activity, use_activity_log, Icon, LogLevel};

const VIEWS_CSS: Asset = asset!("/assets/styling/views.css");

/// Form for a new employee. Calls `on_created` with the new id.
#[component]
pub fn CreateEmployeeView(on_created: EventHandler<EmployeeId>) -> Element {
    let backend = use_backend();
    let reference = use_reference_data();
    let mut activity_log = use_activity_log();
    let config = backend.config.clone();
    let mut form = use_signal(move || CreateEmployeeForm::new(&config));

    let store = backend.store.clone();
    let handle_submit = move |_| {
        let values = match form.write().prepare_submit() {
            Ok(values) => values,
            Err(e) => {
                log_activity(&mut activity_log, LogLevel::Error, &e.to_string());
                return;
            }
        };
        let store = store.clone();
        spawn(async move {
            let outcome = create_employee(&store, &values).await;
            form.write().finish_submit(&outcome);
            match outcome {
                Ok(employee_id) => {
                    log_activity(&mut activity_log, LogLevel::Success, &format!("Employee #{employee_id} created"));
                    on_created.call(employee_id);
                }
                Err(e) => log_activity(&mut activity_log, LogLevel::Error, &e.to_string()),
            }
        });
    };

    let (engine, submitting) = {
        let form = form.read();
        (form.engine().clone(), form.is_submitting())
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page",
            div {
                class: "view-header",
                h1 { class: "view-title", "New employee" }
            }
            FieldGrid {
                specs: CREATE_FIELDS,
                engine,
                reference: reference(),
                on_change: move |(field, value)| form.write().engine_mut().handle_change(field, value),
                on_blur: move |field| form.write().engine_mut().handle_blur(field),
            }
            div {
                class: "view-actions",
                button {
                    class: "btn btn-primary",
                    disabled: submitting,
                    onclick: handle_submit,
                    Icon { icon: FaUserPlus, width: 14, height: 14 }
                    if submitting { " Creating..." } else { " Create employee" }
                }
            }
        }
    }
}
