use dioxus::prelude::*;
use serde_json::Value;
use store::schemas::{FieldSpec, InputKind, OptionSource};
use store::{FormEngine, ReferenceData};

/// `(value, label)` pairs for a select field.
pub fn select_options(source: OptionSource, reference: &ReferenceData) -> Vec<(String, String)> {
    match source {
        OptionSource::Departments => reference.department_options(),
        OptionSource::Designations => reference.designation_options(),
        OptionSource::Fixed(pairs) => pairs
            .iter()
            .map(|(value, label)| (value.to_string(), label.to_string()))
            .collect(),
    }
}

/// One labelled input bound to a field of a [`FormEngine`].
#[component]
pub fn FieldInput(
    spec: FieldSpec,
    value: String,
    #[props(!optional)] error: Option<String>,
    #[props(default)] options: Vec<(String, String)>,
    #[props(default)] disabled: bool,
    on_change: EventHandler<Value>,
    on_blur: EventHandler<()>,
) -> Element {
    let id = format!("field-{}", spec.name);
    let class = if error.is_some() { "field-input invalid" } else { "field-input" };

    rsx! {
        div {
            class: "field",
            label {
                r#for: "{id}",
                class: "field-label",
                "{spec.label}"
                if spec.is_required() {
                    span { class: "field-required", " *" }
                }
            }
            {match spec.input {
                InputKind::Select(_) => rsx! {
                    select {
                        id: "{id}",
                        class,
                        disabled,
                        value: "{value}",
                        onchange: move |evt: FormEvent| on_change.call(Value::String(evt.value())),
                        onblur: move |_| on_blur.call(()),
                        option { value: "", "Select {spec.label}" }
                        for (option_value, option_label) in options {
                            option { key: "{option_value}", value: "{option_value}", "{option_label}" }
                        }
                    }
                },
                InputKind::Textarea => rsx! {
                    textarea {
                        id: "{id}",
                        class,
                        disabled,
                        rows: 3,
                        value: "{value}",
                        oninput: move |evt: FormEvent| on_change.call(Value::String(evt.value())),
                        onblur: move |_| on_blur.call(()),
                    }
                },
                kind => rsx! {
                    input {
                        id: "{id}",
                        class,
                        r#type: input_type(kind),
                        readonly: kind == InputKind::ReadOnly,
                        disabled,
                        value: "{value}",
                        oninput: move |evt: FormEvent| on_change.call(Value::String(evt.value())),
                        onblur: move |_| on_blur.call(()),
                    }
                },
            }}
            if let Some(error) = error {
                p { class: "field-error", "{error}" }
            }
        }
    }
}

fn input_type(kind: InputKind) -> &'static str {
    match kind {
        InputKind::Email => "email",
        InputKind::Tel => "tel",
        InputKind::Number => "number",
        InputKind::Date => "date",
        InputKind::Text | InputKind::Textarea | InputKind::Select(_) | InputKind::ReadOnly => "text",
    }
}

/// Render every field of `specs` against `engine`, routing edits through
/// `on_change(field, value)` and `on_blur(field)`. `disabled` locks every input.
#[component]
pub fn FieldGrid(
    specs: &'static [FieldSpec],
    engine: FormEngine,
    reference: ReferenceData,
    #[props(default)] disabled: bool,
    on_change: EventHandler<(&'static str, Value)>,
    on_blur: EventHandler<&'static str>,
) -> Element {
    rsx! {
        div {
            class: "field-grid",
            for spec in specs.iter().copied() {
                FieldInput {
                    key: "{spec.name}",
                    spec,
                    value: engine.text(spec.name),
                    error: engine.visible_error(spec.name).map(str::to_string),
                    options: match spec.input {
                        InputKind::Select(source) => select_options(source, &reference),
                        _ => Vec::new(),
                    },
                    disabled,
                    on_change: move |value| on_change.call((spec.name, value)),
                    on_blur: move |_| on_blur.call(spec.name),
                }
            }
        }
    }
}
