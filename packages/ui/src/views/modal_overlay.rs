use dioxus::prelude::*;

/// A full-screen overlay that centers its children in a modal card.
/// Clicking outside the card triggers `on_close`.
#[component]
pub fn ModalOverlay(on_close: EventHandler<()>, children: Element) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| on_close.call(()),
            div {
                class: "modal-card",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                {children}
            }
        }
    }
}

/// Yes/no confirmation shown in a [`ModalOverlay`].
#[component]
pub fn ConfirmDialog(
    title: String,
    message: String,
    #[props(default = "Confirm".to_string())] confirm_label: String,
    on_confirm: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    rsx! {
        ModalOverlay {
            on_close,
            div {
                class: "modal-body",
                h2 { class: "modal-title", "{title}" }
                p { "{message}" }
                div {
                    class: "modal-actions",
                    button {
                        class: "btn btn-danger",
                        onclick: move |_| on_confirm.call(()),
                        "{confirm_label}"
                    }
                    button {
                        class: "btn btn-outline",
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                }
            }
        }
    }
}
