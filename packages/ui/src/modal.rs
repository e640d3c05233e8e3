use dioxus::prelude::*;

/// A full-screen overlay that centers its children in a modal card.
/// Clicking outside the card triggers `on_close`; a busy modal ignores it.
#[component]
pub fn ModalOverlay(
    title: String,
    on_close: EventHandler<()>,
    #[props(default)] busy: bool,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| {
                if !busy {
                    on_close.call(());
                }
            },
            div {
                class: "modal-card",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),
                header {
                    class: "modal-header",
                    h2 { "{title}" }
                    button {
                        class: "modal-close",
                        disabled: busy,
                        title: "Close",
                        onclick: move |_| on_close.call(()),
                        crate::Icon { icon: crate::icons::FaXmark, width: 16, height: 16 }
                    }
                }
                {children}
            }
        }
    }
}

/// Yes/no prompt shown before a destructive action.
#[component]
pub fn ConfirmDialog(
    message: String,
    #[props(default = "Delete".to_string())] confirm_label: String,
    #[props(default)] busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        ModalOverlay {
            title: "Are you sure?",
            busy,
            on_close: move |_| on_cancel.call(()),
            p { class: "confirm-message", "{message}" }
            div {
                class: "form-actions",
                button {
                    class: "btn btn-secondary",
                    disabled: busy,
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
                button {
                    class: "btn btn-danger",
                    disabled: busy,
                    onclick: move |_| on_confirm.call(()),
                    if busy { "Deleting..." } else { "{confirm_label}" }
                }
            }
        }
    }
}
