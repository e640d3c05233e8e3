//! Modal forms driven by a [`MutationFlow`] signal.
//!
//! The component only edits the draft and reports intent through `on_submit` and
//! `on_cancel`; the page owns the flow and performs the request.

use dioxus::prelude::*;
use store::{
    Draft, ForgotPasswordDraft, LenderType, LoanDraft, LoginDraft, MutationFlow, PaymentDraft,
    RegisterDraft, TaskDraft,
};

use crate::modal::ModalOverlay;
use crate::widgets::FieldError;
use crate::{icons, money, Icon};

/// Snapshot of a flow taken once per render so the signal is not held.
struct View<D> {
    draft: D,
    editing: bool,
    submitting: bool,
    error: Option<String>,
}

impl<D: Draft> View<D> {
    fn of(flow: &MutationFlow<D>) -> Option<Self> {
        Some(Self {
            draft: flow.draft()?.clone(),
            editing: flow.mode().is_some_and(|m| m.is_edit()),
            submitting: flow.is_submitting(),
            error: flow.error().map(str::to_string),
        })
    }
}

fn field_error<D: Draft + 'static>(flow: Signal<MutationFlow<D>>, field: &str) -> Option<String> {
    flow.read().field_error(field).map(str::to_string)
}

#[component]
fn SubmitButton(submitting: bool, label: String, busy_label: String) -> Element {
    rsx! {
        button {
            r#type: "submit",
            class: "btn btn-primary",
            disabled: submitting,
            if submitting {
                Icon { icon: icons::FaSpinner, width: 14, height: 14, class: "spin" }
                " {busy_label}"
            } else {
                "{label}"
            }
        }
    }
}

#[component]
fn FormError(message: Option<String>) -> Element {
    match message {
        Some(message) => rsx! {
            div { class: "form-error", role: "alert", "{message}" }
        },
        None => rsx! {},
    }
}

#[component]
pub fn TaskForm(
    flow: Signal<MutationFlow<TaskDraft>>,
    on_submit: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let Some(view) = View::of(&*flow.read()) else {
        return rsx! {};
    };
    let title = if view.editing { "Edit Task" } else { "Add New Task" };
    let label = if view.editing { "Update Task" } else { "Save Task" };

    rsx! {
        ModalOverlay {
            title: "{title}",
            busy: view.submitting,
            on_close: move |_| on_cancel.call(()),
            form {
                class: "modal-form",
                onsubmit: move |e: FormEvent| {
                    e.prevent_default();
                    on_submit.call(());
                },
                FormError { message: view.error }
                label { r#for: "task", "Task Description" }
                textarea {
                    id: "task",
                    rows: 3,
                    placeholder: "E.g., Finalize Q3 budget report...",
                    disabled: view.submitting,
                    value: "{view.draft.task}",
                    oninput: move |e: FormEvent| flow.write().update(|d| d.task = e.value()),
                }
                FieldError { message: field_error(flow, "task") }

                label { r#for: "priority", "Priority (1 = lowest, 10 = highest)" }
                select {
                    id: "priority",
                    disabled: view.submitting,
                    value: "{view.draft.priority}",
                    onchange: move |e: FormEvent| {
                        if let Ok(p) = e.value().parse::<u8>() {
                            flow.write().update(|d| d.priority = p);
                        }
                    },
                    for p in (1..=10u8).rev() {
                        option { value: "{p}", selected: p == view.draft.priority, "{p}" }
                    }
                }
                FieldError { message: field_error(flow, "priority") }

                div {
                    class: "form-actions",
                    button {
                        r#type: "button",
                        class: "btn btn-secondary",
                        disabled: view.submitting,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    SubmitButton { submitting: view.submitting, label: "{label}", busy_label: "Saving..." }
                }
            }
        }
    }
}

#[component]
pub fn LoanForm(
    flow: Signal<MutationFlow<LoanDraft>>,
    on_submit: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let Some(view) = View::of(&*flow.read()) else {
        return rsx! {};
    };
    let title = if view.editing { "Edit Loan Details" } else { "Add New Loan" };
    let label = if view.editing { "Update Loan" } else { "Save Loan" };
    let draft = view.draft;
    let busy = view.submitting;

    rsx! {
        ModalOverlay {
            title: "{title}",
            busy,
            on_close: move |_| on_cancel.call(()),
            form {
                class: "modal-form grid-2",
                onsubmit: move |e: FormEvent| {
                    e.prevent_default();
                    on_submit.call(());
                },
                FormError { message: view.error }

                div {
                    label { "Lender Name" }
                    input {
                        placeholder: "e.g., Axis Bank",
                        disabled: busy,
                        value: "{draft.lender_name}",
                        oninput: move |e: FormEvent| flow.write().update(|d| d.lender_name = e.value()),
                    }
                    FieldError { message: field_error(flow, "lenderName") }
                }
                div {
                    label { "Lender Type" }
                    select {
                        disabled: busy,
                        onchange: move |e: FormEvent| {
                            if let Some(t) = LenderType::parse(&e.value()) {
                                flow.write().update(|d| d.lender_type = t);
                            }
                        },
                        for t in LenderType::ALL {
                            option { value: t.as_str(), selected: t == draft.lender_type, "{t}" }
                        }
                    }
                }
                div {
                    label { "Amount" }
                    input {
                        inputmode: "decimal",
                        placeholder: "e.g., 150000",
                        disabled: busy,
                        value: "{draft.amount}",
                        oninput: move |e: FormEvent| flow.write().update(|d| d.amount = e.value()),
                    }
                    FieldError { message: field_error(flow, "amount") }
                }
                div {
                    label { "Interest Rate (%)" }
                    input {
                        inputmode: "decimal",
                        placeholder: "e.g., 10.5",
                        disabled: busy,
                        value: "{draft.interest_rate}",
                        oninput: move |e: FormEvent| flow.write().update(|d| d.interest_rate = e.value()),
                    }
                    FieldError { message: field_error(flow, "interestRate") }
                }
                div {
                    label { "Taken Date" }
                    input {
                        r#type: "date",
                        disabled: busy,
                        value: "{draft.taken_date}",
                        oninput: move |e: FormEvent| flow.write().update(|d| d.taken_date = e.value()),
                    }
                    FieldError { message: field_error(flow, "takenDate") }
                }
                div {
                    label { "Due Date" }
                    input {
                        r#type: "date",
                        disabled: busy,
                        value: "{draft.due_date}",
                        oninput: move |e: FormEvent| flow.write().update(|d| d.due_date = e.value()),
                    }
                    FieldError { message: field_error(flow, "dueDate") }
                }
                div {
                    class: "span-2",
                    label { "Repayment Terms" }
                    input {
                        placeholder: "e.g., Monthly Installments",
                        disabled: busy,
                        value: "{draft.repayment_terms}",
                        oninput: move |e: FormEvent| flow.write().update(|d| d.repayment_terms = e.value()),
                    }
                }
                div {
                    class: "span-2",
                    label { "Notes" }
                    textarea {
                        rows: 2,
                        placeholder: "Additional details...",
                        disabled: busy,
                        value: "{draft.notes}",
                        oninput: move |e: FormEvent| flow.write().update(|d| d.notes = e.value()),
                    }
                }

                div {
                    class: "form-actions span-2",
                    button {
                        r#type: "button",
                        class: "btn btn-secondary",
                        disabled: busy,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    SubmitButton { submitting: busy, label: "{label}", busy_label: "Saving..." }
                }
            }
        }
    }
}

#[component]
pub fn PaymentForm(
    lender_name: String,
    flow: Signal<MutationFlow<PaymentDraft>>,
    on_submit: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let Some(view) = View::of(&*flow.read()) else {
        return rsx! {};
    };
    let draft = view.draft;
    let busy = view.submitting;
    let remaining = money(draft.remaining_balance);

    rsx! {
        ModalOverlay {
            title: "Register Payment for {lender_name}",
            busy,
            on_close: move |_| on_cancel.call(()),
            form {
                class: "modal-form",
                onsubmit: move |e: FormEvent| {
                    e.prevent_default();
                    on_submit.call(());
                },
                p {
                    class: "payment-balance",
                    "Remaining Balance: "
                    strong { "{remaining}" }
                }
                FormError { message: view.error }

                label { "Payment Amount" }
                input {
                    inputmode: "decimal",
                    disabled: busy,
                    value: "{draft.amount}",
                    oninput: move |e: FormEvent| flow.write().update(|d| d.amount = e.value()),
                }
                FieldError { message: field_error(flow, "paymentAmount") }

                label { "Payment Date" }
                input {
                    r#type: "date",
                    disabled: busy,
                    value: "{draft.payment_date}",
                    oninput: move |e: FormEvent| flow.write().update(|d| d.payment_date = e.value()),
                }
                FieldError { message: field_error(flow, "paymentDate") }

                label { "Notes (Optional)" }
                textarea {
                    rows: 2,
                    disabled: busy,
                    value: "{draft.notes}",
                    oninput: move |e: FormEvent| flow.write().update(|d| d.notes = e.value()),
                }

                div {
                    class: "form-actions",
                    button {
                        r#type: "button",
                        class: "btn btn-secondary",
                        disabled: busy,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    SubmitButton { submitting: busy, label: "Confirm Payment", busy_label: "Registering..." }
                }
            }
        }
    }
}

/// Email and password, used by the login page.
#[component]
pub fn LoginFields(
    flow: Signal<MutationFlow<LoginDraft>>,
    on_submit: EventHandler<()>,
) -> Element {
    let Some(view) = View::of(&*flow.read()) else {
        return rsx! {};
    };
    let busy = view.submitting;

    rsx! {
        form {
            class: "auth-form",
            onsubmit: move |e: FormEvent| {
                e.prevent_default();
                on_submit.call(());
            },
            FormError { message: view.error }
            label { "Email" }
            input {
                r#type: "email",
                autocomplete: "email",
                disabled: busy,
                value: "{view.draft.email}",
                oninput: move |e: FormEvent| flow.write().update(|d| d.email = e.value()),
            }
            FieldError { message: field_error(flow, "email") }
            label { "Password" }
            input {
                r#type: "password",
                autocomplete: "current-password",
                disabled: busy,
                value: "{view.draft.password}",
                oninput: move |e: FormEvent| flow.write().update(|d| d.password = e.value()),
            }
            FieldError { message: field_error(flow, "password") }
            SubmitButton { submitting: busy, label: "Sign In", busy_label: "Signing in..." }
        }
    }
}

/// Email only, used by the password reset page.
#[component]
pub fn ForgotPasswordFields(
    flow: Signal<MutationFlow<ForgotPasswordDraft>>,
    on_submit: EventHandler<()>,
) -> Element {
    let Some(view) = View::of(&*flow.read()) else {
        return rsx! {};
    };
    let busy = view.submitting;

    rsx! {
        form {
            class: "auth-form",
            onsubmit: move |e: FormEvent| {
                e.prevent_default();
                on_submit.call(());
            },
            FormError { message: view.error }
            label { "Email" }
            input {
                r#type: "email",
                autocomplete: "email",
                disabled: busy,
                value: "{view.draft.email}",
                oninput: move |e: FormEvent| flow.write().update(|d| d.email = e.value()),
            }
            FieldError { message: field_error(flow, "email") }
            SubmitButton { submitting: busy, label: "Send reset link", busy_label: "Sending..." }
        }
    }
}

/// Name, email and password, used by the register page.
#[component]
pub fn RegisterFields(
    flow: Signal<MutationFlow<RegisterDraft>>,
    on_submit: EventHandler<()>,
) -> Element {
    let Some(view) = View::of(&*flow.read()) else {
        return rsx! {};
    };
    let busy = view.submitting;

    rsx! {
        form {
            class: "auth-form",
            onsubmit: move |e: FormEvent| {
                e.prevent_default();
                on_submit.call(());
            },
            FormError { message: view.error }
            label { "Full Name" }
            input {
                autocomplete: "name",
                disabled: busy,
                value: "{view.draft.name}",
                oninput: move |e: FormEvent| flow.write().update(|d| d.name = e.value()),
            }
            FieldError { message: field_error(flow, "name") }
            label { "Email" }
            input {
                r#type: "email",
                autocomplete: "email",
                disabled: busy,
                value: "{view.draft.email}",
                oninput: move |e: FormEvent| flow.write().update(|d| d.email = e.value()),
            }
            FieldError { message: field_error(flow, "email") }
            label { "Password" }
            input {
                r#type: "password",
                autocomplete: "new-password",
                disabled: busy,
                value: "{view.draft.password}",
                oninput: move |e: FormEvent| flow.write().update(|d| d.password = e.value()),
            }
            FieldError { message: field_error(flow, "password") }
            SubmitButton { submitting: busy, label: "Create Account", busy_label: "Creating account..." }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_reach_the_task_form() {
        fn app() -> Element {
            let flow = use_signal(|| {
                let mut flow = MutationFlow::new();
                flow.open_add(TaskDraft {
                    task: "   ".to_string(),
                    priority: 9,
                });
                assert!(flow.submit().is_err());
                flow
            });
            assert_eq!(
                field_error(flow, "task").as_deref(),
                Some("Task description cannot be empty.")
            );
            assert_eq!(field_error(flow, "priority"), None);
            rsx! {
                TaskForm { flow, on_submit: move |_| {}, on_cancel: move |_| {} }
            }
        }
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
    }

    #[test]
    fn test_forgot_password_fields_show_missing_email() {
        fn app() -> Element {
            let flow = use_signal(|| {
                let mut flow = MutationFlow::new();
                flow.open_add(ForgotPasswordDraft::default());
                assert!(flow.submit().is_err());
                flow
            });
            assert_eq!(field_error(flow, "email").as_deref(), Some("Email is required"));
            rsx! {
                ForgotPasswordFields { flow, on_submit: move |_| {} }
            }
        }
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
    }

    #[test]
    fn test_payment_form_shows_payment_field_errors() {
        fn app() -> Element {
            let flow = use_signal(|| {
                let mut flow = MutationFlow::new();
                flow.open_add(PaymentDraft {
                    loan_id: 1,
                    remaining_balance: store::Decimal::from(1200),
                    amount: "0".to_string(),
                    payment_date: "2025-02-01".to_string(),
                    notes: String::new(),
                });
                assert!(flow.submit().is_err());
                flow
            });
            assert!(field_error(flow, "paymentAmount").is_some());
            rsx! {
                PaymentForm {
                    lender_name: "HDFC Bank",
                    flow,
                    on_submit: move |_| {},
                    on_cancel: move |_| {},
                }
            }
        }
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
    }
}
