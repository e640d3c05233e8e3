use dioxus::prelude::*;
use store::view::{format_date, LoanQuery, LoanSort, LoanTotals};
use store::{DeleteFlow, Id, LenderType, Loan, LoanDraft, MutationFlow, PaymentDraft};
use ui::{
    icons, money, settle, today, use_activity_log, use_resource_store, use_user_id,
    ConfirmDialog, ErrorBanner, Icon, LoanForm, MetricCard, PaymentForm, StatusBadge, Tone,
};

/// Loan tracker: totals, filters, the loans table and its three dialogs.
#[component]
pub fn Loans() -> Element {
    let user_id = use_user_id();
    let log = use_activity_log();
    let loans = use_resource_store::<Loan>(user_id, log, "loans");

    let mut query = use_signal(LoanQuery::default);
    let mut order = use_signal(LoanSort::default);

    let mut form = use_signal(MutationFlow::<LoanDraft>::new);
    let mut payment = use_signal(MutationFlow::<PaymentDraft>::new);
    let mut paying = use_signal(String::new);
    let mut deletion = use_signal(DeleteFlow::new);

    // Cards always describe every loan; the filters only narrow the table.
    let totals = use_memo(move || LoanTotals::of(loans.read().items()));
    let (rows, shown) = {
        let store = loans.read();
        let mut rows = query.read().apply(store.items());
        order().sort(&mut rows);
        let shown = LoanTotals::of(rows.iter().copied());
        let rows: Vec<Loan> = rows.into_iter().cloned().collect();
        (rows, shown)
    };
    let loaded = loans.read().is_loaded();
    let filtering = !query.read().is_empty();

    let save = move |_| {
        let Some(uid) = user_id() else {
            return;
        };
        let submission = match form.write().submit() {
            Ok(submission) => submission,
            Err(e) => {
                tracing::debug!("loan not submitted: {e}");
                return;
            }
        };
        let saved = if submission.mode.is_edit() { "Loan updated" } else { "Loan added" };
        spawn(async move {
            let outcome = match api::client() {
                Ok(client) => client.save_loan(uid, submission).await,
                Err(e) => Err(e),
            };
            let done = form.write().complete(outcome);
            settle(done, loans, uid, log, saved).await;
        });
    };

    let pay = move |_| {
        let Some(uid) = user_id() else {
            return;
        };
        let submission = match payment.write().submit() {
            Ok(submission) => submission,
            Err(e) => {
                tracing::debug!("payment not submitted: {e}");
                return;
            }
        };
        spawn(async move {
            let outcome = match api::client() {
                Ok(client) => client.register_payment(submission).await,
                Err(e) => Err(e),
            };
            let done = payment.write().complete(outcome);
            settle(done, loans, uid, log, "Payment registered").await;
        });
    };

    let confirm_delete = move |_| {
        let Some(uid) = user_id() else {
            return;
        };
        let Ok(id) = deletion.write().confirm() else {
            return;
        };
        spawn(async move {
            let outcome = match api::client() {
                Ok(client) => client.delete_loan(id).await,
                Err(e) => Err(e),
            };
            let done = deletion.write().complete(outcome);
            settle(done, loans, uid, log, "Loan deleted").await;
        });
    };

    let t = totals();
    let principal = money(t.principal);
    let remaining = money(t.remaining);
    let search = query.read().search.clone();
    let type_value = query.read().lender_type.map(|t| t.as_str()).unwrap_or("");
    let sort_value = order().label();
    let shown_remaining = money(shown.remaining);

    rsx! {
        div {
            class: "page",
            div {
                class: "page-header",
                h1 { "Loan Tracker" }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| form.write().open_add(LoanDraft::new(today())),
                    Icon { icon: icons::FaPlus, width: 14, height: 14 }
                    "Add New Loan"
                }
            }

            div {
                class: "metrics",
                MetricCard { name: "Total Principal Borrowed", value: "{principal}" }
                MetricCard { name: "Total Balance Remaining", value: "{remaining}", tone: Tone::Red }
                MetricCard { name: "Active Loans", value: "{t.active}", tone: Tone::Yellow }
                MetricCard { name: "Paid Off Loans", value: "{t.paid_off}", tone: Tone::Green }
            }

            div {
                class: "filters",
                input {
                    r#type: "text",
                    placeholder: "Search by Lender Name...",
                    value: "{search}",
                    oninput: move |e: FormEvent| query.write().search = e.value(),
                }
                select {
                    value: "{type_value}",
                    onchange: move |e: FormEvent| query.write().lender_type = LenderType::parse(&e.value()),
                    option { value: "", "All Types" }
                    for lender_type in LenderType::ALL {
                        option { value: "{lender_type}", "{lender_type}" }
                    }
                }
                select {
                    value: "{sort_value}",
                    onchange: move |e: FormEvent| order.set(LoanSort::parse(&e.value())),
                    for label in LoanSort::ALL.map(|s| s.label()) {
                        option { value: "{label}", "Sort: {label}" }
                    }
                }
            }

            if filtering {
                p {
                    class: "filters-summary",
                    "Showing {shown.count} of {t.count} loans, {shown_remaining} remaining"
                }
            }

            if let Some(message) = deletion.read().error() {
                ErrorBanner {
                    message: "{message}",
                    on_dismiss: move |_| deletion.write().dismiss_error(),
                }
            }

            div {
                class: "table-wrap",
                table {
                    thead {
                        tr {
                            for column in ["Lender", "Type", "Original Amt", "Remaining", "Rate", "Due Date", "Status", "Actions"] {
                                th { "{column}" }
                            }
                        }
                    }
                    tbody {
                        if rows.is_empty() {
                            tr {
                                td {
                                    class: "empty-row",
                                    colspan: "8",
                                    if !loaded {
                                        "Loading loans..."
                                    } else if filtering {
                                        "No loans match your filters."
                                    } else {
                                        "No loans recorded yet."
                                    }
                                }
                            }
                        }
                        for loan in rows {
                            LoanRow {
                                key: "{loan.id}",
                                loan: loan.clone(),
                                on_pay: move |loan: Loan| {
                                    paying.set(loan.lender_name.clone());
                                    payment.write().open_add(PaymentDraft::from(&loan).dated(today()));
                                },
                                on_edit: move |loan: Loan| form.write().open_edit(&loan),
                                on_delete: move |id: Id| deletion.write().request(id),
                            }
                        }
                    }
                }
            }
        }

        LoanForm {
            flow: form,
            on_submit: save,
            on_cancel: move |_| {
                form.write().cancel();
            },
        }

        PaymentForm {
            lender_name: paying(),
            flow: payment,
            on_submit: pay,
            on_cancel: move |_| {
                payment.write().cancel();
            },
        }

        if deletion.read().pending().is_some() || deletion.read().is_submitting() {
            ConfirmDialog {
                message: "Are you sure you want to delete this loan and all its payment history?",
                busy: deletion.read().is_submitting(),
                on_confirm: confirm_delete,
                on_cancel: move |_| deletion.write().decline(),
            }
        }
    }
}

#[component]
fn LoanRow(
    loan: Loan,
    on_pay: EventHandler<Loan>,
    on_edit: EventHandler<Loan>,
    on_delete: EventHandler<Id>,
) -> Element {
    let id = loan.id;
    let paid_off = loan.is_paid_off();
    let amount = money(loan.amount);
    let remaining = money(loan.remaining_balance);
    let rate = loan.interest_rate.round_dp(2);
    let due = format_date(loan.due_date);
    let pay_title = if paid_off { "Loan is paid off" } else { "Register Payment" };
    let pay_loan = loan.clone();
    let edit_loan = loan.clone();

    rsx! {
        tr {
            td { class: "lender", "{loan.lender_name}" }
            td { class: "muted", "{loan.lender_type}" }
            td { "{amount}" }
            td { class: "remaining", "{remaining}" }
            td { "{rate:.2}%" }
            td { "{due}" }
            td { StatusBadge { status: loan.status } }
            td {
                div {
                    class: "row-actions",
                    button {
                        class: "icon-btn pay",
                        title: pay_title,
                        disabled: paid_off,
                        onclick: move |_| on_pay.call(pay_loan.clone()),
                        Icon { icon: icons::FaMoneyBillTransfer, width: 14, height: 14 }
                    }
                    button {
                        class: "icon-btn edit",
                        title: "Edit Loan",
                        onclick: move |_| on_edit.call(edit_loan.clone()),
                        Icon { icon: icons::FaPen, width: 14, height: 14 }
                    }
                    button {
                        class: "icon-btn delete",
                        title: "Delete Loan",
                        onclick: move |_| on_delete.call(id),
                        Icon { icon: icons::FaTrash, width: 14, height: 14 }
                    }
                }
            }
        }
    }
}
