use dioxus::prelude::*;
use store::view::{format_date, tasks_by_priority, DashboardSummary};
use store::{Loan, Task};
use ui::{
    money, today, use_activity_log, use_auth, use_resource_store, use_user_id, MetricCard,
    PriorityBadge, Tone,
};

use crate::Route;

const TOP_TASKS: usize = 5;

#[component]
pub fn Dashboard() -> Element {
    let auth = use_auth();
    let user_id = use_user_id();
    let log = use_activity_log();
    let tasks = use_resource_store::<Task>(user_id, log, "tasks");
    let loans = use_resource_store::<Loan>(user_id, log, "loans");

    let summary =
        use_memo(move || DashboardSummary::of(tasks.read().items(), loans.read().items(), today()));
    let top: Vec<Task> = tasks_by_priority(tasks.read().items())
        .into_iter()
        .take(TOP_TASKS)
        .cloned()
        .collect();

    let name = auth
        .read()
        .user
        .as_ref()
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();
    let s = summary();
    let remaining = money(s.loans.remaining);
    let repaid = money(s.loans.repaid());

    rsx! {
        div {
            class: "page dashboard",
            div {
                class: "welcome",
                h1 { "Welcome, " span { class: "welcome-name", "{name}" } }
                p { class: "muted", "List your day here for a better tomorrow" }
            }

            div {
                class: "metrics",
                MetricCard { name: "Open Tasks", value: "{s.tasks.total}" }
                MetricCard { name: "High Priority", value: "{s.tasks.high}", tone: Tone::Red }
                MetricCard { name: "Balance Remaining", value: "{remaining}", tone: Tone::Yellow }
                MetricCard { name: "Repaid So Far", value: "{repaid}", tone: Tone::Green }
            }

            div {
                class: "dashboard-grid",
                section {
                    class: "panel",
                    div {
                        class: "panel-header",
                        h2 { "Top tasks" }
                        Link { to: Route::Tasks {}, "View all" }
                    }
                    if top.is_empty() {
                        p { class: "muted", "Nothing on your list." }
                    }
                    ul {
                        class: "top-tasks",
                        for task in top {
                            li {
                                key: "{task.id}",
                                span { "{task.task}" }
                                PriorityBadge { priority: task.priority }
                            }
                        }
                    }
                }

                section {
                    class: "panel",
                    div {
                        class: "panel-header",
                        h2 { "Loans" }
                        Link { to: Route::Loans {}, "View all" }
                    }
                    p { "{s.loans.active} active, {s.loans.paid_off} paid off" }
                    if s.overdue > 0 {
                        p { class: "overdue", "{s.overdue} past their due date" }
                    }
                    match s.next_due {
                        Some(loan) => rsx! {
                            NextDue { loan }
                        },
                        None => rsx! {
                            p { class: "muted", "No upcoming due dates." }
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn NextDue(loan: Loan) -> Element {
    let due = format_date(loan.due_date);
    let remaining = money(loan.remaining_balance);
    rsx! {
        div {
            class: "next-due",
            span { class: "muted", "Next due" }
            strong { "{loan.lender_name}" }
            span { "{remaining} on {due}" }
        }
    }
}
