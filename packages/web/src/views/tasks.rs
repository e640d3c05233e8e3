use dioxus::prelude::*;
use store::view::{tasks_by_priority, TaskMetrics};
use store::{DeleteFlow, MutationFlow, Task, TaskDraft};
use ui::{
    icons, settle, use_activity_log, use_resource_store, use_user_id, ConfirmDialog, ErrorBanner,
    Icon, MetricCard, PriorityBadge, TaskForm, Tone,
};

#[component]
pub fn Tasks() -> Element {
    let user_id = use_user_id();
    let log = use_activity_log();
    let tasks = use_resource_store::<Task>(user_id, log, "tasks");
    let mut form = use_signal(MutationFlow::<TaskDraft>::new);
    let mut deletion = use_signal(DeleteFlow::new);

    let metrics = use_memo(move || TaskMetrics::of(tasks.read().items()));
    let rows: Vec<Task> = tasks_by_priority(tasks.read().items())
        .into_iter()
        .cloned()
        .collect();
    let loaded = tasks.read().is_loaded();

    let save = move |_| {
        let Some(uid) = user_id() else {
            return;
        };
        let submission = match form.write().submit() {
            Ok(submission) => submission,
            Err(e) => {
                tracing::debug!("task not submitted: {e}");
                return;
            }
        };
        let saved = if submission.mode.is_edit() { "Task updated" } else { "Task added" };
        spawn(async move {
            let outcome = match api::client() {
                Ok(client) => client.save_task(uid, submission).await,
                Err(e) => Err(e),
            };
            let done = form.write().complete(outcome);
            settle(done, tasks, uid, log, saved).await;
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
                Ok(client) => client.delete_task(id).await,
                Err(e) => Err(e),
            };
            let done = deletion.write().complete(outcome);
            settle(done, tasks, uid, log, "Task deleted").await;
        });
    };

    let m = metrics();

    rsx! {
        div {
            class: "page",
            div {
                class: "page-header",
                h1 { "To-Do List" }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| form.write().open_add(TaskDraft::default()),
                    Icon { icon: icons::FaPlus, width: 14, height: 14 }
                    "Add New Task"
                }
            }

            div {
                class: "metrics",
                MetricCard { name: "Total Tasks", value: "{m.total}" }
                MetricCard { name: "High Priority", value: "{m.high}", tone: Tone::Red }
                MetricCard { name: "Medium Priority", value: "{m.medium}", tone: Tone::Yellow }
                MetricCard { name: "Low Priority", value: "{m.low}", tone: Tone::Green }
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
                            th { "#" }
                            th { "Task" }
                            th { "Priority" }
                            th { "Actions" }
                        }
                    }
                    tbody {
                        if rows.is_empty() {
                            tr {
                                td {
                                    class: "empty-row",
                                    colspan: "4",
                                    if loaded { "No tasks yet. Add one to get started." } else { "Loading tasks..." }
                                }
                            }
                        }
                        for (index, task) in rows.into_iter().enumerate() {
                            tr {
                                key: "{task.id}",
                                td { "{index + 1}" }
                                td { "{task.task}" }
                                td { PriorityBadge { priority: task.priority } }
                                td {
                                    div {
                                        class: "row-actions",
                                        button {
                                            class: "icon-btn edit",
                                            title: "Edit",
                                            onclick: {
                                                let task = task.clone();
                                                move |_| form.write().open_edit(&task)
                                            },
                                            Icon { icon: icons::FaPen, width: 14, height: 14 }
                                        }
                                        button {
                                            class: "icon-btn delete",
                                            title: "Delete",
                                            onclick: move |_| deletion.write().request(task.id),
                                            Icon { icon: icons::FaTrash, width: 14, height: 14 }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        TaskForm {
            flow: form,
            on_submit: save,
            on_cancel: move |_| {
                form.write().cancel();
            },
        }

        if deletion.read().pending().is_some() || deletion.read().is_submitting() {
            ConfirmDialog {
                message: "Are you sure you want to delete this task?",
                busy: deletion.read().is_submitting(),
                on_confirm: confirm_delete,
                on_cancel: move |_| deletion.write().decline(),
            }
        }
    }
}
