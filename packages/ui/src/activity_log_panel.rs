use dioxus::prelude::*;

use crate::activity_log::{use_activity_log, LogEntry, LogLevel};

const ACTIVITY_LOG_CSS: Asset = asset!("/assets/styling/activity_log.css");

fn level_class(level: &LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "activity-log-entry error",
        LogLevel::Warning => "activity-log-entry warning",
        LogLevel::Success => "activity-log-entry success",
        LogLevel::Info => "activity-log-entry info",
    }
}

/// Slide-in list of everything reported this session, newest first.
#[component]
pub fn ActivityLogPanel() -> Element {
    let mut log = use_activity_log();

    if !log().visible {
        return rsx! {};
    }

    let entries: Vec<LogEntry> = log().entries.iter().rev().cloned().collect();
    let errors = entries.iter().filter(|e| e.level == LogLevel::Error).count();
    let empty = entries.is_empty();

    rsx! {
        document::Stylesheet { href: ACTIVITY_LOG_CSS }

        aside {
            class: "activity-log-panel",
            header {
                class: "activity-log-header",
                span { "Activity" }
                if errors > 0 {
                    span { class: "activity-log-error-count", "{errors} failed" }
                }
                div {
                    class: "activity-log-header-actions",
                    button {
                        disabled: empty,
                        onclick: move |_| log.write().entries.clear(),
                        "Clear"
                    }
                    button {
                        onclick: move |_| log.write().visible = false,
                        "Close"
                    }
                }
            }
            ul {
                class: "activity-log-entries",
                if empty {
                    li { class: "activity-log-empty", "Nothing to report." }
                }
                for entry in entries {
                    li {
                        class: level_class(&entry.level),
                        time { class: "activity-log-time", "{entry.timestamp}" }
                        span { class: "activity-log-message", "{entry.message}" }
                    }
                }
            }
        }
    }
}

/// Topbar button showing how many entries the log holds.
#[component]
pub fn ActivityLogToggle() -> Element {
    let mut log = use_activity_log();
    let count = log().entries.len();
    let has_errors = log().entries.iter().any(|e| e.level == LogLevel::Error);

    rsx! {
        button {
            class: if has_errors { "activity-log-toggle has-errors" } else { "activity-log-toggle" },
            title: "Activity",
            onclick: move |_| {
                let visible = log().visible;
                log.write().visible = !visible;
            },
            if count > 0 { "Activity ({count})" } else { "Activity" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity_log::ActivityLog;

    fn render(app: fn() -> Element) {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
    }

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        LogEntry {
            timestamp: "10:00:00".to_string(),
            level,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_panel_renders_entries_and_error_count() {
        fn app() -> Element {
            use_context_provider(|| {
                Signal::new(ActivityLog {
                    entries: vec![
                        entry(LogLevel::Success, "Task added"),
                        entry(LogLevel::Error, "Loading loans: API Error"),
                    ],
                    visible: true,
                })
            });
            rsx! { ActivityLogPanel {} }
        }
        render(app);
    }

    #[test]
    fn test_panel_renders_when_empty() {
        fn app() -> Element {
            use_context_provider(|| {
                Signal::new(ActivityLog {
                    entries: Vec::new(),
                    visible: true,
                })
            });
            rsx! { ActivityLogPanel {} }
        }
        render(app);
    }
}
