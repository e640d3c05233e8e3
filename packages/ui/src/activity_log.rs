use dioxus::prelude::*;
use store::SyncError;

#[derive(Clone, Debug, PartialEq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

/// Everything the app reported to the user this session. Opens itself on errors.
#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<LogEntry>,
    pub visible: bool,
}

pub fn use_activity_log() -> Signal<ActivityLog> {
    use_context::<Signal<ActivityLog>>()
}

pub fn log_activity(log: &mut Signal<ActivityLog>, level: LogLevel, message: &str) {
    let ts = current_time();
    let mut log = log.write();
    if level == LogLevel::Error {
        log.visible = true;
    }
    log.entries.push(LogEntry {
        timestamp: ts,
        level,
        message: message.to_string(),
    });
}

/// Report a failed backend call under `action`, e.g. "Loading loans".
pub fn log_error(log: &mut Signal<ActivityLog>, action: &str, error: &SyncError) {
    tracing::error!("{action}: {error}");
    log_activity(log, LogLevel::Error, &format!("{action}: {error}"));
}

#[cfg(target_arch = "wasm32")]
fn current_time() -> String {
    let date = js_sys::Date::new_0();
    let h = date.get_hours();
    let m = date.get_minutes();
    let s = date.get_seconds();
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(not(target_arch = "wasm32"))]
fn current_time() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
