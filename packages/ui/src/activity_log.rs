use dioxus::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn class(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Success => "success",
            LogLevel::Info => "info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub id: usize,
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<LogEntry>,
    pub visible: bool,
    /// Entry shown as a toast until dismissed.
    pub toast: Option<usize>,
}

impl ActivityLog {
    pub fn toast_entry(&self) -> Option<&LogEntry> {
        let id = self.toast?;
        self.entries.iter().find(|e| e.id == id)
    }
}

pub fn use_activity_log() -> Signal<ActivityLog> {
    use_context::<Signal<ActivityLog>>()
}

/// Append to the log. Success and error entries also pop up as a toast.
pub fn log_activity(log: &mut Signal<ActivityLog>, level: LogLevel, message: &str) {
    let ts = current_time();
    let mut log = log.write();
    let id = log.entries.len();
    if matches!(level, LogLevel::Success | LogLevel::Error) {
        log.toast = Some(id);
    }
    log.entries.push(LogEntry {
        id,
        timestamp: ts,
        level,
        message: message.to_string(),
    });
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
    "00:00:00".to_string()
}
