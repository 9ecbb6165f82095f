use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Structured user-facing notice surfaced by the aggregator when a fetch
/// cycle fails outright. How it is displayed is up to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

impl Notification {
    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity: Severity::Error,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Default notifier that forwards notices to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => error!("{}: {}", notification.title, notification.body),
            Severity::Info => info!("{}: {}", notification.title, notification.body),
        }
    }
}
