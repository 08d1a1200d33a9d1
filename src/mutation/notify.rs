use serde::Serialize;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, trace};

/// Notifications kept for a listener that has not drained yet; older ones
/// are dropped first
pub const NOTIFICATION_BACKLOG: usize = 32;

pub type NotificationReceiver = broadcast::Receiver<Notification>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient, auto-dismissing message for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    #[serde(skip)]
    pub auto_close: Duration,
}

/// Sending half of the notification stream
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
    auto_close: Duration,
}

impl Notifier {
    pub fn channel(auto_close: Duration) -> (Self, NotificationReceiver) {
        let (tx, rx) = broadcast::channel(NOTIFICATION_BACKLOG);
        (Self { tx, auto_close }, rx)
    }

    pub fn success(&self, message: impl Into<String>) {
        self.emit(NotificationLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.emit(NotificationLevel::Error, message.into());
    }

    fn emit(&self, level: NotificationLevel, message: String) {
        let notification = Notification {
            level,
            message,
            auto_close: self.auto_close,
        };
        // Receiver gone means the view unmounted
        if let Err(e) = self.tx.send(notification) {
            trace!("Dropping notification with no listener: {}", e.0.message);
        }
    }
}

/// Drain everything currently queued without waiting
pub fn drain(rx: &mut NotificationReceiver) -> Vec<Notification> {
    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(notification) => out.push(notification),
            Err(TryRecvError::Lagged(skipped)) => debug!("Skipped {} stale notifications", skipped),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    out
}
