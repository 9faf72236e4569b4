use async_trait::async_trait;

use crate::events::{Listener, TeamEvent};

/// Writes every event through the `log` crate.
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// Logs at INFO.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &TeamEvent) {
        // rejections are mostly guessing or stale links; keep them out of INFO
        let level = match event {
            TeamEvent::InvitationRejected { .. } => self.level.max(log::Level::Debug),
            _ => self.level,
        };
        log::log!(
            target: "tipgate::events",
            level,
            "event={} {:?}",
            event.name(),
            event
        );
    }
}
