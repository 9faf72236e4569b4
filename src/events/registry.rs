use std::sync::OnceLock;

use super::{Listener, TeamEvent};

static REGISTRY: OnceLock<EventRegistry> = OnceLock::new();

/// Listeners registered at startup.
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventRegistry {
    fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Listeners are called in registration order.
    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    async fn dispatch(&self, event: &TeamEvent) {
        for listener in &self.listeners {
            listener.handle(event).await;
        }
    }
}

/// Installs the process-wide listeners. Only the first call takes effect;
/// later calls log a warning and are ignored.
///
/// ```rust,ignore
/// use tipgate::register_event_listeners;
/// use tipgate::events::listeners::LoggingListener;
///
/// register_event_listeners(|registry| {
///     registry.listen(LoggingListener::new());
/// });
/// ```
pub fn register_event_listeners<F>(f: F)
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::new();
    f(&mut registry);
    if REGISTRY.set(registry).is_err() {
        log::warn!(
            target: "tipgate",
            "register_event_listeners called more than once, ignoring"
        );
    }
}

/// Sends `event` to every registered listener; a no-op if none are.
pub async fn dispatch(event: TeamEvent) {
    if let Some(registry) = REGISTRY.get() {
        registry.dispatch(&event).await;
    }
}
