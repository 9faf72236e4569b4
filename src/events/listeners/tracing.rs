use async_trait::async_trait;

use crate::events::{Listener, TeamEvent};

/// Emits team events as `tracing` events. Requires the `tracing` feature.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &TeamEvent) {
        tracing::info!(
            target: "tipgate::events",
            event_name = event.name(),
            ?event,
            "team event"
        );
    }
}
