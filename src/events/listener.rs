use async_trait::async_trait;

use super::TeamEvent;

/// Receives team events.
///
/// ```rust,ignore
/// use tipgate::events::{Listener, TeamEvent};
/// use async_trait::async_trait;
///
/// struct PagerListener;
///
/// #[async_trait]
/// impl Listener for PagerListener {
///     async fn handle(&self, event: &TeamEvent) {
///         if let TeamEvent::RoleAssigned { team_id, role, .. } = event {
///             // notify the team's on-call channel
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    async fn handle(&self, event: &TeamEvent);
}
