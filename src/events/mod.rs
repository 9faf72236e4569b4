//! Event system for team actions.
//!
//! Invitation and role actions fire a [`TeamEvent`] after they finish. With
//! no listeners registered the dispatch is a no-op.
//!
//! ```rust,ignore
//! use tipgate::register_event_listeners;
//! use tipgate::events::listeners::LoggingListener;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::TeamEvent;
pub use listener::Listener;
pub use registry::{EventRegistry, dispatch, register_event_listeners};
