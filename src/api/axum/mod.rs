//! Axum handlers for the invitation endpoints.
//!
//! The host application authenticates the request and inserts the caller's
//! [`VerifiedIdentity`](crate::VerifiedIdentity) as a request extension
//! before these routes run.

mod error;
mod handlers;
mod routes;

pub use error::AppError;
pub use routes::{InviteState, invite_routes, join_routes};
