//! HTTP facade.
//!
//! Thin axum layer translating JSON requests into [`ContainerManager`]
//! calls. All responses are HTTP 200; operation failure is expressed in
//! the `{success, message, status}` envelope, matching what the panel's
//! polling script expects.
//!
//! [`ContainerManager`]: crate::manager::ContainerManager

mod handlers;
mod server;
mod types;

pub use server::Server;
pub use types::{EngineInfoResponse, OpResponse, StartRequest};
