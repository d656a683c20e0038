//! HTTP surface: the well-known manifest route and a health check.

pub mod server;
pub mod types;

pub use server::{AppState, MANIFEST_PATH, ServerHandle, router, start_server};
