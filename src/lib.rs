//! Waya mini-app service.
//!
//! Serves the Farcaster/Base mini-app manifest at
//! `/.well-known/farcaster.json` and provides the wallet-operation helpers
//! (backoff retry, error classification, address formatting) used by the
//! client surface.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod manifest;
pub mod settings;
pub mod wallet;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
