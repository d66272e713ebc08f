//! # Fin Bridge Library
//!
//! Credential-hiding proxy between a browser front end and the Lean and Plaid
//! REST APIs. Secrets stay in the server; the browser talks JSON to the routes
//! in `server` and gets vendor responses relayed back.
//!
//! Modules:
//! - `config`: YAML service configuration with env expansion and validation
//! - `cache`: scope-keyed OAuth token cache
//! - `sources`: Lean (OAuth2 client credentials) and Plaid clients
//! - `workflow`: customer bootstrap state machine
//! - `resilience`: retry policy used by Plaid link token creation
//! - `records`: append-only connection log
//! - `server`: axum routes and the JSON error envelope

pub mod config;
pub mod cache;
pub mod error;
pub mod sources;
pub mod workflow;
pub mod resilience;
pub mod records;
pub mod observability;
pub mod server;
pub mod helpers;
pub mod utils;
#[cfg(test)]
pub mod tests;


pub use crate::config::vendors::ServiceConfig;
pub use crate::error::{BridgeError, BridgeResult};
