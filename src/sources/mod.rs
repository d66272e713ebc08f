//! Outbound vendor clients.
//!
//! `oauth2` issues Lean tokens, `lean` and `plaid` wrap the two REST APIs and
//! `relay` is the send path they share.

pub mod lean;
pub mod lean_types;
pub mod oauth2;
pub mod plaid;
pub mod plaid_types;
pub mod relay;
