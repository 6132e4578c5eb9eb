//! Runtime-free request and response contracts for the user operations dispatcher.
//!
//! This crate owns event normalization, route classification, response
//! envelopes, and process configuration. It intentionally excludes AWS SDK,
//! Lambda runtime, and database driver concerns, which live in `user_ops_lambda`.

pub mod config;
pub mod contract;
pub mod routing;
