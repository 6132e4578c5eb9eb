//! AWS-oriented adapters and the Lambda handler for the user operations dispatcher.
//!
//! This crate owns runtime integration details (the Lambda handler, the Cognito
//! identity adapter, and the PostgreSQL data store adapter). Contract types and
//! routing live in `user_ops_core`.

pub mod adapters;
pub mod handlers;
pub mod logging;
