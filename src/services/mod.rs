//! Workflows orchestrating validation, credentials and persistence.
//!
//! Handlers stay thin: they extract the request, call one workflow operation and
//! wrap the result in the response envelope.

pub mod auth;
pub mod tasks;

pub use auth::AuthService;
pub use tasks::TaskService;
