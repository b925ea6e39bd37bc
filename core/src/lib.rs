//! Read-only command dispatch for agent access to S3.
//!
//! An agent names a client operation and its parameters; the
//! [`CommandDispatcher`](dispatcher::CommandDispatcher) resolves it against a
//! session handle narrowed to read-only operations, runs it and returns
//! length-bounded text.

pub mod api;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod policy;
pub mod render;
pub mod session;
pub mod tool;
pub mod value;

pub use context::AppContext;
