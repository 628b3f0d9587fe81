//! Blog API Library
//!
//! Users, token authentication and posts over HTTP/JSON, backed by SQLite.
//! The binary in `main.rs` wires these pieces into an axum server.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod state;

pub use config::Config;
pub use state::AppState;
