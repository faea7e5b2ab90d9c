//! HTTP prediction service wrapping `agroyield-pipeline`
//!
//! Modules:
//! - `config`: TOML + environment configuration
//! - `server`: Router, handlers, and error payload shaping

pub mod config;
pub mod server;

pub use config::ServerConfig;
pub use server::{build_router, start_server, AppState};
