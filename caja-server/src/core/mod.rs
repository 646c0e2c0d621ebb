//! Core module - configuration, shared state and the HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::{setup_environment, Config};
pub use server::Server;
pub use state::ServerState;
