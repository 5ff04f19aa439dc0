//! Library surface of the techfolio web server, shared between the binary
//! and integration tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod main_lib;

pub use main_lib::{build_state, init_tracing, AppState};
