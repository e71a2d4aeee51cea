//! HTTP service.
//!
//! Exposes the question/answer service under `/api` with axum.

mod reset;
mod routes;
mod server;
mod state;

pub use reset::validate_reset_request;
pub use server::{router, run, serve};
pub use state::AppState;
