//! HTTP API server for the interview and reporting UI
//!
//! This module provides a REST API over the facilitator:
//! - POST /sessions - Start a new alignment session
//! - GET /sessions/active - Current open session
//! - POST /sessions/active/close - End the current session
//! - POST /interviews - Begin an interview
//! - POST /interviews/:id/answer - Submit an answer
//! - POST /reports, POST /reports/compare - Generate reports
//! - GET /transcripts, GET /stats, GET /health

mod handlers;
mod routes;
mod state;

pub use handlers::ErrorResponse;
pub use routes::create_router;
pub use state::AppState;
