use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Create the HTTP router with all routes
///
/// When `static_dir` exists it is served as the fallback, which is where the
/// tabbed web form lives.
pub fn create_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session lifecycle
        .route("/sessions", post(handlers::start_session))
        .route("/sessions/active", get(handlers::get_active_session))
        .route("/sessions/active/close", post(handlers::close_session))
        .route("/sessions/:session_id", get(handlers::get_session))
        // Interviews
        .route("/interviews", post(handlers::begin_interview))
        .route(
            "/interviews/:interview_id",
            get(handlers::get_interview).delete(handlers::abandon_interview),
        )
        .route(
            "/interviews/:interview_id/answer",
            post(handlers::submit_answer),
        )
        // Stored transcripts
        .route("/transcripts", get(handlers::list_transcripts))
        .route(
            "/transcripts/:transcript_id",
            get(handlers::get_transcript).delete(handlers::delete_transcript),
        )
        // Reporting
        .route("/reports", post(handlers::generate_report))
        .route(
            "/reports/compare",
            post(handlers::generate_comparative_report),
        )
        .route("/stats", get(handlers::get_statistics));

    let router = match static_dir.filter(|dir| dir.is_dir()) {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        // Request logging, and CORS for a UI served from another origin
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
