//! Router assembly.
//!
//! Two surfaces over one store: the realtime websocket gateway at `/api/ws`
//! and the batch REST records API. Both default the board id the same way.

pub mod records;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ws", get(ws::handle_ws))
        .route(
            "/api/strokes",
            get(records::list_strokes).post(records::create_stroke),
        )
        .route(
            "/api/sticky_notes",
            get(records::list_sticky_notes).post(records::create_sticky_note),
        )
        .route(
            "/api/sticky_notes/{id}",
            axum::routing::patch(records::update_sticky_note).delete(records::delete_sticky_note),
        )
        .route("/api/board", delete(records::clear_board))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
