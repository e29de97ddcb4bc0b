use axum::{extract::State, routing::get, Json, Router};
use farewatch_catalog::market::{live_board, popular_routes};
use farewatch_catalog::{LiveFare, PopularRoute};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/routes/popular", get(popular))
        .route("/api/prices/live", get(live))
}

/// GET /api/routes/popular
pub async fn popular() -> Json<Vec<PopularRoute>> {
    Json(popular_routes())
}

/// GET /api/prices/live
/// One jitter step over the ticker baseline per call.
pub async fn live(State(state): State<AppState>) -> Json<Vec<LiveFare>> {
    let mut rng = state.rng();
    Json(live_board(&mut rng))
}
