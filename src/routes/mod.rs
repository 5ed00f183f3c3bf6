/// Application routes configuration
use crate::handlers::{
    get_game, health, impact_achieved, list_strategies, reset_game, select_strategy, watch_game,
    AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Catalog
        .route("/strategies", get(list_strategies))
        // Game session
        .route("/game", get(get_game))
        .route("/game/watch", get(watch_game))
        .route("/game/select/:key", post(select_strategy))
        .route("/game/reset", post(reset_game))
        .route("/game/impact", post(impact_achieved))
        .with_state(state)
}
