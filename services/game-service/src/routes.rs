use axum::{
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    catalog_stats_http, create_developer_http, create_game_http, delete_game_http,
    filter_options_http, genre_report_http, get_game_http, health_http, list_developers_http,
    list_games_http,
};
use crate::service::GameService;

pub fn create_routes(service: GameService) -> Router {
    Router::new()
        .route("/health", get(health_http))
        .route("/api/games", get(list_games_http).post(create_game_http))
        .route("/api/games/{id}", get(get_game_http).delete(delete_game_http))
        .route("/api/developers", get(list_developers_http).post(create_developer_http))
        .route("/api/reports/genres", get(genre_report_http))
        .route("/api/stats", get(catalog_stats_http))
        .route("/api/filters", get(filter_options_http))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}
