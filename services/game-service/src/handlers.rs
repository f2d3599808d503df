use axum::{
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json as ResponseJson,
};
use chrono::{Datelike, Utc};
use common::{
    CatalogStats, Developer, FilterOptions, Game, GenreReport, page_links,
};
use uuid::Uuid;

use crate::error::GameServiceError;
use crate::service::GameService;
use crate::types::{
    CreateDeveloperRequest, CreateGameRequest, DeleteGameResponse, GameListResponse,
    ListGamesParams, ReportParams,
};
use crate::validation::{criteria_from_params, report_years};

// Malformed ids cannot name an existing game.
fn parse_game_id(id: &str) -> Result<Uuid, GameServiceError> {
    Uuid::parse_str(id).map_err(|_| GameServiceError::NotFound("game"))
}

pub async fn list_games_http(
    State(service): State<GameService>,
    params: Result<Query<ListGamesParams>, QueryRejection>,
) -> Result<ResponseJson<GameListResponse>, GameServiceError> {
    let Query(params) = params?;
    let criteria = criteria_from_params(params)?;
    let page = service.list_games(&criteria).await?;

    Ok(ResponseJson(GameListResponse {
        page_links: page_links(page.pagination.page, page.pagination.total_pages),
        games: page.games,
        pagination: page.pagination,
    }))
}

pub async fn get_game_http(
    State(service): State<GameService>,
    Path(id): Path<String>,
) -> Result<ResponseJson<Game>, GameServiceError> {
    let game = service.get_game(parse_game_id(&id)?).await?;
    Ok(ResponseJson(game))
}

pub async fn create_game_http(
    State(service): State<GameService>,
    request: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<Game>), GameServiceError> {
    let Json(request) = request?;
    let game = service.create_game(&request).await?;
    Ok((StatusCode::CREATED, ResponseJson(game)))
}

pub async fn delete_game_http(
    State(service): State<GameService>,
    Path(id): Path<String>,
) -> Result<ResponseJson<DeleteGameResponse>, GameServiceError> {
    service.delete_game(parse_game_id(&id)?).await?;

    Ok(ResponseJson(DeleteGameResponse {
        success: true,
        message: "Game deleted successfully".to_string(),
    }))
}

pub async fn list_developers_http(
    State(service): State<GameService>,
) -> Result<ResponseJson<Vec<Developer>>, GameServiceError> {
    Ok(ResponseJson(service.list_developers().await?))
}

pub async fn create_developer_http(
    State(service): State<GameService>,
    request: Result<Json<CreateDeveloperRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<Developer>), GameServiceError> {
    let Json(request) = request?;
    let developer = service.create_developer(&request.name).await?;
    Ok((StatusCode::CREATED, ResponseJson(developer)))
}

/// Defaults to last year against this year.
pub async fn genre_report_http(
    State(service): State<GameService>,
    params: Result<Query<ReportParams>, QueryRejection>,
) -> Result<ResponseJson<GenreReport>, GameServiceError> {
    let Query(params) = params?;
    let (year_a, year_b) = report_years(&params)?;

    let current_year = Utc::now().year();
    let year_a = year_a.unwrap_or(current_year - 1);
    let year_b = year_b.unwrap_or(current_year);

    Ok(ResponseJson(service.genre_report(year_a, year_b).await?))
}

pub async fn catalog_stats_http(
    State(service): State<GameService>,
) -> Result<ResponseJson<CatalogStats>, GameServiceError> {
    Ok(ResponseJson(service.catalog_stats().await?))
}

pub async fn filter_options_http(
    State(service): State<GameService>,
) -> Result<ResponseJson<FilterOptions>, GameServiceError> {
    Ok(ResponseJson(service.filter_options().await?))
}

pub async fn health_http() -> &'static str {
    "ok"
}
