use common::{FieldError, Game, PageLink, Pagination};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Query string of `GET /api/games`. Values stay raw so that validation can
/// name the field a malformed number came from.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGamesParams {
    pub developer_id: Option<String>,
    pub release_year: Option<String>,
    pub year_min: Option<String>,
    pub year_max: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub score_min: Option<String>,
    pub score_max: Option<String>,
    pub genre: Option<String>,
    pub search: Option<String>,
    pub platform: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParams {
    pub year_a: Option<String>,
    pub year_b: Option<String>,
}

/// Body of `POST /api/games`. Missing fields are reported by validation,
/// not by the JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateGameRequest {
    pub title: String,
    pub genre: String,
    pub release_year: Option<i32>,
    /// `YYYY-MM-DD` or RFC 3339; only the year is kept.
    pub release_date: Option<String>,
    pub developer_id: String,
    pub price: Option<Decimal>,
    pub score: Option<Decimal>,
    pub platforms: String,
    pub description: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateDeveloperRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameListResponse {
    pub games: Vec<Game>,
    pub pagination: Pagination,
    pub page_links: Vec<PageLink>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteGameResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
            fields: Vec::new(),
        }
    }
}
