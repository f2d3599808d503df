use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate};
use common::{FilterCriteria, Genre, NewGame, SortBy, SortOrder, ValidationError, split_platforms};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::types::{CreateGameRequest, ListGamesParams, ReportParams};

const MAX_SCORE: Decimal = Decimal::ONE_HUNDRED;
// Columns are NUMERIC(10, 2) for price and NUMERIC(5, 2) for score.
const MAX_PRICE_CENTS: i64 = 9_999_999_999;
const MONEY_SCALE: u32 = 2;

fn max_price() -> Decimal {
     Decimal::new(MAX_PRICE_CENTS, MONEY_SCALE)
}

fn has_extra_decimals(value: Decimal) -> bool {
     value.normalize().scale() > MONEY_SCALE
}

fn non_blank(value: Option<&str>) -> Option<&str> {
     value.map(str::trim).filter(|s| !s.is_empty())
}

// Blank means absent; anything else must parse.
fn parse_param<T: FromStr>(
     errors: &mut ValidationError,
     field: &str,
     value: Option<&str>,
     expected: &str,
) -> Option<T> {
     let raw = non_blank(value)?;
     match raw.parse() {
          Ok(parsed) => Some(parsed),
          Err(_) => {
               errors.push(field, format!("must be {expected}, got '{raw}'"));
               None
          }
     }
}

/// Extracts the year from a calendar date or an RFC 3339 timestamp.
pub fn year_from_date(date: &str) -> Option<i32> {
     let date = date.trim();
     NaiveDate::parse_from_str(date, "%Y-%m-%d")
          .map(|d| d.year())
          .or_else(|_| DateTime::parse_from_rfc3339(date).map(|d| d.year()))
          .ok()
}

pub fn validate_developer_name(name: &str) -> Result<String, ValidationError> {
     let name = name.trim();
     if name.is_empty() {
          return Err(ValidationError::single("name", "must not be empty"));
     }
     Ok(name.to_string())
}

/// Checks every field and reports all problems at once.
pub fn validate_create_game_request(req: &CreateGameRequest) -> Result<NewGame, ValidationError> {
     let mut errors = ValidationError::default();

     let title = req.title.trim();
     if title.is_empty() {
          errors.push("title", "must not be empty");
     }

     let genre = match req.genre.trim().parse::<Genre>() {
          Ok(genre) => Some(genre),
          Err(_) => {
               errors.push("genre", format!("must be one of the known genres, got '{}'", req.genre));
               None
          }
     };

     let release_year = match (req.release_year, non_blank(req.release_date.as_deref())) {
          (Some(year), _) => Some(year),
          (None, Some(date)) => {
               let year = year_from_date(date);
               if year.is_none() {
                    errors.push("releaseDate", "must be a YYYY-MM-DD date");
               }
               year
          }
          (None, None) => {
               errors.push("releaseYear", "is required");
               None
          }
     };

     let developer_id = match Uuid::parse_str(req.developer_id.trim()) {
          Ok(id) => Some(id),
          Err(_) => {
               errors.push("developerId", "must be a valid developer id");
               None
          }
     };

     match req.price {
          None => errors.push("price", "is required"),
          Some(price) if price < Decimal::ZERO => {
               errors.push("price", "must not be negative")
          }
          Some(price) if price > max_price() => {
               errors.push("price", format!("must not exceed {}", max_price()))
          }
          Some(price) if has_extra_decimals(price) => {
               errors.push("price", "must have at most 2 decimal places")
          }
          Some(_) => {}
     }

     match req.score {
          None => errors.push("score", "is required"),
          Some(score) if score < Decimal::ZERO || score > MAX_SCORE => {
               errors.push("score", "must be between 0 and 100")
          }
          Some(score) if has_extra_decimals(score) => {
               errors.push("score", "must have at most 2 decimal places")
          }
          Some(_) => {}
     }

     let platforms = split_platforms(&req.platforms).collect::<Vec<_>>().join(", ");
     if platforms.is_empty() {
          errors.push("platforms", "must list at least one platform");
     }

     let description = req.description.trim();
     if description.is_empty() {
          errors.push("description", "must not be empty");
     }

     match (genre, release_year, developer_id, req.price, req.score) {
          (Some(genre), Some(release_year), Some(developer_id), Some(price), Some(score)) if errors.is_empty() => {
               Ok(NewGame {
                    title: title.to_string(),
                    genre,
                    release_year,
                    price,
                    score,
                    platforms,
                    description: description.to_string(),
                    developer_id,
               })
          }
          _ => Err(errors),
     }
}

/// Resolves listing parameters into criteria: defaults applied, page size
/// clamped to `[1, 100]`, malformed numbers and unknown sort directives
/// rejected.
pub fn criteria_from_params(params: ListGamesParams) -> Result<FilterCriteria, ValidationError> {
     let mut errors = ValidationError::default();
     let defaults = FilterCriteria::default();

     let developer_id = non_blank(params.developer_id.as_deref()).and_then(|id| {
          Uuid::parse_str(id)
               .map_err(|_| errors.push("developerId", "must be a valid developer id"))
               .ok()
     });

     let release_year = parse_param(&mut errors, "releaseYear", params.release_year.as_deref(), "a year");
     let year_min = parse_param(&mut errors, "yearMin", params.year_min.as_deref(), "a year");
     let year_max = parse_param(&mut errors, "yearMax", params.year_max.as_deref(), "a year");
     let price_min = parse_param(&mut errors, "priceMin", params.price_min.as_deref(), "a number");
     let price_max = parse_param(&mut errors, "priceMax", params.price_max.as_deref(), "a number");
     let score_min = parse_param(&mut errors, "scoreMin", params.score_min.as_deref(), "a number");
     let score_max = parse_param(&mut errors, "scoreMax", params.score_max.as_deref(), "a number");

     let page = match parse_param::<i64>(&mut errors, "page", params.page.as_deref(), "an integer") {
          None => defaults.page,
          Some(page) if page < 1 => {
               errors.push("page", "must be at least 1");
               defaults.page
          }
          Some(page) => page as u64,
     };

     let limit = parse_param::<i64>(&mut errors, "limit", params.limit.as_deref(), "an integer")
          .map(|limit| limit.clamp(1, i64::from(common::MAX_PAGE_SIZE)) as u32)
          .unwrap_or(defaults.limit);

     let sort_by = non_blank(params.sort_by.as_deref())
          .map(str::parse::<SortBy>)
          .transpose()
          .unwrap_or_else(|e| {
               errors.push(e.field, format!("has unknown value '{}'", e.value));
               None
          })
          .unwrap_or_default();

     let sort_order = non_blank(params.sort_order.as_deref())
          .map(str::parse::<SortOrder>)
          .transpose()
          .unwrap_or_else(|e| {
               errors.push(e.field, format!("has unknown value '{}'", e.value));
               None
          })
          .unwrap_or_default();

     errors.into_result(FilterCriteria {
          developer_id,
          release_year,
          year_min,
          year_max,
          price_min,
          price_max,
          score_min,
          score_max,
          genre: params.genre,
          search: params.search,
          platform: params.platform,
          page,
          limit,
          sort_by,
          sort_order,
     })
}

/// Parses the optional report years; absent years are left to the caller.
pub fn report_years(params: &ReportParams) -> Result<(Option<i32>, Option<i32>), ValidationError> {
     let mut errors = ValidationError::default();
     let year_a = parse_param(&mut errors, "yearA", params.year_a.as_deref(), "a year");
     let year_b = parse_param(&mut errors, "yearB", params.year_b.as_deref(), "a year");
     errors.into_result((year_a, year_b))
}
