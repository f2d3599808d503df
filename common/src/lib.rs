use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub mod models {
    use super::*;
    use std::fmt;
    use std::str::FromStr;

    use crate::errors::ParseEnumError;

    /// Default number of games per page.
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    /// Hard upper bound on the page size a caller may request.
    pub const MAX_PAGE_SIZE: u32 = 100;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum Genre {
        Action,
        Adventure,
        Rpg,
        Strategy,
        Simulation,
        Sports,
        Racing,
        Puzzle,
        Fighting,
        Platformer,
        Shooter,
        Horror,
        Mmorpg,
        BattleRoyale,
        Roguelike,
        Indie,
        Survival,
        OpenWorld,
    }

    impl Genre {
        pub const ALL: [Genre; 18] = [
            Genre::Action,
            Genre::Adventure,
            Genre::Rpg,
            Genre::Strategy,
            Genre::Simulation,
            Genre::Sports,
            Genre::Racing,
            Genre::Puzzle,
            Genre::Fighting,
            Genre::Platformer,
            Genre::Shooter,
            Genre::Horror,
            Genre::Mmorpg,
            Genre::BattleRoyale,
            Genre::Roguelike,
            Genre::Indie,
            Genre::Survival,
            Genre::OpenWorld,
        ];

        /// Wire and storage name of the genre.
        pub fn as_str(&self) -> &'static str {
            match self {
                Genre::Action => "ACTION",
                Genre::Adventure => "ADVENTURE",
                Genre::Rpg => "RPG",
                Genre::Strategy => "STRATEGY",
                Genre::Simulation => "SIMULATION",
                Genre::Sports => "SPORTS",
                Genre::Racing => "RACING",
                Genre::Puzzle => "PUZZLE",
                Genre::Fighting => "FIGHTING",
                Genre::Platformer => "PLATFORMER",
                Genre::Shooter => "SHOOTER",
                Genre::Horror => "HORROR",
                Genre::Mmorpg => "MMORPG",
                Genre::BattleRoyale => "BATTLE_ROYALE",
                Genre::Roguelike => "ROGUELIKE",
                Genre::Indie => "INDIE",
                Genre::Survival => "SURVIVAL",
                Genre::OpenWorld => "OPEN_WORLD",
            }
        }
    }

    impl fmt::Display for Genre {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for Genre {
        type Err = ParseEnumError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Genre::ALL
                .iter()
                .copied()
                .find(|genre| genre.as_str() == s)
                .ok_or_else(|| ParseEnumError::new("genre", s))
        }
    }

    /// Column a game listing can be ordered by.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum SortBy {
        Title,
        ReleaseYear,
        Price,
        Score,
        #[default]
        CreatedAt,
    }

    impl FromStr for SortBy {
        type Err = ParseEnumError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "title" => Ok(SortBy::Title),
                "releaseYear" => Ok(SortBy::ReleaseYear),
                "price" => Ok(SortBy::Price),
                "score" => Ok(SortBy::Score),
                "createdAt" => Ok(SortBy::CreatedAt),
                other => Err(ParseEnumError::new("sortBy", other)),
            }
        }
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum SortOrder {
        Asc,
        #[default]
        Desc,
    }

    impl FromStr for SortOrder {
        type Err = ParseEnumError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "asc" => Ok(SortOrder::Asc),
                "desc" => Ok(SortOrder::Desc),
                other => Err(ParseEnumError::new("sortOrder", other)),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Developer {
        pub id: Uuid,
        pub name: String,
    }

    /// A catalog entry as read back from storage, developer name included.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Game {
        pub id: Uuid,
        pub title: String,
        pub genre: Genre,
        pub release_year: i32,
        pub price: Decimal,
        pub score: Decimal,
        pub platforms: String,
        pub description: String,
        pub developer_id: Uuid,
        pub developer_name: String,
        pub created_at: DateTime<Utc>,
    }

    /// A validated game payload, ready to be persisted.
    #[derive(Debug, Clone, PartialEq)]
    pub struct NewGame {
        pub title: String,
        pub genre: Genre,
        pub release_year: i32,
        pub price: Decimal,
        pub score: Decimal,
        pub platforms: String,
        pub description: String,
        pub developer_id: Uuid,
    }

    /// Declarative filter, sort and page directives for a game listing.
    ///
    /// `genre`, `search` and `platform` are opaque strings: blank values are
    /// ignored and an unknown genre simply matches nothing.
    #[derive(Debug, Clone, PartialEq)]
    pub struct FilterCriteria {
        pub developer_id: Option<Uuid>,
        pub release_year: Option<i32>,
        pub year_min: Option<i32>,
        pub year_max: Option<i32>,
        pub price_min: Option<Decimal>,
        pub price_max: Option<Decimal>,
        pub score_min: Option<Decimal>,
        pub score_max: Option<Decimal>,
        pub genre: Option<String>,
        pub search: Option<String>,
        pub platform: Option<String>,
        pub page: u64,
        pub limit: u32,
        pub sort_by: SortBy,
        pub sort_order: SortOrder,
    }

    impl Default for FilterCriteria {
        fn default() -> Self {
            Self {
                developer_id: None,
                release_year: None,
                year_min: None,
                year_max: None,
                price_min: None,
                price_max: None,
                score_min: None,
                score_max: None,
                genre: None,
                search: None,
                platform: None,
                page: 1,
                limit: DEFAULT_PAGE_SIZE,
                sort_by: SortBy::default(),
                sort_order: SortOrder::default(),
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Pagination {
        pub total: u64,
        pub page: u64,
        pub limit: u32,
        pub total_pages: u64,
    }

    impl Pagination {
        pub fn new(total: u64, page: u64, limit: u32) -> Self {
            Self {
                total,
                page,
                limit,
                total_pages: crate::utils::total_pages(total, limit),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct GamePage {
        pub games: Vec<Game>,
        pub pagination: Pagination,
    }

    /// Aggregates for one genre within a single release year.
    #[derive(Debug, Clone, PartialEq)]
    pub struct GenreYearStats {
        pub genre: Genre,
        pub count: u64,
        pub average_price: Decimal,
        pub highest_score: Decimal,
        pub lowest_score: Decimal,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct YearStats {
        pub count: u64,
        pub average_price: Decimal,
        pub highest_score: Decimal,
        pub lowest_score: Decimal,
    }

    impl From<GenreYearStats> for YearStats {
        fn from(stats: GenreYearStats) -> Self {
            Self {
                count: stats.count,
                average_price: stats.average_price,
                highest_score: stats.highest_score,
                lowest_score: stats.lowest_score,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GenreComparison {
        pub genre: Genre,
        pub year_a: Option<YearStats>,
        pub year_b: Option<YearStats>,
    }

    /// Genre comparison between two release years, `year_a <= year_b`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GenreReport {
        pub year_a: i32,
        pub year_b: i32,
        pub comparison: Vec<GenreComparison>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CatalogStats {
        pub total_games: u64,
        pub developer_count: u64,
        pub average_score: Decimal,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct FilterOptions {
        pub genres: Vec<Genre>,
        pub developers: Vec<Developer>,
        pub platforms: Vec<String>,
    }
}

pub mod utils {
    use serde::Serializer;

    /// `max(1, ceil(total / limit))`; a zero limit yields a single page.
    pub fn total_pages(total: u64, limit: u32) -> u64 {
        if limit == 0 {
            return 1;
        }
        total.div_ceil(u64::from(limit)).max(1)
    }

    /// Entry in the pager rendered under a game listing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PageLink {
        Page(u64),
        Ellipsis,
    }

    impl serde::Serialize for PageLink {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                PageLink::Page(page) => serializer.serialize_u64(*page),
                PageLink::Ellipsis => serializer.serialize_str("..."),
            }
        }
    }

    /// Pager window: every page when there are at most seven, otherwise the
    /// edges plus the neighbourhood of `current`, gaps shown as ellipses.
    pub fn page_links(current: u64, total_pages: u64) -> Vec<PageLink> {
        use PageLink::{Ellipsis, Page};

        if total_pages <= 7 {
            return (1..=total_pages).map(Page).collect();
        }

        let last = total_pages;
        if current <= 3 {
            vec![Page(1), Page(2), Page(3), Ellipsis, Page(last - 1), Page(last)]
        } else if current >= last - 2 {
            vec![Page(1), Page(2), Ellipsis, Page(last - 2), Page(last - 1), Page(last)]
        } else {
            vec![
                Page(1),
                Ellipsis,
                Page(current - 1),
                Page(current),
                Page(current + 1),
                Ellipsis,
                Page(last),
            ]
        }
    }

    /// Splits a comma-joined platform list into trimmed, non-empty names.
    pub fn split_platforms(platforms: &str) -> impl Iterator<Item = &str> {
        platforms.split(',').map(str::trim).filter(|name| !name.is_empty())
    }
}

pub mod errors {
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    #[error("unknown {field} value '{value}'")]
    pub struct ParseEnumError {
        pub field: &'static str,
        pub value: String,
    }

    impl ParseEnumError {
        pub fn new(field: &'static str, value: &str) -> Self {
            Self {
                field,
                value: value.to_string(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FieldError {
        pub field: String,
        pub message: String,
    }

    /// Every field-level problem found in one request.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
    #[error("invalid input: {}", summary(.fields))]
    pub struct ValidationError {
        pub fields: Vec<FieldError>,
    }

    fn summary(fields: &[FieldError]) -> String {
        fields
            .iter()
            .map(|f| format!("{} {}", f.field, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    impl ValidationError {
        pub fn single(field: &str, message: impl Into<String>) -> Self {
            let mut errors = Self::default();
            errors.push(field, message);
            errors
        }

        pub fn push(&mut self, field: &str, message: impl Into<String>) {
            self.fields.push(FieldError {
                field: field.to_string(),
                message: message.into(),
            });
        }

        pub fn is_empty(&self) -> bool {
            self.fields.is_empty()
        }

        /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
        pub fn into_result<T>(self, value: T) -> Result<T, Self> {
            if self.is_empty() {
                Ok(value)
            } else {
                Err(self)
            }
        }
    }

    impl From<ParseEnumError> for ValidationError {
        fn from(err: ParseEnumError) -> Self {
            ValidationError::single(err.field, format!("has unknown value '{}'", err.value))
        }
    }
}

pub use models::*;
pub use utils::*;
pub use errors::*;
