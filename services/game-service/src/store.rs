//! Storage seam between the service and a backing catalog.

use async_trait::async_trait;
use common::{Developer, Game, GenreYearStats, NewGame};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::GameServiceError;
use crate::query::GameQuery;

/// Raw catalog totals; rounding is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTotals {
    pub games: u64,
    pub developers: u64,
    pub average_score: Option<Decimal>,
}

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Games in the query window plus the number of matches ignoring it.
    async fn list_games(&self, query: &GameQuery) -> Result<(Vec<Game>, u64), GameServiceError>;

    async fn get_game(&self, id: Uuid) -> Result<Option<Game>, GameServiceError>;

    /// Fails with `Referential` when `game.developer_id` is unknown.
    async fn create_game(&self, game: &NewGame) -> Result<Game, GameServiceError>;

    /// `false` when no game had that id.
    async fn delete_game(&self, id: Uuid) -> Result<bool, GameServiceError>;

    async fn list_developers(&self) -> Result<Vec<Developer>, GameServiceError>;

    async fn create_developer(&self, name: &str) -> Result<Developer, GameServiceError>;

    /// Per-genre aggregates over games released in `year`.
    async fn genre_stats(&self, year: i32) -> Result<Vec<GenreYearStats>, GameServiceError>;

    async fn catalog_totals(&self) -> Result<CatalogTotals, GameServiceError>;

    /// Distinct raw platform strings as stored.
    async fn platform_lists(&self) -> Result<Vec<String>, GameServiceError>;
}
