use std::collections::BTreeSet;
use std::sync::Arc;

use common::{
    CatalogStats, Developer, FilterCriteria, FilterOptions, Game, GamePage, Genre, GenreReport,
    Pagination, split_platforms,
};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::GameServiceError;
use crate::query::GameQuery;
use crate::report::{compare_genres, normalize_years};
use crate::store::GameStore;
use crate::types::CreateGameRequest;
use crate::validation::{validate_create_game_request, validate_developer_name};

/// Catalog operations over any [`GameStore`].
#[derive(Clone)]
pub struct GameService {
    store: Arc<dyn GameStore>,
}

impl GameService {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self { store }
    }

    pub async fn list_games(&self, criteria: &FilterCriteria) -> Result<GamePage, GameServiceError> {
        let query = GameQuery::from_criteria(criteria);
        debug!(predicates = query.predicates.len(), window = ?query.window, "listing games");

        let (games, total) = self.store.list_games(&query).await?;

        Ok(GamePage {
            games,
            pagination: Pagination::new(total, query.window.page, query.window.limit),
        })
    }

    pub async fn get_game(&self, id: Uuid) -> Result<Game, GameServiceError> {
        self.store
            .get_game(id)
            .await?
            .ok_or(GameServiceError::NotFound("game"))
    }

    pub async fn create_game(&self, request: &CreateGameRequest) -> Result<Game, GameServiceError> {
        let new_game = validate_create_game_request(request)?;
        let game = self.store.create_game(&new_game).await?;

        info!(game_id = %game.id, title = %game.title, "game created");
        Ok(game)
    }

    pub async fn delete_game(&self, id: Uuid) -> Result<(), GameServiceError> {
        if !self.store.delete_game(id).await? {
            return Err(GameServiceError::NotFound("game"));
        }

        info!(game_id = %id, "game deleted");
        Ok(())
    }

    pub async fn list_developers(&self) -> Result<Vec<Developer>, GameServiceError> {
        self.store.list_developers().await
    }

    pub async fn create_developer(&self, name: &str) -> Result<Developer, GameServiceError> {
        let name = validate_developer_name(name)?;
        let developer = self.store.create_developer(&name).await?;

        info!(developer_id = %developer.id, name = %developer.name, "developer created");
        Ok(developer)
    }

    /// Per-genre statistics for each of the two years, earlier year first.
    /// Swapping the arguments yields the same report.
    pub async fn genre_report(&self, year_a: i32, year_b: i32) -> Result<GenreReport, GameServiceError> {
        let (year_a, year_b) = normalize_years(year_a, year_b);

        let stats_a = self.store.genre_stats(year_a).await?;
        let stats_b = if year_a == year_b {
            stats_a.clone()
        } else {
            self.store.genre_stats(year_b).await?
        };

        Ok(GenreReport {
            year_a,
            year_b,
            comparison: compare_genres(stats_a, stats_b),
        })
    }

    pub async fn catalog_stats(&self) -> Result<CatalogStats, GameServiceError> {
        let totals = self.store.catalog_totals().await?;

        Ok(CatalogStats {
            total_games: totals.games,
            developer_count: totals.developers,
            average_score: totals.average_score.unwrap_or(Decimal::ZERO).round_dp(1),
        })
    }

    pub async fn filter_options(&self) -> Result<FilterOptions, GameServiceError> {
        let developers = self.store.list_developers().await?;
        let lists = self.store.platform_lists().await?;

        let platforms: BTreeSet<String> = lists
            .iter()
            .flat_map(|list| split_platforms(list))
            .map(str::to_string)
            .collect();

        Ok(FilterOptions {
            genres: Genre::ALL.to_vec(),
            developers,
            platforms: platforms.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use common::SortBy;

    async fn seeded(count: usize) -> (GameService, Uuid) {
        let service = GameService::new(Arc::new(MemoryStore::new()));
        let developer = service.create_developer("Larian Studios").await.unwrap();

        for i in 0..count {
            service
                .create_game(&request(developer.id, &format!("Game {i:02}"), 2020, "RPG"))
                .await
                .unwrap();
        }
        (service, developer.id)
    }

    fn request(developer_id: Uuid, title: &str, year: i32, genre: &str) -> CreateGameRequest {
        CreateGameRequest {
            title: title.to_string(),
            genre: genre.to_string(),
            release_year: Some(year),
            release_date: None,
            developer_id: developer_id.to_string(),
            price: Some(Decimal::from(20)),
            score: Some(Decimal::from(80)),
            platforms: "PC".to_string(),
            description: "A game".to_string(),
        }
    }

    #[tokio::test]
    async fn pages_through_twenty_five_games() {
        let (service, _) = seeded(25).await;
        let mut criteria = FilterCriteria { limit: 10, sort_by: SortBy::Title, ..Default::default() };

        let first = service.list_games(&criteria).await.unwrap();
        assert_eq!(first.games.len(), 10);
        assert_eq!(first.pagination, Pagination { total: 25, page: 1, limit: 10, total_pages: 3 });

        criteria.page = 3;
        let last = service.list_games(&criteria).await.unwrap();
        assert_eq!(last.games.len(), 5);

        criteria.page = 4;
        let beyond = service.list_games(&criteria).await.unwrap();
        assert!(beyond.games.is_empty());
        assert_eq!(beyond.pagination.total_pages, 3);
    }

    #[tokio::test]
    async fn pagination_reports_clamped_limit() {
        let (service, _) = seeded(3).await;
        let criteria = FilterCriteria { limit: 1_000, ..Default::default() };

        let page = service.list_games(&criteria).await.unwrap();
        assert_eq!(page.pagination.limit, 100);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[tokio::test]
    async fn exact_year_wins_over_range() {
        let (service, developer) = seeded(0).await;
        service.create_game(&request(developer, "Retro", 1998, "RPG")).await.unwrap();
        service.create_game(&request(developer, "Modern", 2015, "RPG")).await.unwrap();

        let criteria = FilterCriteria {
            release_year: Some(1998),
            year_min: Some(2010),
            year_max: Some(2020),
            ..Default::default()
        };
        let page = service.list_games(&criteria).await.unwrap();

        let titles: Vec<_> = page.games.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Retro"]);
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let (service, developer) = seeded(0).await;
        service.create_game(&request(developer, "Dragon Quest", 2020, "RPG")).await.unwrap();
        service.create_game(&request(developer, "Phoenix", 2020, "RPG")).await.unwrap();

        let criteria = FilterCriteria { search: Some("dragon".to_string()), ..Default::default() };
        let page = service.list_games(&criteria).await.unwrap();

        assert_eq!(page.games.len(), 1);
        assert_eq!(page.games[0].title, "Dragon Quest");
    }

    #[tokio::test]
    async fn create_get_delete_round_trip() {
        let (service, developer) = seeded(0).await;

        let created = service.create_game(&request(developer, "Divinity", 2017, "RPG")).await.unwrap();
        let fetched = service.get_game(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Divinity");
        assert_eq!(fetched.genre, Genre::Rpg);
        assert_eq!(fetched.developer_name, "Larian Studios");

        service.delete_game(created.id).await.unwrap();
        assert!(matches!(service.get_game(created.id).await, Err(GameServiceError::NotFound(_))));
        assert!(matches!(service.delete_game(created.id).await, Err(GameServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn create_game_rejects_invalid_input_before_storage() {
        let (service, developer) = seeded(0).await;
        let mut bad = request(developer, "", 2020, "RPG");
        bad.score = Some(Decimal::from(150));

        let err = service.create_game(&bad).await.unwrap_err();
        assert!(matches!(err, GameServiceError::Validation(ref e) if e.fields.len() == 2));

        let stats = service.catalog_stats().await.unwrap();
        assert_eq!(stats.total_games, 0);
    }

    #[tokio::test]
    async fn create_game_with_unknown_developer_is_referential() {
        let (service, _) = seeded(0).await;

        let err = service
            .create_game(&request(Uuid::new_v4(), "Orphan", 2020, "RPG"))
            .await
            .unwrap_err();
        assert!(matches!(err, GameServiceError::Referential(_)));
    }

    #[tokio::test]
    async fn genre_report_is_order_independent() {
        let (service, developer) = seeded(0).await;
        service.create_game(&request(developer, "A", 2020, "RPG")).await.unwrap();
        service.create_game(&request(developer, "B", 2024, "RPG")).await.unwrap();
        service.create_game(&request(developer, "C", 2024, "SHOOTER")).await.unwrap();
        service.create_game(&request(developer, "D", 2022, "HORROR")).await.unwrap();

        let forward = service.genre_report(2020, 2024).await.unwrap();
        let backward = service.genre_report(2024, 2020).await.unwrap();
        assert_eq!(forward, backward);

        let genres: Vec<_> = forward.comparison.iter().map(|row| row.genre).collect();
        assert_eq!(genres, vec![Genre::Rpg, Genre::Shooter]);
        assert!(forward.comparison[1].year_a.is_none());
    }

    #[tokio::test]
    async fn genre_report_for_one_year_fills_both_sides() {
        let (service, developer) = seeded(0).await;
        let mut cheap = request(developer, "Cheap", 2021, "PUZZLE");
        cheap.price = Some(Decimal::from(10));
        service.create_game(&cheap).await.unwrap();
        service.create_game(&request(developer, "Full", 2021, "PUZZLE")).await.unwrap();

        let report = service.genre_report(2021, 2021).await.unwrap();

        assert_eq!((report.year_a, report.year_b), (2021, 2021));
        assert_eq!(report.comparison.len(), 1);
        let row = &report.comparison[0];
        assert_eq!(row.year_a, row.year_b);
        let stats = row.year_a.as_ref().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average_price, Decimal::new(1500, 2));
    }

    #[tokio::test]
    async fn stats_and_filter_options_summarise_catalog() {
        let (service, developer) = seeded(0).await;
        let mut first = request(developer, "First", 2020, "RPG");
        first.platforms = "PC, Xbox One".to_string();
        first.score = Some(Decimal::from(90));
        let mut second = request(developer, "Second", 2021, "RPG");
        second.platforms = "Xbox One,Nintendo Switch".to_string();
        second.score = Some(Decimal::from(75));
        service.create_game(&first).await.unwrap();
        service.create_game(&second).await.unwrap();

        let stats = service.catalog_stats().await.unwrap();
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.developer_count, 1);
        assert_eq!(stats.average_score, Decimal::new(825, 1));

        let options = service.filter_options().await.unwrap();
        assert_eq!(options.genres.len(), Genre::ALL.len());
        assert_eq!(options.platforms, vec!["Nintendo Switch", "PC", "Xbox One"]);
        assert_eq!(options.developers[0].name, "Larian Studios");
    }
}
