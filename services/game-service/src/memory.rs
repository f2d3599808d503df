//! In-process catalog used by tests and database-less local runs.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use common::{Developer, Game, Genre, GenreYearStats, NewGame, SortBy, SortOrder};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::GameServiceError;
use crate::query::GameQuery;
use crate::store::{CatalogTotals, GameStore};

#[derive(Default)]
struct Catalog {
    developers: Vec<Developer>,
    games: Vec<Game>,
}

#[derive(Default)]
pub struct MemoryStore {
    catalog: RwLock<Catalog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Game, b: &Game, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title)),
        SortBy::ReleaseYear => a.release_year.cmp(&b.release_year),
        SortBy::Price => a.price.cmp(&b.price),
        SortBy::Score => a.score.cmp(&b.score),
        SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
    }
}

struct GenreAccumulator {
    count: u64,
    price_total: Decimal,
    highest_score: Decimal,
    lowest_score: Decimal,
}

#[async_trait]
impl GameStore for MemoryStore {
    async fn list_games(&self, query: &GameQuery) -> Result<(Vec<Game>, u64), GameServiceError> {
        let catalog = self.catalog.read().await;

        let mut matching: Vec<&Game> = catalog.games.iter().filter(|g| query.matches(g)).collect();
        matching.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort_by);
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matching.len() as u64;
        let offset = usize::try_from(query.window.offset).unwrap_or(usize::MAX);
        let games = matching
            .into_iter()
            .skip(offset)
            .take(query.window.limit as usize)
            .cloned()
            .collect();

        Ok((games, total))
    }

    async fn get_game(&self, id: Uuid) -> Result<Option<Game>, GameServiceError> {
        let catalog = self.catalog.read().await;
        Ok(catalog.games.iter().find(|g| g.id == id).cloned())
    }

    async fn create_game(&self, game: &NewGame) -> Result<Game, GameServiceError> {
        let mut catalog = self.catalog.write().await;

        let developer_name = catalog
            .developers
            .iter()
            .find(|d| d.id == game.developer_id)
            .map(|d| d.name.clone())
            .ok_or(GameServiceError::Referential(game.developer_id))?;

        let record = Game {
            id: Uuid::new_v4(),
            title: game.title.clone(),
            genre: game.genre,
            release_year: game.release_year,
            price: game.price,
            score: game.score,
            platforms: game.platforms.clone(),
            description: game.description.clone(),
            developer_id: game.developer_id,
            developer_name,
            created_at: Utc::now(),
        };
        catalog.games.push(record.clone());

        Ok(record)
    }

    async fn delete_game(&self, id: Uuid) -> Result<bool, GameServiceError> {
        let mut catalog = self.catalog.write().await;
        let before = catalog.games.len();
        catalog.games.retain(|g| g.id != id);
        Ok(catalog.games.len() < before)
    }

    async fn list_developers(&self) -> Result<Vec<Developer>, GameServiceError> {
        let catalog = self.catalog.read().await;
        let mut developers = catalog.developers.clone();
        developers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(developers)
    }

    async fn create_developer(&self, name: &str) -> Result<Developer, GameServiceError> {
        let developer = Developer {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        self.catalog.write().await.developers.push(developer.clone());
        Ok(developer)
    }

    async fn genre_stats(&self, year: i32) -> Result<Vec<GenreYearStats>, GameServiceError> {
        let catalog = self.catalog.read().await;

        let mut groups: BTreeMap<Genre, GenreAccumulator> = BTreeMap::new();
        for game in catalog.games.iter().filter(|g| g.release_year == year) {
            match groups.get_mut(&game.genre) {
                Some(acc) => {
                    acc.count += 1;
                    acc.price_total = acc
                        .price_total
                        .checked_add(game.price)
                        .ok_or(GameServiceError::Overflow("price total"))?;
                    acc.highest_score = acc.highest_score.max(game.score);
                    acc.lowest_score = acc.lowest_score.min(game.score);
                }
                None => {
                    groups.insert(
                        game.genre,
                        GenreAccumulator {
                            count: 1,
                            price_total: game.price,
                            highest_score: game.score,
                            lowest_score: game.score,
                        },
                    );
                }
            }
        }

        Ok(groups
            .into_iter()
            .map(|(genre, acc)| GenreYearStats {
                genre,
                count: acc.count,
                average_price: acc.price_total / Decimal::from(acc.count),
                highest_score: acc.highest_score,
                lowest_score: acc.lowest_score,
            })
            .collect())
    }

    async fn catalog_totals(&self) -> Result<CatalogTotals, GameServiceError> {
        let catalog = self.catalog.read().await;

        let games = catalog.games.len() as u64;
        let average_score = (games > 0).then(|| {
            let total: Decimal = catalog.games.iter().map(|g| g.score).sum();
            total / Decimal::from(games)
        });

        Ok(CatalogTotals {
            games,
            developers: catalog.developers.len() as u64,
            average_score,
        })
    }

    async fn platform_lists(&self) -> Result<Vec<String>, GameServiceError> {
        let catalog = self.catalog.read().await;
        let mut lists: Vec<String> = catalog.games.iter().map(|g| g.platforms.clone()).collect();
        lists.sort();
        lists.dedup();
        Ok(lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::FilterCriteria;

    async fn developer(store: &MemoryStore, name: &str) -> Uuid {
        store.create_developer(name).await.unwrap().id
    }

    fn new_game(developer_id: Uuid, title: &str, year: i32, price: i64) -> NewGame {
        NewGame {
            title: title.to_string(),
            genre: Genre::Action,
            release_year: year,
            price: Decimal::from(price),
            score: Decimal::from(70),
            platforms: "PC".to_string(),
            description: "A game".to_string(),
            developer_id,
        }
    }

    #[tokio::test]
    async fn create_game_requires_existing_developer() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();

        let err = store.create_game(&new_game(missing, "Orphan", 2020, 10)).await.unwrap_err();

        assert!(matches!(err, GameServiceError::Referential(id) if id == missing));
    }

    #[tokio::test]
    async fn created_game_carries_developer_name() {
        let store = MemoryStore::new();
        let dev = developer(&store, "Team Cherry").await;

        let game = store.create_game(&new_game(dev, "Hollow", 2017, 15)).await.unwrap();

        assert_eq!(game.developer_name, "Team Cherry");
        assert_eq!(store.get_game(game.id).await.unwrap(), Some(game));
    }

    #[tokio::test]
    async fn sorts_by_price_in_both_directions() {
        let store = MemoryStore::new();
        let dev = developer(&store, "Valve").await;
        for (title, price) in [("Ten", 10), ("Thirty", 30), ("Twenty", 20)] {
            store.create_game(&new_game(dev, title, 2020, price)).await.unwrap();
        }

        let mut criteria = FilterCriteria {
            sort_by: SortBy::Price,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let (games, _) = store.list_games(&GameQuery::from_criteria(&criteria)).await.unwrap();
        let prices: Vec<_> = games.iter().map(|g| g.price).collect();
        assert_eq!(prices, vec![Decimal::from(10), Decimal::from(20), Decimal::from(30)]);

        criteria.sort_order = SortOrder::Desc;
        let (games, _) = store.list_games(&GameQuery::from_criteria(&criteria)).await.unwrap();
        let prices: Vec<_> = games.iter().map(|g| g.price).collect();
        assert_eq!(prices, vec![Decimal::from(30), Decimal::from(20), Decimal::from(10)]);
    }

    #[tokio::test]
    async fn window_slices_after_counting() {
        let store = MemoryStore::new();
        let dev = developer(&store, "Capcom").await;
        for i in 0..25 {
            store.create_game(&new_game(dev, &format!("Game {i:02}"), 2020, i)).await.unwrap();
        }

        let criteria = FilterCriteria { page: 3, limit: 10, ..Default::default() };
        let (games, total) = store.list_games(&GameQuery::from_criteria(&criteria)).await.unwrap();

        assert_eq!(total, 25);
        assert_eq!(games.len(), 5);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_game_was_removed() {
        let store = MemoryStore::new();
        let dev = developer(&store, "Sega").await;
        let game = store.create_game(&new_game(dev, "Sonic", 1991, 5)).await.unwrap();

        assert!(store.delete_game(game.id).await.unwrap());
        assert!(!store.delete_game(game.id).await.unwrap());
        assert_eq!(store.get_game(game.id).await.unwrap(), None);
        assert_eq!(store.list_developers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn genre_stats_aggregate_one_year() {
        let store = MemoryStore::new();
        let dev = developer(&store, "Nintendo").await;
        let mut cheap = new_game(dev, "Cheap", 2020, 10);
        cheap.score = Decimal::from(60);
        let mut pricey = new_game(dev, "Pricey", 2020, 30);
        pricey.score = Decimal::from(90);
        store.create_game(&cheap).await.unwrap();
        store.create_game(&pricey).await.unwrap();
        store.create_game(&new_game(dev, "Other year", 2021, 99)).await.unwrap();

        let stats = store.genre_stats(2020).await.unwrap();

        assert_eq!(
            stats,
            vec![GenreYearStats {
                genre: Genre::Action,
                count: 2,
                average_price: Decimal::from(20),
                highest_score: Decimal::from(90),
                lowest_score: Decimal::from(60),
            }]
        );
        assert!(store.genre_stats(1999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn catalog_totals_on_empty_store() {
        let totals = MemoryStore::new().catalog_totals().await.unwrap();
        assert_eq!(
            totals,
            CatalogTotals { games: 0, developers: 0, average_score: None }
        );
    }

    #[tokio::test]
    async fn price_total_overflow_is_an_error() {
        let store = MemoryStore::new();
        let dev = developer(&store, "Atari").await;
        for title in ["Max", "Also max"] {
            let mut game = new_game(dev, title, 2020, 0);
            game.price = Decimal::MAX;
            store.create_game(&game).await.unwrap();
        }

        let err = store.genre_stats(2020).await.unwrap_err();
        assert!(matches!(err, GameServiceError::Overflow(_)));
    }

    #[tokio::test]
    async fn title_sort_ignores_case() {
        let store = MemoryStore::new();
        let dev = developer(&store, "Bungie").await;
        for title in ["beta", "Alpha", "Gamma"] {
            store.create_game(&new_game(dev, title, 2020, 10)).await.unwrap();
        }

        let criteria = FilterCriteria {
            sort_by: SortBy::Title,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let (games, _) = store.list_games(&GameQuery::from_criteria(&criteria)).await.unwrap();
        let titles: Vec<_> = games.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "beta", "Gamma"]);
    }
}
