use chrono::{DateTime, Utc};
use common::{Developer, Game, Genre, GenreYearStats};
use sqlx::types::Decimal;
use uuid::Uuid;

#[derive(Debug, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "genre", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DbGenre {
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

impl From<Genre> for DbGenre {
     fn from(genre: Genre) -> Self {
          match genre {
               Genre::Action => DbGenre::Action,
               Genre::Adventure => DbGenre::Adventure,
               Genre::Rpg => DbGenre::Rpg,
               Genre::Strategy => DbGenre::Strategy,
               Genre::Simulation => DbGenre::Simulation,
               Genre::Sports => DbGenre::Sports,
               Genre::Racing => DbGenre::Racing,
               Genre::Puzzle => DbGenre::Puzzle,
               Genre::Fighting => DbGenre::Fighting,
               Genre::Platformer => DbGenre::Platformer,
               Genre::Shooter => DbGenre::Shooter,
               Genre::Horror => DbGenre::Horror,
               Genre::Mmorpg => DbGenre::Mmorpg,
               Genre::BattleRoyale => DbGenre::BattleRoyale,
               Genre::Roguelike => DbGenre::Roguelike,
               Genre::Indie => DbGenre::Indie,
               Genre::Survival => DbGenre::Survival,
               Genre::OpenWorld => DbGenre::OpenWorld,
          }
     }
}

impl From<DbGenre> for Genre {
     fn from(genre: DbGenre) -> Self {
          match genre {
               DbGenre::Action => Genre::Action,
               DbGenre::Adventure => Genre::Adventure,
               DbGenre::Rpg => Genre::Rpg,
               DbGenre::Strategy => Genre::Strategy,
               DbGenre::Simulation => Genre::Simulation,
               DbGenre::Sports => Genre::Sports,
               DbGenre::Racing => Genre::Racing,
               DbGenre::Puzzle => Genre::Puzzle,
               DbGenre::Fighting => Genre::Fighting,
               DbGenre::Platformer => Genre::Platformer,
               DbGenre::Shooter => Genre::Shooter,
               DbGenre::Horror => Genre::Horror,
               DbGenre::Mmorpg => Genre::Mmorpg,
               DbGenre::BattleRoyale => Genre::BattleRoyale,
               DbGenre::Roguelike => Genre::Roguelike,
               DbGenre::Indie => Genre::Indie,
               DbGenre::Survival => Genre::Survival,
               DbGenre::OpenWorld => Genre::OpenWorld,
          }
     }
}

/// A `games` row joined with its developer's name.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbGame {
     pub id: Uuid,
     pub title: String,
     pub genre: DbGenre,
     pub release_year: i32,
     pub price: Decimal,
     pub score: Decimal,
     pub platforms: String,
     pub description: String,
     pub developer_id: Uuid,
     pub developer_name: String,
     pub created_at: DateTime<Utc>,
}

impl From<DbGame> for Game {
     fn from(row: DbGame) -> Self {
          Game {
               id: row.id,
               title: row.title,
               genre: row.genre.into(),
               release_year: row.release_year,
               price: row.price,
               score: row.score,
               platforms: row.platforms,
               description: row.description,
               developer_id: row.developer_id,
               developer_name: row.developer_name,
               created_at: row.created_at,
          }
     }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbDeveloper {
     pub id: Uuid,
     pub name: String,
}

impl From<DbDeveloper> for Developer {
     fn from(row: DbDeveloper) -> Self {
          Developer {
               id: row.id,
               name: row.name,
          }
     }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbGenreStats {
     pub genre: DbGenre,
     pub game_count: i64,
     pub average_price: Decimal,
     pub highest_score: Decimal,
     pub lowest_score: Decimal,
}

impl From<DbGenreStats> for GenreYearStats {
     fn from(row: DbGenreStats) -> Self {
          GenreYearStats {
               genre: row.genre.into(),
               count: u64::try_from(row.game_count).unwrap_or_default(),
               average_price: row.average_price,
               highest_score: row.highest_score,
               lowest_score: row.lowest_score,
          }
     }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbCatalogTotals {
     pub game_count: i64,
     pub developer_count: i64,
     pub average_score: Option<Decimal>,
}

#[cfg(test)]
mod tests {
     use super::*;

     #[test]
     fn genre_conversions_are_inverse() {
          for genre in Genre::ALL {
               assert_eq!(Genre::from(DbGenre::from(genre)), genre);
          }
     }
}
