//! PostgreSQL catalog.
//!
//! Listing queries are rendered from a [`GameQuery`] with
//! [`sqlx::QueryBuilder`]: every user-supplied value is bound, only the
//! allow-listed sort column is spliced into the SQL text.

use async_trait::async_trait;
use chrono::Utc;
use common::{Developer, Game, GenreYearStats, NewGame, SortBy, SortOrder};
use sqlx::postgres::{PgPool, PgPoolOptions, Postgres};
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::config::Config;
use crate::error::GameServiceError;
use crate::models::{DbCatalogTotals, DbDeveloper, DbGame, DbGenre, DbGenreStats};
use crate::query::{GameQuery, Predicate};
use crate::store::{CatalogTotals, GameStore};

const FOREIGN_KEY_VIOLATION: &str = "23503";

const GAME_COLUMNS: &str = "g.id, g.title, g.genre, g.release_year, g.price, g.score, \
     g.platforms, g.description, g.developer_id, d.name AS developer_name, g.created_at";

pub async fn create_pool(config: &Config, database_url: &str) -> Result<PgPool, sqlx::Error> {
     let pool = PgPoolOptions::new()
          .max_connections(config.database_max_connections)
          .connect(database_url)
          .await?;

     sqlx::migrate!("./migrations").run(&pool).await?;

     Ok(pool)
}

pub struct PgGameStore {
     pool: PgPool,
}

impl PgGameStore {
     pub fn new(pool: PgPool) -> Self {
          Self { pool }
     }
}

fn sort_column(sort_by: SortBy) -> &'static str {
     match sort_by {
          SortBy::Title => "lower(g.title)",
          SortBy::ReleaseYear => "g.release_year",
          SortBy::Price => "g.price",
          SortBy::Score => "g.score",
          SortBy::CreatedAt => "g.created_at",
     }
}

fn escape_like(term: &str) -> String {
     let mut escaped = String::with_capacity(term.len());
     for c in term.chars() {
          if matches!(c, '\\' | '%' | '_') {
               escaped.push('\\');
          }
          escaped.push(c);
     }
     escaped
}

/// Emits `WHERE` before the first condition and `AND` before the rest.
struct Conjunction {
     started: bool,
}

impl Conjunction {
     fn next<'a, 'b>(&mut self, builder: &'b mut QueryBuilder<'a, Postgres>) -> &'b mut QueryBuilder<'a, Postgres> {
          builder.push(if self.started { " AND " } else { " WHERE " });
          self.started = true;
          builder
     }
}

fn push_bounds<T>(
     builder: &mut QueryBuilder<'static, Postgres>,
     clause: &mut Conjunction,
     column: &str,
     min: Option<T>,
     max: Option<T>,
) where
     T: 'static + sqlx::Encode<'static, Postgres> + sqlx::Type<Postgres> + Send,
{
     if let Some(min) = min {
          clause.next(builder).push(column).push(" >= ").push_bind(min);
     }
     if let Some(max) = max {
          clause.next(builder).push(column).push(" <= ").push_bind(max);
     }
}

fn push_predicates(builder: &mut QueryBuilder<'static, Postgres>, predicates: &[Predicate]) {
     let mut clause = Conjunction { started: false };

     for predicate in predicates {
          match predicate {
               Predicate::DeveloperIs(id) => {
                    clause.next(builder).push("g.developer_id = ").push_bind(*id);
               }
               Predicate::ReleaseYearIs(year) => {
                    clause.next(builder).push("g.release_year = ").push_bind(*year);
               }
               Predicate::ReleaseYearBetween { min, max } => {
                    push_bounds(builder, &mut clause, "g.release_year", *min, *max);
               }
               Predicate::PriceBetween { min, max } => {
                    push_bounds(builder, &mut clause, "g.price", *min, *max);
               }
               Predicate::ScoreBetween { min, max } => {
                    push_bounds(builder, &mut clause, "g.score", *min, *max);
               }
               Predicate::GenreIs(genre) => {
                    clause.next(builder).push("g.genre::text = ").push_bind(genre.clone());
               }
               Predicate::TitleContains(term) => {
                    clause
                         .next(builder)
                         .push("g.title ILIKE ")
                         .push_bind(format!("%{}%", escape_like(term)));
               }
               Predicate::PlatformIncludes(platform) => {
                    clause
                         .next(builder)
                         .push("EXISTS (SELECT 1 FROM unnest(string_to_array(g.platforms, ',')) AS p(name) WHERE lower(trim(p.name)) = lower(")
                         .push_bind(platform.trim().to_string())
                         .push("))");
               }
          }
     }
}

/// Windowed, ordered listing joined with developer names.
pub fn select_games(query: &GameQuery) -> QueryBuilder<'static, Postgres> {
     let mut builder = QueryBuilder::new(format!(
          "SELECT {GAME_COLUMNS} FROM games g JOIN developers d ON d.id = g.developer_id"
     ));
     push_predicates(&mut builder, &query.predicates);

     let direction = match query.sort_order {
          SortOrder::Asc => "ASC",
          SortOrder::Desc => "DESC",
     };
     builder
          .push(" ORDER BY ")
          .push(sort_column(query.sort_by))
          .push(" ")
          .push(direction);

     builder
          .push(" LIMIT ")
          .push_bind(i64::from(query.window.limit))
          .push(" OFFSET ")
          .push_bind(i64::try_from(query.window.offset).unwrap_or(i64::MAX));

     builder
}

/// Number of matches, ignoring order and window.
pub fn count_games(query: &GameQuery) -> QueryBuilder<'static, Postgres> {
     let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM games g");
     push_predicates(&mut builder, &query.predicates);
     builder
}

fn map_insert_error(err: sqlx::Error, developer_id: Uuid) -> GameServiceError {
     if let sqlx::Error::Database(db_err) = &err {
          if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
               return GameServiceError::Referential(developer_id);
          }
     }
     GameServiceError::Storage(err)
}

#[async_trait]
impl GameStore for PgGameStore {
     async fn list_games(&self, query: &GameQuery) -> Result<(Vec<Game>, u64), GameServiceError> {
          let mut count = count_games(query);
          let (total,): (i64,) = count.build_query_as().fetch_one(&self.pool).await?;

          let mut select = select_games(query);
          let rows: Vec<DbGame> = select.build_query_as().fetch_all(&self.pool).await?;

          Ok((
               rows.into_iter().map(Game::from).collect(),
               u64::try_from(total).unwrap_or_default(),
          ))
     }

     async fn get_game(&self, id: Uuid) -> Result<Option<Game>, GameServiceError> {
          let row = sqlx::query_as::<_, DbGame>(&format!(
               "SELECT {GAME_COLUMNS} FROM games g JOIN developers d ON d.id = g.developer_id WHERE g.id = $1"
          ))
          .bind(id)
          .fetch_optional(&self.pool)
          .await?;

          Ok(row.map(Game::from))
     }

     async fn create_game(&self, game: &NewGame) -> Result<Game, GameServiceError> {
          let row = sqlx::query_as::<_, DbGame>(&format!(
               r#"
               WITH g AS (
                    INSERT INTO games (id, title, genre, release_year, price, score, platforms, description, developer_id, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    RETURNING *
               )
               SELECT {GAME_COLUMNS} FROM g JOIN developers d ON d.id = g.developer_id
               "#
          ))
          .bind(Uuid::new_v4())
          .bind(&game.title)
          .bind(DbGenre::from(game.genre))
          .bind(game.release_year)
          .bind(game.price)
          .bind(game.score)
          .bind(&game.platforms)
          .bind(&game.description)
          .bind(game.developer_id)
          .bind(Utc::now())
          .fetch_one(&self.pool)
          .await
          .map_err(|e| map_insert_error(e, game.developer_id))?;

          Ok(row.into())
     }

     async fn delete_game(&self, id: Uuid) -> Result<bool, GameServiceError> {
          let result = sqlx::query("DELETE FROM games WHERE id = $1")
               .bind(id)
               .execute(&self.pool)
               .await?;

          Ok(result.rows_affected() > 0)
     }

     async fn list_developers(&self) -> Result<Vec<Developer>, GameServiceError> {
          let rows = sqlx::query_as::<_, DbDeveloper>("SELECT id, name FROM developers ORDER BY name")
               .fetch_all(&self.pool)
               .await?;

          Ok(rows.into_iter().map(Developer::from).collect())
     }

     async fn create_developer(&self, name: &str) -> Result<Developer, GameServiceError> {
          let row = sqlx::query_as::<_, DbDeveloper>(
               r#"
               INSERT INTO developers (id, name, created_at)
               VALUES ($1, $2, $3)
               RETURNING id, name
               "#,
          )
          .bind(Uuid::new_v4())
          .bind(name)
          .bind(Utc::now())
          .fetch_one(&self.pool)
          .await?;

          Ok(row.into())
     }

     async fn genre_stats(&self, year: i32) -> Result<Vec<GenreYearStats>, GameServiceError> {
          let rows = sqlx::query_as::<_, DbGenreStats>(
               r#"
               SELECT genre,
                      COUNT(*) AS game_count,
                      AVG(price) AS average_price,
                      MAX(score) AS highest_score,
                      MIN(score) AS lowest_score
               FROM games
               WHERE release_year = $1
               GROUP BY genre
               ORDER BY genre
               "#,
          )
          .bind(year)
          .fetch_all(&self.pool)
          .await?;

          Ok(rows.into_iter().map(GenreYearStats::from).collect())
     }

     async fn catalog_totals(&self) -> Result<CatalogTotals, GameServiceError> {
          let row = sqlx::query_as::<_, DbCatalogTotals>(
               r#"
               SELECT (SELECT COUNT(*) FROM games) AS game_count,
                      (SELECT COUNT(*) FROM developers) AS developer_count,
                      (SELECT AVG(score) FROM games) AS average_score
               "#,
          )
          .fetch_one(&self.pool)
          .await?;

          Ok(CatalogTotals {
               games: u64::try_from(row.game_count).unwrap_or_default(),
               developers: u64::try_from(row.developer_count).unwrap_or_default(),
               average_score: row.average_score,
          })
     }

     async fn platform_lists(&self) -> Result<Vec<String>, GameServiceError> {
          let lists = sqlx::query_scalar::<_, String>("SELECT DISTINCT platforms FROM games")
               .fetch_all(&self.pool)
               .await?;

          Ok(lists)
     }
}
