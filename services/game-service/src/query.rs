//! Translation of listing criteria into a storage-agnostic query.
//!
//! A [`GameQuery`] is the conjunction of the predicates produced by
//! [`RULES`], a single sort key and a page window. Stores execute it
//! verbatim: the memory store evaluates [`Predicate::matches`], the
//! PostgreSQL store renders each predicate as a bound SQL condition.

use common::{FilterCriteria, Game, MAX_PAGE_SIZE, SortBy, SortOrder, split_platforms};
use rust_decimal::Decimal;
use uuid::Uuid;

/// One condition a game must satisfy to be listed.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    DeveloperIs(Uuid),
    ReleaseYearIs(i32),
    /// Inclusive; at least one bound is set.
    ReleaseYearBetween { min: Option<i32>, max: Option<i32> },
    PriceBetween { min: Option<Decimal>, max: Option<Decimal> },
    ScoreBetween { min: Option<Decimal>, max: Option<Decimal> },
    /// Compared against the genre's wire name, so unknown names match nothing.
    GenreIs(String),
    /// Case-insensitive substring of the title.
    TitleContains(String),
    /// Case-insensitive match of one entry in the platform list.
    PlatformIncludes(String),
}

impl Predicate {
    pub fn matches(&self, game: &Game) -> bool {
        match self {
            Predicate::DeveloperIs(id) => game.developer_id == *id,
            Predicate::ReleaseYearIs(year) => game.release_year == *year,
            Predicate::ReleaseYearBetween { min, max } => within(&game.release_year, min, max),
            Predicate::PriceBetween { min, max } => within(&game.price, min, max),
            Predicate::ScoreBetween { min, max } => within(&game.score, min, max),
            Predicate::GenreIs(genre) => game.genre.as_str() == genre,
            Predicate::TitleContains(term) => game
                .title
                .to_lowercase()
                .contains(&term.to_lowercase()),
            Predicate::PlatformIncludes(platform) => {
                let wanted = platform.to_lowercase();
                split_platforms(&game.platforms).any(|name| name.to_lowercase() == wanted)
            }
        }
    }
}

fn within<T: PartialOrd>(value: &T, min: &Option<T>, max: &Option<T>) -> bool {
    min.as_ref().is_none_or(|min| value >= min) && max.as_ref().is_none_or(|max| value <= max)
}

/// Builds at most one predicate from the criteria.
pub type Rule = fn(&FilterCriteria) -> Option<Predicate>;

/// Predicate rules, applied in this order and joined with AND.
pub const RULES: [Rule; 7] = [
    developer_rule,
    release_year_rule,
    price_rule,
    score_rule,
    genre_rule,
    search_rule,
    platform_rule,
];

fn developer_rule(criteria: &FilterCriteria) -> Option<Predicate> {
    criteria.developer_id.map(Predicate::DeveloperIs)
}

// An exact year replaces the range outright; the two are never merged.
fn release_year_rule(criteria: &FilterCriteria) -> Option<Predicate> {
    if let Some(year) = criteria.release_year {
        return Some(Predicate::ReleaseYearIs(year));
    }
    if criteria.year_min.is_none() && criteria.year_max.is_none() {
        return None;
    }
    Some(Predicate::ReleaseYearBetween {
        min: criteria.year_min,
        max: criteria.year_max,
    })
}

fn price_rule(criteria: &FilterCriteria) -> Option<Predicate> {
    if criteria.price_min.is_none() && criteria.price_max.is_none() {
        return None;
    }
    Some(Predicate::PriceBetween {
        min: criteria.price_min,
        max: criteria.price_max,
    })
}

fn score_rule(criteria: &FilterCriteria) -> Option<Predicate> {
    if criteria.score_min.is_none() && criteria.score_max.is_none() {
        return None;
    }
    Some(Predicate::ScoreBetween {
        min: criteria.score_min,
        max: criteria.score_max,
    })
}

fn genre_rule(criteria: &FilterCriteria) -> Option<Predicate> {
    non_blank(&criteria.genre).map(|genre| Predicate::GenreIs(genre.to_string()))
}

// The term is matched as given; only an all-blank term is dropped.
fn search_rule(criteria: &FilterCriteria) -> Option<Predicate> {
    criteria
        .search
        .as_deref()
        .filter(|term| !term.trim().is_empty())
        .map(|term| Predicate::TitleContains(term.to_string()))
}

fn platform_rule(criteria: &FilterCriteria) -> Option<Predicate> {
    non_blank(&criteria.platform).map(|name| Predicate::PlatformIncludes(name.to_string()))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// The `(skip, take)` slice of an ordered, filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub offset: u64,
    pub limit: u32,
}

impl PageWindow {
    /// Clamps `limit` into `[1, MAX_PAGE_SIZE]` and treats page 0 as page 1.
    pub fn new(page: u64, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        Self {
            page,
            offset: (page - 1).saturating_mul(u64::from(limit)),
            limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameQuery {
    pub predicates: Vec<Predicate>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub window: PageWindow,
}

impl GameQuery {
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            predicates: RULES.iter().filter_map(|rule| rule(criteria)).collect(),
            sort_by: criteria.sort_by,
            sort_order: criteria.sort_order,
            window: PageWindow::new(criteria.page, criteria.limit),
        }
    }

    pub fn matches(&self, game: &Game) -> bool {
        self.predicates.iter().all(|predicate| predicate.matches(game))
    }
}
