//! Two-year genre comparison.
//!
//! Each year is aggregated on its own; the rows are then merged by genre.
//! A genre seen in only one of the years keeps `None` for the other.

use std::collections::BTreeMap;

use common::{Genre, GenreComparison, GenreYearStats, YearStats};

/// Orders the pair so the earlier year comes first.
pub fn normalize_years(year_a: i32, year_b: i32) -> (i32, i32) {
    (year_a.min(year_b), year_a.max(year_b))
}

fn year_stats(stats: GenreYearStats) -> YearStats {
    let mut stats = YearStats::from(stats);
    stats.average_price = stats.average_price.round_dp(2);
    stats
}

fn row(rows: &mut BTreeMap<Genre, GenreComparison>, genre: Genre) -> &mut GenreComparison {
    rows.entry(genre).or_insert(GenreComparison {
        genre,
        year_a: None,
        year_b: None,
    })
}

/// Merges per-year aggregates into rows ordered by genre.
pub fn compare_genres(
    year_a: Vec<GenreYearStats>,
    year_b: Vec<GenreYearStats>,
) -> Vec<GenreComparison> {
    let mut rows: BTreeMap<Genre, GenreComparison> = BTreeMap::new();

    for stats in year_a {
        let genre = stats.genre;
        row(&mut rows, genre).year_a = Some(year_stats(stats));
    }
    for stats in year_b {
        let genre = stats.genre;
        row(&mut rows, genre).year_b = Some(year_stats(stats));
    }

    rows.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn stats(genre: Genre, count: u64, average_price: Decimal) -> GenreYearStats {
        GenreYearStats {
            genre,
            count,
            average_price,
            highest_score: Decimal::from(90),
            lowest_score: Decimal::from(40),
        }
    }

    #[test]
    fn years_are_normalized_in_either_order() {
        assert_eq!(normalize_years(2024, 2020), (2020, 2024));
        assert_eq!(normalize_years(2020, 2024), (2020, 2024));
        assert_eq!(normalize_years(2022, 2022), (2022, 2022));
    }

    #[test]
    fn genres_missing_from_both_years_are_absent() {
        let rows = compare_genres(
            vec![stats(Genre::Shooter, 3, Decimal::from(40))],
            vec![stats(Genre::Action, 1, Decimal::from(20))],
        );

        let genres: Vec<_> = rows.iter().map(|r| r.genre).collect();
        assert_eq!(genres, vec![Genre::Action, Genre::Shooter]);

        assert!(rows[0].year_a.is_none());
        assert_eq!(rows[0].year_b.as_ref().map(|s| s.count), Some(1));
        assert_eq!(rows[1].year_a.as_ref().map(|s| s.count), Some(3));
        assert!(rows[1].year_b.is_none());
    }

    #[test]
    fn average_price_is_rounded_to_cents() {
        let rows = compare_genres(
            vec![stats(Genre::Rpg, 3, Decimal::new(1_333_333, 5))],
            Vec::new(),
        );

        assert_eq!(
            rows[0].year_a.as_ref().map(|s| s.average_price),
            Some(Decimal::new(1333, 2))
        );
    }

    #[test]
    fn same_year_fills_both_sides() {
        let year = vec![stats(Genre::Puzzle, 2, Decimal::from(5))];
        let rows = compare_genres(year.clone(), year);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year_a, rows[0].year_b);
        assert_eq!(rows[0].year_a.as_ref().map(|s| s.count), Some(2));
    }

    #[test]
    fn no_stats_means_empty_report() {
        assert!(compare_genres(Vec::new(), Vec::new()).is_empty());
    }
}
