//! Sample catalog generation for demos and local databases.

use common::Genre;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use crate::error::GameServiceError;
use crate::service::GameService;
use crate::types::CreateGameRequest;

pub const DEVELOPERS: [&str; 20] = [
    "Rockstar Games",
    "CD Projekt Red",
    "Valve",
    "Bethesda",
    "Ubisoft",
    "Nintendo",
    "FromSoftware",
    "Square Enix",
    "Capcom",
    "Blizzard",
    "Mojang",
    "Remedy Entertainment",
    "Supergiant Games",
    "Team Cherry",
    "ConcernedApe",
    "Larian Studios",
    "Naughty Dog",
    "Atlus",
    "Paradox Interactive",
    "Klei Entertainment",
];

const PLATFORMS: [&str; 8] = [
    "PC",
    "PlayStation 5",
    "PlayStation 4",
    "Xbox Series X/S",
    "Xbox One",
    "Nintendo Switch",
    "Mobile",
    "VR",
];

const PREFIXES: [&str; 8] = [
    "Legend of",
    "Tales of",
    "Chronicles of",
    "Shadow of",
    "Rise of",
    "Return to",
    "Age of",
    "Realm of",
];

const WORDS: [&str; 16] = [
    "Dragon", "Phoenix", "Warrior", "Mystic", "Thunder", "Storm", "Crystal", "Shadow", "Crimson",
    "Azure", "Titan", "Guardian", "Destiny", "Nexus", "Citadel", "Empire",
];

const SUFFIXES: [&str; 6] = ["Reborn", "Remastered", "HD", "Definitive Edition", "Redux", "Returns"];

/// Price points in cents.
const PRICES: [i64; 8] = [0, 999, 1499, 1999, 2999, 3999, 4999, 5999];

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn title(rng: &mut StdRng) -> String {
    match rng.gen_range(0..4) {
        0 => format!("{} {}", pick(rng, &PREFIXES), pick(rng, &WORDS)),
        1 => format!("{} {}", pick(rng, &WORDS), pick(rng, &WORDS)),
        2 => pick(rng, &WORDS).to_string(),
        _ => format!("{} {}", pick(rng, &WORDS), pick(rng, &SUFFIXES)),
    }
}

/// Random but reproducible game payloads spread over `developer_ids`.
pub fn sample_games(seed: u64, developer_ids: &[Uuid], count: usize) -> Vec<CreateGameRequest> {
    if developer_ids.is_empty() {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let title = title(&mut rng);
            let genre = Genre::ALL[rng.gen_range(0..Genre::ALL.len())];
            let release_year = rng.gen_range(2010..=2024);

            let mut platforms = PLATFORMS.to_vec();
            platforms.shuffle(&mut rng);
            platforms.truncate(rng.gen_range(1..=3));

            CreateGameRequest {
                description: format!("{title} is a {genre} game released in {release_year}."),
                title,
                genre: genre.to_string(),
                release_year: Some(release_year),
                release_date: None,
                developer_id: developer_ids[rng.gen_range(0..developer_ids.len())].to_string(),
                price: Some(Decimal::new(PRICES[rng.gen_range(0..PRICES.len())], 2)),
                score: Some(Decimal::from(rng.gen_range(40..=99i64))),
                platforms: platforms.join(", "),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub developers: usize,
    pub games: usize,
}

/// Creates every developer in [`DEVELOPERS`] and `game_count` games.
pub async fn seed_catalog(
    service: &GameService,
    seed: u64,
    game_count: usize,
) -> Result<SeedSummary, GameServiceError> {
    let mut developer_ids = Vec::with_capacity(DEVELOPERS.len());
    for name in DEVELOPERS {
        developer_ids.push(service.create_developer(name).await?.id);
    }

    let games = sample_games(seed, &developer_ids, game_count);
    for request in &games {
        service.create_game(request).await?;
    }

    info!(developers = developer_ids.len(), games = games.len(), "catalog seeded");
    Ok(SeedSummary {
        developers: developer_ids.len(),
        games: games.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_create_game_request;

    #[test]
    fn samples_are_reproducible_and_valid() {
        let developers = vec![Uuid::new_v4(), Uuid::new_v4()];

        let first = sample_games(7, &developers, 50);
        let second = sample_games(7, &developers, 50);

        assert_eq!(first.len(), 50);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.title, b.title);
            assert_eq!(a.platforms, b.platforms);
            assert!(validate_create_game_request(a).is_ok(), "invalid sample: {a:?}");
        }
    }

    #[test]
    fn no_developers_means_no_games() {
        assert!(sample_games(1, &[], 10).is_empty());
    }
}
