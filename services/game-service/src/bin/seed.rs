//! Fills the configured catalog with sample developers and games.
//!
//! Usage:
//!   cargo run -p game-service --bin seed -- --games 500 --seed 42

use clap::Parser;
use dotenv::dotenv;

use game_service::{build_service, config::Config, init_tracing, seed::seed_catalog};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of games to create.
    #[arg(long, default_value = "200")]
    games: usize,

    /// Random seed, so repeated runs produce the same catalog.
    #[arg(long, default_value = "42")]
    seed: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let config = Config::load()?;
    if config.database_url.is_none() {
        return Err("DATABASE_URL must be set to seed a persistent catalog".into());
    }

    let service = build_service(&config).await?;
    let summary = seed_catalog(&service, args.seed, args.games).await?;

    println!(
        "Seeded {} developers and {} games",
        summary.developers, summary.games
    );
    Ok(())
}
