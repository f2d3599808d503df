use dotenv::dotenv;

use game_service::{config::Config, init_tracing, start_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing();

    let config = Config::load()?;
    start_server(config).await
}
