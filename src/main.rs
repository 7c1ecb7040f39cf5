use std::sync::Arc;
use anyhow::Result;
use log::info;
use warp::Filter;

use equity_valuation_dashboard::config::Config;
use equity_valuation_dashboard::routes;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = Config::from_env()?;
    let addr = config.addr();
    info!("Will bind to: {}", addr);

    // Peers are read once and shared by every request
    let peers = Arc::new(config.load_peers()?);
    info!("Peer table ready with {} companies", peers.len());

    // Set up CORS
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    // Set up routes
    let api = routes::routes(peers).with(cors);
    info!("Routes configured successfully with CORS.");

    // Start the server
    info!("Starting server on {}", addr);
    warp::serve(api)
        .run(addr)
        .await;

    Ok(())
}
