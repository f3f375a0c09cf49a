use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::ApiConfig;
use web::{AppState, WebConfig, create_router};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting web service");

    let api_config = ApiConfig::from_env();
    let web_config = WebConfig::from_env();
    info!("Proxying backend at {}", api_config.internal_base_url);

    let listen_addr = web_config.listen_addr.clone();
    let state = AppState::new(&api_config, web_config);
    let app = create_router(state);

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Web service listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
