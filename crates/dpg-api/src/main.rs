use dpg_api::{create_app, ApiConfig, ApiError, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ApiConfig::load()?;
    let state = AppState::from_config(&config)?;
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    tracing::info!(
        addr = %config.bind_addr,
        variant = config.variant.as_str(),
        owner = %config.owner,
        "dpg api server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
