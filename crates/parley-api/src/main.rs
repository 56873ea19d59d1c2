use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parley_api::{build_router, config::Config, state::AppState};
use parley_llm::{ChatDispatch, DispatchConfig, Dispatcher};
use parley_persist::StoresBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Parley API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let dispatcher = Dispatcher::new(DispatchConfig::from(&config.dispatch))?;
    tracing::info!(providers = ?dispatcher.providers(), "Dispatcher ready");
    let dispatcher: Arc<dyn ChatDispatch> = Arc::new(dispatcher);

    let stores = StoresBuilder::new()
        .mongodb_uri(config.mongodb_uri.clone())
        .database(config.storage.database.clone())
        .local_credentials_path(config.storage.local_credentials_path.clone())
        .build()
        .await?;
    tracing::info!(backend = ?stores.backend, "Storage ready");

    let state = Arc::new(AppState::new(config.clone(), stores, dispatcher));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
