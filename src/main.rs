use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chirpy::{app::build_app, config::Config, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded (platform: {})", config.platform);

    let state = AppState::new(&config).await?;
    tracing::info!("✅ AppState initialized");

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("🚀 Server listening on http://{}", config.bind_addr);
    tracing::info!("📁 Serving files from {} under /app", config.fileserver_root.display());

    axum::serve(listener, app).await?;

    Ok(())
}
