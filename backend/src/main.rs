use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dojo_attendance_backend::config::Config;
use dojo_attendance_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state, &config)?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
