//! phoneauth
//!
//! Username/password login with an SMS one-time-passcode second factor.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tower_cookies::Key;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phoneauth::{
    routes, AppState, Config, InMemorySessionStore, SqliteStore, TwilioSmsSender,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phoneauth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; missing provider credentials or secret key are
    // fatal here, not at first send
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::info!(port = config.port, database = %config.database_path, "Loaded configuration");

    let cookie_key = Key::derive_from(config.secret_key.as_bytes());

    // Create app state
    let state = Arc::new(AppState::new(
        SqliteStore::open(&config.database_path)?,
        InMemorySessionStore::new(),
        TwilioSmsSender::new(&config.twilio),
        cookie_key,
    ));

    // Create router
    let app = routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
