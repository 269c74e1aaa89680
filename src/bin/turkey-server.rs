//! Turkey API server: reads config from env (and `.env`), picks the Postgres or
//! in-memory store, and serves the API.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use turkey_api::{app, ensure_database_exists, AppState, Config, MemoryTurkeyStore, PgTurkeyStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("turkey_api=info,turkey_server=info")),
        )
        .init();

    let config = Config::from_env()?;
    let state = match &config.database_url {
        Some(database_url) => {
            ensure_database_exists(database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await?;
            AppState::new(PgTurkeyStore::new(pool, &config.schema))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; turkeys are kept in memory and lost on exit");
            AppState::new(MemoryTurkeyStore::new())
        }
    };
    state.store.init().await?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state, config.body_limit_bytes)).await?;
    Ok(())
}
