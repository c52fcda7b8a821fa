use std::net::{Ipv4Addr, SocketAddr};

use reward_server::config::AppConfig;
use reward_server::database::client::{Database, DbConfig};
use reward_server::init;
use reward_server::middleware::error::{AppError, AppResult};
use reward_server::middleware::mw_ctx;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    let db = Database::connect(DbConfig {
        url: &config.db_url,
        database: &config.db_database,
        namespace: &config.db_namespace,
        username: config.db_username.as_deref(),
        password: config.db_password.as_deref(),
    })
    .await?;
    db.run_migrations().await?;

    let ctx_state = mw_ctx::create_ctx_state(db, &config)?;
    let retained = ctx_state.reward_split.retained_fraction();
    if retained.is_zero() {
        info!("reward split user={} system={}", config.user_percentage, config.system_percentage);
    } else {
        warn!(
            "reward split user={} system={} leaves {retained} of every price to neither ledger",
            config.user_percentage, config.system_percentage
        );
    }

    let routes_all = init::main_router(&ctx_state);

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    info!("->> LISTENING on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal {
            source: e.to_string(),
        })?;

    axum::serve(listener, routes_all.into_make_service())
        .await
        .map_err(|e| AppError::Internal {
            source: e.to_string(),
        })?;

    Ok(())
}
