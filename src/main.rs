use std::net::SocketAddr;

use dotenvy::dotenv;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use restaurant_orders::bootstrap::config::Config;
use restaurant_orders::bootstrap::consumers::spawn_consumers;
use restaurant_orders::bootstrap::server::{build_context, build_router};
use restaurant_orders::infrastructure::db;
use restaurant_orders::infrastructure::messaging::topics::ensure_topics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "restaurant_orders=debug,axum=info,tower_http=info,rdkafka=info".into()
        }))
        .init();

    let cfg = Config::from_env()?;
    info!(
        api_port = cfg.api_port,
        brokers = %cfg.kafka.bootstrap_servers,
        production = cfg.is_production,
        "Starting restaurant orders service"
    );

    // Database
    let pool = db::connect_pool(&cfg.database_url, cfg.database_max_connections).await?;
    db::migrate(&pool).await?;

    // Message bus
    ensure_topics(&cfg.kafka).await?;
    let ctx = build_context(cfg.clone(), pool.clone())?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let consumers = spawn_consumers(&ctx, shutdown_rx)?;

    let app = build_router(ctx, pool);
    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let api_handle: JoinHandle<anyhow::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(?e, "Failed to listen for shutdown signal");
                }
                info!("Shutdown requested");
            })
            .await?;
        Ok(())
    });

    match api_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(?e, "API server task failed"),
        Err(e) => error!(?e, "API server task panicked"),
    }

    let _ = shutdown_tx.send(true);
    for handle in consumers {
        if let Err(e) = handle.await {
            error!(?e, "Consumer task panicked");
        }
    }
    Ok(())
}
