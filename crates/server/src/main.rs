use anyhow::Result;
use log::{error, info, LevelFilter};
use server::api::server::build_server;
use server::config::Config;
use server::fatal;
use server::store::core::{RedisStore, StoreContext};
use server::sweeper::SessionSweeper;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

const SESSION_SWEEP_INTERVAL_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp(None)
        .parse_default_env()
        .init();

    let config = Arc::new(Config::load());

    let (fatal_tx, mut fatal_rx) = fatal::channel();
    let redis_store =
        Arc::new(RedisStore::new(&config.redis_url).with_fatal_sender(fatal_tx.clone()));
    if let Err(e) = redis_store.ping() {
        error!("Cannot reach document store at {}: {e}", config.redis_url);
        std::process::exit(1);
    }
    let store_context = Arc::new(StoreContext::new(redis_store));

    let mut tasks: JoinSet<Result<(), server::error::ServerError>> = JoinSet::new();
    let sweeper = SessionSweeper::new(
        store_context.clone(),
        Duration::from_secs(SESSION_SWEEP_INTERVAL_SECS),
    );
    tasks.spawn(async move { sweeper.run().await });

    let server = build_server(config.clone(), store_context, fatal_tx)?;
    let handle = server.handle();
    info!(
        "Server running in {} mode on port {}",
        config.environment, config.port
    );

    let mut exit_code = 0;
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server terminated: {e}");
                exit_code = 1;
            }
        }
        Some(joined) = tasks.join_next() => {
            // A background task must never finish on its own. Log it, let the
            // server drain open connections, then bail with a failure code.
            match joined {
                Ok(Err(e)) => error!("Background task failed: {e}"),
                Err(e) => error!("Background task panicked: {e}"),
                Ok(Ok(())) => error!("Background task exited unexpectedly"),
            }
            handle.stop(true).await;
            exit_code = 1;
        }
        Some(reason) = fatal_rx.recv() => {
            error!("Fatal error reported, shutting down: {reason}");
            handle.stop(true).await;
            exit_code = 1;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, draining connections");
            handle.stop(true).await;
        }
    }

    tasks.shutdown().await;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
