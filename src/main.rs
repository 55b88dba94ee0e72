use assistant_tools::cache::MediaCache;
use assistant_tools::config::Config;
use assistant_tools::logger;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_logger();
    info!("Starting media cache maintenance");

    let config = Config::load()?;
    let max_age_hours = config.cache.max_age_hours;
    let cache = Arc::new(MediaCache::new(&config)?);

    start_cleanup_task(cache, max_age_hours);

    wait_for_shutdown().await;
    info!("Shutdown complete");
    Ok(())
}

fn start_cleanup_task(cache: Arc<MediaCache>, max_age_hours: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match cache.cleanup_old_media(max_age_hours).await {
                Ok(removed) => info!("Cleanup cycle removed {} records", removed),
                Err(e) => error!("Cleanup cycle failed: {}", e),
            }
        }
    });
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
