//! Shortener mode
//!
//! Builds the link registry once and injects it into every worker.

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::configure_shortener;
use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, ShortenerSettings, StaticFiles};
use crate::config::get_config;
use crate::registry::{DEFAULT_KEY_BYTES, LinkRegistry};

use super::{bind_address, serve_until_shutdown, worker_count};

/// Run the URL shortener until shutdown
///
/// **Note**: Logging and configuration must be initialized before calling
/// this function.
pub async fn run_shortener() -> Result<()> {
    let config = get_config();
    let app_start_time = AppStartTime::now();

    let registry = Arc::new(LinkRegistry::new(config.shortener.key_bytes));
    if registry.key_bytes() != config.shortener.key_bytes {
        warn!(
            "shortener.key_bytes = {} is out of range, using {}",
            config.shortener.key_bytes,
            registry.key_bytes()
        );
    }
    if registry.key_bytes() <= DEFAULT_KEY_BYTES {
        // 24 位 key 约 4096 条链接时碰撞概率即达 50%
        warn!(
            "Short keys are {} hex chars; collisions overwrite earlier links. \
             Raise shortener.key_bytes for anything beyond a demo.",
            registry.key_bytes() * 2
        );
    }

    let settings = ShortenerSettings::new(config.shortener.public_base_url.clone());
    let static_files = StaticFiles::new(&config.server.static_dir);
    let address = bind_address(&config.server);
    let workers = worker_count(&config.server);

    info!("Using {} workers", workers);
    info!("Static files served from {}", static_files.root().display());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(registry.clone()))
            .app_data(web::Data::new(settings.clone()))
            .app_data(web::Data::new(static_files.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(configure_shortener)
    })
    .workers(workers)
    .disable_signals()
    .bind(&address)
    .with_context(|| format!("Failed to bind {}", address))?
    .run();

    info!("Starting shortener at http://{}", address);
    serve_until_shutdown(server).await
}
