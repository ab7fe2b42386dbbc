//! Relay mode
//!
//! Probes for the extraction tool once at startup, then serves uploads.

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Compress, web};
use anyhow::{Context, Result};
use tracing::info;

use crate::api::configure_relay;
use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, RelaySettings, StaticFiles};
use crate::config::get_config;
use crate::relay::{DocumentRelay, probe};

use super::{bind_address, serve_until_shutdown, worker_count};

/// Run the document relay until shutdown
pub async fn run_relay() -> Result<()> {
    let config = get_config();
    let app_start_time = AppStartTime::now();

    let relay = Arc::new(DocumentRelay::new(probe(&config.relay)));
    let settings = RelaySettings {
        max_upload_size: config.relay.max_upload_size,
        output_filename: config.relay.output_filename.clone(),
    };
    let static_files = StaticFiles::new(&config.server.static_dir);
    let address = bind_address(&config.server);
    let workers = worker_count(&config.server);

    info!(
        "Text extractor: {}, upload limit {} bytes",
        relay.extractor().name(),
        settings.max_upload_size
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(relay.clone()))
            .app_data(web::Data::new(settings.clone()))
            .app_data(web::Data::new(static_files.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(configure_relay)
    })
    .workers(workers)
    .disable_signals()
    .bind(&address)
    .with_context(|| format!("Failed to bind {}", address))?
    .run();

    info!("Starting relay at http://{}", address);
    serve_until_shutdown(server).await
}
