//! Mode routing
//!
//! Each service runs as its own mode of the same binary:
//! - shortener: in-memory link registry with redirects
//! - relay: PDF upload to LaTeX download

pub mod relay;
pub mod shortener;

pub use relay::run_relay;
pub use shortener::run_shortener;

use actix_web::dev::Server;
use anyhow::Result;

use crate::config::ServerConfig;
use crate::runtime::lifetime::shutdown::listen_for_shutdown;

/// Upper bound on HTTP workers regardless of core count
const MAX_WORKERS: usize = 32;

pub(crate) fn worker_count(config: &ServerConfig) -> usize {
    config.cpu_count.clamp(1, MAX_WORKERS)
}

pub(crate) fn bind_address(config: &ServerConfig) -> String {
    format!("{}:{}", config.host, config.port)
}

/// Run `server` until it exits or Ctrl+C triggers a graceful stop.
pub(crate) async fn serve_until_shutdown(server: Server) -> Result<()> {
    actix_web::rt::spawn(listen_for_shutdown(server.handle()));
    server.await?;
    Ok(())
}
