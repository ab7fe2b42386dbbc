//! HTTP surface for both services
//!
//! Route registration order matters: the shortener's catch-all `/{key}`
//! scope must come after `/health`, `/static` and `/favicon.ico`.

pub mod middleware;
pub mod services;
pub mod templates;

use actix_web::web;

use services::{
    AssetService, asset_routes, health_routes, relay_routes, shortener_routes,
};

/// Register the link registry routes.
///
/// Expects `Arc<LinkRegistry>`, `ShortenerSettings`, `StaticFiles` and
/// `AppStartTime` as app data.
pub fn configure_shortener(cfg: &mut web::ServiceConfig) {
    cfg.service(health_routes())
        .service(asset_routes())
        .route("/favicon.ico", web::get().to(AssetService::handle_favicon))
        .service(shortener_routes());
}

/// Register the document relay routes.
///
/// Expects `Arc<DocumentRelay>`, `RelaySettings`, `StaticFiles` and
/// `AppStartTime` as app data.
pub fn configure_relay(cfg: &mut web::ServiceConfig) {
    cfg.service(health_routes())
        .service(asset_routes())
        .route("/favicon.ico", web::get().to(AssetService::handle_favicon))
        .service(relay_routes());
}
