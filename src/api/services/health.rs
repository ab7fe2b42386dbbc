use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

use crate::registry::LinkRegistry;
use crate::relay::DocumentRelay;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mode: &'static str,
    pub timestamp: String,
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extractor: Option<String>,
}

/// Health Service
///
/// 两种模式共用同一个 handler，根据注入的状态决定返回字段。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        app_start_time: web::Data<AppStartTime>,
        registry: Option<web::Data<Arc<LinkRegistry>>>,
        relay: Option<web::Data<Arc<DocumentRelay>>>,
    ) -> impl Responder {
        trace!("Received health check request");

        let now = chrono::Utc::now();
        let uptime_secs = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let mode = if registry.is_some() {
            "shortener"
        } else if relay.is_some() {
            "relay"
        } else {
            "unknown"
        };

        let health = HealthResponse {
            status: "healthy",
            mode,
            timestamp: now.to_rfc3339(),
            uptime_secs,
            links: registry.map(|r| r.len()),
            extractor: relay.map(|r| r.extractor().name()),
        };

        HttpResponse::Ok().json(health)
    }

    // 活跃性检查
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
