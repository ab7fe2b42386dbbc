use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderValue, LOCATION};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{debug, info, trace};

use crate::api::templates::{SHORTENER_PAGE, escape_html, render_template};
use crate::errors::ShortifyError;
use crate::registry::{LinkRegistry, ShortLink};

/// Paths under the root that are never treated as short keys
const RESERVED_PATHS: [&str; 1] = ["favicon.ico"];

#[derive(Debug, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
}

/// Presentation settings for the shortener page
#[derive(Clone, Debug)]
pub struct ShortenerSettings {
    pub public_base_url: String,
}

impl ShortenerSettings {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
        }
    }

    pub fn short_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }
}

/// Values shown in the page after a submission
#[derive(Debug, Default)]
struct PageData {
    url: String,
    short_url: String,
    error: String,
}

pub struct ShortenerService;

impl ShortenerService {
    pub async fn handle_index() -> Result<HttpResponse, ShortifyError> {
        Self::render_page(&PageData::default())
    }

    pub async fn handle_shorten(
        form: web::Form<ShortenForm>,
        registry: web::Data<Arc<LinkRegistry>>,
        settings: web::Data<ShortenerSettings>,
    ) -> Result<HttpResponse, ShortifyError> {
        let data = match registry.shorten(&form.url) {
            Ok(ShortLink {
                normalized_url,
                key,
            }) => {
                info!("Shortened {} as {}", normalized_url, key);
                PageData {
                    short_url: settings.short_url(&key),
                    url: normalized_url,
                    error: String::new(),
                }
            }
            Err(ShortifyError::Validation(message)) => {
                debug!("Rejected submission: {}", message);
                PageData {
                    error: message,
                    ..PageData::default()
                }
            }
            Err(e) => return Err(e),
        };

        Self::render_page(&data)
    }

    /// Redirect known keys; anything else falls through to the form page.
    pub async fn handle_lookup(
        path: web::Path<String>,
        registry: web::Data<Arc<LinkRegistry>>,
    ) -> Result<HttpResponse, ShortifyError> {
        let key = path.into_inner();

        if key.is_empty() || RESERVED_PATHS.contains(&key.as_str()) {
            trace!("Skipping lookup for reserved path: {:?}", key);
            return Self::render_page(&PageData::default());
        }

        match registry.resolve(&key) {
            Some(target) => {
                debug!("Redirecting {} -> {}", key, target);
                Ok(HttpResponse::build(StatusCode::SEE_OTHER)
                    .insert_header((LOCATION, location_header(&target)?))
                    .finish())
            }
            None => {
                trace!("Unknown key: {}", key);
                Self::render_page(&PageData::default())
            }
        }
    }

    fn render_page(data: &PageData) -> Result<HttpResponse, ShortifyError> {
        let error_html = if data.error.is_empty() {
            String::new()
        } else {
            format!("<p class=\"error\">{}</p>", escape_html(&data.error))
        };

        let result_html = if data.short_url.is_empty() {
            String::new()
        } else {
            let short_url = escape_html(&data.short_url);
            format!(
                "<div class=\"result\"><p>Original: {}</p><p>Short: <a href=\"{}\">{}</a></p></div>",
                escape_html(&data.url),
                short_url,
                short_url
            )
        };

        let url_html = escape_html(&data.url);
        let page = render_template(
            SHORTENER_PAGE,
            &[
                ("URL", url_html.as_str()),
                ("ERROR", error_html.as_str()),
                ("RESULT", result_html.as_str()),
            ],
        )?;

        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page))
    }
}

/// Build a `Location` value, replacing control characters with spaces when
/// the stored URL is not a valid header value as-is.
fn location_header(target: &str) -> Result<HeaderValue, ShortifyError> {
    if let Ok(value) = HeaderValue::from_str(target) {
        return Ok(value);
    }

    let sanitized: String = target
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    debug!("Sanitized redirect target {:?} -> {:?}", target, sanitized);

    HeaderValue::from_bytes(sanitized.as_bytes()).map_err(|e| {
        ShortifyError::validation(format!("Stored URL is not a valid redirect target: {}", e))
    })
}

/// 短链服务路由，需注册在静态资源与健康检查之后
pub fn shortener_routes() -> actix_web::Scope {
    web::scope("")
        .route("/", web::get().to(ShortenerService::handle_index))
        .route("/", web::post().to(ShortenerService::handle_shorten))
        .route("/{key:.*}", web::get().to(ShortenerService::handle_lookup))
        .route("/{key:.*}", web::head().to(ShortenerService::handle_lookup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url_joins_base_and_key() {
        let settings = ShortenerSettings::new("https://sho.rt/");
        assert_eq!(settings.short_url("abc123"), "https://sho.rt/abc123");

        let settings = ShortenerSettings::new("http://localhost:8080");
        assert_eq!(settings.short_url("abc123"), "http://localhost:8080/abc123");
    }

    #[test]
    fn test_location_header_passes_plain_urls_through() {
        let value = location_header("https://example.com/a?b=c").unwrap();
        assert_eq!(value.to_str().unwrap(), "https://example.com/a?b=c");
    }

    #[test]
    fn test_location_header_replaces_control_characters() {
        let value = location_header("https://example.com/a\r\nb\u{7f}").unwrap();
        assert_eq!(value.to_str().unwrap(), "https://example.com/a  b ");

        // 非 ASCII 字符保留原样
        let value = location_header("https://example.com/caf\u{e9}\n").unwrap();
        assert_eq!(value.as_bytes(), "https://example.com/caf\u{e9} ".as_bytes());
    }
}
