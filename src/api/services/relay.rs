//! Document relay HTTP handlers

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use tracing::{debug, error, info};

use crate::api::templates::{RELAY_PAGE, escape_html, render_template};
use crate::errors::ShortifyError;
use crate::relay::DocumentRelay;

/// Multipart field carrying the uploaded PDF
pub const UPLOAD_FIELD: &str = "pdf";

pub const LATEX_CONTENT_TYPE: &str = "application/x-tex; charset=utf-8";

#[derive(Clone, Debug)]
pub struct RelaySettings {
    pub max_upload_size: usize,
    pub output_filename: String,
}

pub struct RelayService;

impl RelayService {
    pub async fn handle_index(
        relay: web::Data<Arc<DocumentRelay>>,
        settings: web::Data<RelaySettings>,
    ) -> Result<HttpResponse, ShortifyError> {
        let max_upload = format_size(settings.max_upload_size);
        let notice = if relay.extractor().is_available() {
            String::new()
        } else {
            format!(
                "<p class=\"notice\">{}</p>",
                escape_html("No text extraction tool is installed; downloads will contain placeholder text.")
            )
        };

        let page = render_template(
            RELAY_PAGE,
            &[("MAX_UPLOAD", max_upload.as_str()), ("NOTICE", notice.as_str())],
        )?;

        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page))
    }

    pub async fn handle_upload(
        payload: Multipart,
        relay: web::Data<Arc<DocumentRelay>>,
        settings: web::Data<RelaySettings>,
    ) -> Result<HttpResponse, ShortifyError> {
        let upload = Self::read_upload(payload, settings.max_upload_size).await?;
        info!("Converting upload ({} bytes)", upload.len());

        let document = relay.convert(&upload).await.map_err(|e| {
            error!("Conversion failed: {}", e);
            e
        })?;

        Ok(HttpResponse::Ok()
            .content_type(LATEX_CONTENT_TYPE)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(
                    settings.output_filename.clone(),
                )],
            })
            .body(document))
    }

    pub async fn method_not_allowed() -> HttpResponse {
        HttpResponse::MethodNotAllowed()
            .insert_header(("Allow", "POST"))
            .content_type("text/plain; charset=utf-8")
            .body("Method Not Allowed")
    }

    /// Read the `pdf` field, draining any other fields.
    ///
    /// The size limit applies to the whole body, not just the file field.
    async fn read_upload(mut payload: Multipart, max_size: usize) -> Result<Vec<u8>, ShortifyError> {
        let mut upload: Option<Vec<u8>> = None;
        let mut total = 0usize;

        while let Some(item) = payload.next().await {
            let mut field = item.map_err(|e| {
                ShortifyError::invalid_multipart(format!("Invalid multipart data: {}", e))
            })?;

            let is_upload = field.name() == Some(UPLOAD_FIELD) && upload.is_none();
            if !is_upload {
                debug!("Ignoring multipart field {:?}", field.name());
            }

            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let bytes = chunk.map_err(|e| {
                    ShortifyError::invalid_multipart(format!("Failed to read upload: {}", e))
                })?;

                total += bytes.len();
                if total > max_size {
                    return Err(ShortifyError::upload_too_large(format!(
                        "File size exceeds maximum {}",
                        format_size(max_size)
                    )));
                }

                if is_upload {
                    data.extend_from_slice(&bytes);
                }
            }

            // 浏览器未选择文件时会提交一个空的 part
            if is_upload && !data.is_empty() {
                upload = Some(data);
            }
        }

        upload.ok_or_else(|| ShortifyError::missing_upload("No PDF file uploaded"))
    }
}

/// Human-readable upload limit, shared by the page and the error message
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * 1024;

    match bytes {
        b if b >= MB && b % MB == 0 => format!("{} MB", b / MB),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB && b % KB == 0 => format!("{} KB", b / KB),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} bytes", b),
    }
}

pub fn relay_routes() -> actix_web::Scope {
    web::scope("")
        .route("/", web::get().to(RelayService::handle_index))
        .service(
            web::resource("/upload")
                .route(web::post().to(RelayService::handle_upload))
                .default_service(web::to(RelayService::method_not_allowed)),
        )
}
