//! Document relay HTTP tests
//!
//! Multipart bodies are assembled by hand so each test controls field names,
//! sizes and content types exactly.

use std::path::Path;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use tempfile::TempDir;

use shortify::api::configure_relay;
use shortify::api::services::{AppStartTime, RelaySettings, StaticFiles};
use shortify::errors::Result;
use shortify::relay::{DocumentRelay, PLACEHOLDER_TEXT, TextExtractor, UnavailableExtractor};

const BOUNDARY: &str = "----shortify-test-boundary";

// =============================================================================
// Test Setup
// =============================================================================

/// Returns fixed text regardless of input
struct FixedTextExtractor(&'static str);

#[async_trait]
impl TextExtractor for FixedTextExtractor {
    async fn extract(&self, _input: &Path) -> Result<String> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> String {
        "fixed".to_string()
    }
}

fn settings(max_upload_size: usize) -> RelaySettings {
    RelaySettings {
        max_upload_size,
        output_filename: "converted.tex".to_string(),
    }
}

/// Create a test app with relay routes
macro_rules! relay_app {
    ($extractor:expr, $settings:expr, $static_dir:expr) => {{
        let extractor: Arc<dyn TextExtractor> = Arc::new($extractor);
        test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new(DocumentRelay::new(extractor))))
                .app_data(web::Data::new($settings))
                .app_data(web::Data::new(StaticFiles::new($static_dir.path())))
                .app_data(web::Data::new(AppStartTime::now()))
                .configure(configure_relay),
        )
        .await
    }};
}

fn multipart_body(field: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"doc.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(field: &str, content: &[u8]) -> TestRequest {
    TestRequest::post()
        .uri("/upload")
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(field, content))
}

async fn body_string<B: actix_web::body::MessageBody>(
    resp: actix_web::dev::ServiceResponse<B>,
) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

// =============================================================================
// Upload Tests
// =============================================================================

#[actix_rt::test]
async fn test_upload_without_tool_returns_placeholder_document() {
    let dir = TempDir::new().unwrap();
    let app = relay_app!(UnavailableExtractor, settings(10 * 1024 * 1024), dir);

    let req = upload_request("pdf", b"%PDF-1.4 fake").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers();
    assert!(
        headers
            .get("Content-Type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("application/x-tex")
    );
    let disposition = headers
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("converted.tex"));

    let body = body_string(resp).await;
    assert!(body.starts_with("\\documentclass{article}"));
    assert!(body.contains("\\begin{document}"));
    assert!(body.contains(PLACEHOLDER_TEXT));
    assert!(body.trim_end().ends_with("\\end{document}"));
}

#[actix_rt::test]
async fn test_upload_escapes_extracted_text() {
    let dir = TempDir::new().unwrap();
    let app = relay_app!(
        FixedTextExtractor("Cost: $5 & 10% off #1_a {x}"),
        settings(10 * 1024 * 1024),
        dir
    );

    let req = upload_request("pdf", b"%PDF-1.4").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("Cost: \\$5 \\& 10\\% off \\#1\\_a \\{x\\}"));
}

#[actix_rt::test]
async fn test_wrong_field_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = relay_app!(UnavailableExtractor, settings(10 * 1024 * 1024), dir);

    let req = upload_request("file", b"%PDF-1.4").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(resp).await, "No PDF file uploaded");
}

#[actix_rt::test]
async fn test_empty_file_part_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = relay_app!(UnavailableExtractor, settings(10 * 1024 * 1024), dir);

    let req = upload_request("pdf", b"").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_oversized_upload_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = relay_app!(UnavailableExtractor, settings(64), dir);

    let req = upload_request("pdf", &[b'x'; 256]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(resp).await, "File size exceeds maximum 64 bytes");
}

#[actix_rt::test]
async fn test_sub_megabyte_limit_is_reported_consistently() {
    let dir = TempDir::new().unwrap();
    let app = relay_app!(UnavailableExtractor, settings(512 * 1024), dir);

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert!(body_string(resp).await.contains("up to 512 KB"));

    let req = upload_request("pdf", &vec![b'x'; 600 * 1024]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(resp).await, "File size exceeds maximum 512 KB");
}

#[actix_rt::test]
async fn test_non_multipart_body_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = relay_app!(UnavailableExtractor, settings(10 * 1024 * 1024), dir);

    let req = TestRequest::post()
        .uri("/upload")
        .set_form([("pdf", "not a file")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_upload_rejects_other_methods() {
    let dir = TempDir::new().unwrap();
    let app = relay_app!(UnavailableExtractor, settings(10 * 1024 * 1024), dir);

    for req in [
        TestRequest::get().uri("/upload").to_request(),
        TestRequest::put().uri("/upload").to_request(),
    ] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers().get("Allow").unwrap().to_str().unwrap(), "POST");
    }
}

#[cfg(unix)]
#[actix_rt::test]
async fn test_upload_through_external_tool() {
    use shortify::relay::ExternalToolExtractor;
    use std::time::Duration;

    // sh -c 'cat "$0"' <input> -  => 原样输出上传内容
    let extractor = ExternalToolExtractor::new(
        "sh",
        vec!["-c".to_string(), "cat \"$0\"".to_string()],
        Duration::from_secs(5),
    );
    let dir = TempDir::new().unwrap();
    let app = relay_app!(extractor, settings(10 * 1024 * 1024), dir);

    let req = upload_request("pdf", b"50% of ~users").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("50\\% of \\textasciitilde{}users"));
}

// =============================================================================
// Page & Health
// =============================================================================

#[actix_rt::test]
async fn test_index_shows_notice_when_tool_missing() {
    let dir = TempDir::new().unwrap();
    let app = relay_app!(UnavailableExtractor, settings(10 * 1024 * 1024), dir);

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_string(resp).await;
    assert!(body.contains("enctype=\"multipart/form-data\""));
    assert!(body.contains("name=\"pdf\""));
    assert!(body.contains("up to 10 MB"));
    assert!(body.contains("class=\"notice\""));
}

#[actix_rt::test]
async fn test_index_without_notice_when_tool_present() {
    let dir = TempDir::new().unwrap();
    let app = relay_app!(FixedTextExtractor("x"), settings(10 * 1024 * 1024), dir);

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    let body = body_string(resp).await;
    assert!(!body.contains("class=\"notice\""));
}

#[actix_rt::test]
async fn test_health_reports_extractor() {
    let dir = TempDir::new().unwrap();
    let app = relay_app!(UnavailableExtractor, settings(10 * 1024 * 1024), dir);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(json["mode"], "relay");
    assert!(json["extractor"].is_string());
    assert!(json.get("links").is_none());
}
