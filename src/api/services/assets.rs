use actix_web::{HttpRequest, HttpResponse, web};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

/// Local directory served under `/static/`
#[derive(Clone, Debug)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a request path onto the static root.
    ///
    /// Only plain path segments are accepted; `..`, absolute paths and
    /// drive prefixes yield `None`.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative);
        let mut resolved = self.root.clone();
        let mut segments = 0;

        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    resolved.push(segment);
                    segments += 1;
                }
                Component::CurDir => {}
                _ => return None,
            }
        }

        (segments > 0).then_some(resolved)
    }
}

pub struct AssetService;

impl AssetService {
    /// 处理静态资源文件
    pub async fn handle_static(req: HttpRequest, files: web::Data<StaticFiles>) -> HttpResponse {
        let path = req.match_info().query("path");
        trace!("Serving static file: {}", path);

        let Some(file_path) = files.resolve(path) else {
            debug!("Rejected static path: {}", path);
            return HttpResponse::NotFound().body("File not found");
        };

        match tokio::fs::read(&file_path).await {
            Ok(content) => HttpResponse::Ok()
                .content_type(Self::get_content_type(path))
                .body(content),
            Err(e) => {
                debug!("Static file not found: {} ({})", file_path.display(), e);
                HttpResponse::NotFound().body("File not found")
            }
        }
    }

    /// 处理 favicon.ico 请求
    pub async fn handle_favicon(files: web::Data<StaticFiles>) -> HttpResponse {
        trace!("Serving favicon");

        let body = tokio::fs::read(files.root().join("favicon.ico"))
            .await
            .unwrap_or_default();

        // 如果没有找到，返回空的 favicon
        HttpResponse::Ok().content_type("image/x-icon").body(body)
    }

    /// 根据文件扩展名确定 Content-Type
    fn get_content_type(path: &str) -> &'static str {
        match path.rsplit('.').next() {
            Some("css") => "text/css; charset=utf-8",
            Some("js") => "application/javascript",
            Some("json") => "application/json",
            Some("html") | Some("htm") => "text/html; charset=utf-8",
            Some("txt") => "text/plain; charset=utf-8",
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("svg") => "image/svg+xml",
            Some("ico") => "image/x-icon",
            Some("woff") => "font/woff",
            Some("woff2") => "font/woff2",
            _ => "application/octet-stream",
        }
    }
}

/// 静态资源路由
pub fn asset_routes() -> actix_web::Scope {
    web::scope("/static").route("/{path:.*}", web::get().to(AssetService::handle_static))
}
