use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(Debug, Clone)]
pub enum ShortifyError {
    Validation(String),
    MissingUpload(String),
    UploadTooLarge(String),
    InvalidMultipart(String),
    FileOperation(String),
    Extraction(String),
    Template(String),
    Config(String),
}

impl ShortifyError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortifyError::Validation(_) => "E001",
            ShortifyError::MissingUpload(_) => "E002",
            ShortifyError::UploadTooLarge(_) => "E003",
            ShortifyError::InvalidMultipart(_) => "E004",
            ShortifyError::FileOperation(_) => "E005",
            ShortifyError::Extraction(_) => "E006",
            ShortifyError::Template(_) => "E007",
            ShortifyError::Config(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortifyError::Validation(_) => "Validation Error",
            ShortifyError::MissingUpload(_) => "Missing Upload",
            ShortifyError::UploadTooLarge(_) => "Upload Too Large",
            ShortifyError::InvalidMultipart(_) => "Invalid Multipart Data",
            ShortifyError::FileOperation(_) => "File Operation Error",
            ShortifyError::Extraction(_) => "Text Extraction Error",
            ShortifyError::Template(_) => "Template Error",
            ShortifyError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortifyError::Validation(msg) => msg,
            ShortifyError::MissingUpload(msg) => msg,
            ShortifyError::UploadTooLarge(msg) => msg,
            ShortifyError::InvalidMultipart(msg) => msg,
            ShortifyError::FileOperation(msg) => msg,
            ShortifyError::Extraction(msg) => msg,
            ShortifyError::Template(msg) => msg,
            ShortifyError::Config(msg) => msg,
        }
    }

    /// 是否为客户端错误（映射到 400）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ShortifyError::Validation(_)
                | ShortifyError::MissingUpload(_)
                | ShortifyError::UploadTooLarge(_)
                | ShortifyError::InvalidMultipart(_)
        )
    }

    /// 格式化为彩色输出（用于启动失败时的终端输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortifyError {}

impl ResponseError for ShortifyError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        // 服务端错误不向客户端暴露内部细节
        let body = if self.is_client_error() {
            self.message().to_string()
        } else {
            "Internal Server Error".to_string()
        };

        HttpResponse::build(self.status_code())
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body(body)
    }
}

// 便捷的构造函数
impl ShortifyError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortifyError::Validation(msg.into())
    }

    pub fn missing_upload<T: Into<String>>(msg: T) -> Self {
        ShortifyError::MissingUpload(msg.into())
    }

    pub fn upload_too_large<T: Into<String>>(msg: T) -> Self {
        ShortifyError::UploadTooLarge(msg.into())
    }

    pub fn invalid_multipart<T: Into<String>>(msg: T) -> Self {
        ShortifyError::InvalidMultipart(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShortifyError::FileOperation(msg.into())
    }

    pub fn extraction<T: Into<String>>(msg: T) -> Self {
        ShortifyError::Extraction(msg.into())
    }

    pub fn template<T: Into<String>>(msg: T) -> Self {
        ShortifyError::Template(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ShortifyError::Config(msg.into())
    }
}

impl From<std::io::Error> for ShortifyError {
    fn from(err: std::io::Error) -> Self {
        ShortifyError::FileOperation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        let err = ShortifyError::missing_upload("no pdf field");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "E002");

        let err = ShortifyError::upload_too_large("too big");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_server_errors_map_to_internal_error() {
        let err = ShortifyError::file_operation("disk full");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ShortifyError = io_err.into();
        assert!(matches!(err, ShortifyError::FileOperation(_)));
    }

    #[test]
    fn test_format_simple() {
        let err = ShortifyError::validation("Please enter a URL");
        assert_eq!(err.format_simple(), "Validation Error: Please enter a URL");
        assert_eq!(err.to_string(), err.format_simple());
    }
}
