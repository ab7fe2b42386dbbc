use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、worker 数量、静态资源目录
/// - shortener: 短链 key 宽度与展示用的公开地址
/// - relay: 文本提取工具、超时、上传大小限制
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub shortener: ShortenerConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：SHORTIFY，分隔符：__
    /// 示例：SHORTIFY__SERVER__PORT=9999
    pub fn load(path: &str) -> Self {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix("SHORTIFY")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("relay.extractor_args")
                    .try_parsing(true),
            );

        // 日志系统尚未初始化，这里只能输出到 stderr
        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("# Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// Directory served under `/static/`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// 短链服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenerConfig {
    /// Number of MD5 digest bytes kept for the key (hex-encoded, so the key
    /// is twice as long). 3 reproduces the historical 6-character keys.
    #[serde(default = "default_key_bytes")]
    pub key_bytes: usize,
    /// Prefix used when displaying the short URL back to the user
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

/// 文档转换服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// External text extraction tool, looked up in PATH
    #[serde(default = "default_extractor_program")]
    pub extractor_program: String,
    /// Extra arguments placed before `<input> -`
    #[serde(default)]
    pub extractor_args: Vec<String>,
    #[serde(default = "default_extract_timeout_secs")]
    pub extract_timeout_secs: u64,
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_key_bytes() -> usize {
    3
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_extractor_program() -> String {
    "pdftotext".to_string()
}

fn default_extract_timeout_secs() -> u64 {
    30
}

fn default_max_upload_size() -> usize {
    10 * 1024 * 1024
}

fn default_output_filename() -> String {
    "converted.tex".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            key_bytes: default_key_bytes(),
            public_base_url: default_public_base_url(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            extractor_program: default_extractor_program(),
            extractor_args: Vec::new(),
            extract_timeout_secs: default_extract_timeout_secs(),
            max_upload_size: default_max_upload_size(),
            output_filename: default_output_filename(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
