use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{GolinkError, Result};

/// 点击队列的最小容量
pub const MIN_CLICK_QUEUE_CAPACITY: usize = 256;

/// 单次请求允许的最大路径段数上限
pub const MAX_SEGMENTS_LIMIT: usize = 64;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 服务器地址、端口、CPU 数量、可信代理
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - resolver: 解析器配置（落地页、查询超时、管理员）
/// - auth: 身份头与登录入口
/// - clicks: 点击记录队列配置
/// - metrics: 指标端点配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub clicks: ClickConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：GOLINK，分隔符：__
    /// 示例：GOLINK__SERVER__PORT=9999
    pub fn load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File};

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("GOLINK")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("resolver.admin_users")
                    .with_list_parse_key("server.trusted_proxies")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| GolinkError::config(format!("Failed to build config: {}", e)))?;

        let mut config: StaticConfig = settings
            .try_deserialize()
            .map_err(|e| GolinkError::config(format!("Failed to deserialize config: {}", e)))?;

        config.validate();
        Ok(config)
    }

    /// 修正不安全的配置值，每次修正都会记录警告
    pub fn validate(&mut self) {
        if self.clicks.queue_capacity < MIN_CLICK_QUEUE_CAPACITY {
            warn!(
                "clicks.queue_capacity {} is below the minimum, using {}",
                self.clicks.queue_capacity, MIN_CLICK_QUEUE_CAPACITY
            );
            self.clicks.queue_capacity = MIN_CLICK_QUEUE_CAPACITY;
        }

        let clamped = self.resolver.max_segments.clamp(1, MAX_SEGMENTS_LIMIT);
        if clamped != self.resolver.max_segments {
            warn!(
                "resolver.max_segments {} out of range, using {}",
                self.resolver.max_segments, clamped
            );
            self.resolver.max_segments = clamped;
        }

        if self.metrics.gauge_refresh_interval_secs == 0 {
            warn!(
                "metrics.gauge_refresh_interval_secs must be positive, using {}",
                default_gauge_refresh_interval()
            );
            self.metrics.gauge_refresh_interval_secs = default_gauge_refresh_interval();
        }

        if !self.metrics.path.starts_with('/') {
            self.metrics.path = format!("/{}", self.metrics.path);
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
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
    /// 可信反向代理（单 IP 或 CIDR），只有来自这些地址的 X-Forwarded-For 才会被采信
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// text / json
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 解析器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// 访问根路径时跳转的落地页
    #[serde(default = "default_default_url")]
    pub default_url: String,
    /// 单次存储查询超时（毫秒）
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
    /// 请求路径最多参与前缀匹配的段数
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,
    /// 视为管理员的用户名
    #[serde(default)]
    pub admin_users: Vec<String>,
}

/// 身份头与登录入口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// 是否信任认证代理注入的身份头；关闭时所有请求都是匿名的
    #[serde(default)]
    pub trust_identity_headers: bool,
    #[serde(default = "default_user_id_header")]
    pub user_id_header: String,
    #[serde(default = "default_username_header")]
    pub username_header: String,
    #[serde(default = "default_role_header")]
    pub role_header: String,
    /// secure 链接匿名访问时跳转的登录入口，会追加 next 参数
    #[serde(default = "default_login_url")]
    pub login_url: String,
}

/// 点击记录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickConfig {
    #[serde(default = "default_clicks_enabled")]
    pub enabled: bool,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
    #[serde(default = "default_max_user_agent_len")]
    pub max_user_agent_len: usize,
    #[serde(default = "default_max_referrer_len")]
    pub max_referrer_len: usize,
}

/// 指标配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default = "default_gauge_refresh_interval")]
    pub gauge_refresh_interval_secs: u64,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://golinks.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
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

fn default_default_url() -> String {
    "https://github.com/AptS-1547/golink".to_string()
}

fn default_lookup_timeout_ms() -> u64 {
    2000
}

fn default_max_segments() -> usize {
    16
}

fn default_user_id_header() -> String {
    "X-Auth-User-Id".to_string()
}

fn default_username_header() -> String {
    "X-Auth-User".to_string()
}

fn default_role_header() -> String {
    "X-Auth-Role".to_string()
}

fn default_login_url() -> String {
    "/.auth/login".to_string()
}

fn default_clicks_enabled() -> bool {
    true
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

fn default_max_user_agent_len() -> usize {
    256
}

fn default_max_referrer_len() -> usize {
    512
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_gauge_refresh_interval() -> u64 {
    60
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
            trusted_proxies: Vec::new(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
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

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_url: default_default_url(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
            max_segments: default_max_segments(),
            admin_users: Vec::new(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            trust_identity_headers: false,
            user_id_header: default_user_id_header(),
            username_header: default_username_header(),
            role_header: default_role_header(),
            login_url: default_login_url(),
        }
    }
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            enabled: default_clicks_enabled(),
            queue_capacity: default_queue_capacity(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            max_user_agent_len: default_max_user_agent_len(),
            max_referrer_len: default_max_referrer_len(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            gauge_refresh_interval_secs: default_gauge_refresh_interval(),
        }
    }
}
