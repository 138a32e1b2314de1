use std::fmt;

#[derive(Debug, Clone)]
pub enum GolinkError {
    Config(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Timeout(String),
    Validation(String),
    Metrics(String),
}

impl GolinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GolinkError::Config(_) => "E001",
            GolinkError::DatabaseConfig(_) => "E002",
            GolinkError::DatabaseConnection(_) => "E003",
            GolinkError::DatabaseOperation(_) => "E004",
            GolinkError::Timeout(_) => "E005",
            GolinkError::Validation(_) => "E006",
            GolinkError::Metrics(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GolinkError::Config(_) => "Configuration Error",
            GolinkError::DatabaseConfig(_) => "Database Configuration Error",
            GolinkError::DatabaseConnection(_) => "Database Connection Error",
            GolinkError::DatabaseOperation(_) => "Database Operation Error",
            GolinkError::Timeout(_) => "Timeout",
            GolinkError::Validation(_) => "Validation Error",
            GolinkError::Metrics(_) => "Metrics Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GolinkError::Config(msg)
            | GolinkError::DatabaseConfig(msg)
            | GolinkError::DatabaseConnection(msg)
            | GolinkError::DatabaseOperation(msg)
            | GolinkError::Timeout(msg)
            | GolinkError::Validation(msg)
            | GolinkError::Metrics(msg) => msg,
        }
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

    /// Whether the error came from the store layer (connectivity, query, timeout).
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            GolinkError::DatabaseConnection(_)
                | GolinkError::DatabaseOperation(_)
                | GolinkError::Timeout(_)
        )
    }
}

impl fmt::Display for GolinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GolinkError {}

// 便捷的构造函数
impl GolinkError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        GolinkError::Config(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        GolinkError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        GolinkError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        GolinkError::DatabaseOperation(msg.into())
    }

    pub fn timeout<T: Into<String>>(msg: T) -> Self {
        GolinkError::Timeout(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        GolinkError::Validation(msg.into())
    }

    pub fn metrics<T: Into<String>>(msg: T) -> Self {
        GolinkError::Metrics(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GolinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                GolinkError::DatabaseConnection(err.to_string())
            }
            other => GolinkError::DatabaseOperation(other.to_string()),
        }
    }
}

impl From<std::io::Error> for GolinkError {
    fn from(err: std::io::Error) -> Self {
        GolinkError::Config(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for GolinkError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        GolinkError::Timeout(err.to_string())
    }
}

#[cfg(feature = "metrics")]
impl From<prometheus::Error> for GolinkError {
    fn from(err: prometheus::Error) -> Self {
        GolinkError::Metrics(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GolinkError>;
