use std::fmt;

#[derive(Debug, Clone)]
pub enum GeoRouterError {
    Config(String),
    Upstream(String),
    Payload(String),
    Validation(String),
    FileOperation(String),
    Serialization(String),
    NotFound(String),
}

impl GeoRouterError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoRouterError::Config(_) => "E001",
            GeoRouterError::Upstream(_) => "E002",
            GeoRouterError::Payload(_) => "E003",
            GeoRouterError::Validation(_) => "E004",
            GeoRouterError::FileOperation(_) => "E005",
            GeoRouterError::Serialization(_) => "E006",
            GeoRouterError::NotFound(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoRouterError::Config(_) => "Configuration Error",
            GeoRouterError::Upstream(_) => "Upstream Provider Error",
            GeoRouterError::Payload(_) => "Provider Payload Error",
            GeoRouterError::Validation(_) => "Validation Error",
            GeoRouterError::FileOperation(_) => "File Operation Error",
            GeoRouterError::Serialization(_) => "Serialization Error",
            GeoRouterError::NotFound(_) => "Resource Not Found",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeoRouterError::Config(msg) => msg,
            GeoRouterError::Upstream(msg) => msg,
            GeoRouterError::Payload(msg) => msg,
            GeoRouterError::Validation(msg) => msg,
            GeoRouterError::FileOperation(msg) => msg,
            GeoRouterError::Serialization(msg) => msg,
            GeoRouterError::NotFound(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
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

impl fmt::Display for GeoRouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeoRouterError {}

// 便捷的构造函数
impl GeoRouterError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        GeoRouterError::Config(msg.into())
    }

    pub fn upstream<T: Into<String>>(msg: T) -> Self {
        GeoRouterError::Upstream(msg.into())
    }

    pub fn payload<T: Into<String>>(msg: T) -> Self {
        GeoRouterError::Payload(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        GeoRouterError::Validation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GeoRouterError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        GeoRouterError::Serialization(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        GeoRouterError::NotFound(msg.into())
    }
}

impl From<std::io::Error> for GeoRouterError {
    fn from(err: std::io::Error) -> Self {
        GeoRouterError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GeoRouterError {
    fn from(err: serde_json::Error) -> Self {
        GeoRouterError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for GeoRouterError {
    fn from(err: config::ConfigError) -> Self {
        GeoRouterError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoRouterError>;
