use std::fmt;

#[derive(Debug, Clone)]
pub enum RedilinkError {
    StoreConnection(String),
    StoreOperation(String),
    NotFound(String),
    Serialization(String),
    Validation(String),
    Config(String),
    StorePluginNotFound(String),
}

impl RedilinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            RedilinkError::StoreConnection(_) => "E001",
            RedilinkError::StoreOperation(_) => "E002",
            RedilinkError::NotFound(_) => "E003",
            RedilinkError::Serialization(_) => "E004",
            RedilinkError::Validation(_) => "E005",
            RedilinkError::Config(_) => "E006",
            RedilinkError::StorePluginNotFound(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            RedilinkError::StoreConnection(_) => "Store Connection Error",
            RedilinkError::StoreOperation(_) => "Store Operation Error",
            RedilinkError::NotFound(_) => "Resource Not Found",
            RedilinkError::Serialization(_) => "Serialization Error",
            RedilinkError::Validation(_) => "Validation Error",
            RedilinkError::Config(_) => "Configuration Error",
            RedilinkError::StorePluginNotFound(_) => "Store Plugin Not Found",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            RedilinkError::StoreConnection(msg) => msg,
            RedilinkError::StoreOperation(msg) => msg,
            RedilinkError::NotFound(msg) => msg,
            RedilinkError::Serialization(msg) => msg,
            RedilinkError::Validation(msg) => msg,
            RedilinkError::Config(msg) => msg,
            RedilinkError::StorePluginNotFound(msg) => msg,
        }
    }

    /// Connectivity, protocol and command failures reported by the key-value store.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            RedilinkError::StoreConnection(_) | RedilinkError::StoreOperation(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RedilinkError::NotFound(_))
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

impl fmt::Display for RedilinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for RedilinkError {}

// 便捷的构造函数
impl RedilinkError {
    pub fn store_connection<T: Into<String>>(msg: T) -> Self {
        RedilinkError::StoreConnection(msg.into())
    }

    pub fn store_operation<T: Into<String>>(msg: T) -> Self {
        RedilinkError::StoreOperation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        RedilinkError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        RedilinkError::Serialization(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        RedilinkError::Validation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        RedilinkError::Config(msg.into())
    }

    pub fn store_plugin_not_found<T: Into<String>>(msg: T) -> Self {
        RedilinkError::StorePluginNotFound(msg.into())
    }
}

impl From<redis::RedisError> for RedilinkError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_dropped()
            || err.is_connection_refusal()
            || err.is_timeout()
        {
            RedilinkError::StoreConnection(err.to_string())
        } else {
            RedilinkError::StoreOperation(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RedilinkError {
    fn from(err: serde_json::Error) -> Self {
        RedilinkError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for RedilinkError {
    fn from(err: config::ConfigError) -> Self {
        RedilinkError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RedilinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            RedilinkError::store_connection("a"),
            RedilinkError::store_operation("b"),
            RedilinkError::not_found("c"),
            RedilinkError::serialization("d"),
            RedilinkError::validation("e"),
            RedilinkError::config("f"),
            RedilinkError::store_plugin_not_found("g"),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_store_error_classification() {
        assert!(RedilinkError::store_connection("down").is_store_error());
        assert!(RedilinkError::store_operation("WRONGTYPE").is_store_error());
        assert!(!RedilinkError::not_found("x").is_store_error());
        assert!(RedilinkError::not_found("x").is_not_found());
    }
}
