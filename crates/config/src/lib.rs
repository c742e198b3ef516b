//! qms-config - 配置加载库

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use thiserror::Error;

use secrecy::Secret;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// 检验记录来源表（可带 schema 前缀）
    #[serde(default = "default_source_table")]
    pub source_table: String,
}

fn default_max_connections() -> u32 {
    // 只读看板，连接需求很小
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 10,
        _ => 5,
    }
}

fn default_source_table() -> String {
    "lqc_insp".to_string()
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

/// 看板配置
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// 年份输入框的默认值
    #[serde(default = "default_year")]
    pub default_year: i32,
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    #[serde(default = "default_max_year")]
    pub max_year: i32,
    /// 品目排名柱状图展示的条数
    #[serde(default = "default_top_items")]
    pub top_items: usize,
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
}

fn default_year() -> i32 {
    2023
}

fn default_min_year() -> i32 {
    2000
}

fn default_max_year() -> i32 {
    2100
}

fn default_top_items() -> usize {
    10
}

fn default_export_file_name() -> String {
    "inspection_data.csv".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_year: default_year(),
            min_year: default_min_year(),
            max_year: default_max_year(),
            top_items: default_top_items(),
            export_file_name: default_export_file_name(),
        }
    }
}

impl DashboardConfig {
    /// 年份是否在输入框允许的范围内
    pub fn year_in_range(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_year > self.max_year {
            return Err(ConfigError::Invalid(format!(
                "dashboard.min_year ({}) is greater than dashboard.max_year ({})",
                self.min_year, self.max_year
            )));
        }
        if !self.year_in_range(self.default_year) {
            return Err(ConfigError::Invalid(format!(
                "dashboard.default_year ({}) is outside {}..={}",
                self.default_year, self.min_year, self.max_year
            )));
        }
        if self.top_items == 0 {
            return Err(ConfigError::Invalid(
                "dashboard.top_items must be at least 1".to_string(),
            ));
        }
        if self.export_file_name.is_empty()
            || self
                .export_file_name
                .chars()
                .any(|c| c == '"' || c == '/' || c == '\\' || c.is_control())
        {
            return Err(ConfigError::Invalid(format!(
                "dashboard.export_file_name {:?} is not a plain file name",
                self.export_file_name
            )));
        }
        Ok(())
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 优先级：`default.toml` < `{APP_ENV}.toml` < `QMS_` 前缀环境变量
    /// （嵌套字段用 `__` 分隔，如 `QMS_DATABASE__URL`）
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let figment = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("QMS_").split("__"));

        Self::from_figment(figment)
    }

    /// 从已组装好的 Figment 提取并校验配置
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.dashboard.validate()?;
        Ok(config)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

#[cfg(test)]
mod tests;
