//! 命令行参数

use crate::bootstrap::USER_SERVICE_BEAN;
use clap::Parser;
use infrastructure_composition::LoggingConfig;
use std::path::PathBuf;

/// 默认的 Bean 文档路径
pub const DEFAULT_CONFIG_PATH: &str = "config/applicationContext.xml";

/// 默认的环境变量覆盖前缀
pub const DEFAULT_ENV_PREFIX: &str = "APP";

/// 默认日志级别
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// 命令行参数
#[derive(Parser, Debug, Clone)]
#[command(name = "user-details")]
#[command(version, about = "从配置文档装配用户服务并打印用户信息")]
pub struct Cli {
    /// 配置文件路径（.xml / .toml / .json）
    #[arg(short, long, env = "USER_DETAILS_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// 环境变量覆盖前缀，例如 APP_USERCONFIG_NAME
    #[arg(long, default_value = DEFAULT_ENV_PREFIX)]
    pub env_prefix: String,

    /// 不读取环境变量覆盖
    #[arg(long)]
    pub no_env: bool,

    /// 要获取的服务 Bean 名称
    #[arg(long, default_value = USER_SERVICE_BEAN)]
    pub bean: String,

    /// 日志级别
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// 使用默认参数读取指定配置文件
    pub fn with_config(config: impl Into<PathBuf>) -> Self {
        Self {
            config: config.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            no_env: false,
            bean: USER_SERVICE_BEAN.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::default()
            .with_level(parse_log_level(&self.log_level))
            .with_json_format(self.json_logs)
    }
}

fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::WARN,
    }
}
