//! 配置提供者抽象接口

use async_trait::async_trait;
use infrastructure_common::{ConfigError, ConfigSection};
use serde_json::Value;
use std::path::Path;

/// 配置提供者 trait
///
/// 定义从不同数据源获取配置的统一接口。键使用 `.` 分隔的路径。
#[async_trait]
pub trait ConfigProvider: Send + Sync + std::fmt::Debug {
    /// 获取配置值
    async fn get_configuration(&self, key: &str) -> Result<Value, ConfigError>;

    /// 获取配置节
    async fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError>;

    /// 重新加载配置
    async fn reload(&mut self) -> Result<(), ConfigError>;

    /// 检查配置键是否存在
    async fn contains_key(&self, key: &str) -> Result<bool, ConfigError>;

    /// 获取所有配置键
    async fn get_all_keys(&self) -> Result<Vec<String>, ConfigError>;

    /// 获取提供者名称
    fn name(&self) -> &str;

    /// 获取提供者优先级，数值越高越优先
    fn priority(&self) -> i32 {
        0
    }
}

/// 由单个配置文件支撑的提供者
///
/// `reload` 重新读取同一路径，文件被删除后重新加载返回 `FileNotFound`。
pub trait FileConfigProvider: ConfigProvider {
    /// 配置文件路径
    fn file_path(&self) -> &Path;

    fn file_exists(&self) -> bool {
        self.file_path().is_file()
    }
}
