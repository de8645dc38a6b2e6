//! 配置管理器抽象接口

use crate::provider::ConfigProvider;
use async_trait::async_trait;
use infrastructure_common::{ConfigError, ConfigSection, ConfigurationProperties};
use serde::Deserialize;
use serde_json::Value;

/// 配置管理器 trait
///
/// 提供配置的统一管理接口，支持多个配置源
#[async_trait]
pub trait ConfigManager: Send + Sync {
    /// 注册配置提供者
    async fn register_provider(&mut self, provider: Box<dyn ConfigProvider>) -> Result<(), ConfigError>;

    /// 移除配置提供者
    async fn unregister_provider(&mut self, provider_name: &str) -> Result<(), ConfigError>;

    /// 获取配置值
    async fn get_configuration(&self, key: &str) -> Result<Value, ConfigError>;

    /// 获取配置节（按优先级合并所有提供者）
    async fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError>;

    /// 重新加载所有配置
    async fn reload_all(&mut self) -> Result<(), ConfigError>;

    /// 获取已注册的提供者名称（按优先级从高到低）
    fn provider_names(&self) -> Vec<String>;
}

/// 类型化配置绑定器 trait
///
/// 提供强类型的配置绑定功能
#[async_trait]
pub trait TypedConfigBinder: Send + Sync {
    /// 绑定配置到指定类型
    async fn bind_configuration<T>(&self, path: &str) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de> + Send + 'static;

    /// 按类型自身声明的路径绑定配置
    async fn bind_properties<T>(&self) -> Result<T, ConfigError>
    where
        T: ConfigurationProperties,
    {
        self.bind_configuration::<T>(T::config_path()).await
    }
}
