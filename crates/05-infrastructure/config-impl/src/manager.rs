//! 配置管理器实现

use async_trait::async_trait;
use config_abstractions::{ConfigManager, ConfigProvider, TypedConfigBinder};
use infrastructure_common::{ConfigError, ConfigSection};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

/// 分层配置管理器
///
/// 协调多个配置源并提供统一的配置访问接口。提供者按优先级升序保存，
/// 合并配置节时高优先级覆盖低优先级；优先级相同时后注册者覆盖先注册者。
#[derive(Default)]
pub struct LayeredConfigManager {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl std::fmt::Debug for LayeredConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredConfigManager")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl LayeredConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取配置提供者数量
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

#[async_trait]
impl ConfigManager for LayeredConfigManager {
    async fn register_provider(&mut self, provider: Box<dyn ConfigProvider>) -> Result<(), ConfigError> {
        info!(
            "注册配置提供者: {} (优先级 {})",
            provider.name(),
            provider.priority()
        );

        let priority = provider.priority();
        let position = self
            .providers
            .iter()
            .position(|p| p.priority() > priority)
            .unwrap_or(self.providers.len());
        self.providers.insert(position, provider);
        Ok(())
    }

    async fn unregister_provider(&mut self, provider_name: &str) -> Result<(), ConfigError> {
        let before = self.providers.len();
        self.providers.retain(|p| p.name() != provider_name);

        if self.providers.len() == before {
            return Err(ConfigError::KeyNotFound {
                key: provider_name.to_string(),
            });
        }

        debug!("移除配置提供者: {}", provider_name);
        Ok(())
    }

    async fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        for provider in self.providers.iter().rev() {
            match provider.get_configuration(key).await {
                Ok(value) => {
                    debug!("配置 {} 来自 {}", key, provider.name());
                    return Ok(value);
                }
                Err(ConfigError::KeyNotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(ConfigError::KeyNotFound { key: key.to_string() })
    }

    async fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        let mut merged = ConfigSection::new();
        let mut found = false;

        for provider in &self.providers {
            match provider.get_section(section_name).await {
                Ok(section) => {
                    debug!(
                        "合并配置节 {} 来自 {} ({} 项)",
                        section_name,
                        provider.name(),
                        section.len()
                    );
                    merged.merge_from(&section);
                    found = true;
                }
                Err(ConfigError::KeyNotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        if found {
            Ok(merged)
        } else {
            Err(ConfigError::KeyNotFound {
                key: section_name.to_string(),
            })
        }
    }

    async fn reload_all(&mut self) -> Result<(), ConfigError> {
        info!("重新加载所有配置");
        for provider in &mut self.providers {
            provider.reload().await?;
        }
        Ok(())
    }

    fn provider_names(&self) -> Vec<String> {
        self.providers
            .iter()
            .rev()
            .map(|p| p.name().to_string())
            .collect()
    }
}

#[async_trait]
impl TypedConfigBinder for LayeredConfigManager {
    async fn bind_configuration<T>(&self, path: &str) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de> + Send + 'static,
    {
        debug!("绑定配置到类型: {} -> {}", path, std::any::type_name::<T>());

        let section = self.get_section(path).await?;
        let result = section.bind::<T>().map_err(|e| ConfigError::BindError {
            path: path.to_string(),
            type_name: std::any::type_name::<T>().to_string(),
            message: e.to_string(),
        })?;

        debug!("配置绑定成功: {}", path);
        Ok(result)
    }
}
