//! 应用上下文

use crate::builder::ApplicationContextBuilder;
use config_abstractions::{ConfigManager, TypedConfigBinder};
use config_impl::{BeanDefinition, LayeredConfigManager};
use di_abstractions::ComponentRegistry;
use di_impl::DiContainerImpl;
use infrastructure_common::{
    Component, ComponentDescriptor, ConfigError, ConfigurationProperties, DependencyError,
    InfrastructureError, Lifetime,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// 上下文状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStatus {
    /// 已构建，尚未启动
    Initialized,
    /// 运行中
    Running,
    /// 已停止
    Stopped,
}

impl std::fmt::Display for ContextStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Initialized => "Initialized",
            Self::Running => "Running",
            Self::Stopped => "Stopped",
        };
        f.write_str(name)
    }
}

/// 应用上下文
///
/// 持有配置管理器和依赖注入容器，组件在上下文运行期间可按名称查找。
pub struct ApplicationContext {
    id: uuid::Uuid,
    config_manager: Arc<LayeredConfigManager>,
    di_container: RwLock<DiContainerImpl>,
    bean_definitions: Vec<BeanDefinition>,
    status: RwLock<ContextStatus>,
    started_at: RwLock<Option<chrono::DateTime<chrono::Utc>>>,
}

impl std::fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("id", &self.id)
            .field("config_manager", &self.config_manager)
            .field("bean_definitions", &self.bean_definitions.len())
            .finish()
    }
}

impl ApplicationContext {
    /// 创建应用上下文构建器
    pub fn builder() -> ApplicationContextBuilder {
        ApplicationContextBuilder::new()
    }

    pub(crate) fn new(
        config_manager: LayeredConfigManager,
        di_container: DiContainerImpl,
        bean_definitions: Vec<BeanDefinition>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            config_manager: Arc::new(config_manager),
            di_container: RwLock::new(di_container),
            bean_definitions,
            status: RwLock::new(ContextStatus::Initialized),
            started_at: RwLock::new(None),
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    /// 获取当前状态
    pub async fn status(&self) -> ContextStatus {
        *self.status.read().await
    }

    /// 启动时间
    pub async fn started_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        *self.started_at.read().await
    }

    /// 启动上下文
    pub async fn start(&self) -> Result<(), InfrastructureError> {
        let mut status = self.status.write().await;
        if *status != ContextStatus::Initialized {
            return Err(InfrastructureError::InvalidState {
                expected: ContextStatus::Initialized.to_string(),
                actual: status.to_string(),
            });
        }

        *status = ContextStatus::Running;
        *self.started_at.write().await = Some(chrono::Utc::now());

        info!(
            "应用上下文已启动: {} (配置源: {:?})",
            self.id,
            self.config_manager.provider_names()
        );
        Ok(())
    }

    /// 停止上下文并释放所有组件
    pub async fn stop(&self) -> Result<(), InfrastructureError> {
        let mut status = self.status.write().await;
        if *status != ContextStatus::Running {
            return Err(InfrastructureError::InvalidState {
                expected: ContextStatus::Running.to_string(),
                actual: status.to_string(),
            });
        }

        self.di_container.write().await.clear().await?;
        *status = ContextStatus::Stopped;

        info!("应用上下文已停止: {}", self.id);
        Ok(())
    }

    async fn ensure_running(&self) -> Result<(), InfrastructureError> {
        let status = self.status().await;
        if status == ContextStatus::Running {
            Ok(())
        } else {
            Err(InfrastructureError::InvalidState {
                expected: ContextStatus::Running.to_string(),
                actual: status.to_string(),
            })
        }
    }

    /// 获取单个配置值
    pub async fn get_config<T>(&self, key: &str) -> Result<T, InfrastructureError>
    where
        T: DeserializeOwned,
    {
        let value = self.config_manager.get_configuration(key).await?;
        serde_json::from_value(value).map_err(|e| {
            InfrastructureError::from(ConfigError::TypeConversionError {
                message: format!("{}: {}", key, e),
            })
        })
    }

    /// 绑定指定路径的配置节
    pub async fn bind_configuration<T>(&self, path: &str) -> Result<T, InfrastructureError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        Ok(self.config_manager.bind_configuration(path).await?)
    }

    /// 按类型声明的路径绑定配置
    pub async fn bind<T>(&self) -> Result<T, InfrastructureError>
    where
        T: ConfigurationProperties,
    {
        Ok(self.config_manager.bind_properties::<T>().await?)
    }

    /// 配置文档中声明的 Bean 定义
    pub fn bean_definitions(&self) -> &[BeanDefinition] {
        &self.bean_definitions
    }

    pub fn bean_definition(&self, id: &str) -> Option<&BeanDefinition> {
        self.bean_definitions.iter().find(|d| d.id == id)
    }

    /// 注册组件实例
    pub async fn register_instance<T>(&self, instance: T) -> Result<(), InfrastructureError>
    where
        T: Component,
    {
        Ok(self.di_container.write().await.register_instance(instance).await?)
    }

    /// 以指定名称注册共享实例
    pub async fn register_named<T>(&self, name: &str, instance: Arc<T>) -> Result<(), InfrastructureError>
    where
        T: Send + Sync + 'static,
    {
        Ok(self
            .di_container
            .write()
            .await
            .register_named(name, instance)
            .await?)
    }

    /// 注册组件工厂
    pub async fn register_factory<T, F>(
        &self,
        name: &str,
        factory: F,
        lifetime: Lifetime,
    ) -> Result<(), InfrastructureError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        Ok(self
            .di_container
            .write()
            .await
            .register_factory(name, factory, lifetime)
            .await?)
    }

    /// 按名称获取组件
    pub async fn get_component<T>(&self, name: &str) -> Result<Arc<T>, InfrastructureError>
    where
        T: Send + Sync + 'static,
    {
        self.ensure_running().await?;
        debug!("查找组件: {}", name);
        Ok(self.di_container.read().await.resolve_named::<T>(name).await?)
    }

    /// 按类型获取组件
    pub async fn get_component_by_type<T>(&self) -> Result<Arc<T>, InfrastructureError>
    where
        T: Send + Sync + 'static,
    {
        self.ensure_running().await?;
        Ok(self.di_container.read().await.resolve::<T>().await?)
    }

    /// 检查名称是否已注册
    pub async fn contains_component(&self, name: &str) -> bool {
        self.di_container.read().await.is_registered_by_name(name)
    }

    /// 所有已注册的组件
    pub async fn registered_components(&self) -> Vec<ComponentDescriptor> {
        self.di_container.read().await.get_registered_components()
    }

    /// 所有已注册的组件名称（按名称排序）
    pub async fn component_names(&self) -> Vec<String> {
        self.registered_components()
            .await
            .into_iter()
            .map(|d| d.name)
            .collect()
    }
}
