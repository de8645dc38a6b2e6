//! 组件注册表抽象接口

use async_trait::async_trait;
use infrastructure_common::{Component, ComponentDescriptor, DependencyError, Lifetime};
use std::sync::Arc;

/// 组件注册表 trait
///
/// 提供组件注册和解析的核心接口。每个组件以唯一的名称注册，
/// 既可以按名称查找，也可以按类型查找。
#[async_trait]
pub trait ComponentRegistry: Send + Sync {
    /// 注册组件实例，使用 [`Component::name`] 作为注册名
    async fn register_instance<T>(&mut self, instance: T) -> Result<(), DependencyError>
    where
        T: Component;

    /// 以指定名称注册共享实例
    async fn register_named<T>(&mut self, name: &str, instance: Arc<T>) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static;

    /// 注册组件工厂，首次解析时才创建实例
    async fn register_factory<T, F>(
        &mut self,
        name: &str,
        factory: F,
        lifetime: Lifetime,
    ) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, DependencyError> + Send + Sync + 'static;

    /// 按类型解析组件
    async fn resolve<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static;

    /// 按名称解析组件
    async fn resolve_named<T>(&self, name: &str) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static;

    /// 检查组件类型是否已注册
    fn is_registered<T>(&self) -> bool
    where
        T: 'static;

    /// 检查组件名称是否已注册
    fn is_registered_by_name(&self, name: &str) -> bool;

    /// 获取所有已注册的组件描述符（按名称排序）
    fn get_registered_components(&self) -> Vec<ComponentDescriptor>;

    /// 清理已注册的组件
    async fn clear(&mut self) -> Result<(), DependencyError>;
}
