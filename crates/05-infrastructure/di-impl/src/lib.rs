//! # 依赖注入具体实现
//!
//! 提供按名称索引的依赖注入容器实现

use async_trait::async_trait;
use di_abstractions::ComponentRegistry;
use infrastructure_common::{Component, ComponentDescriptor, DependencyError, Lifetime};
use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

type SharedInstance = Arc<dyn Any + Send + Sync>;
type InstanceFactory = Arc<dyn Fn() -> Result<SharedInstance, DependencyError> + Send + Sync>;

/// 组件注册信息
struct ComponentRegistration {
    /// 组件描述符
    descriptor: ComponentDescriptor,
    /// 已创建的实例（单例或直接注册的实例）
    instance: Option<SharedInstance>,
    /// 组件工厂
    factory: Option<InstanceFactory>,
}

impl std::fmt::Debug for ComponentRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistration")
            .field("descriptor", &self.descriptor)
            .field("instance_created", &self.instance.is_some())
            .field("factory", &self.factory.as_ref().map(|_| "<function>"))
            .finish()
    }
}

/// 具体的依赖注入容器实现
#[derive(Default)]
pub struct DiContainerImpl {
    /// 组件注册信息，按注册名索引
    registrations: RwLock<BTreeMap<String, ComponentRegistration>>,
}

impl std::fmt::Debug for DiContainerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .registrations
            .try_read()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("DiContainerImpl")
            .field("components", &names)
            .finish()
    }
}

impl DiContainerImpl {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, registration: ComponentRegistration) -> Result<(), DependencyError> {
        let registrations = self.registrations.get_mut();
        let name = registration.descriptor.name.clone();

        if registrations.contains_key(&name) {
            return Err(DependencyError::DuplicateRegistration { name });
        }

        info!(
            "注册组件: {} ({}, {})",
            name,
            registration.descriptor.short_type_name(),
            registration.descriptor.lifetime
        );
        registrations.insert(name, registration);
        Ok(())
    }

    fn downcast<T>(name: &str, instance: SharedInstance) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        instance
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }

    fn create_instance(name: &str, factory: &InstanceFactory) -> Result<SharedInstance, DependencyError> {
        debug!("通过工厂创建组件: {}", name);
        factory()
    }
}

#[async_trait]
impl ComponentRegistry for DiContainerImpl {
    async fn register_instance<T>(&mut self, instance: T) -> Result<(), DependencyError>
    where
        T: Component,
    {
        let name = instance.name();
        self.register_named(name, Arc::new(instance)).await
    }

    async fn register_named<T>(&mut self, name: &str, instance: Arc<T>) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static,
    {
        self.insert(ComponentRegistration {
            descriptor: ComponentDescriptor::new::<T>(name, Lifetime::Singleton),
            instance: Some(instance as SharedInstance),
            factory: None,
        })
    }

    async fn register_factory<T, F>(
        &mut self,
        name: &str,
        factory: F,
        lifetime: Lifetime,
    ) -> Result<(), DependencyError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        let factory: InstanceFactory =
            Arc::new(move || factory().map(|component| Arc::new(component) as SharedInstance));

        self.insert(ComponentRegistration {
            descriptor: ComponentDescriptor::new::<T>(name, lifetime),
            instance: None,
            factory: Some(factory),
        })
    }

    async fn resolve<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        let type_id = TypeId::of::<T>();
        let candidates: Vec<String> = {
            let registrations = self.registrations.read().await;
            registrations
                .values()
                .filter(|r| r.descriptor.type_id == type_id)
                .map(|r| r.descriptor.name.clone())
                .collect()
        };

        match candidates.len() {
            0 => Err(DependencyError::ComponentNotRegistered {
                type_name: std::any::type_name::<T>().to_string(),
            }),
            1 => self.resolve_named(&candidates[0]).await,
            _ => Err(DependencyError::AmbiguousComponent {
                type_name: std::any::type_name::<T>().to_string(),
                candidates,
            }),
        }
    }

    async fn resolve_named<T>(&self, name: &str) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        debug!("解析组件: {} -> {}", name, std::any::type_name::<T>());

        let factory = {
            let registrations = self.registrations.read().await;
            let registration = registrations.get(name).ok_or_else(|| {
                DependencyError::ComponentNotRegistered {
                    type_name: name.to_string(),
                }
            })?;

            if registration.descriptor.type_id != TypeId::of::<T>() {
                return Err(DependencyError::TypeMismatch {
                    name: name.to_string(),
                    expected: std::any::type_name::<T>().to_string(),
                });
            }

            if let Some(instance) = &registration.instance {
                return Self::downcast(name, instance.clone());
            }

            match (&registration.factory, registration.descriptor.lifetime) {
                (Some(factory), Lifetime::Transient) => {
                    let instance = Self::create_instance(name, factory)?;
                    return Self::downcast(name, instance);
                }
                (Some(factory), Lifetime::Singleton) => factory.clone(),
                (None, _) => {
                    return Err(DependencyError::RegistrationError {
                        type_name: name.to_string(),
                        message: "组件既没有实例也没有工厂".to_string(),
                    })
                }
            }
        };

        // 单例首次解析：在写锁下再次检查，保证只创建一次
        let mut registrations = self.registrations.write().await;
        let registration = registrations.get_mut(name).ok_or_else(|| {
            DependencyError::ComponentNotRegistered {
                type_name: name.to_string(),
            }
        })?;

        let instance = match &registration.instance {
            Some(instance) => instance.clone(),
            None => {
                let instance = Self::create_instance(name, &factory)?;
                registration.instance = Some(instance.clone());
                instance
            }
        };

        Self::downcast(name, instance)
    }

    fn is_registered<T>(&self) -> bool
    where
        T: 'static,
    {
        let type_id = TypeId::of::<T>();

        if let Ok(registrations) = self.registrations.try_read() {
            registrations.values().any(|r| r.descriptor.type_id == type_id)
        } else {
            false
        }
    }

    fn is_registered_by_name(&self, name: &str) -> bool {
        if let Ok(registrations) = self.registrations.try_read() {
            registrations.contains_key(name)
        } else {
            false
        }
    }

    fn get_registered_components(&self) -> Vec<ComponentDescriptor> {
        if let Ok(registrations) = self.registrations.try_read() {
            registrations.values().map(|r| r.descriptor.clone()).collect()
        } else {
            Vec::new()
        }
    }

    async fn clear(&mut self) -> Result<(), DependencyError> {
        let registrations = self.registrations.get_mut();
        info!("清理容器，移除 {} 个组件", registrations.len());
        registrations.clear();
        Ok(())
    }
}
