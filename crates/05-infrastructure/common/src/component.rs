//! 组件基础接口定义
//!
//! 提供所有可注册组件必须实现的基础 trait

use crate::lifecycle::Lifetime;
use std::any::TypeId;
use std::fmt::Debug;

/// 组件基础 trait
///
/// 所有注册到容器中的组件都必须实现此 trait
pub trait Component: Send + Sync + Debug + 'static {
    /// 组件名称，即容器中的默认查找名
    fn name(&self) -> &'static str;
}

/// 组件描述符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    /// 组件注册名
    pub name: String,
    /// 组件类型ID
    pub type_id: TypeId,
    /// 组件类型全名
    pub type_name: &'static str,
    /// 组件生命周期
    pub lifetime: Lifetime,
}

impl ComponentDescriptor {
    /// 创建新的组件描述符
    pub fn new<T: 'static>(name: impl Into<String>, lifetime: Lifetime) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            lifetime,
        }
    }

    /// 类型的短名称（不含模块路径）
    pub fn short_type_name(&self) -> &str {
        self.type_name.rsplit("::").next().unwrap_or(self.type_name)
    }
}
