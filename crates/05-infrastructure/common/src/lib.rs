//! # Infrastructure Common
//!
//! 这个 crate 提供了基础设施层的公共 traits 和工具。
//!
//! ## 核心组件
//!
//! - [`Component`] - 组件基础 trait
//! - [`ConfigurationProperties`] - 可绑定的配置对象 trait
//! - [`ConfigSection`] - 配置节
//! - [`Lifetime`] - 组件生命周期
//! - [`InfrastructureError`] - 基础设施错误类型

pub mod component;
pub mod configuration;
pub mod errors;
pub mod lifecycle;

pub use component::*;
pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
