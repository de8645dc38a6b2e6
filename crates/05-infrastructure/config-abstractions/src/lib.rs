//! # Configuration Abstractions
//!
//! 配置管理抽象层，定义配置管理的核心接口和约定。
//!
//! ## 核心接口
//!
//! - [`ConfigProvider`] - 配置提供者接口
//! - [`FileConfigProvider`] - 文件配置提供者接口
//! - [`ConfigManager`] - 配置管理器接口
//! - [`TypedConfigBinder`] - 类型化配置绑定接口

pub mod manager;
pub mod provider;

pub use manager::*;
pub use provider::*;
