//! # Configuration Implementation
//!
//! 配置管理的具体实现，提供各种配置源和管理功能。
//!
//! ## 主要组件
//!
//! - [`LayeredConfigManager`] - 分层配置管理器
//! - [`TomlConfigProvider`] - TOML 配置提供者
//! - [`JsonConfigProvider`] - JSON 配置提供者
//! - [`XmlConfigProvider`] - XML Bean 文档配置提供者
//! - [`EnvironmentConfigProviderImpl`] - 环境变量配置提供者

pub mod manager;
pub mod providers;
pub mod xml;

#[cfg(test)]
mod tests;

pub use manager::*;
pub use providers::*;
pub use xml::*;
