//! # 基础设施组合层
//!
//! 将配置管理和依赖注入组合成一个可运行的应用上下文。
//!
//! ## 主要功能
//!
//! - **上下文构建器**: 使用构建者模式组装配置源（TOML / JSON / XML Bean 文档 / 环境变量）
//! - **应用上下文**: 持有配置和组件，支持按名称查找组件
//! - **生命周期管理**: 上下文的启动和停止
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::ApplicationContext;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ApplicationContext::builder()
//!         .add_config_file("config/applicationContext.xml")?
//!         .build()
//!         .await?;
//!
//!     context.start().await?;
//!
//!     let name: String = context.get_config("userConfig.name").await?;
//!     println!("Name: {}", name);
//!
//!     context.stop().await?;
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;


// 重新导出主要类型
pub use builder::{ApplicationContextBuilder, LoggingConfig};
pub use context::{ApplicationContext, ContextStatus};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
