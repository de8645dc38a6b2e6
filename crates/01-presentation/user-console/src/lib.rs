//! # 用户信息控制台
//!
//! 从声明式配置文档读取用户配置，注入到用户服务，并打印用户信息：
//!
//! ```text
//! Name: Alice
//! Class: 10A
//! ```

pub mod bean;
pub mod bootstrap;
pub mod cli;
pub mod service;

pub use bean::{SharedUserConfig, UserConfig};
pub use bootstrap::{
    run, run_in_context, start_context, user_config_bean_name, wire_components, USER_SERVICE_BEAN,
};
pub use cli::Cli;
pub use service::UserService;
