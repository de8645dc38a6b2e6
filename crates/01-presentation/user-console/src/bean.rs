//! 用户配置 Bean

use infrastructure_common::ConfigurationProperties;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 共享的用户配置句柄
///
/// 服务持有的是同一份配置的引用而不是副本。
pub type SharedUserConfig = Arc<RwLock<UserConfig>>;

/// 用户配置
///
/// 两个字段都是必需的，配置文档缺少任何一个都会导致启动失败。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    pub name: String,
    pub class_name: String,
}

impl UserConfig {
    pub fn new(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_name: class_name.into(),
        }
    }

    /// 包装为共享句柄
    pub fn into_shared(self) -> SharedUserConfig {
        Arc::new(RwLock::new(self))
    }
}

impl ConfigurationProperties for UserConfig {
    fn config_path() -> &'static str {
        "userConfig"
    }
}
