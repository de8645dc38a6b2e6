//! 配置相关的基础接口定义

use crate::errors::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 配置属性 trait
///
/// 可以从配置节直接绑定的强类型配置对象必须实现此 trait
pub trait ConfigurationProperties: DeserializeOwned + Send + Sync + 'static {
    /// 获取配置路径（配置节名称）
    fn config_path() -> &'static str;
}

/// 配置节
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSection {
    /// 配置数据
    pub data: HashMap<String, serde_json::Value>,
}

impl ConfigSection {
    /// 创建新的配置节
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// 从 JSON 对象创建配置节，非对象值返回 `None`
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        value.as_object().map(|object| Self {
            data: object
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }

    /// 插入配置项
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// 获取配置项
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 用另一个配置节覆盖当前配置节
    ///
    /// 键名按 ASCII 大小写不敏感匹配；已存在的键保留原有拼写，
    /// 这样环境变量（全小写）也能覆盖 `className` 这样的键。
    pub fn merge_from(&mut self, other: &ConfigSection) {
        for (key, value) in &other.data {
            let existing = self
                .data
                .keys()
                .find(|k| k.eq_ignore_ascii_case(key))
                .cloned();

            match existing {
                Some(existing) => {
                    self.data.insert(existing, value.clone());
                }
                None => {
                    self.data.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// 绑定到具体类型
    pub fn bind<T>(&self) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = serde_json::Value::Object(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );

        serde_json::from_value(value).map_err(|e| ConfigError::SerializationError { source: e })
    }
}
