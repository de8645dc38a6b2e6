//! 配置提供者实现

use async_trait::async_trait;
use config_abstractions::{ConfigProvider, FileConfigProvider};
use infrastructure_common::{ConfigError, ConfigSection};
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 文件配置的默认优先级
pub const FILE_PROVIDER_PRIORITY: i32 = 100;
/// 环境变量配置的默认优先级
pub const ENV_PROVIDER_PRIORITY: i32 = 200;

/// 支持的配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Xml,
}

impl ConfigFormat {
    /// 根据文件扩展名识别格式
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            Some("xml") => Ok(Self::Xml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// 读取配置文件内容，文件不存在时返回 `FileNotFound`
pub(crate) fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    Ok(std::fs::read_to_string(path)?)
}

/// 以 JSON 值表示的配置树，所有提供者共用的查找逻辑
#[derive(Debug, Clone, Default)]
pub(crate) struct ValueTree {
    root: Value,
}

impl ValueTree {
    pub(crate) fn new(root: Value) -> Self {
        Self { root }
    }

    /// 从嵌套路径获取值
    ///
    /// 顶层存在与 `path` 完全相同的键时优先返回，Bean id 中可以带 `.`。
    pub(crate) fn get(&self, path: &str) -> Option<&Value> {
        if let Some(value) = self.root.as_object().and_then(|root| root.get(path)) {
            return Some(value);
        }

        let mut current = &self.root;
        for part in path.split('.') {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    pub(crate) fn value(&self, key: &str) -> Result<Value, ConfigError> {
        self.get(key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound { key: key.to_string() })
    }

    pub(crate) fn section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        match self.get(section_name) {
            Some(value) => {
                ConfigSection::from_value(value).ok_or_else(|| ConfigError::TypeConversionError {
                    message: format!("配置节 {} 不是表类型", section_name),
                })
            }
            None => Err(ConfigError::KeyNotFound {
                key: section_name.to_string(),
            }),
        }
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Value::Object(object) = &self.root {
            collect_keys(object, "", &mut keys);
        }
        keys
    }
}

/// 递归收集所有键
fn collect_keys(object: &Map<String, Value>, prefix: &str, keys: &mut Vec<String>) {
    for (key, value) in object {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        if let Value::Object(nested) = value {
            collect_keys(nested, &full_key, keys);
        }
        keys.push(full_key);
    }
}

/// 将 TOML 值转换为 JSON 值
fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number(serde_json::Number::from(*i)),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Array(arr) => Value::Array(arr.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
    }
}

/// TOML 配置提供者
#[derive(Debug)]
pub struct TomlConfigProvider {
    file_path: PathBuf,
    tree: ValueTree,
    priority: i32,
}

impl TomlConfigProvider {
    /// 创建新的 TOML 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut provider = Self {
            file_path: path.as_ref().to_path_buf(),
            tree: ValueTree::default(),
            priority: FILE_PROVIDER_PRIORITY,
        };

        provider.load_config()?;
        Ok(provider)
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn load_config(&mut self) -> Result<(), ConfigError> {
        debug!("加载 TOML 配置文件: {}", self.file_path.display());

        let content = read_config_file(&self.file_path)?;
        let table: toml::Table = toml::from_str(&content)
            .map_err(|e| ConfigError::parse_error(self.file_path.display().to_string(), e))?;
        self.tree = ValueTree::new(toml_to_json(&toml::Value::Table(table)));

        debug!("TOML 配置文件加载完成");
        Ok(())
    }
}

#[async_trait]
impl ConfigProvider for TomlConfigProvider {
    async fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        self.tree.value(key)
    }

    async fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        self.tree.section(section_name)
    }

    async fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_config()
    }

    async fn contains_key(&self, key: &str) -> Result<bool, ConfigError> {
        Ok(self.tree.get(key).is_some())
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, ConfigError> {
        Ok(self.tree.keys())
    }

    fn name(&self) -> &str {
        "TomlConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FileConfigProvider for TomlConfigProvider {
    fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// JSON 配置提供者
#[derive(Debug)]
pub struct JsonConfigProvider {
    file_path: PathBuf,
    tree: ValueTree,
    priority: i32,
}

impl JsonConfigProvider {
    /// 创建新的 JSON 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut provider = Self {
            file_path: path.as_ref().to_path_buf(),
            tree: ValueTree::default(),
            priority: FILE_PROVIDER_PRIORITY,
        };

        provider.load_config()?;
        Ok(provider)
    }

    fn load_config(&mut self) -> Result<(), ConfigError> {
        debug!("加载 JSON 配置文件: {}", self.file_path.display());

        let content = read_config_file(&self.file_path)?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| ConfigError::parse_error(self.file_path.display().to_string(), e))?;
        self.tree = ValueTree::new(value);

        debug!("JSON 配置文件加载完成");
        Ok(())
    }
}

#[async_trait]
impl ConfigProvider for JsonConfigProvider {
    async fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        self.tree.value(key)
    }

    async fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        self.tree.section(section_name)
    }

    async fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_config()
    }

    async fn contains_key(&self, key: &str) -> Result<bool, ConfigError> {
        Ok(self.tree.get(key).is_some())
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, ConfigError> {
        Ok(self.tree.keys())
    }

    fn name(&self) -> &str {
        "JsonConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FileConfigProvider for JsonConfigProvider {
    fn file_path(&self) -> &Path {
        &self.file_path
    }
}

const ENV_SEPARATOR: &str = "_";

/// 环境变量配置提供者
///
/// `APP_USERCONFIG_NAME=Bob` 映射为配置键 `userconfig.name`，值始终保留为字符串。
/// 查找时键名转为小写，因此 `userConfig` 这样的节名也能命中。
#[derive(Debug)]
pub struct EnvironmentConfigProviderImpl {
    prefix: String,
    priority: i32,
    /// 为 `None` 时从进程环境读取
    fixed_vars: Option<Vec<(String, String)>>,
    tree: ValueTree,
}

impl EnvironmentConfigProviderImpl {
    /// 创建新的环境变量配置提供者
    pub fn new(prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let mut provider = Self {
            prefix: prefix.into(),
            priority: ENV_PROVIDER_PRIORITY,
            fixed_vars: None,
            tree: ValueTree::default(),
        };

        provider.load_env_vars();
        Ok(provider)
    }

    /// 使用给定的变量集合代替进程环境
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut provider = Self {
            prefix: prefix.into(),
            priority: ENV_PROVIDER_PRIORITY,
            fixed_vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
            tree: ValueTree::default(),
        };

        provider.load_env_vars();
        provider
    }

    fn load_env_vars(&mut self) {
        debug!("加载环境变量，前缀: {}", self.prefix);

        let mut vars: Vec<(String, String)> = match &self.fixed_vars {
            Some(vars) => vars.clone(),
            None => utf8_vars(std::env::vars_os()),
        };
        // 排序后较短的键先插入，`APP_A` 与 `APP_A_B` 并存时嵌套表优先
        vars.sort();

        let mut root = Map::new();
        let mut loaded = 0usize;
        for (key, value) in vars {
            if let Some(parts) = self.env_key_to_path(&key) {
                insert_path(&mut root, &parts, Value::String(value));
                loaded += 1;
            }
        }

        self.tree = ValueTree::new(Value::Object(root));
        debug!("加载了 {} 个环境变量", loaded);
    }

    /// 将环境变量键转换为配置路径
    fn env_key_to_path(&self, env_key: &str) -> Option<Vec<String>> {
        let marker = format!("{}{}", self.prefix, ENV_SEPARATOR);
        let rest = env_key.strip_prefix(&marker)?;

        let parts: Vec<String> = rest
            .split(ENV_SEPARATOR)
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase)
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts)
        }
    }
}

/// 只保留键和值都是合法 UTF-8 的环境变量
fn utf8_vars<I>(vars: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                debug!("跳过非 UTF-8 环境变量: {:?}", key);
                None
            }
        })
        .collect()
}

fn insert_path(object: &mut Map<String, Value>, parts: &[String], value: Value) {
    match parts {
        [] => {}
        [leaf] => {
            object.insert(leaf.clone(), value);
        }
        [head, tail @ ..] => {
            let entry = object
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(nested) = entry {
                insert_path(nested, tail, value);
            }
        }
    }
}

#[async_trait]
impl ConfigProvider for EnvironmentConfigProviderImpl {
    async fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        self.tree
            .get(&key.to_lowercase())
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound { key: key.to_string() })
    }

    async fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        self.tree.section(&section_name.to_lowercase())
    }

    async fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_env_vars();
        Ok(())
    }

    async fn contains_key(&self, key: &str) -> Result<bool, ConfigError> {
        Ok(self.tree.get(&key.to_lowercase()).is_some())
    }

    async fn get_all_keys(&self) -> Result<Vec<String>, ConfigError> {
        Ok(self.tree.keys())
    }

    fn name(&self) -> &str {
        "EnvironmentConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
