//! XML Bean 定义文档配置提供者
//!
//! 读取如下形式的文档：
//!
//! ```xml
//! <beans>
//!   <bean id="userConfig" class="UserConfig">
//!     <property name="name" value="Alice"/>
//!     <property name="className" value="10A"/>
//!   </bean>
//!   <bean id="userService" class="UserService">
//!     <constructor-arg ref="userConfig"/>
//!   </bean>
//! </beans>
//! ```
//!
//! 每个 `<bean>` 以其 `id` 作为配置节名称，带 `value` 的 `<property>` 成为节内的字符串项。
//! 引用（`ref`）不进入配置树，而是作为 [`BeanDefinition`] 保留给装配阶段使用。

use crate::providers::{read_config_file, ValueTree, FILE_PROVIDER_PRIORITY};
use async_trait::async_trait;
use config_abstractions::{ConfigProvider, FileConfigProvider};
use infrastructure_common::{ConfigError, ConfigSection};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Bean 文档结构错误
#[derive(Error, Debug)]
pub enum BeanDocumentError {
    #[error("Bean id 重复: {id}")]
    DuplicateBeanId { id: String },

    #[error("Bean id 不能为空")]
    EmptyBeanId,

    #[error("属性缺少 value 或 ref: {bean}.{property}")]
    MissingPropertyValue { bean: String, property: String },

    #[error("属性同时指定了 value 和 ref: {bean}.{property}")]
    AmbiguousPropertyValue { bean: String, property: String },

    #[error("构造参数缺少 value 或 ref: {bean}[{position}]")]
    MissingConstructorValue { bean: String, position: usize },
}

/// Bean 属性或构造参数的取值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeanValue {
    /// 字面值
    Literal(String),
    /// 对其他 Bean 的引用
    Reference(String),
}

impl BeanValue {
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Self::Reference(id) => Some(id),
            Self::Literal(_) => None,
        }
    }
}

/// Bean 属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyValue {
    pub name: String,
    pub value: BeanValue,
}

/// Bean 构造参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorArg {
    pub index: Option<usize>,
    pub name: Option<String>,
    pub value: BeanValue,
}

/// Bean 定义
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeanDefinition {
    pub id: String,
    pub class: Option<String>,
    pub properties: Vec<PropertyValue>,
    pub constructor_args: Vec<ConstructorArg>,
}

impl BeanDefinition {
    /// 所有构造参数中引用的 Bean id，按声明顺序
    pub fn constructor_refs(&self) -> impl Iterator<Item = &str> {
        self.constructor_args
            .iter()
            .filter_map(|arg| arg.value.as_reference())
    }

    /// 指定属性的取值
    pub fn property(&self, name: &str) -> Option<&BeanValue> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

#[derive(Debug, Deserialize)]
struct BeansElement {
    #[serde(rename = "bean", default)]
    beans: Vec<BeanElement>,
}

#[derive(Debug, Deserialize)]
struct BeanElement {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@class", default)]
    class: Option<String>,
    #[serde(rename = "property", default)]
    properties: Vec<PropertyElement>,
    #[serde(rename = "constructor-arg", default)]
    constructor_args: Vec<ConstructorArgElement>,
}

#[derive(Debug, Deserialize)]
struct PropertyElement {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@value", default)]
    value: Option<String>,
    #[serde(rename = "@ref", default)]
    reference: Option<String>,
    /// `<property name="x"><value>..</value></property>` 形式
    #[serde(rename = "value", default)]
    value_element: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConstructorArgElement {
    #[serde(rename = "@index", default)]
    index: Option<usize>,
    #[serde(rename = "@name", default)]
    name: Option<String>,
    #[serde(rename = "@value", default)]
    value: Option<String>,
    #[serde(rename = "@ref", default)]
    reference: Option<String>,
}

fn bean_value(value: Option<String>, reference: Option<String>) -> Option<Result<BeanValue, ()>> {
    match (value, reference) {
        (Some(value), None) => Some(Ok(BeanValue::Literal(value))),
        (None, Some(reference)) => Some(Ok(BeanValue::Reference(reference))),
        (Some(_), Some(_)) => Some(Err(())),
        (None, None) => None,
    }
}

/// 解析 Bean 定义文档
pub fn parse_bean_document(content: &str) -> Result<Vec<BeanDefinition>, ConfigError> {
    let document: BeansElement =
        quick_xml::de::from_str(content).map_err(|e| ConfigError::parse_error("<beans>", e))?;

    let mut seen = HashSet::new();
    let mut definitions = Vec::with_capacity(document.beans.len());

    for bean in document.beans {
        let id = bean.id.trim().to_string();
        if id.is_empty() {
            return Err(ConfigError::parse_error("<beans>", BeanDocumentError::EmptyBeanId));
        }
        if !seen.insert(id.clone()) {
            return Err(ConfigError::parse_error(
                "<beans>",
                BeanDocumentError::DuplicateBeanId { id },
            ));
        }

        let mut properties = Vec::with_capacity(bean.properties.len());
        for property in bean.properties {
            let literal = property.value.or(property.value_element);
            let value = match bean_value(literal, property.reference) {
                Some(Ok(value)) => value,
                Some(Err(())) => {
                    return Err(ConfigError::parse_error(
                        "<beans>",
                        BeanDocumentError::AmbiguousPropertyValue {
                            bean: id,
                            property: property.name,
                        },
                    ))
                }
                None => {
                    return Err(ConfigError::parse_error(
                        "<beans>",
                        BeanDocumentError::MissingPropertyValue {
                            bean: id,
                            property: property.name,
                        },
                    ))
                }
            };
            properties.push(PropertyValue {
                name: property.name,
                value,
            });
        }

        let mut constructor_args = Vec::with_capacity(bean.constructor_args.len());
        for (position, arg) in bean.constructor_args.into_iter().enumerate() {
            let value = match bean_value(arg.value, arg.reference) {
                Some(Ok(value)) => value,
                _ => {
                    return Err(ConfigError::parse_error(
                        "<beans>",
                        BeanDocumentError::MissingConstructorValue { bean: id, position },
                    ))
                }
            };
            constructor_args.push(ConstructorArg {
                index: arg.index,
                name: arg.name,
                value,
            });
        }

        definitions.push(BeanDefinition {
            id,
            class: bean.class,
            properties,
            constructor_args,
        });
    }

    Ok(definitions)
}

/// 将 Bean 定义中的字面属性转换为配置树
fn definitions_to_tree(definitions: &[BeanDefinition]) -> ValueTree {
    let root: Map<String, Value> = definitions
        .iter()
        .map(|definition| {
            let section: Map<String, Value> = definition
                .properties
                .iter()
                .filter_map(|property| match &property.value {
                    BeanValue::Literal(value) => {
                        Some((property.name.clone(), Value::String(value.clone())))
                    }
                    BeanValue::Reference(_) => None,
                })
                .collect();
            (definition.id.clone(), Value::Object(section))
        })
        .collect();

    ValueTree::new(Value::Object(root))
}

/// XML Bean 文档配置提供者
#[derive(Debug)]
pub struct XmlConfigProvider {
    file_path: PathBuf,
    definitions: Vec<BeanDefinition>,
    tree: ValueTree,
    priority: i32,
}

impl XmlConfigProvider {
    /// 创建新的 XML 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut provider = Self {
            file_path: path.as_ref().to_path_buf(),
            definitions: Vec::new(),
            tree: ValueTree::default(),
            priority: FILE_PROVIDER_PRIORITY,
        };

        provider.load_config()?;
        Ok(provider)
    }

    /// 文档中声明的所有 Bean 定义
    pub fn bean_definitions(&self) -> &[BeanDefinition] {
        &self.definitions
    }

    pub fn bean_definition(&self, id: &str) -> Option<&BeanDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    fn load_config(&mut self) -> Result<(), ConfigError> {
        debug!("加载 XML Bean 文档: {}", self.file_path.display());

        let content = read_config_file(&self.file_path)?;
        let definitions = parse_bean_document(&content).map_err(|e| match e {
            ConfigError::ParseError { source, .. } => ConfigError::ParseError {
                path: self.file_path.display().to_string(),
                source,
            },
            other => other,
        })?;

        self.tree = definitions_to_tree(&definitions);
        self.definitions = definitions;

        debug!("XML Bean 文档加载完成，共 {} 个 Bean", self.definitions.len());
        Ok(())
    }
}

#[async_trait]
impl ConfigProvider for XmlConfigProvider {
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
        "XmlConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FileConfigProvider for XmlConfigProvider {
    fn file_path(&self) -> &Path {
        &self.file_path
    }
}
