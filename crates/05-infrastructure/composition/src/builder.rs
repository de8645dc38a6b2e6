//! 应用上下文构建器

use crate::context::ApplicationContext;
use config_abstractions::{ConfigManager, ConfigProvider, FileConfigProvider};
use config_impl::{
    BeanDefinition, ConfigFormat, EnvironmentConfigProviderImpl, JsonConfigProvider,
    LayeredConfigManager, TomlConfigProvider, XmlConfigProvider,
};
use di_impl::DiContainerImpl;
use infrastructure_common::InfrastructureError;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 应用上下文构建器
///
/// 使用建造者模式组装配置源和日志，构建 [`ApplicationContext`]
pub struct ApplicationContextBuilder {
    /// 配置源列表
    config_sources: Vec<Box<dyn ConfigProvider>>,
    /// XML 文档中声明的 Bean 定义
    bean_definitions: Vec<BeanDefinition>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ApplicationContextBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            config_sources: Vec::new(),
            bean_definitions: Vec::new(),
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 添加配置文件，格式由扩展名决定
    pub fn add_config_file<P: AsRef<Path>>(self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => self.add_config_toml(path),
            ConfigFormat::Json => self.add_config_json(path),
            ConfigFormat::Xml => self.add_config_xml(path),
        }
    }

    fn push_file_provider<T: FileConfigProvider + 'static>(&mut self, provider: T) {
        info!(
            "添加配置文件: {} ({})",
            provider.file_path().display(),
            provider.name()
        );
        self.config_sources.push(Box::new(provider));
    }

    /// 添加 TOML 配置文件
    pub fn add_config_toml<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let provider = TomlConfigProvider::new(path)?;
        self.push_file_provider(provider);
        Ok(self)
    }

    /// 添加 JSON 配置文件
    pub fn add_config_json<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let provider = JsonConfigProvider::new(path)?;
        self.push_file_provider(provider);
        Ok(self)
    }

    /// 添加 XML Bean 文档
    ///
    /// 文档中的 Bean 定义会保留在上下文中；与先前文档 id 相同的定义被替换。
    pub fn add_config_xml<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let provider = XmlConfigProvider::new(path)?;
        for definition in provider.bean_definitions() {
            self.bean_definitions.retain(|d| d.id != definition.id);
            self.bean_definitions.push(definition.clone());
        }
        self.push_file_provider(provider);
        Ok(self)
    }

    /// 添加环境变量配置源
    pub fn add_config_env_vars<S: Into<String>>(
        mut self,
        prefix: S,
    ) -> Result<Self, InfrastructureError> {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);

        let provider = EnvironmentConfigProviderImpl::new(prefix)?;
        self.config_sources.push(Box::new(provider));
        Ok(self)
    }

    /// 添加自定义配置提供者
    pub fn add_config_provider<T: ConfigProvider + 'static>(mut self, provider: T) -> Self {
        info!("添加自定义配置提供者: {}", provider.name());
        self.config_sources.push(Box::new(provider));
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 构建应用上下文
    pub async fn build(self) -> Result<ApplicationContext, InfrastructureError> {
        // 只有在明确配置了日志时才初始化日志
        if self.logging_enabled {
            self.logging_config.init();
        }

        info!("开始构建应用上下文");

        let mut config_manager = LayeredConfigManager::new();
        for provider in self.config_sources {
            config_manager.register_provider(provider).await?;
        }

        let context = ApplicationContext::new(
            config_manager,
            DiContainerImpl::new(),
            self.bean_definitions,
        );

        info!("应用上下文构建完成: {}", context.id());
        Ok(context)
    }
}

impl Default for ApplicationContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 存在时以其为准
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示文件名和行号
    pub show_location: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_location: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_json_format(mut self, json_format: bool) -> Self {
        self.json_format = json_format;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()))
    }

    /// 初始化全局日志订阅者，日志输出到 stderr
    ///
    /// 订阅者已存在时（例如同一进程内多次构建上下文）保持原有订阅者。
    pub fn init(&self) {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_writer(std::io::stderr)
            .with_target(self.show_target)
            .with_file(self.show_location)
            .with_line_number(self.show_location);

        let result = if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        };

        match result {
            Ok(()) => debug!("日志系统初始化完成"),
            Err(e) => debug!("日志系统已初始化，跳过: {}", e),
        }
    }
}
