//! 应用启动与组件装配

use crate::bean::{SharedUserConfig, UserConfig};
use crate::cli::Cli;
use crate::service::UserService;
use infrastructure_common::{ConfigurationProperties, DependencyError, InfrastructureError, Lifetime};
use infrastructure_composition::ApplicationContext;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

/// 用户服务在容器中的名称
pub const USER_SERVICE_BEAN: &str = "userService";

/// 用户服务依赖的配置 Bean 名称
///
/// Bean 文档中 `userService` 声明了构造参数引用时以引用为准，否则使用默认名称。
pub fn user_config_bean_name(context: &ApplicationContext) -> String {
    context
        .bean_definition(USER_SERVICE_BEAN)
        .and_then(|definition| definition.constructor_refs().next())
        .unwrap_or(UserConfig::config_path())
        .to_string()
}

/// 构建并启动应用上下文
pub async fn start_context(cli: &Cli) -> Result<ApplicationContext, InfrastructureError> {
    let mut builder = ApplicationContext::builder()
        .with_logging(cli.logging_config())
        .add_config_file(&cli.config)?;

    if !cli.no_env {
        builder = builder.add_config_env_vars(cli.env_prefix.clone())?;
    }

    let context = builder.build().await?;
    context.start().await?;
    Ok(context)
}

/// 绑定用户配置并注册用户服务
///
/// 上下文必须处于运行状态。返回注入到服务中的配置句柄。
pub async fn wire_components(
    context: &ApplicationContext,
) -> Result<SharedUserConfig, InfrastructureError> {
    let config_bean = user_config_bean_name(context);
    debug!("用户服务依赖配置 Bean: {}", config_bean);

    if context.bean_definition(USER_SERVICE_BEAN).is_some()
        && context.bean_definition(&config_bean).is_none()
    {
        return Err(InfrastructureError::BootstrapFailed {
            message: format!("{} 引用了未声明的 Bean: {}", USER_SERVICE_BEAN, config_bean),
        });
    }

    let user_config: UserConfig = context.bind_configuration(&config_bean).await?;
    info!(
        "用户配置已加载: name={}, className={}",
        user_config.name, user_config.class_name
    );

    context
        .register_named(&config_bean, user_config.into_shared())
        .await?;

    let injected: SharedUserConfig = context
        .get_component::<RwLock<UserConfig>>(&config_bean)
        .await?;

    let service_config = injected.clone();
    context
        .register_factory(
            USER_SERVICE_BEAN,
            move || Ok::<_, DependencyError>(UserService::new(service_config.clone())),
            Lifetime::Singleton,
        )
        .await?;

    info!("组件装配完成: {} -> {}", USER_SERVICE_BEAN, config_bean);
    Ok(injected)
}

/// 在已启动的上下文中装配并打印指定服务，结束后无论成败都停止上下文
pub async fn run_in_context(context: &ApplicationContext, bean: &str) -> anyhow::Result<()> {
    let outcome = print_service(context, bean).await;

    if let Err(e) = &outcome {
        warn!("运行失败，停止应用上下文: {}", e);
    }
    let stopped = context.stop().await;

    outcome?;
    stopped?;
    Ok(())
}

async fn print_service(context: &ApplicationContext, bean: &str) -> Result<(), InfrastructureError> {
    wire_components(context).await?;

    let service = context.get_component::<UserService>(bean).await?;
    service.print_user_details();
    Ok(())
}

/// 完整运行流程：启动、装配、打印、停止
pub async fn run(cli: &Cli) -> anyhow::Result<()> {
    let context = start_context(cli).await?;
    run_in_context(&context, &cli.bean).await
}
