//! 用户信息控制台端到端测试

use infrastructure_common::{ConfigError, DependencyError, InfrastructureError};
use infrastructure_composition::ContextStatus;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;
use user_console::{start_context, wire_components, Cli, UserService, USER_SERVICE_BEAN};

fn shipped_config(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../config")
        .join(file)
}

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn isolated_cli(path: impl Into<PathBuf>) -> Cli {
    let mut cli = Cli::with_config(path);
    cli.no_env = true;
    cli
}

async fn render_details(cli: &Cli) -> anyhow::Result<String> {
    let context = start_context(cli).await?;
    wire_components(&context).await?;

    let service = context.get_component::<UserService>(&cli.bean).await?;
    let mut out = Vec::new();
    service.write_user_details(&mut out)?;

    context.stop().await?;
    Ok(String::from_utf8(out)?)
}

/// 测试随仓库发布的 XML 和 TOML 配置
#[tokio::test]
async fn test_shipped_configs_print_alice() {
    for file in ["applicationContext.xml", "application.toml"] {
        let output = render_details(&isolated_cli(shipped_config(file)))
            .await
            .unwrap();
        assert_eq!(output, "Name: Alice\nClass: 10A\n", "配置文件: {}", file);
    }
}

/// 测试 JSON 配置
#[tokio::test]
async fn test_json_config() {
    let file = write_temp(
        ".json",
        r#"{"userConfig": {"name": "Carol", "className": "9C"}}"#,
    );

    let output = render_details(&isolated_cli(file.path())).await.unwrap();
    assert_eq!(output, "Name: Carol\nClass: 9C\n");
}

/// 测试空字符串字段照常输出
#[tokio::test]
async fn test_empty_values_print_bare_labels() {
    let file = write_temp(
        ".xml",
        r#"<beans>
            <bean id="userConfig" class="UserConfig">
                <property name="name" value=""/>
                <property name="className" value=""/>
            </bean>
        </beans>"#,
    );

    let output = render_details(&isolated_cli(file.path())).await.unwrap();
    assert_eq!(output, "Name: \nClass: \n");
}

/// 测试缺少字段时启动失败
#[tokio::test]
async fn test_missing_field_fails_wiring() {
    let file = write_temp(
        ".xml",
        r#"<beans><bean id="userConfig"><property name="name" value="Alice"/></bean></beans>"#,
    );

    let context = start_context(&isolated_cli(file.path())).await.unwrap();
    let result = wire_components(&context).await;

    assert!(matches!(
        result,
        Err(InfrastructureError::ConfigError {
            source: ConfigError::BindError { .. }
        })
    ));
    assert!(!context.contains_component(USER_SERVICE_BEAN).await);
}

/// 测试配置文件不存在时启动失败
#[tokio::test]
async fn test_missing_config_file_fails() {
    let result = user_console::run(&isolated_cli("/no/such/applicationContext.xml")).await;
    assert!(result.is_err());
}

/// 测试环境变量覆盖文件中的值
#[tokio::test]
async fn test_environment_overrides_document() {
    std::env::set_var("UCIT_OVERRIDE_USERCONFIG_CLASSNAME", "12C");

    let mut cli = Cli::with_config(shipped_config("applicationContext.xml"));
    cli.env_prefix = "UCIT_OVERRIDE".to_string();

    let output = render_details(&cli).await.unwrap();
    assert_eq!(output, "Name: Alice\nClass: 12C\n");
}

/// 测试构造参数引用决定注入哪个配置 Bean
#[tokio::test]
async fn test_constructor_ref_selects_config_bean() {
    let file = write_temp(
        ".xml",
        r#"<beans>
            <bean id="studentConfig" class="UserConfig">
                <property name="name" value="Dave"/>
                <property name="className" value="8D"/>
            </bean>
            <bean id="userService" class="UserService">
                <constructor-arg ref="studentConfig"/>
            </bean>
        </beans>"#,
    );

    let context = start_context(&isolated_cli(file.path())).await.unwrap();
    assert_eq!(user_console::user_config_bean_name(&context), "studentConfig");

    wire_components(&context).await.unwrap();
    assert!(context.contains_component("studentConfig").await);
    assert!(!context.contains_component("userConfig").await);
}

/// 测试带点号的 Bean id 可以被引用和绑定
#[tokio::test]
async fn test_dotted_bean_id_is_resolved() {
    let file = write_temp(
        ".xml",
        r#"<beans>
            <bean id="com.demo.userConfig" class="com.demo.bean.UserConfig">
                <property name="name" value="Frank"/>
                <property name="className" value="7F"/>
            </bean>
            <bean id="userService" class="com.demo.service.UserService">
                <constructor-arg ref="com.demo.userConfig"/>
            </bean>
        </beans>"#,
    );

    let output = render_details(&isolated_cli(file.path())).await.unwrap();
    assert_eq!(output, "Name: Frank\nClass: 7F\n");
}

/// 测试引用不存在的 Bean 时启动失败
#[tokio::test]
async fn test_dangling_reference_fails() {
    let file = write_temp(
        ".xml",
        r#"<beans>
            <bean id="userService" class="UserService">
                <constructor-arg ref="ghostConfig"/>
            </bean>
        </beans>"#,
    );

    let context = start_context(&isolated_cli(file.path())).await.unwrap();
    assert!(matches!(
        wire_components(&context).await,
        Err(InfrastructureError::BootstrapFailed { .. })
    ));
}

/// 测试服务是单例，且持有配置的引用
#[tokio::test]
async fn test_service_is_singleton_sharing_config() {
    let context = start_context(&isolated_cli(shipped_config("applicationContext.xml")))
        .await
        .unwrap();
    let shared = wire_components(&context).await.unwrap();

    let first = context.get_component::<UserService>(USER_SERVICE_BEAN).await.unwrap();
    let second = context.get_component::<UserService>(USER_SERVICE_BEAN).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    shared.write().name = "Eve".to_string();

    let mut out = Vec::new();
    first.write_user_details(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Name: Eve\nClass: 10A\n");
}

/// 测试按错误名称或错误类型获取组件
#[tokio::test]
async fn test_lookup_errors() {
    let context = start_context(&isolated_cli(shipped_config("applicationContext.xml")))
        .await
        .unwrap();
    wire_components(&context).await.unwrap();

    assert!(matches!(
        context.get_component::<UserService>("adminService").await,
        Err(InfrastructureError::DependencyError {
            source: DependencyError::ComponentNotRegistered { .. }
        })
    ));
    assert!(matches!(
        context.get_component::<UserService>("userConfig").await,
        Err(InfrastructureError::DependencyError {
            source: DependencyError::TypeMismatch { .. }
        })
    ));

    let mut cli = isolated_cli(shipped_config("applicationContext.xml"));
    cli.bean = "adminService".to_string();
    assert!(user_console::run(&cli).await.is_err());
}

/// 测试获取服务失败时上下文仍被停止
#[tokio::test]
async fn test_failed_lookup_still_stops_context() {
    let context = start_context(&isolated_cli(shipped_config("applicationContext.xml")))
        .await
        .unwrap();

    let result = user_console::run_in_context(&context, "adminService").await;

    assert!(result.is_err());
    assert_eq!(context.status().await, ContextStatus::Stopped);
    assert!(context.component_names().await.is_empty());
}

/// 测试完整运行流程
#[tokio::test]
async fn test_run_completes() {
    user_console::run(&isolated_cli(shipped_config("applicationContext.xml")))
        .await
        .unwrap();
}
