//! 分层配置管理器测试

use super::super::*;
use config_abstractions::{ConfigManager, TypedConfigBinder};
use infrastructure_common::{ConfigError, ConfigurationProperties};
use serde::Deserialize;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Profile {
    name: String,
    class_name: String,
}

impl ConfigurationProperties for Profile {
    fn config_path() -> &'static str {
        "userConfig"
    }
}

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// 测试环境变量覆盖文件配置
#[tokio::test]
async fn test_environment_overrides_file_values() {
    let file = write_temp(".toml", "[userConfig]\nname = \"Alice\"\nclassName = \"10A\"\n");

    let mut manager = LayeredConfigManager::new();
    manager
        .register_provider(Box::new(EnvironmentConfigProviderImpl::from_vars(
            "APP",
            vec![("APP_USERCONFIG_CLASSNAME", "11B")],
        )))
        .await
        .unwrap();
    manager
        .register_provider(Box::new(TomlConfigProvider::new(file.path()).unwrap()))
        .await
        .unwrap();

    assert_eq!(
        manager.provider_names(),
        vec!["EnvironmentConfigProvider", "TomlConfigProvider"]
    );

    let profile: Profile = manager.bind_properties().await.unwrap();
    assert_eq!(
        profile,
        Profile {
            name: "Alice".to_string(),
            class_name: "11B".to_string(),
        }
    );
}

/// 测试提高文件优先级后文件覆盖环境变量
#[tokio::test]
async fn test_raised_file_priority_beats_environment() {
    let file = write_temp(".toml", "[userConfig]\nname = \"Alice\"\nclassName = \"10A\"\n");

    let mut manager = LayeredConfigManager::new();
    manager
        .register_provider(Box::new(EnvironmentConfigProviderImpl::from_vars(
            "APP",
            vec![("APP_USERCONFIG_CLASSNAME", "11B")],
        )))
        .await
        .unwrap();
    manager
        .register_provider(Box::new(
            TomlConfigProvider::new(file.path())
                .unwrap()
                .with_priority(ENV_PROVIDER_PRIORITY + 1),
        ))
        .await
        .unwrap();

    assert_eq!(manager.provider_count(), 2);
    assert_eq!(
        manager.provider_names(),
        vec!["TomlConfigProvider", "EnvironmentConfigProvider"]
    );

    let profile: Profile = manager.bind_properties().await.unwrap();
    assert_eq!(profile.class_name, "10A");
}

/// 测试同优先级时后注册的提供者覆盖先注册的
#[tokio::test]
async fn test_later_provider_wins_on_equal_priority() {
    let first = write_temp(".json", r#"{"userConfig": {"name": "Alice", "className": "10A"}}"#);
    let second = write_temp(".json", r#"{"userConfig": {"name": "Carol"}}"#);

    let mut manager = LayeredConfigManager::new();
    manager
        .register_provider(Box::new(JsonConfigProvider::new(first.path()).unwrap()))
        .await
        .unwrap();
    manager
        .register_provider(Box::new(JsonConfigProvider::new(second.path()).unwrap()))
        .await
        .unwrap();

    let profile: Profile = manager.bind_configuration("userConfig").await.unwrap();
    assert_eq!(profile.name, "Carol");
    assert_eq!(profile.class_name, "10A");
    assert_eq!(
        manager.get_configuration("userConfig.className").await.unwrap(),
        json!("10A")
    );
}

/// 测试缺失字段时绑定失败
#[tokio::test]
async fn test_missing_field_fails_binding() {
    let file = write_temp(
        ".xml",
        r#"<beans><bean id="userConfig"><property name="name" value="Alice"/></bean></beans>"#,
    );

    let mut manager = LayeredConfigManager::new();
    manager
        .register_provider(Box::new(XmlConfigProvider::new(file.path()).unwrap()))
        .await
        .unwrap();

    let result = manager.bind_properties::<Profile>().await;
    match result {
        Err(ConfigError::BindError { path, message, .. }) => {
            assert_eq!(path, "userConfig");
            assert!(message.contains("className"), "unexpected message: {message}");
        }
        other => panic!("expected bind error, got {other:?}"),
    }
}

/// 测试不存在的配置节
#[tokio::test]
async fn test_missing_section_is_key_not_found() {
    let mut manager = LayeredConfigManager::new();

    assert!(matches!(
        manager.get_section("userConfig").await,
        Err(ConfigError::KeyNotFound { .. })
    ));
    assert!(matches!(
        manager.unregister_provider("nope").await,
        Err(ConfigError::KeyNotFound { .. })
    ));
}

/// 测试重新加载读取文件的最新内容
#[tokio::test]
async fn test_reload_all_picks_up_changes() {
    let file = write_temp(".toml", "[userConfig]\nname = \"Alice\"\nclassName = \"10A\"\n");

    let mut manager = LayeredConfigManager::new();
    manager
        .register_provider(Box::new(TomlConfigProvider::new(file.path()).unwrap()))
        .await
        .unwrap();

    std::fs::write(file.path(), "[userConfig]\nname = \"Dave\"\nclassName = \"12C\"\n").unwrap();
    manager.reload_all().await.unwrap();

    let profile: Profile = manager.bind_properties().await.unwrap();
    assert_eq!(profile.name, "Dave");
    assert_eq!(profile.class_name, "12C");
}
