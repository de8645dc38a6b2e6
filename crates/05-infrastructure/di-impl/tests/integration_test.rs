//! 依赖注入实现的集成测试

use di_abstractions::ComponentRegistry;
use di_impl::DiContainerImpl;
use infrastructure_common::{Component, DependencyError, Lifetime};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 测试组件
#[derive(Debug)]
struct GreetingService {
    greeting: String,
}

impl Component for GreetingService {
    fn name(&self) -> &'static str {
        "greetingService"
    }
}

impl GreetingService {
    fn new(greeting: &str) -> Self {
        Self {
            greeting: greeting.to_string(),
        }
    }
}

#[tokio::test]
async fn test_instance_registration_and_named_lookup() {
    let mut container = DiContainerImpl::new();

    container
        .register_instance(GreetingService::new("hello"))
        .await
        .unwrap();

    assert!(container.is_registered::<GreetingService>());
    assert!(container.is_registered_by_name("greetingService"));

    let by_name = container
        .resolve_named::<GreetingService>("greetingService")
        .await
        .unwrap();
    let by_type = container.resolve::<GreetingService>().await.unwrap();

    assert_eq!(by_name.greeting, "hello");
    assert!(Arc::ptr_eq(&by_name, &by_type));
}

#[tokio::test]
async fn test_named_instance_is_shared_not_copied() {
    let mut container = DiContainerImpl::new();
    let shared = Arc::new(support::SharedLabel::new("before"));

    container
        .register_named("cell", shared.clone())
        .await
        .unwrap();

    shared.set("after");
    let resolved = container
        .resolve_named::<support::SharedLabel>("cell")
        .await
        .unwrap();

    assert_eq!(resolved.get(), "after");
}

#[tokio::test]
async fn test_singleton_factory_is_created_once_and_lazily() {
    let mut container = DiContainerImpl::new();
    let created = Arc::new(AtomicUsize::new(0));
    let counter = created.clone();

    container
        .register_factory(
            "greetingService",
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(GreetingService::new("from factory"))
            },
            Lifetime::Singleton,
        )
        .await
        .unwrap();

    assert_eq!(created.load(Ordering::SeqCst), 0);

    let first = container
        .resolve_named::<GreetingService>("greetingService")
        .await
        .unwrap();
    let second = container
        .resolve_named::<GreetingService>("greetingService")
        .await
        .unwrap();

    assert_eq!(first.greeting, "from factory");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transient_factory_creates_new_instances() {
    let mut container = DiContainerImpl::new();

    container
        .register_factory(
            "greetingService",
            || Ok(GreetingService::new("fresh")),
            Lifetime::Transient,
        )
        .await
        .unwrap();

    let first = container.resolve::<GreetingService>().await.unwrap();
    let second = container.resolve::<GreetingService>().await.unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_factory_error_is_propagated() {
    let mut container = DiContainerImpl::new();

    container
        .register_factory::<GreetingService, _>(
            "broken",
            || {
                Err(DependencyError::ComponentCreationFailed {
                    type_name: "GreetingService".to_string(),
                    source: Box::new(std::io::Error::new(std::io::ErrorKind::Other, "boom")),
                })
            },
            Lifetime::Singleton,
        )
        .await
        .unwrap();

    let result = container.resolve_named::<GreetingService>("broken").await;
    assert!(matches!(
        result,
        Err(DependencyError::ComponentCreationFailed { .. })
    ));
    // 创建失败的单例不会被缓存
    assert!(container.resolve_named::<GreetingService>("broken").await.is_err());
}

#[tokio::test]
async fn test_lookup_errors() {
    let mut container = DiContainerImpl::new();
    container
        .register_instance(GreetingService::new("hello"))
        .await
        .unwrap();

    let missing = container.resolve_named::<GreetingService>("nope").await;
    assert!(matches!(
        missing,
        Err(DependencyError::ComponentNotRegistered { .. })
    ));

    let wrong_type = container.resolve_named::<String>("greetingService").await;
    assert!(matches!(wrong_type, Err(DependencyError::TypeMismatch { .. })));

    let duplicate = container
        .register_instance(GreetingService::new("again"))
        .await;
    assert!(matches!(
        duplicate,
        Err(DependencyError::DuplicateRegistration { .. })
    ));
}

#[tokio::test]
async fn test_ambiguous_type_lookup() {
    let mut container = DiContainerImpl::new();
    container
        .register_named("first", Arc::new(GreetingService::new("a")))
        .await
        .unwrap();
    container
        .register_named("second", Arc::new(GreetingService::new("b")))
        .await
        .unwrap();

    match container.resolve::<GreetingService>().await {
        Err(DependencyError::AmbiguousComponent { candidates, .. }) => {
            assert_eq!(candidates, vec!["first", "second"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[tokio::test]
async fn test_container_clear() {
    let mut container = DiContainerImpl::new();
    container
        .register_instance(GreetingService::new("hello"))
        .await
        .unwrap();

    let components = container.get_registered_components();
    assert_eq!(components.len(), 1);
    assert_eq!(components[0].name, "greetingService");
    assert_eq!(components[0].short_type_name(), "GreetingService");

    container.clear().await.unwrap();

    assert!(!container.is_registered::<GreetingService>());
    assert!(container.get_registered_components().is_empty());
}

/// 可在共享后修改的标签
mod support {
    use std::sync::Mutex;

    #[derive(Debug)]
    pub struct SharedLabel(Mutex<&'static str>);

    impl SharedLabel {
        pub fn new(value: &'static str) -> Self {
            Self(Mutex::new(value))
        }

        pub fn set(&self, value: &'static str) {
            *self.0.lock().unwrap() = value;
        }

        pub fn get(&self) -> &'static str {
            *self.0.lock().unwrap()
        }
    }
}
