//! 服务容器集成测试：对象构建器契约
use di_abstractions::{build_as, ObjectBuilder};
use di_impl::ServiceContainer;
use infrastructure_common::{DependencyError, TypeKey};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static INIT_LOGGER: Once = Once::new();

fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

/// 测试组件
#[derive(Debug)]
struct Settings {
    greeting: String,
}

#[derive(Debug)]
struct Session {
    id: usize,
}

#[derive(Debug)]
struct GreetingService {
    settings: Arc<Settings>,
    session: Arc<Session>,
}

impl GreetingService {
    fn greet(&self, name: &str) -> String {
        format!("{}, {} (#{})", self.settings.greeting, name, self.session.id)
    }
}

fn container(sessions: Arc<AtomicUsize>) -> ServiceContainer {
    ServiceContainer::builder()
        .register_instance(Settings {
            greeting: "你好".to_string(),
        })
        .register_transient::<Session, _>(move |_| {
            Ok(Session {
                id: sessions.fetch_add(1, Ordering::SeqCst),
            })
        })
        .register_transient::<GreetingService, _>(|resolver| {
            Ok(GreetingService {
                settings: resolver.resolve::<Settings>()?,
                session: resolver.resolve::<Session>()?,
            })
        })
        .build()
}

#[test]
fn test_build_produces_fresh_instances_with_resolved_dependencies() -> anyhow::Result<()> {
    init_test_logger();
    let sessions = Arc::new(AtomicUsize::new(0));
    let container = container(sessions.clone());

    let first = build_as::<GreetingService>(&container)?;
    let second = build_as::<GreetingService>(&container)?;

    assert_eq!(first.greet("Lorn"), "你好, Lorn (#0)");
    assert_eq!(second.greet("Lorn"), "你好, Lorn (#1)");
    // 实例注册的依赖在两次构建之间共享
    assert!(Arc::ptr_eq(&first.settings, &second.settings));
    assert_eq!(sessions.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_instance_registration_resolves_but_cannot_be_built() {
    init_test_logger();
    let container = container(Arc::new(AtomicUsize::new(0)));

    assert!(container.resolve::<Settings>().is_ok());
    assert!(container.can_build(&TypeKey::of::<Settings>()));

    let error = container.build(&TypeKey::of::<Settings>()).unwrap_err();
    assert!(matches!(error, DependencyError::ComponentCreationFailed { .. }));
}

#[test]
fn test_unregistered_type_reports_not_registered() {
    init_test_logger();
    let container = ServiceContainer::builder().build();

    assert!(!container.can_build(&TypeKey::of::<Session>()));
    let error = container.build(&TypeKey::of::<Session>()).unwrap_err();
    assert!(matches!(error, DependencyError::ComponentNotRegistered { .. }));
}

#[test]
fn test_missing_dependency_fails_the_whole_build() {
    init_test_logger();
    let container = ServiceContainer::builder()
        .register_transient::<GreetingService, _>(|resolver| {
            Ok(GreetingService {
                settings: resolver.resolve::<Settings>()?,
                session: resolver.resolve::<Session>()?,
            })
        })
        .build();

    let error = container
        .build(&TypeKey::of::<GreetingService>())
        .unwrap_err();
    assert!(error.to_string().contains("Settings"));
}

struct Left(#[allow(dead_code)] Arc<Right>);
struct Right(#[allow(dead_code)] Arc<Left>);

#[test]
fn test_circular_dependency_is_detected() {
    init_test_logger();
    let container = ServiceContainer::builder()
        .register_transient::<Left, _>(|resolver| Ok(Left(resolver.resolve::<Right>()?)))
        .register_transient::<Right, _>(|resolver| Ok(Right(resolver.resolve::<Left>()?)))
        .build();

    let error = container.build(&TypeKey::of::<Left>()).unwrap_err();
    assert!(matches!(error, DependencyError::CircularDependency { .. }));
}

#[test]
fn test_resolution_depth_limit() {
    init_test_logger();
    let container = ServiceContainer::builder()
        .max_resolution_depth(1)
        .register_instance(Settings {
            greeting: "hi".to_string(),
        })
        .register_transient::<Session, _>(|resolver| {
            resolver.resolve::<Settings>()?;
            Ok(Session { id: 7 })
        })
        .build();

    // 实例注册的依赖直接命中缓存，不增加深度
    assert_eq!(build_as::<Session>(&container).unwrap().id, 7);

    let nested = ServiceContainer::builder()
        .max_resolution_depth(1)
        .register_transient::<Session, _>(|_| Ok(Session { id: 1 }))
        .register_transient::<GreetingService, _>(|resolver| {
            Ok(GreetingService {
                settings: Arc::new(Settings {
                    greeting: String::new(),
                }),
                session: resolver.resolve::<Session>()?,
            })
        })
        .build();

    let error = nested
        .build(&TypeKey::of::<GreetingService>())
        .unwrap_err();
    assert!(matches!(error, DependencyError::ResolutionDepthExceeded { .. }));
}

#[test]
fn test_builder_is_shareable_across_threads() {
    init_test_logger();
    let sessions = Arc::new(AtomicUsize::new(0));
    let container = Arc::new(container(sessions.clone()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let container = container.clone();
            std::thread::spawn(move || {
                let builder: &dyn ObjectBuilder = &*container;
                builder.build(&TypeKey::of::<Session>()).is_ok()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(sessions.load(Ordering::SeqCst), 4);
}

#[derive(Debug, Default)]
struct Counter {
    value: u32,
}

#[test]
fn test_default_registration_and_introspection() {
    init_test_logger();
    let container = ServiceContainer::builder()
        .register_default::<Counter>()
        .register_transient::<Session, _>(|_| Ok(Session { id: 3 }))
        .build();

    assert!(container.is_registered::<Counter>());
    assert!(!container.is_registered::<Settings>());
    assert_eq!(container.len(), 2);
    assert_eq!(
        container.registered_types(),
        vec![TypeKey::of::<Counter>(), TypeKey::of::<Session>()]
    );

    let counter = build_as::<Counter>(&container).unwrap();
    assert_eq!(counter.value, 0);
}
