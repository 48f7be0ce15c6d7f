//! 声明宏集成测试
//!
//! 声明在测试程序启动时提交到全局目录，再通过模块加载器端到端装配。

use di_impl::ServiceContainerBuilder;
use infrastructure_common::{LoadError, TypeKey};
use std::sync::Once;
use store_abstractions::{
    global_catalog, Action, DeclarationKind, Feature, MiddlewareType, ScanModule,
};
use store_composition::{InMemoryStore, ModuleLoaderBuilder, RegistrationKind};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok();
    });
}

const ROOT: ScanModule = ScanModule::new(module_path!());

mod counter {
    use store_abstractions::{Dispatcher, FeatureDefinition, Reducer, ScanModule};
    use store_macros::{handlers, reducer, store_feature};

    pub const MODULE: ScanModule = ScanModule::new(module_path!());

    #[derive(Debug, Clone, PartialEq)]
    pub struct CounterState {
        pub count: i32,
    }

    pub struct Increment;

    pub struct Reset;

    #[store_feature]
    pub struct CounterFeature;

    impl FeatureDefinition for CounterFeature {
        type State = CounterState;

        fn name(&self) -> &str {
            "Counter"
        }

        fn initial_state(&self) -> CounterState {
            CounterState { count: 0 }
        }
    }

    #[reducer]
    pub struct IncrementReducer;

    impl Reducer for IncrementReducer {
        type State = CounterState;

        fn reduce(
            &self,
            state: &CounterState,
            action: &store_abstractions::Action,
        ) -> Option<CounterState> {
            action.downcast_ref::<Increment>().map(|_| CounterState {
                count: state.count + 1,
            })
        }
    }

    pub struct CounterHandlers {
        pub reset_to: i32,
    }

    #[handlers]
    impl CounterHandlers {
        #[reduce]
        fn reset(&self, _state: &CounterState, _action: &Reset) -> CounterState {
            CounterState {
                count: self.reset_to,
            }
        }

        #[effect_method]
        fn announce(&self, _action: &Reset, dispatcher: &dyn Dispatcher) {
            dispatcher.dispatch(Box::new(Increment));
        }
    }
}

mod logging {
    use store_abstractions::{Action, Dispatcher, Effect, Middleware, ScanModule};
    use store_macros::{effect, middleware};

    pub const MODULE: ScanModule = ScanModule::new(module_path!());

    #[middleware(auto_load)]
    pub struct LoggingInterceptor;

    impl Middleware for LoggingInterceptor {}

    #[middleware]
    pub struct TracingInterceptor;

    impl Middleware for TracingInterceptor {}

    #[effect]
    pub struct AuditEffect;

    impl Effect for AuditEffect {
        fn handle(&self, _action: &Action, _dispatcher: &dyn Dispatcher) {}
    }
}

use counter::{CounterFeature, CounterHandlers, CounterState, Increment, IncrementReducer, Reset};
use logging::{AuditEffect, LoggingInterceptor, TracingInterceptor};

fn register_all(services: ServiceContainerBuilder) -> ServiceContainerBuilder {
    services
        .register_transient::<CounterFeature, _>(|_| Ok(CounterFeature))
        .register_transient::<IncrementReducer, _>(|_| Ok(IncrementReducer))
        .register_transient::<CounterHandlers, _>(|_| Ok(CounterHandlers { reset_to: 10 }))
        .register_transient::<AuditEffect, _>(|_| Ok(AuditEffect))
        .register_transient::<LoggingInterceptor, _>(|_| Ok(LoggingInterceptor))
        .register_transient::<TracingInterceptor, _>(|_| Ok(TracingInterceptor))
}

/// 测试标记宏在启动时把声明提交到全局目录
#[test]
fn test_markers_submit_declarations_at_startup() {
    let declarations: Vec<_> = global_catalog()
        .snapshot()
        .into_iter()
        .filter(|declaration| counter::MODULE.contains(declaration.module_path()))
        .collect();

    assert_eq!(declarations.len(), 4);
    assert!(declarations.iter().any(|declaration| matches!(
        declaration.kind(),
        DeclarationKind::Feature(feature) if feature.implementing_type() == TypeKey::of::<CounterFeature>()
    )));
    assert!(declarations
        .iter()
        .any(|declaration| declaration.method_name() == "reset"));
    assert!(declarations
        .iter()
        .any(|declaration| declaration.method_name() == "announce"));

    let middlewares: Vec<bool> = global_catalog()
        .snapshot()
        .into_iter()
        .filter_map(|declaration| match declaration.kind() {
            DeclarationKind::Middleware { auto_load, .. }
                if logging::MODULE.contains(declaration.module_path()) =>
            {
                Some(*auto_load)
            }
            _ => None,
        })
        .collect();
    assert_eq!(middlewares.len(), 2);
    assert!(middlewares.contains(&true));
    assert!(middlewares.contains(&false));
}

fn reduce_all(feature: &dyn Feature, state: CounterState, action: &Action) -> CounterState {
    feature
        .reducers()
        .iter()
        .fold(state, |current, reducer| {
            match reducer
                .reduce_erased(&current, action)
                .and_then(|next| next.downcast::<CounterState>().ok())
            {
                Some(next) => *next,
                None => current,
            }
        })
}

/// 测试计数器模块端到端装配
#[test]
fn test_counter_module_end_to_end() {
    init_test_logger();

    let loader = ModuleLoaderBuilder::new()
        .configure_services(register_all)
        .build();
    let mut store = InMemoryStore::new();

    loader
        .load(&mut store, Some(&[counter::MODULE]), None)
        .unwrap();

    assert_eq!(store.effects().len(), 1);
    assert!(store.middlewares().is_empty());

    let feature = store.feature_of::<CounterState>().unwrap();
    assert_eq!(feature.name(), "Counter");
    assert_eq!(feature.reducers().len(), 2);

    let state = reduce_all(feature, CounterState { count: 0 }, &Increment);
    assert_eq!(state.count, 1);
    let state = reduce_all(feature, state, &Reset);
    assert_eq!(state.count, 10);
    // 未知动作不改变状态
    let state = reduce_all(feature, state, &"noop");
    assert_eq!(state.count, 10);
}

/// 测试显式中间件与自动加载中间件的顺序
#[test]
fn test_logging_module_with_explicit_middleware() {
    init_test_logger();

    let loader = ModuleLoaderBuilder::new()
        .configure_services(register_all)
        .build();
    let mut store = InMemoryStore::new();

    loader
        .load(
            &mut store,
            Some(&[logging::MODULE]),
            Some(&[MiddlewareType::of::<TracingInterceptor>()]),
        )
        .unwrap();

    let kinds: Vec<RegistrationKind> = store.events().iter().map(|event| event.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RegistrationKind::Effect,
            RegistrationKind::Middleware,
            RegistrationKind::Middleware,
        ]
    );
    assert!(store.middlewares()[0].name().ends_with("TracingInterceptor"));
    assert!(store.middlewares()[1].name().ends_with("LoggingInterceptor"));
}

/// 测试重叠的扫描模块中每个声明只贡献一次
#[test]
fn test_overlapping_modules_contribute_once() {
    init_test_logger();

    let loader = ModuleLoaderBuilder::new()
        .configure_services(register_all)
        .build();
    let mut store = InMemoryStore::new();

    loader
        .load(
            &mut store,
            Some(&[ROOT, counter::MODULE, logging::MODULE]),
            None,
        )
        .unwrap();

    assert_eq!(store.features().len(), 1);
    assert_eq!(store.effects().len(), 2);
    assert_eq!(store.middlewares().len(), 1);
    assert_eq!(store.feature_of::<CounterState>().unwrap().reducers().len(), 2);
}

/// 测试缺少构建方式时加载失败且存储不变
#[test]
fn test_missing_registration_fails_whole_load() {
    init_test_logger();

    let loader = ModuleLoaderBuilder::new()
        .configure_services(|services| {
            services.register_transient::<CounterFeature, _>(|_| Ok(CounterFeature))
        })
        .build();
    let mut store = InMemoryStore::new();

    let error = loader
        .load(&mut store, Some(&[counter::MODULE]), None)
        .unwrap_err();

    assert!(matches!(error, LoadError::Construction { .. }));
    assert!(store.is_empty());
}
