//! 组合层测试
//!
//! 测试使用本地声明目录，不依赖全局目录。


use crate::component_scanner::CatalogScanner;
use di_abstractions::{Instance, ObjectBuilder};
use di_impl::ServiceContainer;
use infrastructure_common::{DependencyError, ScanError, TypeKey};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Once};
use store_abstractions::{
    Action, Declaration, DeclarationCatalog, Dispatcher, Effect, FeatureDefinition, Middleware,
    MiddlewareType, Reducer, ScanModule, ScanResult, Scanner,
};

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
pub(crate) fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init()
            .ok(); // 忽略初始化失败的错误
    });
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CounterState {
    pub count: i32,
}

pub(crate) struct CounterFeature;

impl FeatureDefinition for CounterFeature {
    type State = CounterState;

    fn name(&self) -> &str {
        "Counter"
    }

    fn initial_state(&self) -> CounterState {
        CounterState { count: 0 }
    }
}

pub(crate) struct Increment;

pub(crate) struct IncrementReducer;

impl Reducer for IncrementReducer {
    type State = CounterState;

    fn reduce(&self, state: &CounterState, action: &Action) -> Option<CounterState> {
        action.downcast_ref::<Increment>().map(|_| CounterState {
            count: state.count + 1,
        })
    }
}

pub(crate) struct Reset;

/// 声明了松散方法的类型
pub(crate) struct CounterHandlers {
    pub reset_to: i32,
}

impl CounterHandlers {
    pub fn reset(&self, _state: &CounterState, action: &Action) -> Option<CounterState> {
        action.downcast_ref::<Reset>().map(|_| CounterState {
            count: self.reset_to,
        })
    }

    pub fn announce(&self, action: &Action, dispatcher: &dyn Dispatcher) {
        if action.is::<Reset>() {
            dispatcher.dispatch(Box::new(Increment));
        }
    }
}

pub(crate) struct OrphanState;

/// 没有对应功能的状态变更处理器
pub(crate) struct OrphanReducer;

impl Reducer for OrphanReducer {
    type State = OrphanState;

    fn reduce(&self, _state: &OrphanState, _action: &Action) -> Option<OrphanState> {
        None
    }
}

pub(crate) struct AuditEffect;

impl Effect for AuditEffect {
    fn handle(&self, _action: &Action, _dispatcher: &dyn Dispatcher) {}
}

pub(crate) struct LoggingInterceptor;

impl Middleware for LoggingInterceptor {}

pub(crate) struct TracingInterceptor;

impl Middleware for TracingInterceptor {}

pub(crate) struct MetricsInterceptor;

impl Middleware for MetricsInterceptor {}

pub(crate) const COUNTER_MODULE: ScanModule = ScanModule::new("app::counter");
pub(crate) const AUDIT_MODULE: ScanModule = ScanModule::new("app::audit");
pub(crate) const LOGGING_MODULE: ScanModule = ScanModule::new("app::logging");
pub(crate) const ORPHAN_MODULE: ScanModule = ScanModule::new("app::orphan");
pub(crate) const EMPTY_MODULE: ScanModule = ScanModule::new("app::empty");

/// 计数器示例的声明目录
pub(crate) fn counter_catalog() -> Arc<DeclarationCatalog> {
    Arc::new(DeclarationCatalog::from_declarations([
        Declaration::feature::<CounterFeature>("app::counter"),
        Declaration::reducer::<IncrementReducer>("app::counter"),
        Declaration::reducer_method::<CounterHandlers, CounterState>(
            "app::counter::handlers",
            "reset",
            CounterHandlers::reset,
        ),
        Declaration::effect_method::<CounterHandlers>(
            "app::counter::handlers",
            "announce",
            CounterHandlers::announce,
        ),
        Declaration::effect::<AuditEffect>("app::audit"),
        Declaration::middleware::<LoggingInterceptor>("app::logging", true),
        Declaration::middleware::<MetricsInterceptor>("app::logging::metrics", true),
        Declaration::middleware::<TracingInterceptor>("app::logging::tracing", false),
        Declaration::reducer::<OrphanReducer>("app::orphan"),
    ]))
}

/// 注册了所有示例构建块的容器
pub(crate) fn counter_container() -> ServiceContainer {
    ServiceContainer::builder()
        .register_transient::<CounterFeature, _>(|_| Ok(CounterFeature))
        .register_transient::<IncrementReducer, _>(|_| Ok(IncrementReducer))
        .register_transient::<CounterHandlers, _>(|_| Ok(CounterHandlers { reset_to: 100 }))
        .register_transient::<OrphanReducer, _>(|_| Ok(OrphanReducer))
        .register_transient::<AuditEffect, _>(|_| Ok(AuditEffect))
        .register_transient::<LoggingInterceptor, _>(|_| Ok(LoggingInterceptor))
        .register_transient::<TracingInterceptor, _>(|_| Ok(TracingInterceptor))
        .register_transient::<MetricsInterceptor, _>(|_| Ok(MetricsInterceptor))
        .build()
}

/// 记录每个类型被构建次数的对象构建器
pub(crate) struct CountingBuilder<B> {
    inner: B,
    builds: Mutex<HashMap<TypeKey, usize>>,
}

impl<B: ObjectBuilder> CountingBuilder<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            builds: Mutex::new(HashMap::new()),
        }
    }

    pub fn builds_of<T: 'static>(&self) -> usize {
        self.builds
            .lock()
            .get(&TypeKey::of::<T>())
            .copied()
            .unwrap_or(0)
    }

    pub fn total_builds(&self) -> usize {
        self.builds.lock().values().sum()
    }
}

impl<B: ObjectBuilder> ObjectBuilder for CountingBuilder<B> {
    fn build(&self, type_key: &TypeKey) -> Result<Instance, DependencyError> {
        *self.builds.lock().entry(*type_key).or_insert(0) += 1;
        self.inner.build(type_key)
    }

    fn can_build(&self, type_key: &TypeKey) -> bool {
        self.inner.can_build(type_key)
    }
}

/// 记录调用参数的扫描器
pub(crate) struct SpyScanner {
    inner: CatalogScanner,
    calls: Mutex<Vec<(Vec<ScanModule>, Vec<MiddlewareType>)>>,
}

impl SpyScanner {
    pub fn new(catalog: Arc<DeclarationCatalog>) -> Self {
        Self {
            inner: CatalogScanner::new(catalog),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Vec<ScanModule>, Vec<MiddlewareType>)> {
        self.calls.lock().clone()
    }
}

impl Scanner for SpyScanner {
    fn scan(
        &self,
        modules: &[ScanModule],
        middleware_types: &[MiddlewareType],
    ) -> Result<ScanResult, ScanError> {
        self.calls
            .lock()
            .push((modules.to_vec(), middleware_types.to_vec()));
        self.inner.scan(modules, middleware_types)
    }
}

/// 记录分发动作数量的分发器
#[derive(Default)]
pub(crate) struct CountingDispatcher {
    pub dispatched: Mutex<usize>,
}

impl Dispatcher for CountingDispatcher {
    fn dispatch(&self, _action: Box<Action>) {
        *self.dispatched.lock() += 1;
    }
}
