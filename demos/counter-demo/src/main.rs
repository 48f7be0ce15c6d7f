//! # 计数器演示程序
//!
//! 通过声明宏标记构建块，由模块加载器扫描模块并装配到内存存储，
//! 再用一个简单的同步分发循环驱动动作。

use anyhow::Context;
use clap::Parser;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use store_abstractions::{Action, Dispatcher, MiddlewareType};
use store_composition::{InMemoryStore, LoaderOptions, LoggingConfig, ModuleLoaderBuilder};
use tracing::{info, warn};

mod counter {
    use store_abstractions::{Action, Dispatcher, Effect, FeatureDefinition, Reducer, ScanModule};
    use store_macros::{effect, handlers, reducer, store_feature};
    use tracing::info;

    pub const MODULE: ScanModule = ScanModule::new(module_path!());

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CounterState {
        pub count: i64,
    }

    pub struct Increment;

    pub struct Decrement;

    pub struct Reset;

    #[store_feature]
    #[derive(Default)]
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

    /// 加一减一
    #[reducer]
    #[derive(Default)]
    pub struct StepReducer;

    impl Reducer for StepReducer {
        type State = CounterState;

        fn reduce(&self, state: &CounterState, action: &Action) -> Option<CounterState> {
            if action.is::<Increment>() {
                Some(CounterState {
                    count: state.count + 1,
                })
            } else if action.is::<Decrement>() {
                Some(CounterState {
                    count: state.count - 1,
                })
            } else {
                None
            }
        }
    }

    pub struct ResetHandlers {
        pub reset_to: i64,
    }

    #[handlers]
    impl ResetHandlers {
        #[reduce]
        fn reset(&self, _state: &CounterState, _action: &Reset) -> CounterState {
            CounterState {
                count: self.reset_to,
            }
        }

        /// 重置后从一开始计数
        #[effect_method]
        fn restart(&self, _action: &Reset, dispatcher: &dyn Dispatcher) {
            dispatcher.dispatch(Box::new(Increment));
        }
    }

    #[effect]
    #[derive(Default)]
    pub struct AuditEffect;

    impl Effect for AuditEffect {
        fn handle(&self, action: &Action, _dispatcher: &dyn Dispatcher) {
            if action.is::<Reset>() {
                info!("计数器被重置");
            }
        }
    }
}

mod interceptors {
    use store_abstractions::{Action, Middleware, ScanModule};
    use store_macros::middleware;
    use tracing::{debug, warn};

    pub const MODULE: ScanModule = ScanModule::new(module_path!());

    #[middleware(auto_load)]
    #[derive(Default)]
    pub struct TraceMiddleware;

    impl Middleware for TraceMiddleware {
        fn before_dispatch(&self, _action: &Action) {
            debug!("动作进入管道");
        }

        fn after_dispatch(&self, _action: &Action) {
            debug!("动作处理完成");
        }
    }

    /// 拒绝所有减一动作，只在显式请求时加载
    #[middleware]
    #[derive(Default)]
    pub struct NoDecrementMiddleware;

    impl Middleware for NoDecrementMiddleware {
        fn may_dispatch(&self, action: &Action) -> bool {
            let allowed = !action.is::<super::counter::Decrement>();
            if !allowed {
                warn!("减一动作被拦截");
            }
            allowed
        }
    }
}

use counter::{
    AuditEffect, CounterFeature, CounterState, Decrement, Increment, Reset, ResetHandlers,
    StepReducer,
};
use interceptors::{NoDecrementMiddleware, TraceMiddleware};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "counter-demo")]
#[command(about = "模块发现与装配演示")]
struct Args {
    /// 加载器配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 未匹配的状态变更处理器视为错误
    #[arg(long)]
    strict: bool,

    /// 显式加载拦截减一动作的中间件
    #[arg(long)]
    guard: bool,

    /// 加一动作的次数
    #[arg(long, default_value_t = 3)]
    steps: u32,

    /// 使用 JSON 格式日志
    #[arg(long)]
    json: bool,
}

/// 把分发的动作放入队列，由分发循环依次处理
#[derive(Default)]
struct QueueDispatcher {
    queue: Mutex<VecDeque<Box<Action>>>,
}

impl QueueDispatcher {
    fn next(&self) -> Option<Box<Action>> {
        self.queue.lock().pop_front()
    }
}

impl Dispatcher for QueueDispatcher {
    fn dispatch(&self, action: Box<Action>) {
        self.queue.lock().push_back(action);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut options = LoaderOptions::load(args.config.as_deref())?;
    if args.strict {
        options.strict_reducer_matching = true;
    }
    let logging = if args.json {
        LoggingConfig::production()
    } else {
        LoggingConfig::development()
    };

    let loader = ModuleLoaderBuilder::new()
        .with_logging(logging)
        .with_options(options)
        .configure_services(|services| {
            services
                .register_default::<CounterFeature>()
                .register_default::<StepReducer>()
                .register_transient::<ResetHandlers, _>(|_| Ok(ResetHandlers { reset_to: 0 }))
                .register_default::<AuditEffect>()
                .register_default::<TraceMiddleware>()
                .register_default::<NoDecrementMiddleware>()
        })
        .build();

    let modules = [counter::MODULE, interceptors::MODULE];
    let mut requested = Vec::new();
    if args.guard {
        requested.push(MiddlewareType::of::<NoDecrementMiddleware>());
    }

    let mut store = InMemoryStore::new();
    let report = loader.load_with_report(&mut store, Some(&modules), Some(&requested))?;
    info!(
        "装配完成 [{}]: {:?}，耗时 {} 毫秒",
        report.load_id,
        report.summary,
        report.elapsed_ms()
    );

    let dispatcher = QueueDispatcher::default();
    for _ in 0..args.steps {
        dispatcher.dispatch(Box::new(Increment));
    }
    dispatcher.dispatch(Box::new(Decrement));
    dispatcher.dispatch(Box::new(Reset));

    let state = run(&store, &dispatcher)?;
    info!("最终状态: {:?}", state);
    println!("count = {}", state.count);
    Ok(())
}

/// 依次处理队列中的动作，直到队列为空
fn run(store: &InMemoryStore, dispatcher: &QueueDispatcher) -> anyhow::Result<CounterState> {
    let feature = store
        .feature_of::<CounterState>()
        .context("存储中没有计数器功能")?;
    let mut state = feature
        .state()
        .downcast_ref::<CounterState>()
        .cloned()
        .context("计数器功能的状态类型不符")?;

    while let Some(boxed) = dispatcher.next() {
        let action: &Action = &*boxed;
        if !store
            .middlewares()
            .iter()
            .all(|middleware| middleware.may_dispatch(action))
        {
            continue;
        }
        for middleware in store.middlewares() {
            middleware.before_dispatch(action);
        }

        for reducer in feature.reducers() {
            if let Some(next) = reducer.reduce_erased(&state, action) {
                match next.downcast::<CounterState>() {
                    Ok(next) => state = *next,
                    Err(_) => warn!("处理器 {} 返回了其他状态类型", reducer.handler_name()),
                }
            }
        }
        for effect in store.effects() {
            effect.handle(action, dispatcher);
        }

        for middleware in store.middlewares() {
            middleware.after_dispatch(action);
        }
    }

    Ok(state)
}
