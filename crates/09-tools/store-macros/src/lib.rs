//! # Store Macros
//!
//! 这个 crate 提供了用于声明构建块的过程宏。被标记的类型在程序启动时
//! 提交到全局声明目录，模块加载器按模块路径扫描它们。
//!
//! ## 核心宏
//!
//! - [`store_feature`] - 声明功能定义
//! - [`reducer`] - 声明状态变更处理器类型
//! - [`effect`] - 声明副作用处理器类型
//! - [`middleware`] - 声明中间件，`auto_load` 表示扫描到即自动加载
//! - [`handlers`] - 声明 impl 块中的松散方法
//!
//! 使用这些宏的 crate 需要依赖 `ctor` 和 `store-abstractions`。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use store_abstractions::{Action, FeatureDefinition, Reducer};
//! use store_macros::{reducer, store_feature};
//!
//! pub struct CounterState {
//!     pub count: i32,
//! }
//!
//! #[store_feature]
//! pub struct CounterFeature;
//!
//! impl FeatureDefinition for CounterFeature {
//!     type State = CounterState;
//!     fn name(&self) -> &str { "Counter" }
//!     fn initial_state(&self) -> CounterState { CounterState { count: 0 } }
//! }
//!
//! #[reducer]
//! pub struct IncrementReducer;
//!
//! impl Reducer for IncrementReducer {
//!     type State = CounterState;
//!     fn reduce(&self, state: &CounterState, _action: &Action) -> Option<CounterState> {
//!         Some(CounterState { count: state.count + 1 })
//!     }
//! }
//! ```

use proc_macro::TokenStream;

mod artifact;
mod handlers;
mod utils;

use artifact::ArtifactKind;

/// 声明功能定义
///
/// 标记的类型需要实现 `FeatureDefinition`，装配时包装为标准状态容器。
/// 名称不能是 `feature`，它与编译器内建属性冲突。
#[proc_macro_attribute]
pub fn store_feature(args: TokenStream, input: TokenStream) -> TokenStream {
    artifact::artifact_impl(ArtifactKind::Feature, args.into(), input.into()).into()
}

/// 声明状态变更处理器类型
///
/// 标记的类型需要实现 `Reducer`，按其状态形态附加到功能上。
#[proc_macro_attribute]
pub fn reducer(args: TokenStream, input: TokenStream) -> TokenStream {
    artifact::artifact_impl(ArtifactKind::Reducer, args.into(), input.into()).into()
}

/// 声明副作用处理器类型
#[proc_macro_attribute]
pub fn effect(args: TokenStream, input: TokenStream) -> TokenStream {
    artifact::artifact_impl(ArtifactKind::Effect, args.into(), input.into()).into()
}

/// 声明中间件
///
/// # 参数
///
/// - `auto_load` - 所在模块被扫描时自动加载；缺省时只有被显式请求才加载
///
/// # 示例
///
/// ```rust,ignore
/// #[middleware(auto_load)]
/// pub struct LoggingInterceptor;
/// ```
#[proc_macro_attribute]
pub fn middleware(args: TokenStream, input: TokenStream) -> TokenStream {
    artifact::artifact_impl(ArtifactKind::Middleware, args.into(), input.into()).into()
}

/// 声明 impl 块中的松散方法
///
/// - `#[reduce]` 方法签名为 `fn(&self, &State, &A) -> State`
/// - `#[effect_method]` 方法签名为 `fn(&self, &A, &dyn Dispatcher)`
///
/// `A` 为具体动作类型时，只有动作能转换为 `A` 才会调用方法；
/// `A` 为 `Action` 时接收所有动作。
///
/// # 示例
///
/// ```rust,ignore
/// #[handlers]
/// impl CounterHandlers {
///     #[reduce]
///     fn reset(&self, _state: &CounterState, _action: &Reset) -> CounterState {
///         CounterState { count: 0 }
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn handlers(args: TokenStream, input: TokenStream) -> TokenStream {
    handlers::handlers_impl(args.into(), input.into()).into()
}
