//! # Store Abstractions
//!
//! 状态存储的能力接口、发现描述符模型以及扫描器契约。
//!
//! ## 核心接口
//!
//! - [`Store`] - 中央运行时存储，接收功能、副作用处理器和中间件
//! - [`Feature`] / [`FeatureDefinition`] - 状态容器
//! - [`Reducer`] / [`ReducerHandler`] - 状态变更处理器
//! - [`Effect`] - 副作用处理器
//! - [`Middleware`] - 动作分发管道拦截器
//! - [`Scanner`] - 从可扫描模块产出六类描述符
//!
//! 功能与状态处理器之间只通过状态形态（[`TypeKey`]）关联，
//! 不持有彼此的对象引用。

pub mod catalog;
pub mod discovery;
pub mod feature;
pub mod handler;
pub mod scanner;
pub mod store;

pub use catalog::{global_catalog, Declaration, DeclarationCatalog, DeclarationKind};
pub use discovery::*;
pub use feature::*;
pub use handler::*;
pub use scanner::*;
pub use store::*;

pub use di_abstractions::Instance;
pub use infrastructure_common::TypeKey;

/// 以当前模块路径创建 [`ScanModule`]
///
/// ```
/// use store_abstractions::scan_module;
///
/// let module = scan_module!();
/// assert_eq!(module.path(), module_path!());
/// ```
#[macro_export]
macro_rules! scan_module {
    () => {
        $crate::ScanModule::new(::core::module_path!())
    };
    ($path:expr) => {
        $crate::ScanModule::new($path)
    };
}
