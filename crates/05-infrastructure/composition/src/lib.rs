//! # 模块装配组合层
//!
//! 把扫描器、对象构建器和存储组合起来：扫描被标记的构建块，
//! 通过对象构建器创建实例，并按固定顺序注册到存储中。
//!
//! ## 主要功能
//!
//! - **模块加载器**: 校验输入，串行执行扫描与装配
//! - **装配引擎**: 全部构建成功后按顺序注册，失败时不改变存储
//! - **松散方法包装**: 把声明类型上的方法绑定为处理器
//! - **声明目录扫描**: 按模块路径筛选标记宏提交的声明
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use store_abstractions::ScanModule;
//! use store_composition::{InMemoryStore, ModuleLoaderBuilder};
//!
//! # struct CounterFeature;
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = ModuleLoaderBuilder::new()
//!         .configure_services(|services| services.register_transient::<CounterFeature, _>(|_| Ok(CounterFeature)))
//!         .build();
//!
//!     let mut store = InMemoryStore::new();
//!     loader.load(&mut store, Some(&[ScanModule::new("app::counter")]), None)?;
//!
//!     println!("已注册 {} 个功能", store.features().len());
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod component_scanner;
pub mod loader;
pub mod options;
pub mod store;
pub mod wiring;
pub mod wrappers;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use builder::{LoggingConfig, ModuleLoaderBuilder};
pub use component_scanner::CatalogScanner;
pub use loader::{LoadReport, ModuleLoader};
pub use options::LoaderOptions;
pub use store::{InMemoryStore, RegistrationEvent, RegistrationKind};
pub use wiring::{WiringEngine, WiringSummary};
pub use wrappers::{wrap_effect_method, wrap_reducer_method};

// 重新导出错误类型
pub use infrastructure_common::LoadError;
