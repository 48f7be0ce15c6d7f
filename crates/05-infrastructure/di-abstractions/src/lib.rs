//! # Dependency Injection Abstractions
//!
//! 对象构建抽象层，定义装配引擎与依赖注入实现之间的边界。
//!
//! ## 核心接口
//!
//! - [`ObjectBuilder`] - 按类型标识构建实例
//! - [`DependencyResolver`] - 工厂内部解析自身依赖
//! - [`ComponentFactoryFn`] - 类型擦除的组件工厂
//! - [`ResolveContext`] - 解析链与循环依赖检测

pub mod builder;
pub mod factory;
pub mod resolver;

pub use builder::*;
pub use factory::*;
pub use resolver::*;
