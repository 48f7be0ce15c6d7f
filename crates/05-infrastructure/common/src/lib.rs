//! # Infrastructure Common
//!
//! 这个 crate 提供了模块发现与装配引擎各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`TypeKey`] - 可比较、可哈希的类型标识，用作状态形态的连接键
//! - [`Lifetime`] - 组件生命周期
//! - [`LoadError`] / [`DependencyError`] / [`ScanError`] - 错误分类
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 类型标识代替对象引用
//! - 错误携带出错的输入或类型名称

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
