//! 扫描器契约

use crate::discovery::{
    DiscoveredEffectClass, DiscoveredEffectMethod, DiscoveredFeatureClass, DiscoveredMiddleware,
    DiscoveredReducerClass, DiscoveredReducerMethod, MiddlewareType,
};
use infrastructure_common::ScanError;
use std::fmt;

/// 可扫描模块
///
/// 以模块路径（`module_path!()` 的结果）标识，扫描时包含嵌套的子模块。
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScanModule {
    path: &'static str,
}

impl ScanModule {
    pub const fn new(path: &'static str) -> Self {
        Self { path }
    }

    /// 模块路径
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// 给定模块路径是否位于本模块之内
    pub fn contains(&self, module_path: &str) -> bool {
        match module_path.strip_prefix(self.path) {
            Some(rest) => rest.is_empty() || rest.starts_with("::"),
            None => false,
        }
    }
}

impl fmt::Debug for ScanModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScanModule({})", self.path)
    }
}

impl fmt::Display for ScanModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

/// 一次扫描的结果：六类描述符集合
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub feature_classes: Vec<DiscoveredFeatureClass>,
    pub reducer_classes: Vec<DiscoveredReducerClass>,
    pub reducer_methods: Vec<DiscoveredReducerMethod>,
    pub effect_classes: Vec<DiscoveredEffectClass>,
    pub effect_methods: Vec<DiscoveredEffectMethod>,
    pub middlewares: Vec<DiscoveredMiddleware>,
}

impl ScanResult {
    /// 是否没有发现任何构建块
    pub fn is_empty(&self) -> bool {
        self.artifact_count() == 0
    }

    /// 发现的描述符总数
    pub fn artifact_count(&self) -> usize {
        self.feature_classes.len()
            + self.reducer_classes.len()
            + self.reducer_methods.len()
            + self.effect_classes.len()
            + self.effect_methods.len()
            + self.middlewares.len()
    }
}

/// 扫描器 trait
///
/// 从可扫描模块中发现被标记的构建块。显式请求的中间件类型
/// 以 `auto_loaded = false` 出现在结果中。
pub trait Scanner: Send + Sync {
    fn scan(
        &self,
        modules: &[ScanModule],
        middleware_types: &[MiddlewareType],
    ) -> Result<ScanResult, ScanError>;
}

impl<S: Scanner + ?Sized> Scanner for &S {
    fn scan(
        &self,
        modules: &[ScanModule],
        middleware_types: &[MiddlewareType],
    ) -> Result<ScanResult, ScanError> {
        (**self).scan(modules, middleware_types)
    }
}

impl<S: Scanner + ?Sized> Scanner for std::sync::Arc<S> {
    fn scan(
        &self,
        modules: &[ScanModule],
        middleware_types: &[MiddlewareType],
    ) -> Result<ScanResult, ScanError> {
        (**self).scan(modules, middleware_types)
    }
}
