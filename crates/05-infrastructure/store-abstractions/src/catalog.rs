//! 声明目录
//!
//! 标记宏生成的代码在程序启动时把声明提交到全局目录，
//! 扫描器再按模块路径从目录中筛选。

use crate::discovery::{
    DiscoveredEffectClass, DiscoveredEffectMethod, DiscoveredFeatureClass, DiscoveredReducerClass,
    DiscoveredReducerMethod, MiddlewareType,
};
use crate::feature::FeatureDefinition;
use crate::handler::{Effect, EffectMethodFn, Middleware, Reducer, ReducerMethodFn};
use infrastructure_common::TypeKey;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

/// 声明的构建块种类
#[derive(Debug, Clone)]
pub enum DeclarationKind {
    Feature(DiscoveredFeatureClass),
    ReducerClass(DiscoveredReducerClass),
    ReducerMethod(DiscoveredReducerMethod),
    EffectClass(DiscoveredEffectClass),
    EffectMethod(DiscoveredEffectMethod),
    Middleware {
        middleware_type: MiddlewareType,
        auto_load: bool,
    },
}

/// 一条声明：所在模块路径和描述符
#[derive(Debug, Clone)]
pub struct Declaration {
    module_path: &'static str,
    kind: DeclarationKind,
}

impl Declaration {
    pub fn new(module_path: &'static str, kind: DeclarationKind) -> Self {
        Self { module_path, kind }
    }

    /// 功能定义声明
    pub fn feature<D: FeatureDefinition>(module_path: &'static str) -> Self {
        Self::new(
            module_path,
            DeclarationKind::Feature(DiscoveredFeatureClass::of_definition::<D>()),
        )
    }

    /// 状态变更处理器类型声明
    pub fn reducer<R: Reducer>(module_path: &'static str) -> Self {
        Self::new(
            module_path,
            DeclarationKind::ReducerClass(DiscoveredReducerClass::of::<R>()),
        )
    }

    /// 松散状态变更方法声明
    pub fn reducer_method<T, S>(
        module_path: &'static str,
        method_name: &'static str,
        method: ReducerMethodFn<T, S>,
    ) -> Self
    where
        T: Send + Sync + 'static,
        S: Send + Sync + 'static,
    {
        Self::new(
            module_path,
            DeclarationKind::ReducerMethod(DiscoveredReducerMethod::new(method_name, method)),
        )
    }

    /// 副作用处理器类型声明
    pub fn effect<E: Effect>(module_path: &'static str) -> Self {
        Self::new(
            module_path,
            DeclarationKind::EffectClass(DiscoveredEffectClass::of::<E>()),
        )
    }

    /// 松散副作用方法声明
    pub fn effect_method<T>(
        module_path: &'static str,
        method_name: &'static str,
        method: EffectMethodFn<T>,
    ) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::new(
            module_path,
            DeclarationKind::EffectMethod(DiscoveredEffectMethod::new(method_name, method)),
        )
    }

    /// 中间件声明，`auto_load` 为真时扫描到即自动加载
    pub fn middleware<M: Middleware>(module_path: &'static str, auto_load: bool) -> Self {
        Self::new(
            module_path,
            DeclarationKind::Middleware {
                middleware_type: MiddlewareType::of::<M>(),
                auto_load,
            },
        )
    }

    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    pub fn kind(&self) -> &DeclarationKind {
        &self.kind
    }

    /// 声明的类型
    pub fn type_key(&self) -> TypeKey {
        match &self.kind {
            DeclarationKind::Feature(feature) => feature.implementing_type(),
            DeclarationKind::ReducerClass(reducer) => reducer.implementing_type(),
            DeclarationKind::ReducerMethod(method) => method.declaring_type(),
            DeclarationKind::EffectClass(effect) => effect.implementing_type(),
            DeclarationKind::EffectMethod(method) => method.declaring_type(),
            DeclarationKind::Middleware {
                middleware_type, ..
            } => middleware_type.type_key(),
        }
    }

    /// 松散方法的方法名，类型声明为空字符串
    pub fn method_name(&self) -> &'static str {
        match &self.kind {
            DeclarationKind::ReducerMethod(method) => method.method_name(),
            DeclarationKind::EffectMethod(method) => method.method_name(),
            _ => "",
        }
    }
}

/// 线程安全的声明目录
#[derive(Debug, Default)]
pub struct DeclarationCatalog {
    declarations: RwLock<Vec<Declaration>>,
}

impl DeclarationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由给定声明创建目录
    pub fn from_declarations(declarations: impl IntoIterator<Item = Declaration>) -> Self {
        Self {
            declarations: RwLock::new(declarations.into_iter().collect()),
        }
    }

    /// 提交一条声明
    pub fn submit(&self, declaration: Declaration) {
        self.declarations.write().push(declaration);
    }

    /// 当前所有声明的快照
    pub fn snapshot(&self) -> Vec<Declaration> {
        self.declarations.read().clone()
    }

    pub fn len(&self) -> usize {
        self.declarations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.read().is_empty()
    }
}

static GLOBAL_CATALOG: Lazy<Arc<DeclarationCatalog>> =
    Lazy::new(|| Arc::new(DeclarationCatalog::new()));

/// 获取全局声明目录
pub fn global_catalog() -> Arc<DeclarationCatalog> {
    GLOBAL_CATALOG.clone()
}
