//! 发现描述符模型
//!
//! 扫描器为每个被发现的构建块产出一个描述符。描述符只记录类型信息，
//! 以及把构建出的类型擦除实例转换为对应能力的投影函数；
//! 实例本身由对象构建器在装配阶段创建。

use crate::feature::{Feature, FeatureDefinition, StateFeature};
use crate::handler::{
    BoundEffectMethod, BoundReducerMethod, Effect, EffectMethodFn, Middleware, Reducer,
    ReducerHandler, ReducerMethodFn,
};
use di_abstractions::Instance;
use infrastructure_common::TypeKey;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 功能实例投影
pub type FeatureProjection = fn(Instance) -> Option<Box<dyn Feature>>;

/// 状态变更处理器实例投影
pub type ReducerProjection = fn(Instance) -> Option<Arc<dyn ReducerHandler>>;

/// 副作用处理器实例投影
pub type EffectProjection = fn(Instance) -> Option<Arc<dyn Effect>>;

/// 中间件实例投影
pub type MiddlewareProjection = fn(Instance) -> Option<Arc<dyn Middleware>>;

/// 把声明类型实例绑定为状态变更处理器
pub type ReducerBinder = Arc<dyn Fn(Instance) -> Option<Arc<dyn ReducerHandler>> + Send + Sync>;

/// 把声明类型实例绑定为副作用处理器
pub type EffectBinder = Arc<dyn Fn(Instance) -> Option<Arc<dyn Effect>> + Send + Sync>;

fn project_definition<D: FeatureDefinition>(instance: Instance) -> Option<Box<dyn Feature>> {
    let definition = instance.downcast::<D>().ok()?;
    Some(Box::new(StateFeature::new(*definition)) as Box<dyn Feature>)
}

fn project_reducer<R: Reducer>(instance: Instance) -> Option<Arc<dyn ReducerHandler>> {
    let reducer = instance.downcast::<R>().ok()?;
    Some(Arc::new(*reducer) as Arc<dyn ReducerHandler>)
}

fn project_effect<E: Effect>(instance: Instance) -> Option<Arc<dyn Effect>> {
    let effect = instance.downcast::<E>().ok()?;
    Some(Arc::new(*effect) as Arc<dyn Effect>)
}

fn project_middleware<M: Middleware>(instance: Instance) -> Option<Arc<dyn Middleware>> {
    let middleware = instance.downcast::<M>().ok()?;
    Some(Arc::new(*middleware) as Arc<dyn Middleware>)
}

/// 被发现的功能类型
#[derive(Clone)]
pub struct DiscoveredFeatureClass {
    implementing_type: TypeKey,
    state_type: TypeKey,
    projection: FeatureProjection,
}

impl DiscoveredFeatureClass {
    /// 由功能定义类型描述，装配时包装为 [`StateFeature`]
    pub fn of_definition<D: FeatureDefinition>() -> Self {
        Self {
            implementing_type: TypeKey::of::<D>(),
            state_type: TypeKey::of::<D::State>(),
            projection: project_definition::<D>,
        }
    }

    pub fn implementing_type(&self) -> TypeKey {
        self.implementing_type
    }

    /// 功能定义的状态形态
    pub fn state_type(&self) -> TypeKey {
        self.state_type
    }

    /// 把构建出的实例转换为功能
    pub fn project(&self, instance: Instance) -> Option<Box<dyn Feature>> {
        (self.projection)(instance)
    }
}

impl fmt::Debug for DiscoveredFeatureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredFeatureClass")
            .field("implementing_type", &self.implementing_type)
            .field("state_type", &self.state_type)
            .finish()
    }
}

/// 被发现的状态变更处理器类型
#[derive(Clone)]
pub struct DiscoveredReducerClass {
    implementing_type: TypeKey,
    state_type: TypeKey,
    projection: ReducerProjection,
}

impl DiscoveredReducerClass {
    pub fn of<R: Reducer>() -> Self {
        Self {
            implementing_type: TypeKey::of::<R>(),
            state_type: TypeKey::of::<R::State>(),
            projection: project_reducer::<R>,
        }
    }

    pub fn implementing_type(&self) -> TypeKey {
        self.implementing_type
    }

    /// 目标状态形态
    pub fn state_type(&self) -> TypeKey {
        self.state_type
    }

    /// 把构建出的实例转换为状态变更处理器
    pub fn project(&self, instance: Instance) -> Option<Arc<dyn ReducerHandler>> {
        (self.projection)(instance)
    }
}

impl fmt::Debug for DiscoveredReducerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredReducerClass")
            .field("implementing_type", &self.implementing_type)
            .field("state_type", &self.state_type)
            .finish()
    }
}

/// 被发现的松散状态变更方法
#[derive(Clone)]
pub struct DiscoveredReducerMethod {
    declaring_type: TypeKey,
    method_name: &'static str,
    state_type: TypeKey,
    binder: ReducerBinder,
}

impl DiscoveredReducerMethod {
    /// 描述声明在 `T` 上、作用于状态 `S` 的方法
    pub fn new<T, S>(method_name: &'static str, method: ReducerMethodFn<T, S>) -> Self
    where
        T: Send + Sync + 'static,
        S: Send + Sync + 'static,
    {
        let binder: ReducerBinder = Arc::new(move |instance: Instance| {
            let instance = instance.downcast::<T>().ok()?;
            let bound = BoundReducerMethod::new(*instance, method_name, method);
            Some(Arc::new(bound) as Arc<dyn ReducerHandler>)
        });
        Self {
            declaring_type: TypeKey::of::<T>(),
            method_name,
            state_type: TypeKey::of::<S>(),
            binder,
        }
    }

    pub fn declaring_type(&self) -> TypeKey {
        self.declaring_type
    }

    pub fn method_name(&self) -> &'static str {
        self.method_name
    }

    /// 目标状态形态
    pub fn state_type(&self) -> TypeKey {
        self.state_type
    }

    /// 把声明类型实例绑定为状态变更处理器
    pub fn bind(&self, instance: Instance) -> Option<Arc<dyn ReducerHandler>> {
        (self.binder)(instance)
    }
}

impl fmt::Debug for DiscoveredReducerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredReducerMethod")
            .field("declaring_type", &self.declaring_type)
            .field("method_name", &self.method_name)
            .field("state_type", &self.state_type)
            .finish()
    }
}

/// 被发现的副作用处理器类型
#[derive(Clone)]
pub struct DiscoveredEffectClass {
    implementing_type: TypeKey,
    projection: EffectProjection,
}

impl DiscoveredEffectClass {
    pub fn of<E: Effect>() -> Self {
        Self {
            implementing_type: TypeKey::of::<E>(),
            projection: project_effect::<E>,
        }
    }

    pub fn implementing_type(&self) -> TypeKey {
        self.implementing_type
    }

    /// 把构建出的实例转换为副作用处理器
    pub fn project(&self, instance: Instance) -> Option<Arc<dyn Effect>> {
        (self.projection)(instance)
    }
}

impl fmt::Debug for DiscoveredEffectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredEffectClass")
            .field("implementing_type", &self.implementing_type)
            .finish()
    }
}

/// 被发现的松散副作用方法
#[derive(Clone)]
pub struct DiscoveredEffectMethod {
    declaring_type: TypeKey,
    method_name: &'static str,
    binder: EffectBinder,
}

impl DiscoveredEffectMethod {
    pub fn new<T>(method_name: &'static str, method: EffectMethodFn<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        let binder: EffectBinder = Arc::new(move |instance: Instance| {
            let instance = instance.downcast::<T>().ok()?;
            let bound = BoundEffectMethod::new(*instance, method_name, method);
            Some(Arc::new(bound) as Arc<dyn Effect>)
        });
        Self {
            declaring_type: TypeKey::of::<T>(),
            method_name,
            binder,
        }
    }

    pub fn declaring_type(&self) -> TypeKey {
        self.declaring_type
    }

    pub fn method_name(&self) -> &'static str {
        self.method_name
    }

    /// 把声明类型实例绑定为副作用处理器
    pub fn bind(&self, instance: Instance) -> Option<Arc<dyn Effect>> {
        (self.binder)(instance)
    }
}

impl fmt::Debug for DiscoveredEffectMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredEffectMethod")
            .field("declaring_type", &self.declaring_type)
            .field("method_name", &self.method_name)
            .finish()
    }
}

/// 中间件类型标识
///
/// 相等性只由类型决定。
#[derive(Clone, Copy)]
pub struct MiddlewareType {
    type_key: TypeKey,
    projection: MiddlewareProjection,
}

impl MiddlewareType {
    pub fn of<M: Middleware>() -> Self {
        Self {
            type_key: TypeKey::of::<M>(),
            projection: project_middleware::<M>,
        }
    }

    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// 把构建出的实例转换为中间件
    pub fn project(&self, instance: Instance) -> Option<Arc<dyn Middleware>> {
        (self.projection)(instance)
    }
}

impl PartialEq for MiddlewareType {
    fn eq(&self, other: &Self) -> bool {
        self.type_key == other.type_key
    }
}

impl Eq for MiddlewareType {}

impl Hash for MiddlewareType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_key.hash(state);
    }
}

impl fmt::Debug for MiddlewareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MiddlewareType({})", self.type_key.name())
    }
}

/// 被发现的中间件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredMiddleware {
    middleware_type: MiddlewareType,
    auto_loaded: bool,
}

impl DiscoveredMiddleware {
    /// 调用方显式请求的中间件
    pub fn explicit(middleware_type: MiddlewareType) -> Self {
        Self {
            middleware_type,
            auto_loaded: false,
        }
    }

    /// 声明为自动加载的中间件
    pub fn auto_loaded(middleware_type: MiddlewareType) -> Self {
        Self {
            middleware_type,
            auto_loaded: true,
        }
    }

    pub fn middleware_type(&self) -> MiddlewareType {
        self.middleware_type
    }

    pub fn implementing_type(&self) -> TypeKey {
        self.middleware_type.type_key()
    }

    pub fn is_auto_loaded(&self) -> bool {
        self.auto_loaded
    }
}
