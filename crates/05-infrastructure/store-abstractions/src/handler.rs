//! 处理器能力接口
//!
//! 定义状态变更处理器、副作用处理器和中间件的契约，
//! 以及把松散方法绑定为处理器的适配器

use infrastructure_common::TypeKey;
use std::any::Any;

/// 动作（类型擦除）
pub type Action = dyn Any + Send + Sync;

/// 状态值（类型擦除）
pub type StateValue = Box<dyn Any + Send + Sync>;

/// 动作分发能力
pub trait Dispatcher: Send + Sync {
    /// 分发一个新动作
    fn dispatch(&self, action: Box<Action>);
}

/// 状态变更处理器 trait
///
/// 根据当前状态和动作计算新状态；返回 `None` 表示不处理该动作。
pub trait Reducer: Send + Sync + 'static {
    /// 目标状态形态
    type State: Send + Sync + 'static;

    /// 计算新状态
    fn reduce(&self, state: &Self::State, action: &Action) -> Option<Self::State>;

    /// 处理器名称
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// 类型擦除的状态变更处理器
///
/// 功能容器只持有这一种形式，所有 [`Reducer`] 自动实现该 trait。
pub trait ReducerHandler: Send + Sync {
    /// 目标状态形态
    fn state_type(&self) -> TypeKey;

    /// 处理器名称
    fn handler_name(&self) -> &'static str;

    /// 计算新状态；状态类型不匹配或不处理该动作时返回 `None`
    fn reduce_erased(&self, state: &(dyn Any + Send + Sync), action: &Action) -> Option<StateValue>;
}

impl<R: Reducer> ReducerHandler for R {
    fn state_type(&self) -> TypeKey {
        TypeKey::of::<R::State>()
    }

    fn handler_name(&self) -> &'static str {
        self.name()
    }

    fn reduce_erased(&self, state: &(dyn Any + Send + Sync), action: &Action) -> Option<StateValue> {
        let state = state.downcast_ref::<R::State>()?;
        self.reduce(state, action)
            .map(|next| Box::new(next) as StateValue)
    }
}

/// 副作用处理器 trait
pub trait Effect: Send + Sync + 'static {
    /// 响应动作，可通过分发器分发后续动作
    fn handle(&self, action: &Action, dispatcher: &dyn Dispatcher);

    /// 处理器名称
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// 动作分发管道拦截器 trait
pub trait Middleware: Send + Sync + 'static {
    /// 是否允许分发该动作，返回 `false` 表示短路
    fn may_dispatch(&self, action: &Action) -> bool {
        let _ = action;
        true
    }

    /// 动作进入状态变更处理器之前调用
    fn before_dispatch(&self, action: &Action) {
        let _ = action;
    }

    /// 动作处理完成之后调用
    fn after_dispatch(&self, action: &Action) {
        let _ = action;
    }

    /// 中间件名称
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// 松散状态变更方法的签名
pub type ReducerMethodFn<T, S> = fn(&T, &S, &Action) -> Option<S>;

/// 松散副作用方法的签名
pub type EffectMethodFn<T> = fn(&T, &Action, &dyn Dispatcher);

/// 绑定到声明类型实例上的状态变更方法
pub struct BoundReducerMethod<T, S> {
    instance: T,
    method_name: &'static str,
    method: ReducerMethodFn<T, S>,
}

impl<T, S> BoundReducerMethod<T, S> {
    /// 绑定方法到实例
    pub fn new(instance: T, method_name: &'static str, method: ReducerMethodFn<T, S>) -> Self {
        Self {
            instance,
            method_name,
            method,
        }
    }

    /// 声明类型实例
    pub fn instance(&self) -> &T {
        &self.instance
    }
}

impl<T, S> Reducer for BoundReducerMethod<T, S>
where
    T: Send + Sync + 'static,
    S: Send + Sync + 'static,
{
    type State = S;

    fn reduce(&self, state: &S, action: &Action) -> Option<S> {
        (self.method)(&self.instance, state, action)
    }

    fn name(&self) -> &'static str {
        self.method_name
    }
}

/// 绑定到声明类型实例上的副作用方法
pub struct BoundEffectMethod<T> {
    instance: T,
    method_name: &'static str,
    method: EffectMethodFn<T>,
}

impl<T> BoundEffectMethod<T> {
    /// 绑定方法到实例
    pub fn new(instance: T, method_name: &'static str, method: EffectMethodFn<T>) -> Self {
        Self {
            instance,
            method_name,
            method,
        }
    }

    /// 声明类型实例
    pub fn instance(&self) -> &T {
        &self.instance
    }
}

impl<T: Send + Sync + 'static> Effect for BoundEffectMethod<T> {
    fn handle(&self, action: &Action, dispatcher: &dyn Dispatcher) {
        (self.method)(&self.instance, action, dispatcher);
    }

    fn name(&self) -> &'static str {
        self.method_name
    }
}
