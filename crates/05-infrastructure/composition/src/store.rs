//! 内存存储
//!
//! 按到达顺序保存注册的功能、副作用处理器和中间件，并记录注册事件。

use infrastructure_common::TypeKey;
use std::fmt;
use std::sync::Arc;
use store_abstractions::{Effect, Feature, Middleware, Store};
use tracing::debug;

/// 注册类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationKind {
    Effect,
    Feature,
    Middleware,
}

/// 注册事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationEvent {
    pub kind: RegistrationKind,
    /// 注册对象的名称
    pub name: String,
    /// 注册功能时已附加的状态变更处理器数量，其他类别为 0
    pub reducer_count: usize,
}

/// 内存存储
#[derive(Default)]
pub struct InMemoryStore {
    effects: Vec<Arc<dyn Effect>>,
    features: Vec<Box<dyn Feature>>,
    middlewares: Vec<Arc<dyn Middleware>>,
    events: Vec<RegistrationEvent>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> &[Arc<dyn Effect>] {
        &self.effects
    }

    pub fn features(&self) -> &[Box<dyn Feature>] {
        &self.features
    }

    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middlewares
    }

    /// 注册事件（按到达顺序）
    pub fn events(&self) -> &[RegistrationEvent] {
        &self.events
    }

    /// 查找拥有指定状态形态的功能
    pub fn feature_for(&self, state_type: TypeKey) -> Option<&dyn Feature> {
        self.features
            .iter()
            .find(|feature| feature.state_type() == state_type)
            .map(|feature| feature.as_ref())
    }

    /// 查找拥有状态 `T` 的功能
    pub fn feature_of<T: 'static>(&self) -> Option<&dyn Feature> {
        self.feature_for(TypeKey::of::<T>())
    }

    /// 存储中是否没有任何注册
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn record(&mut self, kind: RegistrationKind, name: &str, reducer_count: usize) {
        debug!("存储注册 {:?}: {}", kind, name);
        self.events.push(RegistrationEvent {
            kind,
            name: name.to_string(),
            reducer_count,
        });
    }
}

impl Store for InMemoryStore {
    fn add_effect(&mut self, effect: Arc<dyn Effect>) {
        self.record(RegistrationKind::Effect, effect.name(), 0);
        self.effects.push(effect);
    }

    fn add_feature(&mut self, feature: Box<dyn Feature>) {
        let name = feature.name().to_string();
        self.record(RegistrationKind::Feature, &name, feature.reducers().len());
        self.features.push(feature);
    }

    fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.record(RegistrationKind::Middleware, middleware.name(), 0);
        self.middlewares.push(middleware);
    }
}

impl fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("effects", &self.effects.len())
            .field("features", &self.features.len())
            .field("middlewares", &self.middlewares.len())
            .field("events", &self.events)
            .finish()
    }
}
