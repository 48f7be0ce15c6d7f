//! 功能（状态容器）抽象

use crate::handler::{Action, ReducerHandler};
use infrastructure_common::TypeKey;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 状态容器 trait
///
/// 每个功能只拥有一个状态形态，状态变更处理器按状态形态附加到功能上。
pub trait Feature: Send + Sync {
    /// 功能名称
    fn name(&self) -> &str;

    /// 状态形态
    fn state_type(&self) -> TypeKey;

    /// 附加状态变更处理器
    fn add_reducer(&mut self, reducer: Arc<dyn ReducerHandler>);

    /// 已附加的状态变更处理器
    fn reducers(&self) -> &[Arc<dyn ReducerHandler>];

    /// 当前状态
    fn state(&self) -> &(dyn Any + Send + Sync);
}

/// 功能定义
///
/// 描述功能名称和初始状态，通过 [`StateFeature`] 成为完整的功能。
pub trait FeatureDefinition: Send + Sync + 'static {
    /// 状态类型
    type State: Send + Sync + 'static;

    /// 功能名称
    fn name(&self) -> &str;

    /// 初始状态
    fn initial_state(&self) -> Self::State;
}

/// 标准状态容器
pub struct StateFeature<D: FeatureDefinition> {
    definition: D,
    state: D::State,
    reducers: Vec<Arc<dyn ReducerHandler>>,
}

impl<D: FeatureDefinition> StateFeature<D> {
    /// 以定义的初始状态创建功能
    pub fn new(definition: D) -> Self {
        let state = definition.initial_state();
        Self {
            definition,
            state,
            reducers: Vec::new(),
        }
    }

    /// 功能定义
    pub fn definition(&self) -> &D {
        &self.definition
    }

    /// 当前强类型状态
    pub fn current(&self) -> &D::State {
        &self.state
    }

    /// 依次应用已附加的处理器，返回是否有处理器改变了状态
    pub fn apply(&mut self, action: &Action) -> bool {
        let mut changed = false;
        for reducer in &self.reducers {
            if let Some(next) = reducer.reduce_erased(&self.state, action) {
                if let Ok(next) = next.downcast::<D::State>() {
                    self.state = *next;
                    changed = true;
                }
            }
        }
        changed
    }
}

impl<D: FeatureDefinition> Feature for StateFeature<D> {
    fn name(&self) -> &str {
        self.definition.name()
    }

    fn state_type(&self) -> TypeKey {
        TypeKey::of::<D::State>()
    }

    fn add_reducer(&mut self, reducer: Arc<dyn ReducerHandler>) {
        self.reducers.push(reducer);
    }

    fn reducers(&self) -> &[Arc<dyn ReducerHandler>] {
        &self.reducers
    }

    fn state(&self) -> &(dyn Any + Send + Sync) {
        &self.state
    }
}

impl<D: FeatureDefinition> fmt::Debug for StateFeature<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateFeature")
            .field("name", &self.definition.name())
            .field("state_type", &TypeKey::of::<D::State>())
            .field("reducers", &self.reducers.len())
            .finish()
    }
}
