//! 松散方法包装
//!
//! 为声明了松散方法的类型构建一个实例，把方法绑定到该实例上，
//! 之后每次调用都复用同一个实例。

use di_abstractions::{Instance, ObjectBuilder};
use infrastructure_common::{LoadError, TypeKey};
use std::sync::Arc;
use store_abstractions::{DiscoveredEffectMethod, DiscoveredReducerMethod, Effect, ReducerHandler};
use tracing::debug;

/// 通过对象构建器构建实例，并转换为期望的能力
pub(crate) fn build_and_project<T>(
    builder: &dyn ObjectBuilder,
    type_key: TypeKey,
    capability: &str,
    project: impl FnOnce(Instance) -> Option<T>,
) -> Result<T, LoadError> {
    let instance = builder
        .build(&type_key)
        .map_err(|source| LoadError::Construction {
            type_name: type_key.name().to_string(),
            source,
        })?;
    project(instance).ok_or_else(|| LoadError::capability_mismatch(type_key.name(), capability))
}

/// 包装松散状态变更方法
pub fn wrap_reducer_method(
    builder: &dyn ObjectBuilder,
    method: &DiscoveredReducerMethod,
) -> Result<Arc<dyn ReducerHandler>, LoadError> {
    debug!(
        "包装状态变更方法: {}::{}",
        method.declaring_type().short_name(),
        method.method_name()
    );
    build_and_project(builder, method.declaring_type(), "ReducerHandler", |instance| {
        method.bind(instance)
    })
}

/// 包装松散副作用方法
pub fn wrap_effect_method(
    builder: &dyn ObjectBuilder,
    method: &DiscoveredEffectMethod,
) -> Result<Arc<dyn Effect>, LoadError> {
    debug!(
        "包装副作用方法: {}::{}",
        method.declaring_type().short_name(),
        method.method_name()
    );
    build_and_project(builder, method.declaring_type(), "Effect", |instance| {
        method.bind(instance)
    })
}
