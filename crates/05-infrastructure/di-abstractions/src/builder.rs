//! 对象构建器抽象接口
//!
//! 装配引擎只通过这里的接口构建实例，不关心依赖如何被解析

use infrastructure_common::{DependencyError, TypeKey};
use std::any::Any;
use std::sync::Arc;

/// 类型擦除的已构建实例
pub type Instance = Box<dyn Any + Send + Sync>;

/// 对象构建器 trait
///
/// 根据类型标识构建一个新的实例，实例自身的依赖由实现方内部解析。
pub trait ObjectBuilder: Send + Sync {
    /// 构建指定类型的新实例
    fn build(&self, type_key: &TypeKey) -> Result<Instance, DependencyError>;

    /// 检查是否能够构建指定类型
    fn can_build(&self, type_key: &TypeKey) -> bool;
}

impl<B: ObjectBuilder + ?Sized> ObjectBuilder for &B {
    fn build(&self, type_key: &TypeKey) -> Result<Instance, DependencyError> {
        (**self).build(type_key)
    }

    fn can_build(&self, type_key: &TypeKey) -> bool {
        (**self).can_build(type_key)
    }
}

impl<B: ObjectBuilder + ?Sized> ObjectBuilder for Arc<B> {
    fn build(&self, type_key: &TypeKey) -> Result<Instance, DependencyError> {
        (**self).build(type_key)
    }

    fn can_build(&self, type_key: &TypeKey) -> bool {
        (**self).can_build(type_key)
    }
}

/// 按具体类型构建实例
///
/// 构建器返回的实例不是 `T` 时返回 [`DependencyError::TypeMismatch`]。
pub fn build_as<T: Any + Send + Sync>(builder: &dyn ObjectBuilder) -> Result<Box<T>, DependencyError> {
    let type_key = TypeKey::of::<T>();
    builder
        .build(&type_key)?
        .downcast::<T>()
        .map_err(|_| DependencyError::TypeMismatch {
            expected: type_key.name().to_string(),
            actual: "<其他类型>".to_string(),
        })
}
