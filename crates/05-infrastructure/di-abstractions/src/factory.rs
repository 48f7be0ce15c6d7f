//! 组件工厂抽象
//!
//! 提供组件实例创建的工厂函数类型

use crate::builder::Instance;
use crate::resolver::DependencyResolver;
use infrastructure_common::DependencyError;
use std::sync::Arc;

/// 组件工厂函数类型
pub type ComponentFactoryFn =
    Arc<dyn Fn(&dyn DependencyResolver) -> Result<Instance, DependencyError> + Send + Sync>;

/// 将强类型工厂包装为类型擦除的工厂函数
pub fn erase_factory<T, F>(factory: F) -> ComponentFactoryFn
where
    T: Send + Sync + 'static,
    F: Fn(&dyn DependencyResolver) -> Result<T, DependencyError> + Send + Sync + 'static,
{
    Arc::new(move |resolver: &dyn DependencyResolver| {
        factory(resolver).map(|instance| Box::new(instance) as Instance)
    })
}
