//! 依赖解析抽象接口
//!
//! 提供工厂内部解析依赖的能力以及解析链上下文

use infrastructure_common::{DependencyError, TypeKey};
use std::any::Any;
use std::sync::Arc;

/// 依赖解析器 trait
///
/// 传给组件工厂，用于解析组件自身的依赖。
pub trait DependencyResolver {
    /// 解析指定类型的共享实例（类型擦除）
    fn resolve_erased(&self, type_key: &TypeKey) -> Result<Arc<dyn Any + Send + Sync>, DependencyError>;

    /// 检查是否可以解析指定类型
    fn can_resolve(&self, type_key: &TypeKey) -> bool;
}

impl dyn DependencyResolver + '_ {
    /// 解析指定类型的共享实例
    pub fn resolve<T: Any + Send + Sync>(&self) -> Result<Arc<T>, DependencyError> {
        let type_key = TypeKey::of::<T>();
        self.resolve_erased(&type_key)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                expected: type_key.name().to_string(),
                actual: "<其他类型>".to_string(),
            })
    }

    /// 解析可选依赖，未注册时返回 `None`
    pub fn resolve_optional<T: Any + Send + Sync>(&self) -> Result<Option<Arc<T>>, DependencyError> {
        if self.can_resolve(&TypeKey::of::<T>()) {
            self.resolve::<T>().map(Some)
        } else {
            Ok(None)
        }
    }
}

/// 解析上下文
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    resolution_chain: Vec<TypeKey>,
    /// 解析选项
    options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, type_key: TypeKey) -> Result<(), DependencyError> {
        if self.resolution_chain.contains(&type_key) {
            let chain = self
                .resolution_chain
                .iter()
                .map(TypeKey::short_name)
                .chain(std::iter::once(type_key.short_name()))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DependencyError::CircularDependency {
                dependency_chain: chain,
            });
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                type_name: type_key.name().to_string(),
                max_depth: self.options.max_depth,
            });
        }
        self.resolution_chain.push(type_key);
        Ok(())
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}
