//! # 依赖注入具体实现
//!
//! 提供 [`ObjectBuilder`] 的容器实现：按类型注册工厂，解析依赖，
//! 缓存单例，并在解析链上检测循环依赖。

use di_abstractions::{
    erase_factory, ComponentFactoryFn, DependencyResolver, Instance, ObjectBuilder, ResolveContext,
    ResolveOptions,
};
use infrastructure_common::{DependencyError, Lifetime, TypeKey};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 组件注册信息
#[derive(Clone)]
struct ComponentRegistration {
    /// 组件类型
    type_key: TypeKey,
    /// 生命周期
    lifetime: Lifetime,
    /// 组件工厂
    factory: ComponentFactoryFn,
}

impl fmt::Debug for ComponentRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistration")
            .field("type_key", &self.type_key)
            .field("lifetime", &self.lifetime)
            .field("factory", &"<function>")
            .finish()
    }
}

/// 服务容器
///
/// 实现 [`ObjectBuilder`]：`build` 总是通过工厂创建新实例，
/// 工厂内部通过 [`DependencyResolver`] 解析依赖时遵循注册的生命周期。
pub struct ServiceContainer {
    /// 组件注册信息
    registrations: HashMap<TypeId, ComponentRegistration>,
    /// 单例实例缓存
    singletons: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    /// 解析选项
    options: ResolveOptions,
}

impl ServiceContainer {
    /// 创建容器构建器
    pub fn builder() -> ServiceContainerBuilder {
        ServiceContainerBuilder::new()
    }

    /// 解析组件的共享实例
    pub fn resolve<T: Any + Send + Sync>(&self) -> Result<Arc<T>, DependencyError> {
        let type_key = TypeKey::of::<T>();
        let mut context = ResolveContext::new(self.options.clone());
        self.resolve_in(&type_key, &mut context)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                expected: type_key.name().to_string(),
                actual: "<其他类型>".to_string(),
            })
    }

    /// 检查组件是否已注册
    pub fn is_registered<T: 'static>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<T>())
    }

    /// 获取所有已注册的组件类型（按名称排序）
    pub fn registered_types(&self) -> Vec<TypeKey> {
        let mut types: Vec<TypeKey> = self
            .registrations
            .values()
            .map(|registration| registration.type_key)
            .collect();
        types.sort();
        types
    }

    /// 已注册组件数量
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// 容器是否为空
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn registration(&self, type_key: &TypeKey) -> Result<&ComponentRegistration, DependencyError> {
        self.registrations
            .get(&type_key.id())
            .ok_or_else(|| DependencyError::not_registered(type_key.name()))
    }

    fn resolve_in(
        &self,
        type_key: &TypeKey,
        context: &mut ResolveContext,
    ) -> Result<Arc<dyn Any + Send + Sync>, DependencyError> {
        let registration = self.registration(type_key)?;

        match registration.lifetime {
            Lifetime::Singleton => {
                if let Some(existing) = self.singletons.read().get(&type_key.id()) {
                    return Ok(existing.clone());
                }

                let created: Arc<dyn Any + Send + Sync> =
                    Arc::from(self.construct(registration, context)?);
                // 并发解析时以先写入的实例为准
                let mut singletons = self.singletons.write();
                let instance = singletons.entry(type_key.id()).or_insert(created).clone();
                debug!("单例组件已就绪: {}", type_key.name());
                Ok(instance)
            }
            Lifetime::Transient => Ok(Arc::from(self.construct(registration, context)?)),
        }
    }

    fn construct(
        &self,
        registration: &ComponentRegistration,
        context: &mut ResolveContext,
    ) -> Result<Instance, DependencyError> {
        context.push_type(registration.type_key)?;
        let result = {
            let scope = ResolutionScope {
                container: self,
                context: RefCell::new(&mut *context),
            };
            (registration.factory)(&scope)
        };
        context.pop_type();
        result
    }
}

impl ObjectBuilder for ServiceContainer {
    fn build(&self, type_key: &TypeKey) -> Result<Instance, DependencyError> {
        let registration = self.registration(type_key)?;
        let mut context = ResolveContext::new(self.options.clone());
        let instance = self.construct(registration, &mut context)?;
        debug!("构建组件实例: {}", type_key.name());
        Ok(instance)
    }

    fn can_build(&self, type_key: &TypeKey) -> bool {
        self.registrations.contains_key(&type_key.id())
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("registrations", &self.registered_types())
            .field("singletons", &self.singletons.read().len())
            .field("options", &self.options)
            .finish()
    }
}

/// 单次解析过程中传给工厂的解析器
struct ResolutionScope<'a> {
    container: &'a ServiceContainer,
    context: RefCell<&'a mut ResolveContext>,
}

impl DependencyResolver for ResolutionScope<'_> {
    fn resolve_erased(&self, type_key: &TypeKey) -> Result<Arc<dyn Any + Send + Sync>, DependencyError> {
        let mut context = self.context.borrow_mut();
        self.container.resolve_in(type_key, &mut **context)
    }

    fn can_resolve(&self, type_key: &TypeKey) -> bool {
        self.container.can_build(type_key)
    }
}

/// 容器构建器
pub struct ServiceContainerBuilder {
    registrations: HashMap<TypeId, ComponentRegistration>,
    instances: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    options: ResolveOptions,
}

impl ServiceContainerBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
            instances: HashMap::new(),
            options: ResolveOptions::default(),
        }
    }

    /// 注册瞬时组件
    pub fn register_transient<T, F>(self, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn DependencyResolver) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        self.insert(TypeKey::of::<T>(), Lifetime::Transient, erase_factory(factory))
    }

    /// 注册单例组件
    pub fn register_singleton<T, F>(self, factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&dyn DependencyResolver) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        self.insert(TypeKey::of::<T>(), Lifetime::Singleton, erase_factory(factory))
    }

    /// 注册通过 `Default` 创建的瞬时组件
    pub fn register_default<T>(self) -> Self
    where
        T: Default + Send + Sync + 'static,
    {
        self.register_transient::<T, _>(|_| Ok(T::default()))
    }

    /// 注册已创建的单例实例
    ///
    /// 该类型只能作为依赖被解析，不能再被 `build` 构建成新实例。
    pub fn register_instance<T>(mut self, instance: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        let type_key = TypeKey::of::<T>();
        let factory: ComponentFactoryFn =
            Arc::new(move |_: &dyn DependencyResolver| -> Result<Instance, DependencyError> {
                Err(DependencyError::creation_failed(
                    type_key.name(),
                    "实例注册的组件不能重新构建",
                ))
            });
        self = self.insert(type_key, Lifetime::Singleton, factory);
        self.instances.insert(type_key.id(), Arc::new(instance));
        self
    }

    /// 设置最大解析深度
    pub fn max_resolution_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// 构建容器
    pub fn build(self) -> ServiceContainer {
        info!("构建容器完成，注册了 {} 个组件", self.registrations.len());
        ServiceContainer {
            registrations: self.registrations,
            singletons: RwLock::new(self.instances),
            options: self.options,
        }
    }

    fn insert(mut self, type_key: TypeKey, lifetime: Lifetime, factory: ComponentFactoryFn) -> Self {
        debug!("注册组件: {} ({:?})", type_key.name(), lifetime);
        let registration = ComponentRegistration {
            type_key,
            lifetime,
            factory,
        };
        if self.registrations.insert(type_key.id(), registration).is_some() {
            warn!("组件重复注册，后注册的覆盖先注册的: {}", type_key.name());
            self.instances.remove(&type_key.id());
        }
        self
    }
}

impl Default for ServiceContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
