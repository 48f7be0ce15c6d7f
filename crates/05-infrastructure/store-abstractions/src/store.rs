//! 中央运行时存储抽象

use crate::feature::Feature;
use crate::handler::{Effect, Middleware};
use std::sync::Arc;

/// 中央运行时存储 trait
///
/// 注册方法不会失败；调用顺序由加载器保证：
/// 副作用处理器、带处理器的功能、中间件。
pub trait Store {
    /// 注册副作用处理器
    fn add_effect(&mut self, effect: Arc<dyn Effect>);

    /// 注册功能，调用时功能的状态变更处理器已全部附加
    fn add_feature(&mut self, feature: Box<dyn Feature>);

    /// 注册中间件
    fn add_middleware(&mut self, middleware: Arc<dyn Middleware>);
}

impl<S: Store + ?Sized> Store for &mut S {
    fn add_effect(&mut self, effect: Arc<dyn Effect>) {
        (**self).add_effect(effect)
    }

    fn add_feature(&mut self, feature: Box<dyn Feature>) {
        (**self).add_feature(feature)
    }

    fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        (**self).add_middleware(middleware)
    }
}
