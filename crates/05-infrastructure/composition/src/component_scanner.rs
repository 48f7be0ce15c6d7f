//! 基于声明目录的组件扫描
//!
//! 按模块路径从声明目录中筛选构建块，产出六类描述符集合

use infrastructure_common::ScanError;
use std::sync::Arc;
use store_abstractions::{
    global_catalog, Declaration, DeclarationCatalog, DeclarationKind, DiscoveredMiddleware,
    MiddlewareType, ScanModule, ScanResult, Scanner,
};
use tracing::{debug, info};

/// 声明目录扫描器
///
/// 声明所在模块等于被扫描模块或嵌套在其下时被发现。
/// 被扫描模块互相重叠时，每条声明最多贡献一次。
#[derive(Debug, Clone)]
pub struct CatalogScanner {
    catalog: Arc<DeclarationCatalog>,
}

impl CatalogScanner {
    /// 扫描全局声明目录
    pub fn global() -> Self {
        Self::new(global_catalog())
    }

    pub fn new(catalog: Arc<DeclarationCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<DeclarationCatalog> {
        &self.catalog
    }

    fn validate(modules: &[ScanModule]) -> Result<(), ScanError> {
        for module in modules {
            if module.path().trim().is_empty() {
                return Err(ScanError::InvalidModule {
                    module: format!("{:?}", module.path()),
                    message: "模块路径不能为空".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for CatalogScanner {
    fn default() -> Self {
        Self::global()
    }
}

impl Scanner for CatalogScanner {
    fn scan(
        &self,
        modules: &[ScanModule],
        middleware_types: &[MiddlewareType],
    ) -> Result<ScanResult, ScanError> {
        Self::validate(modules)?;

        let mut declarations: Vec<Declaration> = self
            .catalog
            .snapshot()
            .into_iter()
            .filter(|declaration| {
                modules
                    .iter()
                    .any(|module| module.contains(declaration.module_path()))
            })
            .collect();
        declarations.sort_by(|a, b| {
            (a.module_path(), a.type_key().name(), a.method_name()).cmp(&(
                b.module_path(),
                b.type_key().name(),
                b.method_name(),
            ))
        });

        let mut result = ScanResult::default();
        result.middlewares.extend(
            middleware_types
                .iter()
                .copied()
                .map(DiscoveredMiddleware::explicit),
        );

        for declaration in declarations {
            debug!(
                "发现声明: {} ({})",
                declaration.type_key().name(),
                declaration.module_path()
            );
            match declaration.kind().clone() {
                DeclarationKind::Feature(feature) => result.feature_classes.push(feature),
                DeclarationKind::ReducerClass(reducer) => result.reducer_classes.push(reducer),
                DeclarationKind::ReducerMethod(method) => result.reducer_methods.push(method),
                DeclarationKind::EffectClass(effect) => result.effect_classes.push(effect),
                DeclarationKind::EffectMethod(method) => result.effect_methods.push(method),
                DeclarationKind::Middleware {
                    middleware_type,
                    auto_load: true,
                } => result
                    .middlewares
                    .push(DiscoveredMiddleware::auto_loaded(middleware_type)),
                DeclarationKind::Middleware {
                    middleware_type, ..
                } => debug!("中间件未声明自动加载，跳过: {}", middleware_type.type_key().name()),
            }
        }

        info!(
            "扫描 {} 个模块完成，发现 {} 个构建块",
            modules.len(),
            result.artifact_count()
        );
        Ok(result)
    }
}
