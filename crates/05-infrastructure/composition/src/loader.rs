//! 模块加载器
//!
//! 对外的唯一入口：校验输入，扫描模块，把扫描结果交给装配引擎。
//! 同一加载器上的并发加载完全串行执行。

use crate::options::LoaderOptions;
use crate::wiring::{WiringEngine, WiringSummary};
use chrono::{DateTime, Utc};
use di_abstractions::ObjectBuilder;
use infrastructure_common::LoadError;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::hash::Hash;
use store_abstractions::{MiddlewareType, ScanModule, Scanner, Store};
use tracing::{debug, error, info};
use uuid::Uuid;

/// 一次加载的报告
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// 加载ID
    pub load_id: Uuid,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 完成时间
    pub finished_at: DateTime<Utc>,
    /// 去重后的扫描模块
    pub modules: Vec<ScanModule>,
    /// 去重后的显式中间件类型数量
    pub requested_middlewares: usize,
    /// 装配统计
    pub summary: WiringSummary,
}

impl LoadReport {
    /// 加载耗时（毫秒）
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// 模块加载器
pub struct ModuleLoader<S, B> {
    scanner: S,
    builder: B,
    options: LoaderOptions,
    critical_section: Mutex<()>,
}

impl<S: Scanner, B: ObjectBuilder> ModuleLoader<S, B> {
    pub fn new(scanner: S, builder: B) -> Self {
        Self::with_options(scanner, builder, LoaderOptions::default())
    }

    pub fn with_options(scanner: S, builder: B, options: LoaderOptions) -> Self {
        Self {
            scanner,
            builder,
            options,
            critical_section: Mutex::new(()),
        }
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// 扫描模块并把发现的构建块注册到存储
    ///
    /// `modules` 为空或缺失时返回 [`LoadError::InvalidInput`]，不进行扫描，
    /// 也不改变存储；`middleware_types` 缺失时视为空。
    pub fn load(
        &self,
        store: &mut dyn Store,
        modules: Option<&[ScanModule]>,
        middleware_types: Option<&[MiddlewareType]>,
    ) -> Result<(), LoadError> {
        self.load_with_report(store, modules, middleware_types)
            .map(|_| ())
    }

    /// 与 [`ModuleLoader::load`] 相同，并返回加载报告
    pub fn load_with_report(
        &self,
        store: &mut dyn Store,
        modules: Option<&[ScanModule]>,
        middleware_types: Option<&[MiddlewareType]>,
    ) -> Result<LoadReport, LoadError> {
        let modules = match modules {
            Some(modules) if !modules.is_empty() => dedup(modules),
            _ => return Err(LoadError::invalid_input("至少需要指定一个扫描模块")),
        };
        let middleware_types = dedup(middleware_types.unwrap_or_default());

        let _guard = self.critical_section.lock();
        let load_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            "开始加载 [{}]: 模块 {:?}，显式中间件 {} 个",
            load_id,
            modules,
            middleware_types.len()
        );

        let scan_result = self
            .scanner
            .scan(&modules, &middleware_types)
            .map_err(|e| {
                error!("模块扫描失败 [{}]: {}", load_id, e);
                LoadError::from(e)
            })?;
        debug!("扫描完成 [{}]: {} 个构建块", load_id, scan_result.artifact_count());

        let summary = WiringEngine::new(&self.builder, &self.options)
            .fix_up(store, scan_result)
            .map_err(|e| {
                error!("模块装配失败 [{}]: {}", load_id, e);
                e
            })?;

        let report = LoadReport {
            load_id,
            started_at,
            finished_at: Utc::now(),
            modules,
            requested_middlewares: middleware_types.len(),
            summary,
        };
        info!(
            "加载完成 [{}]: 耗时 {} ms，{:?}",
            report.load_id,
            report.elapsed_ms(),
            report.summary
        );
        Ok(report)
    }
}

/// 按身份去重并保留首次出现的顺序
fn dedup<T: Copy + Eq + Hash>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .copied()
        .filter(|item| seen.insert(*item))
        .collect()
}
