//! 装配引擎
//!
//! 把一次扫描得到的描述符构建为实例并注册到存储中。注册顺序固定：
//! 副作用处理器类型、副作用方法、附加完处理器的功能、中间件。
//!
//! 所有实例在触碰存储之前全部构建完成，任何一步失败都不会改变存储。

use crate::options::LoaderOptions;
use crate::wrappers::{build_and_project, wrap_effect_method, wrap_reducer_method};
use di_abstractions::ObjectBuilder;
use infrastructure_common::{LoadError, TypeKey};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use store_abstractions::{
    DiscoveredReducerClass, DiscoveredReducerMethod, Effect, Feature, Middleware, ScanResult,
    Store,
};
use tracing::{debug, info, warn};

/// 一次装配的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WiringSummary {
    /// 注册的副作用处理器数量（含松散方法）
    pub effects: usize,
    /// 注册的功能数量
    pub features: usize,
    /// 附加到功能上的状态变更处理器数量
    pub reducers: usize,
    /// 没有匹配功能而被忽略的状态变更处理器数量
    pub unmatched_reducers: usize,
    /// 注册的中间件数量
    pub middlewares: usize,
}

/// 按状态形态分组的状态变更处理器
#[derive(Default)]
struct ReducerGroup<'a> {
    classes: Vec<&'a DiscoveredReducerClass>,
    methods: Vec<&'a DiscoveredReducerMethod>,
}

impl ReducerGroup<'_> {
    fn len(&self) -> usize {
        self.classes.len() + self.methods.len()
    }
}

/// 构建完成、等待注册的实例
#[derive(Default)]
struct Staged {
    effects: Vec<Arc<dyn Effect>>,
    features: Vec<Box<dyn Feature>>,
    middlewares: Vec<Arc<dyn Middleware>>,
    reducers: usize,
    unmatched_reducers: usize,
}

/// 装配引擎
pub struct WiringEngine<'a> {
    builder: &'a dyn ObjectBuilder,
    options: &'a LoaderOptions,
}

impl<'a> WiringEngine<'a> {
    pub fn new(builder: &'a dyn ObjectBuilder, options: &'a LoaderOptions) -> Self {
        Self { builder, options }
    }

    /// 构建并注册扫描结果中的所有构建块
    pub fn fix_up(
        &self,
        store: &mut dyn Store,
        scan_result: ScanResult,
    ) -> Result<WiringSummary, LoadError> {
        if self.options.log_discoveries {
            log_discoveries(&scan_result);
        }

        let staged = self.stage(&scan_result)?;
        Ok(commit(store, staged))
    }

    fn stage(&self, scan_result: &ScanResult) -> Result<Staged, LoadError> {
        let mut staged = Staged::default();

        // 副作用处理器
        for effect in &scan_result.effect_classes {
            let instance = build_and_project(
                self.builder,
                effect.implementing_type(),
                "Effect",
                |instance| effect.project(instance),
            )?;
            staged.effects.push(instance);
        }
        for method in &scan_result.effect_methods {
            staged.effects.push(wrap_effect_method(self.builder, method)?);
        }

        // 功能
        let mut features = Vec::with_capacity(scan_result.feature_classes.len());
        for feature in &scan_result.feature_classes {
            features.push(build_and_project(
                self.builder,
                feature.implementing_type(),
                "Feature",
                |instance| feature.project(instance),
            )?);
        }

        let groups = group_reducers(scan_result);
        let feature_states: HashSet<TypeKey> =
            features.iter().map(|feature| feature.state_type()).collect();
        let mut unmatched: Vec<_> = groups
            .iter()
            .filter(|(state_type, _)| !feature_states.contains(*state_type))
            .collect();
        unmatched.sort_by_key(|(state_type, _)| **state_type);
        for (state_type, group) in unmatched {
            staged.unmatched_reducers += group.len();
            if self.options.strict_reducer_matching {
                let type_name = group
                    .classes
                    .first()
                    .map(|reducer| reducer.implementing_type().name().to_string())
                    .or_else(|| {
                        group.methods.first().map(|method| {
                            format!("{}::{}", method.declaring_type().name(), method.method_name())
                        })
                    })
                    .unwrap_or_default();
                return Err(LoadError::UnmatchedReducer {
                    type_name,
                    state_type: state_type.name().to_string(),
                });
            }
            debug!(
                "状态形态 {} 没有对应的功能，忽略 {} 个状态变更处理器",
                state_type.name(),
                group.len()
            );
        }

        // 处理器附加完成后功能才进入待注册列表
        for mut feature in features {
            if let Some(group) = groups.get(&feature.state_type()) {
                for reducer in &group.classes {
                    let handler = build_and_project(
                        self.builder,
                        reducer.implementing_type(),
                        "ReducerHandler",
                        |instance| reducer.project(instance),
                    )?;
                    feature.add_reducer(handler);
                    staged.reducers += 1;
                }
                for method in &group.methods {
                    feature.add_reducer(wrap_reducer_method(self.builder, method)?);
                    staged.reducers += 1;
                }
            }
            debug!(
                "功能已组装: {}，处理器 {} 个",
                feature.name(),
                feature.reducers().len()
            );
            staged.features.push(feature);
        }

        // 中间件：显式请求的在前，同一类型只构建一次
        let mut seen = HashSet::new();
        for middleware in &scan_result.middlewares {
            let middleware_type = middleware.middleware_type();
            if !seen.insert(middleware_type.type_key()) {
                debug!("中间件重复，跳过: {}", middleware_type.type_key().name());
                continue;
            }
            staged.middlewares.push(build_and_project(
                self.builder,
                middleware_type.type_key(),
                "Middleware",
                |instance| middleware_type.project(instance),
            )?);
        }

        Ok(staged)
    }
}

fn group_reducers(scan_result: &ScanResult) -> HashMap<TypeKey, ReducerGroup<'_>> {
    let mut groups: HashMap<TypeKey, ReducerGroup<'_>> = HashMap::new();
    for reducer in &scan_result.reducer_classes {
        groups
            .entry(reducer.state_type())
            .or_default()
            .classes
            .push(reducer);
    }
    for method in &scan_result.reducer_methods {
        groups
            .entry(method.state_type())
            .or_default()
            .methods
            .push(method);
    }
    groups
}

fn commit(store: &mut dyn Store, staged: Staged) -> WiringSummary {
    let summary = WiringSummary {
        effects: staged.effects.len(),
        features: staged.features.len(),
        reducers: staged.reducers,
        unmatched_reducers: staged.unmatched_reducers,
        middlewares: staged.middlewares.len(),
    };

    for effect in staged.effects {
        store.add_effect(effect);
    }
    for feature in staged.features {
        store.add_feature(feature);
    }
    for middleware in staged.middlewares {
        store.add_middleware(middleware);
    }

    if summary.unmatched_reducers > 0 {
        warn!(
            "{} 个状态变更处理器没有匹配的功能",
            summary.unmatched_reducers
        );
    }
    info!(
        "装配完成: 副作用处理器 {} 个，功能 {} 个，状态变更处理器 {} 个，中间件 {} 个",
        summary.effects, summary.features, summary.reducers, summary.middlewares
    );
    summary
}

fn log_discoveries(scan_result: &ScanResult) {
    for feature in &scan_result.feature_classes {
        debug!("发现功能: {}", feature.implementing_type().name());
    }
    for reducer in &scan_result.reducer_classes {
        debug!(
            "发现状态变更处理器: {} -> {}",
            reducer.implementing_type().name(),
            reducer.state_type().short_name()
        );
    }
    for method in &scan_result.reducer_methods {
        debug!(
            "发现状态变更方法: {}::{} -> {}",
            method.declaring_type().name(),
            method.method_name(),
            method.state_type().short_name()
        );
    }
    for effect in &scan_result.effect_classes {
        debug!("发现副作用处理器: {}", effect.implementing_type().name());
    }
    for method in &scan_result.effect_methods {
        debug!(
            "发现副作用方法: {}::{}",
            method.declaring_type().name(),
            method.method_name()
        );
    }
    for middleware in &scan_result.middlewares {
        debug!(
            "发现中间件: {} (自动加载: {})",
            middleware.implementing_type().name(),
            middleware.is_auto_loaded()
        );
    }
}
