//! 加载器选项

use infrastructure_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "STORE_LOADER";

/// 模块加载器选项
///
/// 可以从配置文件和 `STORE_LOADER_` 前缀的环境变量加载，
/// 嵌套键使用 `__` 分隔。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// 没有匹配功能的状态变更处理器是否视为错误
    pub strict_reducer_matching: bool,
    /// 是否为每个发现的构建块输出调试日志
    pub log_discoveries: bool,
    /// 对象构建时的最大依赖解析深度
    pub max_resolution_depth: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            strict_reducer_matching: false,
            log_discoveries: true,
            max_resolution_depth: 64,
        }
    }
}

impl LoaderOptions {
    /// 严格匹配模式
    pub fn strict() -> Self {
        Self {
            strict_reducer_matching: true,
            ..Self::default()
        }
    }

    /// 从可选配置文件和默认前缀的环境变量加载
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// 从可选配置文件和指定前缀的环境变量加载
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("加载器配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                error!("加载器配置构建失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        let options: Self = settings.try_deserialize().map_err(|e| {
            error!("加载器配置绑定失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;
        options.validate()?;

        debug!("加载器配置: {:?}", options);
        Ok(options)
    }

    /// 验证选项
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}
