//! 错误类型定义

use thiserror::Error;

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("依赖解析深度超出限制: {type_name}, 最大深度: {max_depth}")]
    ResolutionDepthExceeded { type_name: String, max_depth: usize },

    #[error("组件类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl DependencyError {
    /// 创建组件未注册错误
    pub fn not_registered(type_name: impl Into<String>) -> Self {
        Self::ComponentNotRegistered {
            type_name: type_name.into(),
        }
    }

    /// 用任意错误创建组件创建失败错误
    pub fn creation_failed<E>(type_name: impl Into<String>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }
}

/// 组件扫描错误类型
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("组件扫描失败: {message}")]
    ScanFailed { message: String },

    #[error("扫描模块无效: {module}, 原因: {message}")]
    InvalidModule { module: String, message: String },
}

impl ScanError {
    /// 创建扫描错误
    pub fn scan_failed(message: impl Into<String>) -> Self {
        Self::ScanFailed {
            message: message.into(),
        }
    }
}

/// 模块加载错误类型
///
/// 任何一种错误都会中止整个加载过程，不会报告部分成功。
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("加载参数无效: {message}")]
    InvalidInput { message: String },

    #[error("组件构建失败: {type_name}, 原因: {source}")]
    Construction {
        type_name: String,
        source: DependencyError,
    },

    #[error("组件能力不匹配: {type_name} 无法作为 {capability} 使用")]
    CapabilityMismatch {
        type_name: String,
        capability: String,
    },

    #[error("扫描失败: {source}")]
    Scan {
        #[from]
        source: ScanError,
    },

    #[error("状态处理器没有匹配的功能: {type_name}, 目标状态: {state_type}")]
    UnmatchedReducer {
        type_name: String,
        state_type: String,
    },
}

impl LoadError {
    /// 创建参数无效错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 创建能力不匹配错误
    pub fn capability_mismatch(type_name: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::CapabilityMismatch {
            type_name: type_name.into(),
            capability: capability.into(),
        }
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 结果类型别名
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type LoadResult<T> = Result<T, LoadError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
