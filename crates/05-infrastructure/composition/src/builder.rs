//! 模块加载器构建器

use crate::component_scanner::CatalogScanner;
use crate::loader::ModuleLoader;
use crate::options::LoaderOptions;
use di_impl::{ServiceContainer, ServiceContainerBuilder};
use std::sync::Arc;
use store_abstractions::DeclarationCatalog;
use tracing::{info, warn};

/// 模块加载器构建器
///
/// 使用建造者模式组装扫描器、服务容器和加载器选项
pub struct ModuleLoaderBuilder {
    /// 声明目录，默认使用全局目录
    catalog: Option<Arc<DeclarationCatalog>>,
    /// 服务容器构建器
    services: ServiceContainerBuilder,
    /// 加载器选项
    options: LoaderOptions,
    /// 日志配置，设置后在构建时初始化日志
    logging_config: Option<LoggingConfig>,
}

impl ModuleLoaderBuilder {
    pub fn new() -> Self {
        Self {
            catalog: None,
            services: ServiceContainer::builder(),
            options: LoaderOptions::default(),
            logging_config: None,
        }
    }

    /// 注册构建块及其依赖的构建方式
    pub fn configure_services<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(ServiceContainerBuilder) -> ServiceContainerBuilder,
    {
        self.services = configure(self.services);
        self
    }

    /// 使用指定的声明目录
    pub fn with_catalog(mut self, catalog: Arc<DeclarationCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    /// 在构建时初始化日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self
    }

    /// 构建模块加载器
    pub fn build(self) -> ModuleLoader<CatalogScanner, ServiceContainer> {
        // 只有在明确配置了日志时才初始化日志
        if let Some(logging_config) = &self.logging_config {
            if let Err(e) = logging_config.init() {
                warn!("日志初始化失败: {}", e);
            }
        }

        let scanner = match self.catalog {
            Some(catalog) => CatalogScanner::new(catalog),
            None => CatalogScanner::global(),
        };
        let container = self
            .services
            .max_resolution_depth(self.options.max_resolution_depth)
            .build();

        info!("模块加载器构建完成");
        ModuleLoader::with_options(scanner, container, self.options)
    }
}

impl Default for ModuleLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 初始化全局日志订阅者
    ///
    /// `RUST_LOG` 存在时优先于配置的日志级别。
    pub fn init(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(self.level.as_str().to_lowercase()));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }?;

        info!("日志系统初始化完成");
        Ok(())
    }
}
