//! # Observability
//!
//! ID 保持评估的日志与指标。
//!
//! ## 功能
//!
//! - Tracing 初始化：JSON 或 Pretty 输出，日志级别由 `-v`/`-q` 决定，
//!   仅作用于引擎相关 crate
//! - 可选的 Prometheus 指标端点
//! - 评估报告指标收集与统计 ([`metrics`])
//!
//! ## 使用示例
//!
//! ```ignore
//! use observability::{ObservabilityConfig, Verbosity};
//!
//! observability::init(&ObservabilityConfig {
//!     verbosity: Verbosity::from_flags(false, 1),
//!     ..Default::default()
//! })?;
//!
//! let report = evaluator.evaluate(&recording, &motion);
//! observability::record_evaluation_metrics(&report);
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use crate::metrics::{
    record_evaluation_metrics, AssociationMetricsAggregator, MetricsSummary, RunningStats,
    StatsSummary,
};

/// Crates whose spans and events follow the chosen verbosity
const ENGINE_TARGETS: [&str; 7] = [
    "association",
    "sync_engine",
    "ego_motion",
    "ingestion",
    "config_loader",
    "observability",
    "idtrack",
];

/// 日志输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, for log collection
    Json,
    /// Human-readable multi-line output
    #[default]
    Pretty,
}

/// Log level chosen on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Warnings and errors only; ID failures are still reported
    Quiet,
    /// Per-recording summaries
    #[default]
    Normal,
    /// Per-cycle association details
    Debug,
    /// Window selection, merge and motion lookups
    Trace,
}

impl Verbosity {
    /// `quiet` wins over any number of `-v`
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, 1) => Verbosity::Debug,
            (false, _) => Verbosity::Trace,
        }
    }

    pub fn level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }

    /// Filter directive: dependencies stay at `warn`, engine crates at
    /// [`Self::level`]
    pub fn directive(self) -> String {
        let level = self.level();
        std::iter::once("warn".to_string())
            .chain(ENGINE_TARGETS.iter().map(|target| format!("{target}={level}")))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    pub verbosity: Verbosity,
    /// Prometheus 端口 (None = 禁用)
    pub metrics_port: Option<u16>,
}

/// Install the global subscriber and, if configured, the Prometheus recorder
///
/// `RUST_LOG` overrides the verbosity directive when set.
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.directive()));

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    if let Some(port) = config.metrics_port {
        PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], port))
            .install()
            .context("Failed to install Prometheus recorder")?;

        tracing::info!(port, "Prometheus metrics endpoint initialized");
    }

    tracing::debug!(
        log_format = ?config.log_format,
        verbosity = ?config.verbosity,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}
