//! # idtrack CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - Recording 加载与 ID 保持评估
//! - 评估失败时以非零状态退出

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::{ObservabilityConfig, Verbosity};
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_pipeline, run_validate};

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging based on CLI options
    init_observability(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "idtrack starting");

    let result = match &cli.command {
        Commands::Run(args) => run_pipeline(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging and, for `run`, the optional metrics endpoint
fn init_observability(cli: &Cli) -> Result<()> {
    let metrics_port = match &cli.command {
        Commands::Run(args) if args.metrics_port != 0 => Some(args.metrics_port),
        _ => None,
    };

    observability::init(&ObservabilityConfig {
        log_format: cli.log_format.into(),
        verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
        metrics_port,
    })
}
