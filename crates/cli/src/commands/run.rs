//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::{EngineConfig, EvaluationReport, Verdict};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig, PipelineStats, RecordingSource};

/// Execute the `run` command
///
/// Fails when any associated pair changed identifier.
pub fn run_pipeline(args: &RunArgs) -> Result<()> {
    let engine = load_engine_config(args)?;

    let source = match (&args.recording, args.mock) {
        (Some(path), _) => RecordingSource::File(path.clone()),
        (None, Some(class)) => RecordingSource::Mock(class.into()),
        (None, None) => anyhow::bail!("either --recording or --mock is required"),
    };

    info!(
        source = ?source,
        strategy = ?engine.matching.strategy,
        reference_point = ?engine.matching.reference_point,
        tolerance_us = engine.sync.tolerance_us,
        "Configuration loaded"
    );

    let pipeline = Pipeline::new(PipelineConfig { engine, source });
    let (report, stats): (EvaluationReport, PipelineStats) = pipeline.run()?;

    if let Some(ref output) = args.output {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        std::fs::write(output, json)
            .map_err(CliError::from)
            .with_context(|| format!("Failed to write report to {}", output.display()))?;
        info!(path = %output.display(), "Report written");
    }

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print_report(&report);
        stats.print_summary();
    }

    match report.verdict() {
        Verdict::Failed => Err(CliError::id_maintenance_failed(
            report.object_class,
            report.total_failures(),
            report.total_checks(),
        )
        .into()),
        Verdict::NotEvaluated => {
            warn!("No associated pair was checked");
            Ok(())
        }
        Verdict::Passed => Ok(()),
    }
}

/// Load the engine configuration and apply CLI overrides
fn load_engine_config(args: &RunArgs) -> Result<EngineConfig> {
    let mut engine = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()).into());
            }
            config_loader::ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(strategy) = args.strategy {
        info!(strategy = ?strategy, "Overriding matching strategy from CLI");
        engine.matching.strategy = strategy.into();
    }
    if let Some(tolerance_us) = args.tolerance_us {
        info!(tolerance_us, "Overriding sync tolerance from CLI");
        engine.sync.tolerance_us = tolerance_us;
    }

    config_loader::ConfigLoader::validate(&engine).context("Invalid configuration")?;
    Ok(engine)
}

fn print_report(report: &EvaluationReport) {
    println!("\n=== ID Maintenance Report ===\n");
    println!("Recording: {}", report.recording);
    println!("Class: {} (radius {:.2} m)", report.object_class, report.radius);

    let failures: Vec<_> = report
        .cycles
        .iter()
        .flat_map(|c| c.failures().map(move |f| (c, f)))
        .collect();

    if !failures.is_empty() {
        println!("\nIdentifier changes ({}):", failures.len());
        for (cycle, failed) in failures {
            println!(
                "   ├─ cycle {} (t={}): prev[{}] id {} -> cur[{}] id {} at {:.3} m",
                cycle.index,
                cycle.t_cur,
                failed.prev_index,
                failed.previous_id,
                failed.cur_index,
                failed.current_id,
                failed.distance
            );
        }
    }

    let verdict = match report.verdict() {
        Verdict::Passed => "PASSED",
        Verdict::Failed => "FAILED",
        Verdict::NotEvaluated => "NOT EVALUATED",
    };
    println!("\nVerdict: {}", verdict);
}
