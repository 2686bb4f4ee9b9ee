//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{EngineConfig, MatchingStrategy, ObjectClass};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    strategy: String,
    reference_point: String,
    tolerance_us: u64,
    min_radius: f64,
    max_radius: f64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            let radii = ObjectClass::ALL.map(|c| config.radii.for_class(c));

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    strategy: format!("{:?}", config.matching.strategy),
                    reference_point: format!("{:?}", config.matching.reference_point),
                    tolerance_us: config.sync.tolerance_us,
                    min_radius: radii.iter().copied().fold(f64::INFINITY, f64::min),
                    max_radius: radii.iter().copied().fold(0.0, f64::max),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &EngineConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    for class in ObjectClass::ALL {
        let radius = config.radii.for_class(class);
        if radius > 5.0 {
            warnings.push(format!(
                "radii.{class} = {radius} m is large; neighbouring objects may be confused"
            ));
        }
    }

    if config.matching.strategy == MatchingStrategy::FirstWithinRadius {
        warnings.push(
            "first_within_radius depends on object order; a closer pair may be left unmatched"
                .to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Strategy: {}", summary.strategy);
            println!("  Reference point: {}", summary.reference_point);
            println!("  Tolerance: {} us", summary.tolerance_us);
            println!(
                "  Radii: {:.2} .. {:.2} m",
                summary.min_radius, summary.max_radius
            );
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_valid_config() {
        let file = write_config("[radii]\ndelimiter = 0.8\n");
        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        };
        let result = validate_config(&args);
        assert!(result.valid);
        assert_eq!(result.summary.unwrap().min_radius, 0.5);
    }

    #[test]
    fn test_invalid_config() {
        let file = write_config("[radii]\ndelimiter = 0.0\n");
        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        };
        assert!(run_validate(&args).is_err());
    }

    #[test]
    fn test_warnings() {
        let mut config = EngineConfig::default();
        config.radii.stop_line = 8.0;
        config.matching.strategy = MatchingStrategy::FirstWithinRadius;
        assert_eq!(collect_warnings(&config).len(), 2);
        assert!(collect_warnings(&EngineConfig::default()).is_empty());
    }
}
