//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{CameraId, EngineConfig, ObjectClass, Recording};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration and recording info for JSON output
#[derive(Serialize)]
struct Info {
    config: EngineConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    recording: Option<RecordingInfo>,
}

#[derive(Serialize)]
struct RecordingInfo {
    name: String,
    object_class: ObjectClass,
    radius: f64,
    cycles: usize,
    objects: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_span_us: Option<(u64, u64)>,
    odometry_samples: usize,
    cameras: Vec<CameraInfo>,
}

#[derive(Serialize)]
struct CameraInfo {
    camera: CameraId,
    frames: usize,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration info");
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            config_loader::ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let recording = match &args.recording {
        Some(path) => Some(
            ingestion::RecordingReader::load_from_path(path)
                .with_context(|| format!("Failed to load recording from {}", path.display()))?,
        ),
        None => None,
    };

    let info = build_info(config, recording.as_ref());

    if args.json {
        let json = serde_json::to_string_pretty(&info).context("Failed to serialize info")?;
        println!("{}", json);
    } else {
        print_info(&info);
    }

    Ok(())
}

fn build_info(config: EngineConfig, recording: Option<&Recording>) -> Info {
    let recording = recording.map(|rec| RecordingInfo {
        name: rec.name.clone(),
        object_class: rec.object_class,
        radius: config.radii.for_class(rec.object_class),
        cycles: rec.cycles.len(),
        objects: rec.object_count(),
        time_span_us: rec.time_span(),
        odometry_samples: rec.odometry.len(),
        cameras: rec
            .sensor_frames
            .iter()
            .map(|(camera, frames)| CameraInfo {
                camera,
                frames: frames.len(),
            })
            .collect(),
    });

    Info { config, recording }
}

fn print_info(info: &Info) {
    let config = &info.config;

    println!("=== idtrack configuration ===\n");

    println!("Radii (m)");
    for (i, class) in ObjectClass::ALL.iter().enumerate() {
        let prefix = if i == ObjectClass::ALL.len() - 1 {
            "└─"
        } else {
            "├─"
        };
        println!("   {} {}: {:.2}", prefix, class, config.radii.for_class(*class));
    }

    println!("\nMatching");
    println!("   ├─ Strategy: {:?}", config.matching.strategy);
    println!("   ├─ Reference point: {:?}", config.matching.reference_point);
    println!("   └─ Camera window tolerance: {} us", config.sync.tolerance_us);

    if let Some(ref rec) = info.recording {
        println!("\nRecording: {}", rec.name);
        println!("   ├─ Class: {} (radius {:.2} m)", rec.object_class, rec.radius);
        println!("   ├─ Cycles: {}", rec.cycles);
        println!("   ├─ Objects: {}", rec.objects);
        match rec.time_span_us {
            Some((start, end)) => println!("   ├─ Time span: {} .. {} us", start, end),
            None => println!("   ├─ Time span: (empty)"),
        }
        println!("   ├─ Odometry samples: {}", rec.odometry_samples);
        println!("   └─ Camera frames:");
        for camera in &rec.cameras {
            println!("        {}: {}", camera.camera, camera.frames);
        }
    }

    println!();
}
