//! Pipeline statistics.

use std::time::Duration;

use observability::AssociationMetricsAggregator;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Wall time of the evaluation
    pub duration: Duration,

    /// Primary cycles in the recording
    pub cycles: usize,

    /// Objects over all primary cycles
    pub objects: usize,

    /// Camera timeframes over all cameras
    pub camera_frames: usize,

    /// Association metrics aggregator
    pub metrics: AssociationMetricsAggregator,
}

impl PipelineStats {
    /// Cycle pairs evaluated per second
    pub fn cycles_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.metrics.total_cycles as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Pipeline Statistics ===\n");
        println!("Overview");
        println!("   ├─ Duration: {:.3}s", self.duration.as_secs_f64());
        println!("   ├─ Cycles: {}", self.cycles);
        println!("   ├─ Objects: {}", self.objects);
        println!("   ├─ Camera frames: {}", self.camera_frames);
        println!("   └─ Cycle pairs/s: {:.1}", self.cycles_per_sec());
        println!();
        print!("{}", self.metrics.summary());
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_with_zero_duration() {
        let stats = PipelineStats::default();
        assert_eq!(stats.cycles_per_sec(), 0.0);
    }

    #[test]
    fn test_rate() {
        let mut stats = PipelineStats {
            duration: Duration::from_millis(500),
            ..Default::default()
        };
        stats.metrics.total_cycles = 10;
        assert!((stats.cycles_per_sec() - 20.0).abs() < 1e-9);
    }
}
