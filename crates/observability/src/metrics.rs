//! 关联评估指标收集模块
//!
//! 基于 CycleReport / EvaluationReport 收集和统计 ID 保持评估的运行指标。

use std::collections::BTreeMap;

use contracts::{CameraId, CycleOutcome, CycleReport, EvaluationReport, Verdict};
use metrics::{counter, gauge};

/// 从 EvaluationReport 记录整次评估的指标
///
/// 每个周期的计数器由 association 在评估过程中记录，这里只记录汇总值。
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_evaluation_metrics;
///
/// let report = evaluator.evaluate(&recording, &motion);
/// record_evaluation_metrics(&report);
/// ```
pub fn record_evaluation_metrics(report: &EvaluationReport) {
    let class = report.object_class.as_str();
    let verdict = match report.verdict() {
        Verdict::Passed => "passed",
        Verdict::Failed => "failed",
        Verdict::NotEvaluated => "not_evaluated",
    };

    counter!(
        "idtrack_evaluations_total",
        "verdict" => verdict,
        "class" => class
    )
    .increment(1);

    gauge!("idtrack_last_evaluated_cycles", "class" => class).set(report.evaluated_cycles() as f64);
    gauge!("idtrack_last_skipped_cycles", "class" => class).set(report.skipped_cycles() as f64);
    gauge!("idtrack_last_id_failures", "class" => class).set(report.total_failures() as f64);
}

/// 关联指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct AssociationMetricsAggregator {
    /// 周期对总数
    pub total_cycles: u64,

    /// 已评估周期数
    pub evaluated_cycles: u64,

    /// 各原因跳过次数
    pub skipped: BTreeMap<&'static str, u64>,

    /// ID 检查总数
    pub total_checks: u64,

    /// ID 变化次数
    pub total_failures: u64,

    /// 被相机候选修正的目标数
    pub total_merged: u64,

    /// 匹配距离统计 (m)
    pub distance_stats: RunningStats,

    /// 每周期匹配数统计
    pub matches_per_cycle: RunningStats,

    /// 各相机缺失次数
    pub missing_counts: BTreeMap<CameraId, u64>,
}

impl AssociationMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 由完整报告构建
    pub fn from_report(report: &EvaluationReport) -> Self {
        let mut aggregator = Self::new();
        for cycle in &report.cycles {
            aggregator.update(cycle);
        }
        aggregator
    }

    /// 更新聚合统计
    pub fn update(&mut self, cycle: &CycleReport) {
        self.total_cycles += 1;

        match &cycle.outcome {
            CycleOutcome::Evaluated {
                checks,
                merged,
                missing_cameras,
            } => {
                self.evaluated_cycles += 1;
                self.total_merged += *merged as u64;
                self.total_checks += checks.len() as u64;
                self.matches_per_cycle.push(checks.len() as f64);

                for check in checks {
                    if !check.passed {
                        self.total_failures += 1;
                    }
                    self.distance_stats.push(check.distance);
                }

                for camera in missing_cameras {
                    *self.missing_counts.entry(*camera).or_insert(0) += 1;
                }
            }
            CycleOutcome::Skipped { reason } => {
                *self.skipped.entry(reason.as_str()).or_insert(0) += 1;
            }
        }
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_cycles: self.total_cycles,
            evaluated_cycles: self.evaluated_cycles,
            skipped: self.skipped.clone(),
            total_checks: self.total_checks,
            total_failures: self.total_failures,
            total_merged: self.total_merged,
            pass_rate: if self.total_checks > 0 {
                (self.total_checks - self.total_failures) as f64 / self.total_checks as f64
                    * 100.0
            } else {
                0.0
            },
            match_distance_m: StatsSummary::from(&self.distance_stats),
            matches_per_cycle: StatsSummary::from(&self.matches_per_cycle),
            camera_missing_counts: self.missing_counts.clone(),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_cycles: u64,
    pub evaluated_cycles: u64,
    pub skipped: BTreeMap<&'static str, u64>,
    pub total_checks: u64,
    pub total_failures: u64,
    pub total_merged: u64,
    pub pass_rate: f64,
    pub match_distance_m: StatsSummary,
    pub matches_per_cycle: StatsSummary,
    pub camera_missing_counts: BTreeMap<CameraId, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== ID Maintenance Summary ===")?;
        writeln!(
            f,
            "Cycle pairs: {} ({} evaluated)",
            self.total_cycles, self.evaluated_cycles
        )?;
        for (reason, count) in &self.skipped {
            writeln!(f, "  skipped ({}): {}", reason, count)?;
        }
        writeln!(
            f,
            "ID checks: {} ({} failed, {:.2}% passed)",
            self.total_checks, self.total_failures, self.pass_rate
        )?;
        writeln!(f, "Camera-refined objects: {}", self.total_merged)?;
        writeln!(f, "Match distance (m): {}", self.match_distance_m)?;
        writeln!(f, "Matches per cycle: {}", self.matches_per_cycle)?;

        if !self.camera_missing_counts.is_empty() {
            writeln!(f, "Missing camera counts:")?;
            for (camera, count) in &self.camera_missing_counts {
                writeln!(f, "  {}: {}", camera, count)?;
            }
        }

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 样本方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
