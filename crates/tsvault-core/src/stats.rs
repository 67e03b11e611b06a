//! Streaming summary statistics over one field.
//!
//! Everything is accumulated in a single pass at full `f64` precision.
//! The second moment uses Welford's update, so no prior result set needs
//! to be materialized. Rounding to two decimals happens only in
//! [`Stats::summary`].
//!
//! Variance is the population variance (divide by `count`, not `count - 1`).

use serde::Serialize;

use crate::error::{Result, TsVaultError};
use crate::model::{Field, Measurement};

/// Full-precision statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub count: u64,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub variance: f64,
    pub std_dev: f64,
}

/// Presentation form: each value rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    #[serde(rename = "stdDev")]
    pub std_dev: f64,
}

impl Stats {
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            avg: round2(self.mean),
            min: round2(self.min),
            max: round2(self.max),
            std_dev: round2(self.std_dev),
        }
    }
}

/// Round half away from zero to two decimal places. Never yields `-0.0`.
pub fn round2(v: f64) -> f64 {
    let r = (v * 100.0).round() / 100.0;
    if r == 0.0 {
        0.0
    } else {
        r
    }
}

/// Single-pass accumulator.
#[derive(Debug, Clone, Copy)]
pub struct StatsAccumulator {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    running_mean: f64,
    m2: f64,
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            running_mean: 0.0,
            m2: 0.0,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);

        let delta = value - self.running_mean;
        self.running_mean += delta / self.count as f64;
        self.m2 += delta * (value - self.running_mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Finish. Zero observations is [`TsVaultError::EmptyResult`], which is
    /// distinct from a valid all-zero dataset.
    pub fn finish(&self) -> Result<Stats> {
        if self.count == 0 {
            return Err(TsVaultError::EmptyResult);
        }
        let n = self.count as f64;
        // Clamp tiny negative drift from cancellation.
        let variance = (self.m2 / n).max(0.0);
        Ok(Stats {
            count: self.count,
            sum: self.sum,
            mean: self.sum / n,
            min: self.min,
            max: self.max,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}

/// Aggregate `field` over `records` in one pass.
pub fn aggregate<'a, I>(records: I, field: Field) -> Result<Stats>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    let mut acc = StatsAccumulator::new();
    for m in records {
        acc.push(field.value(m));
    }
    acc.finish()
}
