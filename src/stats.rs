use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::forecast::ForecastWeek;
use crate::units::clamp;

// Per-day ensemble summary of moisture percent
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    pub day: usize, // 1-based day of the forecast week
    pub mean: f64,
    pub p10: f64,
    pub p90: f64,
    pub rain: f64, // Nominal forecast rain [mm]
}

// Lower and upper band of the ensemble, as probabilities in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleBand {
    pub lower: f64,
    pub upper: f64,
}

impl Default for EnsembleBand {
    fn default() -> Self {
        EnsembleBand {
            lower: 0.1,
            upper: 0.9,
        }
    }
}

/**
Linearly interpolated order statistic of an ascending sample.

`p` is clamped to [0, 1]; `p = 0` gives the minimum and `p = 1` the maximum.
An empty sample yields 0.
*/
pub fn quantile(sorted_asc: &[f64], p: f64) -> f64 {
    if sorted_asc.is_empty() {
        return 0.0;
    }
    let p = clamp(p, 0.0, 1.0);
    let idx = (sorted_asc.len() - 1) as f64 * p;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return sorted_asc[lo];
    }
    let w = idx - lo as f64;
    sorted_asc[lo] * (1.0 - w) + sorted_asc[hi] * w
}

// Collapse trial trajectories (rows = trials, columns = days) into one chart point per day
pub fn summarize_ensemble(
    trajectories: &DMatrix<f64>,
    forecast: &ForecastWeek,
    band: EnsembleBand,
) -> Vec<ChartPoint> {
    let n = trajectories.nrows();
    trajectories
        .column_iter()
        .enumerate()
        .map(|(day, column)| {
            let mut values: Vec<f64> = column.iter().copied().collect();
            values.sort_by(|a, b| a.total_cmp(b));
            let mean = if n == 0 { 0.0 } else { column.sum() / n as f64 };
            ChartPoint {
                day: day + 1,
                mean,
                p10: quantile(&values, band.lower),
                p90: quantile(&values, band.upper),
                rain: forecast.rain_mm.get(day).copied().unwrap_or(0.0),
            }
        })
        .collect()
}
