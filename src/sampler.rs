use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::soil::SoilParams;

// Closed multiplicative range [low, high] applied to a nominal value
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorRange {
    pub low: f64,
    pub high: f64,
}

impl FactorRange {
    pub const fn new(low: f64, high: f64) -> Self {
        FactorRange { low, high }
    }

    pub(crate) fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.low..=self.high)
    }

    fn validate(&self, name: &str) -> Result<(), SimError> {
        if self.low.is_finite() && self.high.is_finite() && 0.0 <= self.low && self.low <= self.high {
            Ok(())
        } else {
            Err(SimError::config(format!(
                "{} perturbation needs 0 <= low <= high, got [{}, {}]",
                name, self.low, self.high
            )))
        }
    }
}

// Uncertainty envelope for one Monte Carlo trial
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerturbationRanges {
    pub field_capacity: FactorRange,
    pub wilting_point: FactorRange,
    pub rain: FactorRange,
    pub et0: FactorRange,
    pub bucket_margin_mm: f64, // Minimum fc - wp gap kept after perturbation [mm]
}

impl Default for PerturbationRanges {
    fn default() -> Self {
        PerturbationRanges {
            field_capacity: FactorRange::new(0.95, 1.05),
            wilting_point: FactorRange::new(0.95, 1.05),
            rain: FactorRange::new(0.7, 1.3),
            et0: FactorRange::new(0.85, 1.15),
            bucket_margin_mm: 1e-6,
        }
    }
}

impl PerturbationRanges {
    pub fn validate(&self) -> Result<(), SimError> {
        self.field_capacity.validate("field capacity")?;
        self.wilting_point.validate("wilting point")?;
        self.rain.validate("rain")?;
        self.et0.validate("et0")?;
        if !(self.bucket_margin_mm > 0.0 && self.bucket_margin_mm.is_finite()) {
            return Err(SimError::config(format!(
                "bucket margin must be positive, got {}",
                self.bucket_margin_mm
            )));
        }
        Ok(())
    }
}

// Perturbed bucket for one trial, shared by all of its days
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialSoil {
    pub field_capacity_mm: f64,
    pub wilting_point_mm: f64,
}

// Perturbed weather for one day of one trial
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayWeather {
    pub rain_mm: f64,
    pub et0_mm: f64,
}

pub struct ScenarioSampler<'a> {
    ranges: &'a PerturbationRanges,
}

impl<'a> ScenarioSampler<'a> {
    pub fn new(ranges: &'a PerturbationRanges) -> Self {
        ScenarioSampler { ranges }
    }

    pub fn sample_soil<R: Rng + ?Sized>(&self, soil: &SoilParams, rng: &mut R) -> TrialSoil {
        let fc = soil.field_capacity_mm * self.ranges.field_capacity.draw(rng);
        let wp = soil.wilting_point_mm * self.ranges.wilting_point.draw(rng);
        separate_bucket(fc, wp, self.ranges.bucket_margin_mm)
    }

    pub fn sample_day<R: Rng + ?Sized>(&self, rain_mm: f64, et0_mm: f64, rng: &mut R) -> DayWeather {
        DayWeather {
            rain_mm: rain_mm * self.ranges.rain.draw(rng),
            et0_mm: et0_mm * self.ranges.et0.draw(rng),
        }
    }
}

// Push fc and wp apart so that fc - wp >= margin
pub(crate) fn separate_bucket(fc: f64, wp: f64, margin: f64) -> TrialSoil {
    let fc_safe = fc.max(wp + margin);
    let wp_safe = wp.min(fc_safe - margin);
    TrialSoil {
        field_capacity_mm: fc_safe,
        wilting_point_mm: wp_safe,
    }
}
