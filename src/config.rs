use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crop::CropCoefficients;
use crate::error::SimError;
use crate::sampler::PerturbationRanges;
use crate::soil::SoilTable;
use crate::stats::EnsembleBand;

// Allowed Monte Carlo trial counts per candidate
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for ScenarioBounds {
    fn default() -> Self {
        ScenarioBounds { min: 50, max: 300 }
    }
}

impl ScenarioBounds {
    pub fn clamp(&self, requested: usize) -> usize {
        requested.clamp(self.min, self.max)
    }
}

// Engine tuning. Every field defaults to the reference model, so an empty TOML document is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub candidates_mm: Vec<f64>, // Day-1 irrigation amounts under evaluation [mm]
    pub scenarios: ScenarioBounds,
    pub perturbation: PerturbationRanges,
    pub soils: SoilTable,
    pub crop_coefficients: CropCoefficients,
    pub ensemble_band: EnsembleBand,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            candidates_mm: vec![0.0, 5.0, 10.0, 15.0],
            scenarios: ScenarioBounds::default(),
            perturbation: PerturbationRanges::default(),
            soils: SoilTable::default(),
            crop_coefficients: CropCoefficients::default(),
            ensemble_band: EnsembleBand::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, SimError> {
        let mut config: EngineConfig = toml::from_str(toml_str)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let toml_str = fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    // Candidates are evaluated in ascending order without repeats
    fn normalize(&mut self) {
        self.candidates_mm.sort_by(|a, b| a.total_cmp(b));
        self.candidates_mm.dedup();
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.candidates_mm.is_empty() {
            return Err(SimError::config("at least one irrigation candidate is required"));
        }
        if let Some(bad) = self
            .candidates_mm
            .iter()
            .find(|c| !(c.is_finite() && **c >= 0.0))
        {
            return Err(SimError::config(format!(
                "irrigation candidates must be non-negative, got {}",
                bad
            )));
        }
        if !self.candidates_mm.is_sorted() {
            return Err(SimError::config("irrigation candidates must be ascending"));
        }
        if self.scenarios.min == 0 || self.scenarios.min > self.scenarios.max {
            return Err(SimError::config(format!(
                "scenario bounds need 1 <= min <= max, got [{}, {}]",
                self.scenarios.min, self.scenarios.max
            )));
        }
        let band = self.ensemble_band;
        if !(0.0 <= band.lower && band.lower <= band.upper && band.upper <= 1.0) {
            return Err(SimError::config(format!(
                "ensemble band needs 0 <= lower <= upper <= 1, got [{}, {}]",
                band.lower, band.upper
            )));
        }
        self.perturbation.validate()?;
        self.soils.validate()?;
        self.crop_coefficients.validate()?;
        Ok(())
    }
}
