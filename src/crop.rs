use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

// Growth stage, drives crop water demand through Kc
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropStage {
    Low,
    Medium,
    High,
}

impl FromStr for CropStage {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(CropStage::Low),
            "medium" | "mid" => Ok(CropStage::Medium),
            "high" => Ok(CropStage::High),
            other => Err(SimError::config(format!("unknown crop stage '{}'", other))),
        }
    }
}

impl fmt::Display for CropStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CropStage::Low => "Low",
            CropStage::Medium => "Medium",
            CropStage::High => "High",
        };
        f.write_str(name)
    }
}

// Crop coefficients per stage [-], multiply reference ET0
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropCoefficients {
    low: f64,
    medium: f64,
    high: f64,
}

impl Default for CropCoefficients {
    fn default() -> Self {
        CropCoefficients {
            low: 0.7,
            medium: 1.0,
            high: 1.2,
        }
    }
}

impl CropCoefficients {
    pub fn kc(&self, stage: CropStage) -> f64 {
        match stage {
            CropStage::Low => self.low,
            CropStage::Medium => self.medium,
            CropStage::High => self.high,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        for (stage, kc) in [
            (CropStage::Low, self.low),
            (CropStage::Medium, self.medium),
            (CropStage::High, self.high),
        ] {
            if !(kc.is_finite() && kc >= 0.0) {
                return Err(SimError::config(format!(
                    "crop coefficient for {} stage must be a non-negative number, got {}",
                    stage, kc
                )));
            }
        }
        Ok(())
    }
}
