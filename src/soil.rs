use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    Sandy,
    Loamy,
    Clay,
}

impl SoilType {
    pub const ALL: [SoilType; 3] = [SoilType::Sandy, SoilType::Loamy, SoilType::Clay];
}

impl FromStr for SoilType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandy" | "sand" => Ok(SoilType::Sandy),
            "loamy" | "loam" => Ok(SoilType::Loamy),
            "clay" => Ok(SoilType::Clay),
            other => Err(SimError::config(format!("unknown soil type '{}'", other))),
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SoilType::Sandy => "Sandy",
            SoilType::Loamy => "Loamy",
            SoilType::Clay => "Clay",
        };
        f.write_str(name)
    }
}

// Single-reservoir bucket parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SoilParams {
    pub field_capacity_mm: f64, // Water held before drainage starts [mm]
    pub wilting_point_mm: f64,  // Water below which the crop cannot draw [mm]
}

impl SoilParams {
    pub const fn new(field_capacity_mm: f64, wilting_point_mm: f64) -> Self {
        SoilParams {
            field_capacity_mm,
            wilting_point_mm,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let valid = self.wilting_point_mm > 0.0
            && self.field_capacity_mm > self.wilting_point_mm
            && self.field_capacity_mm.is_finite();
        if valid {
            Ok(())
        } else {
            Err(SimError::config(format!(
                "soil bucket needs field capacity > wilting point > 0, got fc={} wp={}",
                self.field_capacity_mm, self.wilting_point_mm
            )))
        }
    }
}

// Soil type -> bucket lookup. Built once, read-only afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoilTable {
    sandy: SoilParams,
    loamy: SoilParams,
    clay: SoilParams,
}

impl Default for SoilTable {
    fn default() -> Self {
        SoilTable {
            sandy: SoilParams::new(45.0, 10.0),
            loamy: SoilParams::new(70.0, 15.0),
            clay: SoilParams::new(90.0, 20.0),
        }
    }
}

impl SoilTable {
    pub fn get(&self, soil: SoilType) -> SoilParams {
        match soil {
            SoilType::Sandy => self.sandy,
            SoilType::Loamy => self.loamy,
            SoilType::Clay => self.clay,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        for soil in SoilType::ALL {
            self.get(soil).validate().map_err(|e| match e {
                SimError::InvalidConfig { reason } => {
                    SimError::config(format!("{} soil: {}", soil, reason))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}
