use serde::{Deserialize, Serialize};

use crate::error::SimError;

// Length of the simulated window [days]
pub const FORECAST_DAYS: usize = 7;

// Nominal weather for the simulated week, one entry per day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastWeek {
    #[serde(default)]
    pub name: String,
    pub rain_mm: Vec<f64>, // Daily rainfall [mm/day]
    pub et0_mm: Vec<f64>,  // Daily reference evapotranspiration [mm/day]
}

impl ForecastWeek {
    pub fn new(name: impl Into<String>, rain_mm: Vec<f64>, et0_mm: Vec<f64>) -> Self {
        ForecastWeek {
            name: name.into(),
            rain_mm,
            et0_mm,
        }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, SimError> {
        let week: ForecastWeek = toml::from_str(toml_str)?;
        week.validate()?;
        Ok(week)
    }

    // Both series must cover exactly the simulated window; nothing is padded or truncated
    pub fn validate(&self) -> Result<(), SimError> {
        for (series, values) in [("rain", &self.rain_mm), ("et0", &self.et0_mm)] {
            if values.len() != FORECAST_DAYS {
                return Err(SimError::InvalidForecastShape {
                    series,
                    len: values.len(),
                    expected: FORECAST_DAYS,
                });
            }
        }
        Ok(())
    }

    // Reference weeks for a warm season: ET0 3-7 mm/day, rain 0-20 mm/day
    pub fn samples() -> Vec<ForecastWeek> {
        vec![
            ForecastWeek::new(
                "Warm & Dry",
                vec![0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0],
                vec![6.2, 6.5, 6.0, 6.8, 6.6, 6.3, 6.1],
            ),
            ForecastWeek::new(
                "Mixed Showers",
                vec![4.0, 0.0, 0.0, 8.0, 0.0, 5.0, 0.0],
                vec![5.2, 5.6, 5.8, 5.0, 5.4, 5.1, 5.7],
            ),
            ForecastWeek::new(
                "Humid & Wet Start",
                vec![12.0, 6.0, 0.0, 0.0, 3.0, 0.0, 0.0],
                vec![4.2, 4.0, 4.6, 4.9, 4.7, 5.1, 5.0],
            ),
        ]
    }
}
