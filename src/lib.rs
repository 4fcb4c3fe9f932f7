mod config;
mod crop;
mod error;
mod forecast;
mod monte_carlo;
mod sampler;
mod selector;
mod simulate;
mod soil;
mod stats;
mod units;
mod water_balance;

pub use config::{EngineConfig, ScenarioBounds};
pub use crop::{CropCoefficients, CropStage};
pub use error::SimError;
pub use forecast::{FORECAST_DAYS, ForecastWeek};
pub use monte_carlo::{MonteCarloEngine, MonteCarloRun};
pub use sampler::{DayWeather, FactorRange, PerturbationRanges, ScenarioSampler, TrialSoil};
pub use selector::{CandidateEvaluation, CandidateSelector, Outcome, Selection, select};
pub use simulate::{
    CandidateRisk, SimulationInput, SimulationResult, simulate, simulate_with_config,
    simulate_with_rng,
};
pub use soil::{SoilParams, SoilTable, SoilType};
pub use stats::{ChartPoint, EnsembleBand, quantile, summarize_ensemble};
pub use units::{moisture_pct_from_storage, storage_from_moisture_pct};
pub use water_balance::{DayBalance, step};
