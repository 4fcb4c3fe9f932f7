use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::crop::CropStage;
use crate::error::SimError;
use crate::forecast::ForecastWeek;
use crate::monte_carlo::MonteCarloEngine;
use crate::selector::{CandidateSelector, Outcome, select};
use crate::soil::SoilType;
use crate::stats::{ChartPoint, summarize_ensemble};
use crate::units::clamp;

// One recommendation request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub soil_type: SoilType,
    pub crop_stage: CropStage,
    pub initial_moisture_pct: f64, // Today's moisture, 0..100
    pub stress_threshold_pct: f64, // A day below this moisture counts as stressed
    pub risk_limit_pct: f64,       // Acceptable share of stressed trials
    pub scenarios: usize,          // Requested trials per candidate, clamped to the engine bounds
    pub forecast: ForecastWeek,
    #[serde(default)]
    pub seed: Option<u64>, // None draws a fresh seed from OS entropy
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CandidateRisk {
    pub amount_mm: f64,
    pub risk_pct: f64,
}

impl CandidateRisk {
    pub fn rounded_pct(&self) -> f64 {
        self.risk_pct.round()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationResult {
    pub recommended_amount_mm: f64,
    pub risk_no_irrigation_pct: f64,
    pub risk_with_recommended_pct: f64,
    pub risk_limit_pct: f64,
    pub stress_threshold_pct: f64,
    pub scenarios: usize, // Effective trials per candidate after clamping
    pub outcome: Outcome,
    pub series: Vec<ChartPoint>,
    pub candidate_risks: Vec<CandidateRisk>,
}

impl SimulationResult {
    pub fn target_met(&self) -> bool {
        self.outcome == Outcome::TargetMet
    }

    // Whole-percent headline risks, as shown to growers
    pub fn rounded_risk_no_irrigation_pct(&self) -> f64 {
        self.risk_no_irrigation_pct.round()
    }

    pub fn rounded_risk_with_recommended_pct(&self) -> f64 {
        self.risk_with_recommended_pct.round()
    }
}

// Recommend today's irrigation with the reference engine settings
pub fn simulate(input: &SimulationInput) -> Result<SimulationResult, SimError> {
    simulate_with_config(input, &EngineConfig::default())
}

pub fn simulate_with_config(
    input: &SimulationInput,
    config: &EngineConfig,
) -> Result<SimulationResult, SimError> {
    let mut rng = match input.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    simulate_with_rng(input, config, &mut rng)
}

/**
Runs the full pipeline with a caller-supplied random source.

Every candidate is evaluated with independent draws, the smallest candidate meeting
`risk_limit_pct` wins, and if none does the largest candidate is returned with
`Outcome::TargetUnreachable`. The winner's trajectories are summarised per day.
*/
pub fn simulate_with_rng<R: Rng + ?Sized>(
    input: &SimulationInput,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<SimulationResult, SimError> {
    config.validate()?;
    input.forecast.validate()?;

    let soil = config.soils.get(input.soil_type);
    let kc = config.crop_coefficients.kc(input.crop_stage);
    let scenarios = config.scenarios.clamp(input.scenarios);
    let initial_moisture_pct = clamp(input.initial_moisture_pct, 0.0, 100.0);

    let engine = MonteCarloEngine::new(
        soil,
        kc,
        initial_moisture_pct,
        input.stress_threshold_pct,
        &input.forecast,
        &config.perturbation,
    )?;

    let mut evaluations =
        CandidateSelector::new(&config.candidates_mm).evaluate(&engine, scenarios, rng);

    let risk_no_irrigation_pct = match evaluations.iter().find(|e| e.amount_mm == 0.0) {
        Some(baseline) => baseline.run.risk_pct,
        None => engine.run(scenarios, 0.0, rng).risk_pct,
    };

    let risks: Vec<f64> = evaluations.iter().map(|e| e.run.risk_pct).collect();
    let selection = select(&risks, input.risk_limit_pct)
        .ok_or_else(|| SimError::config("no irrigation candidates to evaluate"))?;

    let candidate_risks = evaluations
        .iter()
        .map(|e| CandidateRisk {
            amount_mm: e.amount_mm,
            risk_pct: e.run.risk_pct,
        })
        .collect();

    // Only the winner's trajectories are kept
    let chosen = evaluations.swap_remove(selection.index);
    let series = summarize_ensemble(&chosen.run.trajectories, &input.forecast, config.ensemble_band);

    match selection.outcome {
        Outcome::TargetMet => info!(
            amount_mm = chosen.amount_mm,
            risk_pct = chosen.run.risk_pct,
            risk_limit_pct = input.risk_limit_pct,
            "irrigation recommendation meets risk limit"
        ),
        Outcome::TargetUnreachable => warn!(
            amount_mm = chosen.amount_mm,
            risk_pct = chosen.run.risk_pct,
            risk_limit_pct = input.risk_limit_pct,
            "no candidate meets risk limit, recommending the largest amount"
        ),
    }

    Ok(SimulationResult {
        recommended_amount_mm: chosen.amount_mm,
        risk_no_irrigation_pct,
        risk_with_recommended_pct: chosen.run.risk_pct,
        risk_limit_pct: input.risk_limit_pct,
        stress_threshold_pct: input.stress_threshold_pct,
        scenarios,
        outcome: selection.outcome,
        series,
        candidate_risks,
    })
}
