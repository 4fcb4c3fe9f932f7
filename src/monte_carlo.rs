use nalgebra::DMatrix;
use rand::Rng;

use crate::error::SimError;
use crate::forecast::{FORECAST_DAYS, ForecastWeek};
use crate::sampler::{PerturbationRanges, ScenarioSampler};
use crate::soil::SoilParams;
use crate::units::{moisture_pct_from_storage, storage_from_moisture_pct};
use crate::water_balance;

// Outcome of N trials for one irrigation amount
#[derive(Clone, Debug, PartialEq)]
pub struct MonteCarloRun {
    pub risk_pct: f64,
    pub stressed_trials: usize,
    pub trajectories: DMatrix<f64>, // Moisture percent, one row per trial, one column per day
}

impl MonteCarloRun {
    pub fn scenarios(&self) -> usize {
        self.trajectories.nrows()
    }
}

// Bucket water balance over the forecast week under sampled uncertainty
pub struct MonteCarloEngine<'a> {
    soil: SoilParams,
    kc: f64,
    initial_moisture_pct: f64,
    stress_threshold_pct: f64,
    forecast: &'a ForecastWeek,
    ranges: &'a PerturbationRanges,
}

impl<'a> MonteCarloEngine<'a> {
    pub fn new(
        soil: SoilParams,
        kc: f64,
        initial_moisture_pct: f64,
        stress_threshold_pct: f64,
        forecast: &'a ForecastWeek,
        ranges: &'a PerturbationRanges,
    ) -> Result<Self, SimError> {
        forecast.validate()?;
        ranges.validate()?;
        Ok(MonteCarloEngine {
            soil,
            kc,
            initial_moisture_pct,
            stress_threshold_pct,
            forecast,
            ranges,
        })
    }

    // Run `scenarios` independent trials with `irrigation_day1_mm` applied on the first day
    pub fn run<R: Rng + ?Sized>(
        &self,
        scenarios: usize,
        irrigation_day1_mm: f64,
        rng: &mut R,
    ) -> MonteCarloRun {
        let n = scenarios.max(1);
        let sampler = ScenarioSampler::new(self.ranges);
        let mut trajectories = DMatrix::zeros(n, FORECAST_DAYS);
        let mut stressed_trials = 0;

        for trial in 0..n {
            if self.run_trial(&sampler, irrigation_day1_mm, rng, &mut trajectories, trial) {
                stressed_trials += 1;
            }
        }

        MonteCarloRun {
            risk_pct: 100.0 * stressed_trials as f64 / n as f64,
            stressed_trials,
            trajectories,
        }
    }

    // Fills row `trial` with daily moisture percent; true if any day fell below the stress threshold
    fn run_trial<R: Rng + ?Sized>(
        &self,
        sampler: &ScenarioSampler<'_>,
        irrigation_day1_mm: f64,
        rng: &mut R,
        trajectories: &mut DMatrix<f64>,
        trial: usize,
    ) -> bool {
        let bucket = sampler.sample_soil(&self.soil, rng);
        let (wp, fc) = (bucket.wilting_point_mm, bucket.field_capacity_mm);
        let mut storage = storage_from_moisture_pct(self.initial_moisture_pct, wp, fc);
        let mut stressed = false;

        for day in 0..FORECAST_DAYS {
            let weather = sampler.sample_day(self.forecast.rain_mm[day], self.forecast.et0_mm[day], rng);
            let irrigation = if day == 0 { irrigation_day1_mm } else { 0.0 };
            storage = water_balance::step(storage, weather, self.kc, irrigation, fc).storage_mm;

            let moisture_pct = moisture_pct_from_storage(storage, wp, fc);
            trajectories[(trial, day)] = moisture_pct;
            stressed |= moisture_pct < self.stress_threshold_pct;
        }
        stressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::FactorRange;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dry_week() -> ForecastWeek {
        ForecastWeek::samples().remove(0)
    }

    fn column_min(run: &MonteCarloRun, day: usize) -> f64 {
        run.trajectories.column(day).min()
    }

    #[test]
    fn no_water_movement_means_no_stress() {
        let forecast = ForecastWeek::new("still", vec![0.0; 7], vec![0.0; 7]);
        let ranges = PerturbationRanges::default();
        let engine =
            MonteCarloEngine::new(SoilParams::new(70.0, 15.0), 1.0, 40.0, 20.0, &forecast, &ranges)
                .unwrap();
        let run = engine.run(300, 0.0, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(run.risk_pct, 0.0);
        assert_eq!(run.scenarios(), 300);
        assert!(run.trajectories.iter().all(|m| (m - 40.0).abs() < 1e-9));
    }

    #[test]
    fn dry_week_without_irrigation_always_stresses() {
        let forecast = dry_week();
        let ranges = PerturbationRanges::default();
        let engine =
            MonteCarloEngine::new(SoilParams::new(70.0, 15.0), 1.0, 40.0, 20.0, &forecast, &ranges)
                .unwrap();
        let run = engine.run(150, 0.0, &mut ChaCha8Rng::seed_from_u64(2));
        assert_eq!(run.risk_pct, 100.0);
        assert_eq!(run.stressed_trials, 150);
    }

    #[test]
    fn trajectories_stay_in_percent_range() {
        let ranges = PerturbationRanges::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for forecast in ForecastWeek::samples() {
            for initial in [0.0, 35.0, 100.0] {
                let engine = MonteCarloEngine::new(
                    SoilParams::new(45.0, 10.0),
                    1.2,
                    initial,
                    30.0,
                    &forecast,
                    &ranges,
                )
                .unwrap();
                let run = engine.run(50, 15.0, &mut rng);
                assert!((0.0..=100.0).contains(&run.risk_pct));
                assert_eq!(run.trajectories.shape(), (50, FORECAST_DAYS));
                assert!(run.trajectories.iter().all(|m| (0.0..=100.0).contains(m)));
            }
        }
    }

    #[test]
    fn zero_scenarios_runs_one_trial() {
        let forecast = dry_week();
        let ranges = PerturbationRanges::default();
        let engine =
            MonteCarloEngine::new(SoilParams::new(90.0, 20.0), 0.7, 50.0, 20.0, &forecast, &ranges)
                .unwrap();
        let run = engine.run(0, 5.0, &mut ChaCha8Rng::seed_from_u64(4));
        assert_eq!(run.scenarios(), 1);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let forecast = ForecastWeek::samples().remove(1);
        let ranges = PerturbationRanges::default();
        let engine =
            MonteCarloEngine::new(SoilParams::new(70.0, 15.0), 1.0, 45.0, 25.0, &forecast, &ranges)
                .unwrap();
        let a = engine.run(120, 5.0, &mut ChaCha8Rng::seed_from_u64(99));
        let b = engine.run(120, 5.0, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn inverted_perturbation_range_is_rejected() {
        let forecast = dry_week();
        let mut ranges = PerturbationRanges::default();
        ranges.rain = FactorRange::new(1.3, 0.7);
        let engine =
            MonteCarloEngine::new(SoilParams::new(70.0, 15.0), 1.0, 40.0, 20.0, &forecast, &ranges);
        assert!(matches!(engine, Err(SimError::InvalidConfig { .. })));

        ranges.rain = FactorRange::new(0.7, 1.3);
        ranges.et0 = FactorRange::new(f64::NAN, 1.15);
        let engine =
            MonteCarloEngine::new(SoilParams::new(70.0, 15.0), 1.0, 40.0, 20.0, &forecast, &ranges);
        assert!(matches!(engine, Err(SimError::InvalidConfig { .. })));
    }

    #[test]
    fn early_stress_is_not_cleared_by_later_rain() {
        // Day 1 empties the bucket, day 2 refills it well above the threshold
        let mut et0_mm = vec![0.0; 7];
        et0_mm[0] = 20.0;
        let mut rain_mm = vec![0.0; 7];
        rain_mm[1] = 60.0;
        let forecast = ForecastWeek::new("dip and recover", rain_mm, et0_mm);
        let ranges = PerturbationRanges::default();
        let engine =
            MonteCarloEngine::new(SoilParams::new(70.0, 15.0), 1.0, 25.0, 20.0, &forecast, &ranges)
                .unwrap();
        let run = engine.run(200, 0.0, &mut ChaCha8Rng::seed_from_u64(8));

        assert_eq!(run.risk_pct, 100.0);
        assert!(column_min(&run, 0) < 20.0);
        assert!(column_min(&run, FORECAST_DAYS - 1) > 20.0);
    }

    #[test]
    fn moisture_at_threshold_is_not_stress() {
        // Fixed bucket and still weather: every day reads exactly 20 %
        let fixed = FactorRange::new(1.0, 1.0);
        let ranges = PerturbationRanges {
            field_capacity: fixed,
            wilting_point: fixed,
            rain: fixed,
            et0: fixed,
            ..PerturbationRanges::default()
        };
        let forecast = ForecastWeek::new("still", vec![0.0; 7], vec![0.0; 7]);
        let soil = SoilParams::new(60.0, 10.0);

        let at = MonteCarloEngine::new(soil, 1.0, 20.0, 20.0, &forecast, &ranges).unwrap();
        let run = at.run(50, 0.0, &mut ChaCha8Rng::seed_from_u64(5));
        assert!(run.trajectories.iter().all(|m| *m == 20.0));
        assert_eq!(run.risk_pct, 0.0);

        let above = MonteCarloEngine::new(soil, 1.0, 20.0, 20.000001, &forecast, &ranges).unwrap();
        assert_eq!(above.run(50, 0.0, &mut ChaCha8Rng::seed_from_u64(5)).risk_pct, 100.0);
    }

    #[test]
    fn malformed_forecast_is_rejected() {
        let forecast = ForecastWeek::new("bad", vec![0.0; 5], vec![5.0; 7]);
        let ranges = PerturbationRanges::default();
        let engine =
            MonteCarloEngine::new(SoilParams::new(70.0, 15.0), 1.0, 40.0, 20.0, &forecast, &ranges);
        assert!(matches!(engine, Err(SimError::InvalidForecastShape { .. })));
    }
}
