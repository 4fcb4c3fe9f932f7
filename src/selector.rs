use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::monte_carlo::{MonteCarloEngine, MonteCarloRun};

// Whether the chosen amount actually meets the risk limit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Outcome {
    TargetMet,
    // No candidate met the limit; the largest one is returned as best effort
    TargetUnreachable,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CandidateEvaluation {
    pub amount_mm: f64,
    pub run: MonteCarloRun,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub outcome: Outcome,
}

// Evaluates day-1 irrigation amounts in ascending order and keeps the smallest sufficient one
pub struct CandidateSelector<'a> {
    candidates: &'a [f64],
}

impl<'a> CandidateSelector<'a> {
    // `candidates` must be non-empty and ascending
    pub fn new(candidates: &'a [f64]) -> Self {
        CandidateSelector { candidates }
    }

    // One engine run per candidate, each on its own RNG stream. Stream seeds are
    // drawn from `rng` in candidate order before the fan-out.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        engine: &MonteCarloEngine<'_>,
        scenarios: usize,
        rng: &mut R,
    ) -> Vec<CandidateEvaluation> {
        let seeds: Vec<u64> = self.candidates.iter().map(|_| rng.next_u64()).collect();

        self.candidates
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(&amount_mm, &seed)| {
                let mut stream = ChaCha8Rng::seed_from_u64(seed);
                let run = engine.run(scenarios, amount_mm, &mut stream);
                debug!(
                    amount_mm,
                    risk_pct = run.risk_pct,
                    scenarios = run.scenarios(),
                    "evaluated irrigation candidate"
                );
                CandidateEvaluation { amount_mm, run }
            })
            .collect()
    }
}

// First candidate (ascending) with risk <= limit, otherwise the last (largest) one
pub fn select(risks: &[f64], risk_limit_pct: f64) -> Option<Selection> {
    if risks.is_empty() {
        return None;
    }
    let selection = match risks.iter().position(|&risk| risk <= risk_limit_pct) {
        Some(index) => Selection {
            index,
            outcome: Outcome::TargetMet,
        },
        None => Selection {
            index: risks.len() - 1,
            outcome: Outcome::TargetUnreachable,
        },
    };
    Some(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use crate::forecast::ForecastWeek;
    use crate::sampler::PerturbationRanges;
    use crate::soil::SoilParams;

    #[test]
    fn picks_smallest_sufficient_amount() {
        let pick = select(&[80.0, 30.0, 5.0, 2.0], 10.0).unwrap();
        assert_eq!(pick, Selection { index: 2, outcome: Outcome::TargetMet });
    }

    #[test]
    fn smallest_sufficient_beats_global_minimum() {
        let pick = select(&[50.0, 8.0, 9.0, 0.0], 10.0).unwrap();
        assert_eq!(pick.index, 1);
    }

    #[test]
    fn limit_is_inclusive() {
        let pick = select(&[10.0, 4.0], 10.0).unwrap();
        assert_eq!(pick.index, 0);
    }

    #[test]
    fn falls_back_to_largest_candidate() {
        let pick = select(&[100.0, 90.0, 70.0, 40.0], 10.0).unwrap();
        assert_eq!(
            pick,
            Selection {
                index: 3,
                outcome: Outcome::TargetUnreachable
            }
        );
    }

    #[test]
    fn nothing_to_select_from() {
        assert_eq!(select(&[], 10.0), None);
    }

    #[test]
    fn evaluation_is_schedule_independent() {
        let forecast = ForecastWeek::samples().remove(1);
        let ranges = PerturbationRanges::default();
        let engine =
            MonteCarloEngine::new(SoilParams::new(70.0, 15.0), 1.0, 35.0, 20.0, &forecast, &ranges)
                .unwrap();
        let candidates = [0.0, 5.0, 10.0, 15.0];
        let selector = CandidateSelector::new(&candidates);

        let parallel = selector.evaluate(&engine, 80, &mut ChaCha8Rng::seed_from_u64(21));

        let mut master = ChaCha8Rng::seed_from_u64(21);
        let seeds: Vec<u64> = candidates.iter().map(|_| master.next_u64()).collect();
        for (i, (amount, seed)) in candidates.iter().zip(seeds).enumerate() {
            let run = engine.run(80, *amount, &mut ChaCha8Rng::seed_from_u64(seed));
            assert_eq!(parallel[i].amount_mm, *amount);
            assert_eq!(parallel[i].run, run);
        }
    }
}
