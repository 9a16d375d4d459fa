//! Test-only doubles for the distance and engine seams.

use std::collections::VecDeque;
use std::sync::Mutex;

use geo::Coord;

use crate::{DistanceError, DistanceProvider, EngineError, EngineOutcome, MilpEngine, MilpModel};

/// A [`DistanceProvider`] answering from a fixed table keyed by coordinate.
///
/// Lookups compare coordinates exactly, so tests should pass the same values
/// they used to build the instance. Unknown coordinates produce a
/// [`DistanceError::ServiceError`] with code `UNKNOWN_COORDINATE`.
#[derive(Debug, Clone)]
pub struct FixedDistanceProvider {
    locations: Vec<Coord<f64>>,
    rows: Vec<Vec<f64>>,
}

impl FixedDistanceProvider {
    /// Pair each location with its row of costs.
    #[must_use]
    pub const fn new(locations: Vec<Coord<f64>>, rows: Vec<Vec<f64>>) -> Self {
        Self { locations, rows }
    }

    fn position(&self, location: Coord<f64>) -> Result<usize, DistanceError> {
        self.locations
            .iter()
            .position(|&known| known == location)
            .ok_or_else(|| DistanceError::ServiceError {
                code: "UNKNOWN_COORDINATE".to_owned(),
                message: format!("{location:?} is not in the fixed table"),
            })
    }
}

impl DistanceProvider for FixedDistanceProvider {
    fn distance(&self, from: Coord<f64>, to: Coord<f64>) -> Result<f64, DistanceError> {
        let row = self.position(from)?;
        let col = self.position(to)?;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .ok_or_else(|| DistanceError::ServiceError {
                code: "DIMENSION_MISMATCH".to_owned(),
                message: format!("no cost for ({row}, {col})"),
            })
    }
}

/// A [`MilpEngine`] replaying pre-recorded outcomes, one per call.
///
/// Once the script runs out every further call fails. The variable count of
/// each submitted model is recorded for later assertions.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    script: Mutex<VecDeque<Result<EngineOutcome, EngineError>>>,
    submitted: Mutex<Vec<usize>>,
}

impl ScriptedEngine {
    /// Replay `outcomes` in order.
    #[must_use]
    pub fn new(outcomes: impl IntoIterator<Item = Result<EngineOutcome, EngineError>>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Variable counts of every model submitted so far.
    #[must_use]
    pub fn submitted(&self) -> Vec<usize> {
        self.submitted
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl MilpEngine for ScriptedEngine {
    fn solve(&self, model: &MilpModel) -> Result<EngineOutcome, EngineError> {
        if let Ok(mut calls) = self.submitted.lock() {
            calls.push(model.variable_count());
        }
        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());
        next.unwrap_or_else(|| {
            Err(EngineError::Failure {
                message: "script exhausted".to_owned(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fixed_provider_rejects_unknown_coordinates() {
        let provider = FixedDistanceProvider::new(vec![Coord { x: 0.0, y: 0.0 }], vec![vec![0.0]]);
        let err = provider
            .distance(Coord { x: 0.0, y: 0.0 }, Coord { x: 5.0, y: 5.0 })
            .expect_err("unknown coordinate");
        assert!(matches!(err, DistanceError::ServiceError { code, .. } if code == "UNKNOWN_COORDINATE"));
    }

    #[rstest]
    fn scripted_engine_replays_then_fails() {
        let engine = ScriptedEngine::new([Ok(EngineOutcome::Infeasible)]);
        let model = MilpModel::new();
        assert_eq!(engine.solve(&model), Ok(EngineOutcome::Infeasible));
        assert!(matches!(
            engine.solve(&model),
            Err(EngineError::Failure { .. })
        ));
        assert_eq!(engine.submitted(), vec![0, 0]);
    }
}
