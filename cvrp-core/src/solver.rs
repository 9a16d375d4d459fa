use thiserror::Error;

use crate::distance::DistanceError;
use crate::engine::EngineError;
use crate::instance::Instance;
use crate::route::Plan;

/// Errors returned by [`Solver::solve`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The cost matrix could not be built. No partial matrix is used.
    #[error("distance unavailable: {0}")]
    DistanceUnavailable(#[from] DistanceError),
    /// No vehicle count up to the bound admits a feasible plan.
    #[error("no feasible plan with at most {max_vehicles} vehicles")]
    VehicleBudgetExhausted {
        /// The bound that was tried last.
        max_vehicles: usize,
    },
    /// The engine failed for reasons unrelated to feasibility.
    #[error("solver fault while trying {vehicles} vehicles: {source}")]
    SolverFault {
        /// Vehicle count of the failing trial.
        vehicles: usize,
        /// Engine failure.
        #[source]
        source: EngineError,
    },
    /// A vehicle's selected arcs did not form a single depot cycle.
    #[error("cannot rebuild route for vehicle {vehicle}: {reason}")]
    ReconstructionInconsistency {
        /// Zero-based vehicle index.
        vehicle: usize,
        /// What went wrong.
        reason: String,
    },
}

/// Alias for the solver error type.
pub type Error = SolveError;

/// Produce a minimum-vehicle, minimum-distance plan for an instance.
///
/// Solvers must be `Send + Sync` to operate safely across threads.
pub trait Solver: Send + Sync {
    /// Solve an instance, producing a plan or an error.
    fn solve(&self, instance: &Instance) -> Result<Plan, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::City;
    use crate::route::{Diagnostics, Route};
    use geo::Coord;
    use rstest::rstest;

    struct OneVehiclePerCity;

    impl Solver for OneVehiclePerCity {
        fn solve(&self, instance: &Instance) -> Result<Plan, Error> {
            let count = instance.customer_count();
            if count > instance.max_vehicles().get() {
                return Err(Error::VehicleBudgetExhausted {
                    max_vehicles: instance.max_vehicles().get(),
                });
            }
            Ok(Plan {
                vehicle_count: count,
                total_distance_km: 0.0,
                routes: (1..=count).map(|id| Route::new(vec![0, id, 0])).collect(),
                coordinates: Vec::new(),
                diagnostics: Diagnostics::default(),
            })
        }
    }

    #[rstest]
    #[case(2, true)]
    #[case(1, false)]
    fn solver_reports_budget(#[case] max_vehicles: usize, #[case] should_succeed: bool) {
        let instance = Instance::new(
            Coord { x: 0.0, y: 0.0 },
            &[City::new(0.0, 0.1, 1.0), City::new(0.1, 0.0, 1.0)],
            1.0,
            max_vehicles,
        )
        .expect("valid instance");
        assert_eq!(OneVehiclePerCity.solve(&instance).is_ok(), should_succeed);
    }

    #[rstest]
    fn solver_fault_keeps_engine_error_as_source() {
        let err = Error::SolverFault {
            vehicles: 3,
            source: EngineError::Failure {
                message: "crashed".to_owned(),
            },
        };
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "engine failure: crashed");
    }
}
