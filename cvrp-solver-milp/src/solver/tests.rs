//! Tests for the `MilpSolver`.

use super::*;
use cvrp_core::test_support::{FixedDistanceProvider, ScriptedEngine};
use cvrp_core::{DistanceError, EngineError, HaversineDistance};
use geo::Coord;
use rstest::rstest;

use crate::test_support::{PARIS_DEPOT, paris_instance};

#[rstest]
fn one_vehicle_serves_both_cities_when_capacity_allows() {
    let instance = paris_instance(2.0, 2).expect("valid instance");
    let plan = MilpSolver::new(HaversineDistance)
        .solve(&instance)
        .expect("feasible");

    assert_eq!(plan.vehicle_count, 1);
    assert_eq!(plan.routes.len(), 1);
    assert_eq!(plan.diagnostics.trials, 1);
    // depot -> A -> B -> depot in either direction: 510.57 + 1835.48 + 1336.67 m
    assert!((plan.total_distance_km - 3.6827).abs() < 1e-3);
}

#[rstest]
fn tight_capacity_needs_a_second_vehicle() {
    let instance = paris_instance(1.0, 2).expect("valid instance");
    let plan = MilpSolver::new(HaversineDistance)
        .solve(&instance)
        .expect("feasible");

    assert_eq!(plan.vehicle_count, 2);
    assert_eq!(plan.diagnostics.trials, 2);
    let mut served: Vec<usize> = plan
        .routes
        .iter()
        .flat_map(|route| route.customers().to_vec())
        .collect();
    served.sort_unstable();
    assert_eq!(served, vec![1, 2]);
    // two out-and-back trips
    assert!((plan.total_distance_km - 2.0 * (0.51057 + 1.33667)).abs() < 1e-3);
}

#[rstest]
fn coordinates_are_lon_lat_and_start_at_the_depot() {
    let instance = paris_instance(1.0, 2).expect("valid instance");
    let plan = MilpSolver::new(HaversineDistance)
        .solve(&instance)
        .expect("feasible");

    let depot = [PARIS_DEPOT.x, PARIS_DEPOT.y];
    for (route, coordinates) in plan.routes.iter().zip(&plan.coordinates) {
        assert_eq!(coordinates.len(), route.stops().len());
        assert_eq!(coordinates.first(), Some(&depot));
        assert_eq!(coordinates.last(), Some(&depot));
    }
}

#[rstest]
fn oversized_demand_exhausts_the_vehicle_budget() {
    let depot = PARIS_DEPOT;
    let cities = [cvrp_core::City::new(48.96, 2.48, 3.0)];
    let instance = Instance::new(depot, &cities, 2.0, 3).expect("valid instance");

    let err = MilpSolver::new(HaversineDistance)
        .solve(&instance)
        .expect_err("no fleet can carry the load");

    assert_eq!(err, SolveError::VehicleBudgetExhausted { max_vehicles: 3 });
}

#[rstest]
fn distance_failures_abort_before_the_engine_runs() {
    let instance = paris_instance(2.0, 2).expect("valid instance");
    let provider = FixedDistanceProvider::new(vec![PARIS_DEPOT], vec![vec![0.0]]);
    let engine = ScriptedEngine::new([]);
    let solver = MilpSolver::with_engine(provider, &engine, MilpSolverConfig::default());

    let err = solver.solve(&instance).expect_err("unknown coordinates");

    assert!(matches!(
        err,
        SolveError::DistanceUnavailable(DistanceError::ServiceError { .. })
    ));
    assert!(engine.submitted().is_empty());
}

#[rstest]
fn engine_failures_surface_as_solver_faults() {
    let instance = paris_instance(2.0, 2).expect("valid instance");
    let engine = ScriptedEngine::new([Err(EngineError::Unbounded)]);
    let solver = MilpSolver::with_engine(HaversineDistance, engine, MilpSolverConfig::default());

    let err = solver.solve(&instance).expect_err("engine fault");

    assert_eq!(
        err,
        SolveError::SolverFault {
            vehicles: 1,
            source: EngineError::Unbounded
        }
    );
}

#[rstest]
fn asymmetric_costs_pick_the_cheaper_direction() {
    let a = Coord { x: 2.48, y: 48.96 };
    let b = Coord { x: 2.46, y: 48.95 };
    let provider = FixedDistanceProvider::new(
        vec![PARIS_DEPOT, a, b],
        vec![
            vec![0.0, 100.0, 900.0],
            vec![900.0, 0.0, 100.0],
            vec![100.0, 900.0, 0.0],
        ],
    );
    let instance = paris_instance(2.0, 1).expect("valid instance");
    let config = MilpSolverConfig::default().with_subtour_mode(SubtourMode::Exhaustive);
    let solver = MilpSolver::with_engine(provider, MicrolpEngine, config);

    let plan = solver.solve(&instance).expect("feasible");

    assert_eq!(plan.routes, vec![Route::new(vec![0, 1, 2, 0])]);
    assert!((plan.total_distance_meters() - 300.0).abs() < 1e-9);
}
