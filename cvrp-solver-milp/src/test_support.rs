//! Test-only utilities for `cvrp-solver-milp`.
//!
//! Reference fixtures shared by unit tests, behavioural tests and benchmarks.

use cvrp_core::{Assignment, City, Instance, InstanceError, Route};
use geo::Coord;

use crate::formulation::ArcIndex;

/// Depot of the reference instance, north-east of Paris.
pub const PARIS_DEPOT: Coord<f64> = Coord {
    x: 2.4753,
    y: 48.9566,
};

/// The two unit-demand cities of the reference instance.
pub const PARIS_CITIES: [City; 2] = [City::new(48.96, 2.48, 1.0), City::new(48.95, 2.46, 1.0)];

/// The reference instance with the given capacity and vehicle bound.
///
/// # Errors
///
/// Returns an error if `capacity` or `max_vehicles` is invalid.
///
/// # Examples
/// ```rust
/// use cvrp_solver_milp::test_support::paris_instance;
///
/// let instance = paris_instance(2.0, 2)?;
/// assert_eq!(instance.customer_count(), 2);
/// # Ok::<(), cvrp_core::InstanceError>(())
/// ```
pub fn paris_instance(capacity: f64, max_vehicles: usize) -> Result<Instance, InstanceError> {
    Instance::new(PARIS_DEPOT, &PARIS_CITIES, capacity, max_vehicles)
}

/// An assignment selecting exactly the arcs of `routes`, route `k` on
/// vehicle `k`.
///
/// Arcs outside `arcs` (such as the depot loop of a trivial route) are
/// skipped. The objective is reported as zero.
#[must_use]
pub fn select_routes(arcs: &ArcIndex, routes: &[Route]) -> Assignment {
    let mut values = vec![0.0; arcs.arcs().len()];
    for (vehicle, route) in routes.iter().enumerate() {
        for (from, to) in route.arcs() {
            if let Some(slot) = arcs
                .var(from, to, vehicle)
                .and_then(|var| values.get_mut(var.index()))
            {
                *slot = 1.0;
            }
        }
    }
    Assignment::new(values, 0.0)
}
