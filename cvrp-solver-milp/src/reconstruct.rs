//! Turn an optimal arc selection into per-vehicle routes.

use std::collections::{BTreeMap, BTreeSet};

use cvrp_core::{Assignment, DEPOT, Route, SolveError};

use crate::formulation::ArcIndex;

/// Rebuilds routes from the selected arcs of an [`Assignment`].
///
/// For each vehicle the selected arcs become a successor map which is walked
/// from the depot until it returns there. Reconstruction is pure: the same
/// assignment always yields the same routes, and the arcs of those routes are
/// exactly the selected arcs.
///
/// # Examples
/// ```
/// use cvrp_core::{Assignment, MilpModel, Route};
/// use cvrp_solver_milp::{ArcIndex, RouteReconstructor};
///
/// let mut model = MilpModel::new();
/// let arcs = ArcIndex::declare(&mut model, 3, 1);
/// let mut values = vec![0.0; model.variable_count()];
/// for (from, to) in [(0, 2), (2, 1), (1, 0)] {
///     let var = arcs.var(from, to, 0).ok_or("arc exists")?;
///     if let Some(slot) = values.get_mut(var.index()) {
///         *slot = 1.0;
///     }
/// }
///
/// let routes = RouteReconstructor::new(&arcs)
///     .reconstruct(&Assignment::new(values, 0.0))
///     .map_err(|_| "consistent selection")?;
/// assert_eq!(routes, vec![Route::new(vec![0, 2, 1, 0])]);
/// # Ok::<(), &str>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RouteReconstructor<'a> {
    arcs: &'a ArcIndex,
}

impl<'a> RouteReconstructor<'a> {
    /// Reconstruct against the given arc mapping.
    #[must_use]
    pub const fn new(arcs: &'a ArcIndex) -> Self {
        Self { arcs }
    }

    /// One route per vehicle, in vehicle order.
    ///
    /// A vehicle with no selected arcs yields [`Route::trivial`].
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::ReconstructionInconsistency`] when a vehicle's
    /// arcs branch, dead-end, revisit a customer, miss the depot, or leave a
    /// cycle detached from the depot.
    pub fn reconstruct(&self, assignment: &Assignment) -> Result<Vec<Route>, SolveError> {
        (0..self.arcs.vehicles())
            .map(|vehicle| self.vehicle_route(assignment, vehicle))
            .collect()
    }

    fn vehicle_route(self, assignment: &Assignment, vehicle: usize) -> Result<Route, SolveError> {
        let inconsistent = |reason: String| SolveError::ReconstructionInconsistency { vehicle, reason };

        let mut successors = BTreeMap::new();
        for arc in self.arcs.vehicle_arcs(vehicle) {
            if !assignment.is_selected(arc.var) {
                continue;
            }
            if let Some(previous) = successors.insert(arc.from, arc.to) {
                return Err(inconsistent(format!(
                    "node {} leads to both {previous} and {}",
                    arc.from, arc.to
                )));
            }
        }

        if successors.is_empty() {
            return Ok(Route::trivial());
        }
        if !successors.contains_key(&DEPOT) {
            return Err(inconsistent("no arc leaves the depot".to_owned()));
        }

        let mut stops = vec![DEPOT];
        let mut visited = BTreeSet::new();
        let mut current = DEPOT;
        loop {
            let Some(&next) = successors.get(&current) else {
                return Err(inconsistent(format!("node {current} has no successor")));
            };
            stops.push(next);
            if next == DEPOT {
                break;
            }
            if !visited.insert(next) {
                return Err(inconsistent(format!("customer {next} is visited twice")));
            }
            current = next;
        }

        let used = stops.len() - 1;
        if used != successors.len() {
            return Err(inconsistent(format!(
                "{} selected arcs form a cycle detached from the depot",
                successors.len() - used
            )));
        }
        Ok(Route::new(stops))
    }
}
