//! Minimum vehicle count search.
//!
//! Vehicle counts are tried in increasing order starting at one. The first
//! count whose model has an optimum wins, which makes the reported fleet size
//! minimal by construction.

use std::num::NonZeroUsize;

use cvrp_core::{Assignment, CostMatrix, EngineOutcome, MilpEngine, SolveError};
use log::{debug, info, warn};

use crate::formulation::{CvrpFormulation, SubtourMode};
use crate::subtour::find_subtours;

/// Lazy cut rounds within one trial between progress warnings.
const CUT_ROUND_WARNING_INTERVAL: usize = 25;

/// The successful trial of a [`VehicleCountSearch`].
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The formulation that produced the optimum, cuts included.
    pub formulation: CvrpFormulation,
    /// The optimal assignment.
    pub assignment: Assignment,
    /// Vehicle counts tried, the successful one included.
    pub trials: usize,
    /// Subtour cuts added lazily over all trials.
    pub cuts_added: usize,
}

impl SearchResult {
    /// The minimum feasible vehicle count.
    #[must_use]
    pub const fn vehicles(&self) -> usize {
        self.formulation.vehicles()
    }
}

/// Search progress.
#[derive(Debug)]
enum SearchState {
    /// Solve the model for this many vehicles next.
    Trying(usize),
    /// An optimum was found.
    Found(Box<SearchResult>),
    /// Every count up to the maximum was infeasible.
    Exhausted,
}

/// Finds the smallest vehicle count with a feasible routing plan.
///
/// The maximum is fixed at construction; the trial counter lives in the
/// search state, never in the bound. Engine failures at any count abort the
/// search as [`SolveError::SolverFault`] without retrying.
pub struct VehicleCountSearch<'a, E: ?Sized> {
    engine: &'a E,
    matrix: &'a CostMatrix,
    demands: &'a [f64],
    capacity: f64,
    max_vehicles: NonZeroUsize,
    mode: SubtourMode,
}

impl<'a, E: MilpEngine + ?Sized> VehicleCountSearch<'a, E> {
    /// Prepare a search over `1..=max_vehicles`.
    #[must_use]
    pub const fn new(
        engine: &'a E,
        matrix: &'a CostMatrix,
        demands: &'a [f64],
        capacity: f64,
        max_vehicles: NonZeroUsize,
        mode: SubtourMode,
    ) -> Self {
        Self {
            engine,
            matrix,
            demands,
            capacity,
            max_vehicles,
            mode,
        }
    }

    /// Run the search to completion.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::VehicleBudgetExhausted`] if no count up to the
    /// maximum is feasible, or [`SolveError::SolverFault`] if the engine
    /// fails.
    pub fn run(&self) -> Result<SearchResult, SolveError> {
        let mut trials = 0;
        let mut cuts_added = 0;
        let mut state = SearchState::Trying(1);
        loop {
            state = match state {
                SearchState::Trying(vehicles) => {
                    trials += 1;
                    debug!("trial {trials}: solving with {vehicles} vehicle(s)");
                    match self.attempt(vehicles, &mut cuts_added)? {
                        Some((formulation, assignment)) => {
                            SearchState::Found(Box::new(SearchResult {
                                formulation,
                                assignment,
                                trials,
                                cuts_added,
                            }))
                        }
                        None if vehicles < self.max_vehicles.get() => {
                            debug!("{vehicles} vehicle(s) infeasible");
                            SearchState::Trying(vehicles + 1)
                        }
                        None => SearchState::Exhausted,
                    }
                }
                SearchState::Found(result) => {
                    info!(
                        "minimum fleet is {} vehicle(s) after {} trial(s), objective {}",
                        result.vehicles(),
                        result.trials,
                        result.assignment.objective()
                    );
                    return Ok(*result);
                }
                SearchState::Exhausted => {
                    info!(
                        "no feasible plan with at most {} vehicle(s)",
                        self.max_vehicles
                    );
                    return Err(SolveError::VehicleBudgetExhausted {
                        max_vehicles: self.max_vehicles.get(),
                    });
                }
            };
        }
    }

    /// Solve one trial, adding lazy cuts until the optimum has no subtour.
    ///
    /// Returns `None` when the count is infeasible.
    fn attempt(
        &self,
        vehicles: usize,
        cuts_added: &mut usize,
    ) -> Result<Option<(CvrpFormulation, Assignment)>, SolveError> {
        let mut formulation =
            CvrpFormulation::build(self.matrix, self.demands, self.capacity, vehicles, self.mode);
        let mut rounds = 0_usize;
        loop {
            let outcome = self
                .engine
                .solve(formulation.model())
                .map_err(|source| SolveError::SolverFault { vehicles, source })?;
            let assignment = match outcome {
                EngineOutcome::Infeasible => return Ok(None),
                EngineOutcome::Optimal(assignment) => assignment,
            };
            if self.mode == SubtourMode::Exhaustive {
                return Ok(Some((formulation, assignment)));
            }

            let subtours = find_subtours(formulation.arcs(), &assignment);
            if subtours.is_empty() {
                return Ok(Some((formulation, assignment)));
            }
            rounds += 1;
            debug!(
                "{vehicles} vehicle(s), round {rounds}: cutting subtours {subtours:?}"
            );
            for subset in &subtours {
                formulation.add_subtour_cut(subset);
            }
            *cuts_added += subtours.len();
            if rounds.is_multiple_of(CUT_ROUND_WARNING_INTERVAL) {
                warn!(
                    "{vehicles} vehicle(s): {rounds} subtour cut rounds so far ({} cuts)",
                    formulation.cut_count()
                );
            }
        }
    }
}
