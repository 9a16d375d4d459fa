//! The integer-programming engine seam.
//!
//! The engine is an opaque collaborator: it receives a [`MilpModel`] and
//! answers with an optimal assignment, a proof of infeasibility, or a failure
//! unrelated to feasibility.

use std::time::Duration;

use thiserror::Error;

use crate::model::{MilpModel, VarId};

/// Values above this threshold count as "selected" for a binary variable.
pub const SELECTED_THRESHOLD: f64 = 0.5;

/// An optimal solution reported by an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    values: Vec<f64>,
    objective: f64,
}

impl Assignment {
    /// Wrap the realised variable values and the objective value.
    pub const fn new(values: Vec<f64>, objective: f64) -> Self {
        Self { values, objective }
    }

    /// Value of `var`, or `0.0` if the engine reported no value for it.
    pub fn value(&self, var: VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or_default()
    }

    /// Whether a binary variable is set.
    pub fn is_selected(&self, var: VarId) -> bool {
        self.value(var) > SELECTED_THRESHOLD
    }

    /// Objective value at this assignment.
    pub const fn objective(&self) -> f64 {
        self.objective
    }

    /// All variable values, indexed by [`VarId::index`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// The answer to a single solve.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    /// The engine proved an optimum.
    Optimal(Assignment),
    /// The engine proved no assignment satisfies the constraints.
    Infeasible,
}

/// Failures unrelated to feasibility.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The objective is unbounded. Binary models never are, so this marks an
    /// engine defect.
    #[error("engine reported an unbounded objective")]
    Unbounded,
    /// The engine crashed or gave up.
    #[error("engine failure: {message}")]
    Failure {
        /// Engine-supplied description.
        message: String,
    },
    /// The wall-clock budget for one solve elapsed.
    #[error("engine exceeded its {budget:?} budget")]
    Timeout {
        /// The budget that elapsed.
        budget: Duration,
    },
}

/// Solve a [`MilpModel`] to proven optimality.
///
/// Engines must be `Send + Sync` so callers can move solves onto worker
/// threads.
///
/// # Examples
///
/// ```rust
/// use cvrp_core::{Assignment, EngineError, EngineOutcome, MilpEngine, MilpModel};
///
/// struct AllZero;
///
/// impl MilpEngine for AllZero {
///     fn solve(&self, model: &MilpModel) -> Result<EngineOutcome, EngineError> {
///         let values = vec![0.0; model.variable_count()];
///         let objective = model.objective().evaluate(&values);
///         Ok(EngineOutcome::Optimal(Assignment::new(values, objective)))
///     }
/// }
///
/// let outcome = AllZero.solve(&MilpModel::new())?;
/// assert!(matches!(outcome, EngineOutcome::Optimal(_)));
/// # Ok::<(), EngineError>(())
/// ```
pub trait MilpEngine: Send + Sync {
    /// Solve `model`, minimising its objective.
    fn solve(&self, model: &MilpModel) -> Result<EngineOutcome, EngineError>;
}

impl<E: MilpEngine + ?Sized> MilpEngine for &E {
    fn solve(&self, model: &MilpModel) -> Result<EngineOutcome, EngineError> {
        (**self).solve(model)
    }
}

impl<E: MilpEngine + ?Sized> MilpEngine for Box<E> {
    fn solve(&self, model: &MilpModel) -> Result<EngineOutcome, EngineError> {
        (**self).solve(model)
    }
}

impl<E: MilpEngine + ?Sized> MilpEngine for std::sync::Arc<E> {
    fn solve(&self, model: &MilpModel) -> Result<EngineOutcome, EngineError> {
        (**self).solve(model)
    }
}
