//! [`MilpEngine`] implementations.
//!
//! [`MicrolpEngine`] translates a [`MilpModel`] into a `good_lp` problem and
//! solves it with the pure Rust `microlp` branch-and-bound backend.
//! [`TimeBoxedEngine`] decorates any engine with a wall-clock budget.

use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use cvrp_core::{
    Assignment, EngineError, EngineOutcome, LinearExpr, MilpEngine, MilpModel, Relation,
    SELECTED_THRESHOLD,
};
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, constraint,
    variable,
};

/// Exact engine backed by `good_lp` and `microlp`.
///
/// Binary values are snapped to `0.0` or `1.0` and the objective is
/// recomputed from the model's own coefficients, so reported costs never
/// carry solver round-off.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpEngine;

impl MicrolpEngine {
    fn expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
        let mut expression = Expression::with_capacity(expr.terms().len());
        for &(var, coefficient) in expr.terms() {
            if let Some(&handle) = handles.get(var.index()) {
                expression.add_mul(coefficient, handle);
            }
        }
        expression
    }
}

impl MilpEngine for MicrolpEngine {
    fn solve(&self, model: &MilpModel) -> Result<EngineOutcome, EngineError> {
        let mut variables = ProblemVariables::new();
        let handles: Vec<Variable> = (0..model.variable_count())
            .map(|_| variables.add(variable().binary()))
            .collect();

        let objective = Self::expression(model.objective(), &handles);
        let mut problem = variables
            .minimise(objective)
            .using(good_lp::solvers::microlp::microlp);
        for linear in model.constraints() {
            let lhs = Self::expression(&linear.expr, &handles);
            problem = problem.with(match linear.relation {
                Relation::Equal => constraint::eq(lhs, linear.rhs),
                Relation::LessOrEqual => constraint::leq(lhs, linear.rhs),
            });
        }

        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = handles
                    .iter()
                    .map(|&handle| {
                        if solution.value(handle) > SELECTED_THRESHOLD {
                            1.0
                        } else {
                            0.0
                        }
                    })
                    .collect();
                let cost = model.objective().evaluate(&values);
                Ok(EngineOutcome::Optimal(Assignment::new(values, cost)))
            }
            Err(ResolutionError::Infeasible) => Ok(EngineOutcome::Infeasible),
            Err(ResolutionError::Unbounded) => Err(EngineError::Unbounded),
            Err(other) => Err(EngineError::Failure {
                message: other.to_string(),
            }),
        }
    }
}

/// Runs each solve of the wrapped engine on a worker thread and gives up
/// after `budget`.
///
/// An abandoned worker keeps running until its engine returns; its result is
/// discarded.
#[derive(Debug)]
pub struct TimeBoxedEngine<E> {
    inner: Arc<E>,
    budget: Duration,
}

impl<E> TimeBoxedEngine<E> {
    /// Wrap `inner` with a per-solve `budget`.
    pub fn new(inner: E, budget: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            budget,
        }
    }

    /// The per-solve budget.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }
}

impl<E: MilpEngine + 'static> MilpEngine for TimeBoxedEngine<E> {
    fn solve(&self, model: &MilpModel) -> Result<EngineOutcome, EngineError> {
        let (sender, receiver) = mpsc::channel();
        let engine = Arc::clone(&self.inner);
        let owned = model.clone();
        thread::Builder::new()
            .name("milp-trial".to_owned())
            .spawn(move || {
                // The receiver is gone once the budget elapsed; nothing to report.
                let _ignored = sender.send(engine.solve(&owned));
            })
            .map_err(|err| EngineError::Failure {
                message: format!("failed to spawn solver thread: {err}"),
            })?;

        match receiver.recv_timeout(self.budget) {
            Ok(outcome) => outcome,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(EngineError::Timeout {
                budget: self.budget,
            }),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Failure {
                message: "solver thread terminated without an answer".to_owned(),
            }),
        }
    }
}
