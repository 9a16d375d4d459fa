//! Declarative binary integer programs.
//!
//! A [`MilpModel`] is plain data: binary variables, a linear objective to
//! minimise and named linear constraints. Building a model never solves it;
//! a [`MilpEngine`](crate::MilpEngine) does that.

use std::fmt;

/// Handle to a binary decision variable within one [`MilpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Position of the variable in the model's variable list.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A sum of `coefficient * variable` terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    /// An empty expression.
    pub const fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Append `coefficient * var`.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    /// Builder form of [`LinearExpr::add_term`].
    #[must_use]
    pub fn with_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    /// The `(variable, coefficient)` terms in insertion order.
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Whether the expression has no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate against a value for every variable.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coefficient)| {
                coefficient * values.get(var.index()).copied().unwrap_or_default()
            })
            .sum()
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
        }
    }
}

/// How a constraint's expression relates to its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `expr == rhs`
    Equal,
    /// `expr <= rhs`
    LessOrEqual,
}

/// A named linear constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Human-readable label, used in logs and diagnostics.
    pub name: String,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Comparison against `rhs`.
    pub relation: Relation,
    /// Constant right-hand side.
    pub rhs: f64,
}

impl LinearConstraint {
    /// `expr == rhs`
    pub fn equal(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            relation: Relation::Equal,
            rhs,
        }
    }

    /// `expr <= rhs`
    pub fn at_most(name: impl Into<String>, expr: LinearExpr, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            relation: Relation::LessOrEqual,
            rhs,
        }
    }

    /// Whether `values` satisfy the constraint within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.relation {
            Relation::Equal => (lhs - self.rhs).abs() <= tolerance,
            Relation::LessOrEqual => lhs <= self.rhs + tolerance,
        }
    }
}

/// A minimisation problem over binary variables.
///
/// # Examples
/// ```
/// use cvrp_core::{LinearConstraint, LinearExpr, MilpModel};
///
/// let mut model = MilpModel::new();
/// let a = model.add_binary();
/// let b = model.add_binary();
/// model.set_objective(LinearExpr::new().with_term(a, 3.0).with_term(b, 1.0));
/// model.add_constraint(LinearConstraint::equal(
///     "pick-one",
///     LinearExpr::new().with_term(a, 1.0).with_term(b, 1.0),
///     1.0,
/// ));
/// assert_eq!(model.variable_count(), 2);
/// assert_eq!(model.constraints().len(), 1);
/// assert_eq!(model.objective().evaluate(&[0.0, 1.0]), 1.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MilpModel {
    variable_count: usize,
    objective: LinearExpr,
    constraints: Vec<LinearConstraint>,
}

impl MilpModel {
    /// An empty model.
    pub const fn new() -> Self {
        Self {
            variable_count: 0,
            objective: LinearExpr::new(),
            constraints: Vec::new(),
        }
    }

    /// Declare a new binary variable.
    pub fn add_binary(&mut self) -> VarId {
        let id = VarId(self.variable_count);
        self.variable_count += 1;
        id
    }

    /// Replace the objective to minimise.
    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    /// Append a constraint.
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Number of declared variables.
    pub const fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Objective to minimise.
    pub const fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// All constraints in insertion order.
    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    /// Names of constraints that `values` violate.
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|constraint| !constraint.is_satisfied(values, tolerance))
            .map(|constraint| constraint.name.as_str())
            .collect()
    }
}
