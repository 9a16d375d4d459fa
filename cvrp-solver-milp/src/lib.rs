//! Exact CVRP solver built on mixed-integer linear programming.
//!
//! This crate provides [`MilpSolver`], an implementation of the
//! [`Solver`](cvrp_core::Solver) trait that returns the minimum number of
//! vehicles able to serve every customer and, for that fleet, routes of least
//! total distance.
//!
//! For each trial vehicle count `K = 1, 2, ...` the solver builds a
//! three-index vehicle flow model ([`CvrpFormulation`]) and hands it to a
//! [`MilpEngine`](cvrp_core::MilpEngine). The first count with an optimum
//! wins. Subtours are eliminated either lazily, by cutting each detached
//! cycle found in an optimum and solving again, or upfront over every
//! customer subset ([`SubtourMode`]). Routes are then rebuilt from the
//! selected arcs by [`RouteReconstructor`].
//!
//! [`MicrolpEngine`] is the default engine; [`TimeBoxedEngine`] adds a
//! per-trial wall-clock budget to any engine.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod engine;
mod formulation;
mod reconstruct;
mod search;
mod solver;
mod subtour;

pub use engine::{MicrolpEngine, TimeBoxedEngine};
pub use formulation::{ArcIndex, ArcVar, CvrpFormulation, SubtourMode};
pub use reconstruct::RouteReconstructor;
pub use search::{SearchResult, VehicleCountSearch};
pub use solver::{MilpSolver, MilpSolverConfig};
pub use subtour::find_subtours;

#[doc(hidden)]
pub mod test_support;
