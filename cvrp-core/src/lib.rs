//! Core domain types for exact capacitated vehicle routing.
//!
//! These models provide basic validation to keep downstream
//! components honest. Constructors return `Result` to surface
//! invalid input early.
//!
//! The crate defines the two seams the solver depends on: the
//! [`DistanceProvider`] that prices travel between coordinates and the
//! [`MilpEngine`] that solves declarative [`MilpModel`]s.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod distance;
mod engine;
mod instance;
mod matrix;
mod model;
mod node;
mod route;
mod solver;

pub use distance::{
    CoordPair, DistanceError, DistanceProvider, EARTH_RADIUS_KM, HaversineDistance,
    haversine_meters,
};
pub use engine::{Assignment, EngineError, EngineOutcome, MilpEngine, SELECTED_THRESHOLD};
pub use instance::{City, Instance, InstanceError};
#[cfg(feature = "serde")]
pub use instance::{InstanceSpec, LatLon};
pub use matrix::{CostMatrix, CostMatrixBuilder};
pub use model::{LinearConstraint, LinearExpr, MilpModel, Relation, VarId};
pub use node::{DEPOT, Node};
pub use route::{Diagnostics, Plan, Route};
pub use solver::{SolveError, Solver};

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
