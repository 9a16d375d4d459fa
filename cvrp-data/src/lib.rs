//! Data access adapters for the exact CVRP solver.
//!
//! Responsibilities:
//! - Provide [`cvrp_core::DistanceProvider`] implementations backed by
//!   external services.
//! - Encapsulate wire formats of those services.
//!
//! Boundaries:
//! - Do not encode routing-model rules (live in `cvrp-core` and the solver).
//! - Keep blocking I/O off async executors; prefer async-capable clients.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod routing;
