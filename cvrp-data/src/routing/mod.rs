//! HTTP-based distance providers for routing services.
//!
//! This module provides [`HttpDistanceProvider`], an implementation of
//! [`cvrp_core::DistanceProvider`] that asks an OSRM-compatible routing
//! service for the road distance of the best route between two coordinates.
//!
//! # Architecture
//!
//! Each ordered pair is one request to the OSRM Route API. When a whole cost
//! matrix is requested, pairs fan out concurrently with a bounded number of
//! requests in flight. The synchronous [`DistanceProvider`] trait is
//! implemented by blocking on async HTTP calls internally, keeping the core
//! library embeddable in synchronous contexts.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geo::Coord;
//! use cvrp_core::DistanceProvider;
//! use cvrp_data::routing::{HttpDistanceProvider, HttpDistanceProviderConfig};
//!
//! let config = HttpDistanceProviderConfig::new("http://localhost:5000")
//!     .with_profile("driving")
//!     .with_timeout(Duration::from_secs(60))
//!     .with_max_concurrent_requests(4);
//! let provider = HttpDistanceProvider::with_config(config)?;
//!
//! let depot = Coord { x: 2.4753, y: 48.9566 };
//! let city = Coord { x: 2.48, y: 48.96 };
//! let meters = provider.distance(depot, city)?;
//! println!("road distance: {meters} m");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`DistanceProvider`]: cvrp_core::DistanceProvider

mod osrm;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpDistanceProvider, HttpDistanceProviderConfig,
    ProviderBuildError,
};
