//! Test utilities for routing providers.
//!
//! [`StubDistanceProvider`] is a deterministic test double for
//! [`DistanceProvider`] that answers without making HTTP requests.

use cvrp_core::{CoordPair, DistanceError, DistanceProvider, haversine_meters};
use geo::Coord;

/// Stub `DistanceProvider` for testing.
///
/// # Example
///
/// ```
/// use cvrp_core::{DistanceError, DistanceProvider};
/// use cvrp_data::routing::test_support::StubDistanceProvider;
/// use geo::Coord;
///
/// let provider = StubDistanceProvider::with_constant(250.0);
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 1.0, y: 1.0 };
/// assert_eq!(provider.distance(a, b), Ok(250.0));
/// assert_eq!(provider.distance(a, a), Ok(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct StubDistanceProvider {
    response: StubResponse,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Constant(f64),
    Detour(f64),
    Error(DistanceError),
}

impl StubDistanceProvider {
    /// Answer `meters` for every pair of distinct coordinates.
    #[must_use]
    pub const fn with_constant(meters: f64) -> Self {
        Self {
            response: StubResponse::Constant(meters),
        }
    }

    /// Answer the great-circle distance scaled by `factor`, mimicking a road
    /// network that is longer than the crow flies.
    #[must_use]
    pub const fn with_detour_factor(factor: f64) -> Self {
        Self {
            response: StubResponse::Detour(factor),
        }
    }

    /// Fail every request for distinct coordinates with `error`.
    #[must_use]
    pub const fn with_error(error: DistanceError) -> Self {
        Self {
            response: StubResponse::Error(error),
        }
    }
}

impl DistanceProvider for StubDistanceProvider {
    fn distance(&self, from: Coord<f64>, to: Coord<f64>) -> Result<f64, DistanceError> {
        if from == to {
            return Ok(0.0);
        }
        match &self.response {
            StubResponse::Constant(meters) => Ok(*meters),
            StubResponse::Detour(factor) => Ok(haversine_meters(from, to) * factor),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }

    fn distances(&self, pairs: &[CoordPair]) -> Result<Vec<f64>, DistanceError> {
        pairs
            .iter()
            .map(|&(from, to)| self.distance(from, to))
            .collect()
    }
}
