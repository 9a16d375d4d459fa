//! Travel costs between geographic points.
//!
//! The [`DistanceProvider`] trait abstracts where a cost comes from: the
//! closed-form great-circle formula in [`HaversineDistance`], or an external
//! routing service implemented elsewhere. A provider is chosen once per run
//! and handed to the [`CostMatrixBuilder`](crate::CostMatrixBuilder).

mod error;
mod haversine;
mod provider;

pub use error::DistanceError;
pub use haversine::{EARTH_RADIUS_KM, HaversineDistance, haversine_meters};
pub use provider::{CoordPair, DistanceProvider};
