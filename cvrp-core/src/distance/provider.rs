//! Distance provider trait for ordered coordinate pairs.

use geo::Coord;

use super::error::DistanceError;

/// An ordered `(from, to)` coordinate pair.
pub type CoordPair = (Coord<f64>, Coord<f64>);

/// Compute the travel cost, in meters, between two coordinates.
///
/// Costs may be asymmetric. Implementations that perform I/O should
/// override [`DistanceProvider::distances`] to issue requests concurrently.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use cvrp_core::{DistanceError, DistanceProvider};
///
/// struct Manhattan;
///
/// impl DistanceProvider for Manhattan {
///     fn distance(&self, from: Coord<f64>, to: Coord<f64>) -> Result<f64, DistanceError> {
///         Ok((from.x - to.x).abs() + (from.y - to.y).abs())
///     }
/// }
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 1.0, y: 2.0 };
/// assert_eq!(Manhattan.distance(a, b)?, 3.0);
/// assert_eq!(Manhattan.distances(&[(a, b), (b, b)])?, vec![3.0, 0.0]);
/// # Ok::<(), DistanceError>(())
/// ```
pub trait DistanceProvider {
    /// Return the cost of travelling from `from` to `to`.
    fn distance(&self, from: Coord<f64>, to: Coord<f64>) -> Result<f64, DistanceError>;

    /// Return the cost of every pair, in input order.
    ///
    /// The first failure aborts the batch.
    fn distances(&self, pairs: &[CoordPair]) -> Result<Vec<f64>, DistanceError> {
        pairs
            .iter()
            .map(|&(from, to)| self.distance(from, to))
            .collect()
    }
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for &P {
    fn distance(&self, from: Coord<f64>, to: Coord<f64>) -> Result<f64, DistanceError> {
        (**self).distance(from, to)
    }

    fn distances(&self, pairs: &[CoordPair]) -> Result<Vec<f64>, DistanceError> {
        (**self).distances(pairs)
    }
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for Box<P> {
    fn distance(&self, from: Coord<f64>, to: Coord<f64>) -> Result<f64, DistanceError> {
        (**self).distance(from, to)
    }

    fn distances(&self, pairs: &[CoordPair]) -> Result<Vec<f64>, DistanceError> {
        (**self).distances(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct FailsOnSecond;

    impl DistanceProvider for FailsOnSecond {
        fn distance(&self, from: Coord<f64>, _to: Coord<f64>) -> Result<f64, DistanceError> {
            if from.x > 0.0 {
                Err(DistanceError::NoRoute {
                    url: "stub".to_owned(),
                })
            } else {
                Ok(1.0)
            }
        }
    }

    #[rstest]
    fn batch_stops_at_first_failure() {
        let origin = Coord { x: 0.0, y: 0.0 };
        let east = Coord { x: 1.0, y: 0.0 };
        let err = FailsOnSecond
            .distances(&[(origin, east), (east, origin)])
            .expect_err("second pair fails");
        assert!(matches!(err, DistanceError::NoRoute { .. }));
    }

    #[rstest]
    fn boxed_provider_delegates() {
        let provider: Box<dyn DistanceProvider> = Box::new(FailsOnSecond);
        let origin = Coord { x: 0.0, y: 0.0 };
        assert_eq!(provider.distance(origin, origin), Ok(1.0));
    }
}
