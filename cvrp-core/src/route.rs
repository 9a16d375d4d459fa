//! Vehicle routes and solved plans.

use std::time::Duration;

use crate::node::DEPOT;

/// Ordered node identifiers visited by one vehicle.
///
/// A route starts and ends at the depot. A vehicle that serves nobody has
/// the trivial route `[0, 0]`.
///
/// # Examples
/// ```
/// use cvrp_core::Route;
///
/// let route = Route::new(vec![0, 2, 1, 0]);
/// assert_eq!(route.customers(), &[2, 1]);
/// assert_eq!(route.arcs().collect::<Vec<_>>(), vec![(0, 2), (2, 1), (1, 0)]);
/// assert!(!route.is_trivial());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Route {
    stops: Vec<usize>,
}

impl Route {
    /// Wrap a stop sequence.
    pub const fn new(stops: Vec<usize>) -> Self {
        Self { stops }
    }

    /// The route of a vehicle that leaves the depot for nobody.
    pub fn trivial() -> Self {
        Self::new(vec![DEPOT, DEPOT])
    }

    /// Every stop, depot included at both ends.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Stops strictly between the two depot visits.
    pub fn customers(&self) -> &[usize] {
        match self.stops.len() {
            0..=2 => &[],
            len => &self.stops[1..len - 1],
        }
    }

    /// Consecutive `(from, to)` legs.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.stops.windows(2).map(|leg| (leg[0], leg[1]))
    }

    /// Whether the vehicle serves no customer.
    pub fn is_trivial(&self) -> bool {
        self.customers().is_empty()
    }
}

/// Timing and effort figures for a solve.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// Wall-clock time spent solving, matrix construction included.
    pub solve_time: Duration,
    /// Vehicle counts tried, the successful one included.
    pub trials: usize,
    /// Subtour cuts added lazily across all trials.
    pub cuts_added: usize,
}

/// A solved instance: the minimum vehicle count and its routes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    /// Smallest feasible number of vehicles.
    pub vehicle_count: usize,
    /// Sum of traversed arc costs, in kilometres.
    pub total_distance_km: f64,
    /// One route per vehicle, as node identifiers.
    pub routes: Vec<Route>,
    /// One route per vehicle, as `[longitude, latitude]` pairs starting and
    /// ending at the depot.
    pub coordinates: Vec<Vec<[f64; 2]>>,
    /// Solve statistics.
    pub diagnostics: Diagnostics,
}

impl Plan {
    /// Total distance in meters.
    pub fn total_distance_meters(&self) -> f64 {
        self.total_distance_km * 1000.0
    }
}
