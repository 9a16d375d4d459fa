use geo::Coord;

/// Index of the depot within every node list.
pub const DEPOT: usize = 0;

/// A stop in a routing instance: the depot or a customer.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The `id`
/// doubles as the node's index in the instance, so the depot is always `0`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use cvrp_core::Node;
///
/// let depot = Node::depot(Coord { x: 2.4753, y: 48.9566 });
/// assert_eq!(depot.id, 0);
/// assert_eq!(depot.demand, 0.0);
/// assert!(depot.is_depot());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Position in the instance; `0` is the depot.
    pub id: usize,
    /// Geographic position.
    pub location: Coord<f64>,
    /// Cargo to deliver. Always zero for the depot.
    pub demand: f64,
}

impl Node {
    /// Construct the depot at `location`.
    pub const fn depot(location: Coord<f64>) -> Self {
        Self {
            id: DEPOT,
            location,
            demand: 0.0,
        }
    }

    /// Construct a customer node.
    ///
    /// No validation happens here; [`Instance::new`](crate::Instance::new)
    /// checks demands and coordinates for the whole node set.
    pub const fn customer(id: usize, location: Coord<f64>, demand: f64) -> Self {
        Self {
            id,
            location,
            demand,
        }
    }

    /// Whether this node is the depot.
    pub const fn is_depot(&self) -> bool {
        self.id == DEPOT
    }

    /// Latitude in degrees.
    pub const fn latitude(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    pub const fn longitude(&self) -> f64 {
        self.location.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_keeps_its_identifier() {
        let node = Node::customer(3, Coord { x: 1.0, y: 2.0 }, 4.0);
        assert_eq!(node.id, 3);
        assert!(!node.is_depot());
        assert_eq!(node.longitude(), 1.0);
        assert_eq!(node.latitude(), 2.0);
    }
}
