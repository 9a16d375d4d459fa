//! Validated CVRP problem instances.
//!
//! An [`Instance`] owns the ordered node list (depot first), the per-vehicle
//! capacity and the upper bound on the number of vehicles the search may try.
//! Construction rejects anything the formulation cannot represent, so the
//! solver never has to re-check its inputs.

use std::num::NonZeroUsize;

use geo::Coord;
use thiserror::Error;

use crate::node::{DEPOT, Node};

/// A customer location with the cargo it needs.
///
/// # Examples
/// ```
/// use cvrp_core::City;
///
/// let city = City::new(48.96, 2.48, 1.0);
/// assert_eq!(city.location().x, 2.48);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Cargo to deliver.
    pub demand: f64,
}

impl City {
    /// Construct a city from latitude, longitude and demand.
    pub const fn new(lat: f64, lon: f64, demand: f64) -> Self {
        Self { lat, lon, demand }
    }

    /// Position as a `geo` coordinate (`x = longitude`, `y = latitude`).
    pub const fn location(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }
}

/// Errors returned by [`Instance::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    /// Capacity was zero, negative or not finite.
    #[error("vehicle capacity must be positive and finite, got {capacity}")]
    InvalidCapacity {
        /// Offending capacity.
        capacity: f64,
    },
    /// The vehicle bound was zero.
    #[error("vehicle bound must be at least one")]
    InvalidVehicleBound,
    /// No customers were supplied.
    #[error("instance must contain at least one city")]
    NoCustomers,
    /// A demand was negative or not finite.
    #[error("node {node} has invalid demand {demand}")]
    InvalidDemand {
        /// Node index (depot is `0`).
        node: usize,
        /// Offending demand.
        demand: f64,
    },
    /// A coordinate fell outside WGS84 bounds.
    #[error("node {node} has invalid coordinate (lat {lat}, lon {lon})")]
    InvalidCoordinate {
        /// Node index (depot is `0`).
        node: usize,
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lon: f64,
    },
}

/// A complete CVRP problem: depot, customers, capacity and vehicle bound.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use cvrp_core::{City, Instance};
///
/// # fn main() -> Result<(), cvrp_core::InstanceError> {
/// let instance = Instance::new(
///     Coord { x: 2.4753, y: 48.9566 },
///     &[City::new(48.96, 2.48, 1.0), City::new(48.95, 2.46, 1.0)],
///     2.0,
///     2,
/// )?;
/// assert_eq!(instance.nodes().len(), 3);
/// assert_eq!(instance.customer_count(), 2);
/// assert_eq!(instance.max_vehicles().get(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    nodes: Vec<Node>,
    capacity: f64,
    max_vehicles: NonZeroUsize,
}

impl Instance {
    /// Validate and build an instance. Cities are numbered from `1` in the
    /// order given.
    pub fn new(
        depot: Coord<f64>,
        cities: &[City],
        capacity: f64,
        max_vehicles: usize,
    ) -> Result<Self, InstanceError> {
        if !(capacity.is_finite() && capacity > 0.0) {
            return Err(InstanceError::InvalidCapacity { capacity });
        }
        let max_vehicles =
            NonZeroUsize::new(max_vehicles).ok_or(InstanceError::InvalidVehicleBound)?;
        if cities.is_empty() {
            return Err(InstanceError::NoCustomers);
        }

        let mut nodes = Vec::with_capacity(cities.len() + 1);
        nodes.push(Node::depot(depot));
        nodes.extend(
            cities
                .iter()
                .enumerate()
                .map(|(idx, city)| Node::customer(idx + 1, city.location(), city.demand)),
        );

        for node in &nodes {
            validate_coordinate(node)?;
            if !(node.demand.is_finite() && node.demand >= 0.0) {
                return Err(InstanceError::InvalidDemand {
                    node: node.id,
                    demand: node.demand,
                });
            }
        }
        debug_assert!(
            nodes.first().is_some_and(|depot| depot.demand == 0.0),
            "depot demand must be zero"
        );

        Ok(Self {
            nodes,
            capacity,
            max_vehicles,
        })
    }

    /// All nodes, depot first.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The depot node.
    pub fn depot(&self) -> &Node {
        // `new` always pushes the depot first.
        &self.nodes[DEPOT]
    }

    /// Customer nodes in index order.
    pub fn customers(&self) -> &[Node] {
        &self.nodes[1..]
    }

    /// Number of customers (nodes other than the depot).
    pub fn customer_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Demand per node, indexed like [`Instance::nodes`].
    pub fn demands(&self) -> Vec<f64> {
        self.nodes.iter().map(|node| node.demand).collect()
    }

    /// Per-vehicle cargo capacity.
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Largest vehicle count the search may try.
    pub const fn max_vehicles(&self) -> NonZeroUsize {
        self.max_vehicles
    }
}

fn validate_coordinate(node: &Node) -> Result<(), InstanceError> {
    let lat = node.latitude();
    let lon = node.longitude();
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(InstanceError::InvalidCoordinate {
            node: node.id,
            lat,
            lon,
        })
    }
}

/// A latitude/longitude pair as written in instance files.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatLon {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// Serialised form of an [`Instance`].
///
/// # Examples
/// ```
/// use cvrp_core::{Instance, InstanceSpec};
///
/// let json = r#"{
///     "depot": { "lat": 48.9566, "lon": 2.4753 },
///     "capacity": 2,
///     "max_vehicles": 2,
///     "cities": [ { "lat": 48.96, "lon": 2.48, "demand": 1 } ]
/// }"#;
/// let spec: InstanceSpec = serde_json::from_str(json).unwrap();
/// let instance = Instance::try_from(spec).unwrap();
/// assert_eq!(instance.customer_count(), 1);
/// ```
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InstanceSpec {
    /// Depot position.
    pub depot: LatLon,
    /// Per-vehicle cargo capacity.
    pub capacity: f64,
    /// Upper bound on the number of vehicles.
    pub max_vehicles: usize,
    /// Customers to serve.
    pub cities: Vec<City>,
}

#[cfg(feature = "serde")]
impl TryFrom<InstanceSpec> for Instance {
    type Error = InstanceError;

    fn try_from(spec: InstanceSpec) -> Result<Self, Self::Error> {
        let depot = Coord {
            x: spec.depot.lon,
            y: spec.depot.lat,
        };
        Self::new(depot, &spec.cities, spec.capacity, spec.max_vehicles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn depot() -> Coord<f64> {
        Coord {
            x: 2.4753,
            y: 48.9566,
        }
    }

    #[fixture]
    fn cities() -> Vec<City> {
        vec![City::new(48.96, 2.48, 1.0), City::new(48.95, 2.46, 2.0)]
    }

    #[rstest]
    fn numbers_cities_after_the_depot(depot: Coord<f64>, cities: Vec<City>) {
        let instance = Instance::new(depot, &cities, 3.0, 2).expect("valid instance");
        let ids: Vec<usize> = instance.nodes().iter().map(|node| node.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(instance.depot().is_depot());
        assert_eq!(instance.demands(), vec![0.0, 1.0, 2.0]);
        assert_eq!(instance.customers().len(), 2);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_invalid_capacity(depot: Coord<f64>, cities: Vec<City>, #[case] capacity: f64) {
        let err = Instance::new(depot, &cities, capacity, 1).expect_err("invalid capacity");
        assert!(matches!(err, InstanceError::InvalidCapacity { .. }));
    }

    #[rstest]
    fn rejects_zero_vehicle_bound(depot: Coord<f64>, cities: Vec<City>) {
        let err = Instance::new(depot, &cities, 1.0, 0).expect_err("zero bound");
        assert_eq!(err, InstanceError::InvalidVehicleBound);
    }

    #[rstest]
    fn rejects_empty_city_list(depot: Coord<f64>) {
        let err = Instance::new(depot, &[], 1.0, 1).expect_err("no cities");
        assert_eq!(err, InstanceError::NoCustomers);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn rejects_invalid_demand(depot: Coord<f64>, #[case] demand: f64) {
        let cities = [City::new(48.96, 2.48, demand)];
        let err = Instance::new(depot, &cities, 1.0, 1).expect_err("invalid demand");
        assert!(matches!(err, InstanceError::InvalidDemand { node: 1, .. }));
    }

    #[rstest]
    #[case(91.0, 0.0)]
    #[case(0.0, 181.0)]
    #[case(f64::NAN, 0.0)]
    fn rejects_out_of_range_coordinates(depot: Coord<f64>, #[case] lat: f64, #[case] lon: f64) {
        let cities = [City::new(lat, lon, 1.0)];
        let err = Instance::new(depot, &cities, 1.0, 1).expect_err("invalid coordinate");
        assert!(matches!(err, InstanceError::InvalidCoordinate { node: 1, .. }));
    }

    #[rstest]
    fn zero_demand_customers_are_allowed(depot: Coord<f64>) {
        let cities = [City::new(48.96, 2.48, 0.0)];
        assert!(Instance::new(depot, &cities, 1.0, 1).is_ok());
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn spec_converts_into_instance() {
        let json = r#"{
            "depot": { "lat": 48.9566, "lon": 2.4753 },
            "capacity": 2,
            "max_vehicles": 1,
            "cities": [ { "lat": 48.96, "lon": 2.48, "demand": 1 } ]
        }"#;
        let spec: InstanceSpec = serde_json::from_str(json).expect("should deserialise");
        let instance = Instance::try_from(spec).expect("valid instance");
        assert_eq!(instance.depot().longitude(), 2.4753);
        assert_eq!(instance.capacity(), 2.0);
    }
}
