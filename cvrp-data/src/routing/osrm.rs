//! OSRM API response types for the Route service.
//!
//! The Route service finds the fastest route between the supplied
//! coordinates, in the order given. Only the route length is read.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM Route API response.
///
/// The response contains one or more routes on success or an error message
/// on failure. The `code` field indicates the response status.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"InvalidValue"` - Invalid coordinate or option value
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Routes found, best first.
    #[serde(default)]
    pub routes: Vec<RouteSummary>,
}

/// One route in an OSRM Route response.
#[derive(Debug, Deserialize)]
pub struct RouteSummary {
    /// Length in meters.
    pub distance: f64,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Check if the service reported that no route exists.
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        self.code == "NoRoute"
    }

    /// Distance of the best route, if any.
    #[must_use]
    pub fn best_distance(&self) -> Option<f64> {
        self.routes.first().map(|route| route.distance)
    }
}
