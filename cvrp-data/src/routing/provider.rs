//! HTTP-based `DistanceProvider` using OSRM's Route API.
//!
//! Every ordered coordinate pair becomes one Route request. Batches fan out
//! over a bounded number of concurrent requests and come back in input
//! order.

use std::num::NonZeroUsize;
use std::time::Duration;

use cvrp_core::{CoordPair, DistanceError, DistanceProvider};
use futures_util::{StreamExt, TryStreamExt, stream};
use geo::Coord;
use log::debug;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::osrm::RouteResponse;

/// Error type for [`HttpDistanceProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The base URL does not parse.
    #[error("invalid routing service URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// Offending URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The base URL uses a scheme other than `http` or `https`.
    #[error("routing service URL must use http or https, got {scheme:?}")]
    UnsupportedScheme {
        /// Offending scheme.
        scheme: String,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "cvrp-exact/0.1";

/// Default OSRM routing profile.
pub const DEFAULT_PROFILE: &str = "driving";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_MAX_CONCURRENT_REQUESTS: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(limit) => limit,
    None => NonZeroUsize::MIN,
};

/// Configuration for [`HttpDistanceProvider`].
#[derive(Debug, Clone)]
pub struct HttpDistanceProviderConfig {
    /// Base URL for the OSRM service (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// OSRM profile segment of the request path.
    pub profile: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Upper bound on requests in flight during a batch.
    pub max_concurrent_requests: NonZeroUsize,
}

impl Default for HttpDistanceProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}

impl HttpDistanceProviderConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the OSRM profile, e.g. `"driving"` or `"walking"`.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the concurrency bound. Zero is raised to one.
    #[must_use]
    pub fn with_max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = NonZeroUsize::new(limit).unwrap_or(NonZeroUsize::MIN);
        self
    }
}

/// Road-network distance provider backed by the OSRM Route API.
///
/// The provider implements the synchronous [`DistanceProvider`] trait by
/// blocking on asynchronous HTTP requests. It owns a Tokio runtime that is
/// reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider uses its own stored runtime. Inside
/// a multi-threaded runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]) it uses that runtime's handle with
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime it
/// falls back to its own runtime, which may deadlock if the caller's runtime
/// drives IO this request depends on.
///
/// # Distances
///
/// The reported cost is `routes[0].distance` in meters. Costs are not assumed
/// symmetric: `(a, b)` and `(b, a)` are separate requests.
pub struct HttpDistanceProvider {
    client: Client,
    config: HttpDistanceProviderConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpDistanceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDistanceProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpDistanceProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpDistanceProviderConfig::new(base_url))
    }

    /// Create a new provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: HttpDistanceProviderConfig) -> Result<Self, ProviderBuildError> {
        validate_base_url(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpDistanceProviderConfig {
        &self.config
    }

    /// Build the OSRM Route API URL for one ordered pair.
    ///
    /// The URL format is
    /// `{base_url}/route/v1/{profile}/{lon},{lat};{lon},{lat}` followed by
    /// options that suppress geometry, alternatives and steps.
    fn build_route_url(&self, from: Coord<f64>, to: Coord<f64>) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=false&alternatives=false&steps=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.x,
            from.y,
            to.x,
            to.y
        )
    }

    async fn fetch_distance_async(
        &self,
        from: Coord<f64>,
        to: Coord<f64>,
    ) -> Result<f64, DistanceError> {
        let url = self.build_route_url(from, to);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        convert_body(&url, status, &body)
    }

    async fn fetch_all_async(&self, pairs: &[CoordPair]) -> Result<Vec<f64>, DistanceError> {
        stream::iter(pairs.iter().copied())
            .map(|(from, to)| self.fetch_distance_async(from, to))
            .buffered(self.config.max_concurrent_requests.get())
            .try_collect()
            .await
    }

    /// Convert a reqwest error to a `DistanceError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> DistanceError {
        if error.is_timeout() {
            return DistanceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return DistanceError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        DistanceError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

fn validate_base_url(base_url: &str) -> Result<(), ProviderBuildError> {
    let parsed = Url::parse(base_url).map_err(|source| ProviderBuildError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ProviderBuildError::UnsupportedScheme {
            scheme: other.to_owned(),
        }),
    }
}

/// Map an HTTP status and body onto a distance or a `DistanceError`.
///
/// OSRM reports `NoRoute` and query errors with a JSON body on a 400
/// status, so the body is inspected before the status.
fn convert_body(url: &str, status: StatusCode, body: &str) -> Result<f64, DistanceError> {
    let parsed = serde_json::from_str::<RouteResponse>(body);
    let response = match parsed {
        Ok(response) => response,
        Err(_) if !status.is_success() => {
            return Err(DistanceError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        Err(err) => {
            return Err(DistanceError::ParseError {
                message: err.to_string(),
            });
        }
    };

    if response.is_no_route() {
        return Err(DistanceError::NoRoute {
            url: url.to_owned(),
        });
    }
    if !response.is_ok() {
        return Err(DistanceError::ServiceError {
            code: response.code,
            message: response.message.unwrap_or_default(),
        });
    }
    if !status.is_success() {
        return Err(DistanceError::HttpError {
            url: url.to_owned(),
            status: status.as_u16(),
            message: "status contradicts an Ok response body".to_owned(),
        });
    }

    response.best_distance().ok_or_else(|| DistanceError::NoRoute {
        url: url.to_owned(),
    })
}

impl DistanceProvider for HttpDistanceProvider {
    fn distance(&self, from: Coord<f64>, to: Coord<f64>) -> Result<f64, DistanceError> {
        self.block_on(self.fetch_distance_async(from, to))
    }

    /// Fetch every pair concurrently, bounded by
    /// [`HttpDistanceProviderConfig::max_concurrent_requests`].
    ///
    /// The first failure aborts the batch; outstanding requests are dropped.
    fn distances(&self, pairs: &[CoordPair]) -> Result<Vec<f64>, DistanceError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            "requesting {} road distances from {} ({} in flight)",
            pairs.len(),
            self.config.base_url,
            self.config.max_concurrent_requests
        );
        self.block_on(self.fetch_all_async(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    const DEPOT: Coord<f64> = Coord {
        x: 2.4753,
        y: 48.9566,
    };
    const CITY: Coord<f64> = Coord { x: 2.48, y: 48.96 };

    #[fixture]
    fn provider() -> HttpDistanceProvider {
        HttpDistanceProvider::new("http://osrm.example.com").expect("provider should build")
    }

    /// Serve `count` requests with a canned response on a local port.
    fn serve(status_line: &'static str, body: &'static str, count: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
        let address = listener.local_addr().expect("local address");
        thread::spawn(move || {
            for stream in listener.incoming().take(count) {
                let mut stream = stream.expect("accept connection");
                let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
                let mut line = String::new();
                while reader.read_line(&mut line).expect("read request") > 2 {
                    line.clear();
                }
                let response = format!(
                    "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream
                    .write_all(response.as_bytes())
                    .expect("write response");
            }
        });
        format!("http://{address}")
    }

    #[rstest]
    fn build_route_url_formats_lon_lat_pairs(provider: HttpDistanceProvider) {
        let url = provider.build_route_url(DEPOT, CITY);

        assert_eq!(
            url,
            "http://osrm.example.com/route/v1/driving/2.4753,48.9566;2.48,48.96?overview=false&alternatives=false&steps=false"
        );
    }

    #[rstest]
    fn build_route_url_strips_trailing_slash_and_uses_profile() {
        let config = HttpDistanceProviderConfig::new("http://osrm.example.com/").with_profile("foot");
        let provider = HttpDistanceProvider::with_config(config).expect("provider should build");

        let url = provider.build_route_url(DEPOT, CITY);

        assert!(url.starts_with("http://osrm.example.com/route/v1/foot/"));
        assert!(!url.contains("//route"));
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://osrm.example.com")]
    fn invalid_base_urls_are_rejected(#[case] base_url: &str) {
        let err = HttpDistanceProvider::new(base_url).expect_err("should reject");
        assert!(matches!(
            err,
            ProviderBuildError::InvalidBaseUrl { .. } | ProviderBuildError::UnsupportedScheme { .. }
        ));
    }

    #[rstest]
    fn convert_body_takes_the_first_route() {
        let body = r#"{"code":"Ok","routes":[{"distance":512.5,"duration":60.0},{"distance":900.0}]}"#;
        let distance = convert_body("u", StatusCode::OK, body).expect("should parse");
        assert_eq!(distance, 512.5);
    }

    #[rstest]
    fn convert_body_maps_no_route() {
        let body = r#"{"code":"NoRoute","message":"Impossible route between points"}"#;
        let err = convert_body("u", StatusCode::BAD_REQUEST, body).expect_err("should fail");
        assert_eq!(err, DistanceError::NoRoute { url: "u".to_owned() });
    }

    #[rstest]
    fn convert_body_maps_service_errors() {
        let body = r#"{"code":"InvalidValue","message":"Invalid coordinate value."}"#;
        let err = convert_body("u", StatusCode::BAD_REQUEST, body).expect_err("should fail");
        match err {
            DistanceError::ServiceError { code, message } => {
                assert_eq!(code, "InvalidValue");
                assert_eq!(message, "Invalid coordinate value.");
            }
            other => panic!("expected ServiceError, got {other:?}"),
        }
    }

    #[rstest]
    fn convert_body_maps_non_json_failures_to_http_errors() {
        let err = convert_body("u", StatusCode::BAD_GATEWAY, "<html>bad gateway</html>")
            .expect_err("should fail");
        assert!(matches!(err, DistanceError::HttpError { status: 502, .. }));
    }

    #[rstest]
    fn convert_body_reports_malformed_success_bodies() {
        let err = convert_body("u", StatusCode::OK, "{").expect_err("should fail");
        assert!(matches!(err, DistanceError::ParseError { .. }));
    }

    #[rstest]
    fn convert_body_treats_empty_routes_as_no_route() {
        let err = convert_body("u", StatusCode::OK, r#"{"code":"Ok","routes":[]}"#)
            .expect_err("should fail");
        assert!(matches!(err, DistanceError::NoRoute { .. }));
    }

    #[rstest]
    fn empty_batches_make_no_requests(provider: HttpDistanceProvider) {
        assert_eq!(provider.distances(&[]), Ok(Vec::new()));
    }

    #[rstest]
    fn batches_preserve_input_order_against_a_live_server() {
        let base_url = serve(
            "HTTP/1.1 200 OK",
            r#"{"code":"Ok","routes":[{"distance":742.0,"duration":90.0}]}"#,
            3,
        );
        let config = HttpDistanceProviderConfig::new(base_url).with_max_concurrent_requests(2);
        let provider = HttpDistanceProvider::with_config(config).expect("provider should build");

        let costs = provider
            .distances(&[(DEPOT, CITY), (CITY, DEPOT), (DEPOT, CITY)])
            .expect("server answers every request");

        assert_eq!(costs, vec![742.0, 742.0, 742.0]);
    }

    #[rstest]
    fn unreachable_services_surface_network_errors() {
        let address = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
            listener.local_addr().expect("local address")
        };
        let provider =
            HttpDistanceProvider::new(format!("http://{address}")).expect("provider should build");

        let err = provider.distance(DEPOT, CITY).expect_err("nothing listens");

        assert!(matches!(err, DistanceError::NetworkError { .. }));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpDistanceProviderConfig::new("http://example.com")
            .with_profile("walking")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0")
            .with_max_concurrent_requests(0);

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.profile, "walking");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.max_concurrent_requests.get(), 1);
    }
}
