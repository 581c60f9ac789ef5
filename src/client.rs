//! HTTP client for querying aircraft states from the tracking API.

use crate::protocol::{self, ParseError};
use crate::types::AircraftState;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Default root of the OpenSky REST API.
pub const DEFAULT_BASE_URL: &str = "https://opensky-network.org/api";
/// Default half-width of the first query box, and the widening step, in degrees.
pub const DEFAULT_MARGIN_STEP: f64 = 5.0;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Tracking API returned error status: {status}")]
    Upstream { status: StatusCode },
    #[error("Invalid response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("Malformed aircraft record: {0}")]
    Record(#[from] ParseError),
}

/// Longitude/latitude bounds sent with a states query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryBox {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl QueryBox {
    /// Box centered on a coordinate, extending `margin` degrees each way.
    ///
    /// The margin is not corrected for latitude.
    pub fn around(longitude: f64, latitude: f64, margin: f64) -> Self {
        Self {
            lon_min: longitude - margin,
            lon_max: longitude + margin,
            lat_min: latitude - margin,
            lat_max: latitude + margin,
        }
    }

    /// Push every bound outward by `step` degrees.
    pub fn widen(&mut self, step: f64) {
        self.lon_min -= step;
        self.lon_max += step;
        self.lat_min -= step;
        self.lat_max += step;
    }

    /// Current half-width in longitude.
    pub fn margin(&self) -> f64 {
        (self.lon_max - self.lon_min) / 2.0
    }

    fn to_query_string(&self) -> String {
        format!(
            "lamin={}&lomin={}&lamax={}&lomax={}",
            self.lat_min, self.lon_min, self.lat_max, self.lon_max
        )
    }
}

/// Body of a `/states/all` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatesResponse {
    /// Server timestamp in seconds since epoch
    #[serde(default)]
    pub time: i64,
    /// Raw positional records; null when the box holds no aircraft
    #[serde(default)]
    pub states: Option<Vec<Value>>,
}

/// Configuration for the tracking client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, without the `/states/all` path
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Initial box half-width and additive widening step, in degrees
    pub margin_step: f64,
    /// Stop widening after this many extra rounds; `None` never stops
    pub max_widenings: Option<u32>,
    /// Optional account credentials (HTTP basic auth)
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            margin_step: DEFAULT_MARGIN_STEP,
            max_widenings: None,
            username: None,
            password: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_margin_step(mut self, margin_step: f64) -> Self {
        self.margin_step = margin_step;
        self
    }

    pub fn with_max_widenings(mut self, max_widenings: Option<u32>) -> Self {
        self.max_widenings = max_widenings;
        self
    }

    pub fn with_credentials(mut self, username: String, password: Option<String>) -> Self {
        self.username = Some(username);
        self.password = password;
        self
    }
}

/// Source of states responses for a query box.
///
/// [`HttpTransport`] talks to the real API; tests substitute scripted
/// responses.
pub trait StatesTransport: Send + Sync {
    /// Run one states query for the given box.
    fn fetch_states(
        &self,
        query: &QueryBox,
    ) -> impl Future<Output = Result<StatesResponse, ClientError>> + Send;
}

/// Transport backed by a pooled `reqwest::Client`.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn states_url(&self, query: &QueryBox) -> String {
        format!("{}/states/all?{}", self.base_url, query.to_query_string())
    }
}

impl StatesTransport for HttpTransport {
    async fn fetch_states(&self, query: &QueryBox) -> Result<StatesResponse, ClientError> {
        let url = self.states_url(query);

        tracing::debug!("Fetching: {}", url);

        let mut request = self.client.get(&url);
        if let Some(ref username) = self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Upstream { status });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Client that finds the aircraft around a coordinate.
pub struct TrackingClient<T = HttpTransport> {
    transport: T,
    config: ClientConfig,
}

impl TrackingClient<HttpTransport> {
    /// Create a client talking to the configured API over HTTP.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self { transport, config })
    }
}

impl<T: StatesTransport> TrackingClient<T> {
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch and parse all aircraft in a box around the coordinate.
    ///
    /// While the API reports no states, every bound is pushed out by another
    /// `margin_step` degrees and the query repeats. Without `max_widenings`
    /// this only stops once something is found. When the cap is reached an
    /// empty list is returned. Any record that fails to parse fails the call.
    pub async fn fetch_near(
        &self,
        longitude: f64,
        latitude: f64,
    ) -> Result<Vec<AircraftState>, ClientError> {
        let step = self.config.margin_step;
        let mut query = QueryBox::around(longitude, latitude, step);
        let mut response = self.transport.fetch_states(&query).await?;
        let mut extra_iterations = 0u32;

        let records = loop {
            if let Some(records) = response.states.take() {
                break records;
            }

            if self
                .config
                .max_widenings
                .is_some_and(|max| extra_iterations >= max)
            {
                tracing::warn!(
                    "No results after {} extra iterations (margin {} degrees), giving up",
                    extra_iterations,
                    query.margin()
                );
                return Ok(Vec::new());
            }

            extra_iterations += 1;
            tracing::info!("No results. Trying extra iteration {}...", extra_iterations);

            query.widen(step);
            response = self.transport.fetch_states(&query).await?;
        };

        tracing::debug!(
            server_time = response.time,
            records = records.len(),
            margin = query.margin(),
            "Received states"
        );

        let states = records
            .iter()
            .map(protocol::parse_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(states)
    }
}
