//! Find the aircraft closest to a coordinate.
//!
//! This library provides functionality to:
//! - Query the OpenSky states API for aircraft inside a box around a point,
//!   widening the box until something is found
//! - Parse the positional, nullable state vectors into typed records
//! - Rank aircraft by distance and pick the nearest one
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Client    │───▶│  Protocol   │───▶│   Nearest   │
//! │   (HTTP)    │    │  (Parser)   │    │  (Finder)   │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!                                              │
//!                                              ▼
//!                                       ┌─────────────┐
//!                                       │  Distance   │
//!                                       └─────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use skynear::{
//!     client::{ClientConfig, TrackingClient},
//!     distance::Metric,
//!     nearest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TrackingClient::new(ClientConfig::default())?;
//!
//!     let found = nearest::locate(&client, 48.8584, 2.2945, Metric::Geodesic).await?;
//!     println!("{} at {}", found.state.icao24, found.distance);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod distance;
pub mod nearest;
pub mod protocol;
pub mod types;

pub use client::{ClientConfig, ClientError, QueryBox, StatesTransport, TrackingClient};
pub use distance::{direct_distance, geodesic_distance, Metric};
pub use nearest::{find_nearest, find_nearest_by, locate, FinderError, Nearest, SearchError};
pub use protocol::{parse_record, ParseError};
pub use types::{AircraftState, Coordinate, PositionSource};
