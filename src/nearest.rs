//! Nearest-aircraft selection and the end-to-end search.

use crate::client::{ClientError, StatesTransport, TrackingClient};
use crate::distance::Metric;
use crate::types::{AircraftState, Coordinate};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("No aircraft with a known position were found")]
    NoCandidates,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),
    #[error("{0}")]
    Finder(#[from] FinderError),
}

/// The winning aircraft and its distance from the target.
#[derive(Debug, Clone, PartialEq)]
pub struct Nearest {
    pub state: AircraftState,
    pub distance: f64,
}

/// Pick the state geodesically closest to `target`.
pub fn find_nearest<I>(target: &Coordinate, states: I) -> Result<Nearest, FinderError>
where
    I: IntoIterator<Item = AircraftState>,
{
    find_nearest_by(target, states, Metric::Geodesic)
}

/// Pick the state closest to `target` under the given metric.
///
/// The first state wins ties. States without a known coordinate sit at
/// [`f64::MAX`] and are never chosen; if nothing beats that, the search
/// fails with [`FinderError::NoCandidates`].
pub fn find_nearest_by<I>(
    target: &Coordinate,
    states: I,
    metric: Metric,
) -> Result<Nearest, FinderError>
where
    I: IntoIterator<Item = AircraftState>,
{
    let mut best: Option<Nearest> = None;
    let mut shortest = f64::MAX;

    for state in states {
        let distance = metric.distance(target, &state.coordinate);
        if distance < shortest {
            shortest = distance;
            best = Some(Nearest { state, distance });
        }
    }

    best.ok_or(FinderError::NoCandidates)
}

/// Fetch the aircraft around `target` and return the closest one.
pub async fn locate<T: StatesTransport>(
    client: &TrackingClient<T>,
    longitude: f64,
    latitude: f64,
    metric: Metric,
) -> Result<Nearest, SearchError> {
    let states = client.fetch_near(longitude, latitude).await?;
    let count = states.len();

    let nearest = find_nearest_by(&Coordinate::new(longitude, latitude), states, metric)?;

    tracing::info!(
        icao24 = %nearest.state.icao24,
        distance = nearest.distance,
        candidates = count,
        "Selected nearest aircraft"
    );

    Ok(nearest)
}
