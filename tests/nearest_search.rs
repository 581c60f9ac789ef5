//! End-to-end nearest search against a scripted states API.

use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::{json, Value};
use skynear::{
    client::{ClientConfig, ClientError, QueryBox, StatesResponse, StatesTransport, TrackingClient},
    distance::{Metric, EARTH_RADIUS_KM},
    nearest::{self, FinderError, SearchError},
};
use std::collections::VecDeque;

const TARGET_LON: f64 = 48.8584;
const TARGET_LAT: f64 = 2.2945;

struct ScriptedApi {
    bodies: Mutex<VecDeque<Result<Value, StatusCode>>>,
    calls: Mutex<Vec<QueryBox>>,
}

impl ScriptedApi {
    fn new(bodies: Vec<Result<Value, StatusCode>>) -> Self {
        Self {
            bodies: Mutex::new(bodies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StatesTransport for ScriptedApi {
    async fn fetch_states(&self, query: &QueryBox) -> Result<StatesResponse, ClientError> {
        self.calls.lock().push(*query);
        let next = self.bodies.lock().pop_front();
        match next {
            Some(Ok(body)) => Ok(serde_json::from_value(body)?),
            Some(Err(status)) => Err(ClientError::Upstream { status }),
            None => Ok(StatesResponse::default()),
        }
    }
}

/// A state vector placed `km` from the target along the latitude axis.
fn record_at(icao: &str, callsign: &str, km: f64) -> Value {
    json!([
        icao, callsign, "France", 1700000000, 1700000005,
        TARGET_LON, TARGET_LAT + km / EARTH_RADIUS_KM, 10500.0, false,
        230.1, 271.3, -0.33, [12, 34], 10620.5, "1234", false, 0
    ])
}

fn client(api: ScriptedApi) -> TrackingClient<ScriptedApi> {
    TrackingClient::with_transport(api, ClientConfig::default())
}

#[tokio::test]
async fn test_selects_closest_state() {
    let api = ScriptedApi::new(vec![Ok(json!({
        "time": 1700000010,
        "states": [
            record_at("39de4f", "AFR123  ", 120.5),
            record_at("4ca7b3", "EIN42   ", 45.2),
            record_at("3c6589", "DLH7    ", 300.0),
        ]
    }))]);
    let client = client(api);

    let found = nearest::locate(&client, TARGET_LON, TARGET_LAT, Metric::Geodesic)
        .await
        .unwrap();

    assert_eq!(found.state.icao24, "4ca7b3");
    assert_eq!(found.state.call_sign, "EIN42");
    assert_eq!(found.state.sensors, Some(vec![12, 34]));
    assert!((found.distance - 45.2).abs() < 1e-3, "distance {}", found.distance);
}

#[tokio::test]
async fn test_widens_until_states_found() {
    let api = ScriptedApi::new(vec![
        Ok(json!({"time": 1, "states": null})),
        Ok(json!({"time": 2})),
        Ok(json!({"time": 3, "states": [record_at("abcdef", "X", 900.0)]})),
    ]);
    let client = client(api);

    let found = nearest::locate(&client, TARGET_LON, TARGET_LAT, Metric::Geodesic)
        .await
        .unwrap();
    assert_eq!(found.state.icao24, "abcdef");

    let margins: Vec<f64> = client_calls(&client).iter().map(QueryBox::margin).collect();
    assert_eq!(margins.len(), 3);
    for (margin, expected) in margins.iter().zip([5.0, 10.0, 15.0]) {
        assert!((margin - expected).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_empty_states_is_no_candidates() {
    let api = ScriptedApi::new(vec![Ok(json!({"time": 1, "states": []}))]);
    let client = client(api);

    let err = nearest::locate(&client, TARGET_LON, TARGET_LAT, Metric::Geodesic)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Finder(FinderError::NoCandidates)));
}

#[tokio::test]
async fn test_exhausted_widening_is_no_candidates() {
    let api = ScriptedApi::new(vec![]);
    let config = ClientConfig::default().with_max_widenings(Some(3));
    let client = TrackingClient::with_transport(api, config);

    let err = nearest::locate(&client, TARGET_LON, TARGET_LAT, Metric::Geodesic)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Finder(FinderError::NoCandidates)));
}

#[tokio::test]
async fn test_upstream_error_surfaces() {
    let api = ScriptedApi::new(vec![Err(StatusCode::TOO_MANY_REQUESTS)]);
    let client = client(api);

    let err = nearest::locate(&client, TARGET_LON, TARGET_LAT, Metric::Geodesic)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SearchError::Client(ClientError::Upstream { status }) if status == StatusCode::TOO_MANY_REQUESTS
    ));
}

#[tokio::test]
async fn test_malformed_record_surfaces() {
    let mut bad = record_at("badbad", "Y", 10.0);
    bad[6] = json!("not-a-number");
    let api = ScriptedApi::new(vec![Ok(json!({"time": 1, "states": [bad]}))]);
    let client = client(api);

    let err = nearest::locate(&client, TARGET_LON, TARGET_LAT, Metric::Geodesic)
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Client(ClientError::Record(_))));
}

fn client_calls(client: &TrackingClient<ScriptedApi>) -> Vec<QueryBox> {
    client.transport().calls.lock().clone()
}
