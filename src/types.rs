//! Core data types for aircraft state snapshots.

use std::fmt;

/// A longitude/latitude pair where either half may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Coordinate {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
}

impl Coordinate {
    pub const UNKNOWN: Self = Self {
        longitude: None,
        latitude: None,
    };

    /// Create a fully known coordinate.
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude: Some(longitude),
            latitude: Some(latitude),
        }
    }

    /// Both halves, if both are present.
    pub fn known(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some((lon, lat)),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.known().is_some()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.known() {
            Some((lon, lat)) => write!(f, "({}, {})", lon, lat),
            None => write!(f, "(unknown)"),
        }
    }
}

/// Source of an aircraft's reported position.
///
/// The raw integer is kept on [`AircraftState`]; this is only an
/// interpretation of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    AdsB,
    Asterix,
    Mlat,
    Flarm,
    Unknown(i64),
}

impl From<i64> for PositionSource {
    fn from(v: i64) -> Self {
        match v {
            0 => Self::AdsB,
            1 => Self::Asterix,
            2 => Self::Mlat,
            3 => Self::Flarm,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for PositionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdsB => write!(f, "ADS-B"),
            Self::Asterix => write!(f, "ASTERIX"),
            Self::Mlat => write!(f, "MLAT"),
            Self::Flarm => write!(f, "FLARM"),
            Self::Unknown(v) => write!(f, "unknown ({})", v),
        }
    }
}

/// One tracked aircraft snapshot as reported by the states endpoint.
///
/// Optional fields are `None` when the source marked them null. The
/// non-optional `last_contact`, `on_ground`, `spi` and `position_source`
/// fall back to zero/false on a null source value.
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftState {
    /// ICAO 24-bit transponder address, hex encoded
    pub icao24: String,
    /// Callsign, may be empty
    pub call_sign: String,
    pub origin_country: String,
    /// Seconds since epoch of the last position update
    pub time_position: Option<i64>,
    /// Seconds since epoch of the last message of any kind
    pub last_contact: i64,
    pub coordinate: Coordinate,
    /// Barometric altitude in meters
    pub baro_altitude: Option<f64>,
    pub on_ground: bool,
    /// Ground speed in m/s
    pub velocity: Option<f64>,
    /// Track angle in degrees clockwise from north
    pub true_track: Option<f64>,
    /// Vertical rate in m/s
    pub vertical_rate: Option<f64>,
    /// IDs of the receivers that contributed to this state
    pub sensors: Option<Vec<i64>>,
    /// Geometric altitude in meters
    pub geo_altitude: Option<f64>,
    /// Transponder code, kept verbatim (including a literal "null")
    pub squawk: String,
    /// Special purpose indicator
    pub spi: bool,
    pub position_source: i64,
}

impl AircraftState {
    pub fn position_source_kind(&self) -> PositionSource {
        PositionSource::from(self.position_source)
    }
}
