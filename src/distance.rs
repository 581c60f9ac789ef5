//! Distance metrics between coordinates.
//!
//! Both metrics treat an unknown coordinate as infinitely far away by
//! returning [`f64::MAX`], so such aircraft never win a nearest search.

use crate::types::Coordinate;
use std::fmt;
use std::str::FromStr;

/// Equatorial Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6378.137;

/// Which distance function to rank candidates by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Metric {
    #[default]
    Geodesic,
    Direct,
}

impl Metric {
    pub fn distance(&self, a: &Coordinate, b: &Coordinate) -> f64 {
        match self {
            Self::Geodesic => geodesic_distance(a, b),
            Self::Direct => direct_distance(a, b),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "geodesic" => Ok(Self::Geodesic),
            "direct" => Ok(Self::Direct),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geodesic => write!(f, "geodesic"),
            Self::Direct => write!(f, "direct"),
        }
    }
}

/// Euclidean distance in degree space.
pub fn direct_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let (Some((lon_a, lat_a)), Some((lon_b, lat_b))) = (a.known(), b.known()) else {
        return f64::MAX;
    };

    ((lon_a - lon_b).powi(2) + (lat_a - lat_b).powi(2)).sqrt()
}

/// Spherical law of cosines scaled by [`EARTH_RADIUS_KM`].
///
/// Two simplifications are kept on purpose for compatibility with existing
/// results: the longitude delta is the difference of absolute longitudes,
/// and latitudes are fed to the trig functions without a degree-to-radian
/// conversion. The `acos` argument is clamped to `[-1, 1]` so rounding
/// never produces NaN.
pub fn geodesic_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let (Some((lon_a, lat_a)), Some((lon_b, lat_b))) = (a.known(), b.known()) else {
        return f64::MAX;
    };

    let delta_lon = (lon_a.abs() - lon_b.abs()).abs();
    let cosine = lat_a.sin() * lat_b.sin() + lat_a.cos() * lat_b.cos() * delta_lon.cos();

    EARTH_RADIUS_KM * cosine.clamp(-1.0, 1.0).acos()
}
