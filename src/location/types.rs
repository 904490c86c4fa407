//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How a geo fix was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixSource {
    Cache,
    IpApi,
    Geocoder,
    Fallback,
    Manual,
    Projection,
}

impl fmt::Display for FixSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => write!(f, "Cache"),
            Self::IpApi => write!(f, "IP"),
            Self::Geocoder => write!(f, "Geocoder"),
            Self::Fallback => write!(f, "Built-in"),
            Self::Manual => write!(f, "Manual"),
            Self::Projection => write!(f, "Projection"),
        }
    }
}

/// A resolved latitude/longitude with optional descriptive metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub lat: f64,
    pub lon: f64,
    pub source: FixSource,
    /// Full display name from the provider (e.g. "Berlin, Deutschland")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,
    /// Provider metadata carried through but not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl GeoFix {
    pub fn new(lat: f64, lon: f64, source: FixSource) -> Self {
        Self {
            lat,
            lon,
            source,
            display_name: None,
            country_name: None,
            region_name: None,
            city_name: None,
            isp: None,
            timezone: None,
        }
    }

    /// Human-readable label: display name, else "city, region, country",
    /// else the formatted coordinates.
    pub fn label(&self) -> String {
        if let Some(name) = self.display_name.as_deref().filter(|s| !s.is_empty()) {
            return name.to_string();
        }
        let parts: Vec<&str> = [&self.city_name, &self.region_name, &self.country_name]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            format_coords(self.lat, self.lon)
        } else {
            parts.join(", ")
        }
    }
}

/// Format a coordinate pair as "52.5200°N, 13.4050°E".
pub fn format_coords(lat: f64, lon: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lon >= 0.0 { 'E' } else { 'W' };
    format!("{:.4}\u{00B0}{}, {:.4}\u{00B0}{}", lat.abs(), ns, lon.abs(), ew)
}

/// A projected position. `y` is owned by the terrain, not the projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanarPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PlanarPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for PlanarPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Cache key. Addresses and place names live in disjoint key spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    Address(String),
    Place(String),
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(a) => write!(f, "ip:{}", a),
            Self::Place(p) => write!(f, "place:{}", p),
        }
    }
}

/// What a lookup is asked to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupTarget {
    Address(String),
    Place(String),
    Coordinates { lat: f64, lon: f64 },
}

/// One resolution attempt on behalf of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub subject: String,
    pub target: LookupTarget,
}

/// Where a resolved lookup put the subject.
#[derive(Debug, Clone, Serialize)]
pub struct Placement {
    pub fix: GeoFix,
    pub position: PlanarPosition,
    pub label: String,
}

/// Location resolution errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("No geolocation provider is available")]
    ProviderUnavailable,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid provider response: {0}")]
    Parse(String),
    #[error("Unknown place: '{0}'")]
    UnknownPlace(String),
    #[error("Your client cannot go there: {0}")]
    CapabilityVeto(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
