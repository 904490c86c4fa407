//! Settings store and typed configuration.
//!
//! Settings are flat string key → string value. `GeoConfig` reads the
//! `terraport.*` keys once at startup; the result is immutable.

use crate::http::DEFAULT_TIMEOUT;
use crate::location::cache::DEFAULT_TTL;
use crate::location::{LocationError, PlanarPosition};
use crate::projection::ProjectionConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_IP_API_URL: &str =
    "http://ip-api.com/json/%s?fields=status,message,country,regionName,city,lat,lon,timezone,isp";
pub const DEFAULT_GEOCODE_API_URL: &str =
    "https://nominatim.openstreetmap.org/search?q=%s&format=json&limit=1";

/// String key → string value lookups.
pub trait Settings: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

impl Settings for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Settings read from a flat JSON object on disk.
///
/// Non-string JSON values are stored by their JSON text (`true`, `8`, ...).
#[derive(Debug, Default)]
pub struct FileSettings {
    values: HashMap<String, String>,
}

impl FileSettings {
    /// Load from the default location (~/.terraport/settings.json).
    /// A missing file yields empty settings.
    pub fn load() -> Result<Self, LocationError> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, LocationError> {
        let data = fs::read_to_string(path)
            .map_err(|e| LocationError::Config(format!("{}: {}", path.display(), e)))?;
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(&data)
            .map_err(|e| LocationError::Config(format!("{}: {}", path.display(), e)))?;

        let values = raw
            .into_iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => (k, s),
                other => (k, other.to_string()),
            })
            .collect();
        Ok(Self { values })
    }

    fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".terraport")
            .join("settings.json")
    }
}

impl Settings for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Everything the lookup engine needs from the settings store.
#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// Gate for automatic lookups on join/spawn.
    pub enable: bool,
    pub ip_api_url: String,
    pub geocode_api_url: String,
    pub api_key: Option<String>,
    pub cache_ttl: Duration,
    pub timeout: Duration,
    /// Auto-lookup on new player/respawn when no world center is known.
    pub auto_on_spawn: bool,
    pub projection: ProjectionConfig,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            enable: true,
            ip_api_url: DEFAULT_IP_API_URL.to_string(),
            geocode_api_url: DEFAULT_GEOCODE_API_URL.to_string(),
            api_key: None,
            cache_ttl: DEFAULT_TTL,
            timeout: DEFAULT_TIMEOUT,
            auto_on_spawn: false,
            projection: ProjectionConfig::default(),
        }
    }
}

#[derive(Deserialize)]
struct WorldCenter {
    x: f64,
    y: f64,
    z: f64,
}

impl GeoConfig {
    pub fn from_settings(settings: &dyn Settings) -> Result<Self, LocationError> {
        let defaults = Self::default();
        let get = |key: &str| {
            settings
                .get(&format!("terraport.{}", key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let enable = get("enable").map(|v| parse_bool("enable", &v)).transpose()?;
        let auto_on_spawn = get("auto_on_spawn").map(|v| parse_bool("auto_on_spawn", &v)).transpose()?;
        let integer_blocks = get("integer_blocks").map(|v| parse_bool("integer_blocks", &v)).transpose()?;
        let cache_ttl = get("cache_ttl").map(|v| parse_secs("cache_ttl", &v)).transpose()?;
        let timeout = get("timeout").map(|v| parse_secs("timeout", &v)).transpose()?;

        let center_lon = get("center_lon").map(|v| parse_float("center_lon", &v)).transpose()?;
        let center_lat = get("center_lat").map(|v| parse_float("center_lat", &v)).transpose()?;
        let scale_x = get("scale_x").map(|v| parse_scale("scale_x", &v)).transpose()?;
        let scale_z = get("scale_z").map(|v| parse_scale("scale_z", &v)).transpose()?;
        let reference_center = get("world_center").map(|v| parse_world_center(&v)).transpose()?;

        let base = defaults.projection;
        Ok(Self {
            enable: enable.unwrap_or(defaults.enable),
            ip_api_url: get("ip_api_url").unwrap_or(defaults.ip_api_url),
            geocode_api_url: get("geocode_api_url").unwrap_or(defaults.geocode_api_url),
            api_key: get("api_key"),
            cache_ttl: cache_ttl.unwrap_or(defaults.cache_ttl),
            timeout: timeout.unwrap_or(defaults.timeout),
            auto_on_spawn: auto_on_spawn.unwrap_or(defaults.auto_on_spawn),
            projection: ProjectionConfig {
                center_lon: center_lon.unwrap_or(base.center_lon),
                center_lat: center_lat.unwrap_or(base.center_lat),
                scale_x: scale_x.unwrap_or(base.scale_x),
                scale_z: scale_z.unwrap_or(base.scale_z),
                reference_center,
                integer_blocks: integer_blocks.unwrap_or(base.integer_blocks),
            },
        })
    }

    pub fn has_world_center(&self) -> bool {
        self.projection.reference_center.is_some()
    }
}

fn parse_bool(key: &str, v: &str) -> Result<bool, LocationError> {
    match v.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(LocationError::Config(format!("{}: expected a boolean, got '{}'", key, v))),
    }
}

fn parse_float(key: &str, v: &str) -> Result<f64, LocationError> {
    v.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .ok_or_else(|| LocationError::Config(format!("{}: expected a number, got '{}'", key, v)))
}

fn parse_scale(key: &str, v: &str) -> Result<f64, LocationError> {
    let f = parse_float(key, v)?;
    if f == 0.0 {
        return Err(LocationError::Config(format!("{}: scale must be non-zero", key)));
    }
    Ok(f)
}

fn parse_secs(key: &str, v: &str) -> Result<Duration, LocationError> {
    v.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| LocationError::Config(format!("{}: expected whole seconds, got '{}'", key, v)))
}

fn parse_world_center(v: &str) -> Result<PlanarPosition, LocationError> {
    let c: WorldCenter = serde_json::from_str(v)
        .map_err(|e| LocationError::Config(format!("world_center: {}", e)))?;
    Ok(PlanarPosition::new(c.x, c.y, c.z))
}
