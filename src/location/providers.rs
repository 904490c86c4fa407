//! Location providers: IP geolocation API, geocoder, and built-in fallback dataset.

use super::types::{FixSource, GeoFix, LocationError};
use crate::config::GeoConfig;
use crate::http::{HttpClient, HttpRequest};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, warn};

// ─── Built-in dataset ───────────────────────────────────────────

struct BuiltinCity {
    names: &'static [&'static str], // canonical + aliases
    lat: f64,
    lon: f64,
    display: &'static str,
    country: &'static str,
}

const BUILTIN_CITIES: &[BuiltinCity] = &[
    BuiltinCity { names: &["berlin"], lat: 52.5200, lon: 13.4050, display: "Berlin", country: "Germany" },
    BuiltinCity { names: &["hamburg"], lat: 53.5511, lon: 9.9937, display: "Hamburg", country: "Germany" },
    BuiltinCity { names: &["munich", "münchen", "muenchen"], lat: 48.1351, lon: 11.5820, display: "Munich", country: "Germany" },
    BuiltinCity { names: &["paris"], lat: 48.8566, lon: 2.3522, display: "Paris", country: "France" },
    BuiltinCity { names: &["london"], lat: 51.5074, lon: -0.1278, display: "London", country: "United Kingdom" },
    BuiltinCity { names: &["madrid"], lat: 40.4168, lon: -3.7038, display: "Madrid", country: "Spain" },
    BuiltinCity { names: &["rome", "roma"], lat: 41.9028, lon: 12.4964, display: "Rome", country: "Italy" },
    BuiltinCity { names: &["amsterdam"], lat: 52.3676, lon: 4.9041, display: "Amsterdam", country: "Netherlands" },
    BuiltinCity { names: &["vienna", "wien"], lat: 48.2082, lon: 16.3738, display: "Vienna", country: "Austria" },
    BuiltinCity { names: &["zurich", "zürich"], lat: 47.3769, lon: 8.5417, display: "Zurich", country: "Switzerland" },
    BuiltinCity { names: &["stockholm"], lat: 59.3293, lon: 18.0686, display: "Stockholm", country: "Sweden" },
    BuiltinCity { names: &["oslo"], lat: 59.9139, lon: 10.7522, display: "Oslo", country: "Norway" },
    BuiltinCity { names: &["helsinki"], lat: 60.1699, lon: 24.9384, display: "Helsinki", country: "Finland" },
    BuiltinCity { names: &["reykjavik", "reykjavík"], lat: 64.1466, lon: -21.9426, display: "Reykjavik", country: "Iceland" },
    BuiltinCity { names: &["warsaw", "warszawa"], lat: 52.2297, lon: 21.0122, display: "Warsaw", country: "Poland" },
    BuiltinCity { names: &["prague", "praha"], lat: 50.0755, lon: 14.4378, display: "Prague", country: "Czechia" },
    BuiltinCity { names: &["athens"], lat: 37.9838, lon: 23.7275, display: "Athens", country: "Greece" },
    BuiltinCity { names: &["istanbul"], lat: 41.0082, lon: 28.9784, display: "Istanbul", country: "Türkiye" },
    BuiltinCity { names: &["moscow", "moskva"], lat: 55.7558, lon: 37.6173, display: "Moscow", country: "Russia" },
    BuiltinCity { names: &["kyiv", "kiev"], lat: 50.4501, lon: 30.5234, display: "Kyiv", country: "Ukraine" },
    BuiltinCity { names: &["cairo"], lat: 30.0444, lon: 31.2357, display: "Cairo", country: "Egypt" },
    BuiltinCity { names: &["lagos"], lat: 6.5244, lon: 3.3792, display: "Lagos", country: "Nigeria" },
    BuiltinCity { names: &["nairobi"], lat: -1.2921, lon: 36.8219, display: "Nairobi", country: "Kenya" },
    BuiltinCity { names: &["cape town"], lat: -33.9249, lon: 18.4241, display: "Cape Town", country: "South Africa" },
    BuiltinCity { names: &["dubai"], lat: 25.2048, lon: 55.2708, display: "Dubai", country: "United Arab Emirates" },
    BuiltinCity { names: &["mumbai", "bombay"], lat: 19.0760, lon: 72.8777, display: "Mumbai", country: "India" },
    BuiltinCity { names: &["delhi", "new delhi"], lat: 28.6139, lon: 77.2090, display: "New Delhi", country: "India" },
    BuiltinCity { names: &["beijing", "peking"], lat: 39.9042, lon: 116.4074, display: "Beijing", country: "China" },
    BuiltinCity { names: &["shanghai"], lat: 31.2304, lon: 121.4737, display: "Shanghai", country: "China" },
    BuiltinCity { names: &["hong kong"], lat: 22.3193, lon: 114.1694, display: "Hong Kong", country: "China" },
    BuiltinCity { names: &["tokyo"], lat: 35.6762, lon: 139.6503, display: "Tokyo", country: "Japan" },
    BuiltinCity { names: &["seoul"], lat: 37.5665, lon: 126.9780, display: "Seoul", country: "South Korea" },
    BuiltinCity { names: &["singapore"], lat: 1.3521, lon: 103.8198, display: "Singapore", country: "Singapore" },
    BuiltinCity { names: &["jakarta"], lat: -6.2088, lon: 106.8456, display: "Jakarta", country: "Indonesia" },
    BuiltinCity { names: &["sydney"], lat: -33.8688, lon: 151.2093, display: "Sydney", country: "Australia" },
    BuiltinCity { names: &["auckland"], lat: -36.8485, lon: 174.7633, display: "Auckland", country: "New Zealand" },
    BuiltinCity { names: &["new york", "nyc"], lat: 40.7128, lon: -74.0060, display: "New York", country: "United States" },
    BuiltinCity { names: &["los angeles", "la"], lat: 34.0522, lon: -118.2437, display: "Los Angeles", country: "United States" },
    BuiltinCity { names: &["chicago"], lat: 41.8781, lon: -87.6298, display: "Chicago", country: "United States" },
    BuiltinCity { names: &["san francisco", "sf"], lat: 37.7749, lon: -122.4194, display: "San Francisco", country: "United States" },
    BuiltinCity { names: &["anchorage"], lat: 61.2181, lon: -149.9003, display: "Anchorage", country: "United States" },
    BuiltinCity { names: &["honolulu"], lat: 21.3069, lon: -157.8583, display: "Honolulu", country: "United States" },
    BuiltinCity { names: &["toronto"], lat: 43.6532, lon: -79.3832, display: "Toronto", country: "Canada" },
    BuiltinCity { names: &["mexico city", "ciudad de méxico"], lat: 19.4326, lon: -99.1332, display: "Mexico City", country: "Mexico" },
    BuiltinCity { names: &["são paulo", "sao paulo"], lat: -23.5505, lon: -46.6333, display: "São Paulo", country: "Brazil" },
    BuiltinCity { names: &["rio de janeiro", "rio"], lat: -22.9068, lon: -43.1729, display: "Rio de Janeiro", country: "Brazil" },
    BuiltinCity { names: &["buenos aires"], lat: -34.6037, lon: -58.3816, display: "Buenos Aires", country: "Argentina" },
    BuiltinCity { names: &["lima"], lat: -12.0464, lon: -77.0428, display: "Lima", country: "Peru" },
    BuiltinCity { names: &["suva"], lat: -18.1416, lon: 178.4419, display: "Suva", country: "Fiji" },
    BuiltinCity { names: &["mcmurdo", "mcmurdo station"], lat: -77.8419, lon: 166.6863, display: "McMurdo Station", country: "Antarctica" },
];

/// Normalized name → city. Later entries overwrite earlier ones.
static BUILTIN_INDEX: LazyLock<HashMap<String, &'static BuiltinCity>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for city in BUILTIN_CITIES {
        for name in city.names {
            map.insert(normalize_place_name(name), city);
        }
    }
    map
});

/// Lower-case and collapse every run of non-alphanumeric characters to `_`.
///
/// `"  New-York  City!"` → `"new_york_city"`.
pub fn normalize_place_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Exact lookup in the built-in dataset by normalized name.
pub fn builtin_lookup(query: &str) -> Option<GeoFix> {
    BUILTIN_INDEX
        .get(&normalize_place_name(query))
        .map(|city| builtin_to_fix(city))
}

fn builtin_to_fix(city: &BuiltinCity) -> GeoFix {
    let mut fix = GeoFix::new(city.lat, city.lon, FixSource::Fallback);
    fix.display_name = Some(format!("{}, {}", city.display, city.country));
    fix.city_name = Some(city.display.to_string());
    fix.country_name = Some(city.country.to_string());
    fix
}

/// A city entry for the public city list API.
#[derive(Debug, Clone, Serialize)]
pub struct CityInfo {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Return the full built-in city list.
pub fn builtin_city_list() -> Vec<CityInfo> {
    BUILTIN_CITIES
        .iter()
        .map(|c| CityInfo {
            name: c.display.to_string(),
            country: c.country.to_string(),
            lat: c.lat,
            lon: c.lon,
        })
        .collect()
}

// ─── URL building ───────────────────────────────────────────────

const ADDRESS_SLOT: &str = "%s";
const KEY_TOKEN: &str = "%k";

/// Percent-encode every byte outside `[A-Za-z0-9-_.~]`.
/// Newlines are normalized to CRLF first.
pub fn percent_encode(s: &str) -> String {
    let crlf = s.replace("\r\n", "\n").replace('\n', "\r\n");
    urlencoding::encode(&crlf).into_owned()
}

/// Substitute `value` into the first `%s` slot. `%k` tokens become `key`
/// (empty when no key is configured).
fn fill_template(template: &str, value: &str, key: Option<&str>) -> String {
    let key = key.map(percent_encode).unwrap_or_default();
    match template.split_once(ADDRESS_SLOT) {
        Some((head, tail)) => format!(
            "{}{}{}",
            head.replace(KEY_TOKEN, &key),
            value,
            tail.replace(KEY_TOKEN, &key)
        ),
        None => template.replace(KEY_TOKEN, &key),
    }
}

/// Build an IP lookup URL. A configured key with no `%k` token in the
/// template is appended as a `key` query parameter.
pub fn ip_lookup_url(template: &str, address: &str, api_key: Option<&str>) -> String {
    let mut url = fill_template(template, address, api_key);
    if let Some(key) = api_key {
        if !template.contains(KEY_TOKEN) {
            let sep = if url.contains('?') { '&' } else { '?' };
            url = format!("{}{}key={}", url, sep, percent_encode(key));
        }
    }
    url
}

/// Build a geocoding URL for a free-text place name.
pub fn geocode_url(template: &str, place: &str, api_key: Option<&str>) -> String {
    fill_template(template, &percent_encode(place), api_key)
}

// ─── Payload parsing ────────────────────────────────────────────

/// Read a coordinate stored as a JSON number or a numeric string.
fn coord_field(obj: &Value, names: &[&str]) -> Option<f64> {
    names.iter().find_map(|name| match obj.get(name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn text_field(obj: &Value, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        obj.get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn coords_from(obj: &Value) -> Result<(f64, f64), LocationError> {
    let lat = coord_field(obj, &["lat", "latitude"])
        .ok_or_else(|| LocationError::Parse("no latitude".into()))?;
    let lon = coord_field(obj, &["lon", "lng", "longitude"])
        .ok_or_else(|| LocationError::Parse("no longitude".into()))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(LocationError::Parse(format!("coordinates out of range: {}, {}", lat, lon)));
    }
    Ok((lat, lon))
}

/// Extract a fix from an IP geolocation payload (a single JSON object).
pub fn parse_ip_payload(payload: &Value) -> Result<GeoFix, LocationError> {
    if !payload.is_object() {
        return Err(LocationError::Parse("expected a JSON object".into()));
    }
    if payload.get("status").and_then(Value::as_str) == Some("fail") {
        let message = text_field(payload, &["message"]).unwrap_or_else(|| "lookup failed".into());
        return Err(LocationError::Parse(message));
    }

    let (lat, lon) = coords_from(payload)?;
    let mut fix = GeoFix::new(lat, lon, FixSource::IpApi);
    fix.city_name = text_field(payload, &["city"]);
    fix.region_name = text_field(payload, &["regionName", "region"]);
    fix.country_name = text_field(payload, &["country", "country_name"]);
    fix.isp = text_field(payload, &["isp", "org"]);
    fix.timezone = text_field(payload, &["timezone"]);
    Ok(fix)
}

/// Extract a fix from a geocoder payload. Only the first result is used.
pub fn parse_geocode_payload(payload: &Value, query: &str) -> Result<GeoFix, LocationError> {
    let first = match payload {
        Value::Array(results) => match results.first() {
            Some(first) => first,
            None => return Err(LocationError::UnknownPlace(query.to_string())),
        },
        Value::Object(_) => payload,
        _ => return Err(LocationError::Parse("expected a JSON array".into())),
    };

    let (lat, lon) = coords_from(first)?;
    let mut fix = GeoFix::new(lat, lon, FixSource::Geocoder);
    fix.display_name = text_field(first, &["display_name", "name"]);
    Ok(fix)
}

// ─── Gateway ────────────────────────────────────────────────────

/// Builds provider URLs and performs fetches through the HTTP collaborator.
pub struct ProviderGateway {
    http: Option<Arc<dyn HttpClient>>,
    ip_api_url: String,
    geocode_api_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ProviderGateway {
    pub fn new(config: &GeoConfig, http: Option<Arc<dyn HttpClient>>) -> Self {
        Self {
            http,
            ip_api_url: config.ip_api_url.clone(),
            geocode_api_url: config.geocode_api_url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        }
    }

    /// Whether an HTTP collaborator exists at all.
    pub fn is_available(&self) -> bool {
        self.http.is_some()
    }

    pub fn build_ip_lookup_url(&self, address: &str) -> String {
        ip_lookup_url(&self.ip_api_url, address, self.api_key.as_deref())
    }

    pub fn build_geocode_url(&self, place: &str) -> String {
        geocode_url(&self.geocode_api_url, place, self.api_key.as_deref())
    }

    /// GET the URL and parse the body as JSON.
    ///
    /// Transport failures are errors. A body that is not JSON comes back as
    /// `Value::Null` so the caller can still cache it.
    pub async fn fetch(&self, url: &str) -> Result<Value, LocationError> {
        let http = self.http.as_ref().ok_or(LocationError::ProviderUnavailable)?;
        let result = http
            .fetch(HttpRequest { url: url.to_string(), timeout: self.timeout })
            .await;

        if !result.succeeded {
            let reason = result.error.unwrap_or_else(|| "request failed".into());
            warn!(%url, %reason, "provider request failed");
            return Err(LocationError::Network(reason));
        }

        match serde_json::from_str(&result.data) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(%url, error = %e, "provider returned invalid JSON");
                debug!(body = %result.data, "unparsable provider body");
                Ok(Value::Null)
            }
        }
    }
}
