//! The user-facing command: `lat,lon`, `lat lon`, or a place name.

use crate::location::{LocationError, LookupTarget};
use serde::Serialize;

/// Result of one command, as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandReply {
    pub success: bool,
    pub message: String,
}

impl CommandReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

/// Parse command text into a lookup target.
///
/// Input made only of numeric tokens must be exactly a valid
/// latitude/longitude pair; anything else is taken as a place name.
pub fn parse_command(text: &str) -> Result<LookupTarget, LocationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(LocationError::InvalidInput(
            "expected a place name or a latitude,longitude pair".into(),
        ));
    }

    let tokens: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    // "nan"/"inf" parse as floats but are place names here.
    let numbers: Vec<f64> = tokens
        .iter()
        .filter(|t| t.bytes().any(|b| b.is_ascii_digit()))
        .filter_map(|t| t.parse::<f64>().ok())
        .collect();

    if numbers.len() != tokens.len() {
        return Ok(LookupTarget::Place(text.to_string()));
    }

    match numbers.as_slice() {
        [lat, lon] => {
            validate_coords(*lat, *lon)?;
            Ok(LookupTarget::Coordinates { lat: *lat, lon: *lon })
        }
        _ => Err(LocationError::InvalidInput(format!(
            "expected two numbers (latitude, longitude), got {}",
            numbers.len()
        ))),
    }
}

/// Latitude -90..90, longitude -180..180, both finite.
pub fn validate_coords(lat: f64, lon: f64) -> Result<(), LocationError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(LocationError::InvalidInput(format!(
            "coordinates out of range: {}, {} (lat -90..90, lon -180..180)",
            lat, lon
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_pair() {
        assert_eq!(
            parse_command("52.52,13.405").unwrap(),
            LookupTarget::Coordinates { lat: 52.52, lon: 13.405 }
        );
        assert_eq!(
            parse_command(" -33.86 , 151.2 ").unwrap(),
            LookupTarget::Coordinates { lat: -33.86, lon: 151.2 }
        );
    }

    #[test]
    fn test_space_pair() {
        assert_eq!(
            parse_command("40.7 -74").unwrap(),
            LookupTarget::Coordinates { lat: 40.7, lon: -74.0 }
        );
    }

    #[test]
    fn test_place_name() {
        assert_eq!(parse_command("  Berlin ").unwrap(), LookupTarget::Place("Berlin".into()));
        assert_eq!(
            parse_command("District 9, Paris").unwrap(),
            LookupTarget::Place("District 9, Paris".into())
        );
    }

    #[test]
    fn test_invalid_input() {
        assert!(matches!(parse_command(""), Err(LocationError::InvalidInput(_))));
        assert!(matches!(parse_command("52.5"), Err(LocationError::InvalidInput(_))));
        assert!(matches!(parse_command("1 2 3"), Err(LocationError::InvalidInput(_))));
        assert!(matches!(parse_command("91,0"), Err(LocationError::InvalidInput(_))));
        assert!(matches!(parse_command("0,181"), Err(LocationError::InvalidInput(_))));
    }

    #[test]
    fn test_float_keywords_are_places() {
        assert_eq!(parse_command("Nan").unwrap(), LookupTarget::Place("Nan".into()));
    }
}
