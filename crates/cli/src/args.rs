//! Parsers for command-line values

use chrono::NaiveDateTime;
use hos_lib::error::SchedulerError;
use hos_lib::limits::DayLogMode;
use hos_lib::models::{Coordinate, RouteEndpoints};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ArgError {
    #[error("expected 'lon,lat', got '{0}'")]
    MalformedCoordinate(String),

    #[error("coordinate out of range: {0}")]
    CoordinateOutOfRange(String),

    #[error("expected departure as YYYY-MM-DDTHH:MM, got '{0}'")]
    InvalidDeparture(String),

    #[error("--pickup and --dropoff must be given together")]
    IncompleteRoute,
}

/// Parse `lon,lat`
pub fn parse_coordinate(value: &str) -> Result<Coordinate, ArgError> {
    let (lon, lat) = value
        .split_once(',')
        .ok_or_else(|| ArgError::MalformedCoordinate(value.to_string()))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| ArgError::MalformedCoordinate(value.to_string()))
    };

    let coord = Coordinate::new(parse(lon)?, parse(lat)?);
    if !coord.is_valid() {
        return Err(ArgError::CoordinateOutOfRange(value.to_string()));
    }
    Ok(coord)
}

/// Parse `YYYY-MM-DDTHH:MM`, seconds optional
pub fn parse_departure(value: &str) -> Result<NaiveDateTime, ArgError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| ArgError::InvalidDeparture(value.to_string()))
}

/// Parse `parity` or `stop-aware`
pub fn parse_mode(value: &str) -> Result<DayLogMode, SchedulerError> {
    value.parse()
}

/// Route from optional endpoints; the origin defaults to the pickup
pub fn route_from(
    origin: Option<Coordinate>,
    pickup: Option<Coordinate>,
    dropoff: Option<Coordinate>,
) -> Result<Option<RouteEndpoints>, ArgError> {
    match (pickup, dropoff) {
        (Some(pickup), Some(dropoff)) => Ok(Some(RouteEndpoints {
            origin: origin.unwrap_or(pickup),
            pickup,
            dropoff,
        })),
        (None, None) => Ok(None),
        _ => Err(ArgError::IncompleteRoute),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        let coord = parse_coordinate("-87.63, 41.88").unwrap();
        assert_eq!(coord, Coordinate::new(-87.63, 41.88));
    }

    #[test]
    fn test_parse_coordinate_errors() {
        assert!(matches!(
            parse_coordinate("41.88"),
            Err(ArgError::MalformedCoordinate(_))
        ));
        assert!(matches!(
            parse_coordinate("abc,1"),
            Err(ArgError::MalformedCoordinate(_))
        ));
        assert!(matches!(
            parse_coordinate("41.88,-187.63"),
            Err(ArgError::CoordinateOutOfRange(_))
        ));
    }

    #[test]
    fn test_parse_departure() {
        let t = parse_departure("2025-03-03T06:30").unwrap();
        assert_eq!(t.to_string(), "2025-03-03 06:30:00");
        assert!(parse_departure("2025-03-03T06:30:15").is_ok());
        assert!(parse_departure("03/03/2025 6am").is_err());
    }

    #[test]
    fn test_route_requires_both_ends() {
        let a = Coordinate::new(-90.0, 38.0);
        let b = Coordinate::new(-118.0, 34.0);

        let route = route_from(None, Some(a), Some(b)).unwrap().unwrap();
        assert_eq!(route.origin, a);
        assert_eq!(route_from(None, None, None).unwrap(), None);
        assert_eq!(
            route_from(Some(a), Some(a), None).unwrap_err(),
            ArgError::IncompleteRoute
        );
    }
}
