use serde::{Deserialize, Serialize};

use super::parse_date;
use crate::error::{ApiError, ApiResult};

const INVALID_LOCATION: &str =
    "Invalid location format. Each location must have: name, latitude, longitude, startDate, and endDate";

/// A point on the trip map with the date range it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: String,
    pub end_date: String,
}

impl Location {
    pub fn validate(&self) -> ApiResult<()> {
        let in_range = (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);
        let dates = parse_date(&self.start_date).zip(parse_date(&self.end_date));

        match dates {
            Some((start, end)) if !self.name.trim().is_empty() && in_range && start <= end => {
                Ok(())
            }
            _ => Err(ApiError::Validation(INVALID_LOCATION.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    Current,
    Planned,
}

impl LocationKind {
    /// Name of the embedded array on the trip document.
    pub fn field(self) -> &'static str {
        match self {
            LocationKind::Current => "currentLocations",
            LocationKind::Planned => "plannedLocations",
        }
    }
}

impl std::str::FromStr for LocationKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(LocationKind::Current),
            "planned" => Ok(LocationKind::Planned),
            _ => Err(ApiError::Validation(
                "Invalid location type. Must be \"current\" or \"planned\"".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripLocations {
    #[serde(default)]
    pub current_locations: Vec<Location>,
    #[serde(default)]
    pub planned_locations: Vec<Location>,
}

impl TripLocations {
    pub fn validate(&self) -> ApiResult<()> {
        self.current_locations
            .iter()
            .chain(&self.planned_locations)
            .try_for_each(Location::validate)
    }
}

/*
    PUT /api/trips/{id}/locations
*/
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceLocationsRequest {
    pub current_locations: Option<Vec<Location>>,
    pub planned_locations: Option<Vec<Location>>,
}

impl ReplaceLocationsRequest {
    pub fn validate(self) -> ApiResult<TripLocations> {
        let locations = match (self.current_locations, self.planned_locations) {
            (Some(current_locations), Some(planned_locations)) => TripLocations {
                current_locations,
                planned_locations,
            },
            _ => return Err(ApiError::Validation("Invalid location arrays".to_string())),
        };
        locations.validate()?;
        Ok(locations)
    }
}

/*
    POST /api/trips/{id}/locations
*/
#[derive(Debug, Deserialize)]
pub struct AddLocationRequest {
    pub location: Option<Location>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl AddLocationRequest {
    pub fn validate(self) -> ApiResult<(LocationKind, Location)> {
        let (location, kind) = match (self.location, self.kind) {
            (Some(location), Some(kind)) => (location, kind),
            _ => {
                return Err(ApiError::Validation(
                    "Missing location or type".to_string(),
                ))
            }
        };
        let kind = kind.parse::<LocationKind>()?;
        location.validate()?;
        Ok((kind, location))
    }
}
