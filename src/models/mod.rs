pub mod activity;
pub mod location;
pub mod suggestion;
pub mod trip;

use chrono::{DateTime, NaiveDate};
use mongodb::bson::oid::ObjectId;

use crate::error::{ApiError, ApiResult};

pub fn parse_trip_id(id: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(id.trim())
        .map_err(|_| ApiError::InvalidId("Invalid trip ID format".to_string()))
}

/// Accepts either a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}

pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
