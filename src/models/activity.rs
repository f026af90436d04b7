use chrono::{DateTime, NaiveTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::present;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Sightseeing,
    Dining,
    Lodging,
    Transport,
    Event,
    #[default]
    #[serde(other)]
    Other,
}

/// The part of an activity the client controls. Updates replace all of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityFields {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub time: String,
    pub day: u32,
    pub lat: f64,
    pub long: f64,
    pub votes: u32,
    pub comments: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub time: String,
    pub day: u32,
    pub lat: f64,
    pub long: f64,
    pub votes: u32,
    pub comments: u32,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(fields: ActivityFields) -> Self {
        Self::from_fields(ObjectId::new().to_hex(), fields, Utc::now())
    }

    pub fn from_fields(id: String, fields: ActivityFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title,
            kind: fields.kind,
            time: fields.time,
            day: fields.day,
            lat: fields.lat,
            long: fields.long,
            votes: fields.votes,
            comments: fields.comments,
            created_at,
        }
    }

    pub fn replace_fields(&mut self, fields: ActivityFields) {
        *self = Self::from_fields(std::mem::take(&mut self.id), fields, self.created_at);
    }
}

/*
    Body of POST /api/trips/{id}/activities, and the update half of PUT.
*/
#[derive(Debug, Default, Deserialize)]
pub struct ActivityInput {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ActivityKind>,
    pub time: Option<String>,
    pub day: Option<u32>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub votes: Option<u32>,
    pub comments: Option<u32>,
}

impl ActivityInput {
    pub fn validate(self) -> ApiResult<ActivityFields> {
        let (title, kind, time, day, lat, long) = match (
            present(self.title),
            self.kind,
            present(self.time),
            self.day,
            self.lat,
            self.long,
        ) {
            (Some(title), Some(kind), Some(time), Some(day), Some(lat), Some(long)) => {
                (title, kind, time, day, lat, long)
            }
            _ => {
                return Err(ApiError::Validation(
                    "Missing required fields: title, type, time, day, lat, long".to_string(),
                ))
            }
        };

        if parse_time(&time).is_none() {
            return Err(ApiError::Validation(
                "Invalid time. Expected HH:MM".to_string(),
            ));
        }
        if day == 0 {
            return Err(ApiError::Validation("Day must start at 1".to_string()));
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&long) {
            return Err(ApiError::Validation(
                "Coordinates out of range".to_string(),
            ));
        }

        Ok(ActivityFields {
            title,
            kind,
            time,
            day,
            lat,
            long,
            votes: self.votes.unwrap_or(0),
            comments: self.comments.unwrap_or(0),
        })
    }
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/*
    PUT /api/trips/{id}/activities
*/
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    pub activity_id: Option<String>,
    pub expected_version: Option<i64>,
    #[serde(flatten)]
    pub updates: ActivityInput,
}

/*
    DELETE /api/trips/{id}/activities?activityId=
*/
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteActivityQuery {
    pub activity_id: Option<String>,
    pub expected_version: Option<i64>,
}

pub fn require_activity_id(activity_id: Option<String>) -> ApiResult<String> {
    present(activity_id).ok_or_else(|| ApiError::Validation("Activity ID is required".to_string()))
}
