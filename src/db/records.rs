use chrono::Utc;
use log::warn;
use mongodb::bson::{self, oid::ObjectId, Bson, DateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::models::{
    activity::{Activity, ActivityKind},
    location::{Location, TripLocations},
    trip::{NewTrip, Trip},
};

/*
    Stored shape of a `trips` document. Kept apart from `Trip` so ids and
    timestamps stay native BSON types in the collection.
*/
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub begin_date: String,
    pub end_date: String,
    pub owner: String,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default, deserialize_with = "readable_activities")]
    pub activities: Vec<ActivityRecord>,
    #[serde(default)]
    pub current_locations: Vec<Location>,
    #[serde(default)]
    pub planned_locations: Vec<Location>,
    #[serde(default)]
    pub version: i64,
    pub created_at: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

impl TripRecord {
    pub fn new(trip: NewTrip, now: DateTime) -> Self {
        Self {
            id: None,
            title: trip.title,
            description: trip.description,
            begin_date: trip.begin_date,
            end_date: trip.end_date,
            owner: trip.owner,
            participants: trip.participants,
            activities: Vec::new(),
            current_locations: Vec::new(),
            planned_locations: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: Some(now),
        }
    }
}

impl From<TripRecord> for Trip {
    fn from(record: TripRecord) -> Self {
        let created_at = record.created_at.to_chrono();
        Self {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: record.title,
            description: record.description,
            begin_date: record.begin_date,
            end_date: record.end_date,
            owner: record.owner,
            participants: record.participants,
            activities: record
                .activities
                .into_iter()
                .map(|activity| activity.into_activity(created_at))
                .collect(),
            current_locations: record.current_locations,
            planned_locations: record.planned_locations,
            version: record.version,
            created_at,
            updated_at: record
                .updated_at
                .map(|dt| dt.to_chrono())
                .unwrap_or(created_at),
        }
    }
}

/*
    Activities written by earlier clients may lack `type` and `createdAt`,
    and carry coordinates as fixed-point strings ("38.711500").
*/
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: ActivityKind,
    pub time: String,
    pub day: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub lat: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub long: f64,
    #[serde(default)]
    pub votes: u32,
    #[serde(default)]
    pub comments: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
}

impl ActivityRecord {
    /// `trip_created_at` stands in for a missing `createdAt`.
    pub fn into_activity(self, trip_created_at: chrono::DateTime<Utc>) -> Activity {
        Activity {
            id: self.id,
            title: self.title,
            kind: self.kind,
            time: self.time,
            day: self.day,
            lat: self.lat,
            long: self.long,
            votes: self.votes,
            comments: self.comments,
            created_at: self
                .created_at
                .map(|dt| dt.to_chrono())
                .unwrap_or(trip_created_at),
        }
    }
}

impl From<&Activity> for ActivityRecord {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id.clone(),
            title: activity.title.clone(),
            kind: activity.kind,
            time: activity.time.clone(),
            day: activity.day,
            lat: activity.lat,
            long: activity.long,
            votes: activity.votes,
            comments: activity.comments,
            created_at: Some(DateTime::from_chrono(activity.created_at)),
        }
    }
}

/// Decodes each embedded activity on its own so one unreadable entry
/// does not take the whole trip down with it.
fn readable_activities<'de, D>(deserializer: D) -> Result<Vec<ActivityRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Bson>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match bson::from_bson::<ActivityRecord>(value) {
            Ok(activity) => Some(activity),
            Err(err) => {
                warn!("Skipping unreadable activity: {}", err);
                None
            }
        })
        .collect())
}

/// Projection of a trip down to its location arrays.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsRecord {
    #[serde(default)]
    pub current_locations: Vec<Location>,
    #[serde(default)]
    pub planned_locations: Vec<Location>,
}

impl From<LocationsRecord> for TripLocations {
    fn from(record: LocationsRecord) -> Self {
        Self {
            current_locations: record.current_locations,
            planned_locations: record.planned_locations,
        }
    }
}
