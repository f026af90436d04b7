use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson, DateTime, Document},
    Client, Collection,
};
use std::sync::Arc;

use super::records::{ActivityRecord, LocationsRecord, TripRecord};
use super::store::{TripStore, WriteOutcome};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    activity::{Activity, ActivityFields},
    location::{Location, LocationKind, TripLocations},
    trip::{NewTrip, Trip},
};

pub const TRIPS_COLLECTION: &str = "trips";

#[derive(Clone)]
pub struct MongoTripStore {
    client: Arc<Client>,
    database: String,
    trips: Collection<TripRecord>,
}

impl MongoTripStore {
    pub fn new(client: Arc<Client>, database: &str) -> Self {
        let trips = client.database(database).collection(TRIPS_COLLECTION);
        Self {
            client,
            database: database.to_string(),
            trips,
        }
    }

    fn activity_filter(
        trip_id: &ObjectId,
        activity_id: &str,
        expected_version: Option<i64>,
    ) -> Document {
        let mut filter = doc! { "_id": *trip_id, "activities.id": activity_id };
        match expected_version {
            // Documents written before versioning have no field; they read back as 0.
            Some(0) => {
                filter.insert("version", doc! { "$in": [0_i64, Bson::Null] });
            }
            Some(version) => {
                filter.insert("version", version);
            }
            None => {}
        }
        filter
    }

    /// Every write stamps `updatedAt` and bumps `version` alongside its own changes.
    fn touch(mut set: Document) -> Document {
        set.insert("updatedAt", DateTime::now());
        doc! { "$set": set, "$inc": { "version": 1_i64 } }
    }

    /// A conditional write matched nothing; tell a stale version apart from a miss.
    async fn classify_miss(
        &self,
        trip_id: &ObjectId,
        activity_id: &str,
        expected_version: Option<i64>,
    ) -> ApiResult<WriteOutcome> {
        if expected_version.is_none() {
            return Ok(WriteOutcome::NotFound);
        }
        let exists = self
            .trips
            .count_documents(Self::activity_filter(trip_id, activity_id, None))
            .await?;
        Ok(if exists > 0 {
            WriteOutcome::Conflict
        } else {
            WriteOutcome::NotFound
        })
    }
}

#[async_trait]
impl TripStore for MongoTripStore {
    async fn ping(&self) -> ApiResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn insert_trip(&self, trip: NewTrip) -> ApiResult<Trip> {
        let mut record = TripRecord::new(trip, DateTime::now());
        let result = self.trips.insert_one(&record).await?;
        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            ApiError::Internal("Inserted trip has no ObjectId".to_string())
        })?;
        record.id = Some(id);
        Ok(record.into())
    }

    async fn find_trip(&self, id: &ObjectId) -> ApiResult<Option<Trip>> {
        let record = self.trips.find_one(doc! { "_id": *id }).await?;
        Ok(record.map(Trip::from))
    }

    async fn find_trips_for_user(&self, user_id: &str) -> ApiResult<Vec<Trip>> {
        let filter = doc! {
            "$or": [
                { "owner": user_id },
                { "participants": user_id }
            ]
        };
        let cursor = self
            .trips
            .find(filter)
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?;
        let records: Vec<TripRecord> = cursor.try_collect().await?;
        Ok(records.into_iter().map(Trip::from).collect())
    }

    async fn push_activity(&self, trip_id: &ObjectId, activity: &Activity) -> ApiResult<bool> {
        let record = bson::to_bson(&ActivityRecord::from(activity))?;
        let mut update = Self::touch(Document::new());
        update.insert("$push", doc! { "activities": record });

        let result = self.trips.update_one(doc! { "_id": *trip_id }, update).await?;
        Ok(result.matched_count > 0)
    }

    async fn replace_activity(
        &self,
        trip_id: &ObjectId,
        activity_id: &str,
        fields: &ActivityFields,
        expected_version: Option<i64>,
    ) -> ApiResult<WriteOutcome> {
        let mut set = Document::new();
        for (key, value) in bson::to_document(fields)? {
            set.insert(format!("activities.$.{}", key), value);
        }

        let result = self
            .trips
            .update_one(
                Self::activity_filter(trip_id, activity_id, expected_version),
                Self::touch(set),
            )
            .await?;
        if result.matched_count > 0 {
            return Ok(WriteOutcome::Applied);
        }
        self.classify_miss(trip_id, activity_id, expected_version).await
    }

    async fn remove_activity(
        &self,
        trip_id: &ObjectId,
        activity_id: &str,
        expected_version: Option<i64>,
    ) -> ApiResult<WriteOutcome> {
        let mut update = Self::touch(Document::new());
        update.insert("$pull", doc! { "activities": { "id": activity_id } });

        let result = self
            .trips
            .update_one(
                Self::activity_filter(trip_id, activity_id, expected_version),
                update,
            )
            .await?;
        if result.matched_count > 0 {
            return Ok(WriteOutcome::Applied);
        }
        self.classify_miss(trip_id, activity_id, expected_version).await
    }

    async fn find_locations(&self, trip_id: &ObjectId) -> ApiResult<Option<TripLocations>> {
        let record = self
            .trips
            .clone_with_type::<LocationsRecord>()
            .find_one(doc! { "_id": *trip_id })
            .projection(doc! { "currentLocations": 1, "plannedLocations": 1 })
            .await?;
        Ok(record.map(TripLocations::from))
    }

    async fn set_locations(
        &self,
        trip_id: &ObjectId,
        locations: &TripLocations,
    ) -> ApiResult<bool> {
        let current = bson::to_bson(&locations.current_locations)?;
        let planned = bson::to_bson(&locations.planned_locations)?;
        let set = doc! { "currentLocations": current, "plannedLocations": planned };
        let result = self
            .trips
            .update_one(doc! { "_id": *trip_id }, Self::touch(set))
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn push_location(
        &self,
        trip_id: &ObjectId,
        kind: LocationKind,
        location: &Location,
    ) -> ApiResult<bool> {
        let mut push = Document::new();
        push.insert(kind.field(), bson::to_bson(location)?);
        let mut update = Self::touch(Document::new());
        update.insert("$push", push);

        let result = self.trips.update_one(doc! { "_id": *trip_id }, update).await?;
        Ok(result.matched_count > 0)
    }
}
