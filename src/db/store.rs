use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ApiResult;
use crate::models::{
    activity::{Activity, ActivityFields},
    location::{Location, LocationKind, TripLocations},
    trip::{NewTrip, Trip},
};

/// Result of a conditional write against an embedded activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    NotFound,
    /// The trip and activity exist but `version` no longer matches.
    Conflict,
}

/// Persistence for trip documents. Every mutating call is a single atomic
/// update of one trip and bumps its `version` and `updatedAt`.
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn ping(&self) -> ApiResult<()>;

    async fn insert_trip(&self, trip: NewTrip) -> ApiResult<Trip>;

    async fn find_trip(&self, id: &ObjectId) -> ApiResult<Option<Trip>>;

    /// Trips owned by or shared with `user_id`, newest first.
    async fn find_trips_for_user(&self, user_id: &str) -> ApiResult<Vec<Trip>>;

    /// Returns `false` if no trip matched.
    async fn push_activity(&self, trip_id: &ObjectId, activity: &Activity) -> ApiResult<bool>;

    async fn replace_activity(
        &self,
        trip_id: &ObjectId,
        activity_id: &str,
        fields: &ActivityFields,
        expected_version: Option<i64>,
    ) -> ApiResult<WriteOutcome>;

    async fn remove_activity(
        &self,
        trip_id: &ObjectId,
        activity_id: &str,
        expected_version: Option<i64>,
    ) -> ApiResult<WriteOutcome>;

    async fn find_locations(&self, trip_id: &ObjectId) -> ApiResult<Option<TripLocations>>;

    /// Returns `false` if no trip matched.
    async fn set_locations(&self, trip_id: &ObjectId, locations: &TripLocations)
        -> ApiResult<bool>;

    /// Returns `false` if no trip matched.
    async fn push_location(
        &self,
        trip_id: &ObjectId,
        kind: LocationKind,
        location: &Location,
    ) -> ApiResult<bool>;
}
