use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::store::{TripStore, WriteOutcome};
use crate::error::ApiResult;
use crate::models::{
    activity::{Activity, ActivityFields},
    location::{Location, LocationKind, TripLocations},
    trip::{NewTrip, Trip},
};

/// Process-local store with the same update semantics as `MongoTripStore`.
/// Backs the route tests; nothing survives a restart.
#[derive(Default)]
pub struct MemoryTripStore {
    trips: RwLock<Vec<Trip>>,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.trips.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.trips.read().await.is_empty()
    }
}

fn touch(trip: &mut Trip) {
    trip.updated_at = Utc::now();
    trip.version += 1;
}

fn find_mut<'a>(trips: &'a mut [Trip], id: &ObjectId) -> Option<&'a mut Trip> {
    let id = id.to_hex();
    trips.iter_mut().find(|trip| trip.id == id)
}

/// Locates the activity, honouring `expected_version`, before any mutation.
fn activity_slot<'a>(
    trips: &'a mut [Trip],
    trip_id: &ObjectId,
    activity_id: &str,
    expected_version: Option<i64>,
) -> Result<(&'a mut Trip, usize), WriteOutcome> {
    let trip = find_mut(trips, trip_id).ok_or(WriteOutcome::NotFound)?;
    let index = trip
        .activities
        .iter()
        .position(|activity| activity.id == activity_id)
        .ok_or(WriteOutcome::NotFound)?;
    match expected_version {
        Some(version) if version != trip.version => Err(WriteOutcome::Conflict),
        _ => Ok((trip, index)),
    }
}

#[async_trait]
impl TripStore for MemoryTripStore {
    async fn ping(&self) -> ApiResult<()> {
        Ok(())
    }

    async fn insert_trip(&self, trip: NewTrip) -> ApiResult<Trip> {
        let now = Utc::now();
        let trip = Trip {
            id: ObjectId::new().to_hex(),
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
            updated_at: now,
        };
        self.trips.write().await.push(trip.clone());
        Ok(trip)
    }

    async fn find_trip(&self, id: &ObjectId) -> ApiResult<Option<Trip>> {
        let id = id.to_hex();
        let trips = self.trips.read().await;
        Ok(trips.iter().find(|trip| trip.id == id).cloned())
    }

    async fn find_trips_for_user(&self, user_id: &str) -> ApiResult<Vec<Trip>> {
        let trips = self.trips.read().await;
        // Walk newest insert first so equal timestamps still come out newest-first.
        let mut visible: Vec<Trip> = trips
            .iter()
            .rev()
            .filter(|trip| trip.is_visible_to(user_id))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    async fn push_activity(&self, trip_id: &ObjectId, activity: &Activity) -> ApiResult<bool> {
        let mut trips = self.trips.write().await;
        Ok(match find_mut(&mut trips, trip_id) {
            Some(trip) => {
                trip.activities.push(activity.clone());
                touch(trip);
                true
            }
            None => false,
        })
    }

    async fn replace_activity(
        &self,
        trip_id: &ObjectId,
        activity_id: &str,
        fields: &ActivityFields,
        expected_version: Option<i64>,
    ) -> ApiResult<WriteOutcome> {
        let mut trips = self.trips.write().await;
        Ok(
            match activity_slot(&mut trips, trip_id, activity_id, expected_version) {
                Ok((trip, index)) => {
                    trip.activities[index].replace_fields(fields.clone());
                    touch(trip);
                    WriteOutcome::Applied
                }
                Err(outcome) => outcome,
            },
        )
    }

    async fn remove_activity(
        &self,
        trip_id: &ObjectId,
        activity_id: &str,
        expected_version: Option<i64>,
    ) -> ApiResult<WriteOutcome> {
        let mut trips = self.trips.write().await;
        Ok(
            match activity_slot(&mut trips, trip_id, activity_id, expected_version) {
                Ok((trip, index)) => {
                    trip.activities.remove(index);
                    touch(trip);
                    WriteOutcome::Applied
                }
                Err(outcome) => outcome,
            },
        )
    }

    async fn find_locations(&self, trip_id: &ObjectId) -> ApiResult<Option<TripLocations>> {
        Ok(self.find_trip(trip_id).await?.map(|trip| TripLocations {
            current_locations: trip.current_locations,
            planned_locations: trip.planned_locations,
        }))
    }

    async fn set_locations(
        &self,
        trip_id: &ObjectId,
        locations: &TripLocations,
    ) -> ApiResult<bool> {
        let mut trips = self.trips.write().await;
        Ok(match find_mut(&mut trips, trip_id) {
            Some(trip) => {
                trip.current_locations = locations.current_locations.clone();
                trip.planned_locations = locations.planned_locations.clone();
                touch(trip);
                true
            }
            None => false,
        })
    }

    async fn push_location(
        &self,
        trip_id: &ObjectId,
        kind: LocationKind,
        location: &Location,
    ) -> ApiResult<bool> {
        let mut trips = self.trips.write().await;
        Ok(match find_mut(&mut trips, trip_id) {
            Some(trip) => {
                match kind {
                    LocationKind::Current => trip.current_locations.push(location.clone()),
                    LocationKind::Planned => trip.planned_locations.push(location.clone()),
                }
                touch(trip);
                true
            }
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::activity::ActivityKind;

    fn new_trip(owner: &str, participants: &[&str]) -> NewTrip {
        NewTrip {
            title: format!("{}'s trip", owner),
            description: String::new(),
            begin_date: "2025-06-01".to_string(),
            end_date: "2025-06-05".to_string(),
            owner: owner.to_string(),
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn fields(title: &str) -> ActivityFields {
        ActivityFields {
            title: title.to_string(),
            kind: ActivityKind::Dining,
            time: "19:00".to_string(),
            day: 1,
            lat: 41.15,
            long: -8.61,
            votes: 0,
            comments: 0,
        }
    }

    #[actix_rt::test]
    async fn lists_owned_and_shared_trips_newest_first() {
        let store = MemoryTripStore::new();
        let first = store.insert_trip(new_trip("alice", &[])).await.unwrap();
        store.insert_trip(new_trip("bob", &[])).await.unwrap();
        let shared = store.insert_trip(new_trip("bob", &["alice"])).await.unwrap();

        let trips = store.find_trips_for_user("alice").await.unwrap();
        let ids: Vec<&str> = trips.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![shared.id.as_str(), first.id.as_str()]);
    }

    #[actix_rt::test]
    async fn stale_version_is_a_conflict_and_leaves_activity_alone() {
        let store = MemoryTripStore::new();
        let trip = store.insert_trip(new_trip("alice", &[])).await.unwrap();
        let trip_id = ObjectId::parse_str(&trip.id).unwrap();
        let activity = Activity::new(fields("Lunch"));
        assert!(store.push_activity(&trip_id, &activity).await.unwrap());

        let outcome = store
            .replace_activity(&trip_id, &activity.id, &fields("Dinner"), Some(0))
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Conflict);

        let stored = store.find_trip(&trip_id).await.unwrap().unwrap();
        assert_eq!(stored.activities[0].title, "Lunch");
        assert_eq!(stored.version, 1);

        let outcome = store
            .replace_activity(&trip_id, &activity.id, &fields("Dinner"), Some(1))
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::Applied);
    }

    #[actix_rt::test]
    async fn missing_activity_is_not_found_even_with_version() {
        let store = MemoryTripStore::new();
        let trip = store.insert_trip(new_trip("alice", &[])).await.unwrap();
        let trip_id = ObjectId::parse_str(&trip.id).unwrap();

        let outcome = store
            .remove_activity(&trip_id, "nope", Some(0))
            .await
            .unwrap();
        assert_eq!(outcome, WriteOutcome::NotFound);
    }

    #[actix_rt::test]
    async fn writes_to_unknown_trip_change_nothing() {
        let store = MemoryTripStore::new();
        let missing = ObjectId::new();
        let activity = Activity::new(fields("Lunch"));

        assert!(!store.push_activity(&missing, &activity).await.unwrap());
        assert!(!store
            .set_locations(&missing, &TripLocations::default())
            .await
            .unwrap());
        assert!(store.is_empty().await);
    }
}
