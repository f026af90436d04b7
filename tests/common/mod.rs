#![allow(dead_code)]

use actix_web::{web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use trip_planner_api::{
    db::{MemoryTripStore, TripStore},
    models::{
        parse_trip_id,
        suggestion::{Content, ResponseSchema},
        trip::{NewTrip, Trip},
    },
    routes,
    services::TextGenerator,
    ApiResult, AppState,
};

/// Replies with canned text and remembers what it was asked.
pub struct StubGenerator {
    reply: String,
    pub calls: Mutex<Vec<(Vec<Content>, bool)>>,
}

impl StubGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(
        &self,
        contents: &[Content],
        schema: Option<&ResponseSchema>,
    ) -> ApiResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((contents.to_vec(), schema.is_some()));
        Ok(self.reply.clone())
    }
}

pub struct TestApp {
    pub store: Arc<MemoryTripStore>,
    pub generator: Arc<StubGenerator>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_reply("[]")
    }

    pub fn with_reply(reply: &str) -> Self {
        Self {
            store: Arc::new(MemoryTripStore::new()),
            generator: Arc::new(StubGenerator::replying(reply)),
        }
    }

    /// Inserts a trip owned by `owner` straight into the store.
    pub async fn seed_trip(&self, owner: &str) -> String {
        let trip = self
            .store
            .insert_trip(NewTrip {
                title: "Azores".to_string(),
                description: "Island hopping".to_string(),
                begin_date: "2025-09-01".to_string(),
                end_date: "2025-09-08".to_string(),
                owner: owner.to_string(),
                participants: Vec::new(),
            })
            .await
            .unwrap();
        trip.id
    }

    pub async fn stored_trip(&self, id: &str) -> Trip {
        let id = parse_trip_id(id).unwrap();
        self.store.find_trip(&id).await.unwrap().unwrap()
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = AppState::new(self.store.clone(), self.generator.clone());
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure)
    }
}

pub fn trip_body(owner: &str) -> Value {
    json!({
        "title": "Azores",
        "description": "Island hopping",
        "beginDate": "2025-09-01",
        "endDate": "2025-09-08",
        "owner": owner
    })
}

pub fn activity_body(title: &str) -> Value {
    json!({
        "title": title,
        "type": "sightseeing",
        "time": "09:30",
        "day": 2,
        "lat": 37.7412,
        "long": -25.6756
    })
}

pub fn location_body(name: &str) -> Value {
    json!({
        "name": name,
        "latitude": 37.7412,
        "longitude": -25.6756,
        "startDate": "2025-09-01",
        "endDate": "2025-09-03"
    })
}

pub const MISSING_TRIP_ID: &str = "65f1c0a2b3d4e5f6a7b8c9d0";
