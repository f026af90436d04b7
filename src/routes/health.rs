use actix_web::{web, HttpResponse, Responder};
use log::warn;
use serde::Serialize;
use std::collections::HashMap;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mongo_result = match state.store.ping().await {
        Ok(()) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Connected successfully to MongoDB".to_string()),
        },
        Err(err) => {
            warn!("MongoDB health check failed: {}", err);
            ServiceStatus {
                status: "error".to_string(),
                details: Some(err.to_string()),
            }
        }
    };

    let status = if mongo_result.status == "ok" {
        "ok"
    } else {
        "degraded"
    };

    let mut services = HashMap::new();
    services.insert("mongodb".to_string(), mongo_result);

    HttpResponse::Ok().json(HealthStatus {
        status: status.to_string(),
        services,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
