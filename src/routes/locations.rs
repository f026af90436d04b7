use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    location::{AddLocationRequest, ReplaceLocationsRequest},
    parse_trip_id,
};
use crate::state::AppState;

fn trip_not_found() -> ApiError {
    ApiError::NotFound("Trip not found".to_string())
}

/*
    GET /api/trips/{id}/locations
*/
pub async fn get_all(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_trip_id(&path.into_inner())?;
    let locations = state
        .store
        .find_locations(&trip_id)
        .await?
        .ok_or_else(trip_not_found)?;

    Ok(HttpResponse::Ok().json(locations))
}

/*
    PUT /api/trips/{id}/locations
*/
pub async fn replace(
    state: web::Data<AppState>,
    path: web::Path<String>,
    input: web::Json<ReplaceLocationsRequest>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_trip_id(&path.into_inner())?;
    let locations = input.into_inner().validate()?;

    if !state.store.set_locations(&trip_id, &locations).await? {
        return Err(trip_not_found());
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Locations updated successfully",
        "currentLocations": locations.current_locations,
        "plannedLocations": locations.planned_locations,
    })))
}

/*
    POST /api/trips/{id}/locations
*/
pub async fn add(
    state: web::Data<AppState>,
    path: web::Path<String>,
    input: web::Json<AddLocationRequest>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_trip_id(&path.into_inner())?;
    let (kind, location) = input.into_inner().validate()?;

    if !state.store.push_location(&trip_id, kind, &location).await? {
        return Err(trip_not_found());
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Location added successfully",
        "location": location,
    })))
}
