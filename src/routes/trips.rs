use actix_web::{web, HttpResponse};
use log::info;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    parse_trip_id, present,
    trip::{CreateTripRequest, InsertedTrip, ListTripsQuery},
};
use crate::state::AppState;

/*
    POST /api/new-trip
*/
pub async fn create_from_form(
    state: web::Data<AppState>,
    input: web::Json<CreateTripRequest>,
) -> ApiResult<HttpResponse> {
    let new_trip = input.into_inner().validate_form()?;
    let trip = state.store.insert_trip(new_trip).await?;
    info!("Created trip {} for {}", trip.id, trip.owner);

    Ok(HttpResponse::Ok().json(InsertedTrip {
        acknowledged: true,
        inserted_id: trip.id,
    }))
}

/*
    POST /api/trips
*/
pub async fn create(
    state: web::Data<AppState>,
    input: web::Json<CreateTripRequest>,
) -> ApiResult<HttpResponse> {
    let new_trip = input.into_inner().validate()?;
    let trip = state.store.insert_trip(new_trip).await?;
    info!("Created trip {} for {}", trip.id, trip.owner);

    Ok(HttpResponse::Created().json(trip))
}

/*
    GET /api/trips?userId=
*/
pub async fn list_for_user(
    state: web::Data<AppState>,
    query: web::Query<ListTripsQuery>,
) -> ApiResult<HttpResponse> {
    let user_id = present(query.into_inner().user_id)
        .ok_or_else(|| ApiError::Validation("Missing userId".to_string()))?;
    let trips = state.store.find_trips_for_user(user_id.trim()).await?;

    Ok(HttpResponse::Ok().json(trips))
}

/*
    GET /api/trips/{id}
*/
pub async fn get_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_trip_id(&path.into_inner())?;

    match state.store.find_trip(&id).await? {
        Some(trip) => Ok(HttpResponse::Ok().json(trip)),
        None => Err(ApiError::NotFound("Trip not found".to_string())),
    }
}
