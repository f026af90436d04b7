use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;

use crate::db::WriteOutcome;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    activity::{
        require_activity_id, Activity, ActivityInput, DeleteActivityQuery, UpdateActivityRequest,
    },
    parse_trip_id,
};
use crate::state::AppState;

fn outcome_to_result(outcome: WriteOutcome) -> ApiResult<()> {
    match outcome {
        WriteOutcome::Applied => Ok(()),
        WriteOutcome::NotFound => Err(ApiError::NotFound(
            "Trip or activity not found".to_string(),
        )),
        WriteOutcome::Conflict => Err(ApiError::Conflict(
            "Trip was modified by another request; reload and retry".to_string(),
        )),
    }
}

/*
    POST /api/trips/{id}/activities
*/
pub async fn add(
    state: web::Data<AppState>,
    path: web::Path<String>,
    input: web::Json<ActivityInput>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_trip_id(&path.into_inner())?;
    let activity = Activity::new(input.into_inner().validate()?);

    if !state.store.push_activity(&trip_id, &activity).await? {
        return Err(ApiError::NotFound(
            "Trip not found or activity not added".to_string(),
        ));
    }
    info!("Added activity {} to trip {}", activity.id, trip_id);

    Ok(HttpResponse::Created().json(activity))
}

/*
    PUT /api/trips/{id}/activities
*/
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    input: web::Json<UpdateActivityRequest>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_trip_id(&path.into_inner())?;
    let request = input.into_inner();
    let activity_id = require_activity_id(request.activity_id)?;
    let fields = request.updates.validate()?;

    let outcome = state
        .store
        .replace_activity(&trip_id, &activity_id, &fields, request.expected_version)
        .await?;
    outcome_to_result(outcome)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Activity updated successfully" })))
}

/*
    DELETE /api/trips/{id}/activities?activityId=
*/
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<DeleteActivityQuery>,
) -> ApiResult<HttpResponse> {
    let trip_id = parse_trip_id(&path.into_inner())?;
    let query = query.into_inner();
    let activity_id = require_activity_id(query.activity_id)?;

    let outcome = state
        .store
        .remove_activity(&trip_id, &activity_id, query.expected_version)
        .await?;
    outcome_to_result(outcome)?;
    info!("Removed activity {} from trip {}", activity_id, trip_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Activity deleted successfully" })))
}
