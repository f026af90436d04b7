use actix_web::{web, HttpResponse};
use log::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::models::suggestion::{
    Content, PlanSuggestion, PromptRequest, PromptResponse, ResponseSchema,
};
use crate::state::AppState;

fn require_contents(input: PromptRequest) -> ApiResult<Vec<Content>> {
    let invalid = || ApiError::Validation("Invalid or missing `contents` array".to_string());
    match input.contents {
        Some(contents) if contents.is_array() => {
            serde_json::from_value(contents).map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

/// Parses schema-constrained model output into plan suggestions.
pub fn parse_plans(text: &str) -> ApiResult<Vec<PlanSuggestion>> {
    serde_json::from_str(text).map_err(|err| {
        error!("Gemini returned invalid JSON: {}", err);
        ApiError::UpstreamFormat("Gemini returned invalid JSON".to_string())
    })
}

/*
    POST /api/gemini
*/
pub async fn ask(
    state: web::Data<AppState>,
    input: web::Json<PromptRequest>,
) -> ApiResult<HttpResponse> {
    let contents = require_contents(input.into_inner())?;
    let text = state.generator.generate(&contents, None).await?;

    Ok(HttpResponse::Ok().json(PromptResponse { response: text }))
}

/*
    POST /api/enhance
*/
pub async fn enhance(
    state: web::Data<AppState>,
    input: web::Json<PromptRequest>,
) -> ApiResult<HttpResponse> {
    let contents = require_contents(input.into_inner())?;
    let schema = ResponseSchema::plan_suggestions();
    let text = state.generator.generate(&contents, Some(&schema)).await?;

    let plans = parse_plans(&text)?;
    // Suggestions are only logged; the client decides what to keep.
    for plan in &plans {
        info!(
            "Plan: {} price={} lat={} longi={} - {}",
            plan.name, plan.price, plan.lat, plan.longi, plan.description
        );
    }

    Ok(HttpResponse::Ok().json(plans))
}
