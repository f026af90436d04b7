pub mod activities;
pub mod health;
pub mod locations;
pub mod suggestions;
pub mod trips;

use actix_web::web;

use crate::error::ApiError;

/// Registers every route plus extractor configs that render bad input as
/// the usual `{"error": ...}` envelope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid query string: {}", err)).into()
    }))
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/api")
            .route("/new-trip", web::post().to(trips::create_from_form))
            .route("/gemini", web::post().to(suggestions::ask))
            .route("/enhance", web::post().to(suggestions::enhance))
            .service(
                web::scope("/trips")
                    .route("", web::get().to(trips::list_for_user))
                    .route("", web::post().to(trips::create))
                    .route("/{id}", web::get().to(trips::get_by_id))
                    .service(
                        web::resource("/{id}/activities")
                            .route(web::post().to(activities::add))
                            .route(web::put().to(activities::update))
                            .route(web::delete().to(activities::delete)),
                    )
                    .service(
                        web::resource("/{id}/locations")
                            .route(web::get().to(locations::get_all))
                            .route(web::put().to(locations::replace))
                            .route(web::post().to(locations::add)),
                    ),
            ),
    );
}
