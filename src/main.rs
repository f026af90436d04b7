use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use trip_planner_api::{
    config::AppConfig,
    db::{self, MongoTripStore},
    routes,
    services::GeminiService,
    AppState,
};

fn fatal(context: &str, err: impl std::fmt::Display) -> io::Error {
    error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| fatal("Invalid configuration", e))?;

    info!("Connecting to MongoDB...");
    let client = db::mongo::create_mongo_client(&config.mongodb)
        .await
        .map_err(|e| fatal("MongoDB connection failed", e))?;
    let database = db::mongo::database_name(&client, &config.mongodb);
    info!("MongoDB connection established, using database {}", database);

    let store = MongoTripStore::new(client, &database);
    let generator = GeminiService::new(&config.gemini)
        .map_err(|e| fatal("Gemini client setup failed", e))?;
    let state = web::Data::new(AppState::new(Arc::new(store), Arc::new(generator)));

    info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
