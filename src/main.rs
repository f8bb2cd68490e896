use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizzer_server::{app_state::AppState, auth::RequireAuth, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let bind_addr = (config.web_server_host.clone(), config.web_server_port);

    let state = AppState::new(config)
        .await
        .unwrap_or_else(|e| panic!("failed to initialize application state: {}", e));
    let jwt_service = state.jwt_service.clone();

    log::info!(
        "quizzer-server listening on {}:{}",
        bind_addr.0,
        bind_addr.1
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(handlers::health_check)
            .service(handlers::health_check_ready)
            .service(handlers::login)
            .service(
                web::scope("")
                    .wrap(RequireAuth)
                    .service(handlers::generate_quiz)
                    .service(handlers::get_hint)
                    .service(handlers::submit_quiz)
                    .service(handlers::get_history)
                    .service(handlers::retry_quiz)
                    .service(handlers::get_leaderboard),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
