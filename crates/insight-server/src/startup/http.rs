//! HTTP server setup.

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, error, middleware::Logger, web};

use insight_common::InsightError;

use crate::{
    api::{route, upload},
    error::AppError,
    middleware::auth::Authentication,
    model::{AppState, Configuration},
};

const JSON_PAYLOAD_LIMIT: usize = 256 * 1024;

fn validation_error(message: String) -> error::Error {
    AppError::from(InsightError::Validation(message)).into()
}

/// Register extractor error handlers, the API scope and, when the upload URL
/// prefix is a local path, the route serving uploaded images.
pub fn configure(cfg: &mut web::ServiceConfig, configuration: &Configuration) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_PAYLOAD_LIMIT)
            .error_handler(|err, _req| validation_error(err.to_string())),
    )
    .app_data(
        web::PathConfig::default().error_handler(|err, _req| validation_error(err.to_string())),
    )
    .app_data(
        web::QueryConfig::default().error_handler(|err, _req| validation_error(err.to_string())),
    )
    .service(route::routes(&configuration.server_context_path()));

    let upload_prefix = configuration.upload_url_prefix();
    if upload_prefix.starts_with('/') {
        cfg.route(
            &format!("{}/{{name}}", upload_prefix),
            web::get().to(upload::serve),
        );
    }
}

/// Creates and binds the HTTP server.
///
/// Signal handling is left to the caller so shutdown goes through
/// [`super::GracefulShutdown`].
pub fn main_server(
    app_state: Arc<AppState>,
    address: String,
    port: u16,
) -> Result<Server, std::io::Error> {
    Ok(HttpServer::new(move || {
        let state = app_state.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(Authentication)
            .app_data(web::Data::from(state.clone()))
            .configure(|cfg| configure(cfg, &state.configuration))
    })
    .disable_signals()
    .bind((address, port))?
    .run())
}
