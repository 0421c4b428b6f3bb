use actix_web::{Scope, web};

/// Normalize a configured context path to `""` or `/segment[/segment...]`
pub fn normalize_context_path(context_path: &str) -> String {
    let trimmed = context_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

pub fn routes(context_path: &str) -> Scope {
    web::scope(&format!("{}/api", normalize_context_path(context_path)))
        .service(
            web::scope("/auth")
                .service(super::auth::login)
                .service(super::auth::me),
        )
        .service(
            web::scope("/insights")
                .service(super::insight::search)
                .service(super::insight::create)
                .service(super::insight::export_csv)
                .service(super::insight::import_csv)
                .service(super::upload::upload)
                .service(super::insight::find_one)
                .service(super::insight::update)
                .service(super::insight::remove),
        )
        .service(
            web::scope("/masters")
                .service(super::master::list)
                .service(super::master::create)
                .service(super::master::update)
                .service(super::master::remove),
        )
        .service(super::health::health)
}
