use actix_web::{HttpResponse, get, web};
use serde_json::json;

use insight_persistence::PersistenceService;

use crate::model::AppState;

#[get("/health")]
pub async fn health(data: web::Data<AppState>) -> HttpResponse {
    match data.persistence().health_check().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "UP" })),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "DOWN",
                "error": e.to_string(),
            }))
        }
    }
}
