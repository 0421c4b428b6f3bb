use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Deserialize;

use insight_auth::{
    model::{AuthUser, LoginResult},
    service::{auth::encode_jwt_token, user::authenticate},
};
use insight_common::{ActionTypes, INSIGHT_RESOURCE, InsightError};
use insight_persistence::AuthPersistence;

use crate::{Secured, error::AppError, model::AppState, secured};

#[derive(Deserialize)]
struct LoginData {
    username: Option<String>,
    password: Option<String>,
}

#[post("/login")]
pub async fn login(
    data: web::Data<AppState>,
    body: web::Json<LoginData>,
) -> Result<HttpResponse, AppError> {
    let LoginData { username, password } = body.into_inner();
    let username = username.unwrap_or_default();
    let password = password.unwrap_or_default();

    let user = authenticate(data.persistence(), &username, &password).await?;

    let token = encode_jwt_token(
        &user,
        &data.configuration.token_secret_key(),
        data.configuration.token_expire_seconds(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))?;

    tracing::info!(username = %user.username, role = %user.role, "User logged in");

    Ok(HttpResponse::Ok().json(LoginResult { token, user }))
}

/// The user behind the presented token, re-read from the store
#[get("/me")]
pub async fn me(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let caller = secured!(
        Secured::builder(&req, &data, INSIGHT_RESOURCE)
            .action(ActionTypes::Read)
            .build()
    );

    let stored = data
        .persistence()
        .user_find_by_id(caller.id)
        .await?
        .ok_or_else(|| InsightError::Auth("user no longer exists".to_string()))?;

    let user = AuthUser::try_from(stored).map_err(InsightError::Auth)?;

    Ok(HttpResponse::Ok().json(user))
}
