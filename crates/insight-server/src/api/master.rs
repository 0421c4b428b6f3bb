use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::Deserialize;

use insight_common::{ActionTypes, MASTER_RESOURCE};
use insight_core::service;
use insight_persistence::MasterOptionData;

use crate::{
    Secured,
    error::AppError,
    model::{AppState, response::SuccessResult},
    secured,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParam {
    category_key: Option<String>,
}

#[get("")]
pub async fn list(
    data: web::Data<AppState>,
    params: web::Query<ListParam>,
) -> Result<HttpResponse, AppError> {
    let options =
        service::master::list(data.persistence(), params.category_key.as_deref()).await?;

    Ok(HttpResponse::Ok().json(options))
}

#[post("")]
pub async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<MasterOptionData>,
) -> Result<HttpResponse, AppError> {
    secured!(
        Secured::builder(&req, &data, MASTER_RESOURCE)
            .action(ActionTypes::Write)
            .build()
    );

    let created = service::master::create(data.persistence(), body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(created))
}

#[put("/{id}")]
pub async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<MasterOptionData>,
) -> Result<HttpResponse, AppError> {
    secured!(
        Secured::builder(&req, &data, MASTER_RESOURCE)
            .action(ActionTypes::Write)
            .build()
    );

    let updated =
        service::master::update(data.persistence(), path.into_inner(), body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/{id}")]
pub async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    secured!(
        Secured::builder(&req, &data, MASTER_RESOURCE)
            .action(ActionTypes::Write)
            .build()
    );

    service::master::delete(data.persistence(), path.into_inner()).await?;

    Ok(SuccessResult::http_response())
}
