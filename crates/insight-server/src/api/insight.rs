use actix_multipart::Multipart;
use actix_web::{
    HttpRequest, HttpResponse, delete, get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post, put, web,
};
use serde::Deserialize;

use insight_common::{ActionTypes, INSIGHT_RESOURCE};
use insight_core::{ImportPolicy, service};
use insight_persistence::{InsightData, InsightSearch};

use crate::{
    Secured,
    api::multipart,
    error::AppError,
    model::{AppState, response::SuccessResult},
    secured,
};

#[derive(Debug, Deserialize)]
struct ImportParam {
    policy: Option<String>,
}

/// Parse the filter from the raw query string so repeated keys are kept
fn search_from_request(req: &HttpRequest) -> Result<InsightSearch, AppError> {
    let pairs = url::form_urlencoded::parse(req.query_string().as_bytes());
    Ok(InsightSearch::from_pairs(pairs)?)
}

#[get("")]
pub async fn search(req: HttpRequest, data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let search = search_from_request(&req)?;
    let records = service::insight::search(data.persistence(), &search).await?;

    Ok(HttpResponse::Ok().json(records))
}

#[get("/{id}")]
pub async fn find_one(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let record = service::insight::find_by_id(data.persistence(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(record))
}

#[post("")]
pub async fn create(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<InsightData>,
) -> Result<HttpResponse, AppError> {
    let user = secured!(
        Secured::builder(&req, &data, INSIGHT_RESOURCE)
            .action(ActionTypes::Write)
            .build()
    );

    let created =
        service::insight::create(data.persistence(), body.into_inner(), &user.username).await?;

    Ok(HttpResponse::Created().json(created))
}

#[put("/{id}")]
pub async fn update(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<InsightData>,
) -> Result<HttpResponse, AppError> {
    let user = secured!(
        Secured::builder(&req, &data, INSIGHT_RESOURCE)
            .action(ActionTypes::Write)
            .build()
    );

    let updated = service::insight::update(
        data.persistence(),
        path.into_inner(),
        body.into_inner(),
        &user.username,
    )
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/{id}")]
pub async fn remove(
    req: HttpRequest,
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user = secured!(
        Secured::builder(&req, &data, INSIGHT_RESOURCE)
            .action(ActionTypes::Write)
            .build()
    );

    service::insight::delete(data.persistence(), path.into_inner(), &user.username).await?;

    Ok(SuccessResult::http_response())
}

/// CSV download of the records matching the same filters as the listing
#[get("/export/csv")]
pub async fn export_csv(
    req: HttpRequest,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let insight_search = search_from_request(&req)?;
    let body = service::insight::export_csv(data.persistence(), &insight_search).await?;

    let file_name = format!(
        "insights_{}.csv",
        chrono::Local::now().format("%Y%m%d%H%M%S")
    );

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(body))
}

#[post("/import/csv")]
pub async fn import_csv(
    req: HttpRequest,
    data: web::Data<AppState>,
    params: web::Query<ImportParam>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let user = secured!(
        Secured::builder(&req, &data, INSIGHT_RESOURCE)
            .action(ActionTypes::Write)
            .build()
    );

    let policy = match insight_common::non_blank(params.policy.as_deref()) {
        Some(p) => p.parse::<ImportPolicy>()?,
        None => data.configuration.import_default_policy(),
    };

    let bytes = multipart::read_file(payload, data.configuration.import_max_file_size())
        .await?
        .map(|file| file.bytes)
        .unwrap_or_default();

    let summary =
        service::import::import_csv(data.persistence(), &bytes, policy, &user.username).await?;

    Ok(HttpResponse::Ok().json(summary))
}
