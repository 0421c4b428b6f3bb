//! Integration tests for the master option endpoints

mod common;

use actix_web::test;
use serde_json::{Value, json};

use common::{TestApp, bearer, call, init_app, insight_json, login, setup};

async fn post_master<S: TestApp>(app: &S, token: &str, body: Value) -> (u16, Value) {
    let req = test::TestRequest::post()
        .uri("/api/masters")
        .insert_header(bearer(token))
        .set_json(body)
        .to_request();
    call(app, req).await
}

#[actix_web::test]
async fn test_list_by_category() {
    let ctx = setup().await;
    let app = init_app(&ctx).await;

    let req = test::TestRequest::get()
        .uri("/api/masters?categoryKey=target_banks")
        .to_request();
    let (status, body) = call(&app, req).await;

    assert_eq!(status, 200);
    let options = body.as_array().unwrap();
    assert_eq!(options.len(), 13);
    assert!(options.iter().all(|o| o["categoryKey"] == "target_banks"));
    assert_eq!(options[0]["optionValue"], "None");
    assert_eq!(options[1]["optionValue"], "Fukuoka");
}

#[actix_web::test]
async fn test_only_admin_writes_masters() {
    let ctx = setup().await;
    let app = init_app(&ctx).await;
    let manager = login(&app, "manager", "manager123").await;
    let admin = login(&app, "admin", "admin123").await;

    let option = json!({
        "categoryKey": "target_banks",
        "optionValue": "Nagasaki",
        "optionLabel": "長崎",
        "sortOrder": 14,
    });

    let (status, body) = post_master(&app, &manager, option.clone()).await;
    assert_eq!(status, 403);
    assert_eq!(body["code"], 10001);

    let (status, created) = post_master(&app, &admin, option).await;
    assert_eq!(status, 200);
    assert_eq!(created["optionValue"], "Nagasaki");
    let id = created["id"].as_i64().unwrap();

    // The new option is immediately usable as a lookup value
    let mut insight = insight_json(1, "NGS-1");
    insight["targetBanks"] = json!(["Nagasaki"]);
    let req = test::TestRequest::post()
        .uri("/api/insights")
        .insert_header(bearer(&manager))
        .set_json(insight)
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, 201);

    let req = test::TestRequest::put()
        .uri(&format!("/api/masters/{}", id))
        .insert_header(bearer(&admin))
        .set_json(json!({
            "categoryKey": "target_banks",
            "optionValue": "Nagasaki",
            "optionLabel": "長崎銀行",
            "sortOrder": 14,
        }))
        .to_request();
    let (status, updated) = call(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(updated["optionLabel"], "長崎銀行");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/masters/{}", id))
        .insert_header(bearer(&manager))
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, 403);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/masters/{}", id))
        .insert_header(bearer(&admin))
        .to_request();
    let (status, body) = call(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "success": true }));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/masters/{}", id))
        .insert_header(bearer(&admin))
        .to_request();
    let (status, _) = call(&app, req).await;
    assert_eq!(status, 404);
}

#[actix_web::test]
async fn test_master_validation() {
    let ctx = setup().await;
    let app = init_app(&ctx).await;
    let admin = login(&app, "admin", "admin123").await;

    let (status, body) = post_master(
        &app,
        &admin,
        json!({ "categoryKey": "colors", "optionValue": "red", "optionLabel": "Red" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], 20002);
    assert_eq!(body["error"], "unknown categoryKey: colors");

    let (status, body) = post_master(
        &app,
        &admin,
        json!({ "categoryKey": "status", "optionValue": "  ", "optionLabel": "Blank" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "missing required field: optionValue");

    let (status, body) = post_master(
        &app,
        &admin,
        json!({ "categoryKey": "target_banks", "optionValue": "Fukuoka;Saga", "optionLabel": "Both" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "optionValue must not contain ';': Fukuoka;Saga");
}

#[actix_web::test]
async fn test_non_numeric_id_is_bad_request() {
    let ctx = setup().await;
    let app = init_app(&ctx).await;
    let admin = login(&app, "admin", "admin123").await;

    let req = test::TestRequest::delete()
        .uri("/api/masters/abc")
        .insert_header(bearer(&admin))
        .to_request();
    let (status, body) = call(&app, req).await;

    assert_eq!(status, 400);
    assert_eq!(body["code"], 20002);
}
