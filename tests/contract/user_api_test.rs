// Contract tests for the /users and /roles endpoints

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::test;
use serde_json::{json, Value};

use helpers::{init_app, TestDataFactory, TestStores};

#[actix_web::test]
async fn test_post_user_hides_password() {
    let stores = TestStores::with_catalog();
    let app = init_app(&stores).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(TestDataFactory::user_payload("alex@gmail.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "alex@gmail.com");
    assert_eq!(body["roles"][0]["authority"], "ROLE_OPERATOR");
    assert!(body.get("password").is_none());

    assert_eq!(stores.users.get(2).unwrap().password, "encoded:s3cret-pass");
}

#[actix_web::test]
async fn test_post_user_with_taken_email_is_unprocessable() {
    let stores = TestStores::with_catalog();
    let app = init_app(&stores).await;

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(TestDataFactory::user_payload("maria@gmail.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["errors"][0]["field_name"], "email");
    assert_eq!(body["error"]["errors"][0]["message"], "Email already registered");
}

#[actix_web::test]
async fn test_post_user_with_short_password_is_unprocessable() {
    let stores = TestStores::with_catalog();
    let app = init_app(&stores).await;

    let mut payload = TestDataFactory::user_payload("alex@gmail.com");
    payload["password"] = json!("123");

    let req = test::TestRequest::post().uri("/users").set_json(payload).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 422);
    assert_eq!(stores.users.save_calls(), 0);
}

#[actix_web::test]
async fn test_post_user_with_oversized_fields_is_unprocessable() {
    let stores = TestStores::with_catalog();
    let app = init_app(&stores).await;

    let mut payload = TestDataFactory::user_payload("alex@gmail.com");
    payload["first_name"] = json!("a".repeat(61));
    payload["last_name"] = json!("b".repeat(61));
    payload["email"] = json!(format!("{}@{}.com", "c".repeat(60), "d".repeat(60)));

    let req = test::TestRequest::post().uri("/users").set_json(payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["error"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field_name"].as_str())
        .collect();
    assert!(fields.contains(&"first_name"));
    assert!(fields.contains(&"last_name"));
    assert!(fields.contains(&"email"));
    assert_eq!(stores.users.save_calls(), 0);
}

#[actix_web::test]
async fn test_post_role_reference_without_id_is_unprocessable() {
    let stores = TestStores::with_catalog();
    let app = init_app(&stores).await;

    let mut payload = TestDataFactory::user_payload("alex@gmail.com");
    payload["roles"] = json!([{ "authority": "ROLE_ADMIN" }]);

    let req = test::TestRequest::post().uri("/users").set_json(payload).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["errors"][0]["field_name"], "roles");
    assert_eq!(stores.users.save_calls(), 0);
}

#[actix_web::test]
async fn test_put_user_keeps_password() {
    let stores = TestStores::with_catalog();
    let app = init_app(&stores).await;
    let before = stores.users.get(1).unwrap().password;

    let req = test::TestRequest::put()
        .uri("/users/1")
        .set_json(json!({
            "first_name": "Maria",
            "last_name": "Silva",
            "email": "maria@gmail.com",
            "roles": [{ "id": 2 }]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["last_name"], "Silva");
    assert_eq!(body["roles"][0]["authority"], "ROLE_ADMIN");
    assert_eq!(stores.users.get(1).unwrap().password, before);
}

#[actix_web::test]
async fn test_get_missing_user_is_not_found() {
    let stores = TestStores::with_catalog();
    let app = init_app(&stores).await;

    let req = test::TestRequest::get().uri("/users/1000").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_roles_crud() {
    let stores = TestStores::with_catalog();
    let app = init_app(&stores).await;

    let req = test::TestRequest::post()
        .uri("/roles")
        .set_json(json!({ "authority": "ROLE_AUDITOR" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::post()
        .uri("/roles")
        .set_json(json!({ "authority": "ROLE_ADMIN" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 422);

    let req = test::TestRequest::get().uri("/roles?authority=audit").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_elements"], 1);
    assert_eq!(body["content"][0]["id"], 3);

    let req = test::TestRequest::delete().uri("/roles/3").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);
}
