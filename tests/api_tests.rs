use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shopfront::config::Config;
use shopfront::db::migrator::m20250301_initial::DEFAULT_ADMIN_PASSWORD;
use tower::ServiceExt;

fn test_db_url() -> String {
    let path = std::env::temp_dir().join(format!("shopfront-test-{}.db", uuid::Uuid::new_v4()));
    format!("sqlite:{}?mode=rwc", path.display())
}

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = test_db_url();
    config.security.jwt_secret = "test-secret".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = shopfront::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    shopfront::api::router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username={username}&password={password}"
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK, "login as {username}");
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["token_type"], "bearer");
    json["access_token"].as_str().unwrap().to_string()
}

async fn admin_token(app: &Router) -> String {
    login(app, "admin", DEFAULT_ADMIN_PASSWORD).await
}

/// Registers a customer and returns its id.
async fn register(app: &Router, username: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/auth/",
        None,
        Some(json!({
            "first_name": "Test",
            "last_name": "User",
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

/// Registers a user, grants the supplier flag and returns a fresh token.
async fn supplier(app: &Router, admin: &str, username: &str) -> String {
    let id = register(app, username).await;
    let (status, _) = send(
        app,
        "PUT",
        &format!("/auth/users/{id}/permissions"),
        Some(admin),
        Some(json!({ "is_supplier": true, "is_customer": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    login(app, username, "password123").await
}

async fn create_category(app: &Router, admin: &str, name: &str, parent_id: Option<i64>) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/categories/",
        Some(admin),
        Some(json!({ "name": name, "parent_id": parent_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

async fn create_product(
    app: &Router,
    token: &str,
    name: &str,
    category_id: i64,
    stock: i64,
) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/products/",
        Some(token),
        Some(json!({
            "name": name,
            "description": "A thing",
            "price": 1999,
            "image_url": "https://example.com/img.png",
            "stock": stock,
            "category_id": category_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

fn slugs(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_welcome_and_health() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["message"].is_string());

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "ok");
}

#[tokio::test]
async fn test_register_and_token_flow() {
    let app = spawn_app().await;
    register(&app, "jane").await;

    let (status, body) = send(
        &app,
        "POST",
        "/auth/",
        None,
        Some(json!({
            "first_name": "Jane",
            "last_name": "Again",
            "username": "jane",
            "email": "other@example.com",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let token = login(&app, "jane", "password123").await;

    let (status, body) = send(&app, "GET", "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "jane");
    assert_eq!(body["data"]["is_customer"], true);
    assert_eq!(body["data"]["is_supplier"], false);
    assert!(body["data"].get("password_hash").is_none());

    // JSON credentials are accepted as well
    let (status, body) = send(
        &app,
        "POST",
        "/auth/token",
        None,
        Some(json!({ "username": "jane", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/auth/token",
        None,
        Some(json!({ "username": "jane", "password": "nope-nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/auth/",
        None,
        Some(json!({
            "first_name": "Short",
            "last_name": "Pass",
            "username": "shorty",
            "email": "shorty@example.com",
            "password": "abc",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/",
        None,
        Some(json!({
            "first_name": "Bad",
            "last_name": "Mail",
            "username": "badmail",
            "email": "not-an-email",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bearer_token_required() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );

    let (status, _) = send(&app, "GET", "/auth/me", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/products/",
        None,
        Some(json!({ "name": "X", "price": 1, "stock": 1, "category_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_basic_credentials_endpoint() {
    let app = spawn_app().await;
    register(&app, "basic_bob").await;

    let send_basic = |credentials: &str| {
        let app = app.clone();
        let encoded = STANDARD.encode(credentials);
        async move {
            app.oneshot(
                Request::builder()
                    .uri("/auth/")
                    .header(header::AUTHORIZATION, format!("Basic {encoded}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
        }
    };

    let response = send_basic("basic_bob:password123").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["username"], "basic_bob");

    let response = send_basic("basic_bob:wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_category_management_is_admin_only() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    register(&app, "carol").await;
    let carol = login(&app, "carol", "password123").await;

    let (status, _) = send(
        &app,
        "POST",
        "/categories/",
        Some(&carol),
        Some(json!({ "name": "Electronics" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let electronics = create_category(&app, &admin, "Electronics", None).await;
    assert_eq!(electronics["slug"], "electronics");
    assert_eq!(electronics["is_active"], true);

    let phones = create_category(
        &app,
        &admin,
        "Phones & Tablets",
        electronics["id"].as_i64(),
    )
    .await;
    assert_eq!(phones["slug"], "phones-tablets");
    assert_eq!(phones["parent_id"], electronics["id"]);

    let (status, _) = send(
        &app,
        "POST",
        "/categories/",
        Some(&admin),
        Some(json!({ "name": "electronics" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        "/categories/",
        Some(&admin),
        Some(json!({ "name": "Orphans", "parent_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "PUT",
        "/categories/phones-tablets",
        Some(&admin),
        Some(json!({ "name": "Mobile Phones", "parent_id": electronics["id"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slug"], "mobile-phones");

    let (status, _) = send(
        &app,
        "PUT",
        "/categories/phones-tablets",
        Some(&admin),
        Some(json!({ "name": "Gone" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/categories/mobile-phones", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "DELETE", "/categories/mobile-phones", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/categories/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&body), vec!["electronics".to_string()]);
}

#[tokio::test]
async fn test_products_by_category_includes_direct_subcategories() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let seller = supplier(&app, &admin, "seller").await;

    let electronics = create_category(&app, &admin, "Electronics", None).await;
    let phones = create_category(&app, &admin, "Phones", electronics["id"].as_i64()).await;
    let android = create_category(&app, &admin, "Android", phones["id"].as_i64()).await;
    let garden = create_category(&app, &admin, "Garden", None).await;

    let id = |category: &Value| category["id"].as_i64().unwrap();

    let phone = create_product(&app, &seller, "Pocket Phone", id(&phones), 5).await;
    assert_eq!(phone["slug"], "pocket-phone");
    assert_eq!(phone["rating"], 0.0);

    create_product(&app, &seller, "Desk Radio", id(&electronics), 2).await;
    create_product(&app, &seller, "Sold Out Phone", id(&phones), 0).await;
    create_product(&app, &seller, "Grandchild Phone", id(&android), 3).await;
    create_product(&app, &seller, "Rake", id(&garden), 9).await;

    let (status, body) = send(&app, "GET", "/products/electronics", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        slugs(&body),
        vec!["pocket-phone".to_string(), "desk-radio".to_string()]
    );

    // A leaf category returns its own products
    let (_, body) = send(&app, "GET", "/products/garden", None, None).await;
    assert_eq!(slugs(&body), vec!["rake".to_string()]);

    let (status, _) = send(&app, "GET", "/products/unknown", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/products/detail/pocket-phone", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stock"], 5);

    let (status, _) = send(&app, "GET", "/products/detail/sold-out-phone", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/products/", None, None).await;
    assert_eq!(slugs(&body).len(), 4);
}

#[tokio::test]
async fn test_deleted_category_hides_its_products() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let seller = supplier(&app, &admin, "toolsmith").await;

    let tools = create_category(&app, &admin, "Tools", None).await;
    let garden = create_category(&app, &admin, "Garden", None).await;
    let id = |category: &Value| category["id"].as_i64().unwrap();

    create_product(&app, &seller, "Hammer", id(&tools), 4).await;
    create_product(&app, &seller, "Rake", id(&garden), 9).await;

    let (_, body) = send(&app, "GET", "/products/", None, None).await;
    assert_eq!(slugs(&body), vec!["hammer".to_string(), "rake".to_string()]);

    let (status, _) = send(&app, "DELETE", "/categories/tools", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/products/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slugs(&body), vec!["rake".to_string()]);

    let (status, _) = send(&app, "GET", "/products/tools", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_latin_names_get_transliterated_slugs() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;

    let phones = create_category(&app, &admin, "Смартфоны Samsung", None).await;
    assert_eq!(phones["slug"], "smartfony-samsung");

    // A different Cyrillic name must not collide with the first one
    let tablets = create_category(&app, &admin, "Планшеты Samsung", None).await;
    assert_eq!(tablets["slug"], "planshety-samsung");

    let (status, body) = send(&app, "GET", "/products/smartfony-samsung", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(slugs(&body).is_empty());
}

#[tokio::test]
async fn test_product_creation_requires_supplier_or_admin() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let category = create_category(&app, &admin, "Books", None).await;

    register(&app, "reader").await;
    let reader = login(&app, "reader", "password123").await;

    let (status, _) = send(
        &app,
        "POST",
        "/products/",
        Some(&reader),
        Some(json!({
            "name": "Novel",
            "price": 1200,
            "stock": 3,
            "category_id": category["id"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let category_id = category["id"].as_i64().unwrap();
    let product = create_product(&app, &admin, "Crème Brûlée Cookbook", category_id, 3).await;
    assert_eq!(product["slug"], "creme-brulee-cookbook");

    let (status, _) = send(
        &app,
        "POST",
        "/products/",
        Some(&admin),
        Some(json!({
            "name": "Lost",
            "price": 1,
            "stock": 1,
            "category_id": 4242,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_update_and_delete_check_ownership() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let owner = supplier(&app, &admin, "owner").await;
    let rival = supplier(&app, &admin, "rival").await;
    let category = create_category(&app, &admin, "Tools", None).await;
    let category_id = category["id"].as_i64().unwrap();

    create_product(&app, &owner, "Hammer", category_id, 4).await;

    let update = json!({
        "name": "Big Hammer",
        "description": "Heavier",
        "price": 2599,
        "image_url": "",
        "stock": 4,
        "category_id": category_id,
    });

    let (status, _) = send(&app, "PUT", "/products/hammer", Some(&rival), Some(update.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "PUT", "/products/hammer", Some(&owner), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slug"], "big-hammer");
    assert_eq!(body["data"]["price"], 2599);

    let (status, _) = send(&app, "DELETE", "/products/big-hammer", Some(&rival), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", "/products/big-hammer", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", "/products/tools", None, None).await;
    assert!(slugs(&body).is_empty());

    let (status, _) = send(&app, "DELETE", "/products/big-hammer", Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_updates_product_rating() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let category = create_category(&app, &admin, "Kitchen", None).await;
    let category_id = category["id"].as_i64().unwrap();
    let product = create_product(&app, &admin, "Kettle", category_id, 10).await;
    let product_id = product["id"].clone();

    register(&app, "alice").await;
    register(&app, "bruno").await;
    let alice = login(&app, "alice", "password123").await;
    let bruno = login(&app, "bruno", "password123").await;

    // Administrators without the customer flag cannot review
    let (status, _) = send(
        &app,
        "POST",
        "/reviews/",
        Some(&admin),
        Some(json!({ "product_id": product_id, "grade": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        "/reviews/",
        Some(&alice),
        Some(json!({ "product_id": product_id, "grade": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, first) = send(
        &app,
        "POST",
        "/reviews/",
        Some(&alice),
        Some(json!({ "product_id": product_id, "comment": "Boils fast", "grade": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["data"]["product_rating"], 4.0);
    assert_eq!(first["data"]["review"]["comment"], "Boils fast");

    let (status, second) = send(
        &app,
        "POST",
        "/reviews/",
        Some(&bruno),
        Some(json!({ "product_id": product_id, "grade": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["data"]["product_rating"], 3.0);

    let (_, body) = send(&app, "GET", "/products/detail/kettle", None, None).await;
    assert_eq!(body["data"]["rating"], 3.0);

    let (status, body) = send(&app, "GET", "/reviews/kettle", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let first_id = first["data"]["review"]["id"].as_i64().unwrap();

    let (status, _) = send(&app, "DELETE", &format!("/reviews/{first_id}"), Some(&bruno), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "DELETE", &format!("/reviews/{first_id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product_rating"], 2.0);

    let (status, _) = send(&app, "DELETE", &format!("/reviews/{first_id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/reviews/", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "GET", "/products/detail/kettle", None, None).await;
    assert_eq!(body["data"]["rating"], 2.0);
}

#[tokio::test]
async fn test_review_on_missing_product() {
    let app = spawn_app().await;
    register(&app, "dora").await;
    let dora = login(&app, "dora", "password123").await;

    let (status, _) = send(
        &app,
        "POST",
        "/reviews/",
        Some(&dora),
        Some(json!({ "product_id": 77, "grade": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/reviews/no-such-product", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_administration() {
    let app = spawn_app().await;
    let admin = admin_token(&app).await;
    let eve_id = register(&app, "eve").await;
    let eve = login(&app, "eve", "password123").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/auth/users/{eve_id}/permissions"),
        Some(&eve),
        Some(json!({ "is_supplier": true, "is_customer": true })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", "/auth/users/9999", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, me) = send(&app, "GET", "/auth/me", Some(&admin), None).await;
    let admin_id = me["data"]["id"].as_i64().unwrap();
    let (status, _) = send(&app, "DELETE", &format!("/auth/users/{admin_id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &format!("/auth/users/{eve_id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/token",
        None,
        Some(json!({ "username": "eve", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/auth/me", Some(&eve), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
