use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use dotenv::dotenv;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use sqlx::PgPool;
use taskboard::auth::{AuthMiddleware, AuthResponse, Claims};
use taskboard::config::Config;
use taskboard::routes;
use taskboard::routes::health;

async fn cleanup_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    dotenv().ok();
    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to test DB");

    cleanup_user(&pool, "integration@example.com").await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(config.jwt_secret.clone()))
                    .configure(routes::config),
            ),
    )
    .await;

    // Register a new user
    let register_payload = json!({
        "name": "Integration User",
        "email": "integration@example.com",
        "password": "Password123!"
    });
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&register_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body_bytes = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::CREATED,
        "Registration failed. Body: {:?}",
        String::from_utf8_lossy(&body_bytes)
    );

    let register_response: AuthResponse =
        serde_json::from_slice(&body_bytes).expect("Failed to parse registration response JSON");
    assert!(!register_response.token.is_empty());
    assert_eq!(register_response.user.email, "integration@example.com");
    assert_eq!(register_response.user.name, "Integration User");

    // The raw body must never carry a password hash
    let raw: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    assert!(raw["user"].get("passwordHash").is_none());
    assert!(raw["user"].get("password_hash").is_none());

    // Try to register the same user again (should fail)
    let req_conflict = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&register_payload)
        .to_request();
    let resp_conflict = test::call_service(&app, req_conflict).await;
    assert_eq!(
        resp_conflict.status(),
        actix_web::http::StatusCode::BAD_REQUEST,
        "Duplicate registration did not fail as expected"
    );

    // Login with the registered user
    let login_payload = json!({
        "email": "integration@example.com",
        "password": "Password123!"
    });
    let req_login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&login_payload)
        .to_request();
    let resp_login = test::call_service(&app, req_login).await;
    let status_login = resp_login.status();
    let body_bytes_login = test::read_body(resp_login).await;

    assert_eq!(
        status_login,
        actix_web::http::StatusCode::OK,
        "Login failed. Body: {:?}",
        String::from_utf8_lossy(&body_bytes_login)
    );

    let login_response: AuthResponse =
        serde_json::from_slice(&body_bytes_login).expect("Failed to parse login response JSON");
    let token = login_response.token.clone();
    assert!(!token.is_empty(), "Token should be a non-empty string");
    assert_eq!(login_response.user.id, register_response.user.id);

    // Use the token on a protected route
    let req_me = test::TestRequest::get()
        .uri("/api/auth/me")
        .append_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp_me = test::call_service(&app, req_me).await;
    assert_eq!(resp_me.status(), actix_web::http::StatusCode::OK);
    let me: serde_json::Value = test::read_body_json(resp_me).await;
    assert_eq!(me["email"], "integration@example.com");
    assert_eq!(me["name"], "Integration User");

    // The profile projection additionally carries the creation timestamp
    let req_profile = test::TestRequest::get()
        .uri("/api/auth/profile")
        .append_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp_profile = test::call_service(&app, req_profile).await;
    assert_eq!(resp_profile.status(), actix_web::http::StatusCode::OK);
    let profile: serde_json::Value = test::read_body_json(resp_profile).await;
    assert_eq!(profile["email"], "integration@example.com");
    assert!(profile["createdAt"].is_string());

    cleanup_user(&pool, "integration@example.com").await;
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    dotenv().ok();
    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to test DB");

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    let test_cases = vec![
        // Deserialization errors (expect 400 for missing fields)
        (
            json!({ "email": "test@example.com", "password": "Password123!" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing name",
        ),
        (
            json!({ "name": "Test", "password": "Password123!" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "name": "Test", "email": "test@example.com" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Validation errors (expect 422 after successful deserialization)
        (
            json!({ "name": "Test", "email": "invalid-email", "password": "Password123!" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "email without @",
        ),
        (
            json!({ "name": "Test", "email": "test@nodomain", "password": "Password123!" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "email without a dot in the domain",
        ),
        (
            json!({ "name": "Test", "email": "with space@example.com", "password": "Password123!" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "email with whitespace",
        ),
        (
            json!({ "name": "Test", "email": "test@example.com", "password": "12345" }),
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Expected {}, got {}. Body: {:?}",
            description,
            expected_status,
            status,
            String::from_utf8_lossy(&body_bytes)
        );
    }
}

#[actix_rt::test]
async fn test_invalid_login_inputs() {
    dotenv().ok();
    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to test DB");

    let valid_user_email = "login_test_user@example.com";
    let valid_user_password = "Password123!";

    cleanup_user(&pool, valid_user_email).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config)),
    )
    .await;

    let register_payload = json!({
        "name": "Login Test User",
        "email": valid_user_email,
        "password": valid_user_password
    });
    let reg_req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&register_payload)
        .to_request();
    let reg_resp = test::call_service(&app, reg_req).await;
    assert!(
        reg_resp.status().is_success(),
        "Setup: Failed to register test user"
    );

    let test_cases = vec![
        // Deserialization errors (expect 400 for missing fields)
        (
            json!({ "password": "Password123!" }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "email": valid_user_email }),
            actix_web::http::StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Authentication errors (expect 401). Wrong password, unknown email,
        // and a malformed email all surface identically: login input is not
        // format-validated, a malformed email is just an unknown one.
        (
            json!({ "email": valid_user_email, "password": "WrongPassword123!" }),
            actix_web::http::StatusCode::UNAUTHORIZED,
            "incorrect password",
        ),
        (
            json!({ "email": "nonexistent@example.com", "password": "Password123!" }),
            actix_web::http::StatusCode::UNAUTHORIZED,
            "non-existent user",
        ),
        (
            json!({ "email": "not-an-email", "password": "Password123!" }),
            actix_web::http::StatusCode::UNAUTHORIZED,
            "malformed email treated as unknown",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Expected {}, got {}. Body: {:?}",
            description,
            expected_status,
            status,
            String::from_utf8_lossy(&body_bytes)
        );
    }

    cleanup_user(&pool, valid_user_email).await;
}

#[actix_rt::test]
async fn test_refresh_token_flow() {
    dotenv().ok();
    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to test DB");

    let email = "refresh_user@example.com";
    cleanup_user(&pool, email).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.clone()))
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(config.jwt_secret.clone()))
                    .configure(routes::config),
            ),
    )
    .await;

    let register_payload = json!({
        "name": "Refresh User",
        "email": email,
        "password": "Password123!"
    });
    let reg_req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&register_payload)
        .to_request();
    let reg_resp = test::call_service(&app, reg_req).await;
    assert_eq!(reg_resp.status(), actix_web::http::StatusCode::CREATED);
    let auth: AuthResponse = test::read_body_json(reg_resp).await;

    // Forge a token for the same user that expired two hours ago, signed
    // with the real secret: refresh must still accept it.
    let expired_claims = Claims {
        sub: auth.user.id,
        exp: (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp() as usize,
    };
    let expired_token = encode(
        &Header::default(),
        &expired_claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .unwrap();

    // The expired token itself is rejected on a protected route
    let req_me_expired = test::TestRequest::get()
        .uri("/api/auth/me")
        .append_header(("Authorization", format!("Bearer {}", expired_token)))
        .to_request();
    let resp_me_expired = test::call_service(&app, req_me_expired).await;
    assert_eq!(
        resp_me_expired.status(),
        actix_web::http::StatusCode::UNAUTHORIZED
    );

    // But it still buys a fresh token through refresh
    let req_refresh = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(&json!({ "token": expired_token }))
        .to_request();
    let resp_refresh = test::call_service(&app, req_refresh).await;
    assert_eq!(resp_refresh.status(), actix_web::http::StatusCode::OK);
    let refreshed: serde_json::Value = test::read_body_json(resp_refresh).await;
    let new_token = refreshed["token"].as_str().expect("token in response");

    // The fresh token works on a protected route and maps to the same user
    let req_me = test::TestRequest::get()
        .uri("/api/auth/me")
        .append_header(("Authorization", format!("Bearer {}", new_token)))
        .to_request();
    let resp_me = test::call_service(&app, req_me).await;
    assert_eq!(resp_me.status(), actix_web::http::StatusCode::OK);
    let me: serde_json::Value = test::read_body_json(resp_me).await;
    assert_eq!(me["id"], auth.user.id);

    // A tampered token is rejected
    let tampered = format!("{}x", auth.token);
    let req_tampered = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(&json!({ "token": tampered }))
        .to_request();
    let resp_tampered = test::call_service(&app, req_tampered).await;
    assert_eq!(
        resp_tampered.status(),
        actix_web::http::StatusCode::UNAUTHORIZED
    );

    cleanup_user(&pool, email).await;
}
