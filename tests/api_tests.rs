use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use mitai::config::Config;
use mitai::db::Store;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let db_path = std::env::temp_dir().join(format!("mitai-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let store = Store::new(&config.general.database_path)
        .await
        .expect("failed to open test database");

    let state = mitai::api::create_app_state(config, store, None, None);
    mitai::api::router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Registers a user and returns the bearer token from the response.
async fn register_user(app: &Router, username: &str, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": username,
                        "email": email,
                        "password": "hunter22"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    json["data"]["token"]
        .as_str()
        .expect("registration should return a token")
        .to_string()
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = spawn_app().await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Anime Watchlist API Running");
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": "sam",
                        "email": "sam@example.com",
                        "password": "hunter22"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], serde_json::json!(true));
    assert_eq!(json["data"]["message"], "User registered successfully");
    assert!(json["data"]["token"].is_string());
    assert_eq!(json["data"]["user"]["username"], "sam");
    assert_eq!(json["data"]["user"]["email"], "sam@example.com");
    // The password hash must never leave the server.
    assert!(json["data"]["user"].get("password").is_none());
    assert!(json["data"]["user"].get("passwordHash").is_none());

    // Same email again is rejected.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "username": "other",
                        "email": "sam@example.com",
                        "password": "hunter22"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], serde_json::json!(false));
    assert_eq!(json["error"], "User already exists");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": "sam@example.com",
                        "password": "hunter22"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Login successful");
    assert!(json["data"]["token"].is_string());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": "nobody@example.com",
                        "password": "hunter22"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "User not found");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "email": "sam@example.com",
                        "password": "wrong-password"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_register_validation() {
    let app = spawn_app().await;

    let cases = [
        (
            serde_json::json!({"username": "", "email": "a@b.co", "password": "hunter22"}),
            "Username is required",
        ),
        (
            serde_json::json!({"username": "a".repeat(51), "email": "a@b.co", "password": "hunter22"}),
            "Username must be 50 characters or less",
        ),
        (
            serde_json::json!({"username": "sam", "email": "not-an-email", "password": "hunter22"}),
            "A valid email is required",
        ),
        (
            serde_json::json!({"username": "sam", "email": "a@b.co", "password": "short"}),
            "Password must be at least 6 characters",
        ),
    ];

    for (payload, expected_error) in cases {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/register")
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], expected_error);
    }
}

#[tokio::test]
async fn test_watchlist_requires_token() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/watchlist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Unauthorized - No token provided");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/watchlist")
                .header("Authorization", "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Unauthorized - Invalid token");
}

#[tokio::test]
async fn test_watchlist_crud_flow() {
    let app = spawn_app().await;
    let token = register_user(&app, "sam", "sam@example.com").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/watchlist")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["watchlist"], serde_json::json!([]));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/watchlist")
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "animeId": 5114,
                        "title": "Fullmetal Alchemist: Brotherhood",
                        "image": "https://cdn.example.com/5114.jpg",
                        "status": "watching",
                        "score": 9.5
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Anime added to watchlist");
    let anime = &json["data"]["anime"];
    assert_eq!(anime["animeId"], 5114);
    assert_eq!(anime["title"], "Fullmetal Alchemist: Brotherhood");
    assert_eq!(anime["status"], "watching");
    assert_eq!(anime["score"], 9.5);
    let entry_id = anime["id"].as_i64().expect("entry id");

    // The list round-trips the caller-supplied fields plus server-assigned
    // id and timestamps.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/watchlist")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let listed = &json["data"]["watchlist"][0];
    assert_eq!(listed["id"], entry_id);
    assert_eq!(listed["animeId"], 5114);
    assert_eq!(listed["title"], "Fullmetal Alchemist: Brotherhood");
    assert_eq!(listed["image"], "https://cdn.example.com/5114.jpg");
    assert_eq!(listed["status"], "watching");
    assert_eq!(listed["score"], 9.5);
    assert!(!listed["createdAt"].as_str().unwrap().is_empty());

    // Same anime again is a conflict.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/watchlist")
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "animeId": 5114,
                        "title": "Fullmetal Alchemist: Brotherhood"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Anime already in watchlist");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/watchlist/{entry_id}"))
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "status": "completed",
                        "score": 10
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Anime updated");
    assert_eq!(json["data"]["anime"]["status"], "completed");
    assert_eq!(json["data"]["anime"]["score"], 10.0);
    // Fields not mentioned in the update keep their values.
    assert_eq!(
        json["data"]["anime"]["title"],
        "Fullmetal Alchemist: Brotherhood"
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/watchlist/999999")
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"status": "dropped"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Anime not found");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/watchlist/{entry_id}"))
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["message"], "Anime removed from watchlist");

    // Deleting twice is a miss.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/watchlist/{entry_id}"))
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/watchlist")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["data"]["watchlist"], serde_json::json!([]));
}

#[tokio::test]
async fn test_watchlist_input_validation() {
    let app = spawn_app().await;
    let token = register_user(&app, "sam", "sam@example.com").await;

    let cases = [
        (
            serde_json::json!({"animeId": 0, "title": "Some Show"}),
            "Invalid anime ID: 0. ID must be a positive integer",
        ),
        (
            serde_json::json!({"animeId": 1, "title": "   "}),
            "Title is required",
        ),
        (
            serde_json::json!({"animeId": 1, "title": "Some Show", "score": 10.5}),
            "Score must be between 0 and 10",
        ),
        (
            serde_json::json!({"animeId": 1, "title": "Some Show", "score": -0.5}),
            "Score must be between 0 and 10",
        ),
    ];

    for (payload, expected_error) in cases {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/watchlist")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], expected_error);
    }

    // Both ends of the score range are legal.
    for (anime_id, score) in [(100, 0.0), (101, 10.0)] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/watchlist")
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Content-Type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "animeId": anime_id,
                            "title": format!("Boundary {score}"),
                            "score": score
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Updates apply the same score rule.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/watchlist")
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"animeId": 102, "title": "Mushishi"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let entry_id = json["data"]["anime"]["id"].as_i64().expect("entry id");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/watchlist/{entry_id}"))
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::json!({"score": 10.5}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Score must be between 0 and 10");
}

#[tokio::test]
async fn test_racing_duplicate_adds_keep_one_entry() {
    let app = spawn_app().await;
    let token = register_user(&app, "sam", "sam@example.com").await;

    let post = |app: Router, token: String| async move {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/watchlist")
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"animeId": 30, "title": "Neon Genesis Evangelion"})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap()
    };

    // Whichever insert lands second hits the unique index.
    let (left, right) = tokio::join!(
        post(app.clone(), token.clone()),
        post(app.clone(), token.clone())
    );

    let mut statuses = [left.status(), right.status()];
    statuses.sort_by_key(StatusCode::as_u16);
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/watchlist")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(json["data"]["watchlist"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_watchlist_is_scoped_to_owner() {
    let app = spawn_app().await;
    let token_a = register_user(&app, "alice", "alice@example.com").await;
    let token_b = register_user(&app, "bob", "bob@example.com").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/watchlist")
                .header("Authorization", format!("Bearer {token_a}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"animeId": 21, "title": "One Piece"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let entry_id = json["data"]["anime"]["id"].as_i64().unwrap();

    // A default status was filled in.
    assert_eq!(json["data"]["anime"]["status"], "plan to watch");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/watchlist")
                .header("Authorization", format!("Bearer {token_b}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["watchlist"], serde_json::json!([]));

    // Another user's entry id behaves like a missing row.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/watchlist/{entry_id}"))
                .header("Authorization", format!("Bearer {token_b}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"status": "completed"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/watchlist/{entry_id}"))
                .header("Authorization", format!("Bearer {token_b}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/watchlist")
                .header("Authorization", format!("Bearer {token_a}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["watchlist"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_comments_flow() {
    let app = spawn_app().await;

    // Reading comments needs no token.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/comments/20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));

    // Posting does.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/comments/20")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"content": "great show"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Unauthorized - No token provided");

    let token = register_user(&app, "sam", "sam@example.com").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/comments/20")
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"content": "  Watched it twice.  "}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["content"], "Watched it twice.");
    assert_eq!(json["data"]["animeId"], 20);
    assert_eq!(json["data"]["user"]["username"], "sam");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/comments/20")
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"content": "Second thoughts."}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Blank content is rejected.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/comments/20")
                .header("Authorization", format!("Bearer {token}"))
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::json!({"content": "   "}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Comment content is required");

    // Newest first, and only for the requested anime.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/comments/20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    let comments = json["data"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "Second thoughts.");
    assert_eq!(comments[1]["content"], "Watched it twice.");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/comments/21")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));

    // Anime ids are validated on the public route too.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/comments/0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_endpoint_is_protected() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = register_user(&app, "sam", "sam@example.com").await;

    // No recorder installed in tests, so the handler reports that instead of
    // a scrape payload.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
