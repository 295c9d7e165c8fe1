use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use chrono::{TimeZone, Utc};
use database::{
    clock::{Clock, FixedClock},
    services::user::{NewUser, UserService},
    store::MemoryStore,
};
use models::role::Role;
use serde_json::{Value, json};
use server::{app, auth::Authenticator, state::AppState};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    /// The clock sits on 2025-10-01, before Spring 2026 begins
    fn new() -> Self {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap());
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(clock),
            Authenticator::new("test-secret", 3600),
        );

        Self {
            router: app(state.clone()),
            state,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            request = request.header("x-auth", token);
        }

        let request = match body {
            Some(body) => request
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, body)
    }

    /// Creates an account directly in the store and returns a token for it
    async fn user_with_role(&self, username: &str, role: Role) -> String {
        let user = UserService::create_user(
            self.state.store.as_ref(),
            self.state.clock.as_ref(),
            NewUser {
                username: username.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: format!("{username}@example.com"),
                password_hash: "not-a-real-hash".to_string(),
                status: None,
                role,
            },
        )
        .await
        .unwrap();

        self.state
            .auth
            .create_token(user.id, self.state.clock.now())
            .unwrap()
    }

    async fn create_course(&self, token: &str, number: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/courses",
                Some(token),
                Some(json!({
                    "prefix": "SDEV",
                    "number": number,
                    "name": format!("Course {number}"),
                    "creditHoursMin": 3,
                    "topics": ["Testing"],
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        body["_id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_liveness_routes() {
    let app = TestApp::new();

    for uri in ["/", "/health"] {
        let (status, body) = app.send(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("OK".to_string()));
    }

    let (status, doc) = app
        .send(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/schedules/{schedule_id}/drop"].is_object());
}

#[tokio::test]
async fn test_register_login_and_status() {
    let app = TestApp::new();

    let registration = json!({
        "username": "ada",
        "password": "analytical",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": "ada@example.com",
    });

    let (status, body) = app
        .send(Method::POST, "/api/user", None, Some(registration.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let token = body["token"].as_str().unwrap().to_string();
    let user_id = body["userId"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(Method::POST, "/api/user", None, Some(registration))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already taken");

    let (status, me) = app.send(Method::GET, "/api/user/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["_id"], user_id.as_str());
    assert_eq!(me["role"], "student");
    assert!(me.get("password").is_none());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth",
            None,
            Some(json!({ "username": "ada", "password": "analytical" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], user_id.as_str());

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth",
            None,
            Some(json!({ "username": "ada", "password": "difference" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Failed to authenticate.");

    let (status, _) = app
        .send(Method::POST, "/api/auth", None, Some(json!({ "username": "ada" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(Method::GET, "/api/auth/status", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/api/auth/status", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(Method::GET, "/api/auth/status", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_admin_roles() {
    let app = TestApp::new();

    for role in ["admin", "super-admin", "janitor"] {
        let (status, _) = app
            .send(
                Method::POST,
                "/api/user",
                None,
                Some(json!({
                    "username": format!("{role}-user"),
                    "password": "pw",
                    "firstName": "A",
                    "lastName": "B",
                    "email": "a@example.com",
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "role {role}");
    }

    let (status, _) = app
        .send(
            Method::POST,
            "/api/user",
            None,
            Some(json!({ "username": "incomplete" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_course_permissions_and_views() {
    let app = TestApp::new();
    let student = app.user_with_role("student", Role::Student).await;
    let teacher = app.user_with_role("teacher", Role::Teacher).await;
    let admin = app.user_with_role("admin", Role::Admin).await;

    let (status, _) = app
        .send(Method::POST, "/api/courses", None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/courses",
            Some(&student),
            Some(json!({ "prefix": "SDEV", "number": "120", "name": "Logic", "creditHoursMin": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/courses",
            Some(&teacher),
            Some(json!({ "prefix": "SDEV", "number": "120", "name": "Logic" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "creditHoursMin is required");

    let logic = app.create_course(&teacher, "120").await;
    let java = app.create_course(&teacher, "200").await;

    for _ in 0..2 {
        let (status, _) = app
            .send(Method::GET, &format!("/api/courses/{java}"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, trending) = app
        .send(Method::GET, "/api/courses/trending?limit=1", None, None)
        .await;
    assert_eq!(trending.as_array().unwrap().len(), 1);
    assert_eq!(trending[0]["_id"], java.as_str());
    assert_eq!(trending[0]["clickCount"], 2);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/courses/{logic}"),
            Some(&teacher),
            Some(json!({ "name": "Computing Logic", "clickCount": 99 })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, courses) = app.send(Method::GET, "/api/courses", None, None).await;
    assert_eq!(courses[0]["name"], "Computing Logic");
    assert_eq!(courses[0]["clickCount"], 0);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/courses/{logic}"), Some(&teacher), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/courses/{logic}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(Method::GET, &format!("/api/courses/{logic}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::GET, "/api/courses/not-a-uuid", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cart_flow() {
    let app = TestApp::new();
    let student = app.user_with_role("student", Role::Student).await;
    let teacher = app.user_with_role("teacher", Role::Teacher).await;
    let course = app.create_course(&teacher, "120").await;

    let (status, _) = app.send(Method::GET, "/api/cart", Some(&teacher), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/cart/remove/{course}"),
            Some(&student),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let add = format!("/api/cart/add/{course}");
    let (status, body) = app.send(Method::POST, &add, Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["added"], true);

    let (status, body) = app.send(Method::POST, &add, Some(&student), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["added"], false);

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/cart/add/{}", uuid_like()),
            Some(&student),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cart) = app.send(Method::GET, "/api/cart", Some(&student), None).await;
    assert_eq!(cart["itemCount"], 1);
    assert_eq!(cart["items"][0]["course"]["number"], "120");

    let check = format!("/api/cart/check/{course}");
    let (_, body) = app.send(Method::GET, &check, Some(&student), None).await;
    assert_eq!(body["inCart"], true);

    let remove = format!("/api/cart/remove/{course}");
    let (status, body) = app.send(Method::DELETE, &remove, Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], true);

    let (status, body) = app.send(Method::DELETE, &remove, Some(&student), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["removed"], false);

    let (_, body) = app.send(Method::GET, &check, Some(&student), None).await;
    assert_eq!(body["inCart"], false);

    let (status, _) = app
        .send(Method::DELETE, "/api/cart/clear", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_schedule_lifecycle() {
    let app = TestApp::new();
    let student = app.user_with_role("student", Role::Student).await;
    let other = app.user_with_role("other", Role::Student).await;
    let teacher = app.user_with_role("teacher", Role::Teacher).await;
    let logic = app.create_course(&teacher, "120").await;
    let java = app.create_course(&teacher, "200").await;

    let spring = json!({ "term": "Spring", "year": 2026 });

    let (status, body) = app
        .send(Method::POST, "/api/schedules", Some(&student), Some(spring.clone()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Your shopping cart is empty.");

    for course in [&logic, &java] {
        app.send(
            Method::POST,
            &format!("/api/cart/add/{course}"),
            Some(&student),
            None,
        )
        .await;
    }

    let (status, _) = app
        .send(
            Method::POST,
            "/api/schedules",
            Some(&student),
            Some(json!({ "term": "Fall", "year": 2020 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/schedules",
            Some(&student),
            Some(json!({ "term": "Winter", "year": 2026 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(Method::POST, "/api/schedules", Some(&student), Some(spring.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let schedule = &body["schedule"];
    let schedule_id = schedule["_id"].as_str().unwrap().to_string();
    assert_eq!(schedule["term"], "Spring");
    assert_eq!(schedule["courses"].as_array().unwrap().len(), 2);
    assert_eq!(schedule["courses"][0]["status"], "enrolled");
    assert_eq!(schedule["courses"][0]["course"]["number"], "120");

    let (_, cart) = app.send(Method::GET, "/api/cart", Some(&student), None).await;
    assert_eq!(cart["itemCount"], 0);

    let (status, _) = app
        .send(Method::POST, "/api/schedules", Some(&student), Some(spring))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, this_year) = app.send(Method::GET, "/api/schedules", Some(&student), None).await;
    assert!(this_year.as_array().unwrap().is_empty());

    let (_, next_year) = app
        .send(
            Method::GET,
            "/api/schedules?year=2026&term=Spring",
            Some(&student),
            None,
        )
        .await;
    assert_eq!(next_year.as_array().unwrap().len(), 1);

    let (status, _) = app
        .send(Method::GET, "/api/schedules?term=Winter", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let get = format!("/api/schedules/{schedule_id}");
    let (status, _) = app.send(Method::GET, &get, Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let add = format!("/api/schedules/{schedule_id}/add");
    let (status, _) = app.send(Method::POST, &add, Some(&student), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let drop = format!("/api/schedules/{schedule_id}/drop");
    let (status, _) = app
        .send(Method::POST, &drop, Some(&student), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            Method::POST,
            &drop,
            Some(&student),
            Some(json!({ "courseId": logic })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schedule"]["courses"][0]["status"], "dropped");

    let (status, _) = app
        .send(
            Method::POST,
            &drop,
            Some(&student),
            Some(json!({ "courseId": logic })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Java is still enrolled, so adding it again aborts the whole add
    for course in [&logic, &java] {
        app.send(
            Method::POST,
            &format!("/api/cart/add/{course}"),
            Some(&student),
            None,
        )
        .await;
    }
    let (status, _) = app.send(Method::POST, &add, Some(&student), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, unchanged) = app.send(Method::GET, &get, Some(&student), None).await;
    assert_eq!(unchanged["courses"][0]["status"], "dropped");

    app.send(
        Method::DELETE,
        &format!("/api/cart/remove/{java}"),
        Some(&student),
        None,
    )
    .await;
    let (status, body) = app.send(Method::POST, &add, Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schedule"]["courses"][0]["status"], "enrolled");

    let (_, cart) = app.send(Method::GET, "/api/cart", Some(&student), None).await;
    assert_eq!(cart["itemCount"], 1);

    let (status, _) = app.send(Method::GET, &get, Some(&teacher), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tokens_for_missing_users_and_malformed_tokens_are_rejected() {
    let app = TestApp::new();
    let ghost = app
        .state
        .auth
        .create_token(Uuid::new_v4(), app.state.clock.now())
        .unwrap();

    for uri in ["/api/user/me", "/api/cart"] {
        let (status, body) = app.send(Method::GET, uri, Some(&ghost), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "Invalid or expired token");

        let (status, body) = app.send(Method::GET, uri, Some("not-a-token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "Invalid or expired token");
    }

    let (status, _) = app
        .send(Method::GET, "/api/auth/status", Some(&ghost), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_schedule_year_falls_back_to_current_year() {
    let app = TestApp::new();
    let student = app.user_with_role("student", Role::Student).await;
    let teacher = app.user_with_role("teacher", Role::Teacher).await;
    let logic = app.create_course(&teacher, "120").await;

    app.send(
        Method::POST,
        &format!("/api/cart/add/{logic}"),
        Some(&student),
        None,
    )
    .await;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/schedules",
            Some(&student),
            Some(json!({ "term": "Spring", "year": 2026 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    for uri in [
        "/api/schedules?year=abc",
        "/api/schedules?year=",
        "/api/schedules?year=0&term=Spring",
    ] {
        let (status, body) = app.send(Method::GET, uri, Some(&student), None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body.as_array().unwrap().is_empty(), "{uri}");
    }

    let (status, body) = app
        .send(Method::GET, "/api/schedules?year=%202026%20", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

fn uuid_like() -> &'static str {
    "00000000-0000-4000-8000-000000000000"
}
