use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::middleware::{normalize_errors, panic_response, require_session};
use crate::state::AppState;

/// Full HTTP surface with the global layers applied.
///
/// Layers run outermost first: trace, CORS, error normalizer, panic capture,
/// body limit. The normalizer therefore sees panics as ordinary 500s.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        // Public
        .route("/", get(public::root::root))
        .route("/health", get(public::root::health))
        .merge(auth_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        .fallback(public::root::fallback)
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn_with_state(config.clone(), normalize_errors))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/sign-up/email", post(auth::sign_up))
        .route("/api/auth/sign-in/email", post(auth::sign_in))
        .route("/api/auth/sign-out", post(auth::sign_out))
        .route("/api/auth/get-session", get(auth::get_session))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{appointments, locations, pets, professionals};

    Router::new()
        .route("/api/pets", get(pets::list).post(pets::create))
        .route("/api/pets/me", get(pets::list_mine))
        .route("/api/pets/:id", patch(pets::update).delete(pets::delete))
        .route("/api/locations", get(locations::list).post(locations::create))
        .route(
            "/api/locations/:id",
            patch(locations::update).delete(locations::delete),
        )
        .route(
            "/api/professionals",
            get(professionals::list).post(professionals::create),
        )
        .route(
            "/api/professionals/:id",
            patch(professionals::update).delete(professionals::delete),
        )
        .route(
            "/api/appointments",
            get(appointments::list).post(appointments::create),
        )
        .route("/api/appointments/me", get(appointments::list_mine))
        .route(
            "/api/appointments/:id",
            patch(appointments::update).delete(appointments::delete),
        )
        // route_layer: unknown paths still reach the 404 fallback
        .route_layer(from_fn_with_state(state, require_session))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;
    use crate::testing::memory_state;
    use crate::validation::SignUp;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct TestApp {
        state: AppState,
    }

    impl TestApp {
        fn new() -> Self {
            Self {
                state: memory_state(AppConfig::development()),
            }
        }

        fn with_config(config: AppConfig) -> Self {
            Self {
                state: memory_state(config),
            }
        }

        /// Signs up a fresh account and returns its session cookie.
        async fn session(&self, email: &str, role: Role) -> String {
            let signed = self
                .state
                .auth
                .sign_up(SignUp {
                    name: "Test User".into(),
                    email: email.into(),
                    password: "correct horse".into(),
                })
                .await
                .unwrap();
            if role == Role::Admin {
                self.state.auth.set_role(email, Role::Admin).await.unwrap();
            }
            format!("{}={}", crate::auth::SESSION_COOKIE, signed.token)
        }

        async fn send(
            &self,
            method: &str,
            uri: &str,
            cookie: Option<&str>,
            body: Option<Value>,
        ) -> Response {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(cookie) = cookie {
                builder = builder.header(header::COOKIE, cookie);
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            app(self.state.clone()).oneshot(request).await.unwrap()
        }

        async fn send_raw(&self, uri: &str, cookie: &str, body: &'static str) -> Response {
            let request = Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap();
            app(self.state.clone()).oneshot(request).await.unwrap()
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location_body(zip: &str) -> Value {
        json!({
            "name": "Centro",
            "city": "Curitiba",
            "address": "Rua XV de Novembro, 100",
            "zipCode": zip
        })
    }

    #[tokio::test]
    async fn protected_routes_require_a_session() {
        let app = TestApp::new();
        let response = app.send("GET", "/api/pets/me", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHORIZED");

        let response = app
            .send("GET", "/api/pets/me", Some("vetclinic.session_token=bogus"), None)
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_routes_are_404_envelopes() {
        let app = TestApp::new();
        let response = app.send("GET", "/api/nothing-here", None, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn unsupported_methods_use_the_error_envelope() {
        let app = TestApp::new();
        let alice = app.session("alice@example.com", Role::User).await;

        let response = app
            .send("PUT", "/api/pets/abc", Some(&alice), Some(json!({"name": "Rex"})))
            .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "METHOD_NOT_ALLOWED");
        assert!(body.get("stack").is_some());

        let response = app.send("DELETE", "/health", None, None).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await["code"], "METHOD_NOT_ALLOWED");
    }

    #[tokio::test]
    async fn pet_lifecycle() {
        let app = TestApp::new();
        let alice = app.session("alice@example.com", Role::User).await;

        let response = app
            .send(
                "POST",
                "/api/pets",
                Some(&alice),
                Some(json!({"name": "Rex", "species": "DOG", "ownerId": "someone-else"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let pet = json_body(response).await;
        let id = pet["id"].as_str().unwrap().to_string();
        assert_ne!(pet["ownerId"], "someone-else");

        let response = app
            .send(
                "PATCH",
                &format!("/api/pets/{}", id),
                Some(&alice),
                Some(json!({"breed": "Beagle"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["name"], "Rex");
        assert_eq!(updated["breed"], "Beagle");

        let response = app
            .send("GET", "/api/pets/me?species=DOG&name=re", Some(&alice), None)
            .await;
        let listed = json_body(response).await;
        assert_eq!(listed["pets"].as_array().unwrap().len(), 1);

        let response = app
            .send("DELETE", &format!("/api/pets/{}", id), Some(&alice), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"message": "Pet successfully deleted."})
        );

        let response = app
            .send("DELETE", &format!("/api/pets/{}", id), Some(&alice), None)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_owners_get_403_and_missing_pets_404() {
        let app = TestApp::new();
        let alice = app.session("alice@example.com", Role::User).await;
        let mallory = app.session("mallory@example.com", Role::User).await;

        let pet = json_body(
            app.send(
                "POST",
                "/api/pets",
                Some(&alice),
                Some(json!({"name": "Mia", "species": "CAT"})),
            )
            .await,
        )
        .await;
        let uri = format!("/api/pets/{}", pet["id"].as_str().unwrap());

        let response = app.send("DELETE", &uri, Some(&mallory), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let response = app
            .send("DELETE", "/api/pets/does-not-exist", Some(&mallory), None)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_and_invalid_bodies() {
        let app = TestApp::new();
        let alice = app.session("alice@example.com", Role::User).await;

        let response = app.send_raw("/api/pets", &alice, "{\"name\": ").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "INVALID_JSON");

        let response = app
            .send(
                "POST",
                "/api/pets",
                Some(&alice),
                Some(json!({"name": "Rex", "species": "FISH"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["field"], "species");

        let response = app
            .send(
                "POST",
                "/api/pets",
                Some(&alice),
                Some(json!({"species": "DOG"})),
            )
            .await;
        let body = json_body(response).await;
        assert_eq!(body["details"][0]["field"], "name");
    }

    #[tokio::test]
    async fn stack_only_in_development() {
        let dev = TestApp::new();
        let response = dev.send("GET", "/api/pets/me", None, None).await;
        assert!(json_body(response).await.get("stack").is_some());

        let prod = TestApp::with_config(AppConfig::production());
        let response = prod.send("GET", "/api/pets/me", None, None).await;
        let body = json_body(response).await;
        assert!(body.get("stack").is_none());
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn locations_are_admin_managed_and_zip_normalized() {
        let app = TestApp::new();
        let user = app.session("user@example.com", Role::User).await;
        let admin = app.session("admin@example.com", Role::Admin).await;

        let response = app
            .send("POST", "/api/locations", Some(&user), Some(location_body("12345-678")))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let response = app
            .send("DELETE", "/api/locations/missing", Some(&user), None)
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .send("POST", "/api/locations", Some(&admin), Some(location_body("12345-678")))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["zipCode"], "12345678");

        let response = app
            .send("GET", "/api/locations?city=curitiba", Some(&user), None)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["locations"].as_array().unwrap().len(), 1);

        let response = app
            .send("POST", "/api/locations", Some(&admin), Some(location_body("123")))
            .await;
        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["field"], "zipCode");
    }

    #[tokio::test]
    async fn admin_listings_are_forbidden_to_users() {
        let app = TestApp::new();
        let user = app.session("user@example.com", Role::User).await;
        let admin = app.session("admin@example.com", Role::Admin).await;

        for uri in ["/api/pets", "/api/appointments"] {
            let response = app.send("GET", uri, Some(&user), None).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            let response = app.send("GET", uri, Some(&admin), None).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn appointment_booking_flow() {
        let app = TestApp::new();
        let alice = app.session("alice@example.com", Role::User).await;
        let admin = app.session("admin@example.com", Role::Admin).await;

        let pet = json_body(
            app.send(
                "POST",
                "/api/pets",
                Some(&alice),
                Some(json!({"name": "Rex", "species": "DOG"})),
            )
            .await,
        )
        .await;
        let date = (chrono::Utc::now() + chrono::Duration::days(3)).to_rfc3339();
        let response = app
            .send(
                "POST",
                "/api/appointments",
                Some(&alice),
                Some(json!({
                    "date": date,
                    "serviceType": "CHECKUP",
                    "petId": pet["id"],
                    "status": "COMPLETED"
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let appointment = json_body(response).await;
        assert_eq!(appointment["status"], "PENDING");
        let uri = format!("/api/appointments/{}", appointment["id"].as_str().unwrap());

        let response = app
            .send("PATCH", &uri, Some(&alice), Some(json!({"status": "CONFIRMED"})))
            .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let response = app
            .send("PATCH", &uri, Some(&admin), Some(json!({"status": "CONFIRMED"})))
            .await;
        assert_eq!(json_body(response).await["status"], "CONFIRMED");

        let response = app
            .send("GET", "/api/appointments/me?status=CONFIRMED", Some(&alice), None)
            .await;
        assert_eq!(
            json_body(response).await["appointments"].as_array().unwrap().len(),
            1
        );

        let past = (chrono::Utc::now() - chrono::Duration::days(1)).to_rfc3339();
        let response = app
            .send(
                "POST",
                "/api/appointments",
                Some(&alice),
                Some(json!({"date": past, "serviceType": "EXAM", "petId": pet["id"]})),
            )
            .await;
        let body = json_body(response).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["message"], "Appointments cannot happen in the past");
    }

    #[tokio::test]
    async fn auth_endpoints_round_trip() {
        let app = TestApp::new();
        let response = app
            .send(
                "POST",
                "/api/auth/sign-up/email",
                None,
                Some(json!({"name": "Maria", "email": "maria@example.com", "password": "correct horse"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let cookie = set_cookie.split(';').next().unwrap().to_string();
        let body = json_body(response).await;
        assert_eq!(body["user"]["email"], "maria@example.com");
        assert!(body["user"].get("passwordHash").is_none());

        let response = app
            .send("GET", "/api/auth/get-session", Some(&cookie), None)
            .await;
        let session = json_body(response).await;
        assert_eq!(session["user"]["email"], "maria@example.com");
        assert!(session["session"].get("tokenHash").is_none());

        let response = app
            .send(
                "POST",
                "/api/auth/sign-up/email",
                None,
                Some(json!({"name": "Maria", "email": "maria@example.com", "password": "correct horse"})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app.send("POST", "/api/auth/sign-out", Some(&cookie), None).await;
        assert_eq!(json_body(response).await, json!({"success": true}));

        let response = app
            .send("GET", "/api/auth/get-session", Some(&cookie), None)
            .await;
        assert_eq!(json_body(response).await, Value::Null);
    }

    #[tokio::test]
    async fn health_reports_without_a_database() {
        let app = TestApp::new();
        let response = app.send("GET", "/health", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["status"], "ok");
    }
}
