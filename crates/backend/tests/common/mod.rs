#![allow(dead_code)]

use backend::shared::config::{Config, DatabaseConfig};
use backend::{routes, AppState};
use reqwest::{header, Client, Response, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Backend running on an ephemeral port over a fresh database
pub struct TestApp {
    pub base_url: String,
    pub client: Client,
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database: DatabaseConfig {
                path: dir.path().join("tailor.db").to_string_lossy().into_owned(),
            },
            server: Default::default(),
            auth: Default::default(),
            cors: Default::default(),
            logging: Default::default(),
        };

        let state = AppState::initialize(config).await.unwrap();
        let app = routes::build_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            client: Client::new(),
            state,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sign up the default test user and return its session cookie
    pub async fn signup(&self) -> String {
        let response = self
            .client
            .post(self.url("/api/auth/signup"))
            .json(&json!({
                "fullName": "Test Tailor",
                "email": "owner@tailor.pk",
                "password": "needle123",
                "mobile": "03001112233"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        session_cookie(&response).expect("signup sets a session cookie")
    }

    pub async fn get(&self, cookie: &str, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .header(header::COOKIE, cookie)
            .send()
            .await
            .unwrap()
    }

    pub async fn post(&self, cookie: &str, path: &str, body: Value) -> Response {
        self.client
            .post(self.url(path))
            .header(header::COOKIE, cookie)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn put(&self, cookie: &str, path: &str, body: Value) -> Response {
        self.client
            .put(self.url(path))
            .header(header::COOKIE, cookie)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn delete(&self, cookie: &str, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .header(header::COOKIE, cookie)
            .send()
            .await
            .unwrap()
    }

    /// Create a customer and return its JSON
    pub async fn create_customer(&self, cookie: &str, name: &str, phone: &str) -> Value {
        let response = self
            .post(cookie, "/api/customers", json!({ "name": name, "phone": phone }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.unwrap()
    }
}

/// `name=value` of the session cookie set by a response
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with("session=") && pair.len() > "session=".len())
        .map(str::to_string)
}

pub fn measurement_body() -> Value {
    json!({
        "length": 40, "shoulder": 18, "chest": 42, "waist": 36, "hip": 40,
        "neck": 15.5, "sleeveLength": 24, "wrist": 7, "bicep": 13,
        "shalwarLength": 39, "thigh": 24, "knee": 17, "bottom": 14, "pantWaist": 34
    })
}
