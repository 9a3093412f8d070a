use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use taskboard::config::Config;
use taskboard::db::Stores;
use taskboard::email::Outbox;

/// A running test server backed by the in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub outbox: Arc<Outbox>,
    pub stores: Stores,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit the registration form, return (status, location header, body).
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> (StatusCode, Option<String>, String) {
        let resp = self
            .client
            .post(self.url("/register"))
            .form(&[("username", username), ("email", email), ("password", password)])
            .send()
            .await
            .expect("register request failed");
        let status = resp.status();
        let location = location(&resp);
        let body = resp.text().await.unwrap_or_default();
        (status, location, body)
    }

    /// Login through the JSON API and return the body + status.
    pub async fn login(&self, username: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Register the default user and return an access token.
    pub async fn bootstrap(&self) -> String {
        let (status, location, body) = self
            .register("alice", "alice@test.com", "password123")
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER, "bootstrap register failed: {body}");
        assert_eq!(location.as_deref(), Some("/login?success"));

        let (body, status) = self.login("alice", "password123").await;
        assert_eq!(status, StatusCode::OK, "bootstrap login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Submit the new-todo form. Returns the status of the POST.
    pub async fn create_todo(&self, token: &str, fields: &[(&str, &str)]) -> StatusCode {
        self.client
            .post(self.url("/todoNew"))
            .bearer_auth(token)
            .form(fields)
            .send()
            .await
            .expect("create todo failed")
            .status()
    }

    /// POST to a page route with an empty body, return (status, location).
    pub async fn post_page(&self, path: &str, token: &str) -> (StatusCode, Option<String>) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("post request failed");
        (resp.status(), location(&resp))
    }

    /// Make an authenticated GET request against the JSON API.
    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Make an unauthenticated POST request with only query parameters.
    pub async fn post_query(&self, path: &str, query: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .query(query)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Pull the reset token out of the most recent mail sent to `to`.
    pub fn reset_token_for(&self, to: &str) -> String {
        let mail = self
            .outbox
            .sent()
            .into_iter()
            .rev()
            .find(|m| m.to == to)
            .expect("no mail sent to address");
        extract_token(&mail.body)
    }
}

pub fn extract_token(body: &str) -> String {
    let start = body.find("token=").expect("no token in mail") + "token=".len();
    body[start..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect()
}

fn location(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        base_url: "http://localhost:0".to_string(),
        session_hours: 1,
        reset_token_minutes: 60,
        log_level: "warn".to_string(),
        smtp: None,
    }
}

/// Spawn a test app with a fresh in-memory store and a recording outbox.
pub async fn spawn_app() -> TestApp {
    let stores = Stores::memory();
    let outbox = Arc::new(Outbox::new());

    let app = taskboard::build_app(stores.clone(), outbox.clone(), test_config());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        outbox,
        stores,
    }
}
