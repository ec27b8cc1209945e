//! Test HTTP client.
//!
//! Thin wrapper over `reqwest` that returns the status, headers and JSON
//! body of every call so tests can assert on all three.

use reqwest::header::HeaderMap;
use serde_json::Value;
use std::net::SocketAddr;

/// A response with its body already parsed.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Value,
}

/// A test API client.
#[derive(Clone)]
pub struct TestClient {
    base: String,
    http: reqwest::Client,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            base: format!("http://{addr}"),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn read(response: reqwest::Response) -> TestResponse {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response.text().await.expect("Failed to read body");
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed");
        Self::read(response).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST failed");
        Self::read(response).await
    }

    /// POST with a raw body and explicit content type.
    pub async fn post_raw(&self, path: &str, content_type: &str, body: &str) -> TestResponse {
        let response = self
            .http
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body.to_string())
            .send()
            .await
            .expect("POST failed");
        Self::read(response).await
    }

    pub async fn post(&self, path: &str) -> TestResponse {
        let response = self
            .http
            .post(self.url(path))
            .send()
            .await
            .expect("POST failed");
        Self::read(response).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let response = self
            .http
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE failed");
        Self::read(response).await
    }

    /// Create a user and return its id.
    pub async fn create_user(&self, username: &str, email: &str) -> i64 {
        let response = self
            .post_json(
                "/users",
                &serde_json::json!({ "username": username, "email": email }),
            )
            .await;
        assert_eq!(response.status, 201, "create user: {:?}", response.body);
        response.body["id"].as_i64().expect("id missing")
    }

    /// Create an article and return its id.
    pub async fn create_article(&self, title: &str, content: &str) -> i64 {
        let response = self
            .post_json(
                "/articles",
                &serde_json::json!({ "title": title, "content": content }),
            )
            .await;
        assert_eq!(response.status, 201, "create article: {:?}", response.body);
        response.body["id"].as_i64().expect("id missing")
    }
}
