use log::debug;
use reqwest::{header, Client, Method};
use serde_json::Value;
use std::time::Duration;

use super::HarnessError;

/// Status and decoded JSON body of one API call.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn field(&self, name: &str) -> &Value {
        &self.body[name]
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.body.get(name).and_then(Value::as_str)
    }

    pub fn is_success_flag(&self) -> Option<bool> {
        self.body.get("success").and_then(Value::as_bool)
    }
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HarnessError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Hits the API root and returns the status, whatever the body holds.
    pub async fn ping(&self) -> Result<u16, HarnessError> {
        let url = self.url("/");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.send_error(&url, e))?;
        Ok(response.status().as_u16())
    }

    pub async fn get(&self, endpoint: &str, bearer: Option<&str>) -> Result<ApiResponse, HarnessError> {
        self.request(Method::GET, endpoint, None, bearer).await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, HarnessError> {
        self.request(Method::POST, endpoint, Some(body), bearer).await
    }

    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, HarnessError> {
        let url = self.url(endpoint);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.send_error(&url, e))?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        debug!("{} {} -> {}", method, url, status);

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| HarnessError::InvalidBody {
                url: url.clone(),
                status,
                reason: e.to_string(),
            })?
        };

        Ok(ApiResponse { status, body })
    }

    fn send_error(&self, url: &str, e: reqwest::Error) -> HarnessError {
        if e.is_timeout() {
            HarnessError::Timeout {
                url: url.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else if e.is_connect() {
            HarnessError::Unreachable {
                url: url.to_string(),
                reason: e.to_string(),
            }
        } else {
            HarnessError::Http(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:8787/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8787");
        assert_eq!(client.url("/api/auth/me"), "http://localhost:8787/api/auth/me");
    }

    /// Accepts connections and never answers them.
    async fn silent_listener() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let base_url = silent_listener().await;
        let client = ApiClient::new(&base_url, Duration::from_secs(1)).unwrap();

        let started = std::time::Instant::now();
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, HarnessError::Timeout { secs: 1, .. }), "{:?}", err);

        let err = client.get("/api/picks/today", None).await.unwrap_err();
        assert!(matches!(err, HarnessError::Timeout { .. }), "{:?}", err);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = ApiClient::new(&base_url, Duration::from_secs(2)).unwrap();
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, HarnessError::Unreachable { .. }), "{:?}", err);
    }

    #[test]
    fn test_response_accessors() {
        let response = ApiResponse {
            status: 200,
            body: json!({ "success": true, "accessToken": "abc", "stats": { "totalUsers": 3 } }),
        };
        assert_eq!(response.is_success_flag(), Some(true));
        assert_eq!(response.str_field("accessToken"), Some("abc"));
        assert_eq!(response.field("stats")["totalUsers"], 3);
        assert!(response.field("missing").is_null());
    }
}
