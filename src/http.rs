use crate::{constants::SESSION_COOKIE_NAME, retry::RetryPolicy};
use anyhow::{Context, Result};
use log::debug;
use regex::Regex;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, SET_COOKIE},
    Client, Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    /// Non-empty body that is not valid JSON
    Text(String),
}

impl Body {
    pub fn parse(text: String) -> Self {
        if text.is_empty() {
            return Body::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(v) => Body::Json(v),
            Err(_) => Body::Text(text),
        }
    }
}

/// Status and body of one call. Any status is a valid response here;
/// callers decide what counts as success.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Body,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            Body::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        self.json().and_then(Value::as_array)
    }

    /// Top-level field of an object body.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.json().and_then(|v| v.get(name))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some_and(|v| !v.is_null())
    }

    /// Deserialize the body into `T`, or `None` if it does not fit.
    pub fn parse<T: DeserializeOwned>(&self) -> Option<T> {
        self.json().and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Deserialize each element of an array body into `T`, skipping the
    /// elements that do not fit. A non-array body yields nothing.
    pub fn records<T: DeserializeOwned>(&self) -> Vec<T> {
        self.as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| serde_json::from_value(v.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Short rendering of the body for log lines.
    pub fn describe(&self) -> String {
        match &self.body {
            Body::Empty => "null".to_string(),
            Body::Json(v) => v.to_string(),
            Body::Text(t) => format!("{:?}", t),
        }
    }
}

/// First `JSESSIONID=...` pair found among `Set-Cookie` values.
pub fn extract_session<'a>(
    pattern: &Regex,
    set_cookies: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    set_cookies
        .into_iter()
        .find_map(|v| pattern.find(v).map(|m| m.as_str().to_string()))
}

/// JSON client bound to one service base URL.
///
/// Holds the session cookie for the lifetime of a command: every call sends
/// it and every response that sets a new one replaces it.
pub struct ApiClient {
    pub base_url: String,
    client: Client,
    retry: RetryPolicy,
    session: Option<String>,
    session_pattern: Regex,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_retry(base_url, RetryPolicy::linear())
    }

    pub fn with_retry(base_url: &str, retry: RetryPolicy) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;
        Ok(ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retry,
            session: None,
            session_pattern: Regex::new(&format!("{}=[^;]+", SESSION_COOKIE_NAME))?,
        })
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn clear_session(&mut self) {
        self.session = None;
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&mut self, path: &str) -> Result<ApiResponse> {
        self.call(Method::GET, path, None, true).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &mut self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse> {
        let value = serde_json::to_value(body).context("serializing request body")?;
        self.call(Method::POST, path, Some(value), true).await
    }

    pub async fn delete(&mut self, path: &str) -> Result<ApiResponse> {
        self.call(Method::DELETE, path, None, true).await
    }

    /// GET without sending the session cookie and without adopting one.
    pub async fn get_anonymous(&mut self, path: &str) -> Result<ApiResponse> {
        self.call(Method::GET, path, None, false).await
    }

    /// Single unauthenticated GET, no retry. Returns the status code.
    pub async fn probe(&self, path: &str) -> Result<u16> {
        let url = self.url(path);
        debug!("probe GET {}", url);
        let resp = RetryPolicy::once()
            .run(&format!("GET {url}"), || {
                let req = self.client.get(&url);
                async move { req.send().await.map_err(anyhow::Error::from) }
            })
            .await
            .with_context(|| format!("cannot reach {}", url))?;
        Ok(resp.status().as_u16())
    }

    async fn call(
        &mut self,
        method: Method,
        path: &str,
        body: Option<Value>,
        with_session: bool,
    ) -> Result<ApiResponse> {
        let url = self.url(path);
        let cookie = if with_session { self.session.clone() } else { None };
        debug!("{} {}", method, url);

        let client = &self.client;
        let resp = self
            .retry
            .run(&format!("{method} {url}"), || {
                let mut req = client.request(method.clone(), &url);
                if let Some(c) = &cookie {
                    req = req.header(COOKIE, c.as_str());
                }
                if let Some(b) = &body {
                    req = req.json(b);
                }
                async move { req.send().await.map_err(anyhow::Error::from) }
            })
            .await
            .with_context(|| format!("{} {} failed", method, url))?;

        if with_session {
            let set_cookies = resp
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok());
            if let Some(sid) = extract_session(&self.session_pattern, set_cookies) {
                debug!("session cookie updated from {}", url);
                self.session = Some(sid);
            }
        }

        let status = resp.status().as_u16();
        let text = resp
            .text()
            .await
            .with_context(|| format!("reading body of {} {}", method, url))?;
        Ok(ApiResponse {
            status,
            body: Body::parse(text),
        })
    }
}
