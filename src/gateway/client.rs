//! HTTP client forwarding validated calls to the ShareIt server

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{
    api::SHARER_USER_ID,
    config::GatewayConfig,
    error::{AppError, AppResult},
};

/// One call to forward: everything but the base URL
#[derive(Debug, Clone)]
pub struct Forward {
    pub method: Method,
    pub path: String,
    pub user_id: Option<i64>,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl Forward {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            user_id: None,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn as_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn query(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    /// Attach a JSON body
    pub fn json<T: serde::Serialize>(mut self, body: &T) -> AppResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| AppError::Internal(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }
}

#[derive(Clone)]
pub struct ShareItClient {
    client: reqwest::Client,
    base_url: String,
}

impl ShareItClient {
    pub fn new(config: &GatewayConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send the call and relay the server's status, content type and body unchanged
    pub async fn forward(&self, call: Forward) -> AppResult<Response> {
        let url = format!("{}{}", self.base_url, call.path);
        tracing::debug!("Forwarding {} {}", call.method, url);

        let mut request = self.client.request(call.method.clone(), &url);
        if let Some(user_id) = call.user_id {
            request = request.header(SHARER_USER_ID, user_id.to_string());
        }
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            AppError::Upstream(format!("{} {} failed: {}", call.method, url, e))
        })?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to read response of {}: {}", url, e)))?;

        let mut relayed = (status, body).into_response();
        match content_type {
            Some(value) => {
                relayed.headers_mut().insert(CONTENT_TYPE, value);
            }
            None => {
                relayed.headers_mut().remove(CONTENT_TYPE);
            }
        }
        Ok(relayed)
    }
}
