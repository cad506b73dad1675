use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::Component;

/// Outcome reported by the validation service for one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl TestResult {
    pub fn passed() -> Self {
        Self {
            status: true,
            message: None,
            logs: Vec::new(),
            data: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: Some(message.into()),
            logs: Vec::new(),
            data: None,
        }
    }

    pub fn with_logs(mut self, logs: Vec<String>) -> Self {
        self.logs = logs;
        self
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("validation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("validation service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Other(String),
}

/// External service that runs a single component in isolation.
#[async_trait]
pub trait ValidationGateway: Send + Sync {
    async fn test_component(&self, component: &Component) -> Result<TestResult, GatewayError>;
}

/// Ask `gateway` to test `component`. Errors become a failed result with no logs.
pub async fn run_test(gateway: &dyn ValidationGateway, component: &Component) -> TestResult {
    match gateway.test_component(component).await {
        Ok(result) => {
            info!(
                provider = %component.provider,
                passed = result.status,
                "component test finished"
            );
            result
        }
        Err(err) => {
            warn!(provider = %component.provider, error = %err, "component test errored");
            TestResult::failed(err.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/validate/test", self.base_url.trim_end_matches('/'))
    }
}

/// [`ValidationGateway`] backed by the HTTP validation endpoint.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        // The service enforces `timeout` itself; the client waits a little longer.
        let client = reqwest::Client::builder()
            .timeout(config.timeout + Duration::from_secs(5))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

#[async_trait]
impl ValidationGateway for HttpGateway {
    async fn test_component(&self, component: &Component) -> Result<TestResult, GatewayError> {
        let body = json!({
            "component": component,
            "timeout": self.config.timeout.as_secs(),
        });
        let response = self
            .client
            .post(self.config.endpoint())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|value| {
                    value
                        .get("message")
                        .or_else(|| value.get("detail"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or(text);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<TestResult>().await?)
    }
}
