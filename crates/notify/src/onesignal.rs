//! OneSignal REST client.
//!
//! Sends a single synchronous HTTP POST per notification with a bounded
//! request timeout. No retries and no queueing: a slow or failing
//! provider costs the caller at most one timed-out request.

use std::time::Duration;

use serde_json::{json, Value};

/// HTTP request timeout for a single delivery attempt. The provider is
/// called inline from the submission path, so this bound keeps a slow
/// provider from stalling submissions.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default OneSignal REST API base URL.
const DEFAULT_BASE_URL: &str = "https://onesignal.com/api/v1";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// OneSignal credentials and URLs, loaded from the environment.
///
/// App id and REST API key are optional: their absence is a recoverable
/// configuration problem for the notification path only, never a startup
/// failure.
#[derive(Debug, Clone)]
pub struct OneSignalConfig {
    /// OneSignal application id (`ONESIGNAL_APP_ID`).
    pub app_id: Option<String>,
    /// OneSignal REST API key (`ONESIGNAL_REST_API_KEY`).
    pub rest_api_key: Option<String>,
    /// API base URL (`ONESIGNAL_BASE_URL`).
    pub base_url: String,
    /// Public application URL used for click-through links (`APP_URL`).
    pub app_url: String,
}

impl OneSignalConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default                         |
    /// |------------------------|---------------------------------|
    /// | `ONESIGNAL_APP_ID`     | unset                           |
    /// | `ONESIGNAL_REST_API_KEY` | unset                         |
    /// | `ONESIGNAL_BASE_URL`   | `https://onesignal.com/api/v1`  |
    /// | `APP_URL`              | `http://localhost:3000`         |
    pub fn from_env() -> Self {
        Self {
            app_id: non_empty_env("ONESIGNAL_APP_ID"),
            rest_api_key: non_empty_env("ONESIGNAL_REST_API_KEY"),
            base_url: std::env::var("ONESIGNAL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            app_url: std::env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }

    /// A config with no credentials; every send reports a config failure.
    pub fn unconfigured() -> Self {
        Self {
            app_id: None,
            rest_api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            app_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Read an env var, treating empty values as unset.
fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result value for a notification attempt.
///
/// `success: false` covers every failure mode; callers log it as a
/// warning and carry on.
#[derive(Debug, Clone)]
pub struct NotificationOutcome {
    pub success: bool,
    /// Provider-assigned notification id, when delivery succeeded.
    pub notification_id: Option<String>,
    /// Recipient count reported by the provider.
    pub recipients: Option<i64>,
    /// Failure reason, when delivery did not succeed.
    pub error: Option<String>,
}

impl NotificationOutcome {
    fn sent(notification_id: Option<String>, recipients: Option<i64>) -> Self {
        Self {
            success: true,
            notification_id,
            recipients,
            error: None,
        }
    }

    fn failed(reason: String) -> Self {
        Self {
            success: false,
            notification_id: None,
            recipients: None,
            error: Some(reason),
        }
    }
}

// ---------------------------------------------------------------------------
// Delivery error (internal)
// ---------------------------------------------------------------------------

/// Internal error type for a delivery attempt; converted to a
/// [`NotificationOutcome`] before it leaves this module.
#[derive(Debug, thiserror::Error)]
enum DeliveryError {
    #[error("OneSignal configuration is missing. Please check your environment variables.")]
    MissingConfig,

    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OneSignal API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Thin client over the OneSignal notifications endpoint.
pub struct OneSignalClient {
    config: OneSignalConfig,
    client: reqwest::Client,
}

impl OneSignalClient {
    /// Create a client with a pre-configured HTTP transport.
    pub fn new(config: OneSignalConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { config, client }
    }

    /// Send a notification to all subscribed users.
    ///
    /// `data` is arbitrary structured metadata attached to the
    /// notification; the standard lead-submission fields
    /// (`notification_type`, `web_url`, `timestamp`) are merged in.
    pub async fn send_to_all(&self, message: &str, data: Value) -> NotificationOutcome {
        let target = json!({ "included_segments": ["All"] });
        self.send(message, data, target).await
    }

    /// Send a notification to specific users by external user id.
    pub async fn send_to_users(
        &self,
        user_ids: &[String],
        message: &str,
        data: Value,
    ) -> NotificationOutcome {
        let target = json!({ "include_external_user_ids": user_ids });
        self.send(message, data, target).await
    }

    async fn send(&self, message: &str, data: Value, target: Value) -> NotificationOutcome {
        let payload = match self.build_payload(message, data, target) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Notification skipped");
                return NotificationOutcome::failed(e.to_string());
            }
        };

        match self.deliver(&payload).await {
            Ok(outcome) => {
                tracing::info!(
                    notification_id = outcome.notification_id.as_deref(),
                    recipients = outcome.recipients,
                    "OneSignal notification sent"
                );
                outcome
            }
            Err(e) => {
                tracing::error!(error = %e, "OneSignal delivery failed");
                NotificationOutcome::failed(e.to_string())
            }
        }
    }

    /// Build the provider payload, failing when credentials are absent.
    fn build_payload(
        &self,
        message: &str,
        data: Value,
        target: Value,
    ) -> Result<Value, DeliveryError> {
        let app_id = self.config.app_id.as_deref().ok_or(DeliveryError::MissingConfig)?;
        if self.config.rest_api_key.is_none() {
            return Err(DeliveryError::MissingConfig);
        }

        let form_url = format!("{}/form", self.config.app_url);

        let mut merged = match data {
            Value::Object(map) => map,
            Value::Null => serde_json::Map::new(),
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        merged.insert("notification_type".to_string(), json!("new_registration"));
        merged.insert("web_url".to_string(), json!(form_url));
        merged.insert(
            "timestamp".to_string(),
            json!(chrono::Utc::now().to_rfc3339()),
        );

        let mut payload = json!({
            "app_id": app_id,
            "contents": { "en": message },
            "headings": { "en": "New Lead Submission" },
            "data": Value::Object(merged),
            // Click-through destination.
            "url": form_url,
        });

        if let (Value::Object(payload_map), Value::Object(target_map)) = (&mut payload, target) {
            payload_map.extend(target_map);
        }

        Ok(payload)
    }

    /// Execute a single POST to the notifications endpoint.
    async fn deliver(&self, payload: &Value) -> Result<NotificationOutcome, DeliveryError> {
        let api_key = self
            .config
            .rest_api_key
            .as_deref()
            .ok_or(DeliveryError::MissingConfig)?;

        let url = format!("{}/notifications", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Basic {api_key}"))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            let notification_id = body
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string);
            let recipients = body.get("recipients").and_then(Value::as_i64);
            Ok(NotificationOutcome::sent(notification_id, recipients))
        } else {
            let detail = match body.get("errors") {
                Some(Value::Array(errors)) => errors
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                Some(other) => other.to_string(),
                None => "no error detail".to_string(),
            };
            Err(DeliveryError::Api {
                status: status.as_u16(),
                detail,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
