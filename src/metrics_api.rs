// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Metrics backend seam: query construction, Datadog HTTP client, and env-fixture backend for tests
// role: client/metrics-api
// inputs: Credentials, ApiSettings (base URL, timeout), env tag; env PAYFLOW_TEST_* fixtures
// outputs: MetricsQueryResponse per category query
// side_effects: Network calls to the Datadog v1 query endpoint
// invariants:
// - Category is validated before any backend call
// - Window is [now - days*86400, now] in Unix seconds
// - Non-2xx responses keep their body on the error
// errors: BackendQuery for transport/status/API failures; Serialization for undecodable bodies
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::Credentials;
use crate::error::{BackendFailure, ReportError};
use crate::model::{Category, MetricsQueryResponse};

pub const METRIC_NAMESPACE: &str = "prometheus";
pub const METRIC_NAME: &str = "payflow_subscription";
pub const DEFAULT_ENV_TAG: &str = "prd";
pub const DEFAULT_SITE: &str = "datadoghq.com";

const SECONDS_PER_DAY: i64 = 86_400;

/// One fully-resolved time-series query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsQuery {
  pub category: Category,
  pub query: String,
  pub from: i64,
  pub to: i64,
}

impl MetricsQuery {
  pub fn new(category: Category, env_tag: &str, window_days: u32, now: DateTime<Utc>) -> Self {
    let to = now.timestamp();
    let from = to - i64::from(window_days) * SECONDS_PER_DAY;

    Self {
      category,
      query: query_string(category, env_tag),
      from,
      to,
    }
  }
}

pub fn query_string(category: Category, env_tag: &str) -> String {
  format!(
    "sum:{}.{}_{}_total{{env:{}}} by {{offer_id, product_type}}.as_count()",
    METRIC_NAMESPACE, METRIC_NAME, category, env_tag
  )
}

// --- Trait seam for the metrics backend ---
pub trait MetricsApi {
  fn query_metrics(&self, query: &MetricsQuery) -> Result<MetricsQueryResponse, ReportError>;
}

/// Validate `category` and run one query. Nothing reaches the backend for an unknown category.
pub fn query_category(
  api: &dyn MetricsApi,
  category: &str,
  env_tag: &str,
  window_days: u32,
  now: DateTime<Utc>,
) -> Result<MetricsQueryResponse, ReportError> {
  let category: Category = category.parse()?;
  let query = MetricsQuery::new(category, env_tag, window_days, now);

  tracing::info!(%category, from = query.from, to = query.to, query = %query.query, "querying metrics");

  api.query_metrics(&query)
}

/// Decode a response body and surface API-level errors carried inside it.
pub fn parse_response_body(category: Category, body: &str) -> Result<MetricsQueryResponse, ReportError> {
  let resp: MetricsQueryResponse =
    serde_json::from_str(body).map_err(|source| ReportError::Serialization { category, source })?;

  let status_error = resp.status.as_deref() == Some("error");
  let message = resp.error.as_deref().filter(|e| !e.trim().is_empty());

  if status_error || message.is_some() {
    let msg = message.unwrap_or("status: error").to_string();
    return Err(ReportError::backend(category, BackendFailure::Api(msg), Some(body.to_string())));
  }

  Ok(resp)
}

/// Pull a readable message out of an error body (`{"errors": [...]}` or `{"error": "..."}`).
fn error_message(body: &str) -> String {
  let Ok(v) = serde_json::from_str::<serde_json::Value>(body) else {
    return body.trim().chars().take(200).collect();
  };

  if let Some(errors) = v.get("errors").and_then(|e| e.as_array()) {
    let parts: Vec<&str> = errors.iter().filter_map(|e| e.as_str()).collect();
    if !parts.is_empty() {
      return parts.join("; ");
    }
  }

  v.get("error")
    .and_then(|e| e.as_str())
    .map(str::to_string)
    .unwrap_or_else(|| "no error message".to_string())
}

/// Connection settings for the HTTP backend.
#[derive(Debug, Clone)]
pub struct ApiSettings {
  pub base_url: String,
  pub timeout: Duration,
}

impl ApiSettings {
  pub fn for_site(site: &str, timeout: Duration) -> Self {
    Self {
      base_url: format!("https://api.{}", site.trim().trim_end_matches('/')),
      timeout,
    }
  }
}

struct DatadogHttpApi {
  credentials: Credentials,
  settings: ApiSettings,
  agent: ureq::Agent,
}

impl DatadogHttpApi {
  fn new(credentials: Credentials, settings: ApiSettings) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(settings.timeout))
      .http_status_as_error(false)
      .build()
      .into();

    Self {
      credentials,
      settings,
      agent,
    }
  }
}

impl MetricsApi for DatadogHttpApi {
  fn query_metrics(&self, query: &MetricsQuery) -> Result<MetricsQueryResponse, ReportError> {
    let url = format!("{}/api/v1/query", self.settings.base_url.trim_end_matches('/'));
    let category = query.category;

    let mut resp = self
      .agent
      .get(&url)
      .query("from", query.from.to_string())
      .query("to", query.to.to_string())
      .query("query", &query.query)
      .header("Accept", "application/json")
      .header("User-Agent", "payflow-conversion-report")
      .header("DD-API-KEY", self.credentials.api_key())
      .header("DD-APPLICATION-KEY", self.credentials.app_key())
      .call()
      .map_err(|e| ReportError::backend(category, BackendFailure::Transport(e), None))?;

    let status = resp.status().as_u16();
    let body = resp
      .body_mut()
      .read_to_string()
      .map_err(|e| ReportError::backend(category, BackendFailure::Transport(e), None))?;

    tracing::debug!(%category, status, bytes = body.len(), "metrics response received");

    if !(200..300).contains(&status) {
      let message = error_message(&body);
      return Err(ReportError::backend(
        category,
        BackendFailure::Status { status, message },
        Some(body),
      ));
    }

    parse_response_body(category, &body)
  }
}

pub const TEST_SUCCESS_ENV: &str = "PAYFLOW_TEST_SUCCESS_JSON";
pub const TEST_FAILURE_ENV: &str = "PAYFLOW_TEST_FAILURE_JSON";

/// Serves responses from `PAYFLOW_TEST_*_JSON`; an unset variable yields an empty result.
struct MetricsEnvApi;

impl MetricsApi for MetricsEnvApi {
  fn query_metrics(&self, query: &MetricsQuery) -> Result<MetricsQueryResponse, ReportError> {
    let key = match query.category {
      Category::Success => TEST_SUCCESS_ENV,
      Category::Failure => TEST_FAILURE_ENV,
    };

    match std::env::var(key) {
      Ok(body) => parse_response_body(query.category, &body),
      Err(_) => Ok(MetricsQueryResponse::default()),
    }
  }
}

fn env_wants_mock() -> bool {
  std::env::var(TEST_SUCCESS_ENV).is_ok() || std::env::var(TEST_FAILURE_ENV).is_ok()
}

pub fn build_api(credentials: &Credentials, settings: &ApiSettings) -> Box<dyn MetricsApi> {
  if env_wants_mock() {
    tracing::warn!("serving metrics from {} / {} fixtures", TEST_SUCCESS_ENV, TEST_FAILURE_ENV);
    Box::new(MetricsEnvApi)
  } else {
    Box::new(DatadogHttpApi::new(credentials.clone(), settings.clone()))
  }
}

// Constructors for unit tests that need a concrete backend.
#[cfg(test)]
pub fn make_http_api(credentials: Credentials, settings: ApiSettings) -> Box<dyn MetricsApi> {
  Box::new(DatadogHttpApi::new(credentials, settings))
}
#[cfg(test)]
pub fn make_env_api() -> Box<dyn MetricsApi> {
  Box::new(MetricsEnvApi)
}
