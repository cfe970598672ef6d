// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build the per-offer conversion report: credential gate, two category queries, normalize, join
// role: processing/orchestrator
// inputs: ReportConfig (credential inputs, window, filter, env tag, API settings, optional fixed now)
// outputs: ConversionReport
// side_effects: Two sequential metrics queries (success, then failure)
// invariants:
// - Credential gate runs before the backend is constructed; a failed gate makes zero calls
// - First error aborts the run; no partial report is returned
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};

use crate::config::{CredentialInputs, Credentials};
use crate::error::ReportError;
use crate::join::{join_results, OfferFilter};
use crate::metrics_api::{self, query_category, ApiSettings, MetricsApi};
use crate::model::{Category, ConversionReport, QueryResult};
use crate::normalize::normalize_response;
use crate::util::effective_now;

#[derive(Debug, Clone)]
pub struct ReportConfig {
  pub credentials: CredentialInputs,
  pub window_days: u32,
  pub offers: OfferFilter,
  pub env_tag: String,
  pub api: ApiSettings,
  pub now_override: Option<DateTime<Utc>>,
}

/// Fetch the report from the configured backend.
pub fn build_report(cfg: &ReportConfig) -> Result<ConversionReport, ReportError> {
  build_report_with(cfg, |creds| metrics_api::build_api(creds, &cfg.api))
}

/// Same as `build_report`, with the backend supplied by `connect` once credentials are known.
pub fn build_report_with<'a, F>(cfg: &ReportConfig, connect: F) -> Result<ConversionReport, ReportError>
where
  F: FnOnce(&Credentials) -> Box<dyn MetricsApi + 'a>,
{
  // Phase 1: credential gate
  let credentials = cfg.credentials.require()?;
  let api = connect(&credentials);
  let now = effective_now(cfg.now_override);

  // Phase 2: success then failure
  let success = fetch_category(api.as_ref(), Category::Success.as_str(), cfg, now)?;
  let failure = fetch_category(api.as_ref(), Category::Failure.as_str(), cfg, now)?;

  // Phase 3: join
  let report = join_results(&success, &failure, &cfg.offers);

  tracing::info!(
    offers = report.len(),
    success_series = success.series.len(),
    failure_series = failure.series.len(),
    window_days = cfg.window_days,
    "conversion report built"
  );

  Ok(report)
}

fn fetch_category(
  api: &dyn MetricsApi,
  category: &str,
  cfg: &ReportConfig,
  now: DateTime<Utc>,
) -> Result<QueryResult, ReportError> {
  let parsed: Category = category.parse()?;
  let response = query_category(api, category, &cfg.env_tag, cfg.window_days, now)?;
  normalize_response(parsed, response)
}
