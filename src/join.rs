// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Join success and failure query results by offer id and compute per-offer conversion
// role: transform/join
// inputs: success QueryResult, failure QueryResult, OfferFilter
// outputs: ConversionReport (offer id -> ConversionRecord)
// invariants:
// - empty filter emits every success group; non-empty filter emits only listed offer ids
// - failure totals sum every failure group sharing the offer id; unmatched success groups get failure 0
// - duplicate success offer ids: the later group wins
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeSet, HashMap};

use crate::model::{round_count, ConversionRecord, ConversionReport, QueryResult};

/// Offer ids the caller asked for. Empty means "all offers".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferFilter {
  ids: BTreeSet<String>,
}

impl OfferFilter {
  pub fn new<I, S>(ids: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      ids: ids.into_iter().map(Into::into).collect(),
    }
  }

  pub fn all() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }

  pub fn allows(&self, offer_id: &str) -> bool {
    self.ids.is_empty() || self.ids.contains(offer_id)
  }
}

pub fn join_results(success: &QueryResult, failure: &QueryResult, filter: &OfferFilter) -> ConversionReport {
  // Raw (unrounded) failure sums per offer id, built once.
  let mut failures: HashMap<&str, f64> = HashMap::with_capacity(failure.series.len());
  for fs in &failure.series {
    let raw: f64 = fs.points.iter().filter_map(|p| p.value).sum();
    *failures.entry(fs.tags.offer_id.as_str()).or_insert(0.0) += raw;
  }

  let mut report = ConversionReport::new();

  for series in &success.series {
    let offer_id = series.tags.offer_id.as_str();

    if !filter.allows(offer_id) {
      tracing::trace!(offer_id, "offer filtered out");
      continue;
    }

    let success_count = series.total();
    let failure_count = failures.get(offer_id).copied().map(round_count).unwrap_or(0);
    let record = ConversionRecord::new(success_count, failure_count, series.tags.product_type.clone());

    if report.insert(offer_id.to_string(), record).is_some() {
      tracing::warn!(offer_id, "duplicate success group for offer; keeping the later one");
    }
  }

  tracing::debug!(records = report.len(), filtered = !filter.is_empty(), "joined conversion report");

  report
}
