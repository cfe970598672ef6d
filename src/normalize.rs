// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Project the backend's typed query response onto the normalized MetricSeries model
// role: transform/normalize
// inputs: MetricsQueryResponse for one category
// outputs: QueryResult with label prefixes stripped from tags
// invariants:
// - tag_set slot 0 is `offer_id:<id>`, slot 1 is `product_type:<type>`; only the label prefix is stripped
// - missing pointlist yields no points; null values stay None
// errors: MalformedResponse for short/mislabelled tag sets and short point entries (whole request fails)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::error::ReportError;
use crate::model::{Category, MetricSeries, MetricsQueryResponse, Point, QueryResult, RawSeries, SeriesTags};

pub const OFFER_ID_LABEL: &str = "offer_id";
pub const PRODUCT_TYPE_LABEL: &str = "product_type";

const TAG_SLOT_OFFER_ID: usize = 0;
const TAG_SLOT_PRODUCT_TYPE: usize = 1;

/// Strip exactly `<label>:` from the front of a tag. None when the tag carries another label.
pub fn strip_tag_label<'a>(tag: &'a str, label: &str) -> Option<&'a str> {
  tag.strip_prefix(label)?.strip_prefix(':')
}

pub fn normalize_response(category: Category, response: MetricsQueryResponse) -> Result<QueryResult, ReportError> {
  let raw = response.series.unwrap_or_default();
  let mut series = Vec::with_capacity(raw.len());

  for (index, s) in raw.into_iter().enumerate() {
    series.push(normalize_series(category, index, s)?);
  }

  tracing::debug!(%category, series = series.len(), "normalized query result");

  Ok(QueryResult { category, series })
}

fn normalize_series(category: Category, index: usize, raw: RawSeries) -> Result<MetricSeries, ReportError> {
  let malformed = |reason: String| ReportError::MalformedResponse {
    category,
    index,
    reason,
  };

  tracing::trace!(%category, index, metric = raw.metric.as_deref().unwrap_or("-"), "normalizing series");

  let tag_set = raw.tag_set.unwrap_or_default();

  if tag_set.len() < 2 {
    return Err(malformed(format!("expected 2 tags, found {}", tag_set.len())));
  }

  let offer_id = strip_tag_label(&tag_set[TAG_SLOT_OFFER_ID], OFFER_ID_LABEL)
    .ok_or_else(|| malformed(format!("tag {:?} is not an {} tag", tag_set[TAG_SLOT_OFFER_ID], OFFER_ID_LABEL)))?;
  let product_type = strip_tag_label(&tag_set[TAG_SLOT_PRODUCT_TYPE], PRODUCT_TYPE_LABEL).ok_or_else(|| {
    malformed(format!(
      "tag {:?} is not a {} tag",
      tag_set[TAG_SLOT_PRODUCT_TYPE], PRODUCT_TYPE_LABEL
    ))
  })?;

  let pointlist = raw.pointlist.unwrap_or_default();
  let mut points = Vec::with_capacity(pointlist.len());

  for (i, entry) in pointlist.iter().enumerate() {
    let (ts, value) = match entry.as_slice() {
      [ts, value, ..] => (*ts, *value),
      _ => return Err(malformed(format!("point #{} has {} element(s), expected 2", i, entry.len()))),
    };
    let Some(ts) = ts else {
      return Err(malformed(format!("point #{} has a null timestamp", i)));
    };

    points.push(Point {
      timestamp_ms: ts as i64,
      value,
    });
  }

  Ok(MetricSeries {
    tags: SeriesTags {
      offer_id: offer_id.to_string(),
      product_type: product_type.to_string(),
    },
    points,
  })
}
