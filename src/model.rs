// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the backend response model, the normalized series model, and the report records
// role: model/types
// outputs: Category, MetricsQueryResponse/RawSeries, MetricSeries/QueryResult, ConversionRecord/ConversionReport
// invariants: ConversionRecord JSON keys are success/failure/sum/payflowConversion/productType; sum == success + failure
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Which purchase counter a query reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Success,
  Failure,
}

impl Category {
  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Success => "success",
      Category::Failure => "failure",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Category {
  type Err = ReportError;

  /// Only the exact lowercase names are accepted.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "success" => Ok(Category::Success),
      "failure" => Ok(Category::Failure),
      other => Err(ReportError::InvalidCategory(other.to_string())),
    }
  }
}

// --- Backend (Datadog v1 /query) response shape ---

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MetricsQueryResponse {
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub error: Option<String>,
  #[serde(default)]
  pub series: Option<Vec<RawSeries>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawSeries {
  #[serde(default)]
  pub metric: Option<String>,
  /// `[timestamp_ms, value-or-null]` entries.
  #[serde(default)]
  pub pointlist: Option<Vec<Vec<Option<f64>>>>,
  #[serde(default)]
  pub tag_set: Option<Vec<String>>,
}

// --- Normalized model ---

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
  pub timestamp_ms: i64,
  pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesTags {
  pub offer_id: String,
  pub product_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
  pub tags: SeriesTags,
  pub points: Vec<Point>,
}

impl MetricSeries {
  /// Total of all non-null points, rounded to a whole count.
  pub fn total(&self) -> u64 {
    sum_points(&self.points)
  }
}

pub fn sum_points(points: &[Point]) -> u64 {
  let raw: f64 = points.iter().filter_map(|p| p.value).sum();
  round_count(raw)
}

pub(crate) fn round_count(raw: f64) -> u64 {
  if raw.is_finite() && raw > 0.0 {
    raw.round() as u64
  } else {
    0
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
  pub category: Category,
  pub series: Vec<MetricSeries>,
}

// --- Report ---

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
  pub success: u64,
  pub failure: u64,
  pub sum: u64,
  pub payflow_conversion: f64,
  pub product_type: String,
}

impl ConversionRecord {
  pub fn new(success: u64, failure: u64, product_type: impl Into<String>) -> Self {
    let sum = success.saturating_add(failure);
    ConversionRecord {
      success,
      failure,
      sum,
      payflow_conversion: conversion_rate(success, failure),
      product_type: product_type.into(),
    }
  }
}

/// Successes as a percentage of all attempts; 0 when there were none.
pub fn conversion_rate(success: u64, failure: u64) -> f64 {
  if success == 0 && failure == 0 {
    return 0.0;
  }
  let s = success as f64;
  s / (s + failure as f64) * 100.0
}

/// Offer id -> record. Ordered so rendered output is stable.
pub type ConversionReport = BTreeMap<String, ConversionRecord>;
