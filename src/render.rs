// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Render a ConversionReport as pretty JSON or a fixed-width text table
// role: output/render
// inputs: ConversionReport, OutputFormat
// outputs: String ready for stdout or a file
// invariants: Offers appear in ascending offer-id order in both formats
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::model::ConversionReport;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  /// Pretty-printed JSON object keyed by offer id
  Json,
  /// Aligned text table, one offer per line
  Text,
}

pub fn render_report(report: &ConversionReport, format: OutputFormat) -> Result<String> {
  match format {
    OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    OutputFormat::Text => Ok(render_text(report)),
  }
}

fn render_text(report: &ConversionReport) -> String {
  if report.is_empty() {
    return "no offers matched\n".to_string();
  }

  let offer_w = report.keys().map(|k| k.len()).max().unwrap_or(0).max("OFFER".len());
  let product_w = report
    .values()
    .map(|r| r.product_type.len())
    .max()
    .unwrap_or(0)
    .max("PRODUCT".len());

  let mut out = format!(
    "{:<offer_w$}  {:<product_w$}  {:>9}  {:>9}  {:>9}  {:>10}\n",
    "OFFER", "PRODUCT", "SUCCESS", "FAILURE", "SUM", "CONVERSION"
  );

  for (offer, r) in report {
    out.push_str(&format!(
      "{:<offer_w$}  {:<product_w$}  {:>9}  {:>9}  {:>9}  {:>10}\n",
      offer,
      r.product_type,
      r.success,
      r.failure,
      r.sum,
      format!("{:.2}%", r.payflow_conversion)
    ));
  }

  out
}
