use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use crate::config::CredentialInputs;
use crate::join::OfferFilter;
use crate::metrics_api::{ApiSettings, DEFAULT_ENV_TAG, DEFAULT_SITE};
use crate::render::OutputFormat;
use crate::report::ReportConfig;
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "payflow-conversion-report",
    version,
    about = "Report per-offer subscription purchase conversion from Datadog metrics",
    long_about = None
)]
pub struct Cli {
  /// Offer ids to report on (default: every offer seen in the window)
  #[arg(value_name = "OFFER_ID")]
  pub offer_ids: Vec<String>,

  /// Lookback window in whole days, ending now
  #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..))]
  pub days: u32,

  /// Value of the `env` tag the counters are filtered to
  #[arg(long, default_value = DEFAULT_ENV_TAG)]
  pub env: String,

  /// Datadog site, e.g. datadoghq.eu
  #[arg(long, env = "DD_SITE", default_value = DEFAULT_SITE)]
  pub site: String,

  /// Full API base URL; overrides --site
  #[arg(long)]
  pub api_base: Option<String>,

  /// Datadog API key (default: $DD_API_KEY)
  #[arg(long)]
  pub api_key: Option<String>,

  /// Datadog application key (default: $DD_APP_KEY)
  #[arg(long)]
  pub app_key: Option<String>,

  /// Per-request timeout in seconds
  #[arg(long, default_value_t = 30)]
  pub timeout_secs: u64,

  /// Output format
  #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
  pub format: OutputFormat,

  /// Output location: file path, or "-" for stdout
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Log level for this tool when RUST_LOG is unset (error, warn, info, debug, trace)
  #[arg(long, default_value = "warn")]
  pub log_level: String,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant that ends the window (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub report: ReportConfig,
  pub format: OutputFormat,
  pub out: String,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  if cli.timeout_secs == 0 {
    bail!("--timeout-secs must be at least 1");
  }

  let env_tag = cli.env.trim().to_string();
  if env_tag.is_empty() {
    bail!("--env must not be empty");
  }

  let offers: Vec<String> = cli
    .offer_ids
    .iter()
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .collect();

  // No ids on the command line means every offer in the window.
  let offers = if offers.is_empty() {
    OfferFilter::all()
  } else {
    OfferFilter::new(offers)
  };

  let timeout = Duration::from_secs(cli.timeout_secs);
  let api = match cli.api_base.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    Some(base) => ApiSettings {
      base_url: base.trim_end_matches('/').to_string(),
      timeout,
    },
    None => ApiSettings::for_site(&cli.site, timeout),
  };

  let now_override = cli.now_override.as_deref().map(util::parse_now).transpose()?;

  Ok(EffectiveConfig {
    report: ReportConfig {
      credentials: CredentialInputs::resolve(cli.api_key, cli.app_key),
      window_days: cli.days,
      offers,
      env_tag,
      api,
      now_override,
    },
    format: cli.format,
    out: cli.out,
  })
}
