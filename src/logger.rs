// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Configure tracing output for the binary
// role: logging/setup
// inputs: --log-level; RUST_LOG (takes precedence)
// outputs: Global tracing subscriber writing to stderr
// invariants: stdout stays reserved for the report
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use tracing_subscriber::EnvFilter;

const CRATE_TARGET: &str = "payflow_conversion_report";

/// Filter directive used when RUST_LOG is unset.
pub fn default_directive(log_level: &str) -> String {
  format!("{}={}", CRATE_TARGET, log_level)
}

pub fn setup(log_level: &str) {
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(default_directive(log_level)))
    .unwrap_or_else(|_| EnvFilter::new(default_directive("warn")));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}
