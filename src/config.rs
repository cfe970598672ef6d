// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Credential discovery and the gate that must pass before any metrics query
// role: config/credentials
// inputs: env DD_API_KEY / DD_APP_KEY; optional CLI overrides
// outputs: Credentials (both keys present and non-blank)
// invariants:
// - Blank values count as missing
// - Explicit values win over environment values
// - Debug output never prints key material
// errors: Configuration naming every missing value
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use crate::error::ReportError;

pub const API_KEY_ENV: &str = "DD_API_KEY";
pub const APP_KEY_ENV: &str = "DD_APP_KEY";

/// Validated Datadog API + application keys.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
  api_key: String,
  app_key: String,
}

impl Credentials {
  pub fn new(api_key: impl Into<String>, app_key: impl Into<String>) -> Self {
    Self {
      api_key: api_key.into(),
      app_key: app_key.into(),
    }
  }

  pub fn api_key(&self) -> &str {
    &self.api_key
  }

  pub fn app_key(&self) -> &str {
    &self.app_key
  }
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("api_key", &"<redacted>")
      .field("app_key", &"<redacted>")
      .finish()
  }
}

/// Possibly-missing credential values as collected from flags and environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialInputs {
  pub api_key: Option<String>,
  pub app_key: Option<String>,
}

impl fmt::Debug for CredentialInputs {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CredentialInputs")
      .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
      .field("app_key", &self.app_key.as_ref().map(|_| "<redacted>"))
      .finish()
  }
}

fn non_blank(v: Option<String>) -> Option<String> {
  v.filter(|s| !s.trim().is_empty())
}

impl CredentialInputs {
  pub fn from_env() -> Self {
    Self {
      api_key: non_blank(std::env::var(API_KEY_ENV).ok()),
      app_key: non_blank(std::env::var(APP_KEY_ENV).ok()),
    }
  }

  /// Explicit values first, then the environment.
  pub fn resolve(api_key: Option<String>, app_key: Option<String>) -> Self {
    let env = Self::from_env();
    Self {
      api_key: non_blank(api_key).or(env.api_key),
      app_key: non_blank(app_key).or(env.app_key),
    }
  }

  pub fn require(&self) -> Result<Credentials, ReportError> {
    let api = non_blank(self.api_key.clone());
    let app = non_blank(self.app_key.clone());

    match (api, app) {
      (Some(api), Some(app)) => Ok(Credentials::new(api, app)),
      (None, None) => Err(ReportError::Configuration {
        missing: format!("{} and {}", API_KEY_ENV, APP_KEY_ENV),
      }),
      (None, Some(_)) => Err(ReportError::Configuration {
        missing: API_KEY_ENV.to_string(),
      }),
      (Some(_), None) => Err(ReportError::Configuration {
        missing: APP_KEY_ENV.to_string(),
      }),
    }
  }
}
