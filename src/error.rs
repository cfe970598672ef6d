// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed failure taxonomy for the conversion report pipeline
// role: errors/types
// outputs: ReportError (terminal for one invocation) and BackendFailure (cause of a failed query)
// invariants: Every variant is terminal; no partial report accompanies an error
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

use crate::model::Category;

#[derive(Debug, Error)]
pub enum ReportError {
  #[error("missing credentials: set {missing}")]
  Configuration { missing: String },

  #[error("invalid category {0:?}: expected \"success\" or \"failure\"")]
  InvalidCategory(String),

  #[error("failed to get {category} purchase data")]
  BackendQuery {
    category: Category,
    #[source]
    source: BackendFailure,
    /// Raw response body, when the backend answered at all.
    response: Option<String>,
  },

  #[error("failed to decode {category} response")]
  Serialization {
    category: Category,
    #[source]
    source: serde_json::Error,
  },

  #[error("malformed {category} series #{index}: {reason}")]
  MalformedResponse {
    category: Category,
    index: usize,
    reason: String,
  },
}

/// Why a single metrics query failed.
#[derive(Debug, Error)]
pub enum BackendFailure {
  #[error("transport error")]
  Transport(#[from] ureq::Error),

  #[error("HTTP {status}: {message}")]
  Status { status: u16, message: String },

  #[error("backend reported an error: {0}")]
  Api(String),
}

impl ReportError {
  pub fn backend(category: Category, source: BackendFailure, response: Option<String>) -> Self {
    ReportError::BackendQuery {
      category,
      source,
      response,
    }
  }

  /// The raw response body attached to a backend failure, if any.
  pub fn response_body(&self) -> Option<&str> {
    match self {
      ReportError::BackendQuery { response, .. } => response.as_deref(),
      _ => None,
    }
  }
}
