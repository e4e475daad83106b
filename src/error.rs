// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Single error taxonomy for input validation, authentication, identity lookup, and per-day registration
// role: errors/types
// outputs: EzError (thiserror) and the Result alias used by every component
// invariants:
// - Configuration, InvalidRange and Validation are only raised before any network call
// - Registration carries the dates already accepted remotely; nothing is rolled back
// - No variant ever embeds the secret or the bearer token
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDate;
use thiserror::Error;

use crate::payload::RequestKind;

pub type Result<T> = std::result::Result<T, EzError>;

#[derive(Error, Debug)]
pub enum EzError {
  #[error("Configuration error: {0}")]
  Configuration(String),

  #[error("Invalid date range: from-date {from} is after to-date {to}")]
  InvalidRange { from: NaiveDate, to: NaiveDate },

  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Couldn't log in to EZ (HTTP {status}): {detail}")]
  Authentication { status: u16, detail: String },

  #[error("Couldn't get the user profile (HTTP {status}): {detail}")]
  IdentityResolution { status: u16, detail: String },

  /// A single day was rejected; `submitted` lists the days registered before it.
  #[error("Couldn't register {kind} for {date} ({}); {} earlier day(s) were already registered", status_label(.status), .submitted.len())]
  Registration {
    kind: RequestKind,
    date: NaiveDate,
    status: Option<u16>,
    body: String,
    submitted: Vec<NaiveDate>,
  },

  #[error("Request to {url} failed: {message}")]
  Transport { url: String, message: String },

  #[error("I/O error: {0}")]
  Io(String),
}

fn status_label(status: &Option<u16>) -> String {
  match status {
    Some(code) => format!("HTTP {code}"),
    None => "no response".to_string(),
  }
}

impl EzError {
  /// True for failures detected before authentication was attempted.
  pub fn is_pre_network(&self) -> bool {
    matches!(
      self,
      EzError::Configuration(_) | EzError::InvalidRange { .. } | EzError::Validation(_)
    )
  }
}
