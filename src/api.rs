// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: EZ endpoint table and the blocking HTTP seam (trait + ureq implementation) every network call goes through
// role: api/transport
// inputs: Base host URL; request bodies as JSON; optional bearer token and per-call timeout
// outputs: HttpReply { status, body } for every completed exchange, whatever the status
// side_effects: Network calls to the EZ host
// invariants:
// - Non-2xx statuses are returned as replies, never raised; callers decide what they mean
// - Connection/timeout failures become EzError::Transport with the URL
// - The bearer token is never logged
// errors: Transport
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use tracing::debug;

use crate::error::{EzError, Result};
use crate::payload::{unsupported_kind, RequestKind};

pub const DEFAULT_BASE_URL: &str = "https://hrtool.larion.com:3106";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
  pub signin: String,
  pub profile: String,
  pub overtime: String,
  pub work_from_home: String,
}

impl Endpoints {
  pub fn new(base_url: &str) -> Self {
    let base = base_url.trim_end_matches('/');
    Self {
      signin: format!("{base}/api/Login/LoginFromWeb"),
      profile: format!("{base}/api/HR_Employee/GetProfile"),
      overtime: format!("{base}/api/TA_EmployeeOT/RegisterOT"),
      work_from_home: format!("{base}/api/HR_Mission/RegisterMission"),
    }
  }

  /// Registration endpoint for a kind; kinds without a handler are rejected here too.
  pub fn registration(&self, kind: RequestKind) -> Result<&str> {
    match kind {
      RequestKind::Overtime => Ok(&self.overtime),
      RequestKind::WorkFromHome => Ok(&self.work_from_home),
      RequestKind::OutOfOffice => Err(unsupported_kind(kind)),
    }
  }
}

impl Default for Endpoints {
  fn default() -> Self {
    Self::new(DEFAULT_BASE_URL)
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
  pub status: u16,
  pub body: String,
}

impl HttpReply {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }

  pub fn json(&self) -> Option<serde_json::Value> {
    serde_json::from_str(&self.body).ok()
  }
}

// --- Trait seam for the EZ HTTP API ---
pub trait HrTransport {
  fn get(&self, url: &str, bearer: &str, timeout: Option<Duration>) -> Result<HttpReply>;
  fn post_json(
    &self,
    url: &str,
    body: &serde_json::Value,
    bearer: Option<&str>,
    timeout: Option<Duration>,
  ) -> Result<HttpReply>;
}

pub fn bearer_header(token: &str) -> String {
  format!("bearer {}", token)
}

pub struct UreqTransport;

impl UreqTransport {
  fn agent(timeout: Option<Duration>) -> ureq::Agent {
    ureq::Agent::config_builder()
      .timeout_global(timeout)
      .http_status_as_error(false)
      .build()
      .into()
  }

  fn finish(url: &str, resp: std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error>) -> Result<HttpReply> {
    let mut resp = resp.map_err(|e| transport_error(url, e))?;
    let status = resp.status().as_u16();
    let body = resp.body_mut().read_to_string().map_err(|e| transport_error(url, e))?;

    debug!(url, status, bytes = body.len(), "EZ reply");
    Ok(HttpReply { status, body })
  }
}

fn transport_error(url: &str, err: ureq::Error) -> EzError {
  EzError::Transport {
    url: url.to_string(),
    message: err.to_string(),
  }
}

impl HrTransport for UreqTransport {
  fn get(&self, url: &str, bearer: &str, timeout: Option<Duration>) -> Result<HttpReply> {
    debug!(url, ?timeout, "GET");
    let resp = Self::agent(timeout)
      .get(url)
      .header("Accept", "application/json")
      .header("Authorization", &bearer_header(bearer))
      .call();

    Self::finish(url, resp)
  }

  fn post_json(
    &self,
    url: &str,
    body: &serde_json::Value,
    bearer: Option<&str>,
    timeout: Option<Duration>,
  ) -> Result<HttpReply> {
    debug!(url, ?timeout, authorized = bearer.is_some(), "POST");
    let mut req = Self::agent(timeout).post(url).header("Accept", "application/json");

    if let Some(token) = bearer {
      req = req.header("Authorization", &bearer_header(token));
    }

    Self::finish(url, req.send_json(body))
  }
}
