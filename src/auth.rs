// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Exchange a Credential for a bearer token and resolve the caller's EZ user id
// role: api/auth
// inputs: Credential (consumed), Endpoints, HrTransport, profile timeout
// outputs: Session { token, user_id }
// side_effects: Two network calls (login POST, profile GET); no retries
// invariants:
// - Non-2xx login or a 2xx login without Token => Authentication
// - Non-2xx profile or a profile without Data.ID => IdentityResolution
// - The login call carries no timeout; the profile call uses the configured one
// - Token and secret never logged
// errors: Authentication, IdentityResolution, Transport
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::api::{Endpoints, HrTransport, HttpReply};
use crate::credentials::Credential;
use crate::error::{EzError, Result};
use crate::ext::serde_json::JsonFetch;

/// Authenticated context for one run. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
  pub token: String,
  pub user_id: String,
}

impl fmt::Debug for Session {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Session")
      .field("token", &"<redacted>")
      .field("user_id", &self.user_id)
      .finish()
  }
}

/// Keep error details short; EZ sometimes answers with whole HTML pages.
fn snippet(reply: &HttpReply) -> String {
  let body = reply.body.trim();
  if body.is_empty() {
    return "empty response body".to_string();
  }
  body.chars().take(200).collect()
}

/// POST the credential to the login endpoint and pull `Token` from the reply.
pub fn authenticate(transport: &dyn HrTransport, endpoints: &Endpoints, credential: Credential) -> Result<String> {
  let payload = serde_json::json!({
    "UserName": credential.username,
    "Password": credential.secret(),
  });
  drop(credential);

  let reply = transport.post_json(&endpoints.signin, &payload, None, None)?;
  debug!(status = reply.status, "login reply");

  if !reply.is_success() {
    return Err(EzError::Authentication {
      status: reply.status,
      detail: snippet(&reply),
    });
  }

  reply
    .json()
    .and_then(|v| v.fetch("Token").to::<String>())
    .filter(|t| !t.trim().is_empty())
    .ok_or_else(|| EzError::Authentication {
      status: reply.status,
      detail: "login succeeded but the response carried no Token".into(),
    })
}

/// GET the profile with the bearer token and pull `Data.ID`.
pub fn resolve_identity(
  transport: &dyn HrTransport,
  endpoints: &Endpoints,
  token: &str,
  timeout: Duration,
) -> Result<String> {
  let reply = transport.get(&endpoints.profile, token, Some(timeout))?;
  debug!(status = reply.status, "profile reply");

  if !reply.is_success() {
    return Err(EzError::IdentityResolution {
      status: reply.status,
      detail: snippet(&reply),
    });
  }

  reply
    .json()
    .and_then(|v| v.fetch("Data.ID").to_id())
    .ok_or_else(|| EzError::IdentityResolution {
      status: reply.status,
      detail: "profile response carried no Data.ID".into(),
    })
}
