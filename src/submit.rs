// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Register one request per calendar day, in ascending order, stopping at the first rejected day
// role: processing/batch
// inputs: RegistrationRequest, Session, DateSequence, Endpoints, HrTransport, per-call timeout
// outputs: BatchReport listing the registered days
// side_effects: One POST per day until the first failure
// invariants:
// - Fail-fast: a failure on day k means exactly k registration calls were made
// - The error lists the days accepted before the failure; nothing is rolled back
// - The raw reply body of a rejected day is logged for diagnostics
// errors: Registration (rejected status or transport failure), Validation (payload)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::api::{Endpoints, HrTransport};
use crate::auth::Session;
use crate::dates::DateSequence;
use crate::error::{EzError, Result};
use crate::payload::{self, RegistrationRequest, RequestKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
  pub kind: RequestKind,
  pub user_id: String,
  pub submitted: Vec<NaiveDate>,
}

pub struct BatchSubmitter<'a> {
  transport: &'a dyn HrTransport,
  endpoints: &'a Endpoints,
  timeout: Duration,
}

impl<'a> BatchSubmitter<'a> {
  pub fn new(transport: &'a dyn HrTransport, endpoints: &'a Endpoints, timeout: Duration) -> Self {
    Self {
      transport,
      endpoints,
      timeout,
    }
  }

  pub fn submit(&self, request: &RegistrationRequest, session: &Session, dates: &DateSequence) -> Result<BatchReport> {
    let kind = request.kind();
    let url = self.endpoints.registration(kind)?;
    let mut submitted = Vec::with_capacity(dates.len());

    info!(
      %kind,
      user_id = %session.user_id,
      days = dates.len(),
      first = ?dates.first(),
      last = ?dates.last(),
      "registering"
    );

    for date in dates.iter() {
      let body = serde_json::to_value(payload::build(kind, request.params(), &session.user_id, date)?)
        .map_err(|e| EzError::Validation(format!("couldn't encode {kind} payload for {date}: {e}")))?;

      let reply = match self.transport.post_json(url, &body, Some(&session.token), Some(self.timeout)) {
        Ok(reply) => reply,
        Err(e) => {
          error!(%kind, %date, error = %e, "registration call failed");
          return Err(EzError::Registration {
            kind,
            date,
            status: None,
            body: e.to_string(),
            submitted,
          });
        }
      };

      if !reply.is_success() {
        error!(%kind, %date, status = reply.status, body = %reply.body, "registration rejected");
        return Err(EzError::Registration {
          kind,
          date,
          status: Some(reply.status),
          body: reply.body,
          submitted,
        });
      }

      debug!(%kind, %date, status = reply.status, "registered");
      submitted.push(date);
    }

    info!(%kind, user_id = %session.user_id, days = submitted.len(), "registration successful");

    Ok(BatchReport {
      kind,
      user_id: session.user_id.clone(),
      submitted,
    })
  }
}
