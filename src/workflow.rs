// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drive one run: credential -> login -> profile -> expand days -> per-day submission
// role: processing/orchestrator
// inputs: EffectiveConfig (already validated), HrTransport, SecretProvider
// outputs: BatchReport on success; the component's EzError otherwise
// side_effects: Network calls through the transport; may prompt for the secret
// invariants:
// - States only move forward: Unauthenticated -> Authenticated -> IdentityResolved -> DatesExpanded -> Submitting -> Done
// - Any failure moves straight to Failed and ends the run; nothing is resumed or retried
// - The secret is prompted for only after input validation and dropped right after login
// errors: Propagates component errors unchanged
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use tracing::debug;

use crate::api::HrTransport;
use crate::auth::{self, Session};
use crate::cli::EffectiveConfig;
use crate::credentials::{self, SecretProvider};
use crate::dates;
use crate::error::Result;
use crate::payload::{unsupported_kind, RequestKind};
use crate::submit::{BatchReport, BatchSubmitter};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
  Unauthenticated,
  Authenticated,
  IdentityResolved,
  DatesExpanded,
  Submitting,
  Done,
  Failed,
}

pub struct Workflow<'a> {
  cfg: EffectiveConfig,
  transport: &'a dyn HrTransport,
  secrets: &'a dyn SecretProvider,
  state: RunState,
}

impl<'a> Workflow<'a> {
  pub fn new(cfg: EffectiveConfig, transport: &'a dyn HrTransport, secrets: &'a dyn SecretProvider) -> Self {
    Self {
      cfg,
      transport,
      secrets,
      state: RunState::Unauthenticated,
    }
  }

  pub fn state(&self) -> RunState {
    self.state
  }

  fn advance(&mut self, next: RunState) {
    debug!(from = ?self.state, to = ?next, "state");
    self.state = next;
  }

  pub fn run(&mut self) -> Result<BatchReport> {
    let result = self.drive();

    match &result {
      Ok(_) => self.advance(RunState::Done),
      Err(_) => self.advance(RunState::Failed),
    }

    result
  }

  fn drive(&mut self) -> Result<BatchReport> {
    let credential = credentials::resolve(&self.cfg.username, self.cfg.password.take(), self.secrets)?;

    let token = auth::authenticate(self.transport, &self.cfg.endpoints, credential)?;
    self.advance(RunState::Authenticated);

    let user_id = auth::resolve_identity(self.transport, &self.cfg.endpoints, &token, self.cfg.profile_timeout)?;
    let session = Session { token, user_id };
    self.advance(RunState::IdentityResolved);

    let range = self.cfg.request.range();
    let days = dates::expand(range.from(), range.to())?;
    self.advance(RunState::DatesExpanded);

    self.advance(RunState::Submitting);
    let kind = self.cfg.request.kind();

    match kind {
      RequestKind::Overtime | RequestKind::WorkFromHome => {
        BatchSubmitter::new(self.transport, &self.cfg.endpoints, self.cfg.registration_timeout).submit(
          &self.cfg.request,
          &session,
          &days,
        )
      }
      RequestKind::OutOfOffice => Err(unsupported_kind(kind)),
    }
  }
}
