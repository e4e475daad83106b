// Scripted in-memory transport and tracing setup for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use crate::api::{HrTransport, HttpReply};
use crate::error::{EzError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
  pub method: &'static str,
  pub url: String,
  pub bearer: Option<String>,
  pub timeout: Option<Duration>,
  pub body: Option<serde_json::Value>,
}

/// Replays queued replies in order and records every call it receives.
#[derive(Default)]
pub struct ScriptedTransport {
  replies: RefCell<VecDeque<Result<HttpReply>>>,
  calls: RefCell<Vec<RecordedCall>>,
}

impl ScriptedTransport {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn reply(self, status: u16, body: serde_json::Value) -> Self {
    self.replies.borrow_mut().push_back(Ok(HttpReply {
      status,
      body: body.to_string(),
    }));
    self
  }

  pub fn reply_raw(self, status: u16, body: &str) -> Self {
    self.replies.borrow_mut().push_back(Ok(HttpReply {
      status,
      body: body.to_string(),
    }));
    self
  }

  pub fn fail(self, message: &str) -> Self {
    self.replies.borrow_mut().push_back(Err(EzError::Transport {
      url: "scripted".into(),
      message: message.into(),
    }));
    self
  }

  pub fn calls(&self) -> Vec<RecordedCall> {
    self.calls.borrow().clone()
  }

  pub fn calls_to(&self, url: &str) -> Vec<RecordedCall> {
    self.calls.borrow().iter().filter(|c| c.url == url).cloned().collect()
  }

  fn next(&self, call: RecordedCall) -> Result<HttpReply> {
    self.calls.borrow_mut().push(call);
    self
      .replies
      .borrow_mut()
      .pop_front()
      .unwrap_or_else(|| panic!("ScriptedTransport ran out of replies"))
  }
}

impl HrTransport for ScriptedTransport {
  fn get(&self, url: &str, bearer: &str, timeout: Option<Duration>) -> Result<HttpReply> {
    self.next(RecordedCall {
      method: "GET",
      url: url.to_string(),
      bearer: Some(bearer.to_string()),
      timeout,
      body: None,
    })
  }

  fn post_json(
    &self,
    url: &str,
    body: &serde_json::Value,
    bearer: Option<&str>,
    timeout: Option<Duration>,
  ) -> Result<HttpReply> {
    self.next(RecordedCall {
      method: "POST",
      url: url.to_string(),
      bearer: bearer.map(str::to_string),
      timeout,
      body: Some(body.clone()),
    })
  }
}

/// Initialize `tracing` once for the test process, honoring `RUST_LOG`.
pub fn init_tracing() {
  static INIT: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
  });
  Lazy::force(&INIT);
}
