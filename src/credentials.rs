// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn a username plus an optional secret into a Credential, prompting only when the secret is absent
// role: input/credentials
// inputs: --username, optional --password, a SecretProvider capability
// outputs: Credential consumed once by the login call
// side_effects: TerminalPrompt blocks on a non-echoing terminal read
// invariants:
// - Empty username is a Configuration error and the provider is never asked
// - The secret never appears in Debug output or logs
// errors: Configuration, Io (prompt failure)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use dialoguer::Password;

use crate::error::{EzError, Result};

pub struct Credential {
  pub username: String,
  secret: String,
}

impl Credential {
  pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
    Self {
      username: username.into(),
      secret: secret.into(),
    }
  }

  pub fn secret(&self) -> &str {
    &self.secret
  }
}

impl fmt::Debug for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credential")
      .field("username", &self.username)
      .field("secret", &"<redacted>")
      .finish()
  }
}

/// Source of the secret when none was given on the command line.
pub trait SecretProvider {
  fn read_secret(&self, username: &str) -> Result<String>;
}

pub struct TerminalPrompt;

impl SecretProvider for TerminalPrompt {
  fn read_secret(&self, username: &str) -> Result<String> {
    Password::new()
      .with_prompt(format!("EZ password for {username}"))
      .allow_empty_password(true)
      .interact()
      .map_err(|e| EzError::Io(format!("Failed to read password: {e}")))
  }
}

pub fn resolve(username: &str, secret: Option<String>, provider: &dyn SecretProvider) -> Result<Credential> {
  let username = username.trim();

  if username.is_empty() {
    return Err(EzError::Configuration("username must not be empty".into()));
  }

  let secret = match secret {
    Some(s) => s,
    None => provider.read_secret(username)?,
  };

  Ok(Credential::new(username, secret))
}
