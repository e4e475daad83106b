// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Process-level helpers: tracing subscriber setup and man page rendering
// role: utilities/helpers
// inputs: verbose flag, RUST_LOG; clap CommandFactory
// outputs: Installed global subscriber; man page text
// side_effects: init_logging installs the global tracing subscriber (stderr)
// invariants: RUST_LOG wins over --verbose; logs never go to stdout
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::IsTerminal;

use clap::CommandFactory;
use tracing_subscriber::{fmt, EnvFilter};

pub fn log_filter(verbose: bool) -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

pub fn init_logging(verbose: bool) {
  let _ = fmt()
    .with_env_filter(log_filter(verbose))
    .with_target(false)
    .with_ansi(std::io::stderr().is_terminal())
    .with_writer(std::io::stderr)
    .try_init();
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
