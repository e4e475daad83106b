use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod api;
mod auth;
mod cli;
mod credentials;
mod dates;
mod error;
mod ext;
mod payload;
mod submit;
#[cfg(test)]
mod testutil;
mod util;
mod workflow;

use crate::api::UreqTransport;
use crate::cli::{normalize, Cli};
use crate::credentials::TerminalPrompt;
use crate::error::EzError;
use crate::workflow::Workflow;

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  util::init_logging(cli.verbose);

  // Phase 1: validate every input before touching the network
  let cfg = normalize(cli).inspect_err(report_failure)?;

  // Phase 2: login, profile, one registration per day
  let transport = UreqTransport;
  let mut workflow = Workflow::new(cfg, &transport, &TerminalPrompt);
  let outcome = workflow.run();
  debug!(state = ?workflow.state(), "run finished");
  let report = outcome.inspect_err(report_failure)?;

  println!(
    "[!] {} registration successful for {} ({} day(s){})",
    report.kind,
    report.user_id,
    report.submitted.len(),
    match (report.submitted.first(), report.submitted.last()) {
      (Some(first), Some(last)) if first != last => format!(": {first} .. {last}"),
      (Some(first), _) => format!(": {first}"),
      _ => String::new(),
    }
  );

  Ok(())
}

fn report_failure(err: &EzError) {
  if err.is_pre_network() {
    eprintln!("[!] Nothing was sent to EZ.");
  }

  if let EzError::Registration { body, submitted, .. } = err {
    if !body.trim().is_empty() {
      eprintln!("[!] EZ replied: {}", body.trim());
    }

    if !submitted.is_empty() {
      let days: Vec<String> = submitted.iter().map(|d| d.to_string()).collect();
      eprintln!("[!] Already registered before the failure: {}", days.join(", "));
    }
  }
}
