use std::fmt;
use std::time::Duration;

use clap::Parser;

use crate::api::{Endpoints, DEFAULT_BASE_URL};
use crate::dates::{parse_day, DateRange};
use crate::error::{EzError, Result};
use crate::payload::{parse_clock, OvertimeSubKind, PayloadParams, RegistrationRequest, RequestKind};

const PROFILE_TIMEOUT: Duration = Duration::from_secs(3);
const REGISTRATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(
    name = "ez-register",
    version,
    about = "Register overtime or work-from-home days on EZ for a whole date range",
    long_about = None
)]
pub struct Cli {
  /// Request type: OT (overtime), WFH (work from home), OOO (out of office)
  #[arg(short = 't', long = "type", value_enum, required_unless_present = "gen_man")]
  pub kind: Option<RequestKind>,

  /// Your EZ username
  #[arg(short, long, required_unless_present = "gen_man")]
  pub username: Option<String>,

  /// Your EZ password (prompted for if omitted)
  #[arg(short, long)]
  pub password: Option<String>,

  /// First day to register, e.g. 2024-09-20.
  /// Short forms take two dashes (--fd, --td, --ft, --tt); a single-dash -fd is not accepted
  #[arg(long = "from-date", alias = "fd", required_unless_present = "gen_man")]
  pub from_date: Option<String>,

  /// Last day to register (inclusive), e.g. 2024-09-25 (also --td)
  #[arg(long = "to-date", alias = "td", required_unless_present = "gen_man")]
  pub to_date: Option<String>,

  /// Overtime start, e.g. 18:00 (required with --type OT; also --ft)
  #[arg(long = "from-time", alias = "ft")]
  pub from_time: Option<String>,

  /// Overtime end, e.g. 21:30 (required with --type OT; also --tt)
  #[arg(long = "to-time", alias = "tt")]
  pub to_time: Option<String>,

  /// Overtime type
  #[arg(long = "ot-type", value_enum, default_value_t = OvertimeSubKind::Plan)]
  pub ot_type: OvertimeSubKind,

  /// Reason shown on the request, e.g. "Weekly meeting"
  #[arg(long, default_value = "")]
  pub reason: String,

  /// EZ base URL
  #[arg(long = "base-url", env = "EZ_HOST", default_value = DEFAULT_BASE_URL)]
  pub base_url: String,

  /// Log every HTTP call and state change
  #[arg(short, long)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

/// Validated run configuration handed to the workflow.
pub struct EffectiveConfig {
  pub endpoints: Endpoints,
  pub username: String,
  pub password: Option<String>,
  pub request: RegistrationRequest,
  pub profile_timeout: Duration,
  pub registration_timeout: Duration,
}

impl fmt::Debug for EffectiveConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EffectiveConfig")
      .field("endpoints", &self.endpoints)
      .field("username", &self.username)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .field("request", &self.request)
      .field("profile_timeout", &self.profile_timeout)
      .field("registration_timeout", &self.registration_timeout)
      .finish()
  }
}

fn required(value: Option<String>, flag: &str) -> Result<String> {
  value.ok_or_else(|| EzError::Configuration(format!("{flag} is required")))
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let kind = cli
    .kind
    .ok_or_else(|| EzError::Configuration("--type is required".into()))?;

  let username = required(cli.username, "--username")?.trim().to_string();
  if username.is_empty() {
    return Err(EzError::Configuration("username must not be empty".into()));
  }

  let from = parse_day(&required(cli.from_date, "--from-date")?)?;
  let to = parse_day(&required(cli.to_date, "--to-date")?)?;
  let range = DateRange::new(from, to)?;

  let params = PayloadParams {
    reason: cli.reason,
    from_time: cli.from_time.as_deref().map(parse_clock).transpose()?,
    to_time: cli.to_time.as_deref().map(parse_clock).transpose()?,
    sub_kind: Some(cli.ot_type),
  };
  let request = RegistrationRequest::new(kind, range, params)?;

  Ok(EffectiveConfig {
    endpoints: Endpoints::new(&cli.base_url),
    username,
    password: cli.password,
    request,
    profile_timeout: PROFILE_TIMEOUT,
    registration_timeout: REGISTRATION_TIMEOUT,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use serial_test::serial;

  fn base_cli() -> Cli {
    Cli {
      kind: Some(RequestKind::WorkFromHome),
      username: Some("jane".into()),
      password: Some("pw".into()),
      from_date: Some("2024-09-20".into()),
      to_date: Some("2024-09-22".into()),
      from_time: None,
      to_time: None,
      ot_type: OvertimeSubKind::Plan,
      reason: "Sick".into(),
      base_url: DEFAULT_BASE_URL.into(),
      verbose: false,
      gen_man: false,
    }
  }

  #[test]
  fn normalize_wfh_builds_request() {
    let cfg = normalize(base_cli()).unwrap();
    assert_eq!(cfg.request.kind(), RequestKind::WorkFromHome);
    assert_eq!(cfg.request.range().from(), NaiveDate::from_ymd_opt(2024, 9, 20).unwrap());
    assert_eq!(cfg.request.range().days().len(), 3);
    assert_eq!(cfg.request.params().reason, "Sick");
    assert_eq!(cfg.profile_timeout, Duration::from_secs(3));
    assert_eq!(cfg.registration_timeout, Duration::from_secs(10));
  }

  #[test]
  fn reversed_dates_are_an_invalid_range() {
    let mut cli = base_cli();
    cli.from_date = Some("2024-09-25".into());
    cli.to_date = Some("2024-09-20".into());
    assert!(matches!(normalize(cli), Err(EzError::InvalidRange { .. })));
  }

  #[test]
  fn overtime_needs_both_times() {
    let mut cli = base_cli();
    cli.kind = Some(RequestKind::Overtime);
    cli.from_time = Some("08:00".into());
    assert!(matches!(normalize(cli), Err(EzError::Validation(_))));
  }

  #[test]
  fn overtime_with_times_defaults_to_plan() {
    let mut cli = base_cli();
    cli.kind = Some(RequestKind::Overtime);
    cli.from_time = Some("08:00".into());
    cli.to_time = Some("19:30".into());
    let cfg = normalize(cli).unwrap();
    assert_eq!(cfg.request.params().sub_kind, Some(OvertimeSubKind::Plan));
  }

  #[test]
  fn out_of_office_is_rejected_up_front() {
    let mut cli = base_cli();
    cli.kind = Some(RequestKind::OutOfOffice);
    assert!(matches!(normalize(cli), Err(EzError::Validation(_))));
  }

  #[test]
  fn blank_username_and_bad_formats_are_configuration_errors() {
    let mut cli = base_cli();
    cli.username = Some("  ".into());
    assert!(matches!(normalize(cli), Err(EzError::Configuration(_))));

    let mut cli = base_cli();
    cli.from_date = Some("20-09-2024".into());
    assert!(matches!(normalize(cli), Err(EzError::Configuration(_))));

    let mut cli = base_cli();
    cli.kind = Some(RequestKind::Overtime);
    cli.from_time = Some("8am".into());
    cli.to_time = Some("19:30".into());
    assert!(matches!(normalize(cli), Err(EzError::Configuration(_))));
  }

  #[test]
  fn config_debug_shows_redacted_password() {
    // Cli carries the raw password and has no Debug impl; only the redacting config does.
    let cfg = normalize(base_cli()).unwrap();
    assert!(format!("{cfg:?}").contains("password: Some(\"<redacted>\")"));
  }

  #[test]
  fn debug_output_redacts_password() {
    let cfg = normalize(base_cli()).unwrap();
    let dbg = format!("{cfg:?}");
    assert!(dbg.contains("<redacted>"));
    assert!(!dbg.contains("\"pw\""));
  }

  #[test]
  fn parses_long_type_names_and_short_flags() {
    let cli = Cli::try_parse_from([
      "ez-register",
      "-t",
      "WORK_FROM_HOME",
      "-u",
      "jane",
      "--fd",
      "2024-09-20",
      "--td",
      "2024-09-20",
    ])
    .unwrap();
    assert_eq!(cli.kind, Some(RequestKind::WorkFromHome));
    assert_eq!(cli.ot_type, OvertimeSubKind::Plan);
    assert_eq!(cli.reason, "");
    assert!(cli.password.is_none());
  }

  #[test]
  #[serial]
  fn base_url_comes_from_env() {
    std::env::set_var("EZ_HOST", "http://env.example:1234/");
    let cli = Cli::try_parse_from([
      "ez-register",
      "-t",
      "OT",
      "-u",
      "jane",
      "--from-date",
      "2024-09-20",
      "--to-date",
      "2024-09-20",
      "--from-time",
      "18:00",
      "--to-time",
      "20:00",
      "--ot-type",
      "ADDITIONAL",
    ])
    .unwrap();
    std::env::remove_var("EZ_HOST");

    let cfg = normalize(cli).unwrap();
    assert_eq!(cfg.endpoints.signin, "http://env.example:1234/api/Login/LoginFromWeb");
    assert_eq!(cfg.request.params().sub_kind, Some(OvertimeSubKind::Additional));
  }

  #[test]
  #[serial]
  fn gen_man_needs_no_other_flags() {
    std::env::remove_var("EZ_HOST");
    let cli = Cli::try_parse_from(["ez-register", "--gen-man"]).unwrap();
    assert!(cli.gen_man);
    assert_eq!(cli.base_url, DEFAULT_BASE_URL);
  }
}
