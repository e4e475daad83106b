// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Request kinds and the exact JSON bodies EZ expects for one overtime or work-from-home day
// role: model/payload
// inputs: RequestKind, PayloadParams (reason, optional time window, optional OT sub-kind), user id, calendar day
// outputs: Payload (serializes to the RegisterOT / RegisterMission body shape)
// side_effects: None; building is pure
// invariants:
// - Overtime requires both time-window ends; otherwise Validation before any network call
// - From and To carry the same day stamp (one request per day, not a start/end pair)
// - UserRequest is exactly [user_id]; NotifyEmail is always empty
// - Every match over RequestKind is exhaustive; OOO has no payload and is rejected explicitly
// errors: Validation
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use clap::ValueEnum;
use serde::Serialize;

use crate::dates::{ez_stamp, DateRange};
use crate::error::{EzError, Result};

pub const TIME_FORMAT: &str = "%H:%M";

/// EZ's "mission" category code for working from home.
const WFH_CATEGORY: u8 = 6;
const WFH_NOMINAL_TIME: &str = "08:00:00";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RequestKind {
  #[value(name = "OT", alias = "OVER_TIME")]
  Overtime,
  #[value(name = "WFH", alias = "WORK_FROM_HOME")]
  WorkFromHome,
  #[value(name = "OOO", alias = "OUT_OF_OFFICE")]
  OutOfOffice,
}

impl fmt::Display for RequestKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      RequestKind::Overtime => "OT",
      RequestKind::WorkFromHome => "WFH",
      RequestKind::OutOfOffice => "OOO",
    };
    f.write_str(label)
  }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OvertimeSubKind {
  #[default]
  #[value(name = "PLAN")]
  Plan,
  #[value(name = "ADDITIONAL")]
  Additional,
}

impl OvertimeSubKind {
  pub fn code(self) -> u8 {
    match self {
      OvertimeSubKind::Plan => 1,
      OvertimeSubKind::Additional => 0,
    }
  }
}

/// Raised wherever a kind has no registration handler.
pub fn unsupported_kind(kind: RequestKind) -> EzError {
  EzError::Validation(format!(
    "{kind} registration is not supported by this tool; use OT or WFH"
  ))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeWindow {
  pub from: NaiveTime,
  pub to: NaiveTime,
}

impl TimeWindow {
  pub fn from_parts(from: Option<NaiveTime>, to: Option<NaiveTime>) -> Result<Self> {
    match (from, to) {
      (Some(from), Some(to)) => Ok(Self { from, to }),
      (None, _) => Err(EzError::Validation("OT requires --from-time".into())),
      (_, None) => Err(EzError::Validation("OT requires --to-time".into())),
    }
  }
}

pub fn parse_clock(raw: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT)
    .map_err(|_| EzError::Configuration(format!("invalid time '{raw}', expected HH:MM")))
}

fn ez_clock(t: NaiveTime) -> String {
  t.format("%H:%M:00").to_string()
}

/// User-supplied knobs shared by every day of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PayloadParams {
  pub reason: String,
  pub from_time: Option<NaiveTime>,
  pub to_time: Option<NaiveTime>,
  pub sub_kind: Option<OvertimeSubKind>,
}

/// Validated, immutable description of one run.
#[derive(Clone, Debug)]
pub struct RegistrationRequest {
  kind: RequestKind,
  range: DateRange,
  params: PayloadParams,
}

impl RegistrationRequest {
  pub fn new(kind: RequestKind, range: DateRange, params: PayloadParams) -> Result<Self> {
    match kind {
      RequestKind::Overtime => {
        TimeWindow::from_parts(params.from_time, params.to_time)?;
      }
      RequestKind::WorkFromHome => {}
      RequestKind::OutOfOffice => return Err(unsupported_kind(kind)),
    }
    Ok(Self { kind, range, params })
  }

  pub fn kind(&self) -> RequestKind {
    self.kind
  }

  pub fn range(&self) -> DateRange {
    self.range
  }

  pub fn params(&self) -> &PayloadParams {
    &self.params
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OvertimeSlot {
  pub from_time: String,
  pub to_time: String,
  pub is_tomorrow_from_time: bool,
  pub is_tomorrow_to_time: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OvertimeReason {
  pub group_reason: Option<String>,
  pub detail_reason: Option<String>,
  #[serde(rename = "NoteOT")]
  pub note_ot: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OvertimePayload {
  #[serde(rename = "Type")]
  pub kind: &'static str,
  pub ghi_chu: String,
  pub ca_dau: u8,
  pub ca_giua: u8,
  pub ca_cuoi: u8,
  #[serde(rename = "ReasonOT")]
  pub reason_ot: String,
  pub khoang1: OvertimeSlot,
  pub khoang2: Option<OvertimeSlot>,
  pub khoang3: Option<OvertimeSlot>,
  #[serde(rename = "OTIndex1")]
  pub ot_index1: u8,
  #[serde(rename = "OTIndex2")]
  pub ot_index2: u8,
  #[serde(rename = "OTIndex3")]
  pub ot_index3: u8,
  #[serde(rename = "OTExamineFor1")]
  pub ot_examine_for1: u8,
  #[serde(rename = "OTExamineFor2")]
  pub ot_examine_for2: u8,
  #[serde(rename = "OTExamineFor3")]
  pub ot_examine_for3: u8,
  pub scale_for_salary1: u8,
  pub scale_for_salary2: u8,
  pub scale_for_salary3: u8,
  pub working_place: String,
  pub notify_email: Vec<String>,
  pub user_request: Vec<String>,
  #[serde(rename = "OTType")]
  pub ot_type: u8,
  pub reason1: OvertimeReason,
  pub reason2: OvertimeReason,
  pub reason3: OvertimeReason,
  pub from: String,
  pub to: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkFromHomePayload {
  #[serde(rename = "Type")]
  pub kind: &'static str,
  pub nhom_phu_cap: Option<String>,
  pub is_tomorrow_from_time: bool,
  pub is_tomorrow_to_time: bool,
  pub from_time: String,
  pub to_time: String,
  #[serde(rename = "CTPhi")]
  pub ct_phi: String,
  pub distance: u32,
  pub phuong_tien_di_chuyen: String,
  pub loai_cong_tac: u8,
  pub ghi_chu: String,
  pub ly_do: String,
  pub ten_cty: String,
  #[serde(rename = "DiaChiCT")]
  pub dia_chi_ct: String,
  pub nguoi_lien_he: String,
  pub thong_tin_lien_lac: String,
  pub notify_email: Vec<String>,
  pub user_request: Vec<String>,
  pub from: String,
  pub to: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
  Overtime(OvertimePayload),
  WorkFromHome(WorkFromHomePayload),
}

pub fn build_overtime(params: &PayloadParams, user_id: &str, day: NaiveDate) -> Result<OvertimePayload> {
  let window = TimeWindow::from_parts(params.from_time, params.to_time)?;
  let stamp = ez_stamp(day);

  Ok(OvertimePayload {
    kind: "Period",
    ghi_chu: String::new(),
    ca_dau: 0,
    ca_giua: 0,
    ca_cuoi: 0,
    reason_ot: params.reason.clone(),
    khoang1: OvertimeSlot {
      from_time: ez_clock(window.from),
      to_time: ez_clock(window.to),
      is_tomorrow_from_time: false,
      is_tomorrow_to_time: false,
    },
    khoang2: None,
    khoang3: None,
    ot_index1: 0,
    ot_index2: 0,
    ot_index3: 0,
    ot_examine_for1: 0,
    ot_examine_for2: 0,
    ot_examine_for3: 0,
    scale_for_salary1: 0,
    scale_for_salary2: 0,
    scale_for_salary3: 0,
    working_place: "1".into(),
    notify_email: Vec::new(),
    user_request: vec![user_id.to_string()],
    ot_type: params.sub_kind.unwrap_or_default().code(),
    reason1: OvertimeReason::default(),
    reason2: OvertimeReason::default(),
    reason3: OvertimeReason::default(),
    from: stamp.clone(),
    to: stamp,
  })
}

pub fn build_work_from_home(params: &PayloadParams, user_id: &str, day: NaiveDate) -> WorkFromHomePayload {
  let stamp = ez_stamp(day);

  WorkFromHomePayload {
    kind: "day",
    nhom_phu_cap: None,
    is_tomorrow_from_time: false,
    is_tomorrow_to_time: false,
    from_time: WFH_NOMINAL_TIME.into(),
    to_time: WFH_NOMINAL_TIME.into(),
    ct_phi: String::new(),
    distance: 0,
    phuong_tien_di_chuyen: String::new(),
    loai_cong_tac: WFH_CATEGORY,
    ghi_chu: String::new(),
    ly_do: params.reason.clone(),
    ten_cty: String::new(),
    dia_chi_ct: String::new(),
    nguoi_lien_he: String::new(),
    thong_tin_lien_lac: String::new(),
    notify_email: Vec::new(),
    user_request: vec![user_id.to_string()],
    from: stamp.clone(),
    to: stamp,
  }
}

/// Build the body for one day of the given kind.
pub fn build(kind: RequestKind, params: &PayloadParams, user_id: &str, day: NaiveDate) -> Result<Payload> {
  match kind {
    RequestKind::Overtime => build_overtime(params, user_id, day).map(Payload::Overtime),
    RequestKind::WorkFromHome => Ok(Payload::WorkFromHome(build_work_from_home(params, user_id, day))),
    RequestKind::OutOfOffice => Err(unsupported_kind(kind)),
  }
}
