// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Expand an inclusive (from, to) calendar-day pair into the ordered days that drive one submission each
// role: model/dates
// inputs: Two NaiveDate values parsed from --from-date / --to-date
// outputs: DateRange (validated), DateSequence (ascending, contiguous), EZ date stamps
// invariants:
// - from <= to, otherwise InvalidRange; no sequence is ever produced for a reversed pair
// - expand(from, to).len() == (to - from).days + 1
// - No weekend/holiday skipping and no deduplication
// errors: InvalidRange only
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::error::{EzError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
  from: NaiveDate,
  to: NaiveDate,
}

impl DateRange {
  pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
    if from > to {
      return Err(EzError::InvalidRange { from, to });
    }
    Ok(Self { from, to })
  }

  pub fn from(&self) -> NaiveDate {
    self.from
  }

  pub fn to(&self) -> NaiveDate {
    self.to
  }

  pub fn days(&self) -> DateSequence {
    let span = (self.to - self.from).num_days();
    let days = (0..=span).map(|offset| self.from + Duration::days(offset)).collect();
    DateSequence { days }
  }
}

/// Calendar days in ascending order, one per registration call.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DateSequence {
  days: Vec<NaiveDate>,
}

impl DateSequence {
  pub fn len(&self) -> usize {
    self.days.len()
  }

  pub fn first(&self) -> Option<NaiveDate> {
    self.days.first().copied()
  }

  pub fn last(&self) -> Option<NaiveDate> {
    self.days.last().copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
    self.days.iter().copied()
  }
}

pub fn expand(from: NaiveDate, to: NaiveDate) -> Result<DateSequence> {
  Ok(DateRange::new(from, to)?.days())
}

pub fn parse_day(raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
    .map_err(|_| EzError::Configuration(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

/// Midnight ISO-8601 instant with the `.000Z` suffix EZ expects, e.g. `2024-09-20T00:00:00.000Z`.
pub fn ez_stamp(day: NaiveDate) -> String {
  format!("{}.000Z", day.and_time(NaiveTime::MIN).format("%Y-%m-%dT%H:%M:%S"))
}
