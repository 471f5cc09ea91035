// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// An instant in time, in UTC.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parse an RFC 3339 string, e.g. `2025-01-01T00:00:00Z`.
    pub fn parse(s: &str) -> Fallible<Self> {
        let ts = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(ts.with_timezone(&Utc)))
    }

    /// Shift this instant by a (possibly fractional) number of days, at
    /// millisecond precision. Non-finite inputs leave the instant unchanged.
    pub fn add_days(self, days: f64) -> Self {
        if !days.is_finite() {
            return self;
        }
        self.add_millis((days * MILLIS_PER_DAY).round() as i64)
    }

    /// Shift this instant by `millis`. Shifts outside the representable range
    /// leave the instant unchanged.
    pub fn add_millis(self, millis: i64) -> Self {
        Duration::try_milliseconds(millis)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map_or(self, Self)
    }

    /// Fractional days elapsed from `earlier` to `self`. Clamped to zero when
    /// `earlier` is in the future.
    pub fn days_since(self, earlier: Timestamp) -> f64 {
        let millis = (self.0 - earlier.0).num_milliseconds() as f64;
        let days = millis / MILLIS_PER_DAY;
        if days.is_finite() && days > 0.0 {
            days
        } else {
            0.0
        }
    }

    /// The first instant of the next UTC day.
    pub fn end_of_day(self) -> Self {
        let date = self.0.date_naive();
        match date.succ_opt().and_then(|d| d.and_hms_opt(0, 0, 0)) {
            Some(midnight) => Self(midnight.and_utc()),
            None => self,
        }
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_days() -> Fallible<()> {
        let ts = Timestamp::parse("2025-01-01T00:00:00Z")?;
        assert_eq!(ts.add_days(1.5), Timestamp::parse("2025-01-02T12:00:00Z")?);
        assert_eq!(ts.add_days(f64::NAN), ts);
        Ok(())
    }

    #[test]
    fn test_out_of_range_shift_is_a_no_op() -> Fallible<()> {
        let ts = Timestamp::parse("2025-01-01T00:00:00Z")?;
        assert_eq!(ts.add_days(-1e300), ts);
        assert_eq!(ts.add_days(1e300), ts);
        assert_eq!(ts.add_millis(i64::MIN), ts);
        Ok(())
    }

    #[test]
    fn test_days_since_clamps() -> Fallible<()> {
        let a = Timestamp::parse("2025-01-01T00:00:00Z")?;
        let b = Timestamp::parse("2025-01-03T00:00:00Z")?;
        assert_eq!(b.days_since(a), 2.0);
        assert_eq!(a.days_since(b), 0.0);
        Ok(())
    }

    #[test]
    fn test_end_of_day() -> Fallible<()> {
        let ts = Timestamp::parse("2025-03-10T17:45:12Z")?;
        assert_eq!(ts.end_of_day(), Timestamp::parse("2025-03-11T00:00:00Z")?);
        Ok(())
    }

    #[test]
    fn test_serde() -> Fallible<()> {
        let ts = Timestamp::parse("2025-01-01T08:30:00Z")?;
        let json = serde_json::to_string(&ts)?;
        let back: Timestamp = serde_json::from_str(&json)?;
        assert_eq!(ts, back);
        Ok(())
    }
}
