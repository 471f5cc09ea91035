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

use serde::Deserialize;
use serde::Serialize;

use crate::types::timestamp::Timestamp;

/// The SM-2 ease factor of a fresh card.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// The SM-2 ease factor floor.
pub const MIN_EASE_FACTOR: f64 = 1.3;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyStatus {
    New,
    Learning,
    Review,
    Graduated,
}

impl LegacyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegacyStatus::New => "new",
            LegacyStatus::Learning => "learning",
            LegacyStatus::Review => "review",
            LegacyStatus::Graduated => "graduated",
        }
    }
}

impl TryFrom<&str> for LegacyStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "new" => Ok(LegacyStatus::New),
            "learning" => Ok(LegacyStatus::Learning),
            "review" => Ok(LegacyStatus::Review),
            "graduated" => Ok(LegacyStatus::Graduated),
            _ => Err(format!("unknown status {value:?}")),
        }
    }
}

/// Scheduling state under the SM-2 algorithm.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCard {
    pub ease_factor: f64,
    /// Current interval in days.
    pub interval: u32,
    /// Consecutive successful reviews. Reset by `again`.
    pub repetitions: u32,
    pub status: LegacyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<Timestamp>,
}

/// A legacy card as found in storage, before validation. Every field is
/// optional so that a missing one can be reported instead of defaulted.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRecord {
    pub ease_factor: Option<f64>,
    pub interval: Option<i64>,
    pub repetitions: Option<i64>,
    pub status: Option<String>,
    pub due: Option<Timestamp>,
}

impl From<&LegacyCard> for LegacyRecord {
    fn from(card: &LegacyCard) -> Self {
        Self {
            ease_factor: Some(card.ease_factor),
            interval: Some(card.interval as i64),
            repetitions: Some(card.repetitions as i64),
            status: Some(card.status.as_str().to_string()),
            due: card.due,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_try_from() {
        assert_eq!(LegacyStatus::try_from("graduated"), Ok(LegacyStatus::Graduated));
        assert!(LegacyStatus::try_from("retired").is_err());
    }

    #[test]
    fn test_record_with_missing_fields() -> Result<(), serde_json::Error> {
        let record: LegacyRecord = serde_json::from_str(r#"{"easeFactor": 2.1}"#)?;
        assert_eq!(record.ease_factor, Some(2.1));
        assert_eq!(record.interval, None);
        assert_eq!(record.status, None);
        Ok(())
    }
}
