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

//! One-way conversion of SM-2 cards into FSRS cards.
//!
//! Unlike reviews, migration never substitutes defaults: a record with a
//! missing or invalid field is an error, since guessing would corrupt the
//! user's history.

use thiserror::Error;

use crate::fsrs::Difficulty;
use crate::fsrs::MAX_DIFFICULTY;
use crate::fsrs::MIN_DIFFICULTY;
use crate::fsrs::Stability;
use crate::types::card::Card;
use crate::types::card::Status;
use crate::types::legacy_card::LegacyCard;
use crate::types::legacy_card::LegacyRecord;
use crate::types::legacy_card::LegacyStatus;
use crate::types::legacy_card::MIN_EASE_FACTOR;
use crate::types::timestamp::Timestamp;

/// Stability given to legacy cards with a zero-day interval.
pub const MIN_MIGRATED_STABILITY: Stability = 0.1;

/// The ease factor mapped to the lowest difficulty.
const MAX_MAPPED_EASE: f64 = 3.0;

#[derive(Debug, Error, PartialEq)]
pub enum MigrationError {
    #[error("{} is missing required field `{field}`", describe(.index))]
    MissingField {
        index: Option<usize>,
        field: &'static str,
    },
    #[error("{} has invalid `{field}`: {reason}", describe(.index))]
    InvalidField {
        index: Option<usize>,
        field: &'static str,
        reason: String,
    },
}

fn describe(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!("legacy card #{i}"),
        None => "legacy card".to_string(),
    }
}

impl MigrationError {
    fn at(self, i: usize) -> Self {
        match self {
            MigrationError::MissingField { field, .. } => MigrationError::MissingField {
                index: Some(i),
                field,
            },
            MigrationError::InvalidField { field, reason, .. } => MigrationError::InvalidField {
                index: Some(i),
                field,
                reason,
            },
        }
    }
}

impl TryFrom<&LegacyRecord> for LegacyCard {
    type Error = MigrationError;

    fn try_from(record: &LegacyRecord) -> Result<Self, Self::Error> {
        let ease_factor = record.ease_factor.ok_or(MigrationError::MissingField {
            index: None,
            field: "easeFactor",
        })?;
        let interval = record.interval.ok_or(MigrationError::MissingField {
            index: None,
            field: "interval",
        })?;
        let repetitions = record.repetitions.ok_or(MigrationError::MissingField {
            index: None,
            field: "repetitions",
        })?;
        let status = record.status.as_deref().ok_or(MigrationError::MissingField {
            index: None,
            field: "status",
        })?;
        let status = LegacyStatus::try_from(status).map_err(|reason| MigrationError::InvalidField {
            index: None,
            field: "status",
            reason,
        })?;
        let interval = u32::try_from(interval).map_err(|_| MigrationError::InvalidField {
            index: None,
            field: "interval",
            reason: format!("{interval} is not a valid number of days"),
        })?;
        let repetitions = u32::try_from(repetitions).map_err(|_| MigrationError::InvalidField {
            index: None,
            field: "repetitions",
            reason: format!("{repetitions} is not a valid count"),
        })?;
        let card = LegacyCard {
            ease_factor,
            interval,
            repetitions,
            status,
            due: record.due,
        };
        validate(&card)?;
        Ok(card)
    }
}

fn validate(card: &LegacyCard) -> Result<(), MigrationError> {
    let ef = card.ease_factor;
    if !ef.is_finite() || ef < MIN_EASE_FACTOR {
        return Err(MigrationError::InvalidField {
            index: None,
            field: "easeFactor",
            reason: format!("{ef} is below the SM-2 floor of {MIN_EASE_FACTOR}"),
        });
    }
    Ok(())
}

/// Higher ease means lower difficulty: 1.3 maps to 10, 3.0 and above to 1.
pub fn ease_to_difficulty(ease_factor: f64) -> Difficulty {
    let span = MAX_MAPPED_EASE - MIN_EASE_FACTOR;
    let t = (ease_factor - MIN_EASE_FACTOR) / span;
    (MAX_DIFFICULTY - t * (MAX_DIFFICULTY - MIN_DIFFICULTY)).clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

fn map_status(status: LegacyStatus) -> Status {
    match status {
        LegacyStatus::New => Status::New,
        LegacyStatus::Learning => Status::Learning,
        LegacyStatus::Review | LegacyStatus::Graduated => Status::Review,
    }
}

/// Convert a legacy card. Repetitions carry over as `reps`; lapses were never
/// tracked and start at zero.
pub fn migrate_from_sm2(legacy: &LegacyCard, now: Timestamp) -> Result<Card, MigrationError> {
    validate(legacy)?;
    let stability = (legacy.interval as f64).max(MIN_MIGRATED_STABILITY);
    let difficulty = ease_to_difficulty(legacy.ease_factor);
    let scheduled_days = legacy.interval as f64;
    let due = match legacy.due {
        Some(due) => due,
        None => {
            log::debug!(
                "Legacy card has no due date, scheduling {} days from now.",
                legacy.interval
            );
            now.add_days(scheduled_days)
        }
    };
    log::debug!(
        "Migrated legacy card: EF={:.2} -> D={difficulty:.2}, interval={} -> S={stability:.2}",
        legacy.ease_factor,
        legacy.interval
    );
    Ok(Card {
        due,
        stability,
        difficulty,
        elapsed_days: 0.0,
        scheduled_days,
        reps: legacy.repetitions,
        lapses: 0,
        status: map_status(legacy.status),
        last_review: None,
    })
}

/// Validate and convert a raw stored record.
pub fn migrate_record(record: &LegacyRecord, now: Timestamp) -> Result<Card, MigrationError> {
    let legacy = LegacyCard::try_from(record)?;
    migrate_from_sm2(&legacy, now)
}

/// Convert a whole collection. Fails on the first bad record, reporting its
/// position, and returns nothing in that case.
pub fn migrate_collection(
    records: &[LegacyRecord],
    now: Timestamp,
) -> Result<Vec<Card>, MigrationError> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| migrate_record(record, now).map_err(|e| e.at(i)))
        .collect()
}
