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

//! spaced: a deterministic spaced repetition scheduling engine.
//!
//! - FSRS (Free Spaced Repetition Scheduler) reviews and retention
//! - The legacy SM-2 scheduler, and migration from it
//! - Priority-ordered review queues
//! - Collection statistics
//!
//! Cards are plain values. No operation performs I/O or keeps state between
//! calls; the current time is always passed in.

pub mod error;
pub mod fsrs;
pub mod interval_fmt;
pub mod migrate;
pub mod params;
pub mod queue;
pub mod scheduler;
pub mod sm2;
pub mod stats;
pub mod types;

pub use error::{ErrorReport, Fallible, fail};
pub use migrate::{MigrationError, migrate_collection, migrate_from_sm2, migrate_record};
pub use params::Parameters;
pub use queue::{
    QueueLimits, build_queue, build_queue_indices, due_cards, is_eligible, priority_order,
    sort_by_review_priority,
};
pub use scheduler::{ReviewOutcome, Scheduler, get_retention, is_due};
pub use stats::{Stats, get_collection_stats};
pub use types::card::{Card, Status};
pub use types::legacy_card::{LegacyCard, LegacyRecord, LegacyStatus};
pub use types::response::{Grade, Response, grade_to_response, response_to_grade};
pub use types::timestamp::Timestamp;
