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

use std::fs::read_to_string;
use std::fs::write;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use serde::Serialize;

use spaced::Card;
use spaced::ErrorReport;
use spaced::Fallible;
use spaced::LegacyRecord;
use spaced::Parameters;
use spaced::QueueLimits;
use spaced::Response;
use spaced::Scheduler;
use spaced::Status;
use spaced::Timestamp;
use spaced::build_queue_indices;
use spaced::fail;
use spaced::get_collection_stats;
use spaced::get_retention;
use spaced::interval_fmt::format_interval;
use spaced::migrate_collection;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML file with scheduler parameters.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print freshly created cards.
    New {
        #[arg(long, default_value_t = 1)]
        count: usize,
        #[arg(long)]
        now: Option<String>,
    },
    /// Review one card of a collection and save the result.
    Review {
        /// Path to the JSON collection.
        file: PathBuf,
        /// Position of the card in the collection.
        #[arg(long)]
        index: usize,
        /// One of again, hard, good, easy.
        #[arg(long)]
        response: String,
        #[arg(long)]
        now: Option<String>,
    },
    /// Print the cards to review now, in order.
    Queue {
        file: PathBuf,
        #[arg(long)]
        now: Option<String>,
        #[arg(long, default_value_t = 20)]
        new_limit: usize,
        #[arg(long, default_value_t = 100)]
        review_limit: usize,
    },
    /// Print collection statistics.
    Stats {
        file: PathBuf,
        #[arg(long)]
        now: Option<String>,
    },
    /// Convert an SM-2 collection into an FSRS collection.
    Migrate {
        input: PathBuf,
        output: PathBuf,
        #[arg(long)]
        now: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli = Cli::parse();
    let output = run(cli)?;
    println!("{output}");
    Ok(())
}

fn run(cli: Cli) -> Fallible<String> {
    let params = match &cli.config {
        Some(path) => Parameters::from_file(path)?,
        None => Parameters::default(),
    };
    let scheduler = Scheduler::new(params);
    match cli.command {
        Command::New { count, now } => {
            let now = parse_now(now)?;
            let cards: Vec<Card> = (0..count).map(|_| scheduler.create_card(now)).collect();
            Ok(serde_json::to_string_pretty(&cards)?)
        }
        Command::Review {
            file,
            index,
            response,
            now,
        } => {
            let now = parse_now(now)?;
            let mut cards = load_collection(&file)?;
            let Some(card) = cards.get(index) else {
                return fail(format!(
                    "no card at index {index}, the collection has {} cards.",
                    cards.len()
                ));
            };
            let response = Response::parse_lenient(&response);
            let outcome = scheduler.review_card(card, response, now);
            cards[index] = outcome.card.clone();
            save_json(&file, &cards)?;
            log::debug!(
                "Card {index} is next due in {}.",
                format_interval(outcome.interval)
            );
            Ok(serde_json::to_string_pretty(&outcome)?)
        }
        Command::Queue {
            file,
            now,
            new_limit,
            review_limit,
        } => {
            let now = parse_now(now)?;
            let cards = load_collection(&file)?;
            let limits = QueueLimits {
                new_cards: new_limit,
                reviews: review_limit,
            };
            let entries: Vec<QueueEntry> = build_queue_indices(&cards, now, limits)
                .into_iter()
                .map(|index| QueueEntry {
                    index,
                    status: cards[index].status,
                    retention: get_retention(&cards[index], now),
                    due: cards[index].due,
                })
                .collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
        Command::Stats { file, now } => {
            let now = parse_now(now)?;
            let cards = load_collection(&file)?;
            let stats = get_collection_stats(&cards, now);
            Ok(serde_json::to_string_pretty(&stats)?)
        }
        Command::Migrate { input, output, now } => {
            let now = parse_now(now)?;
            let content = read_to_string(&input)?;
            let records: Vec<LegacyRecord> = serde_json::from_str(&content)?;
            let cards = migrate_collection(&records, now)?;
            save_json(&output, &cards)?;
            Ok(format!("Migrated {} cards.", cards.len()))
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueueEntry {
    index: usize,
    status: Status,
    retention: f64,
    due: Timestamp,
}

fn parse_now(now: Option<String>) -> Fallible<Timestamp> {
    match now {
        Some(s) => Timestamp::parse(&s),
        None => Ok(Timestamp::now()),
    }
}

fn load_collection(path: &Path) -> Fallible<Vec<Card>> {
    if !path.exists() {
        return fail(format!("{} does not exist.", path.display()));
    }
    let content = read_to_string(path)?;
    let cards: Vec<Card> = serde_json::from_str(&content)?;
    log::debug!("Loaded {} cards from {}.", cards.len(), path.display());
    Ok(cards)
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Fallible<()> {
    let json = serde_json::to_string_pretty(value)?;
    write(path, json).map_err(|e| ErrorReport::new(format!("writing {}: {e}", path.display())))
}
