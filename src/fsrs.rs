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

//! The FSRS-5 memory model: pure functions of difficulty, stability and
//! retrievability.

use crate::types::response::Grade;

/// Probability of recall, in [0, 1].
pub type Retrievability = f64;

/// Days for retrievability to decay from 1.0 to 0.9.
pub type Stability = f64;

/// In [MIN_DIFFICULTY, MAX_DIFFICULTY].
pub type Difficulty = f64;

/// Time in days.
pub type Days = f64;

pub type Weights = [f64; 19];

/// Reference FSRS-5 weights.
pub const DEFAULT_WEIGHTS: Weights = [
    0.40255, 1.18385, 3.173, 15.69105, 7.1949, 0.5345, 1.4604, 0.0046, 1.54575, 0.1192, 1.01925,
    1.9395, 0.11, 0.29605, 2.2698, 0.2315, 2.9898, 0.51655, 0.6621,
];

pub const MIN_DIFFICULTY: Difficulty = 1.0;
pub const MAX_DIFFICULTY: Difficulty = 10.0;
pub const MIN_STABILITY: Stability = 0.01;

const F: f64 = 19.0 / 81.0;
const C: f64 = -0.5;

/// The forgetting curve. Equals 1.0 at `t = 0`.
pub fn retrievability(t: Days, s: Stability) -> Retrievability {
    let s = s.max(MIN_STABILITY);
    let t = if t.is_finite() { t.max(0.0) } else { 0.0 };
    (1.0 + F * (t / s)).powf(C).clamp(0.0, 1.0)
}

/// The inverse of the forgetting curve: days until retrievability decays to
/// `r_d`.
pub fn interval(r_d: Retrievability, s: Stability) -> Days {
    (s / F) * (r_d.powf(1.0 / C) - 1.0)
}

pub fn initial_stability(w: &Weights, g: Grade) -> Stability {
    let s = match g {
        Grade::Again => w[0],
        Grade::Hard => w[1],
        Grade::Good | Grade::Manual => w[2],
        Grade::Easy => w[3],
    };
    s.max(MIN_STABILITY)
}

pub fn initial_difficulty(w: &Weights, g: Grade) -> Difficulty {
    clamp_d(raw_initial_difficulty(w, g))
}

fn raw_initial_difficulty(w: &Weights, g: Grade) -> Difficulty {
    let g: f64 = effective(g).into();
    w[4] - f64::exp(w[5] * (g - 1.0)) + 1.0
}

/// Difficulty after a review: a linearly damped step, mean-reverted towards
/// the initial difficulty of an `Easy` first review. `Again` and `Hard` never
/// lower difficulty and `Easy` never raises it, even where the reversion
/// would pull the other way near the bounds.
pub fn new_difficulty(w: &Weights, d: Difficulty, g: Grade) -> Difficulty {
    let target = raw_initial_difficulty(w, Grade::Easy);
    let next = w[7] * target + (1.0 - w[7]) * damped(w, d, g);
    let next = match effective(g) {
        Grade::Again | Grade::Hard => next.max(d),
        Grade::Easy => next.min(d),
        Grade::Good | Grade::Manual => next,
    };
    clamp_d(next)
}

fn damped(w: &Weights, d: Difficulty, g: Grade) -> Difficulty {
    let g: f64 = effective(g).into();
    let delta = -w[6] * (g - 3.0);
    d + delta * ((10.0 - d) / 9.0)
}

/// Stability after a successful recall. Never smaller than `s`.
pub fn stability_after_success(
    w: &Weights,
    d: Difficulty,
    s: Stability,
    r: Retrievability,
    g: Grade,
) -> Stability {
    let t_d = 11.0 - d;
    let t_s = s.powf(-w[9]);
    let t_r = f64::exp(w[10] * (1.0 - r)) - 1.0;
    let h = if g == Grade::Hard { w[15] } else { 1.0 };
    let b = if g == Grade::Easy { w[16] } else { 1.0 };
    let c = f64::exp(w[8]);
    let alpha = 1.0 + t_d * t_s * t_r * h * b * c;
    s * alpha.max(1.0)
}

/// Stability after a lapse, before any ceiling is applied.
pub fn stability_after_lapse(
    w: &Weights,
    d: Difficulty,
    s: Stability,
    r: Retrievability,
) -> Stability {
    let d_f = d.powf(-w[12]);
    let s_f = (s + 1.0).powf(w[13]) - 1.0;
    let r_f = f64::exp(w[14] * (1.0 - r));
    let c_f = w[11];
    (d_f * s_f * r_f * c_f).max(MIN_STABILITY)
}

fn effective(g: Grade) -> Grade {
    match g {
        Grade::Manual => Grade::Good,
        other => other,
    }
}

fn clamp_d(d: Difficulty) -> Difficulty {
    d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}
