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

use serde::Deserialize;
use serde::Serialize;

/// The user's answer to a review.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Again,
    Hard,
    Good,
    Easy,
}

/// The numeric grade fed to the memory model. `Manual` is reserved for
/// adjustments that do not come from a review.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Grade {
    Manual = 0,
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Response {
    pub const ALL: [Response; 4] = [
        Response::Again,
        Response::Hard,
        Response::Good,
        Response::Easy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Response::Again => "again",
            Response::Hard => "hard",
            Response::Good => "good",
            Response::Easy => "easy",
        }
    }

    /// Parse a response, falling back to `Good` for anything unrecognized so
    /// a bad rating never interrupts a session.
    pub fn parse_lenient(s: &str) -> Response {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" | "forgot" | "1" => Response::Again,
            "hard" | "2" => Response::Hard,
            "good" | "3" => Response::Good,
            "easy" | "4" => Response::Easy,
            other => {
                log::warn!("Unrecognized response {other:?}, treating it as good.");
                Response::Good
            }
        }
    }

    /// Whether the item was recalled.
    pub fn is_success(&self) -> bool {
        !matches!(self, Response::Again)
    }
}

impl Grade {
    /// Lenient conversion from a raw grade value. Out-of-range values become
    /// `Good`.
    pub fn from_value(value: i64) -> Grade {
        match value {
            0 => Grade::Manual,
            1 => Grade::Again,
            2 => Grade::Hard,
            3 => Grade::Good,
            4 => Grade::Easy,
            other => {
                log::warn!("Unrecognized grade {other}, treating it as good.");
                Grade::Good
            }
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

pub fn response_to_grade(response: Response) -> Grade {
    match response {
        Response::Again => Grade::Again,
        Response::Hard => Grade::Hard,
        Response::Good => Grade::Good,
        Response::Easy => Grade::Easy,
    }
}

/// Inverse of [`response_to_grade`]. `Manual` has no review counterpart and
/// maps to `Good`.
pub fn grade_to_response(grade: Grade) -> Response {
    match grade {
        Grade::Again => Response::Again,
        Grade::Hard => Response::Hard,
        Grade::Good => Response::Good,
        Grade::Easy => Response::Easy,
        Grade::Manual => Response::Good,
    }
}

impl From<Response> for Grade {
    fn from(value: Response) -> Self {
        response_to_grade(value)
    }
}

impl From<Grade> for Response {
    fn from(value: Grade) -> Self {
        grade_to_response(value)
    }
}

impl From<Grade> for f64 {
    fn from(value: Grade) -> Self {
        value.value() as f64
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_to_grade() {
        assert_eq!(response_to_grade(Response::Again).value(), 1);
        assert_eq!(response_to_grade(Response::Hard).value(), 2);
        assert_eq!(response_to_grade(Response::Good).value(), 3);
        assert_eq!(response_to_grade(Response::Easy).value(), 4);
    }

    #[test]
    fn test_grade_to_response_inverse() {
        for response in Response::ALL {
            assert_eq!(grade_to_response(response_to_grade(response)), response);
        }
    }

    #[test]
    fn test_manual_grade_maps_to_good() {
        assert_eq!(grade_to_response(Grade::Manual), Response::Good);
    }

    #[test]
    fn test_unknown_grade_value_is_good() {
        assert_eq!(Grade::from_value(17), Grade::Good);
        assert_eq!(Grade::from_value(-3), Grade::Good);
        assert_eq!(Grade::from_value(0), Grade::Manual);
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(Response::parse_lenient("Again"), Response::Again);
        assert_eq!(Response::parse_lenient(" easy "), Response::Easy);
        assert_eq!(Response::parse_lenient("2"), Response::Hard);
        assert_eq!(Response::parse_lenient("meh"), Response::Good);
        assert_eq!(Response::parse_lenient(""), Response::Good);
    }

    #[test]
    fn test_serde_lowercase() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&Response::Hard)?, "\"hard\"");
        let r: Response = serde_json::from_str("\"easy\"")?;
        assert_eq!(r, Response::Easy);
        Ok(())
    }
}
