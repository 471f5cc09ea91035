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

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::fsrs::DEFAULT_WEIGHTS;
use crate::fsrs::Days;
use crate::fsrs::Stability;
use crate::fsrs::Weights;

/// Scheduler configuration. Any subset of fields can be given in a TOML
/// file; the rest take their defaults.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// The recall probability intervals are computed for.
    pub desired_retention: f64,
    /// The longest interval, in days, a review card can be given.
    pub maximum_interval: Days,
    /// Upper bound on learning and relearning intervals.
    pub max_short_interval: Days,
    /// Lower bound on learning and relearning intervals.
    pub min_short_interval: Days,
    /// A learning card moves to review once a successful review leaves its
    /// stability at or above this.
    pub graduation_stability: Stability,
    /// Multiplier on post-lapse stability for cards already relearning.
    pub relapse_severity: f64,
    /// Post-lapse stability never exceeds this fraction of the prior
    /// stability.
    pub lapse_ceiling: f64,
    pub weights: Weights,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            desired_retention: 0.9,
            maximum_interval: 36500.0,
            max_short_interval: 1.0,
            min_short_interval: 10.0 / 1440.0,
            graduation_stability: 5.0,
            relapse_severity: 1.0,
            lapse_ceiling: 0.9,
            weights: DEFAULT_WEIGHTS,
        }
    }
}

impl Parameters {
    pub fn from_toml(content: &str) -> Fallible<Self> {
        let params: Parameters = toml::from_str(content)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_file(path: &Path) -> Fallible<Self> {
        log::debug!("Loading parameters from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Fallible<()> {
        let r = self.desired_retention;
        if !(r > 0.0 && r < 1.0) {
            return fail(format!("desired_retention must be in (0, 1), got {r}."));
        }
        for (name, value) in [
            ("maximum_interval", self.maximum_interval),
            ("max_short_interval", self.max_short_interval),
            ("min_short_interval", self.min_short_interval),
            ("graduation_stability", self.graduation_stability),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return fail(format!("{name} must be positive, got {value}."));
            }
        }
        if self.maximum_interval < 1.0 {
            return fail("maximum_interval must be at least one day.");
        }
        if self.min_short_interval > self.max_short_interval {
            return fail("min_short_interval is larger than max_short_interval.");
        }
        if self.max_short_interval > self.maximum_interval {
            return fail("max_short_interval is larger than maximum_interval.");
        }
        for (name, value) in [
            ("relapse_severity", self.relapse_severity),
            ("lapse_ceiling", self.lapse_ceiling),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return fail(format!("{name} must be in (0, 1], got {value}."));
            }
        }
        if self.weights.iter().any(|w| !w.is_finite()) {
            return fail("weights must be finite.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_defaults_are_valid() -> Fallible<()> {
        Parameters::default().validate()
    }

    #[test]
    fn test_empty_toml_is_default() -> Fallible<()> {
        assert_eq!(Parameters::from_toml("")?, Parameters::default());
        Ok(())
    }

    #[test]
    fn test_partial_override() -> Fallible<()> {
        let params = Parameters::from_toml("desired_retention = 0.85\nrelapse_severity = 0.5\n")?;
        assert_eq!(params.desired_retention, 0.85);
        assert_eq!(params.relapse_severity, 0.5);
        assert_eq!(params.maximum_interval, 36500.0);
        Ok(())
    }

    #[test]
    fn test_invalid_retention() {
        assert!(Parameters::from_toml("desired_retention = 1.5").is_err());
        assert!(Parameters::from_toml("desired_retention = 0.0").is_err());
    }

    #[test]
    fn test_inverted_short_bounds() {
        let toml = "min_short_interval = 2.0\nmax_short_interval = 1.0\n";
        assert!(Parameters::from_toml(toml).is_err());
    }

    #[test]
    fn test_wrong_type() {
        assert!(Parameters::from_toml("desired_retention = \"high\"").is_err());
    }

    #[test]
    fn test_from_file() -> Fallible<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "graduation_stability = 3.0")?;
        let params = Parameters::from_file(file.path())?;
        assert_eq!(params.graduation_stability, 3.0);
        Ok(())
    }
}
