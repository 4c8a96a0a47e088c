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
use std::path::Path;

use serde::Deserialize;

use crate::enrich::client::DICTIONARY_API_URL;
use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::OutOfRangeError;
use crate::scheduler::SchedulerConfig;

/// Process configuration, loaded from an optional TOML file. Every
/// section and field has a default, so an empty (or absent) file is
/// valid.
#[derive(Deserialize, Default, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scheduler: SchedulerSection,
    pub enrichment: EnrichmentSection,
    pub server: ServerSection,
}

#[derive(Deserialize, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerSection {
    pub base_ef_increment: f64,
    pub quality_penalty_base: f64,
    pub quality_penalty_factor: f64,
    pub max_quality: u8,
    pub min_ef: f64,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            base_ef_increment: 0.1,
            quality_penalty_base: 0.08,
            quality_penalty_factor: 0.02,
            max_quality: 5,
            min_ef: 1.3,
        }
    }
}

impl SchedulerSection {
    /// Validate the tunables. An out-of-range value is fatal to startup.
    pub fn build(&self) -> Result<SchedulerConfig, OutOfRangeError> {
        SchedulerConfig::new(
            self.base_ef_increment,
            self.quality_penalty_base,
            self.quality_penalty_factor,
            self.max_quality,
            self.min_ef,
        )
    }
}

#[derive(Deserialize, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct EnrichmentSection {
    /// Base URL of the dictionary provider; the word is appended.
    pub api_url: String,
    /// Upper bound on a single lookup, in seconds.
    pub timeout_secs: u64,
    /// Cap on definitions kept per part of speech.
    pub max_definitions: usize,
    /// Ease factor assigned to newly created cards.
    pub initial_ease_factor: f64,
}

impl Default for EnrichmentSection {
    fn default() -> Self {
        Self {
            api_url: DICTIONARY_API_URL.to_string(),
            timeout_secs: 10,
            max_definitions: 2,
            initial_ease_factor: 1.3,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Load configuration from the given file, or the defaults when no file
/// is given.
pub fn load(path: Option<&str>) -> Fallible<Config> {
    match path {
        Some(path) => {
            if !Path::new(path).exists() {
                return fail("config file does not exist.");
            }
            let content = read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = load(None).unwrap();
        assert_eq!(config.enrichment.api_url, DICTIONARY_API_URL);
        assert_eq!(config.enrichment.max_definitions, 2);
        assert_eq!(config.server.bind, "0.0.0.0:8000");
        assert!(config.scheduler.build().is_ok());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [enrichment]
            max_definitions = 4

            [scheduler]
            min_ef = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.enrichment.max_definitions, 4);
        assert_eq!(config.enrichment.timeout_secs, 10);
        let scheduler = config.scheduler.build().unwrap();
        assert_eq!(scheduler.min_ef(), 1.5);
    }

    #[test]
    fn test_out_of_range_tunable_fails_at_build() {
        let config: Config = toml::from_str(
            r#"
            [scheduler]
            min_ef = 5.0
            "#,
        )
        .unwrap();
        let err = config.scheduler.build().err().unwrap();
        assert_eq!(err.param, "min_ef");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load(Some("./no-such-config.toml"));
        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.to_string(), "error: config file does not exist.");
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [scheduler]
            minimum_ease = 1.5
            "#,
        );
        assert!(result.is_err());
    }
}
