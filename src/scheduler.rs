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

//! SM2-style spaced repetition scheduling.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::types::card::SchedulingState;
use crate::types::timestamp::Timestamp;

/// A feedback grade below this is a failed recall.
const FAILURE_THRESHOLD: u8 = 3;

const DEFAULT_BASE_EF_INCREMENT: f64 = 0.1;
const DEFAULT_QUALITY_PENALTY_BASE: f64 = 0.08;
const DEFAULT_QUALITY_PENALTY_FACTOR: f64 = 0.02;
const DEFAULT_MAX_QUALITY: u8 = 5;
const DEFAULT_MIN_EF: f64 = 1.3;

/// A scheduler tunable was outside its allowed range. Fatal at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct OutOfRangeError {
    pub param: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl Display for OutOfRangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid value for {}: {}. Expected value should be in {} - {} range.",
            self.param, self.value, self.min, self.max
        )
    }
}

impl Error for OutOfRangeError {}

/// Tunable constants of the scheduling algorithm. Validated at
/// construction and immutable afterwards.
#[derive(Clone, Copy, Debug)]
pub struct SchedulerConfig {
    /// Ease factor gain on a perfect review.
    base_ef_increment: f64,
    /// Base ease factor penalty per quality point below the maximum.
    quality_penalty_base: f64,
    /// Scales the penalty quadratically with low quality.
    quality_penalty_factor: f64,
    /// Highest feedback grade a caller may submit.
    max_quality: u8,
    /// Floor for the ease factor.
    min_ef: f64,
}

impl SchedulerConfig {
    pub fn new(
        base_ef_increment: f64,
        quality_penalty_base: f64,
        quality_penalty_factor: f64,
        max_quality: u8,
        min_ef: f64,
    ) -> Result<Self, OutOfRangeError> {
        if !(base_ef_increment > 0.0 && base_ef_increment <= 1.0) {
            return Err(OutOfRangeError {
                param: "base_ef_increment",
                value: base_ef_increment,
                min: 0.0,
                max: 1.0,
            });
        }
        if !(0.0..=0.5).contains(&quality_penalty_base) {
            return Err(OutOfRangeError {
                param: "quality_penalty_base",
                value: quality_penalty_base,
                min: 0.0,
                max: 0.5,
            });
        }
        if !(0.0..=0.1).contains(&quality_penalty_factor) {
            return Err(OutOfRangeError {
                param: "quality_penalty_factor",
                value: quality_penalty_factor,
                min: 0.0,
                max: 0.1,
            });
        }
        if !(1..=10).contains(&max_quality) {
            return Err(OutOfRangeError {
                param: "max_quality",
                value: f64::from(max_quality),
                min: 1.0,
                max: 10.0,
            });
        }
        if !(1.0..=2.0).contains(&min_ef) {
            return Err(OutOfRangeError {
                param: "min_ef",
                value: min_ef,
                min: 1.0,
                max: 2.0,
            });
        }
        Ok(Self {
            base_ef_increment,
            quality_penalty_base,
            quality_penalty_factor,
            max_quality,
            min_ef,
        })
    }

    /// The standard tunables of the original algorithm.
    pub fn standard() -> Self {
        Self {
            base_ef_increment: DEFAULT_BASE_EF_INCREMENT,
            quality_penalty_base: DEFAULT_QUALITY_PENALTY_BASE,
            quality_penalty_factor: DEFAULT_QUALITY_PENALTY_FACTOR,
            max_quality: DEFAULT_MAX_QUALITY,
            min_ef: DEFAULT_MIN_EF,
        }
    }

    pub fn max_quality(&self) -> u8 {
        self.max_quality
    }

    #[cfg(test)]
    pub fn min_ef(&self) -> f64 {
        self.min_ef
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Compute the next scheduling state of a card from its current state and
/// a feedback grade.
///
/// Pure and deterministic given `now`. Callers must reject `quality`
/// outside `0..=max_quality` before calling; within that range this never
/// fails.
///
/// The interval is kept fractional for the next multiplication; it is
/// rounded (half away from zero) to whole days only for the due date.
pub fn compute(
    repetitions: u32,
    interval: f64,
    ease_factor: f64,
    quality: u8,
    config: &SchedulerConfig,
    now: Timestamp,
) -> SchedulingState {
    let (repetitions, interval) = if quality < FAILURE_THRESHOLD {
        (0, 1.0)
    } else {
        let interval = match repetitions {
            0 => 1.0,
            1 => 3.0,
            _ => interval * ease_factor,
        };
        (repetitions + 1, interval)
    };

    let shortfall = f64::from(config.max_quality - quality);
    let penalty = shortfall * (config.quality_penalty_base + shortfall * config.quality_penalty_factor);
    let ease_factor = (ease_factor + config.base_ef_increment - penalty).max(config.min_ef);

    let due_date = now.add_days(interval.round() as i64);

    SchedulingState {
        quality,
        ease_factor,
        repetitions,
        interval,
        due_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SchedulerConfig {
        SchedulerConfig::standard()
    }

    #[test]
    fn test_failure_resets_repetitions_and_interval() {
        let now = Timestamp::now();
        for quality in 0..3 {
            let state = compute(7, 42.0, 2.5, quality, &config(), now);
            assert_eq!(state.repetitions, 0);
            assert_eq!(state.interval, 1.0);
            assert_eq!(state.due_date, now.add_days(1));
        }
    }

    #[test]
    fn test_failure_decreases_ease_factor() {
        let now = Timestamp::now();
        let state = compute(3, 10.0, 2.5, 0, &config(), now);
        // 2.5 + 0.1 - 5 * (0.08 + 5 * 0.02) = 1.7
        assert!((state.ease_factor - 1.7).abs() < 1e-9);
        assert!(state.ease_factor < 2.5);
    }

    #[test]
    fn test_ease_factor_never_below_minimum() {
        let now = Timestamp::now();
        for quality in 0..=5 {
            let state = compute(0, 1.0, 1.3, quality, &config(), now);
            assert!(state.ease_factor >= config().min_ef());
        }
    }

    #[test]
    fn test_first_success() {
        let now = Timestamp::now();
        let state = compute(0, 1.0, 2.5, 4, &config(), now);
        assert_eq!(state.repetitions, 1);
        assert_eq!(state.interval, 1.0);
        assert_eq!(state.due_date, now.add_days(1));
    }

    #[test]
    fn test_second_success() {
        let now = Timestamp::now();
        let state = compute(1, 1.0, 2.5, 4, &config(), now);
        assert_eq!(state.repetitions, 2);
        assert_eq!(state.interval, 3.0);
        assert_eq!(state.due_date, now.add_days(3));
    }

    #[test]
    fn test_later_successes_multiply_by_pre_update_ease_factor() {
        let now = Timestamp::now();
        let state = compute(2, 3.0, 2.0, 5, &config(), now);
        assert_eq!(state.repetitions, 3);
        // 3.0 * 2.0, using the ease factor before this review's update.
        assert_eq!(state.interval, 6.0);
        assert!((state.ease_factor - 2.1).abs() < 1e-9);
    }

    #[test]
    fn test_perfect_quality_has_no_penalty() {
        let now = Timestamp::now();
        let state = compute(0, 1.0, 2.0, 5, &config(), now);
        assert!((state.ease_factor - 2.1).abs() < 1e-9);
    }

    #[test]
    fn test_interval_stays_fractional_but_due_date_rounds() {
        let now = Timestamp::now();
        // 3.0 * 1.5 = 4.5, which rounds half away from zero to 5 days.
        let state = compute(2, 3.0, 1.5, 5, &config(), now);
        assert_eq!(state.interval, 4.5);
        assert_eq!(state.due_date, now.add_days(5));
    }

    #[test]
    fn test_quality_recorded_in_state() {
        let now = Timestamp::now();
        let state = compute(0, 1.0, 2.5, 3, &config(), now);
        assert_eq!(state.quality, 3);
    }

    #[test]
    fn test_config_rejects_out_of_range_increment() {
        assert!(SchedulerConfig::new(0.0, 0.08, 0.02, 5, 1.3).is_err());
        assert!(SchedulerConfig::new(1.5, 0.08, 0.02, 5, 1.3).is_err());
        assert!(SchedulerConfig::new(1.0, 0.08, 0.02, 5, 1.3).is_ok());
    }

    #[test]
    fn test_config_rejects_out_of_range_min_ef() {
        assert!(SchedulerConfig::new(0.1, 0.08, 0.02, 5, 0.9).is_err());
        assert!(SchedulerConfig::new(0.1, 0.08, 0.02, 5, 2.5).is_err());
        let err = SchedulerConfig::new(0.1, 0.08, 0.02, 5, 2.5).err().unwrap();
        assert_eq!(err.param, "min_ef");
        assert_eq!(err.min, 1.0);
        assert_eq!(err.max, 2.0);
    }

    #[test]
    fn test_config_rejects_out_of_range_penalties() {
        assert!(SchedulerConfig::new(0.1, 0.6, 0.02, 5, 1.3).is_err());
        assert!(SchedulerConfig::new(0.1, 0.08, 0.2, 5, 1.3).is_err());
        assert!(SchedulerConfig::new(0.1, 0.08, 0.02, 0, 1.3).is_err());
        assert!(SchedulerConfig::new(0.1, 0.08, 0.02, 11, 1.3).is_err());
    }
}
