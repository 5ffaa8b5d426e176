//! Exploration rate schedules

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How ε evolves from one training episode to the next
///
/// `Constant` keeps the configured ε for the whole run. The two decaying
/// schedules start from the configured ε (or `max`) and never drop below
/// `min`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EpsilonSchedule {
    #[default]
    Constant,
    /// ε ← max(ε · decay, min) after every episode
    Multiplicative { decay: f64, min: f64 },
    /// ε(e) = min + (max - min) · exp(-rate · e)
    Exponential { max: f64, min: f64, rate: f64 },
}

impl EpsilonSchedule {
    /// Exploration rate for the 0-based `episode`
    ///
    /// `initial` is the configured ε; the exponential schedule ignores it in
    /// favour of its own `max`.
    pub fn epsilon_at(&self, initial: f64, episode: usize) -> f64 {
        match *self {
            EpsilonSchedule::Constant => initial,
            EpsilonSchedule::Multiplicative { decay, min } => {
                (initial * decay.powf(episode as f64)).max(min)
            }
            EpsilonSchedule::Exponential { max, min, rate } => {
                min + (max - min) * (-rate * episode as f64).exp()
            }
        }
    }

    /// Check parameters lie in their meaningful ranges
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(Error::config(format!("{name} must be in [0, 1], got {v}")))
            }
        };

        match *self {
            EpsilonSchedule::Constant => Ok(()),
            EpsilonSchedule::Multiplicative { decay, min } => {
                unit("epsilon decay", decay)?;
                unit("minimum epsilon", min)
            }
            EpsilonSchedule::Exponential { max, min, rate } => {
                unit("maximum epsilon", max)?;
                unit("minimum epsilon", min)?;
                if min > max {
                    return Err(Error::config(format!(
                        "minimum epsilon {min} exceeds maximum {max}"
                    )));
                }
                if rate < 0.0 || !rate.is_finite() {
                    return Err(Error::config(format!(
                        "epsilon decay rate must be a non-negative number, got {rate}"
                    )));
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let schedule = EpsilonSchedule::Constant;
        assert_eq!(schedule.epsilon_at(0.8, 0), 0.8);
        assert_eq!(schedule.epsilon_at(0.8, 10_000), 0.8);
    }

    #[test]
    fn test_multiplicative_floors_at_min() {
        let schedule = EpsilonSchedule::Multiplicative {
            decay: 0.5,
            min: 0.1,
        };
        assert_eq!(schedule.epsilon_at(0.8, 0), 0.8);
        assert_eq!(schedule.epsilon_at(0.8, 1), 0.4);
        assert_eq!(schedule.epsilon_at(0.8, 2), 0.2);
        assert_eq!(schedule.epsilon_at(0.8, 5), 0.1);
    }

    #[test]
    fn test_exponential_decays_towards_min() {
        let schedule = EpsilonSchedule::Exponential {
            max: 1.0,
            min: 0.01,
            rate: 0.001,
        };
        assert_eq!(schedule.epsilon_at(0.3, 0), 1.0);
        let late = schedule.epsilon_at(0.3, 10_000);
        assert!(late > 0.01 && late < 0.011);
    }

    #[test]
    fn test_validate() {
        assert!(EpsilonSchedule::Constant.validate().is_ok());
        assert!(
            EpsilonSchedule::Multiplicative {
                decay: 1.5,
                min: 0.0
            }
            .validate()
            .is_err()
        );
        assert!(
            EpsilonSchedule::Exponential {
                max: 0.1,
                min: 0.5,
                rate: 0.01
            }
            .validate()
            .is_err()
        );
    }
}
