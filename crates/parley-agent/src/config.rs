//! Strategy configuration.
//!
//! Every tunable constant of the strategy lives in [`StrategyConfig`]. The
//! per-style parameters are resolved through [`StrategyConfig::profile`] so
//! acceptance and bidding never branch on raw constants themselves.

use serde::{Deserialize, Serialize};

use crate::classifier::OpponentStyle;
use crate::error::ConfigError;

/// Tunable parameters of the negotiation strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Number of counterpart offers kept for classification.
    pub history_window: usize,
    /// Offers that must be observed before the counterpart is classified.
    pub min_offers: usize,
    /// Number of most recent offers averaged by the reservation estimator.
    pub recent_window: usize,
    /// Slope below which the counterpart is considered Boulware.
    pub boulware_slope_threshold: f64,
    /// Concession exponent used against a Boulware counterpart.
    pub boulware_exponent: f64,
    /// Concession exponent used against a Conceder counterpart.
    pub conceder_exponent: f64,
    /// Reservation estimate multiplier for a Boulware counterpart.
    pub boulware_multiplier: f64,
    /// Reservation estimate multiplier for any other counterpart.
    pub other_multiplier: f64,
    /// Closeness to the lowest offer utility accepted when bidding against a
    /// Boulware counterpart.
    pub boulware_tolerance: f64,
    /// Relative time after which the classification is frozen.
    pub classification_cutoff: f64,
    /// Relative time before which acceptance also requires the offer to favor us.
    pub early_phase_end: f64,
    /// Relative time before which a Boulware counterpart is never accepted.
    pub boulware_holdout_until: f64,
    /// Initial estimate of the counterpart's reserved value. `None` mirrors
    /// our own reserved value.
    pub initial_opponent_reserved: Option<f64>,
    /// Upper bound on outcomes drawn from the outcome space per session.
    pub max_outcomes: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            history_window: 10,
            min_offers: 10,
            recent_window: 5,
            boulware_slope_threshold: 0.1,
            boulware_exponent: 1.3,
            conceder_exponent: 0.6,
            boulware_multiplier: 0.75,
            other_multiplier: 0.4,
            boulware_tolerance: 0.1,
            classification_cutoff: 0.5,
            early_phase_end: 0.5,
            boulware_holdout_until: 0.9,
            initial_opponent_reserved: None,
            max_outcomes: 10_000,
        }
    }
}

/// Which outcomes the bidding strategy considers for a given counterpart style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BidFilter {
    /// No filter: propose the best joint outcome.
    BestJoint,
    /// Outcomes the counterpart values above its lowest offer so far.
    AboveLowest,
    /// Outcomes within `tolerance` of the counterpart's lowest offer, widening
    /// to [`BidFilter::AboveLowest`] when nothing matches.
    NearLowest {
        /// Maximum distance from the lowest offer utility.
        tolerance: f64,
    },
}

/// Parameters the strategy applies against one counterpart style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleProfile {
    /// Shape of the acceptance threshold decay.
    pub concession_exponent: f64,
    /// Multiplier applied by the reservation estimator.
    pub reservation_factor: f64,
    /// Candidate filter used when bidding.
    pub bid_filter: BidFilter,
}

impl StrategyConfig {
    /// Create a new builder for strategy configuration.
    #[must_use]
    pub fn builder() -> StrategyConfigBuilder {
        StrategyConfigBuilder::default()
    }

    /// Parses a JSON document and validates it. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolves the parameters used against `style`.
    #[must_use]
    pub fn profile(&self, style: OpponentStyle) -> StyleProfile {
        match style {
            OpponentStyle::Unknown => StyleProfile {
                concession_exponent: 1.0,
                reservation_factor: self.other_multiplier,
                bid_filter: BidFilter::BestJoint,
            },
            OpponentStyle::Boulware => StyleProfile {
                concession_exponent: self.boulware_exponent,
                reservation_factor: self.boulware_multiplier,
                bid_filter: BidFilter::NearLowest {
                    tolerance: self.boulware_tolerance,
                },
            },
            OpponentStyle::Conceder => StyleProfile {
                concession_exponent: self.conceder_exponent,
                reservation_factor: self.other_multiplier,
                bid_filter: BidFilter::AboveLowest,
            },
        }
    }

    /// Checks every parameter against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(5..=10).contains(&self.history_window) {
            return Err(ConfigError::OutOfRange {
                field: "history_window",
                value: self.history_window as f64,
                expected: "between 5 and 10",
            });
        }
        if self.min_offers < 10 {
            return Err(ConfigError::OutOfRange {
                field: "min_offers",
                value: self.min_offers as f64,
                expected: "at least 10",
            });
        }
        if self.recent_window == 0 || self.recent_window > self.history_window {
            return Err(ConfigError::Inconsistent(format!(
                "recent_window {} must be in 1..={}",
                self.recent_window, self.history_window
            )));
        }
        if self.max_outcomes == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_outcomes",
                value: 0.0,
                expected: "greater than 0",
            });
        }

        positive("boulware_exponent", self.boulware_exponent)?;
        positive("conceder_exponent", self.conceder_exponent)?;
        positive("boulware_slope_threshold", self.boulware_slope_threshold)?;
        multiplier("boulware_multiplier", self.boulware_multiplier)?;
        multiplier("other_multiplier", self.other_multiplier)?;
        unit("boulware_tolerance", self.boulware_tolerance)?;
        unit("classification_cutoff", self.classification_cutoff)?;
        unit("early_phase_end", self.early_phase_end)?;
        unit("boulware_holdout_until", self.boulware_holdout_until)?;
        if let Some(rv) = self.initial_opponent_reserved {
            unit("initial_opponent_reserved", rv)?;
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "a finite value greater than 0",
        })
    }
}

fn multiplier(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "a value in (0, 1]",
        })
    }
}

fn unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "a value in [0, 1]",
        })
    }
}

/// Builder for `StrategyConfig`.
#[derive(Debug, Clone, Default)]
pub struct StrategyConfigBuilder {
    config: StrategyConfig,
}

impl StrategyConfigBuilder {
    /// Set the classification history window.
    #[must_use]
    pub fn history_window(mut self, window: usize) -> Self {
        self.config.history_window = window;
        self
    }

    /// Set the number of offers required before classifying.
    #[must_use]
    pub fn min_offers(mut self, count: usize) -> Self {
        self.config.min_offers = count;
        self
    }

    /// Set the concession exponents for Boulware and Conceder counterparts.
    #[must_use]
    pub fn exponents(mut self, boulware: f64, conceder: f64) -> Self {
        self.config.boulware_exponent = boulware;
        self.config.conceder_exponent = conceder;
        self
    }

    /// Set the reservation estimate multipliers.
    #[must_use]
    pub fn multipliers(mut self, boulware: f64, other: f64) -> Self {
        self.config.boulware_multiplier = boulware;
        self.config.other_multiplier = other;
        self
    }

    /// Set the Boulware bidding tolerance.
    #[must_use]
    pub fn boulware_tolerance(mut self, tolerance: f64) -> Self {
        self.config.boulware_tolerance = tolerance;
        self
    }

    /// Set the Boulware slope threshold.
    #[must_use]
    pub fn boulware_slope_threshold(mut self, threshold: f64) -> Self {
        self.config.boulware_slope_threshold = threshold;
        self
    }

    /// Set the initial estimate of the counterpart's reserved value.
    #[must_use]
    pub fn initial_opponent_reserved(mut self, value: f64) -> Self {
        self.config.initial_opponent_reserved = Some(value);
        self
    }

    /// Set the outcome sampling bound.
    #[must_use]
    pub fn max_outcomes(mut self, max: usize) -> Self {
        self.config.max_outcomes = max;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<StrategyConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
