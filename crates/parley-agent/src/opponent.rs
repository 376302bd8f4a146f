//! Opponent model: reservation value estimate and offer history.
//!
//! The model is updated once per received offer. Its reservation value
//! estimate never decreases within a session.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::classifier::{classify, Classification, OpponentStyle};
use crate::config::StrategyConfig;

/// What one call to [`OpponentModel::observe`] did to the estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimateUpdate {
    /// Estimate before the update.
    pub previous: f64,
    /// Candidate computed from the latest offers.
    pub candidate: f64,
    /// Estimate after the update.
    pub current: f64,
}

impl EstimateUpdate {
    /// Returns true if the candidate replaced the previous estimate.
    #[must_use]
    pub fn adopted(&self) -> bool {
        self.candidate >= self.previous
    }
}

/// Beliefs about the counterpart, owned by a single session.
#[derive(Debug, Clone, PartialEq)]
pub struct OpponentModel {
    reserved_value_estimate: f64,
    lowest_offer_utility: f64,
    offer_history: VecDeque<f64>,
    offers_seen: usize,
    classification: Classification,
}

impl OpponentModel {
    /// Creates a model with the given initial reservation estimate.
    #[must_use]
    pub fn new(initial_estimate: f64) -> Self {
        Self {
            reserved_value_estimate: initial_estimate,
            lowest_offer_utility: f64::INFINITY,
            offer_history: VecDeque::new(),
            offers_seen: 0,
            classification: Classification::unknown(),
        }
    }

    /// Current estimate of the counterpart's reserved value.
    #[must_use]
    pub const fn reserved_value_estimate(&self) -> f64 {
        self.reserved_value_estimate
    }

    /// Lowest counterpart utility among the offers received, if any.
    #[must_use]
    pub fn lowest_offer_utility(&self) -> Option<f64> {
        (self.offers_seen > 0).then_some(self.lowest_offer_utility)
    }

    /// Counterpart utilities of the most recent offers, oldest first.
    #[must_use]
    pub const fn offer_history(&self) -> &VecDeque<f64> {
        &self.offer_history
    }

    /// Total number of offers observed this session.
    #[must_use]
    pub const fn offers_seen(&self) -> usize {
        self.offers_seen
    }

    /// Latest classification of the counterpart.
    #[must_use]
    pub const fn classification(&self) -> Classification {
        self.classification
    }

    /// Latest classified style of the counterpart.
    #[must_use]
    pub const fn style(&self) -> OpponentStyle {
        self.classification.style
    }

    /// Mean of the last `recent_window` offers, or the lowest offer utility
    /// when fewer are available.
    #[must_use]
    pub fn recent_average(&self, recent_window: usize) -> f64 {
        let n = self.offer_history.len();
        if recent_window == 0 || n < recent_window {
            return self.lowest_offer_utility;
        }
        self.offer_history.iter().skip(n - recent_window).sum::<f64>() / recent_window as f64
    }

    /// Records the counterpart's utility for the offer it just made,
    /// reclassifies it while classification is open, and updates the
    /// reservation estimate.
    ///
    /// Non-finite utilities are ignored and yield `None`.
    pub fn observe(
        &mut self,
        opponent_utility: f64,
        relative_time: f64,
        config: &StrategyConfig,
    ) -> Option<EstimateUpdate> {
        if !opponent_utility.is_finite() {
            warn!(utility = opponent_utility, "ignoring non-finite counterpart utility");
            return None;
        }

        self.lowest_offer_utility = self.lowest_offer_utility.min(opponent_utility);
        self.offer_history.push_back(opponent_utility);
        while self.offer_history.len() > config.history_window {
            self.offer_history.pop_front();
        }
        self.offers_seen += 1;

        if relative_time < config.classification_cutoff {
            if let Some(classification) =
                classify(&self.offer_history, self.offers_seen, relative_time, config)
            {
                if classification.style != self.classification.style {
                    debug!(
                        from = %self.classification.style,
                        to = %classification.style,
                        offers_seen = self.offers_seen,
                        "counterpart reclassified"
                    );
                }
                self.classification = classification;
            }
        }

        let factor = config.profile(self.style()).reservation_factor;
        let candidate = self.recent_average(config.recent_window) * relative_time * factor;
        let previous = self.reserved_value_estimate;
        if candidate >= previous {
            self.reserved_value_estimate = candidate;
        }

        let update = EstimateUpdate {
            previous,
            candidate,
            current: self.reserved_value_estimate,
        };
        debug!(
            previous = update.previous,
            candidate = update.candidate,
            adopted = update.adopted(),
            lowest = self.lowest_offer_utility,
            "reservation estimate updated"
        );
        Some(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StrategyConfig {
        StrategyConfig::default()
    }

    #[test]
    fn new_model_has_no_offers() {
        let model = OpponentModel::new(0.3);
        assert!((model.reserved_value_estimate() - 0.3).abs() < f64::EPSILON);
        assert_eq!(model.lowest_offer_utility(), None);
        assert_eq!(model.offers_seen(), 0);
        assert_eq!(model.style(), OpponentStyle::Unknown);
    }

    #[test]
    fn lowest_offer_only_decreases() {
        let mut model = OpponentModel::new(0.0);
        for u in [0.8, 0.6, 0.9, 0.7] {
            model.observe(u, 0.1, &config());
        }
        assert_eq!(model.lowest_offer_utility(), Some(0.6));
    }

    #[test]
    fn history_is_bounded_by_window() {
        let mut model = OpponentModel::new(0.0);
        for i in 0..25 {
            model.observe(1.0 - f64::from(i) * 0.01, 0.01, &config());
        }
        assert_eq!(model.offer_history().len(), 10);
        assert_eq!(model.offers_seen(), 25);
        assert!((model.offer_history()[9] - 0.76).abs() < 1e-12);
    }

    #[test]
    fn recent_average_falls_back_to_lowest() {
        let mut model = OpponentModel::new(0.0);
        model.observe(0.9, 0.1, &config());
        model.observe(0.5, 0.1, &config());
        assert!((model.recent_average(5) - 0.5).abs() < f64::EPSILON);

        for u in [0.6, 0.7, 0.8] {
            model.observe(u, 0.1, &config());
        }
        // last five: 0.9 0.5 0.6 0.7 0.8
        assert!((model.recent_average(5) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn estimate_uses_style_factor() {
        let mut model = OpponentModel::new(0.0);
        let update = model.observe(0.8, 0.5, &config()).unwrap();
        // unknown style: 0.8 * 0.5 * 0.4
        assert!((update.candidate - 0.16).abs() < 1e-12);
        assert!(update.adopted());
        assert!((model.reserved_value_estimate() - 0.16).abs() < 1e-12);
    }

    #[test]
    fn lower_candidate_keeps_previous_estimate() {
        let mut model = OpponentModel::new(0.5);
        let update = model.observe(0.6, 0.2, &config()).unwrap();
        assert!(!update.adopted());
        assert!((update.current - 0.5).abs() < f64::EPSILON);
        assert!((model.reserved_value_estimate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn boulware_counterpart_uses_larger_factor() {
        let mut model = OpponentModel::new(0.0);
        for step in 1..=10 {
            model.observe(0.5, f64::from(step) * 0.04, &config());
        }
        assert_eq!(model.style(), OpponentStyle::Boulware);
        let update = model.observe(0.5, 0.44, &config()).unwrap();
        assert!((update.candidate - 0.5 * 0.44 * 0.75).abs() < 1e-12);
    }

    #[test]
    fn classification_freezes_after_cutoff() {
        let mut model = OpponentModel::new(0.0);
        for step in 1..=10 {
            model.observe(0.5, f64::from(step) * 0.04, &config());
        }
        assert_eq!(model.style(), OpponentStyle::Boulware);

        // Steep concession after the midpoint must not reclassify.
        for (i, u) in [0.4, 0.3, 0.2, 0.1, 0.05].into_iter().enumerate() {
            model.observe(u, 0.6 + i as f64 * 0.05, &config());
        }
        assert_eq!(model.style(), OpponentStyle::Boulware);
    }

    #[test]
    fn non_finite_utility_is_ignored() {
        let mut model = OpponentModel::new(0.2);
        assert!(model.observe(f64::NAN, 0.5, &config()).is_none());
        assert_eq!(model.offers_seen(), 0);
        assert!(model.offer_history().is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn estimate_never_decreases(
                initial in 0.0f64..1.0,
                offers in prop::collection::vec(0.0f64..1.0, 1..60),
            ) {
                let config = StrategyConfig::default();
                let mut model = OpponentModel::new(initial);
                let n = offers.len() as f64;
                let mut last = model.reserved_value_estimate();
                for (i, u) in offers.into_iter().enumerate() {
                    model.observe(u, (i as f64 + 1.0) / n, &config);
                    prop_assert!(model.reserved_value_estimate() >= last);
                    last = model.reserved_value_estimate();
                }
            }
        }
    }
}
