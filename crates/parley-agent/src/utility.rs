//! Utility function contract and common implementations.
//!
//! A utility function maps an [`Outcome`] to a real score and exposes a
//! reserved value: the floor below which its holder prefers no agreement.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::outcome::{IssueValue, Outcome};

/// Maps outcomes to scores for one negotiating party.
pub trait UtilityFunction: Send + Sync {
    /// Score of `outcome` for the holder of this function.
    fn utility(&self, outcome: &Outcome) -> f64;

    /// Utility of ending without agreement.
    fn reserved_value(&self) -> f64;
}

/// Shared handle to a utility function.
pub type SharedUtility = Arc<dyn UtilityFunction>;

impl<U: UtilityFunction + ?Sized> UtilityFunction for Arc<U> {
    fn utility(&self, outcome: &Outcome) -> f64 {
        (**self).utility(outcome)
    }

    fn reserved_value(&self) -> f64 {
        (**self).reserved_value()
    }
}

impl<U: UtilityFunction + ?Sized> UtilityFunction for &U {
    fn utility(&self, outcome: &Outcome) -> f64 {
        (**self).utility(outcome)
    }

    fn reserved_value(&self) -> f64 {
        (**self).reserved_value()
    }
}

/// Explicit outcome-to-score table.
#[derive(Debug, Clone, Default)]
pub struct TableUtility {
    scores: HashMap<Outcome, f64>,
    default: f64,
    reserved_value: f64,
}

impl TableUtility {
    /// Creates an empty table. Unknown outcomes score 0.
    #[must_use]
    pub fn new(reserved_value: f64) -> Self {
        Self {
            scores: HashMap::new(),
            default: 0.0,
            reserved_value,
        }
    }

    /// Sets the score returned for outcomes missing from the table.
    #[must_use]
    pub fn with_default(mut self, default: f64) -> Self {
        self.default = default;
        self
    }

    /// Replaces the reserved value.
    #[must_use]
    pub fn with_reserved_value(mut self, reserved_value: f64) -> Self {
        self.reserved_value = reserved_value;
        self
    }

    /// Adds or replaces a score.
    #[must_use]
    pub fn with(mut self, outcome: Outcome, score: f64) -> Self {
        self.scores.insert(outcome, score);
        self
    }

    /// Adds or replaces a score in place.
    pub fn insert(&mut self, outcome: Outcome, score: f64) {
        self.scores.insert(outcome, score);
    }

    /// Number of explicitly scored outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns true if no outcome has an explicit score.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(Outcome, f64)> for TableUtility {
    fn from_iter<I: IntoIterator<Item = (Outcome, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
            default: 0.0,
            reserved_value: 0.0,
        }
    }
}

impl UtilityFunction for TableUtility {
    fn utility(&self, outcome: &Outcome) -> f64 {
        self.scores.get(outcome).copied().unwrap_or(self.default)
    }

    fn reserved_value(&self) -> f64 {
        self.reserved_value
    }
}

/// Scores one issue value in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueScore {
    /// Explicit score per discrete value; unknown values score 0.
    Table(Vec<(IssueValue, f64)>),
    /// Linear map of a numeric value from `[min, max]` onto `[0, 1]`,
    /// reversed when `increasing` is false.
    Linear {
        /// Value scored 0 (or 1 when decreasing).
        min: f64,
        /// Value scored 1 (or 0 when decreasing).
        max: f64,
        /// Direction of preference.
        increasing: bool,
    },
}

impl ValueScore {
    fn score(&self, value: &IssueValue) -> f64 {
        match self {
            Self::Table(entries) => entries
                .iter()
                .find(|(v, _)| v == value)
                .map_or(0.0, |(_, s)| *s),
            Self::Linear { min, max, increasing } => {
                let x = match value {
                    IssueValue::Integer(i) => *i as f64,
                    IssueValue::Real(r) => *r,
                    IssueValue::Text(_) => return 0.0,
                };
                let span = max - min;
                if span <= 0.0 {
                    return 1.0;
                }
                let normalized = ((x - min) / span).clamp(0.0, 1.0);
                if *increasing { normalized } else { 1.0 - normalized }
            }
        }
    }
}

/// Weighted sum of per-issue value scores.
///
/// Weights are normalized at construction so the utility stays in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearAdditiveUtility {
    weights: Vec<f64>,
    scores: Vec<ValueScore>,
    reserved_value: f64,
}

impl LinearAdditiveUtility {
    /// Creates a linear additive utility from `(weight, score)` pairs, one per
    /// issue in outcome order.
    #[must_use]
    pub fn new(issues: Vec<(f64, ValueScore)>, reserved_value: f64) -> Self {
        let total: f64 = issues.iter().map(|(w, _)| w.max(0.0)).sum();
        let (weights, scores) = issues
            .into_iter()
            .map(|(w, s)| {
                let w = if total > 0.0 { w.max(0.0) / total } else { 0.0 };
                (w, s)
            })
            .unzip();
        Self {
            weights,
            scores,
            reserved_value,
        }
    }

    /// Normalized issue weights.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl UtilityFunction for LinearAdditiveUtility {
    fn utility(&self, outcome: &Outcome) -> f64 {
        self.weights
            .iter()
            .zip(&self.scores)
            .zip(outcome.values())
            .map(|((w, s), v)| w * s.score(v))
            .sum()
    }

    fn reserved_value(&self) -> f64 {
        self.reserved_value
    }
}

/// Adapter turning a closure into a [`UtilityFunction`].
pub struct FnUtility<F> {
    f: F,
    reserved_value: f64,
}

impl<F> FnUtility<F>
where
    F: Fn(&Outcome) -> f64 + Send + Sync,
{
    /// Wraps `f` with the given reserved value.
    pub const fn new(f: F, reserved_value: f64) -> Self {
        Self { f, reserved_value }
    }
}

impl<F> fmt::Debug for FnUtility<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnUtility")
            .field("reserved_value", &self.reserved_value)
            .finish_non_exhaustive()
    }
}

impl<F> UtilityFunction for FnUtility<F>
where
    F: Fn(&Outcome) -> f64 + Send + Sync,
{
    fn utility(&self, outcome: &Outcome) -> f64 {
        (self.f)(outcome)
    }

    fn reserved_value(&self) -> f64 {
        self.reserved_value
    }
}
