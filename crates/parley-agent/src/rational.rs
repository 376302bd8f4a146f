//! Rational outcome sets for one session.
//!
//! `own` is fixed for the whole session. `opponent` and `joint` are rebuilt
//! from scratch whenever the counterpart's reservation estimate is
//! re-evaluated, so they never carry outcomes from an older estimate.

use tracing::{debug, warn};

use crate::filter::{filter_rational, intersect_rational};
use crate::outcome::Outcome;
use crate::utility::UtilityFunction;

/// Own, counterpart and joint rational outcome sets.
#[derive(Debug, Clone, PartialEq)]
pub struct RationalSets {
    all: Vec<Outcome>,
    own: Vec<Outcome>,
    opponent: Vec<Outcome>,
    joint: Vec<Outcome>,
    joint_is_fallback: bool,
}

impl RationalSets {
    /// Builds all sets for a new session.
    #[must_use]
    pub fn new<U, V>(outcomes: Vec<Outcome>, own_utility: &U, opponent_utility: &V, opponent_reserved: f64) -> Self
    where
        U: UtilityFunction + ?Sized,
        V: UtilityFunction + ?Sized,
    {
        let own = filter_rational(&outcomes, own_utility, own_utility.reserved_value());
        if own.is_empty() {
            warn!(
                outcomes = outcomes.len(),
                reserved_value = own_utility.reserved_value(),
                "no outcome exceeds own reserved value"
            );
        }
        let mut sets = Self {
            all: outcomes,
            own,
            opponent: Vec::new(),
            joint: Vec::new(),
            joint_is_fallback: false,
        };
        sets.refresh(opponent_utility, opponent_reserved);
        sets
    }

    /// Recomputes the counterpart and joint sets against `opponent_reserved`.
    ///
    /// When no outcome is rational for both sides, `joint` falls back to `own`.
    pub fn refresh<V>(&mut self, opponent_utility: &V, opponent_reserved: f64)
    where
        V: UtilityFunction + ?Sized,
    {
        self.opponent = filter_rational(&self.all, opponent_utility, opponent_reserved);
        let joint = intersect_rational(&self.own, &self.opponent);
        self.joint_is_fallback = joint.is_empty();
        self.joint = if self.joint_is_fallback { self.own.clone() } else { joint };
        debug!(
            opponent_reserved,
            own = self.own.len(),
            opponent = self.opponent.len(),
            joint = self.joint.len(),
            fallback = self.joint_is_fallback,
            "rational sets refreshed"
        );
    }

    /// Every outcome drawn for the session.
    #[must_use]
    pub fn all(&self) -> &[Outcome] {
        &self.all
    }

    /// Outcomes above our reserved value, best first.
    #[must_use]
    pub fn own(&self) -> &[Outcome] {
        &self.own
    }

    /// Outcomes above the estimated counterpart reserved value, best for the
    /// counterpart first.
    #[must_use]
    pub fn opponent(&self) -> &[Outcome] {
        &self.opponent
    }

    /// Outcomes rational for both sides (or `own` as fallback), best for us first.
    #[must_use]
    pub fn joint(&self) -> &[Outcome] {
        &self.joint
    }

    /// Returns true if `joint` currently holds the `own` fallback.
    #[must_use]
    pub const fn joint_is_fallback(&self) -> bool {
        self.joint_is_fallback
    }

    /// Best outcome for us among the joint outcomes, else among our own
    /// rational outcomes.
    #[must_use]
    pub fn target(&self) -> Option<&Outcome> {
        self.joint.first().or_else(|| self.own.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::IssueValue;
    use crate::utility::FnUtility;

    fn outcome(i: i64) -> Outcome {
        Outcome::new([IssueValue::Integer(i)])
    }

    fn index(o: &Outcome) -> f64 {
        match o.get(0) {
            Some(IssueValue::Integer(i)) => *i as f64,
            _ => 0.0,
        }
    }

    fn space() -> Vec<Outcome> {
        (0..=10).map(outcome).collect()
    }

    // Own utility rises with the index, the counterpart's falls.
    fn own(rv: f64) -> FnUtility<impl Fn(&Outcome) -> f64 + Send + Sync> {
        FnUtility::new(|o: &Outcome| index(o) / 10.0, rv)
    }

    fn opponent() -> FnUtility<impl Fn(&Outcome) -> f64 + Send + Sync> {
        FnUtility::new(|o: &Outcome| 1.0 - index(o) / 10.0, 0.0)
    }

    #[test]
    fn joint_is_intersection_sorted_by_own_utility() {
        let sets = RationalSets::new(space(), &own(0.3), &opponent(), 0.25);

        // own: 4..=10, opponent: 0..=7
        assert_eq!(sets.own().len(), 7);
        assert_eq!(sets.opponent().len(), 8);
        assert_eq!(sets.joint(), &[outcome(7), outcome(6), outcome(5), outcome(4)]);
        assert!(!sets.joint_is_fallback());
        assert_eq!(sets.target(), Some(&outcome(7)));
    }

    #[test]
    fn empty_intersection_falls_back_to_own() {
        let sets = RationalSets::new(space(), &own(0.65), &opponent(), 0.5);

        // own: 7..=10, opponent: 0..=4
        assert!(sets.joint_is_fallback());
        assert_eq!(sets.joint(), sets.own());
        assert_eq!(sets.target(), Some(&outcome(10)));
    }

    #[test]
    fn refresh_rebuilds_from_scratch() {
        let mut sets = RationalSets::new(space(), &own(0.3), &opponent(), 0.25);
        sets.refresh(&opponent(), 0.45);
        assert_eq!(sets.joint(), &[outcome(5), outcome(4)]);

        let own_before = sets.own().to_vec();
        sets.refresh(&opponent(), 0.05);
        assert_eq!(sets.own(), own_before.as_slice());
        assert_eq!(sets.joint().len(), 6);
    }

    #[test]
    fn no_rational_outcomes_leaves_everything_empty() {
        let sets = RationalSets::new(space(), &own(1.0), &opponent(), 0.0);
        assert!(sets.own().is_empty());
        assert!(sets.joint().is_empty());
        assert!(sets.target().is_none());
    }
}
