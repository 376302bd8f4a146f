//! Rational outcome filtering.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::outcome::Outcome;
use crate::utility::UtilityFunction;

/// Returns the outcomes whose utility is strictly above `threshold`, sorted
/// by descending utility.
///
/// Outcomes exactly at the threshold are excluded, as are outcomes with a
/// `NaN` utility. The sort is stable, so outcomes of equal utility keep their
/// input order.
#[must_use]
pub fn filter_rational<U>(outcomes: &[Outcome], utility: &U, threshold: f64) -> Vec<Outcome>
where
    U: UtilityFunction + ?Sized,
{
    let mut scored: Vec<(f64, &Outcome)> = outcomes
        .iter()
        .map(|o| (utility.utility(o), o))
        .filter(|(u, _)| *u > threshold)
        .collect();
    scored.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(_, o)| o.clone()).collect()
}

/// Keeps the outcomes of `own` that also appear in `other`, preserving the
/// order of `own`.
#[must_use]
pub fn intersect_rational(own: &[Outcome], other: &[Outcome]) -> Vec<Outcome> {
    let other: HashSet<&Outcome> = other.iter().collect();
    own.iter().filter(|o| other.contains(o)).cloned().collect()
}
