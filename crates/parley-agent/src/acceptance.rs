//! Acceptance strategy.
//!
//! A time-dependent concession curve: the threshold starts at the utility of
//! our best joint outcome and decays toward our reserved value as the deadline
//! approaches, with the decay shaped by the concession exponent.

use crate::classifier::OpponentStyle;
use crate::outcome::Outcome;
use crate::session::DecisionContext;

/// Threshold of the concession curve at `relative_time`.
///
/// Equals `target_utility` at time 0 and `reserved_value` at time 1.
#[must_use]
pub fn concession_threshold(
    reserved_value: f64,
    target_utility: f64,
    relative_time: f64,
    exponent: f64,
) -> f64 {
    let t = relative_time.clamp(0.0, 1.0);
    (target_utility - reserved_value).mul_add(1.0 - t.powf(exponent), reserved_value)
}

/// Decides whether to accept `offer` at `relative_time`.
///
/// Branches are evaluated in order and the first one that applies decides:
/// 1. early phase: the offer must clear the threshold and give us strictly
///    more than it gives the counterpart;
/// 2. Boulware counterpart before the holdout ends: reject;
/// 3. otherwise: the offer must clear the threshold.
#[must_use]
pub fn accept(ctx: &DecisionContext<'_>, offer: &Outcome, relative_time: f64) -> bool {
    let Some(target) = ctx.sets.target() else {
        return false;
    };
    let reserved = ctx.own.reserved_value();
    let classification = ctx.model.classification();
    let threshold = concession_threshold(
        reserved,
        ctx.own.utility(target),
        relative_time,
        classification.concession_exponent,
    );
    let utility = ctx.own.utility(offer);

    if relative_time < ctx.config.early_phase_end {
        return utility > threshold && ctx.opponent.utility(offer) < utility;
    }
    if classification.style == OpponentStyle::Boulware
        && relative_time < ctx.config.boulware_holdout_until
    {
        return false;
    }
    utility > threshold
}
