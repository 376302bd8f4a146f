//! Bidding strategy.
//!
//! Picks the counter-offer from the joint outcome set. Against a classified
//! counterpart it looks for the best outcome (for us) that still gives us more
//! than the counterpart while tracking the counterpart's lowest offer so far.

use crate::config::BidFilter;
use crate::outcome::Outcome;
use crate::session::DecisionContext;

/// Selects the next counter-offer.
///
/// Returns `None` only when the joint outcome set is empty.
#[must_use]
pub fn propose<'a>(ctx: &DecisionContext<'a>) -> Option<&'a Outcome> {
    let sets = ctx.sets;
    let joint = sets.joint();
    let best = joint.first();
    let Some(lowest) = ctx.model.lowest_offer_utility() else {
        return best;
    };

    let above_lowest = |opp: f64| opp > lowest;
    let candidate = match ctx.config.profile(ctx.model.style()).bid_filter {
        BidFilter::BestJoint => None,
        BidFilter::AboveLowest => first_favorable(ctx, joint, above_lowest),
        BidFilter::NearLowest { tolerance } => {
            first_favorable(ctx, joint, |opp| (opp - lowest).abs() <= tolerance)
                .or_else(|| first_favorable(ctx, joint, above_lowest))
        }
    };
    candidate.or(best)
}

/// First outcome whose counterpart utility satisfies `accept_opponent` and
/// that gives us strictly more than the counterpart.
fn first_favorable<'a>(
    ctx: &DecisionContext<'_>,
    outcomes: &'a [Outcome],
    accept_opponent: impl Fn(f64) -> bool,
) -> Option<&'a Outcome> {
    outcomes.iter().find(|o| {
        let opp = ctx.opponent.utility(o);
        accept_opponent(opp) && ctx.own.utility(o) > opp
    })
}
