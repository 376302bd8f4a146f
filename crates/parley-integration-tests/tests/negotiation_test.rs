//! Integration tests for full negotiation sessions.
//!
//! Drives [`Negotiator`] through complete sessions the way a mechanism would:
//! 1. Session start with both utility functions and an outcome space
//! 2. One `decide` call per round, alternating offers
//! 3. Session end with a summary of what was learned

use std::collections::VecDeque;
use std::sync::Arc;

use parley_agent::classifier::classify;
use parley_agent::{
    EndReason, Issue, IssueSpace, IssueValue, LinearAdditiveUtility, NegotiationState,
    Negotiator, OpponentStyle, Outcome, Response, SessionContext, SharedUtility, StrategyConfig,
    TableUtility, UtilityFunction, ValueScore,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Helper Functions
// ============================================================================

fn outcome(i: i64) -> Outcome {
    Outcome::new([IssueValue::Integer(i)])
}

fn outcomes(n: i64) -> Vec<Outcome> {
    (0..n).map(outcome).collect()
}

/// Outcome `i` of `n` is worth `i / (n - 1)`.
fn rising(n: i64, reserved_value: f64) -> SharedUtility {
    let top = (n - 1) as f64;
    Arc::new(
        (0..n)
            .map(|i| (outcome(i), i as f64 / top))
            .collect::<TableUtility>()
            .with_reserved_value(reserved_value),
    )
}

/// Outcome `i` of `n` is worth `1 - i / (n - 1)`.
fn falling(n: i64, reserved_value: f64) -> SharedUtility {
    let top = (n - 1) as f64;
    Arc::new(
        (0..n)
            .map(|i| (outcome(i), 1.0 - i as f64 / top))
            .collect::<TableUtility>()
            .with_reserved_value(reserved_value),
    )
}

fn started(config: StrategyConfig, own: SharedUtility, opponent: SharedUtility, space: &[Outcome]) -> Negotiator {
    let mut negotiator = Negotiator::new(config).unwrap();
    negotiator.on_session_start(SessionContext::new(own, opponent, &space.to_vec()));
    negotiator
}

fn eleven_outcomes(own_reserved: f64) -> Negotiator {
    started(
        StrategyConfig::default(),
        rising(11, own_reserved),
        falling(11, 0.2),
        &outcomes(11),
    )
}

fn linear_utilities(issues: usize, values: u32, seed: u64, reserved: [f64; 2]) -> [SharedUtility; 2] {
    let mut rng = StdRng::seed_from_u64(seed);
    let max = f64::from(values - 1);
    let mut a = Vec::new();
    let mut b = Vec::new();
    for _ in 0..issues {
        a.push((rng.gen_range(0.1..1.0), ValueScore::Linear { min: 0.0, max, increasing: true }));
        b.push((rng.gen_range(0.1..1.0), ValueScore::Linear { min: 0.0, max, increasing: false }));
    }
    [
        Arc::new(LinearAdditiveUtility::new(a, reserved[0])),
        Arc::new(LinearAdditiveUtility::new(b, reserved[1])),
    ]
}

/// Plays two negotiators against each other; returns the agreement, if any.
fn self_play(seed: u64, steps: u32, reserved: [f64; 2]) -> Option<Outcome> {
    let issues = vec![
        Issue::integer_range("price", 6),
        Issue::integer_range("quantity", 6),
        Issue::integer_range("delivery", 6),
    ];
    let space = IssueSpace::with_seed(issues, seed).unwrap();
    let [ua, ub] = linear_utilities(3, 6, seed, reserved);

    let mut agents = [Negotiator::default(), Negotiator::default()];
    agents[0].on_session_start(SessionContext::new(ua.clone(), ub.clone(), &space));
    agents[1].on_session_start(SessionContext::new(ub.clone(), ua.clone(), &space));

    let mut offer = None;
    for step in 0..steps {
        let state = NegotiationState {
            current_offer: offer.take(),
            step,
            n_steps: Some(steps),
            relative_time: None,
        };
        match agents[(step % 2) as usize].decide(&state) {
            Response::Accept { offer } => {
                assert!(ua.utility(&offer) > ua.reserved_value());
                assert!(ub.utility(&offer) > ub.reserved_value());
                return Some(offer);
            }
            Response::Reject { counter_offer } => offer = Some(counter_offer),
            Response::EndNegotiation { .. } => return None,
        }
    }
    None
}

// ============================================================================
// Session Lifecycle Tests
// ============================================================================

#[test]
fn missing_own_utility_ends_every_round() {
    let mut negotiator = Negotiator::default();
    let space = outcomes(11);
    negotiator.on_session_start(SessionContext {
        own_utility: None,
        opponent_utility: Some(falling(11, 0.2)),
        outcome_space: &space,
    });

    for step in 0..3 {
        let response = negotiator.decide(&NegotiationState::at_step(outcome(5), step, 10));
        assert_eq!(response, Response::end(EndReason::NoActiveSession));
    }
    assert!(negotiator.on_session_end().is_none());
}

#[test]
fn missing_opponent_utility_ends_every_round() {
    let mut negotiator = Negotiator::default();
    let space = outcomes(11);
    negotiator.on_session_start(SessionContext {
        own_utility: Some(rising(11, 0.3)),
        opponent_utility: None,
        outcome_space: &space,
    });
    let response = negotiator.decide(&NegotiationState::opening(10));
    assert_eq!(response, Response::end(EndReason::NoActiveSession));
}

#[test]
fn nothing_above_reserved_value_ends_negotiation() {
    let mut negotiator = eleven_outcomes(1.0);
    assert!(negotiator.session().unwrap().sets().own().is_empty());

    let opening = negotiator.decide(&NegotiationState::opening(10));
    assert_eq!(opening, Response::end(EndReason::NoAcceptableProposal));
    let later = negotiator.decide(&NegotiationState::at_step(outcome(10), 5, 10));
    assert_eq!(later, Response::end(EndReason::NoAcceptableProposal));
}

#[test]
fn opening_proposes_best_joint_outcome() {
    let mut negotiator = eleven_outcomes(0.35);
    let best_joint = negotiator.session().unwrap().sets().joint()[0].clone();

    let response = negotiator.decide(&NegotiationState::opening(20));
    assert_eq!(response, Response::reject(best_joint.clone()));
    assert_eq!(best_joint, outcome(6));
    assert_eq!(negotiator.session().unwrap().model().offers_seen(), 0);
}

#[test]
fn summary_reports_learned_state() {
    let mut negotiator = eleven_outcomes(0.35);
    negotiator.decide(&NegotiationState::opening(20));
    for step in 1..=4 {
        negotiator.decide(&NegotiationState::at_step(outcome(2), step, 20));
    }

    let summary = negotiator.on_session_end().unwrap();
    assert_eq!(summary.rounds, 5);
    assert_eq!(summary.offers_seen, 4);
    assert_eq!(summary.style, OpponentStyle::Unknown);
    assert!(summary.lowest_offer_utility.is_some());
    assert!(summary.reserved_value_estimate >= 0.35);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["style"], "unknown");
    assert_eq!(json["offers_seen"], 4);
}

// ============================================================================
// Outcome Set Tests
// ============================================================================

#[test]
fn own_rational_holds_exactly_outcomes_above_reserved_value() {
    let negotiator = started(
        StrategyConfig::default(),
        rising(100, 0.3),
        falling(100, 0.2),
        &outcomes(100),
    );
    let session = negotiator.session().unwrap();
    let own = session.sets().own();
    let utility = rising(100, 0.3);

    // i / 99 > 0.3 for i >= 30.
    assert_eq!(own.len(), 70);
    assert_eq!(own.first(), Some(&outcome(99)));
    assert_eq!(own.last(), Some(&outcome(30)));
    for pair in own.windows(2) {
        assert!(utility.utility(&pair[0]) > utility.utility(&pair[1]));
    }
}

#[test]
fn empty_intersection_proposes_from_own_rational() {
    let config = StrategyConfig::builder()
        .initial_opponent_reserved(0.99)
        .build()
        .unwrap();
    let mut negotiator = started(config, rising(11, 0.35), falling(11, 0.2), &outcomes(11));
    let sets = negotiator.session().unwrap().sets().clone();
    assert!(sets.joint_is_fallback());
    assert_eq!(sets.joint(), sets.own());

    let response = negotiator.decide(&NegotiationState::opening(20));
    let bid = response.counter_offer().unwrap();
    assert!(sets.own().contains(bid));
    assert_eq!(bid, &outcome(10));
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test]
fn steadily_conceding_counterpart_is_conceder() {
    let window: VecDeque<f64> = (0..10).map(|i| 0.9 - f64::from(i) * 0.05).collect();
    let classification = classify(&window, 10, 0.5, &StrategyConfig::default()).unwrap();
    assert_eq!(classification.style, OpponentStyle::Conceder);
    assert!((classification.concession_exponent - 0.6).abs() < f64::EPSILON);
}

#[test]
fn constant_counterpart_is_boulware() {
    let window: VecDeque<f64> = std::iter::repeat(0.5).take(10).collect();
    let classification = classify(&window, 10, 0.3, &StrategyConfig::default()).unwrap();
    assert_eq!(classification.style, OpponentStyle::Boulware);
    assert!((classification.concession_exponent - 1.3).abs() < f64::EPSILON);
}

#[test]
fn boulware_counterpart_is_held_out_until_late() {
    let mut negotiator = eleven_outcomes(0.35);
    // Outcome 3 is worth 0.7 to the counterpart, every time.
    for step in 1..=10 {
        negotiator.decide(&NegotiationState::at_step(outcome(3), step, 40));
    }
    assert_eq!(negotiator.session().unwrap().model().style(), OpponentStyle::Boulware);

    // t = 0.8: an excellent offer is still refused.
    let response = negotiator.decide(&NegotiationState::at_step(outcome(10), 32, 40));
    assert!(response.is_reject());

    // t = 0.95: the holdout is over.
    let response = negotiator.decide(&NegotiationState::at_step(outcome(9), 38, 40));
    assert_eq!(response, Response::accept(outcome(9)));
}

#[test]
fn classification_does_not_change_after_cutoff() {
    let mut negotiator = eleven_outcomes(0.35);
    for step in 1..=10 {
        negotiator.decide(&NegotiationState::at_step(outcome(3), step, 40));
    }
    // Rapid concession in the second half.
    for (step, i) in (21..=25).zip([4, 5, 6, 7, 8]) {
        negotiator.decide(&NegotiationState::at_step(outcome(i), step, 40));
    }
    assert_eq!(negotiator.session().unwrap().model().style(), OpponentStyle::Boulware);
}

// ============================================================================
// Self-Play Tests
// ============================================================================

#[test]
fn self_play_agrees_with_moderate_reserved_values() {
    let agreements = (0..10)
        .filter_map(|seed| self_play(seed, 100, [0.2, 0.2]))
        .count();
    assert!(agreements > 0);
}

#[test]
fn self_play_is_deterministic() {
    assert_eq!(self_play(5, 80, [0.3, 0.3]), self_play(5, 80, [0.3, 0.3]));
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn self_play_never_agrees_irrationally(
            seed in any::<u64>(),
            steps in 10u32..120,
            rv_a in 0.0f64..0.7,
            rv_b in 0.0f64..0.7,
        ) {
            // Rationality of any agreement is asserted inside self_play.
            let _ = self_play(seed, steps, [rv_a, rv_b]);
        }

        #[test]
        fn session_invariants_hold_for_any_offer_sequence(
            offers in prop::collection::vec(0i64..11, 1..40),
        ) {
            let mut negotiator = eleven_outcomes(0.35);
            let own = negotiator.session().unwrap().sets().own().to_vec();
            let mut estimate = negotiator.session().unwrap().model().reserved_value_estimate();
            let n = offers.len() as u32 + 1;

            for (step, i) in offers.into_iter().enumerate() {
                let response = negotiator.decide(&NegotiationState::at_step(outcome(i), step as u32 + 1, n));
                let session = negotiator.session().unwrap();

                prop_assert_eq!(session.sets().own(), own.as_slice());
                prop_assert!(session.model().reserved_value_estimate() >= estimate);
                estimate = session.model().reserved_value_estimate();
                for o in session.sets().joint() {
                    prop_assert!(own.contains(o));
                }
                if let Some(bid) = response.counter_offer() {
                    prop_assert!(own.contains(bid));
                }
            }
        }

        #[test]
        fn acceptance_query_is_idempotent(i in 0i64..11, step in 0u32..=20) {
            let negotiator = eleven_outcomes(0.35);
            let state = NegotiationState::at_step(outcome(i), step, 20);
            prop_assert_eq!(negotiator.accept(&state), negotiator.accept(&state));
        }
    }
}
