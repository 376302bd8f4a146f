//! Per-session strategy state.
//!
//! A [`Session`] owns everything the strategy learns during one negotiation:
//! the opponent model and the rational outcome sets. It is created when a
//! negotiation starts and dropped when it ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::acceptance;
use crate::bidding;
use crate::classifier::OpponentStyle;
use crate::config::StrategyConfig;
use crate::opponent::{EstimateUpdate, OpponentModel};
use crate::outcome::{Outcome, OutcomeSpace};
use crate::rational::RationalSets;
use crate::utility::{SharedUtility, UtilityFunction};

/// Unique identifier for a negotiation session.
pub type SessionId = Uuid;

/// Borrowed view of everything the acceptance and bidding strategies read.
#[derive(Clone, Copy)]
pub struct DecisionContext<'a> {
    /// Our utility function.
    pub own: &'a dyn UtilityFunction,
    /// The counterpart's utility function.
    pub opponent: &'a dyn UtilityFunction,
    /// Current rational outcome sets.
    pub sets: &'a RationalSets,
    /// Current opponent model.
    pub model: &'a OpponentModel,
    /// Strategy parameters.
    pub config: &'a StrategyConfig,
}

/// State of one negotiation.
pub struct Session {
    id: SessionId,
    started_at: DateTime<Utc>,
    own: SharedUtility,
    opponent: SharedUtility,
    sets: RationalSets,
    model: OpponentModel,
    rounds: u32,
}

impl Session {
    /// Starts a session: draws the outcomes, builds the rational sets and a
    /// fresh opponent model.
    #[must_use]
    pub fn start(
        own: SharedUtility,
        opponent: SharedUtility,
        space: &dyn OutcomeSpace,
        config: &StrategyConfig,
    ) -> Self {
        let initial_estimate = config
            .initial_opponent_reserved
            .unwrap_or_else(|| own.reserved_value());
        let outcomes = space.enumerate_or_sample(config.max_outcomes);
        let sets = RationalSets::new(outcomes, own.as_ref(), opponent.as_ref(), initial_estimate);
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            own,
            opponent,
            sets,
            model: OpponentModel::new(initial_estimate),
            rounds: 0,
        }
    }

    /// Session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// When the session started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Number of decisions made so far.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Current rational outcome sets.
    #[must_use]
    pub const fn sets(&self) -> &RationalSets {
        &self.sets
    }

    /// Current opponent model.
    #[must_use]
    pub const fn model(&self) -> &OpponentModel {
        &self.model
    }

    pub(crate) fn own_utility(&self) -> &dyn UtilityFunction {
        self.own.as_ref()
    }

    pub(crate) fn opponent_utility(&self) -> &dyn UtilityFunction {
        self.opponent.as_ref()
    }

    pub(crate) fn next_round(&mut self) -> u32 {
        self.rounds += 1;
        self.rounds
    }

    /// Feeds the counterpart's latest offer to the opponent model and
    /// rebuilds the counterpart and joint sets against the resulting
    /// estimate, whether or not the estimate moved.
    pub fn observe_offer(
        &mut self,
        offer: &Outcome,
        relative_time: f64,
        config: &StrategyConfig,
    ) -> Option<EstimateUpdate> {
        let opponent_utility = self.opponent.utility(offer);
        let update = self.model.observe(opponent_utility, relative_time, config);
        self.sets
            .refresh(self.opponent.as_ref(), self.model.reserved_value_estimate());
        update
    }

    /// Borrowed view for the acceptance and bidding strategies.
    #[must_use]
    pub fn context<'a>(&'a self, config: &'a StrategyConfig) -> DecisionContext<'a> {
        DecisionContext {
            own: self.own.as_ref(),
            opponent: self.opponent.as_ref(),
            sets: &self.sets,
            model: &self.model,
            config,
        }
    }

    /// Whether `offer` should be accepted at `relative_time`.
    #[must_use]
    pub fn accept(&self, offer: &Outcome, relative_time: f64, config: &StrategyConfig) -> bool {
        acceptance::accept(&self.context(config), offer, relative_time)
    }

    /// The counter-offer to make, if any outcome is rational for us.
    #[must_use]
    pub fn propose<'a>(&'a self, config: &'a StrategyConfig) -> Option<&'a Outcome> {
        bidding::propose(&self.context(config))
    }

    /// Summary of the session so far.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            started_at: self.started_at,
            rounds: self.rounds,
            style: self.model.style(),
            reserved_value_estimate: self.model.reserved_value_estimate(),
            lowest_offer_utility: self.model.lowest_offer_utility(),
            offers_seen: self.model.offers_seen(),
        }
    }
}

/// What the strategy learned during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier.
    pub id: SessionId,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// Decisions made.
    pub rounds: u32,
    /// Final classified counterpart style.
    pub style: OpponentStyle,
    /// Final estimate of the counterpart's reserved value.
    pub reserved_value_estimate: f64,
    /// Lowest counterpart utility offered, if any offer was received.
    pub lowest_offer_utility: Option<f64>,
    /// Offers received.
    pub offers_seen: usize,
}
