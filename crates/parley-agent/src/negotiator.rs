//! Negotiator entry points.
//!
//! The host mechanism drives a [`Negotiator`] through two calls:
//! [`Negotiator::on_session_start`] once utilities are known, then
//! [`Negotiator::decide`] exactly once per round.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::StrategyConfig;
use crate::error::AgentError;
use crate::outcome::{Outcome, OutcomeSpace};
use crate::session::{Session, SessionSummary};
use crate::state::NegotiationState;
use crate::utility::SharedUtility;

/// Why the negotiator asks the mechanism to end the negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// No session is running, typically because a utility function was
    /// missing at session start.
    NoActiveSession,
    /// No outcome is worth more to us than our reserved value.
    NoAcceptableProposal,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoActiveSession => "no active session",
            Self::NoAcceptableProposal => "no acceptable proposal",
        })
    }
}

/// The negotiator's answer for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum Response {
    /// Accept the counterpart's offer.
    Accept {
        /// The accepted offer.
        offer: Outcome,
    },
    /// Reject the counterpart's offer (or open) with a counter-offer.
    Reject {
        /// Our counter-offer.
        counter_offer: Outcome,
    },
    /// Leave the negotiation.
    EndNegotiation {
        /// Why the negotiation ends.
        reason: EndReason,
    },
}

impl Response {
    /// Creates an Accept response.
    #[must_use]
    pub const fn accept(offer: Outcome) -> Self {
        Self::Accept { offer }
    }

    /// Creates a Reject response carrying a counter-offer.
    #[must_use]
    pub const fn reject(counter_offer: Outcome) -> Self {
        Self::Reject { counter_offer }
    }

    /// Creates an `EndNegotiation` response.
    #[must_use]
    pub const fn end(reason: EndReason) -> Self {
        Self::EndNegotiation { reason }
    }

    /// Returns true if this is an Accept response.
    #[must_use]
    pub const fn is_accept(&self) -> bool {
        matches!(self, Self::Accept { .. })
    }

    /// Returns true if this is a Reject response.
    #[must_use]
    pub const fn is_reject(&self) -> bool {
        matches!(self, Self::Reject { .. })
    }

    /// Returns true if this ends the negotiation.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        matches!(self, Self::EndNegotiation { .. })
    }

    /// The counter-offer of a Reject response.
    #[must_use]
    pub const fn counter_offer(&self) -> Option<&Outcome> {
        match self {
            Self::Reject { counter_offer } => Some(counter_offer),
            _ => None,
        }
    }
}

/// Inputs available when a negotiation starts.
pub struct SessionContext<'a> {
    /// Our utility function, if the mechanism provided one.
    pub own_utility: Option<SharedUtility>,
    /// The counterpart's utility function, if the mechanism provided one.
    pub opponent_utility: Option<SharedUtility>,
    /// Outcomes under negotiation.
    pub outcome_space: &'a dyn OutcomeSpace,
}

impl<'a> SessionContext<'a> {
    /// Creates a context with both utility functions present.
    #[must_use]
    pub fn new(own: SharedUtility, opponent: SharedUtility, outcome_space: &'a dyn OutcomeSpace) -> Self {
        Self {
            own_utility: Some(own),
            opponent_utility: Some(opponent),
            outcome_space,
        }
    }
}

/// One side of a bilateral alternating-offers negotiation.
#[derive(Default)]
pub struct Negotiator {
    config: StrategyConfig,
    session: Option<Session>,
}

impl Negotiator {
    /// Creates a negotiator with a validated configuration.
    ///
    /// An invalid configuration is reported as [`AgentError::Config`].
    pub fn new(config: StrategyConfig) -> Result<Self, AgentError> {
        config.validate()?;
        Ok(Self {
            config,
            session: None,
        })
    }

    /// Strategy configuration.
    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// The running session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Returns true if a session is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a new session, discarding any previous one.
    ///
    /// Without both utility functions no session is created and every
    /// subsequent [`decide`](Self::decide) ends the negotiation.
    pub fn on_session_start(&mut self, ctx: SessionContext<'_>) {
        if let Some(previous) = self.session.take() {
            debug!(session = %previous.id(), "discarding previous session");
        }
        let (Some(own), Some(opponent)) = (ctx.own_utility, ctx.opponent_utility) else {
            warn!("utility function unavailable; session will end immediately");
            return;
        };

        let session = Session::start(own, opponent, ctx.outcome_space, &self.config);
        info!(
            session = %session.id(),
            outcomes = session.sets().all().len(),
            own_rational = session.sets().own().len(),
            joint = session.sets().joint().len(),
            opponent_reserved = session.model().reserved_value_estimate(),
            "negotiation session started"
        );
        self.session = Some(session);
    }

    /// Decides the response to the current round.
    ///
    /// Updates the opponent model with the received offer, then either
    /// accepts it or proposes a counter-offer. With no offer (opening round)
    /// only a counter-offer is produced.
    pub fn decide(&mut self, state: &NegotiationState) -> Response {
        let Some(session) = self.session.as_mut() else {
            return Response::end(EndReason::NoActiveSession);
        };
        let round = session.next_round();
        let t = state.relative_time();

        if let Some(offer) = &state.current_offer {
            session.observe_offer(offer, t, &self.config);
            if session.accept(offer, t, &self.config) {
                debug!(
                    session = %session.id(),
                    round,
                    relative_time = t,
                    utility = session.own_utility().utility(offer),
                    "accepting offer"
                );
                return Response::accept(offer.clone());
            }
        }

        match session.propose(&self.config) {
            Some(bid) => {
                debug!(
                    session = %session.id(),
                    round,
                    relative_time = t,
                    style = %session.model().style(),
                    utility = session.own_utility().utility(bid),
                    opponent_utility = session.opponent_utility().utility(bid),
                    "proposing counter-offer"
                );
                Response::reject(bid.clone())
            }
            None => {
                warn!(session = %session.id(), round, "no outcome exceeds reserved value");
                Response::end(EndReason::NoAcceptableProposal)
            }
        }
    }

    /// Whether the running session would accept `state`'s offer, without
    /// updating the opponent model.
    #[must_use]
    pub fn accept(&self, state: &NegotiationState) -> bool {
        match (&self.session, &state.current_offer) {
            (Some(session), Some(offer)) => {
                session.accept(offer, state.relative_time(), &self.config)
            }
            _ => false,
        }
    }

    /// The counter-offer the running session would make now.
    #[must_use]
    pub fn propose(&self) -> Option<&Outcome> {
        self.session.as_ref()?.propose(&self.config)
    }

    /// Ends the running session and returns what was learned.
    pub fn on_session_end(&mut self) -> Option<SessionSummary> {
        let session = self.session.take()?;
        let summary = session.summary();
        info!(
            session = %summary.id,
            rounds = summary.rounds,
            style = %summary.style,
            opponent_reserved = summary.reserved_value_estimate,
            "negotiation session ended"
        );
        Some(summary)
    }
}
