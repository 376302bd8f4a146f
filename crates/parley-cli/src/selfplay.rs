//! Self-play: two negotiators alternating offers over a synthetic issue space.
//!
//! Negotiator `A` opens at step 0, `B` answers at step 1, and so on until one
//! side accepts, one side ends the negotiation, or the steps run out.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use parley_agent::{
    EndReason, Issue, IssueSpace, LinearAdditiveUtility, NegotiationState, Negotiator, Outcome,
    Response, SessionContext, SessionSummary, SharedUtility, StrategyConfig, UtilityFunction,
    ValueScore,
};

use crate::error::CliError;

const AGENTS: [&str; 2] = ["A", "B"];

/// Largest number of issues a synthetic space may have.
pub const MAX_ISSUES: usize = 32;

/// Largest number of values per synthetic issue.
pub const MAX_VALUES: u32 = 1000;

/// Parameters of one self-play run.
#[derive(Debug, Clone, PartialEq)]
pub struct Matchup {
    /// Strategy configuration shared by both negotiators.
    pub config: StrategyConfig,
    /// Steps before timeout.
    pub steps: u32,
    /// Number of issues.
    pub issues: usize,
    /// Values per issue.
    pub values: u32,
    /// Seed for preferences and sampling.
    pub seed: u64,
    /// Reserved values of `A` and `B`.
    pub reserved: [f64; 2],
    /// Record every counter-offer.
    pub trace: bool,
}

impl Default for Matchup {
    fn default() -> Self {
        Self {
            config: StrategyConfig::default(),
            steps: 100,
            issues: 3,
            values: 10,
            seed: 42,
            reserved: [0.3, 0.3],
            trace: false,
        }
    }
}

impl Matchup {
    /// Checks the run parameters.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.steps == 0 {
            return Err(CliError::InvalidArgument("steps must be positive".into()));
        }
        if !(1..=MAX_ISSUES).contains(&self.issues) {
            return Err(CliError::InvalidArgument(format!(
                "issues must be in 1..={MAX_ISSUES}, got {}",
                self.issues
            )));
        }
        if !(1..=MAX_VALUES).contains(&self.values) {
            return Err(CliError::InvalidArgument(format!(
                "values must be in 1..={MAX_VALUES}, got {}",
                self.values
            )));
        }
        for (name, rv) in AGENTS.iter().zip(self.reserved) {
            if !(0.0..=1.0).contains(&rv) {
                return Err(CliError::InvalidArgument(format!(
                    "reserved value of {name} must be in [0, 1], got {rv}"
                )));
            }
        }
        self.config.validate()?;
        Ok(())
    }

    /// The synthetic issue space: `issues` integer issues of `values` values.
    pub fn space(&self) -> Result<IssueSpace, CliError> {
        let issues = (0..self.issues)
            .map(|i| Issue::integer_range(format!("issue{i}"), i64::from(self.values)))
            .collect();
        Ok(IssueSpace::with_seed(issues, self.seed)?)
    }

    /// Seeded linear additive utilities for `A` and `B`.
    ///
    /// `A` prefers high values on every issue; `B` prefers low values on most
    /// issues, so the two are mostly but not entirely opposed.
    #[must_use]
    pub fn utilities(&self) -> [SharedUtility; 2] {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let max = f64::from(self.values.saturating_sub(1));
        let mut a = Vec::with_capacity(self.issues);
        let mut b = Vec::with_capacity(self.issues);
        for _ in 0..self.issues {
            a.push((
                rng.gen_range(0.1..1.0),
                ValueScore::Linear { min: 0.0, max, increasing: true },
            ));
            b.push((
                rng.gen_range(0.1..1.0),
                ValueScore::Linear { min: 0.0, max, increasing: rng.gen_bool(0.25) },
            ));
        }
        [
            Arc::new(LinearAdditiveUtility::new(a, self.reserved[0])),
            Arc::new(LinearAdditiveUtility::new(b, self.reserved[1])),
        ]
    }

    /// Plays the negotiation to completion.
    pub fn run(&self) -> Result<PlayReport, CliError> {
        self.validate()?;
        let space = self.space()?;
        let utilities = self.utilities();
        let [ua, ub] = utilities.clone();

        let mut agents = [
            Negotiator::new(self.config.clone())?,
            Negotiator::new(self.config.clone())?,
        ];
        agents[0].on_session_start(SessionContext::new(ua.clone(), ub.clone(), &space));
        agents[1].on_session_start(SessionContext::new(ub, ua, &space));
        let outcomes = agents[0].session().map_or(0, |s| s.sets().all().len());

        let mut offer: Option<Outcome> = None;
        let mut status = PlayStatus::Timeout;
        let mut agreement = None;
        let mut steps_used = self.steps;
        let mut trace = Vec::new();

        for step in 0..self.steps {
            let turn = (step % 2) as usize;
            let state = NegotiationState {
                current_offer: offer.take(),
                step,
                n_steps: Some(self.steps),
                relative_time: None,
            };
            match agents[turn].decide(&state) {
                Response::Accept { offer: accepted } => {
                    info!(step, agent = AGENTS[turn], outcome = %accepted, "agreement reached");
                    agreement = Some(accepted);
                    status = PlayStatus::Agreement;
                    steps_used = step + 1;
                    break;
                }
                Response::Reject { counter_offer } => {
                    debug!(step, agent = AGENTS[turn], offer = %counter_offer, "counter-offer");
                    if self.trace {
                        trace.push(TraceEntry {
                            step,
                            agent: AGENTS[turn].to_string(),
                            offer: counter_offer.clone(),
                        });
                    }
                    offer = Some(counter_offer);
                }
                Response::EndNegotiation { reason } => {
                    info!(step, agent = AGENTS[turn], %reason, "negotiation ended");
                    status = PlayStatus::Ended {
                        by: AGENTS[turn].to_string(),
                        reason,
                    };
                    steps_used = step + 1;
                    break;
                }
            }
        }
        if status == PlayStatus::Timeout {
            info!(steps = self.steps, "negotiation timed out");
        }

        let summaries = agents.each_mut().map(Negotiator::on_session_end);
        let agents = AGENTS
            .iter()
            .zip(utilities)
            .zip(summaries)
            .map(|((name, utility), summary)| AgentReport {
                name: (*name).to_string(),
                reserved_value: utility.reserved_value(),
                utility: agreement.as_ref().map(|o| utility.utility(o)),
                summary,
            })
            .collect();

        Ok(PlayReport {
            status,
            agreement,
            steps: self.steps,
            steps_used,
            outcomes,
            agents,
            trace,
        })
    }
}

/// How a self-play run finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlayStatus {
    /// One side accepted the other's offer.
    Agreement,
    /// One side ended the negotiation.
    Ended {
        /// Negotiator that ended it.
        by: String,
        /// Why it ended.
        reason: EndReason,
    },
    /// The steps ran out.
    Timeout,
}

/// Per-negotiator result.
#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    /// Negotiator name.
    pub name: String,
    /// Its reserved value.
    pub reserved_value: f64,
    /// Its utility for the agreement, if any.
    pub utility: Option<f64>,
    /// What it learned about the counterpart.
    pub summary: Option<SessionSummary>,
}

/// One counter-offer made during the run.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    /// Step of the offer.
    pub step: u32,
    /// Negotiator that made it.
    pub agent: String,
    /// The offer.
    pub offer: Outcome,
}

/// Result of a self-play run.
#[derive(Debug, Clone, Serialize)]
pub struct PlayReport {
    /// How the run finished.
    #[serde(flatten)]
    pub status: PlayStatus,
    /// Agreed outcome, if any.
    pub agreement: Option<Outcome>,
    /// Step limit.
    pub steps: u32,
    /// Steps actually played.
    pub steps_used: u32,
    /// Outcomes each negotiator reasoned over.
    pub outcomes: usize,
    /// Both negotiators.
    pub agents: Vec<AgentReport>,
    /// Counter-offers, when tracing.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceEntry>,
}
