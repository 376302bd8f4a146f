//! # parley-agent
//!
//! Strategy engine for one side of a bilateral alternating-offers negotiation.
//!
//! This crate provides:
//!
//! - **Outcomes and utilities**: [`Outcome`], [`IssueSpace`] and the [`UtilityFunction`] trait
//! - **Rational filtering**: [`RationalSets`] of outcomes each side prefers over its reserved value
//! - **Opponent modeling**: [`OpponentModel`] estimating the counterpart's reserved value and style
//! - **Acceptance and bidding**: time-dependent [`acceptance`] and style-aware [`bidding`]
//! - **Negotiator**: [`Negotiator`] driving a session one round at a time
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use parley_agent::{
//!     IssueValue, NegotiationState, Negotiator, Outcome, SessionContext, TableUtility,
//! };
//!
//! let outcomes: Vec<Outcome> = (0..=10)
//!     .map(|i| Outcome::new([IssueValue::Integer(i)]))
//!     .collect();
//!
//! // Outcome i is worth i/10 to us and 1 - i/10 to the counterpart.
//! let own: TableUtility = (0..=10)
//!     .map(|i| (Outcome::new([IssueValue::Integer(i)]), f64::from(i as u8) / 10.0))
//!     .collect();
//! let opponent: TableUtility = (0..=10)
//!     .map(|i| (Outcome::new([IssueValue::Integer(i)]), 1.0 - f64::from(i as u8) / 10.0))
//!     .collect();
//!
//! let mut negotiator = Negotiator::default();
//! negotiator.on_session_start(SessionContext::new(
//!     Arc::new(own.with_reserved_value(0.35)),
//!     Arc::new(opponent),
//!     &outcomes,
//! ));
//!
//! // Opening round: no offer received yet, so we only propose.
//! let response = negotiator.decide(&NegotiationState::opening(20));
//! assert!(response.is_reject());
//!
//! let summary = negotiator.on_session_end();
//! assert!(summary.is_some());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod acceptance;
pub mod bidding;
pub mod classifier;
pub mod config;
pub mod error;
pub mod filter;
pub mod negotiator;
pub mod opponent;
pub mod outcome;
pub mod rational;
pub mod session;
pub mod state;
pub mod utility;

pub use error::{AgentError, ConfigError};

// Re-exports for convenience
pub use classifier::{Classification, OpponentStyle};
pub use config::{BidFilter, StrategyConfig, StrategyConfigBuilder, StyleProfile};
pub use filter::{filter_rational, intersect_rational};
pub use negotiator::{EndReason, Negotiator, Response, SessionContext};
pub use opponent::{EstimateUpdate, OpponentModel};
pub use outcome::{Issue, IssueDomain, IssueSpace, IssueValue, Outcome, OutcomeSpace};
pub use rational::RationalSets;
pub use session::{DecisionContext, Session, SessionId, SessionSummary};
pub use state::NegotiationState;
pub use utility::{FnUtility, LinearAdditiveUtility, SharedUtility, TableUtility, UtilityFunction, ValueScore};
