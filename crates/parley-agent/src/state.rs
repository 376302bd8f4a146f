//! Per-round negotiation state supplied by the mechanism.

use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// What the mechanism tells the strategy at the start of a round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NegotiationState {
    /// Offer just received from the counterpart, `None` when opening.
    pub current_offer: Option<Outcome>,
    /// Current step, starting at 0.
    pub step: u32,
    /// Total steps allowed, if the mechanism has a step limit.
    pub n_steps: Option<u32>,
    /// Elapsed fraction of the negotiation, if reported directly.
    pub relative_time: Option<f64>,
}

impl NegotiationState {
    /// Opening state: no offer yet.
    #[must_use]
    pub fn opening(n_steps: u32) -> Self {
        Self {
            current_offer: None,
            step: 0,
            n_steps: Some(n_steps),
            relative_time: None,
        }
    }

    /// State for step `step` of `n_steps` with the counterpart's offer.
    #[must_use]
    pub fn at_step(offer: Outcome, step: u32, n_steps: u32) -> Self {
        Self {
            current_offer: Some(offer),
            step,
            n_steps: Some(n_steps),
            relative_time: None,
        }
    }

    /// State at an explicit relative time.
    #[must_use]
    pub fn at_time(offer: Option<Outcome>, relative_time: f64) -> Self {
        Self {
            current_offer: offer,
            step: 0,
            n_steps: None,
            relative_time: Some(relative_time),
        }
    }

    /// Elapsed fraction of the negotiation in `[0, 1]`.
    ///
    /// Uses the reported relative time when present, else `step / n_steps`,
    /// else 0.
    #[must_use]
    pub fn relative_time(&self) -> f64 {
        let t = match (self.relative_time, self.n_steps) {
            (Some(t), _) => t,
            (None, Some(n)) if n > 0 => f64::from(self.step) / f64::from(n),
            _ => 0.0,
        };
        if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
    }
}
