//! Counterpart behavior classification.
//!
//! Looks at how fast the counterpart's own utility declines across its recent
//! offers and labels it [`OpponentStyle::Boulware`] (barely concedes) or
//! [`OpponentStyle::Conceder`] (concedes quickly).

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;

/// Classified negotiation style of the counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum OpponentStyle {
    /// Not enough offers observed yet.
    #[default]
    Unknown,
    /// Slow to concede.
    Boulware,
    /// Fast to concede.
    Conceder,
}

impl fmt::Display for OpponentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::Boulware => "boulware",
            Self::Conceder => "conceder",
        })
    }
}

/// Result of classifying the counterpart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Classified style.
    pub style: OpponentStyle,
    /// Exponent shaping our acceptance threshold against this style.
    pub concession_exponent: f64,
}

impl Classification {
    /// The neutral classification used before enough offers are seen.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            style: OpponentStyle::Unknown,
            concession_exponent: 1.0,
        }
    }

    fn of(style: OpponentStyle, config: &StrategyConfig) -> Self {
        Self {
            style,
            concession_exponent: config.profile(style).concession_exponent,
        }
    }
}

impl Default for Classification {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Average decline of the counterpart's utility per unit of relative time,
/// from the first to the last offer in `window`.
///
/// Returns `None` for an empty window or a non-positive `relative_time`.
#[must_use]
pub fn concession_slope(window: &VecDeque<f64>, relative_time: f64) -> Option<f64> {
    if relative_time <= 0.0 {
        return None;
    }
    let first = window.front()?;
    let last = window.back()?;
    Some((first - last) / relative_time)
}

/// Classifies the counterpart from its offer history.
///
/// `offers_seen` counts every offer received so far; `window` holds only the
/// most recent ones. Returns `None` when the history cannot be evaluated
/// (non-positive relative time), in which case the caller keeps its previous
/// classification.
#[must_use]
pub fn classify(
    window: &VecDeque<f64>,
    offers_seen: usize,
    relative_time: f64,
    config: &StrategyConfig,
) -> Option<Classification> {
    if offers_seen < config.min_offers || window.is_empty() {
        return Some(Classification::unknown());
    }
    let slope = concession_slope(window, relative_time)?;
    let style = if slope < config.boulware_slope_threshold {
        OpponentStyle::Boulware
    } else {
        OpponentStyle::Conceder
    };
    Some(Classification::of(style, config))
}
