//! Outcomes and outcome spaces.
//!
//! An [`Outcome`] is one fully specified candidate agreement: a tuple of issue
//! values. Outcomes compare and hash structurally so they can be intersected as
//! sets. An [`OutcomeSpace`] produces the candidate outcomes a session reasons
//! over, either by full enumeration or by seeded sampling.

use std::fmt;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// A single value taken by one issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssueValue {
    /// Discrete integer value.
    Integer(i64),
    /// Continuous value.
    Real(f64),
    /// Categorical label.
    Text(String),
}

impl PartialEq for IssueValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => real_bits(*a) == real_bits(*b),
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for IssueValue {}

impl Hash for IssueValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Integer(v) => v.hash(state),
            Self::Real(v) => real_bits(*v).hash(state),
            Self::Text(v) => v.hash(state),
        }
    }
}

/// Bit pattern used for equality and hashing of reals, so that `Eq` and
/// `Hash` agree. Signed zeros collapse to `0.0`; each NaN payload compares
/// equal only to itself.
fn real_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

impl fmt::Display for IssueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v:.3}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for IssueValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for IssueValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for IssueValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// One candidate agreement: a value for every issue, in issue order.
///
/// Two outcomes are equal when their issue values are equal. Reals compare by
/// bit pattern after folding `-0.0` into `0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome(Vec<IssueValue>);

impl Outcome {
    /// Creates an outcome from its issue values.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = IssueValue>) -> Self {
        Self(values.into_iter().collect())
    }

    /// Returns the issue values.
    #[must_use]
    pub fn values(&self) -> &[IssueValue] {
        &self.0
    }

    /// Returns the value of the issue at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&IssueValue> {
        self.0.get(index)
    }

    /// Number of issues in this outcome.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the outcome carries no issue values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}

/// The set of values one issue can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueDomain {
    /// A finite list of values.
    Discrete {
        /// Allowed values, in enumeration order.
        values: Vec<IssueValue>,
    },
    /// A closed real interval.
    Continuous {
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
    },
}

/// A named negotiation issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue name.
    pub name: String,
    /// Values the issue can take.
    pub domain: IssueDomain,
}

impl Issue {
    /// Creates a discrete issue.
    #[must_use]
    pub fn discrete(name: impl Into<String>, values: impl IntoIterator<Item = IssueValue>) -> Self {
        Self {
            name: name.into(),
            domain: IssueDomain::Discrete {
                values: values.into_iter().collect(),
            },
        }
    }

    /// Creates a discrete integer issue with values `0..count`.
    #[must_use]
    pub fn integer_range(name: impl Into<String>, count: i64) -> Self {
        Self::discrete(name, (0..count).map(IssueValue::Integer))
    }

    /// Creates a continuous issue over `[min, max]`.
    #[must_use]
    pub fn continuous(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            domain: IssueDomain::Continuous { min, max },
        }
    }

    /// Number of values for a discrete issue, `None` for a continuous one.
    #[must_use]
    pub fn cardinality(&self) -> Option<usize> {
        match &self.domain {
            IssueDomain::Discrete { values } => Some(values.len()),
            IssueDomain::Continuous { .. } => None,
        }
    }

    fn sample(&self, rng: &mut StdRng) -> IssueValue {
        match &self.domain {
            IssueDomain::Discrete { values } => values[rng.gen_range(0..values.len())].clone(),
            IssueDomain::Continuous { min, max } => {
                if min >= max {
                    IssueValue::Real(*min)
                } else {
                    IssueValue::Real(rng.gen_range(*min..=*max))
                }
            }
        }
    }
}

/// Source of the candidate outcomes a session reasons over.
pub trait OutcomeSpace {
    /// Enumerates every outcome when the space is finite and no larger than
    /// `max_outcomes`; otherwise samples `max_outcomes` of them.
    ///
    /// Explicit outcome lists (`[Outcome]`, `Vec<Outcome>`) are already
    /// enumerated and are truncated to their first `max_outcomes` entries.
    fn enumerate_or_sample(&self, max_outcomes: usize) -> Vec<Outcome>;
}

impl OutcomeSpace for [Outcome] {
    fn enumerate_or_sample(&self, max_outcomes: usize) -> Vec<Outcome> {
        self.iter().take(max_outcomes).cloned().collect()
    }
}

impl OutcomeSpace for Vec<Outcome> {
    fn enumerate_or_sample(&self, max_outcomes: usize) -> Vec<Outcome> {
        self.as_slice().enumerate_or_sample(max_outcomes)
    }
}

/// Cartesian product of named issues.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueSpace {
    issues: Vec<Issue>,
    seed: u64,
}

impl IssueSpace {
    /// Creates an issue space. Sampling uses a fixed default seed.
    pub fn new(issues: Vec<Issue>) -> Result<Self, AgentError> {
        Self::with_seed(issues, 0)
    }

    /// Creates an issue space whose sampling is driven by `seed`.
    pub fn with_seed(issues: Vec<Issue>, seed: u64) -> Result<Self, AgentError> {
        if issues.is_empty() {
            return Err(AgentError::OutcomeSpace("no issues".into()));
        }
        for issue in &issues {
            match &issue.domain {
                IssueDomain::Discrete { values } if values.is_empty() => {
                    return Err(AgentError::OutcomeSpace(format!(
                        "issue '{}' has no values",
                        issue.name
                    )));
                }
                IssueDomain::Continuous { min, max }
                    if !(min <= max && (max - min).is_finite()) =>
                {
                    return Err(AgentError::OutcomeSpace(format!(
                        "issue '{}' has invalid interval [{min}, {max}]",
                        issue.name
                    )));
                }
                _ => {}
            }
        }
        Ok(Self { issues, seed })
    }

    /// Returns the issues.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Total number of outcomes, `None` if any issue is continuous or the
    /// product overflows.
    #[must_use]
    pub fn cardinality(&self) -> Option<usize> {
        self.issues
            .iter()
            .try_fold(1usize, |acc, issue| acc.checked_mul(issue.cardinality()?))
    }

    fn enumerate(&self) -> Vec<Outcome> {
        let mut rows: Vec<Vec<IssueValue>> = vec![Vec::with_capacity(self.issues.len())];
        for issue in &self.issues {
            let IssueDomain::Discrete { values } = &issue.domain else {
                return Vec::new();
            };
            rows = rows
                .into_iter()
                .flat_map(|row| {
                    values.iter().map(move |value| {
                        let mut next = row.clone();
                        next.push(value.clone());
                        next
                    })
                })
                .collect();
        }
        rows.into_iter().map(Outcome).collect()
    }

    fn sample(&self, count: usize) -> Vec<Outcome> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..count)
            .map(|_| Outcome(self.issues.iter().map(|issue| issue.sample(&mut rng)).collect()))
            .collect()
    }
}

impl OutcomeSpace for IssueSpace {
    fn enumerate_or_sample(&self, max_outcomes: usize) -> Vec<Outcome> {
        match self.cardinality() {
            Some(n) if n <= max_outcomes => self.enumerate(),
            _ => self.sample(max_outcomes),
        }
    }
}
