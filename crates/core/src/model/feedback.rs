use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeedbackPolicyError {
    #[error("thresholds must be strictly descending (got {excellent}, {good}, {fair})")]
    NotDescending { excellent: u8, good: u8, fair: u8 },

    #[error("threshold above 100: {0}")]
    OutOfRange(u8),

    #[error("expected three comma-separated thresholds, got: {0}")]
    Malformed(String),
}

/// Qualitative band a percentage falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackTier {
    Excellent,
    Good,
    Fair,
    NeedsPractice,
}

impl FeedbackTier {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FeedbackTier::Excellent => "excellent",
            FeedbackTier::Good => "good",
            FeedbackTier::Fair => "fair",
            FeedbackTier::NeedsPractice => "needs practice",
        }
    }

    /// Encouragement line shown when recommending the next module.
    #[must_use]
    pub fn encouragement(self) -> &'static str {
        match self {
            FeedbackTier::Excellent => "Outstanding work! You're ready for the next challenge.",
            FeedbackTier::Good => "Great job! Let's continue building your skills.",
            FeedbackTier::Fair => {
                "Good progress! The next module will help strengthen your knowledge."
            }
            FeedbackTier::NeedsPractice => {
                "Keep learning! Each module builds important cybersecurity skills."
            }
        }
    }
}

impl fmt::Display for FeedbackTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower bounds of the tier ladder.
///
/// Bands are half-open: `[excellent, 100]`, `[good, excellent)`, `[fair, good)`, `[0, fair)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackPolicy {
    excellent: u8,
    good: u8,
    fair: u8,
}

impl FeedbackPolicy {
    /// # Errors
    ///
    /// Returns `FeedbackPolicyError` unless `100 >= excellent > good > fair`.
    pub fn new(excellent: u8, good: u8, fair: u8) -> Result<Self, FeedbackPolicyError> {
        if excellent > 100 {
            return Err(FeedbackPolicyError::OutOfRange(excellent));
        }
        if !(excellent > good && good > fair) {
            return Err(FeedbackPolicyError::NotDescending {
                excellent,
                good,
                fair,
            });
        }
        Ok(Self {
            excellent,
            good,
            fair,
        })
    }

    #[must_use]
    pub fn tier_for(&self, percentage: u8) -> FeedbackTier {
        if percentage >= self.excellent {
            FeedbackTier::Excellent
        } else if percentage >= self.good {
            FeedbackTier::Good
        } else if percentage >= self.fair {
            FeedbackTier::Fair
        } else {
            FeedbackTier::NeedsPractice
        }
    }

    #[must_use]
    pub fn thresholds(&self) -> (u8, u8, u8) {
        (self.excellent, self.good, self.fair)
    }
}

impl Default for FeedbackPolicy {
    fn default() -> Self {
        Self {
            excellent: 90,
            good: 75,
            fair: 60,
        }
    }
}

impl FromStr for FeedbackPolicy {
    type Err = FeedbackPolicyError;

    /// Parses `"90,75,60"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<u8> = s
            .split(',')
            .map(|p| p.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .map_err(|_| FeedbackPolicyError::Malformed(s.to_owned()))?;
        match parts.as_slice() {
            [excellent, good, fair] => Self::new(*excellent, *good, *fair),
            _ => Err(FeedbackPolicyError::Malformed(s.to_owned())),
        }
    }
}
