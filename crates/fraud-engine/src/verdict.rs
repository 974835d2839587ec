use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraud probability above which a transaction is flagged CRITICAL.
pub const CRITICAL_THRESHOLD: f32 = 0.85;
/// Fraud probability above which a transaction is flagged SUSPICIOUS.
pub const SUSPICIOUS_THRESHOLD: f32 = 0.6;

/// Categorical risk label derived from the fraud probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Safe,
    Suspicious,
    Critical,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Safe => "SAFE",
            Verdict::Suspicious => "SUSPICIOUS",
            Verdict::Critical => "CRITICAL",
        };
        f.write_str(label)
    }
}

/// Threshold the fraud probability. Both comparisons are strict, so exactly
/// 0.85 stays SUSPICIOUS and exactly 0.6 stays SAFE.
pub fn classify(fraud_probability: f32) -> Verdict {
    if fraud_probability > CRITICAL_THRESHOLD {
        Verdict::Critical
    } else if fraud_probability > SUSPICIOUS_THRESHOLD {
        Verdict::Suspicious
    } else {
        Verdict::Safe
    }
}
