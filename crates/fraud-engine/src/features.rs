use crate::graph::NodeProfile;

/// Width of every node feature vector. Fixed by the trained weights.
pub const FEATURE_WIDTH: usize = 5;

/// Amount divisor used at training time. Changing it without retraining
/// silently breaks the numeric contract with the weight blob.
pub const AMOUNT_SCALE: f32 = 1000.0;

/// Cold-start defaults for identifiers absent from the trained feature
/// table: a young-ish account with neutral flow ratio, negligible pagerank
/// and a single observed transaction.
pub const COLD_START_AGE_DAYS: f32 = 30.0;
pub const COLD_START_IN_OUT_RATIO: f32 = 1.0;
pub const COLD_START_PAGERANK: f32 = 0.0001;
pub const COLD_START_VELOCITY: f32 = 1.0;

/// Derive the 5-scalar feature vector for a node in the context of the
/// current transaction. Pure; the profile is read-only and the amount is
/// the only live signal.
///
/// Known nodes reuse their persisted profile, with the velocity bumped by
/// one to reflect the transaction being scored. Unknown nodes get the
/// cold-start defaults so that inference stays available for accounts the
/// batch job has never seen.
pub fn build(profile: Option<&NodeProfile>, amount: f64) -> [f32; FEATURE_WIDTH] {
    let scaled_amount = amount as f32 / AMOUNT_SCALE;
    match profile {
        Some(p) => [
            p.account_age_days,
            scaled_amount,
            p.in_out_ratio,
            p.pagerank,
            p.tx_velocity + 1.0,
        ],
        None => [
            COLD_START_AGE_DAYS,
            scaled_amount,
            COLD_START_IN_OUT_RATIO,
            COLD_START_PAGERANK,
            COLD_START_VELOCITY,
        ],
    }
}
