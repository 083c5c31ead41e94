//! Confidence model
//!
//! Single source of truth for how confidence is assigned to incoming facts,
//! discounted through inference, and decayed by feedback and age. Every other
//! crate calls into these functions rather than doing its own arithmetic.

/// Confidence of a fact matching the curated registry
pub const BASELINE_CONFIDENCE: f64 = 1.0;

/// Ceiling for unverified facts supplied by the extraction collaborator
pub const MODEL_CONFIDENCE_CAP: f64 = 0.85;

/// Discount applied when deriving the reverse of a symmetric relation
pub const SYMMETRY_DISCOUNT: f64 = 0.95;

/// Discount applied to competitor-chain influence derivations
pub const COMPETITOR_CHAIN_DISCOUNT: f64 = 0.8;

/// Feedback score at or below which a fact is locked to [`FEEDBACK_CONFIDENCE_CAP`]
pub const FEEDBACK_LOCK_SCORE: i64 = -3;

/// Ceiling for facts that reached the feedback lock
pub const FEEDBACK_CONFIDENCE_CAP: f64 = 0.5;

/// Lowest confidence age-based decay will push a fact to
pub const DECAY_FLOOR: f64 = 0.1;

/// Default threshold for pattern queries
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;

/// Whether a value is a usable confidence (finite, within [0, 1])
pub fn is_valid_confidence(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// Cap an unverified, externally supplied confidence
///
/// # Examples
///
/// ```
/// use factgraph_domain::confidence::cap_model;
///
/// assert_eq!(cap_model(0.97), 0.85);
/// assert_eq!(cap_model(0.6), 0.6);
/// ```
pub fn cap_model(confidence: f64) -> f64 {
    confidence.clamp(0.0, MODEL_CONFIDENCE_CAP)
}

/// Aggregate confidence of a chain: the weakest link
///
/// Returns 0.0 for an empty chain.
pub fn chain_confidence(steps: &[f64]) -> f64 {
    if steps.is_empty() {
        return 0.0;
    }
    steps.iter().copied().fold(f64::INFINITY, f64::min).clamp(0.0, 1.0)
}

/// Confidence of a derived fact: weakest supporting step times the rule discount
///
/// # Examples
///
/// ```
/// use factgraph_domain::confidence::{discount_derived, COMPETITOR_CHAIN_DISCOUNT};
///
/// let c = discount_derived(&[1.0, 0.9], COMPETITOR_CHAIN_DISCOUNT);
/// assert!((c - 0.72).abs() < 1e-9);
/// ```
pub fn discount_derived(steps: &[f64], discount: f64) -> f64 {
    (chain_confidence(steps) * discount).clamp(0.0, 1.0)
}

/// Confidence after feedback has moved the score to `feedback_score`
///
/// Once the score reaches [`FEEDBACK_LOCK_SCORE`] the confidence is capped at
/// [`FEEDBACK_CONFIDENCE_CAP`]. Further negative votes leave it at the cap.
pub fn apply_feedback(confidence: f64, feedback_score: i64) -> f64 {
    if feedback_score <= FEEDBACK_LOCK_SCORE {
        confidence.min(FEEDBACK_CONFIDENCE_CAP)
    } else {
        confidence
    }
}

/// Whether a fact with this feedback score is locked
pub fn is_feedback_locked(feedback_score: i64) -> bool {
    feedback_score <= FEEDBACK_LOCK_SCORE
}

/// Multiply confidence by `(1 - rate)`, never going below [`DECAY_FLOOR`]
///
/// A confidence already under the floor is left where it is.
pub fn decay(confidence: f64, rate: f64) -> f64 {
    let rate = rate.clamp(0.0, 1.0);
    let floor = confidence.min(DECAY_FLOOR);
    (confidence * (1.0 - rate)).max(floor)
}
