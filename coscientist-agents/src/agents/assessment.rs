//! Review Assessment Extraction
//!
//! Turns free-form review text into an [`AssessmentSummary`] with lexical
//! heuristics. This is a crude polarity proxy, not sentiment analysis.
//!
//! All matching here is case-insensitive *substring* containment, unlike the
//! whole-word checks in [`crate::validators`]: "invalidate" counts as
//! "invalid" and "limitations" or "delimitation" count as "limitation".
//! Negation is not recognised: "not flawed" counts as "flawed" and "no
//! weaknesses" counts as "weak".

use crate::contracts::AssessmentSummary;

/// Terms counted in favor of a hypothesis.
pub const POSITIVE_TERMS: &[&str] = &[
    "strong",
    "valid",
    "plausible",
    "consistent",
    "novel",
    "innovative",
];

/// Terms counted against a hypothesis.
pub const NEGATIVE_TERMS: &[&str] = &[
    "weak",
    "invalid",
    "implausible",
    "inconsistent",
    "contradicts",
    "flawed",
];

/// Score when the review contains no polarity term at all.
pub const NEUTRAL_SCORE: f64 = 0.5;

const INVALIDITY_MARKERS: &[&str] = &["invalid", "implausible"];
const ETHICAL_MARKERS: &[&str] = &["ethical concerns", "ethical issues"];
const PRACTICAL_MARKERS: &[&str] = &["impractical", "limitation"];

fn contains_any(lower: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| lower.contains(term))
}

fn count_present(lower: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|term| lower.contains(*term)).count()
}

/// Derive the structured summary of a review.
///
/// `strengths` and `weaknesses` are reserved and always empty.
pub fn extract_assessment(review: &str) -> AssessmentSummary {
    let lower = review.to_lowercase();

    AssessmentSummary {
        valid: !contains_any(&lower, INVALIDITY_MARKERS),
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        ethical_concerns: contains_any(&lower, ETHICAL_MARKERS),
        practical_limitations: contains_any(&lower, PRACTICAL_MARKERS),
        overall_score: estimate_score(review),
    }
}

/// Ratio of positive terms present to all polarity terms present.
///
/// Each term counts at most once however often it occurs. Returns
/// [`NEUTRAL_SCORE`] when no term is present.
pub fn estimate_score(review: &str) -> f64 {
    let lower = review.to_lowercase();
    let positive = count_present(&lower, POSITIVE_TERMS);
    let negative = count_present(&lower, NEGATIVE_TERMS);

    let total = positive + negative;
    if total == 0 {
        return NEUTRAL_SCORE;
    }

    positive as f64 / total as f64
}
