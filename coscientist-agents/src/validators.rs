//! Lexical Validators
//!
//! Quick sanity checks for hypothesis statements and research goals, run
//! before generation or when accepting user input. They never feed into the
//! review pipeline.
//!
//! Every check runs (no short-circuit) and appends one issue on failure. The
//! resulting [`ValidationReport`] tolerates one issue; two or more mark the
//! text invalid.
//!
//! Matching semantics differ per check and are kept as observed:
//!
//! | Check                         | Match                                  |
//! |-------------------------------|----------------------------------------|
//! | relationship vocabulary       | case-insensitive substring             |
//! | vague terms, research verbs   | space-padded whole word                |
//! | variable/relationship pattern | regex `\b` word boundaries             |
//! | goal opening phrase           | prefix of trimmed, lowercased text     |
//!
//! Space padding means a vague term followed by punctuation ("very.") does
//! not match, while the `\b` patterns do. The causal verb pattern accepts
//! the bare and third-person forms ("increase", "increases") but not other
//! inflections ("increased").

use once_cell::sync::Lazy;
use regex::Regex;

use crate::contracts::ValidationReport;

/// Minimum length of a hypothesis, in characters.
pub const HYPOTHESIS_MIN_CHARS: usize = 10;

/// Maximum length of a hypothesis, in characters.
pub const HYPOTHESIS_MAX_CHARS: usize = 1000;

/// Minimum length of a research goal, in characters.
pub const GOAL_MIN_CHARS: usize = 10;

/// Maximum length of a research goal, in characters.
pub const GOAL_MAX_CHARS: usize = 500;

/// Terms suggesting the hypothesis describes a testable relationship.
pub const RELATIONSHIP_TERMS: &[&str] = &[
    "increase",
    "decrease",
    "affect",
    "change",
    "cause",
    "lead to",
    "result in",
    "correlate",
    "association",
    "relationship",
];

/// Imprecise qualifiers a hypothesis should avoid.
pub const VAGUE_TERMS: &[&str] = &[
    "very",
    "extremely",
    "many",
    "most",
    "few",
    "several",
    "a lot",
    "better",
    "worse",
    "good",
    "bad",
    "significant",
];

/// Accepted openings for a research goal.
pub const GOAL_OPENINGS: &[&str] = &[
    "to ",
    "the goal is to ",
    "this research aims to ",
    "we aim to ",
    "this study seeks to ",
    "the purpose is to ",
];

/// Verbs naming a concrete research action.
pub const RESEARCH_VERBS: &[&str] = &[
    "investigate",
    "explore",
    "analyze",
    "determine",
    "identify",
    "examine",
    "understand",
    "evaluate",
    "assess",
    "develop",
    "discover",
    "explain",
    "test",
    "validate",
    "characterize",
];

static CONDITIONAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(if|when|as|while)\b").expect("valid conditional pattern"));

static CAUSAL_VERB_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(cause|affect|influence|impact|change|increase|decrease)s?\b")
        .expect("valid causal verb pattern")
});

/// Whole-word containment using space padding on both sides.
fn contains_padded(haystack: &str, term: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {term} "))
}

/// Check a hypothesis statement for basic quality criteria.
pub fn validate_hypothesis(hypothesis: &str) -> ValidationReport {
    let mut issues = Vec::new();
    let length = hypothesis.chars().count();
    let lower = hypothesis.to_lowercase();

    if length < HYPOTHESIS_MIN_CHARS {
        issues.push("Hypothesis is too short".to_string());
    }

    if length > HYPOTHESIS_MAX_CHARS {
        issues.push(format!(
            "Hypothesis is too long (>{HYPOTHESIS_MAX_CHARS} characters)"
        ));
    }

    if hypothesis.trim().ends_with('?') {
        issues.push("Hypothesis should be a statement, not a question".to_string());
    }

    // Substring match: "changes" and "increased" both count.
    if !RELATIONSHIP_TERMS.iter().any(|term| lower.contains(term)) {
        issues.push(
            "Hypothesis may not be testable - consider including terms that describe \
             relationships, effects, or changes"
                .to_string(),
        );
    }

    let vague: Vec<&str> = VAGUE_TERMS
        .iter()
        .copied()
        .filter(|term| contains_padded(&lower, term))
        .collect();
    if !vague.is_empty() {
        issues.push(format!(
            "Hypothesis contains vague terms: {}",
            vague.join(", ")
        ));
    }

    if !CONDITIONAL_PATTERN.is_match(&lower) && !CAUSAL_VERB_PATTERN.is_match(&lower) {
        issues.push(
            "Hypothesis may not clearly specify variables or relationships to test".to_string(),
        );
    }

    ValidationReport::from_issues(issues)
}

/// Check a research goal for basic quality criteria.
pub fn validate_research_goal(goal: &str) -> ValidationReport {
    let mut issues = Vec::new();
    let length = goal.chars().count();
    let lower = goal.to_lowercase();

    if length < GOAL_MIN_CHARS {
        issues.push("Research goal is too short".to_string());
    }

    if length > GOAL_MAX_CHARS {
        issues.push(format!(
            "Research goal is too long (>{GOAL_MAX_CHARS} characters)"
        ));
    }

    let opening = lower.trim();
    if !GOAL_OPENINGS.iter().any(|start| opening.starts_with(start)) {
        issues.push(
            "Research goal should typically start with 'To...' or similar phrase".to_string(),
        );
    }

    if !RESEARCH_VERBS.iter().any(|verb| contains_padded(&lower, verb)) {
        issues.push("Research goal should include specific research action verbs".to_string());
    }

    if goal.trim().ends_with('?') {
        issues.push("Research goal should be a statement, not a question".to_string());
    }

    ValidationReport::from_issues(issues)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_with_relationship_is_tolerated() {
        let report = validate_hypothesis("Does caffeine increase reaction time?");

        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].contains("should be a statement, not a question"));
        assert!(report.is_valid);
    }

    #[test]
    fn test_short_hypothesis_is_invalid() {
        let report = validate_hypothesis("Short");

        assert!(!report.is_valid);
        assert!(report.issues.len() >= 2);
        assert!(report.issues.iter().any(|i| i.contains("too short")));
        assert!(report.issues.iter().any(|i| i.contains("may not be testable")));
        assert!(report
            .issues
            .iter()
            .any(|i| i.contains("may not clearly specify variables or relationships")));
    }

    #[test]
    fn test_well_formed_hypothesis_passes() {
        let report =
            validate_hypothesis("Regular aerobic exercise increases hippocampal volume in adults");
        assert!(report.issues.is_empty());
        assert!(report.is_valid);
    }

    #[test]
    fn test_too_long_hypothesis() {
        let text = format!("If light increases {}", "x".repeat(1000));
        let report = validate_hypothesis(&text);
        assert_eq!(report.issues, vec!["Hypothesis is too long (>1000 characters)"]);
    }

    #[test]
    fn test_vague_terms_are_whole_words_in_list_order() {
        let report =
            validate_hypothesis("Many students sleep better when caffeine intake is very low");
        let vague = report
            .issues
            .iter()
            .find(|i| i.starts_with("Hypothesis contains vague terms"))
            .unwrap();
        assert_eq!(vague, "Hypothesis contains vague terms: very, many, better");
    }

    #[test]
    fn test_vague_term_inside_word_is_ignored() {
        // "fewer" and "mostly" contain vague terms but are not whole words
        let report = validate_hypothesis("If fewer birds nest, insect counts mostly increase");
        assert!(!report.issues.iter().any(|i| i.contains("vague")));
    }

    #[test]
    fn test_vague_term_before_punctuation_is_ignored() {
        let report = validate_hypothesis("Noise exposure affects sleep when levels are very.");
        assert!(!report.issues.iter().any(|i| i.contains("vague")));
    }

    #[test]
    fn test_relationship_terms_match_substrings() {
        // "changes" contains "change"
        let report = validate_hypothesis("Temperature changes enzyme activity in yeast");
        assert!(!report.issues.iter().any(|i| i.contains("may not be testable")));
    }

    #[test]
    fn test_bare_causal_verb_specifies_relationship() {
        let report = validate_hypothesis("Caffeine should increase alertness in adults");
        assert!(!report
            .issues
            .iter()
            .any(|i| i.contains("may not clearly specify variables")));
    }

    #[test]
    fn test_variable_pattern_needs_word_boundaries() {
        // "impacted" is not "impacts" and "aside" is not "as"
        let report = validate_hypothesis("Diet impacted the cohort aside from the relationship");
        assert!(report
            .issues
            .iter()
            .any(|i| i.contains("may not clearly specify variables")));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 9 characters, 18 bytes
        let report = validate_hypothesis("ééééééééé");
        assert!(report.issues.iter().any(|i| i.contains("too short")));
    }

    #[test]
    fn test_well_formed_goal_passes() {
        let report = validate_research_goal(
            "To investigate the effect of sleep on memory consolidation in adults.",
        );
        assert!(report.issues.is_empty());
        assert!(report.is_valid);
    }

    #[test]
    fn test_goal_opening_ignores_surrounding_whitespace_and_case() {
        let report = validate_research_goal("  We aim to explore coral bleaching recovery");
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_goal_question_without_verb_is_invalid() {
        let report = validate_research_goal("Why do cats purr so loudly at night?");

        assert_eq!(
            report.issues,
            vec![
                "Research goal should typically start with 'To...' or similar phrase",
                "Research goal should include specific research action verbs",
                "Research goal should be a statement, not a question",
            ]
        );
        assert!(!report.is_valid);
    }

    #[test]
    fn test_short_goal() {
        let report = validate_research_goal("To test");
        assert_eq!(report.issues, vec!["Research goal is too short"]);
        assert!(report.is_valid);
    }

    #[test]
    fn test_long_goal() {
        let goal = format!("To investigate {}", "a".repeat(500));
        let report = validate_research_goal(&goal);
        assert_eq!(report.issues, vec!["Research goal is too long (>500 characters)"]);
    }
}
