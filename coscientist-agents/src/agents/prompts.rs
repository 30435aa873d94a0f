//! Prompt Templates
//!
//! System prompts for each agent role and the pure builders that turn a
//! research goal and hypothesis records into request prompts. Builders never
//! validate their inputs: an empty field renders as an empty value.

use crate::contracts::{
    HypothesisRecord, MetaReviewReport, RankedHypothesis, RefinedHypothesis, ReportFormat,
    ReviewedHypothesis,
};

/// Characters of a review quoted in the scoring prompt.
pub const REVIEW_EXCERPT_CHARS: usize = 500;

/// Characters of review feedback quoted in the evolution prompt.
pub const FEEDBACK_EXCERPT_CHARS: usize = 1000;

/// Characters of a rationale quoted in combination and proximity prompts.
pub const RATIONALE_EXCERPT_CHARS: usize = 300;

/// Characters of a rationale quoted per hypothesis in the meta-review prompt.
pub const REPORT_RATIONALE_CHARS: usize = 500;

/// Characters of a report quoted in the executive summary prompt.
pub const SUMMARY_SOURCE_CHARS: usize = 2000;

/// Scoring criteria, in the order they are requested and parsed.
pub const SCORING_CRITERIA: &[&str] = &[
    "novelty",
    "plausibility",
    "relevance",
    "testability",
    "potential impact",
];

pub const GENERATION_SYSTEM_PROMPT: &str = "\
You are a Generation Agent in an AI Co-Scientist system, responsible for proposing initial \
scientific hypotheses or solutions to research problems. You have expertise across multiple \
scientific disciplines at a PhD level.

Your role is to:
1. Generate diverse, novel hypotheses based on the research goal provided
2. Ensure each hypothesis is grounded in established scientific knowledge
3. Provide rationale and references for each hypothesis
4. Think creatively and explore multiple avenues of inquiry
5. Consider interdisciplinary connections when appropriate

Good hypotheses are testable, specific enough to be falsifiable, novel but grounded in \
existing knowledge, relevant to the stated research goal, and clearly stated with precise \
terminology. Be bold in your ideation while maintaining scientific rigor.";

pub const REFLECTION_SYSTEM_PROMPT: &str = "\
You are a Reflection Agent in an AI Co-Scientist system, responsible for critically reviewing \
scientific hypotheses. You have expertise across multiple scientific disciplines at a PhD level \
and act as a rigorous peer reviewer.

Your role is to:
1. Critically evaluate hypotheses for scientific soundness and plausibility
2. Cross-check hypotheses against known facts and literature
3. Identify weaknesses, inconsistencies, or logical flaws
4. Flag any ethical concerns or practical limitations
5. Assess the novelty and potential impact of each hypothesis
6. Suggest specific improvements or alternative approaches

Be fair but rigorous in your assessment. Your goal is not to dismiss hypotheses but to \
strengthen them through critical feedback, just as a constructive peer reviewer would.";

pub const RANKING_SYSTEM_PROMPT: &str = "\
You are a Ranking Agent in an AI Co-Scientist system, responsible for comparing and ranking \
scientific hypotheses using a tournament-style evaluation. You have expertise across multiple \
scientific disciplines at a PhD level.

When comparing hypotheses, consider novelty, plausibility, relevance, testability, potential \
impact, parsimony and breadth of explanation. Your assessments should be balanced, fair, and \
focused on scientific merit rather than personal preference. Provide clear reasoning for each \
comparative judgment.";

pub const EVOLUTION_SYSTEM_PROMPT: &str = "\
You are an Evolution Agent in an AI Co-Scientist system, responsible for refining and improving \
promising scientific hypotheses. You have expertise across multiple scientific disciplines at a \
PhD level.

Your role is to:
1. Take promising hypotheses and enhance them based on feedback and critical evaluation
2. Incorporate elements from different hypotheses to create stronger variants
3. Address specific weaknesses identified during peer review
4. Simplify overly complex hypotheses while maintaining their core insights
5. Extend hypotheses into new directions when appropriate
6. Ensure all improvements maintain scientific rigor and testability

Your output should be a significantly improved hypothesis that keeps the core insight of the \
original while addressing its weaknesses and limitations.";

pub const PROXIMITY_SYSTEM_PROMPT: &str = "\
You are a Proximity Agent in an AI Co-Scientist system, responsible for evaluating how closely \
scientific hypotheses align with the original research goal. You have expertise across multiple \
scientific disciplines at a PhD level.

Your role is to:
1. Assess the semantic and conceptual relatedness of hypotheses to the research objectives
2. Identify tangential or irrelevant suggestions
3. Ensure that hypotheses address the core questions posed in the research goal
4. Evaluate whether hypotheses keep an appropriate scope, neither too broad nor too narrow
5. Provide specific feedback on how to increase relevance when needed

Focus on relevance rather than scientific validity, which other agents assess.";

pub const META_REVIEW_SYSTEM_PROMPT: &str = "\
You are a Meta-Review Agent in an AI Co-Scientist system, responsible for synthesizing research \
findings into comprehensive research proposals. You have expertise across multiple scientific \
disciplines at a PhD level and excellent scientific writing skills.

Your role is to:
1. Analyze and synthesize the best hypotheses that emerged from the research process
2. Compile them into a coherent, well-structured report or proposal
3. Highlight the significance and implications of the proposed ideas
4. Relate the hypotheses to the existing literature
5. Outline a clear plan for testing or implementing the hypotheses

Write in a clear, concise scientific style appropriate for a professional audience.";

/// Review prompt for one hypothesis.
///
/// Embeds the goal and the five hypothesis fields under fixed labels, then
/// asks for the seven review dimensions.
pub fn review_prompt(research_goal: &str, hypothesis: &HypothesisRecord) -> String {
    format!(
        "RESEARCH GOAL: {goal}

HYPOTHESIS TO REVIEW:
Statement: {statement}
Rationale: {rationale}
Evidence: {evidence}
Assumptions: {assumptions}
Validation Approach: {validation}

Please conduct a thorough peer review of this hypothesis. Assess:
1. Scientific validity and plausibility
2. Strengths of the hypothesis
3. Weaknesses, inconsistencies, or logical flaws
4. Potential contradictions with established knowledge
5. Ethical considerations or concerning implications
6. Practical limitations for testing or implementation
7. Suggested modifications to strengthen the hypothesis

Structure your review clearly with sections for each aspect of the assessment.",
        goal = research_goal,
        statement = hypothesis.statement,
        rationale = hypothesis.rationale,
        evidence = hypothesis.evidence,
        assumptions = hypothesis.assumptions,
        validation = hypothesis.validation,
    )
}

/// Generation prompt asking for `count` labelled hypotheses.
pub fn generation_prompt(research_goal: &str, count: usize) -> String {
    format!(
        "RESEARCH GOAL: {research_goal}

Generate {count} distinct scientific hypotheses that address this research goal.
For each hypothesis, provide:
1. A clear statement of the hypothesis
2. Scientific rationale supporting the hypothesis
3. Known evidence or references that provide context
4. Any assumptions or conditions that would need to be true
5. Potential paths for testing or validating the hypothesis

Format each hypothesis exactly as follows, separating hypotheses with a blank line:
Hypothesis: <statement>
Rationale: <rationale>
Evidence: <evidence>
Assumptions: <assumptions>
Validation: <validation approach>

Be creative but scientifically grounded in your ideas."
    )
}

/// Pairwise comparison prompt for the ranking tournament.
pub fn comparison_prompt(
    research_goal: &str,
    first: &HypothesisRecord,
    second: &HypothesisRecord,
) -> String {
    format!(
        "RESEARCH GOAL: {research_goal}

HYPOTHESIS 1:
Statement: {first}

HYPOTHESIS 2:
Statement: {second}

Compare these two hypotheses based on the following criteria:
1. Novelty: Does the hypothesis represent a significant advance beyond current knowledge?
2. Plausibility: Is the hypothesis consistent with established scientific principles?
3. Relevance: How closely does the hypothesis address the original research goal?
4. Testability: How feasible is it to validate or falsify the hypothesis?
5. Potential impact: If true, how significant would the implications be?

Provide a detailed comparison, noting the strengths and weaknesses of each hypothesis relative \
to the other. Then determine which hypothesis is superior overall, being explicit about which \
hypothesis (1 or 2) is the winner.",
        first = statement_or_placeholder(first),
        second = statement_or_placeholder(second),
    )
}

/// Independent scoring prompt for one reviewed hypothesis.
pub fn scoring_prompt(research_goal: &str, reviewed: &ReviewedHypothesis) -> String {
    let rationale: &str = if reviewed.hypothesis.rationale.is_empty() {
        "No rationale provided"
    } else {
        &reviewed.hypothesis.rationale
    };

    format!(
        "RESEARCH GOAL: {research_goal}

HYPOTHESIS TO EVALUATE:
Statement: {statement}
Rationale: {rationale}
Review Summary: {review}

Evaluate this hypothesis on the following criteria using a scale of 1-10:
1. Novelty (1=Well-known, 10=Revolutionary)
2. Plausibility (1=Implausible, 10=Highly plausible)
3. Relevance (1=Unrelated to goal, 10=Directly addresses goal)
4. Testability (1=Untestable, 10=Easily testable)
5. Potential impact (1=Minimal impact, 10=Field-changing)

For each criterion, provide a numeric score AND a brief justification.
Finally, calculate an overall score as the weighted average of the individual scores.

Format your response as follows:
Novelty: [score] - [justification]
Plausibility: [score] - [justification]
Relevance: [score] - [justification]
Testability: [score] - [justification]
Potential impact: [score] - [justification]
Overall score: [weighted average score] - [brief summary]",
        statement = statement_or_placeholder(&reviewed.hypothesis),
        review = review_excerpt(&reviewed.review),
    )
}

/// Evolution prompt for one reviewed hypothesis.
///
/// The review is quoted up to [`FEEDBACK_EXCERPT_CHARS`] characters.
pub fn evolution_prompt(research_goal: &str, reviewed: &ReviewedHypothesis) -> String {
    let hypothesis = &reviewed.hypothesis;
    format!(
        "RESEARCH GOAL: {research_goal}

HYPOTHESIS TO EVOLVE:
Statement: {statement}
Rationale: {rationale}
Evidence: {evidence}
Assumptions: {assumptions}
Validation Approach: {validation}

REVIEW FEEDBACK:
{feedback}

Please evolve this hypothesis to address its weaknesses while maintaining its core strengths.
Specifically:
1. Refine the hypothesis statement to be more precise and testable
2. Address any inconsistencies or logical flaws identified in the review
3. Strengthen the rationale with additional scientific context if needed
4. Reconsider any problematic assumptions
5. Improve the validation approach to be more feasible and conclusive

{layout}",
        statement = hypothesis.statement,
        rationale = hypothesis.rationale,
        evidence = hypothesis.evidence,
        assumptions = hypothesis.assumptions,
        validation = hypothesis.validation,
        feedback = clip(&reviewed.review, FEEDBACK_EXCERPT_CHARS),
        layout = RECORD_LAYOUT,
    )
}

/// Prompt asking for a hybrid of the two best hypotheses.
pub fn combination_prompt(
    research_goal: &str,
    first: &RankedHypothesis,
    second: &RankedHypothesis,
) -> String {
    let first_record = &first.hypothesis.hypothesis;
    let second_record = &second.hypothesis.hypothesis;
    format!(
        "RESEARCH GOAL: {research_goal}

HYPOTHESIS 1 (Rank {first_rank}):
Statement: {first_statement}
Rationale: {first_rationale}

HYPOTHESIS 2 (Rank {second_rank}):
Statement: {second_statement}
Rationale: {second_rationale}

These are the top two hypotheses addressing the research goal. Create a new hybrid hypothesis \
that combines the strongest elements of both. It should not simply list both hypotheses but \
truly integrate them into something potentially stronger than either.

{layout}",
        first_rank = first.rank,
        first_statement = statement_or_placeholder(first_record),
        first_rationale = clip(&first_record.rationale, RATIONALE_EXCERPT_CHARS),
        second_rank = second.rank,
        second_statement = statement_or_placeholder(second_record),
        second_rationale = clip(&second_record.rationale, RATIONALE_EXCERPT_CHARS),
        layout = RECORD_LAYOUT,
    )
}

/// Proximity prompt for one hypothesis.
pub fn proximity_prompt(research_goal: &str, hypothesis: &HypothesisRecord) -> String {
    format!(
        "RESEARCH GOAL: {research_goal}

HYPOTHESIS TO EVALUATE:
Statement: {statement}
Rationale: {rationale}

Please evaluate how closely this hypothesis aligns with the research goal.
Focus specifically on:
1. Conceptual alignment: Does the hypothesis address the same fundamental concepts as the research goal?
2. Problem-solution fit: Does the hypothesis potentially solve the problem outlined in the goal?
3. Scope appropriateness: Is the hypothesis at the right level of specificity for the goal?
4. Scientific domain match: Does the hypothesis stay within the relevant scientific domains?
5. Practical applicability: Would findings based on this hypothesis be useful for the stated objective?

For each criterion, provide a score from 1-10 and a brief justification.
Then give the overall score on its own line as \"Overall proximity score: N\" (1-10), followed by \
a summary assessment of relevance and suggestions to increase relevance if needed.",
        statement = statement_or_placeholder(hypothesis),
        rationale = clip(&hypothesis.rationale, RATIONALE_EXCERPT_CHARS),
    )
}

fn format_instructions(format: ReportFormat) -> &'static str {
    match format {
        ReportFormat::ScientificReport => "\
Please format your response as a scientific report with the following sections:
1. Title: A descriptive title for the research
2. Abstract: A concise summary of the problem, hypotheses, and implications (250 words max)
3. Introduction: Background on the research problem and its significance
4. Hypotheses: Detailed presentation of each hypothesis with supporting rationale
5. Evidence and Prior Work: How these hypotheses relate to existing scientific knowledge
6. Methodology: Proposed approaches for testing or validating these hypotheses
7. Expected Outcomes: Anticipated results and their interpretation
8. Implications: Broader impact and significance if the hypotheses are validated
9. Limitations and Alternatives: Constraints and alternative explanations
10. References: Citations for all sources mentioned",
        ReportFormat::GrantProposal => "\
Please format your response as a grant proposal with the following sections:
1. Project Title: A compelling title for the research project
2. Executive Summary: Overview of the project's aims and significance (250 words max)
3. Background and Significance: Context of the research problem and its importance
4. Specific Aims: Research objectives based on the hypotheses
5. Research Strategy: Detailed hypotheses and approach to testing them
6. Preliminary Data: Existing evidence supporting the hypotheses
7. Methodology: Experimental design, techniques, and analytical approaches
8. Timeline and Milestones: Projected schedule for the research activities
9. Expected Outcomes and Impact: Anticipated results and their significance
10. Budget Justification: Resources needed to conduct the research
11. References: Citations for all sources mentioned",
        ReportFormat::ResearchBrief => "\
Please format your response as a concise research brief with the following sections:
1. Title: A descriptive title for the research
2. Key Question: The central research question being addressed
3. Hypotheses: Clear statements of the proposed explanations or solutions
4. Rationale: Brief scientific justification for each hypothesis
5. Quick-win Experiments: Rapid tests that could validate or refute the hypotheses
6. Long-term Research Direction: Strategic vision if the hypotheses are supported
7. Practical Applications: Potential real-world impacts of the research
8. Key References: 3-5 most important citations supporting the approach",
    }
}

/// Meta-review prompt over the final hypotheses, in report order.
pub fn meta_review_prompt(
    research_goal: &str,
    hypotheses: &[RefinedHypothesis],
    format: ReportFormat,
) -> String {
    let mut listing = String::new();
    for (index, refined) in hypotheses.iter().enumerate() {
        listing.push_str(&format!(
            "HYPOTHESIS {number} (Rank: {rank}):\nStatement: {statement}\nRationale: {rationale}\nEvolution: {evolution}\n\n",
            number = index + 1,
            rank = refined.original_rank,
            statement = refined.hypothesis.statement,
            rationale = clip(&refined.hypothesis.rationale, REPORT_RATIONALE_CHARS),
            evolution = refined
                .evolution_type
                .map(|kind| kind.to_string())
                .unwrap_or_else(|| "original".to_string()),
        ));
    }

    let mut prompt = format!(
        "RESEARCH GOAL: {research_goal}

FINAL HYPOTHESES:
{listing}{instructions}

Please create a comprehensive {format} that synthesizes these hypotheses into a coherent research \
narrative following the structure above. Present the most promising ideas while acknowledging \
limitations and areas of uncertainty.",
        instructions = format_instructions(format),
    );

    if hypotheses.iter().any(|h| h.evolution_type.is_some()) {
        prompt.push_str(
            "\n\nInclude a section on how the hypotheses evolved through the research process, \
highlighting key improvements and refinements.",
        );
    }
    prompt
}

/// Prompt condensing a finished report into at most `max_chars` characters.
pub fn executive_summary_prompt(report: &MetaReviewReport, max_chars: usize) -> String {
    format!(
        "Please create a concise executive summary of the following research report. \
The summary should be no more than {max_chars} characters and should capture the key research \
goal, main hypotheses, and significant implications.

RESEARCH GOAL: {goal}

REPORT TITLE: {title}

REPORT:
{body}",
        goal = report.research_goal,
        title = report.title,
        body = clip(&report.report, SUMMARY_SOURCE_CHARS),
    )
}

const RECORD_LAYOUT: &str = "\
Format the result exactly as follows:
Statement: <hypothesis statement>
Rationale: <rationale>
Evidence: <evidence>
Assumptions: <assumptions>
Validation: <validation approach>";

/// At most `max` characters of `text`, with `...` appended when cut.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max).collect();
    format!("{kept}...")
}

fn statement_or_placeholder(hypothesis: &HypothesisRecord) -> &str {
    if hypothesis.statement.is_empty() {
        "No statement provided"
    } else {
        &hypothesis.statement
    }
}

/// First [`REVIEW_EXCERPT_CHARS`] characters of a review, followed by `...`.
fn review_excerpt(review: &str) -> String {
    if review.is_empty() {
        return "No review available".to_string();
    }
    let excerpt: String = review.chars().take(REVIEW_EXCERPT_CHARS).collect();
    format!("{excerpt}...")
}
