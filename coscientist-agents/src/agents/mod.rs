//! Co-Scientist Agents
//!
//! Role-specific agents built on the shared completion capability
//! ([`CompletionAgent`]). None of them keeps conversation state between
//! calls: every review, comparison or scoring request starts a fresh
//! conversation holding only the agent's system prompt.
//!
//! # Agent Types
//!
//! - [`GenerationAgent`]: proposes hypotheses for a research goal
//! - [`ReflectionAgent`]: peer-reviews hypotheses one at a time
//! - [`RankingAgent`]: orders reviewed hypotheses
//! - [`EvolutionAgent`]: refines top hypotheses and combines the best two
//! - [`ProximityAgent`]: scores how closely a hypothesis stays on the goal
//! - [`MetaReviewAgent`]: writes the final research report
//! - [`Supervisor`]: runs the stages above in sequence

pub mod assessment;
pub mod evolution;
pub mod generation;
pub mod meta_review;
pub mod prompts;
pub mod proximity;
pub mod ranking;
pub mod reflection;
pub mod supervisor;
pub mod telemetry;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use assessment::{estimate_score, extract_assessment};
pub use evolution::*;
pub use generation::*;
pub use meta_review::*;
pub use proximity::*;
pub use ranking::*;
pub use reflection::*;
pub use supervisor::*;
pub use telemetry::*;
pub use traits::*;
