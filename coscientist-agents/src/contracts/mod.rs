//! Agent Contracts Module
//!
//! This module defines the hypothesis, review, ranking, refinement and
//! conversation schemas shared by all co-scientist agents. These contracts are the
//! authoritative source for agent input/output types.

pub mod common;
pub mod conversation;
pub mod hypothesis;
pub mod refinement;

pub use common::*;
pub use conversation::*;
pub use hypothesis::*;
pub use refinement::*;
