//! External Service Clients
//!
//! Client implementations for the language-model completion service the
//! agents depend on.

pub mod llm;

pub use llm::*;
