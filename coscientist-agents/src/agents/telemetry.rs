//! Agent Telemetry Module
//!
//! Structured telemetry for agent executions. Events are serialized with
//! serde and emitted as `tracing` events on the `coscientist::telemetry`
//! target, so any subscriber (plain text or JSON) can collect them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Telemetry event types for agent operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryEventType {
    /// Agent execution started
    ExecutionStarted,
    /// Agent execution completed successfully
    ExecutionCompleted,
    /// Agent execution failed
    ExecutionFailed,
    /// One hypothesis received its review
    HypothesisReviewed,
    /// A pairwise comparison or scoring call finished
    HypothesisCompared,
    /// An evolved variant passed or failed the proximity gate
    HypothesisRefined,
}

impl std::fmt::Display for TelemetryEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExecutionStarted => write!(f, "execution_started"),
            Self::ExecutionCompleted => write!(f, "execution_completed"),
            Self::ExecutionFailed => write!(f, "execution_failed"),
            Self::HypothesisReviewed => write!(f, "hypothesis_reviewed"),
            Self::HypothesisCompared => write!(f, "hypothesis_compared"),
            Self::HypothesisRefined => write!(f, "hypothesis_refined"),
        }
    }
}

/// Telemetry event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Event type
    pub event_type: TelemetryEventType,
    /// Agent ID that emitted the event
    pub agent_id: String,
    /// Correlates events of one invocation
    pub execution_id: Uuid,
    /// Timestamp of the event
    pub timestamp: DateTime<Utc>,
    /// Additional metadata
    pub metadata: serde_json::Value,
}

/// Per-invocation telemetry emitter.
#[derive(Debug, Clone)]
pub struct AgentTelemetry {
    agent_id: String,
    execution_id: Uuid,
}

impl AgentTelemetry {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            execution_id: Uuid::new_v4(),
        }
    }

    pub fn execution_id(&self) -> Uuid {
        self.execution_id
    }

    /// Build an event for this invocation.
    pub fn event(&self, event_type: TelemetryEventType, metadata: serde_json::Value) -> TelemetryEvent {
        TelemetryEvent {
            event_type,
            agent_id: self.agent_id.clone(),
            execution_id: self.execution_id,
            timestamp: Utc::now(),
            metadata,
        }
    }

    fn emit(&self, event: &TelemetryEvent) {
        let payload = serde_json::to_string(event).unwrap_or_default();
        match event.event_type {
            TelemetryEventType::ExecutionFailed => {
                warn!(target: "coscientist::telemetry", event_type = %event.event_type, %payload)
            }
            TelemetryEventType::ExecutionStarted | TelemetryEventType::ExecutionCompleted => {
                info!(target: "coscientist::telemetry", event_type = %event.event_type, %payload)
            }
            _ => debug!(target: "coscientist::telemetry", event_type = %event.event_type, %payload),
        }
    }

    pub fn execution_started(&self) {
        self.emit(&self.event(TelemetryEventType::ExecutionStarted, serde_json::json!({})));
    }

    pub fn execution_completed(&self, duration_ms: u64) {
        self.emit(&self.event(
            TelemetryEventType::ExecutionCompleted,
            serde_json::json!({ "duration_ms": duration_ms }),
        ));
    }

    pub fn execution_failed(&self, error: &str) {
        self.emit(&self.event(
            TelemetryEventType::ExecutionFailed,
            serde_json::json!({ "error": error }),
        ));
    }

    pub fn hypothesis_reviewed(&self, index: usize, overall_score: f64, valid: bool) {
        self.emit(&self.event(
            TelemetryEventType::HypothesisReviewed,
            serde_json::json!({
                "index": index,
                "overall_score": overall_score,
                "valid": valid,
            }),
        ));
    }

    pub fn hypothesis_compared(&self, metadata: serde_json::Value) {
        self.emit(&self.event(TelemetryEventType::HypothesisCompared, metadata));
    }

    pub fn hypothesis_refined(
        &self,
        index: usize,
        iteration: usize,
        proximity_score: f64,
        accepted: bool,
    ) {
        self.emit(&self.event(
            TelemetryEventType::HypothesisRefined,
            serde_json::json!({
                "index": index,
                "iteration": iteration,
                "proximity_score": proximity_score,
                "accepted": accepted,
            }),
        ));
    }
}
