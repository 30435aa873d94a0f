//! Integration Tests for Co-Scientist Agents
//!
//! These tests drive the agents through the real OpenAI-compatible client
//! against a local mock server.
//!
//! # Test Categories
//!
//! 1. **Reflection**: order, length and per-hypothesis conversations
//! 2. **Workflow**: the supervisor's full run, refinement and report included
//! 3. **Error Handling**: collaborator failures reach the caller
//! 4. **Registration**: agent metadata for the CLI

use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coscientist_agents::{
    agents::Agent,
    contracts::{HypothesisRecord, RankingEvidence, ReflectionInput, ReportFormat},
    AgentRuntimeError, LlmConfig, LlmError, OpenAiClient, ReflectionAgent, Supervisor,
    SupervisorOptions, REFLECTION_AGENT_ID,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

fn config_for(server: &MockServer) -> LlmConfig {
    LlmConfig {
        api_key: Some("test-key".to_string()),
        ..Default::default()
    }
    .with_base_url(&server.uri())
    .unwrap()
}

fn hypotheses() -> Vec<HypothesisRecord> {
    vec![
        HypothesisRecord {
            statement: "Sleep deprivation decreases recall accuracy".to_string(),
            rationale: "Consolidation happens during slow-wave sleep".to_string(),
            ..Default::default()
        },
        HypothesisRecord::new("Napping increases retention of word lists"),
        HypothesisRecord::new("Blue light exposure changes sleep latency"),
    ]
}

async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}

// ============================================================================
// REFLECTION AGENT TESTS
// ============================================================================

mod reflection {
    use super::*;

    #[tokio::test]
    async fn test_reviews_every_hypothesis_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(completion("A strong and plausible hypothesis."))
            .expect(3)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let agent = ReflectionAgent::new(OpenAiClient::new(config.clone()).unwrap(), &config);

        let reviewed = agent
            .review_all("To investigate sleep and memory", &hypotheses())
            .await
            .unwrap();

        assert_eq!(reviewed.len(), 3);
        for (input, output) in hypotheses().iter().zip(&reviewed) {
            assert_eq!(&output.hypothesis, input);
            assert!(!output.review.is_empty());
            assert!(output.assessment_summary.valid);
            assert_eq!(output.assessment_summary.overall_score, 1.0);
        }
    }

    #[tokio::test]
    async fn test_history_is_reset_between_hypotheses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(completion("Reviewed."))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let agent = ReflectionAgent::new(OpenAiClient::new(config.clone()).unwrap(), &config);
        agent
            .review_all("To investigate sleep and memory", &hypotheses())
            .await
            .unwrap();

        let bodies = request_bodies(&server).await;
        assert_eq!(bodies.len(), 3);
        for (body, hypothesis) in bodies.iter().zip(hypotheses()) {
            let messages = body["messages"].as_array().unwrap();
            assert_eq!(messages.len(), 2, "only system prompt and one review prompt");
            assert_eq!(messages[0]["role"], "system");
            assert_eq!(messages[1]["role"], "user");

            let prompt = messages[1]["content"].as_str().unwrap();
            assert!(prompt.contains(&format!("Statement: {}", hypothesis.statement)));
            assert!(!prompt.contains("Reviewed."));
        }
        assert_eq!(bodies[0]["temperature"].as_f64().map(|t| (t * 10.0).round()), Some(2.0));
    }

    #[tokio::test]
    async fn test_empty_input_returns_empty_output() {
        let server = MockServer::start().await;
        let config = config_for(&server);
        let agent = ReflectionAgent::new(OpenAiClient::new(config.clone()).unwrap(), &config);

        let output = agent
            .invoke(ReflectionInput {
                research_goal: "To investigate sleep and memory".to_string(),
                hypotheses: vec![],
            })
            .await
            .unwrap();

        assert!(output.is_empty());
        assert!(request_bodies(&server).await.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_fails_batch_with_index() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("Napping increases retention"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"message": "upstream overloaded"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(completion("Fine."))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let agent = ReflectionAgent::new(OpenAiClient::new(config.clone()).unwrap(), &config);

        let err = agent
            .review_all("To investigate sleep and memory", &hypotheses())
            .await
            .unwrap_err();

        match err {
            AgentRuntimeError::Review {
                index,
                source: LlmError::Response { status, message },
            } => {
                assert_eq!(index, 1);
                assert_eq!(status, 500);
                assert_eq!(message, "upstream overloaded");
            }
            other => panic!("unexpected error: {other}"),
        }
        // no retry, and the third hypothesis is never sent
        assert_eq!(request_bodies(&server).await.len(), 2);

        let results = agent
            .review_each("To investigate sleep and memory", &hypotheses())
            .await;
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }
}

// ============================================================================
// WORKFLOW TESTS
// ============================================================================

mod workflow {
    use super::*;

    #[tokio::test]
    async fn test_supervisor_full_run() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("Generation Agent"))
            .respond_with(completion(
                "Hypothesis: Sleep deprivation decreases recall accuracy\n\
                 Rationale: Consolidation needs sleep\n\n\
                 Hypothesis: Napping increases retention of word lists\n\
                 Rationale: Short sleep aids encoding",
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("Reflection Agent"))
            .respond_with(completion("Plausible and consistent with prior work."))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("Ranking Agent"))
            .respond_with(completion("Overall, hypothesis 2 is superior."))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("Evolution Agent"))
            .respond_with(completion(
                "Statement: Short naps before study increase retention of word lists",
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("Proximity Agent"))
            .respond_with(completion("Highly aligned.\nOverall proximity score: 8"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("Meta-Review Agent"))
            .respond_with(completion("# Sleep and Memory\n\nSummary of findings."))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let supervisor = Supervisor::new(OpenAiClient::new(config.clone()).unwrap(), &config)
            .with_options(SupervisorOptions {
                refinement_iterations: 1,
                report_format: ReportFormat::ScientificReport,
            });

        let report = supervisor
            .run("To investigate how sleep affects memory", 2)
            .await
            .unwrap();

        assert!(report.goal_validation.is_valid);
        assert_eq!(report.hypothesis_validations.len(), 2);
        assert_eq!(report.ranked.len(), 2);
        assert_eq!(
            report.ranked[0].hypothesis.hypothesis.statement,
            "Napping increases retention of word lists"
        );
        assert_eq!(
            report.ranked[0].evidence,
            RankingEvidence::Tournament {
                wins: 1,
                total_comparisons: 1
            }
        );

        assert_eq!(report.refined.len(), 2);
        assert!(report.refined.iter().all(|r| r.iteration == 1));
        assert_eq!(
            report.refined[0].hypothesis.statement,
            "Short naps before study increase retention of word lists"
        );
        assert_eq!(report.refined[0].original_rank, 1);
        assert_eq!(report.final_report.title, "Sleep and Memory");
        assert_eq!(report.final_report.hypothesis_count, 2);

        // generate + 2 reviews + 1 comparison + 2 x (review, evolve, proximity) + report
        assert_eq!(request_bodies(&server).await.len(), 11);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ranked"][0]["method"], "tournament");
        assert_eq!(json["ranked"][0]["rank"], 1);
        assert!(json["ranked"][0]["assessment_summary"].is_object());
        assert_eq!(json["refined"][0]["evolution_type"], "individual_refinement");
        assert_eq!(json["final_report"]["format"], "scientific_report");
    }

    #[tokio::test]
    async fn test_unparseable_generation_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(completion("I would rather not speculate."))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let supervisor = Supervisor::new(OpenAiClient::new(config.clone()).unwrap(), &config);

        let err = supervisor
            .run("To investigate how sleep affects memory", 2)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentRuntimeError::NoHypotheses));
    }
}

// ============================================================================
// AGENT REGISTRATION TESTS
// ============================================================================

mod registration {
    use super::*;
    use coscientist_agents::get_agent_registrations;

    #[test]
    fn test_reflection_agent_registered() {
        let registrations = get_agent_registrations();
        let reflection = registrations
            .iter()
            .find(|r| r.id == REFLECTION_AGENT_ID)
            .unwrap();

        assert_eq!(reflection.cli_command, "review");
        assert_eq!(reflection.classification.to_string(), "HYPOTHESIS_REFLECTION");
    }

    #[test]
    fn test_cli_commands_are_unique() {
        let registrations = get_agent_registrations();
        let mut commands: Vec<_> = registrations.iter().map(|r| r.cli_command.as_str()).collect();
        commands.sort_unstable();
        commands.dedup();
        assert_eq!(commands.len(), registrations.len());
    }

    #[test]
    fn test_refinement_agents_registered() {
        let registrations = get_agent_registrations();
        let commands: Vec<_> = registrations.iter().map(|r| r.cli_command.as_str()).collect();
        for command in ["evolve", "proximity", "report"] {
            assert!(commands.contains(&command), "missing {command}");
        }
    }
}
