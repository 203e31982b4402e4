//! Background introduction generation.
//!
//! A single tokio task builds the prompt and calls the LLM, then hands exactly
//! one [`GenerationOutcome`] to the caller's callback. Only one request may be
//! in flight: [`GenerationRunner::start`] refuses while pending, and the caller
//! re-arms the runner with [`GenerationRunner::settle`] once it has received
//! the outcome. There is no cancellation.

use crate::config::LlmConfig;
use crate::document::PaperIntroductionDocument;
use crate::error::{IntroError, Result};
use crate::llm::LlmClient;
use crate::prompts;
use tracing::{info, warn};

/// Result of one generation request, as delivered to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    Failure(String),
}

/// Returned by [`GenerationRunner::start`] while a request is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlreadyRunning;

/// Single-flight owner of the generation task.
#[derive(Debug, Default)]
pub struct GenerationRunner {
    client: LlmClient,
    pending: bool,
}

impl GenerationRunner {
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            pending: false,
        }
    }

    /// True from a successful `start` until `settle`.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Spawn the request. `deliver` runs exactly once, on the task, with
    /// the outcome; a panic inside the request is reported as a failure.
    pub fn start<F>(
        &mut self,
        config: LlmConfig,
        document: PaperIntroductionDocument,
        deliver: F,
    ) -> std::result::Result<(), AlreadyRunning>
    where
        F: FnOnce(GenerationOutcome) + Send + 'static,
    {
        if self.pending {
            return Err(AlreadyRunning);
        }
        self.pending = true;

        let client = self.client.clone();
        info!(model = %config.model, "Starting introduction generation");

        tokio::spawn(async move {
            let request = tokio::spawn(generate(client, config, document));
            let outcome = match request.await {
                Ok(Ok(text)) => GenerationOutcome::Success(text),
                Ok(Err(e)) => {
                    warn!(error = %e, "Introduction generation failed");
                    GenerationOutcome::Failure(e.to_string())
                }
                Err(e) => {
                    warn!(error = %e, "Introduction generation task aborted");
                    GenerationOutcome::Failure(format!("Generation task failed: {}", e))
                }
            };
            deliver(outcome);
        });
        Ok(())
    }

    /// Mark the in-flight request as resolved; call after receiving its outcome.
    pub fn settle(&mut self) {
        self.pending = false;
    }
}

/// Prompt building followed by the chat-completion call.
pub async fn generate(
    client: LlmClient,
    config: LlmConfig,
    document: PaperIntroductionDocument,
) -> Result<String> {
    if document.is_empty() {
        return Err(IntroError::Validation(
            "Fill at least one field before generating".to_string(),
        ));
    }
    let prompt = prompts::build(&document)?;
    client.complete(&config, &prompt.system, &prompt.user).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> LlmConfig {
        LlmConfig {
            api_key: "sk-test".to_string(),
            base_url: server.uri(),
            model: "test-model".to_string(),
            ..LlmConfig::default()
        }
    }

    fn document() -> PaperIntroductionDocument {
        let mut document = PaperIntroductionDocument::default();
        document.contributions.push("A new method X".to_string());
        document
    }

    #[tokio::test]
    async fn test_success_is_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("A new method X"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "Introduction text"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut runner = GenerationRunner::default();
        let started = runner.start(config_for(&server), document(), move |outcome| {
            let _ = tx.send(outcome);
        });
        assert_eq!(started, Ok(()));
        assert!(runner.is_pending());

        let outcome = rx.recv().await;
        assert_eq!(
            outcome,
            Some(GenerationOutcome::Success("Introduction text".to_string()))
        );
        // exactly one delivery
        assert_eq!(rx.recv().await, None);

        // the task is gone but the trigger stays locked until settled
        assert!(runner.is_pending());
        assert_eq!(
            runner.start(config_for(&server), document(), |_| {}),
            Err(AlreadyRunning)
        );

        runner.settle();
        assert!(!runner.is_pending());
    }

    #[tokio::test]
    async fn test_second_start_is_refused_while_pending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": [{"message": {"content": "slow"}}]}))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut runner = GenerationRunner::default();

        let first_tx = tx.clone();
        assert!(runner
            .start(config_for(&server), document(), move |o| {
                let _ = first_tx.send(o);
            })
            .is_ok());

        let second_tx = tx.clone();
        let refused = runner.start(config_for(&server), document(), move |o| {
            let _ = second_tx.send(o);
        });
        assert_eq!(refused, Err(AlreadyRunning));

        assert_eq!(
            rx.recv().await,
            Some(GenerationOutcome::Success("slow".to_string()))
        );
        runner.settle();

        // re-armed after settle
        assert!(runner
            .start(config_for(&server), document(), move |o| {
                let _ = tx.send(o);
            })
            .is_ok());
        assert!(matches!(rx.recv().await, Some(GenerationOutcome::Success(_))));
    }

    #[tokio::test]
    async fn test_failure_is_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut runner = GenerationRunner::default();
        assert!(runner
            .start(config_for(&server), document(), move |o| {
                let _ = tx.send(o);
            })
            .is_ok());

        match rx.recv().await {
            Some(GenerationOutcome::Failure(message)) => {
                assert!(message.contains("500"));
                assert!(message.contains("overloaded"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_document_is_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = generate(
            LlmClient::new(),
            config_for(&server),
            PaperIntroductionDocument::default(),
        )
        .await;
        assert!(matches!(result, Err(IntroError::Validation(_))));
    }
}
