//! Sequential batch runner.
//!
//! [`BatchRunner`] executes one generation call per prompt, strictly in
//! order, isolating failures per item. One prompt's failure never aborts
//! the loop — it is recorded as a failure outcome and the next prompt is
//! attempted unconditionally. Sequential-only processing is a deliberate
//! ordering/simplicity choice: there is never more than one request in
//! flight, so the Nth outcome always corresponds to the Nth prompt with no
//! index bookkeeping.

use std::sync::Arc;

use crate::client::GenerationClient;
use crate::events::{emit, Event, EventHandler};
use crate::types::{BatchResult, FatalError, GenerationOutcome, PromptBatch};

/// Drives the sequential loop over a prompt batch.
///
/// # Example
///
/// ```no_run
/// use image_pipeline::{BatchRunner, GenerationClient, PromptBatch};
///
/// # async fn run() {
/// let client = GenerationClient::builder().api_key("sk-...").build();
/// let runner = BatchRunner::new(client);
///
/// let batch = PromptBatch::from_raw_values(["a red fox", "a blue cat"]);
/// let result = runner.run(&batch).await;
/// println!("{} ok, {} failed", result.success_count(), result.failure_count());
/// # }
/// ```
pub struct BatchRunner {
    client: GenerationClient,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl BatchRunner {
    /// Create a runner around a generation client.
    pub fn new(client: GenerationClient) -> Self {
        Self {
            client,
            event_handler: None,
        }
    }

    /// Attach an event handler for progress observation.
    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// The client this runner drives.
    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    /// Run the batch: one generation call per prompt, in input order.
    ///
    /// Preconditions are checked up front; when one fails the run never
    /// starts and the result carries a batch-level [`FatalError`] with zero
    /// outcomes — a batch is never partially processed for a fatal
    /// condition. Otherwise the result holds exactly one outcome per
    /// prompt, in input order, regardless of how many fail.
    pub async fn run(&self, batch: &PromptBatch) -> BatchResult {
        if !self.client.has_credential() {
            return BatchResult::fatal(FatalError::MissingCredential);
        }
        if batch.is_empty() {
            return BatchResult::fatal(FatalError::EmptyBatch);
        }

        emit(
            &self.event_handler,
            Event::BatchStart { total: batch.len() },
        );

        let mut outcomes = Vec::with_capacity(batch.len());
        for (index, prompt) in batch.iter().enumerate() {
            emit(
                &self.event_handler,
                Event::PromptStart {
                    index,
                    prompt: prompt.as_str().to_string(),
                },
            );

            let result = self.client.generate(prompt).await;

            emit(
                &self.event_handler,
                Event::PromptEnd {
                    index,
                    ok: result.is_ok(),
                },
            );

            outcomes.push(GenerationOutcome {
                prompt: prompt.clone(),
                result,
            });
        }

        let failures = outcomes.iter().filter(|o| !o.is_success()).count();
        emit(
            &self.event_handler,
            Event::BatchEnd {
                total: outcomes.len(),
                failures,
            },
        );

        BatchResult {
            outcomes,
            fatal: None,
        }
    }
}
