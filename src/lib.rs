//! # Image Pipeline
//!
//! Batch image generation for prompt lists, with per-prompt failure
//! isolation.
//!
//! This crate provides the building blocks for turning a list of prompts
//! into a list of images: **prompt sources** that normalize a batch from a
//! CSV upload or a remote spreadsheet, a **generation client** that wraps
//! one call to an image endpoint, and a **batch runner** that drives the
//! sequential loop and aggregates per-prompt outcomes.
//!
//! HTTP route wiring, HTML rendering, and upload plumbing belong in your
//! web framework. This crate provides what runs *behind* those routes.
//!
//! ## Core Concepts
//!
//! - **[`PromptSource`](source::PromptSource)** — object-safe trait for
//!   prompt-list origins. [`CsvSource`] reads a tabular upload;
//!   [`SheetSource`] reads one column of a remote spreadsheet. Both yield
//!   a [`PromptBatch`] of trimmed, non-empty prompts, or a classified
//!   [`SourceError`].
//! - **[`GenerationClient`]** — performs exactly one request per prompt
//!   against an [`ImageBackend`](backend::ImageBackend) (OpenAI-style by
//!   default, [`MockImageBackend`](backend::MockImageBackend) for tests).
//! - **[`BatchRunner`]** — the sequential loop. One outcome per prompt,
//!   in input order; a failed prompt never stops the batch.
//! - **[`BatchResult`]** — the aggregated report: per-prompt outcomes plus
//!   a batch-level fatal error when the run could not start at all.
//!
//! ## Quick Start
//!
//! ```no_run
//! use image_pipeline::{BatchRunner, CsvSource, GenerationClient};
//! use image_pipeline::source::PromptSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let batch = CsvSource::temporary("uploads/prompts.csv").load().await?;
//!
//!     let client = GenerationClient::builder()
//!         .api_key(std::env::var("OPENAI_API_KEY")?)
//!         .build();
//!
//!     let result = BatchRunner::new(client).run(&batch).await;
//!     for outcome in &result.outcomes {
//!         match &outcome.result {
//!             Ok(image) => println!("{}: {} bytes", outcome.prompt, image.to_bytes()?.len()),
//!             Err(e) => println!("{}: {}", outcome.prompt, e),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod client;
pub mod error;
pub mod events;
pub mod runner;
pub mod source;
pub mod types;

pub use backend::{ImageBackend, ImageRequest, MockImageBackend, OpenAiImageBackend};
pub use client::{GenerationClient, GenerationClientBuilder, GenerationConfig};
pub use error::{GenerationError, SourceError};
pub use events::{Event, EventHandler, FnEventHandler};
pub use runner::BatchRunner;
pub use source::{CsvSource, PromptSource, SheetSource};
pub use types::{
    BatchResult, FatalError, GeneratedImage, GenerationOutcome, Prompt, PromptBatch,
};
