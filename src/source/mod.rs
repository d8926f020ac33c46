//! Prompt sources: where a batch comes from.
//!
//! The [`PromptSource`] trait abstracts over the two ingestion variants,
//! which share one contract: produce an ordered batch of trimmed,
//! non-empty prompts, or a classified [`SourceError`]. Built-in
//! implementations: [`CsvSource`] for uploaded tabular files and
//! [`SheetSource`] for remote spreadsheets.
//!
//! A source error always aborts batch construction — no partial batch is
//! ever passed downstream.

pub mod csv;
pub mod sheet;

pub use csv::CsvSource;
pub use sheet::SheetSource;

use crate::error::SourceError;
use crate::types::PromptBatch;
use async_trait::async_trait;

/// Default column index for prompt extraction (column A).
pub const DEFAULT_PROMPT_COLUMN: usize = 0;

/// Abstraction over prompt-list origins.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as
/// `Box<dyn PromptSource>`, so the boundary can pick a variant per request.
#[async_trait]
pub trait PromptSource: Send + Sync {
    /// Produce the prompt batch, or the classified reason it could not be
    /// built.
    async fn load(&self) -> Result<PromptBatch, SourceError>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// Read the prompt column index from the `PROMPT_COLUMN_INDEX` environment
/// variable. Falls back to [`DEFAULT_PROMPT_COLUMN`] when unset or
/// unparseable.
pub fn column_index_from_env() -> usize {
    std::env::var("PROMPT_COLUMN_INDEX")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_PROMPT_COLUMN)
}
