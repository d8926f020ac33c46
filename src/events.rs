//! Event system for batch lifecycle hooks.
//!
//! Provides an optional, non-intrusive way to observe a batch run.
//! The runner emits events when the batch starts, before and after each
//! prompt, and when the batch finishes. Users can implement
//! [`EventHandler`] to receive these events for logging or progress UIs.

use std::sync::Arc;

/// Events emitted during a batch run.
#[derive(Debug, Clone)]
pub enum Event {
    /// A batch run has started.
    BatchStart {
        /// Number of prompts in the batch.
        total: usize,
    },
    /// Generation for one prompt is starting.
    PromptStart {
        /// Position of the prompt within the batch (0-based).
        index: usize,
        /// The prompt text.
        prompt: String,
    },
    /// Generation for one prompt has finished.
    PromptEnd {
        /// Position of the prompt within the batch (0-based).
        index: usize,
        /// Whether generation succeeded.
        ok: bool,
    },
    /// The batch run has finished.
    BatchEnd {
        /// Number of prompts processed.
        total: usize,
        /// Number of prompts that failed.
        failures: usize,
    },
}

/// Handler for batch lifecycle events.
///
/// Implement this trait to receive progress updates during a batch run.
/// This is entirely optional -- the runner works without an event handler.
///
/// # Example
///
/// ```
/// use image_pipeline::events::{Event, EventHandler};
///
/// struct PrintHandler;
///
/// impl EventHandler for PrintHandler {
///     fn on_event(&self, event: Event) {
///         match event {
///             Event::PromptStart { prompt, .. } => println!("generating '{}'", prompt),
///             Event::PromptEnd { index, ok } => println!("[{}] ok={}", index, ok),
///             _ => {}
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Called when the runner emits an event.
    fn on_event(&self, event: Event);
}

/// Emit an event if a handler is present. No-op otherwise.
pub(crate) fn emit(handler: &Option<Arc<dyn EventHandler>>, event: Event) {
    if let Some(ref h) = handler {
        h.on_event(event);
    }
}

/// An [`EventHandler`] backed by a closure.
///
/// # Example
///
/// ```
/// use image_pipeline::events::{Event, FnEventHandler};
/// use std::sync::Arc;
///
/// let handler = Arc::new(FnEventHandler(|event: Event| {
///     if let Event::PromptEnd { index, ok } = event {
///         println!("prompt {} finished, ok={}", index, ok);
///     }
/// }));
/// ```
pub struct FnEventHandler<F: Fn(Event) + Send + Sync>(pub F);

impl<F: Fn(Event) + Send + Sync> EventHandler for FnEventHandler<F> {
    fn on_event(&self, event: Event) {
        (self.0)(event);
    }
}
