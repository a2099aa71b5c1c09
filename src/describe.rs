//! Authoring business descriptions for destination fields with a streaming
//! text generator.
//!
//! Generated text is appended to the field as it arrives. Cancellation is
//! cooperative: once the flag is raised, further chunks are ignored, and the
//! text already applied stays in place.

use crate::error::{DescribeError, GenerationError};
use crate::path::FieldPath;
use crate::schema::{FieldNode, SchemaNode};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Returned by a chunk callback to tell the generator whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkFlow {
    Continue,
    Stop,
}

/// The final result of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub response: String,
}

/// A streaming text generator, such as a locally hosted language model.
///
/// Implementations call `on_chunk` for every piece of text as it is produced
/// and should stop producing when it returns `ChunkFlow::Stop`.
pub trait TextGenerator {
    fn generate(
        &mut self,
        prompt: &str,
        on_chunk: &mut dyn FnMut(&str) -> ChunkFlow,
    ) -> Result<Generation, GenerationError>;
}

/// An advisory stop signal that can be raised from another handler.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionStatus {
    /// The generator finished; its final response is stored.
    Completed,
    /// Cancelled mid-stream; the streamed text so far is stored.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionOutcome {
    pub text: String,
    pub status: DescriptionStatus,
    pub chunks: usize,
}

/// The default prompt asking for a short business description of a field.
pub fn description_prompt(path: &FieldPath, field: &FieldNode) -> String {
    let mut prompt = format!(
        "Write a concise, one-sentence business description for the data field '{}' \
         (full path '{}', data type {}).",
        field.name, path, field.data_type
    );
    if let Some(format) = &field.metadata.format {
        prompt.push_str(&format!(" Its values use the format '{}'.", format));
    }
    if field.metadata.required == Some(true) {
        prompt.push_str(" The field is required.");
    }
    prompt
}

/// Streams a generated description into the field at `path` of `tree`.
///
/// The field's previous description is replaced as soon as streaming starts.
/// A generator error is returned after the partial text has been applied.
pub fn describe_field(
    tree: &mut SchemaNode,
    path: &FieldPath,
    prompt: &str,
    generator: &mut dyn TextGenerator,
    cancel: &CancellationFlag,
) -> Result<DescriptionOutcome, DescribeError> {
    let field = tree.field_mut(path)?;
    let mut streamed = String::new();
    let mut chunks = 0usize;
    let mut stopped = false;

    let result = {
        let description = field
            .metadata
            .business_description
            .insert(String::new());
        let mut on_chunk = |chunk: &str| {
            if stopped || cancel.is_cancelled() {
                stopped = true;
                return ChunkFlow::Stop;
            }
            description.push_str(chunk);
            streamed.push_str(chunk);
            chunks += 1;
            ChunkFlow::Continue
        };
        generator.generate(prompt, &mut on_chunk)
    };

    let generation = result?;
    let status = if stopped || cancel.is_cancelled() {
        DescriptionStatus::Cancelled
    } else {
        field.metadata.business_description = Some(generation.response.clone());
        streamed = generation.response;
        DescriptionStatus::Completed
    };
    debug!(%path, chunks, ?status, "business description updated");

    Ok(DescriptionOutcome {
        text: streamed,
        status,
        chunks,
    })
}
