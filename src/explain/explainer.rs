//! The explanation capability seen by the rest of the application

use futures_util::stream::BoxStream;

use super::error::ExplainError;

/// A one-shot, forward-only sequence of explanation text fragments
///
/// Concatenating every `Ok` item gives the full explanation. The stream is
/// lazy: nothing is sent over the network until it is first polled.
pub type ChunkStream = BoxStream<'static, Result<String, ExplainError>>;

/// Produces streamed explanations for blueprint sections
pub trait Explainer: Send + Sync {
    /// Start explaining a section's raw content
    fn explain(&self, section_content: &str) -> ChunkStream;
}
