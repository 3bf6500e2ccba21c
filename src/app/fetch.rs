//! Driving explanation streams into controller events

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::controller::{ExplanationEvent, ViewController};
use crate::cache::SessionCache;
use crate::explain::{ChunkStream, Explainer};

/// Consume a chunk stream, reporting each fragment and the final outcome
///
/// Stops quietly if the receiver goes away or `shutdown` fires. Selecting
/// another section never cancels this loop; the controller discards its
/// events by generation instead.
pub async fn forward_chunks(
    generation: u64,
    mut chunks: ChunkStream,
    tx: mpsc::Sender<ExplanationEvent>,
    shutdown: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::debug!("Explanation stream {} abandoned at shutdown", generation);
                return;
            }
            next = chunks.next() => next,
        };

        let event = match next {
            Some(Ok(text)) => ExplanationEvent::Chunk { generation, text },
            Some(Err(e)) => {
                tracing::error!("Explanation request failed: {}", e);
                if e.requires_reauth() {
                    tracing::warn!("Check the configured API key");
                }
                let message = e.user_message().to_string();
                let _ = tx.send(ExplanationEvent::Failed { generation, message }).await;
                return;
            }
            None => {
                let _ = tx.send(ExplanationEvent::Completed { generation }).await;
                return;
            }
        };

        if tx.send(event).await.is_err() {
            return;
        }
    }
}

/// Select a section and start streaming its explanation on a cache miss
///
/// Returns the handle of the spawned stream task, or `None` when the
/// selection was answered without a request.
pub fn select_and_fetch<C: SessionCache>(
    controller: &mut ViewController<C>,
    explainer: &dyn Explainer,
    index: usize,
    tx: &mpsc::Sender<ExplanationEvent>,
    shutdown: &CancellationToken,
) -> Option<JoinHandle<()>> {
    let request = controller.select(index)?;
    tracing::info!("Requesting explanation for section {}", request.index);

    let chunks = explainer.explain(&request.content);
    Some(tokio::spawn(forward_chunks(request.generation, chunks, tx.clone(), shutdown.clone())))
}
