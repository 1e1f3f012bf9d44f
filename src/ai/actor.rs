//! AI actor: runs assist requests off the UI loop

use tokio::sync::mpsc;

use super::assist::AssistRequest;
use super::client::{ClientError, OpenRouterClient};
use crate::actor::{RetryConfig, with_retry};

/// Correlates a result with the request that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

#[derive(Debug)]
pub enum AiCommand {
    Assist {
        request_id: RequestId,
        request: AssistRequest,
    },
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiEvent {
    /// Replacement body for the draft
    Revised { request_id: RequestId, body: String },
    Failed { request_id: RequestId, error: String },
}

/// Handle for communicating with the AI actor
pub struct AiActorHandle {
    pub cmd_tx: mpsc::Sender<AiCommand>,
    pub event_rx: mpsc::Receiver<AiEvent>,
}

pub fn spawn_ai_actor(client: OpenRouterClient, max_tokens: u32) -> AiActorHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(32);

    tokio::spawn(ai_actor_loop(client, max_tokens, cmd_rx, event_tx));

    AiActorHandle { cmd_tx, event_rx }
}

async fn ai_actor_loop(
    client: OpenRouterClient,
    max_tokens: u32,
    mut cmd_rx: mpsc::Receiver<AiCommand>,
    event_tx: mpsc::Sender<AiEvent>,
) {
    let retry = RetryConfig::default();

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            AiCommand::Assist {
                request_id,
                request,
            } => {
                tracing::debug!("AI {} request {:?} started", request.kind(), request_id);
                let user_content = request.user_content();
                let result = with_retry(&retry, ClientError::is_transient, || {
                    client.complete(request.system_prompt(), &user_content, max_tokens)
                })
                .await;

                let event = match result {
                    Ok(body) => AiEvent::Revised { request_id, body },
                    Err(e) => {
                        tracing::warn!("AI {} request {:?} failed: {}", request.kind(), request_id, e);
                        AiEvent::Failed {
                            request_id,
                            error: format!("AI {} failed: {}", request.kind(), e),
                        }
                    }
                };
                if event_tx.send(event).await.is_err() {
                    tracing::warn!("AI actor: event receiver dropped");
                    break;
                }
            }
            AiCommand::Shutdown => break,
        }
    }
    tracing::debug!("AI actor stopped");
}
