//! The send flow: persist the prompt, gather context, stream the reply,
//! persist it and fetch the authoritative transcript.
//!
//! The three calls before the chat request are strictly ordered so that the
//! freshly sent user message is part of the history the model sees.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::gateway::{ChatBackend, GatewayError};
use crate::api::ChatRequest;
use crate::core::message::{Message, Role};
use crate::core::stream_assembler::{assemble_stream, StreamEvent};

#[derive(Clone, Debug, PartialEq)]
pub enum StreamMessage {
    Fragment(String),
    Cost(f64),
    Completed(SendOutcome),
    Error(String),
}

/// Everything needed to run one send.
#[derive(Clone, Debug, PartialEq)]
pub struct SendRequest {
    pub request_id: u64,
    pub session_id: String,
    pub prompt: String,
    pub model: String,
    pub file_ids: Vec<String>,
    pub history_limit: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SendOutcome {
    /// The assembled, post-processed assistant reply.
    pub content: String,
    /// Refetched transcript, when persisting and refetching both succeeded.
    pub messages: Option<Vec<Message>>,
}

/// Keep only the most recent `limit` messages, oldest first.
pub fn recent_history(mut messages: Vec<Message>, limit: usize) -> Vec<Message> {
    if messages.len() > limit {
        messages.drain(..messages.len() - limit);
    }
    messages
}

pub async fn run_send_flow<F>(
    backend: &dyn ChatBackend,
    request: &SendRequest,
    mut on_event: F,
) -> Result<SendOutcome, GatewayError>
where
    F: FnMut(StreamEvent<'_>),
{
    let session_id = request.session_id.as_str();

    backend
        .append_message(session_id, Role::User, &request.prompt)
        .await?;

    let history = recent_history(
        backend.list_messages(session_id).await?,
        request.history_limit,
    );
    debug!(
        request_id = request.request_id,
        history = history.len(),
        "Context gathered"
    );

    let chat_request = ChatRequest {
        session_id: request.session_id.clone(),
        prompt: request.prompt.clone(),
        model: request.model.clone(),
        file_ids: request.file_ids.clone(),
        history,
    };
    let stream = backend.send_chat(&chat_request).await?;
    let content = assemble_stream(stream, &mut on_event).await?;
    debug!(
        request_id = request.request_id,
        chars = content.len(),
        "Stream finished"
    );

    let messages = match backend
        .append_message(session_id, Role::Assistant, &content)
        .await
    {
        Ok(()) => match backend.list_messages(session_id).await {
            Ok(messages) => Some(messages),
            Err(err) => {
                warn!(error = %err, "Could not refetch history after reply");
                None
            }
        },
        Err(err) => {
            warn!(error = %err, "Could not persist assistant reply");
            None
        }
    };

    Ok(SendOutcome { content, messages })
}

#[derive(Clone)]
pub struct ChatStreamService {
    tx: mpsc::UnboundedSender<(StreamMessage, u64)>,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(StreamMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Run a send in the background, reporting progress tagged with its
    /// request id. Nothing cancels it; receivers drop stale ids.
    pub fn spawn_send(&self, backend: Arc<dyn ChatBackend>, request: SendRequest) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let request_id = request.request_id;
            let progress_tx = tx.clone();
            let result = run_send_flow(backend.as_ref(), &request, |event| {
                let message = match event {
                    StreamEvent::Fragment(fragment) => StreamMessage::Fragment(fragment.to_string()),
                    StreamEvent::Cost(cost) => StreamMessage::Cost(cost),
                };
                let _ = progress_tx.send((message, request_id));
            })
            .await;

            let message = match result {
                Ok(outcome) => StreamMessage::Completed(outcome),
                Err(err) => StreamMessage::Error(err.inline_message()),
            };
            let _ = tx.send((message, request_id));
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: StreamMessage, request_id: u64) {
        let _ = self.tx.send((message, request_id));
    }
}
