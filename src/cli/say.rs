//! TUI-less "say" command

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::gateway::ChatBackend;
use crate::core::chat_stream::{ChatStreamService, SendRequest, StreamMessage};

pub struct SayOptions {
    pub session_id: String,
    pub model: String,
    pub attachments: Vec<PathBuf>,
    pub history_limit: usize,
    pub prompt: String,
}

/// Run one send through the same flow the chat view uses, streaming the
/// reply to `out` as it arrives.
pub async fn run_say(
    backend: Arc<dyn ChatBackend>,
    options: SayOptions,
    out: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    let prompt = options.prompt.trim().to_string();
    if prompt.is_empty() {
        return Err("Usage: lanchat say --session <id> <prompt>".into());
    }

    let mut file_ids = Vec::new();
    for path in &options.attachments {
        let attachment = backend.upload_file(path).await;
        match attachment.file_id {
            Some(file_id) if !attachment.error => file_ids.push(file_id),
            _ => return Err(format!("Upload failed: {}", attachment.name).into()),
        }
    }

    let (stream_service, mut rx) = ChatStreamService::new();
    stream_service.spawn_send(
        backend,
        SendRequest {
            request_id: 1,
            session_id: options.session_id,
            prompt,
            model: options.model,
            file_ids,
            history_limit: options.history_limit,
        },
    );
    // The spawned send holds the last sender, so the channel closes with it.
    drop(stream_service);

    let mut cost = 0.0;
    while let Some((message, _)) = rx.recv().await {
        match message {
            StreamMessage::Fragment(content) => {
                write!(out, "{content}")?;
                out.flush()?;
            }
            StreamMessage::Cost(amount) => cost += amount,
            StreamMessage::Completed(_) => {
                writeln!(out)?;
                if cost > 0.0 {
                    writeln!(out, "Cost: ${cost:.2}")?;
                }
                return Ok(());
            }
            StreamMessage::Error(err) => {
                writeln!(out)?;
                return Err(err.into());
            }
        }
    }

    Err("send ended without a result".into())
}
