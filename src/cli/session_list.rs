//! Session listing, creation and transcript printing.

use std::error::Error;
use std::io::Write;

use crate::api::gateway::{load_sessions_or_offline, ChatBackend};
use crate::core::app::chat_view::prepare_history;

pub async fn list_sessions(
    backend: &dyn ChatBackend,
    out: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    let sessions = load_sessions_or_offline(backend).await;
    writeln!(out, "💬 Sessions")?;
    writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    if sessions.is_empty() {
        writeln!(out, "No sessions yet. Create one with 'lanchat new-session <title>'.")?;
        return Ok(());
    }
    for session in sessions {
        writeln!(out, "  {}  {}", session.id, session.title)?;
    }
    Ok(())
}

pub async fn create_session(
    backend: &dyn ChatBackend,
    title: &str,
    out: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    let session = backend.create_session(title.trim()).await?;
    writeln!(out, "✅ Created session {}: {}", session.id, session.title)?;
    Ok(())
}

/// Print a session's transcript with assistant replies cleaned up the same
/// way the chat view shows them.
pub async fn print_history(
    backend: &dyn ChatBackend,
    session_id: &str,
    out: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    let messages = prepare_history(backend.list_messages(session_id).await?);
    if messages.is_empty() {
        writeln!(out, "No messages yet.")?;
        return Ok(());
    }
    for (index, message) in messages.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}: {}", message.role.display_prefix(), message.content)?;
    }
    Ok(())
}
