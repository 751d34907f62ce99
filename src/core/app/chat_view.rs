//! What the chat pane shows, independent of how it is drawn.

use crate::core::constants::{
    EMPTY_SESSION_TEXT, LOADING_TEXT, NO_SESSION_TEXT, THINKING_TEXT,
};
use crate::core::message::{Message, Role};
use crate::core::postprocess::postprocess;

#[derive(Debug, Clone, PartialEq)]
pub enum PlaceholderStatus {
    Thinking,
    Streaming,
    Failed(String),
}

/// The provisional assistant entry a send streams into.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub request_id: u64,
    pub content: String,
    pub status: PlaceholderStatus,
}

impl Placeholder {
    pub fn new(request_id: u64) -> Self {
        Self {
            request_id,
            content: String::new(),
            status: PlaceholderStatus::Thinking,
        }
    }

    pub fn text(&self) -> &str {
        match &self.status {
            PlaceholderStatus::Thinking => THINKING_TEXT,
            PlaceholderStatus::Streaming => &self.content,
            PlaceholderStatus::Failed(message) => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    pub messages: Vec<Message>,
    pub placeholder: Option<Placeholder>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ChatView {
    #[default]
    NoSession,
    Loading,
    Failed(String),
    Transcript(Transcript),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    User,
    Assistant,
    Notice,
    Error,
}

/// One renderable block of the chat pane.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    pub kind: EntryKind,
    pub text: String,
}

impl ChatEntry {
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Notice,
            text: text.into(),
        }
    }
}

/// Post-process assistant content as it comes from the backend.
pub fn prepare_history(messages: Vec<Message>) -> Vec<Message> {
    messages
        .into_iter()
        .map(|message| match message.role {
            Role::Assistant => Message::assistant(postprocess(&message.content)),
            Role::User => message,
        })
        .collect()
}

impl ChatView {
    pub fn loaded(messages: Vec<Message>) -> Self {
        ChatView::Transcript(Transcript {
            messages: prepare_history(messages),
            placeholder: None,
        })
    }

    pub fn transcript_mut(&mut self) -> Option<&mut Transcript> {
        match self {
            ChatView::Transcript(transcript) => Some(transcript),
            _ => None,
        }
    }

    /// The placeholder, if it belongs to `request_id`.
    pub fn placeholder_for(&mut self, request_id: u64) -> Option<&mut Placeholder> {
        self.transcript_mut()?
            .placeholder
            .as_mut()
            .filter(|placeholder| placeholder.request_id == request_id)
    }

    pub fn owns(&self, request_id: u64) -> bool {
        matches!(
            self,
            ChatView::Transcript(Transcript {
                placeholder: Some(placeholder),
                ..
            }) if placeholder.request_id == request_id
        )
    }

    /// Append the user's message and a fresh placeholder, dropping any stale one.
    pub fn begin_send(&mut self, prompt: &str, request_id: u64) {
        if !matches!(self, ChatView::Transcript(_)) {
            *self = ChatView::Transcript(Transcript::default());
        }
        if let Some(transcript) = self.transcript_mut() {
            transcript.messages.push(Message::user(prompt));
            transcript.placeholder = Some(Placeholder::new(request_id));
        }
    }

    pub fn entries(&self) -> Vec<ChatEntry> {
        match self {
            ChatView::NoSession => vec![ChatEntry::notice(NO_SESSION_TEXT)],
            ChatView::Loading => vec![ChatEntry::notice(LOADING_TEXT)],
            ChatView::Failed(error) => vec![ChatEntry {
                kind: EntryKind::Error,
                text: format!("Failed to load messages: {error}"),
            }],
            ChatView::Transcript(transcript) => {
                if transcript.messages.is_empty() && transcript.placeholder.is_none() {
                    return vec![ChatEntry::notice(EMPTY_SESSION_TEXT)];
                }
                let mut entries: Vec<ChatEntry> = transcript
                    .messages
                    .iter()
                    .map(|message| ChatEntry {
                        kind: match message.role {
                            Role::User => EntryKind::User,
                            Role::Assistant => EntryKind::Assistant,
                        },
                        text: message.content.clone(),
                    })
                    .collect();
                if let Some(placeholder) = &transcript.placeholder {
                    entries.push(ChatEntry {
                        kind: match placeholder.status {
                            PlaceholderStatus::Failed(_) => EntryKind::Error,
                            _ => EntryKind::Assistant,
                        },
                        text: placeholder.text().to_string(),
                    });
                }
                entries
            }
        }
    }
}
