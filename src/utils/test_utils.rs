use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::gateway::{ChatBackend, ChatByteStream, GatewayError};
use crate::api::{ChatRequest, ModelInfo, Session};
use crate::core::app::App;
use crate::core::config::data::Config;
use crate::core::message::{FileAttachment, Message, Role};

pub fn create_test_app() -> App {
    App::new(&Config::default())
}

pub fn create_test_messages() -> Vec<Message> {
    vec![
        Message::user("Hello"),
        Message::assistant("Hi there!"),
        Message::user("How are you?"),
        Message::assistant("I'm doing well, thank you for asking!"),
    ]
}

pub fn model(id: &str, vision: bool) -> ModelInfo {
    ModelInfo {
        id: id.to_string(),
        name: id.to_uppercase(),
        vision,
    }
}

/// In-memory backend that records every call in order.
pub struct FakeBackend {
    calls: Mutex<Vec<String>>,
    sessions: Option<Vec<Session>>,
    messages: Mutex<HashMap<String, Vec<Message>>>,
    models: Option<Vec<ModelInfo>>,
    chat_body: Vec<String>,
    chat_status: Option<(u16, String)>,
    stream_failure: bool,
    assistant_append_failure: bool,
    last_chat_request: Mutex<Option<ChatRequest>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            sessions: Some(Vec::new()),
            messages: Mutex::new(HashMap::new()),
            models: Some(Vec::new()),
            chat_body: Vec::new(),
            chat_status: None,
            stream_failure: false,
            assistant_append_failure: false,
            last_chat_request: Mutex::new(None),
        }
    }

    pub fn with_sessions(mut self, sessions: &[(&str, &str)]) -> Self {
        self.sessions = Some(
            sessions
                .iter()
                .map(|(id, title)| Session {
                    id: id.to_string(),
                    title: title.to_string(),
                })
                .collect(),
        );
        self
    }

    pub fn without_sessions(mut self) -> Self {
        self.sessions = None;
        self
    }

    pub fn with_messages(self, session_id: &str, messages: Vec<Message>) -> Self {
        self.messages
            .lock()
            .unwrap()
            .insert(session_id.to_string(), messages);
        self
    }

    pub fn with_models(mut self, models: Vec<ModelInfo>) -> Self {
        self.models = Some(models);
        self
    }

    pub fn without_models(mut self) -> Self {
        self.models = None;
        self
    }

    pub fn with_chat_body(mut self, pieces: &[&str]) -> Self {
        self.chat_body = pieces.iter().map(|piece| piece.to_string()).collect();
        self
    }

    pub fn with_chat_status(mut self, status: u16, body: &str) -> Self {
        self.chat_status = Some((status, body.to_string()));
        self
    }

    pub fn with_stream_failure(mut self) -> Self {
        self.stream_failure = true;
        self
    }

    pub fn with_assistant_append_failure(mut self) -> Self {
        self.assistant_append_failure = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_chat_request(&self) -> Option<ChatRequest> {
        self.last_chat_request.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn unavailable() -> GatewayError {
        GatewayError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn list_sessions(&self) -> Result<Vec<Session>, GatewayError> {
        self.record("list_sessions".to_string());
        self.sessions.clone().ok_or_else(Self::unavailable)
    }

    async fn create_session(&self, title: &str) -> Result<Session, GatewayError> {
        self.record(format!("create_session:{title}"));
        if title.trim().is_empty() {
            return Err(GatewayError::EmptyTitle);
        }
        let count = self.messages.lock().unwrap().len();
        Ok(Session {
            id: format!("new-{count}"),
            title: title.to_string(),
        })
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, GatewayError> {
        self.record(format!("list_messages:{session_id}"));
        Ok(self
            .messages
            .lock()
            .unwrap()
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), GatewayError> {
        self.record(format!("append:{session_id}:{}", role.as_str()));
        if role.is_assistant() && self.assistant_append_failure {
            return Err(Self::unavailable());
        }
        self.messages
            .lock()
            .unwrap()
            .entry(session_id.to_string())
            .or_default()
            .push(Message {
                role,
                content: content.to_string(),
            });
        Ok(())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
        self.record("list_models".to_string());
        self.models.clone().ok_or_else(Self::unavailable)
    }

    async fn upload_file(&self, path: &Path) -> FileAttachment {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.record(format!("upload:{name}"));
        if name.starts_with("broken") {
            return FileAttachment::failed(name);
        }
        FileAttachment {
            file_id: Some(format!("file-{name}")),
            name,
            error: false,
        }
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatByteStream, GatewayError> {
        self.record(format!("send_chat:{}", request.session_id));
        *self.last_chat_request.lock().unwrap() = Some(request.clone());
        if let Some((status, body)) = &self.chat_status {
            return Err(GatewayError::Status {
                status: *status,
                body: body.clone(),
            });
        }

        let mut items: Vec<Result<Vec<u8>, GatewayError>> = self
            .chat_body
            .iter()
            .map(|piece| Ok(piece.as_bytes().to_vec()))
            .collect();
        if self.stream_failure {
            items.push(Err(GatewayError::Status {
                status: 502,
                body: "stream interrupted".to_string(),
            }));
        }
        Ok(Box::pin(futures_util::stream::iter(items)))
    }
}
