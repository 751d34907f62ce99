//! Wire types for the chat backend and the gateway that speaks to it.

use serde::{Deserialize, Serialize};

use crate::core::message::Message;

pub mod gateway;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub vision: bool,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub prompt: String,
    pub model: String,
    pub file_ids: Vec<String>,
    pub history: Vec<Message>,
}

/// Body of `POST /sessions/{id}/messages`.
#[derive(Debug, Serialize)]
pub struct AppendMessageRequest<'a> {
    pub role: &'a str,
    pub content: &'a str,
}
