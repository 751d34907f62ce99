//! Request/response calls against the chat backend.
//!
//! Every call is a single attempt: no retries and no caching. Callers decide
//! how a failure degrades (offline session list, disabled model picker, failed
//! attachment chip, inline error in the transcript).

use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{AppendMessageRequest, ChatRequest, ModelInfo, Session};
use crate::core::constants::{OFFLINE_SESSION_ID, OFFLINE_SESSION_TITLE};
use crate::core::message::{FileAttachment, Message, Role};
use crate::utils::url::{construct_api_url, session_messages_url};

/// Raw body of a streaming chat response.
pub type ChatByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, GatewayError>> + Send>>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("[error {status}] {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("session title must not be empty")]
    EmptyTitle,
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
    #[error("failed to read {path}: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl GatewayError {
    /// Text shown in place of the element a failed call was filling.
    pub fn inline_message(&self) -> String {
        match self {
            GatewayError::Status { .. } => self.to_string(),
            other => format!("[error] {other}"),
        }
    }
}

/// The backend contract the client consumes.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn list_sessions(&self) -> Result<Vec<Session>, GatewayError>;

    async fn create_session(&self, title: &str) -> Result<Session, GatewayError>;

    /// Messages of a session, oldest first.
    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, GatewayError>;

    async fn append_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), GatewayError>;

    async fn list_models(&self) -> Result<Vec<ModelInfo>, GatewayError>;

    /// Upload never fails outright; a failed upload comes back flagged.
    async fn upload_file(&self, path: &Path) -> FileAttachment;

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatByteStream, GatewayError>;
}

/// Synthetic entry shown when the session list cannot be fetched.
pub fn offline_session() -> Session {
    Session {
        id: OFFLINE_SESSION_ID.to_string(),
        title: OFFLINE_SESSION_TITLE.to_string(),
    }
}

/// List sessions, degrading to the single offline placeholder on any failure.
pub async fn load_sessions_or_offline(backend: &dyn ChatBackend) -> Vec<Session> {
    match backend.list_sessions().await {
        Ok(sessions) => sessions,
        Err(err) => {
            warn!(error = %err, "Session list unavailable, using offline placeholder");
            vec![offline_session()]
        }
    }
}

#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        construct_api_url(&self.base_url, endpoint)
    }

    fn messages_url(&self, session_id: &str) -> Result<reqwest::Url, GatewayError> {
        session_messages_url(&self.base_url, session_id)
            .ok_or_else(|| GatewayError::InvalidUrl(self.base_url.clone()))
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GatewayError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        Err(GatewayError::Status {
            status,
            body: body.trim().to_string(),
        })
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn try_upload(&self, path: &Path, name: &str) -> Result<FileAttachment, GatewayError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| GatewayError::File {
                path: path.display().to_string(),
                source,
            })?;
        let part = Part::bytes(data).file_name(name.to_string());
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(self.url("upload"))
            .multipart(form)
            .send()
            .await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl ChatBackend for HttpGateway {
    async fn list_sessions(&self) -> Result<Vec<Session>, GatewayError> {
        let response = self.client.get(self.url("sessions")).send().await?;
        Self::read_json(response).await
    }

    async fn create_session(&self, title: &str) -> Result<Session, GatewayError> {
        if title.trim().is_empty() {
            return Err(GatewayError::EmptyTitle);
        }
        debug!(%title, "Creating session");
        let response = self
            .client
            .post(self.url("sessions"))
            .query(&[("title", title)])
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn list_messages(&self, session_id: &str) -> Result<Vec<Message>, GatewayError> {
        let response = self
            .client
            .get(self.messages_url(session_id)?)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn append_message(
        &self,
        session_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), GatewayError> {
        let body = AppendMessageRequest {
            role: role.as_str(),
            content,
        };
        let response = self
            .client
            .post(self.messages_url(session_id)?)
            .json(&body)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
        let response = self.client.get(self.url("models")).send().await?;
        Self::read_json(response).await
    }

    async fn upload_file(&self, path: &Path) -> FileAttachment {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match self.try_upload(path, &name).await {
            Ok(attachment) => attachment,
            Err(err) => {
                warn!(file = %name, error = %err, "Upload failed");
                FileAttachment::failed(name)
            }
        }
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatByteStream, GatewayError> {
        debug!(
            session_id = %request.session_id,
            model = %request.model,
            files = request.file_ids.len(),
            history = request.history.len(),
            "Posting chat request"
        );
        let response = self
            .client
            .post(self.url("chat"))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(GatewayError::from));
        Ok(Box::pin(stream))
    }
}
