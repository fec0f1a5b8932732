//! HTTP client for the pet API.
//!
//! # Purpose
//! One call per server operation. Each call either returns the decoded JSON
//! body or fails with an error naming the operation, so the UI can show a
//! short "Failed to ..." message.
//!
//! # Notes
//! No retries, timeouts or caching are layered on top; every call is a direct
//! request. Failures are logged at `warn` for diagnostics.
use crate::config::ClientConfig;
use crate::model::{DeleteConfirmation, Pet, PetDraft};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const OP_LIST: &str = "fetch pets";
pub const OP_GET: &str = "fetch pet";
pub const OP_CREATE: &str = "create pet";
pub const OP_UPDATE: &str = "update pet";
pub const OP_DELETE: &str = "delete pet";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("Failed to {operation}")]
    RequestFailed {
        operation: &'static str,
        status: reqwest::StatusCode,
        message: Option<String>,
    },
    #[error("Failed to {operation}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to {operation}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    pub fn operation(&self) -> &'static str {
        match self {
            ClientError::RequestFailed { operation, .. }
            | ClientError::Transport { operation, .. }
            | ClientError::Decode { operation, .. } => operation,
        }
    }

    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ClientError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Server operations the list/detail controller depends on.
#[async_trait]
pub trait PetApi: Send + Sync {
    async fn list_pets(&self) -> ClientResult<Vec<Pet>>;
    async fn get_pet(&self, id: &str) -> ClientResult<Pet>;
    async fn create_pet(&self, draft: &PetDraft) -> ClientResult<Pet>;
    async fn update_pet(&self, id: &str, draft: &PetDraft) -> ClientResult<Pet>;
    async fn delete_pet(&self, id: &str) -> ClientResult<DeleteConfirmation>;
}

#[derive(Debug, Clone)]
pub struct PetClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

impl PetClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    pub fn with_http_client(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn pets_url(&self) -> String {
        format!("{}/pets", self.base_url)
    }

    // The id is pushed as one percent-encoded path segment.
    fn pet_url(&self, id: &str) -> String {
        let mut url = match reqwest::Url::parse(&self.pets_url()) {
            Ok(url) => url,
            // Sending to an unparseable base fails as a transport error.
            Err(_) => return self.pets_url(),
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url.to_string()
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<T> {
        let response = request.send().await.map_err(|source| {
            tracing::warn!(operation, error = %source, "pet api request failed");
            ClientError::Transport { operation, source }
        })?;
        let status = response.status();
        if !status.is_success() {
            // Keep the server's message for diagnostics; the UI shows the
            // operation-level message only.
            let message = response.json::<ErrorBody>().await.ok().map(|body| body.message);
            tracing::warn!(
                operation,
                %status,
                message = message.as_deref().unwrap_or(""),
                "pet api returned an error status"
            );
            return Err(ClientError::RequestFailed {
                operation,
                status,
                message,
            });
        }
        response.json::<T>().await.map_err(|source| {
            tracing::warn!(operation, error = %source, "pet api response body invalid");
            ClientError::Decode { operation, source }
        })
    }
}

#[async_trait]
impl PetApi for PetClient {
    async fn list_pets(&self) -> ClientResult<Vec<Pet>> {
        self.send(OP_LIST, self.http.get(self.pets_url())).await
    }

    async fn get_pet(&self, id: &str) -> ClientResult<Pet> {
        self.send(OP_GET, self.http.get(self.pet_url(id))).await
    }

    async fn create_pet(&self, draft: &PetDraft) -> ClientResult<Pet> {
        self.send(OP_CREATE, self.http.post(self.pets_url()).json(draft))
            .await
    }

    async fn update_pet(&self, id: &str, draft: &PetDraft) -> ClientResult<Pet> {
        self.send(OP_UPDATE, self.http.put(self.pet_url(id)).json(draft))
            .await
    }

    async fn delete_pet(&self, id: &str) -> ClientResult<DeleteConfirmation> {
        self.send(OP_DELETE, self.http.delete(self.pet_url(id)))
            .await
    }
}
