use std::sync::Arc;

use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::models::{
    AssignSlotRequest, Class, CreateClassRequest, CreatedResponse, ErrorBody, MessageResponse,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("API returned {status}: {error}")]
    Status { status: u16, error: String },
}

/// Typed client for the `/api` surface.
#[derive(Clone)]
pub struct ClassesClient {
    client: reqwest::Client,
    base_url: Arc<Url>,
}

impl ClassesClient {
    /// `base_url` points at the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Arc::new(base_url),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let text = response.text().await?;
        let error = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        Err(ClientError::Status {
            status: status.as_u16(),
            error,
        })
    }

    pub async fn list(&self) -> Result<Vec<Class>, ClientError> {
        let url = self.endpoint("classes")?;
        let response = self.client.get(url).send().await?;
        Self::read(response).await
    }

    pub async fn get(&self, id: i64) -> Result<Class, ClientError> {
        let url = self.endpoint(&format!("classes/{id}"))?;
        let response = self.client.get(url).send().await?;
        Self::read(response).await
    }

    pub async fn create(&self, request: &CreateClassRequest) -> Result<CreatedResponse, ClientError> {
        let url = self.endpoint("classes")?;
        let response = self.client.post(url).json(request).send().await?;
        Self::read(response).await
    }

    pub async fn duplicate(&self, id: i64) -> Result<CreatedResponse, ClientError> {
        let url = self.endpoint(&format!("classes/{id}/duplicate"))?;
        let response = self.client.post(url).send().await?;
        Self::read(response).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError> {
        let url = self.endpoint(&format!("classes/{id}"))?;
        let response = self.client.delete(url).send().await?;
        Self::read(response).await
    }

    pub async fn assign(
        &self,
        class_id: i64,
        slot_id: i64,
        assigned_to: &str,
    ) -> Result<MessageResponse, ClientError> {
        let url = self.endpoint(&format!("classes/{class_id}/slots/{slot_id}"))?;
        let body = AssignSlotRequest {
            assigned_to: assigned_to.to_string(),
        };
        let response = self.client.put(url).json(&body).send().await?;
        Self::read(response).await
    }
}
