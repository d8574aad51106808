use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::error::BackendError;
use super::Auth;

/// Backend operations available for one resource type
#[async_trait]
pub trait Collection<M>: Send + Sync {
    async fn list(&self) -> Result<Vec<M>, BackendError>;

    /// Create a record; identifiers are assigned by the backend
    async fn create(&self, model: &M) -> Result<(), BackendError>;

    async fn get(&self, id: &str) -> Result<M, BackendError>;

    /// Update the record addressed by `id`, ignoring any id carried in `model`
    async fn update(&self, id: &str, model: &M) -> Result<(), BackendError>;
}

/// List endpoints answer either a bare array or an `{"items": [...]}` envelope
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<M> {
    Envelope { items: Vec<M> },
    Bare(Vec<M>),
}

impl<M> ListBody<M> {
    fn into_items(self) -> Vec<M> {
        match self {
            ListBody::Envelope { items } => items,
            ListBody::Bare(items) => items,
        }
    }
}

/// JSON-over-HTTP collection rooted at `{base}/{resource}`
pub struct HttpCollection<M> {
    http: reqwest::Client,
    base: Url,
    resource: &'static str,
    auth: Auth,
    _model: PhantomData<fn() -> M>,
}

impl<M> HttpCollection<M> {
    pub fn new(http: reqwest::Client, base: Url, resource: &'static str, auth: Auth) -> Self {
        Self {
            http,
            base,
            resource,
            auth,
            _model: PhantomData,
        }
    }

    fn url(&self, id: Option<&str>) -> Result<Url, BackendError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                BackendError::InvalidResponse(format!("backend URL {} cannot carry a path", self.base))
            })?;
            segments.pop_if_empty().push(self.resource).extend(id);
        }
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, self.auth.header_value())
    }
}

#[async_trait]
impl<M> Collection<M> for HttpCollection<M>
where
    M: Serialize + DeserializeOwned + Send + Sync,
{
    async fn list(&self) -> Result<Vec<M>, BackendError> {
        let response = self.authorized(self.http.get(self.url(None)?)).send().await?;
        let body: ListBody<M> = check(response).await?.json().await?;
        Ok(body.into_items())
    }

    async fn create(&self, model: &M) -> Result<(), BackendError> {
        let response = self
            .authorized(self.http.post(self.url(None)?))
            .json(model)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<M, BackendError> {
        let response = self.authorized(self.http.get(self.url(Some(id))?)).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn update(&self, id: &str, model: &M) -> Result<(), BackendError> {
        let response = self
            .authorized(self.http.put(self.url(Some(id))?))
            .json(model)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

/// Turn non-2xx responses into typed errors; 404 is the only status classified as not found
pub(crate) async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = error_message(&text).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("backend error")
            .to_string()
    });

    if status == StatusCode::NOT_FOUND {
        Err(BackendError::NotFound(message))
    } else {
        Err(BackendError::rejected(status.as_u16(), message))
    }
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => ["message", "error"]
            .iter()
            .find_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        Err(_) => Some(trimmed.to_string()),
    }
}
