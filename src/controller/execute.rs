use crate::client::{BackendError, Client};
use crate::model::Resource;
use crate::types::Outcome;

/// Classified result of one backend call
#[derive(Debug)]
pub enum Execution<T> {
    Done(T),
    NotFound(BackendError),
    Failed(BackendError),
}

impl<T> Execution<T> {
    /// Reads distinguish a missing entity; anything else is a generic failure
    fn read(result: Result<T, BackendError>) -> Self {
        match result {
            Ok(value) => Execution::Done(value),
            Err(e) if e.is_not_found() => Execution::NotFound(e),
            Err(e) => Execution::Failed(e),
        }
    }

    /// Writes never report not-found; every error is a generic failure
    fn write(result: Result<T, BackendError>) -> Self {
        match result {
            Ok(value) => Execution::Done(value),
            Err(e) => Execution::Failed(e),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Execution::Done(_) => Outcome::Success,
            Execution::NotFound(_) => Outcome::NotFound,
            Execution::Failed(_) => Outcome::BackendError,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Execution::Done(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&BackendError> {
        match self {
            Execution::Done(_) => None,
            Execution::NotFound(e) | Execution::Failed(e) => Some(e),
        }
    }
}

pub async fn list<M: Resource>(client: &Client) -> Execution<Vec<M>> {
    tracing::debug!(resource = M::NAME, "listing");
    Execution::read(M::collection(client).list().await)
}

pub async fn get<M: Resource>(client: &Client, id: &str) -> Execution<M> {
    tracing::debug!(resource = M::NAME, id, "fetching");
    Execution::read(M::collection(client).get(id).await)
}

pub async fn create<M: Resource>(client: &Client, model: &M) -> Execution<()> {
    tracing::debug!(resource = M::NAME, "creating");
    Execution::write(M::collection(client).create(model).await)
}

pub async fn update<M: Resource>(client: &Client, id: &str, model: &M) -> Execution<()> {
    tracing::debug!(resource = M::NAME, id, "updating");
    Execution::write(M::collection(client).update(id, model).await)
}
