use std::{
    future::Future,
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tally_api::v1::{Todo, TodoFields, TodoPage};
use tracing::debug;

use crate::{error::ClientError, API_URL};

/// The remote todo resource, as seen by the store.
///
/// Every call is a single request/response round trip with no retries.
pub trait RemoteTodos {
    fn list_all(&self) -> impl Future<Output = Result<Vec<Todo>, ClientError>> + Send;

    fn create(
        &self,
        fields: TodoFields,
    ) -> impl Future<Output = Result<Todo, ClientError>> + Send;

    fn update(
        &self,
        id: u64,
        fields: TodoFields,
    ) -> impl Future<Output = Result<Todo, ClientError>> + Send;

    fn delete(&self, id: u64) -> impl Future<Output = Result<(), ClientError>> + Send;
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    /// How long a list response is reused before it is fetched again.
    pub list_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(API_URL),
            list_ttl: Duration::from_secs(3600),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct TodoClient {
    http: reqwest::Client,
    base_url: String,
    list_ttl: Duration,
    list_cache: Mutex<Option<(Instant, Vec<Todo>)>>,
}

impl TodoClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tally/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            list_ttl: config.list_ttl,
            list_cache: Mutex::new(None),
        })
    }

    pub fn invalidate_list_cache(&self) {
        *self.cache() = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, Option<(Instant, Vec<Todo>)>> {
        self.list_cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cached_list(&self) -> Option<Vec<Todo>> {
        match &*self.cache() {
            Some((fetched, todos)) if fetched.elapsed() < self.list_ttl => Some(todos.clone()),
            _ => None,
        }
    }
}

impl RemoteTodos for TodoClient {
    async fn list_all(&self) -> Result<Vec<Todo>, ClientError> {
        if let Some(todos) = self.cached_list() {
            debug!(count = todos.len(), "using cached todo list");
            return Ok(todos);
        }

        let request = self.http.get(self.url("/todos")).query(&[("limit", 0)]);
        let page: TodoPage = spawn(fetch(request)).await?;

        debug!(count = page.todos.len(), total = page.total, "fetched todo list");

        *self.cache() = Some((Instant::now(), page.todos.clone()));

        Ok(page.todos)
    }

    async fn create(&self, fields: TodoFields) -> Result<Todo, ClientError> {
        let request = self.http.post(self.url("/todos/add")).json(&fields);
        spawn(fetch(request)).await
    }

    async fn update(&self, id: u64, fields: TodoFields) -> Result<Todo, ClientError> {
        let request = self
            .http
            .patch(self.url(&format!("/todos/{}", id)))
            .json(&fields);

        spawn(fetch(request)).await
    }

    async fn delete(&self, id: u64) -> Result<(), ClientError> {
        let request = self.http.delete(self.url(&format!("/todos/{}", id)));
        spawn(send(request)).await?;

        Ok(())
    }
}

async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let body = send(request).await?;
    Ok(serde_json::from_slice(&body)?)
}

async fn send(request: RequestBuilder) -> Result<Vec<u8>, ClientError> {
    let response = request.send().await?;
    let response = response.error_for_status()?;

    Ok(response.bytes().await?.to_vec())
}

/// Runs a request on the runtime instead of the calling task.
pub async fn spawn<T: Send + 'static>(
    fut: impl Future<Output = Result<T, ClientError>> + Send + 'static,
) -> Result<T, ClientError> {
    tokio::spawn(fut).await?
}
