//! A task store reached over a PostgREST-style HTTP API (e.g. Supabase)

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response};
use url::Url;

use crate::config::GatewayConfig;
use crate::error::StoreError;
use crate::task::{NewTask, Task, TaskId};
use crate::traits::TaskGateway;

/// A [`TaskGateway`] that sends one HTTP request per call
pub struct RestGateway {
    config: GatewayConfig,
    endpoint: Url,
    http: reqwest::Client,
}

impl RestGateway {
    /// Create a gateway. This does not start a connection
    pub fn new(config: GatewayConfig) -> Result<Self, StoreError> {
        let endpoint = config.resource.collection_url(&config.collection)?;
        log::debug!("Task store endpoint is {}", endpoint);
        Ok(Self {
            config,
            endpoint,
            http: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Add the credentials every request must carry
    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.config.resource.api_key();
        request
            .header("apikey", key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", key))
    }

    async fn send(&self, request: RequestBuilder, descr: &str) -> Result<Response, StoreError> {
        let response = self.authed(request).send().await?;
        let status = response.status();
        if status.is_success() == false {
            let body = response.text().await.unwrap_or_default();
            log::debug!("{} failed with status {}: {}", descr, status, body);
            return Err(StoreError::new(format!("Unexpected HTTP status code {} for {}: {}", status, descr, body)));
        }
        Ok(response)
    }
}

/// Format ids for a PostgREST `in.(...)` filter, quoting the ones that contain reserved characters
fn in_filter(ids: &[TaskId]) -> String {
    let values: Vec<String> = ids.iter()
        .map(|id| {
            let raw = id.as_str();
            if raw.chars().any(|c| ",.:()\"\\ ".contains(c)) {
                format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
            } else {
                raw.to_string()
            }
        })
        .collect();
    format!("in.({})", values.join(","))
}

#[async_trait]
impl TaskGateway for RestGateway {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let request = self.http
            .get(self.endpoint.clone())
            .query(&[("select", "*"), ("order", "deadline.asc")]);
        let text = self.send(request, "list_all").await?.text().await?;
        let tasks: Vec<Task> = serde_json::from_str(&text)?;
        log::info!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        let body = serde_json::to_string(&[&task])?;
        let request = self.http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
            .body(body);
        let text = self.send(request, "insert").await?.text().await?;

        let mut rows: Vec<Task> = serde_json::from_str(&text)?;
        if rows.len() != 1 {
            return Err(StoreError::new(format!("insert returned {} rows instead of 1", rows.len())));
        }
        let created = rows.remove(0);
        log::debug!("Task {} created", created.id());
        Ok(created)
    }

    async fn set_completed(&self, id: &TaskId, completed: bool) -> Result<(), StoreError> {
        let body = serde_json::json!({ "completed": completed }).to_string();
        let request = self.http
            .patch(self.endpoint.clone())
            .query(&[("id", format!("eq.{}", id))])
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.send(request, "set_completed").await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &TaskId) -> Result<(), StoreError> {
        let request = self.http
            .delete(self.endpoint.clone())
            .query(&[("id", format!("eq.{}", id))]);
        self.send(request, "delete_by_id").await?;
        Ok(())
    }

    async fn delete_by_ids(&self, ids: &[TaskId]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        let request = self.http
            .delete(self.endpoint.clone())
            .query(&[("id", in_filter(ids))]);
        self.send(request, "delete_by_ids").await?;
        Ok(())
    }
}
