//! HTTP client for the mongo-orchestration REST API.
//!
//! Every call is a single request with no timeout: launching a sharded
//! cluster can take minutes and the service answers only when it is done.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use mo_fixture_core::{RequestTemplate, TopologyConfig};

use crate::error::{ClientError, Result};
use crate::resource::{Action, Resource};
use crate::types::CleanupSummary;

/// Default address of the orchestration service.
pub const DEFAULT_ADDRESS: &str = "localhost:8889";

/// Client for the orchestration service.
#[derive(Debug, Clone)]
pub struct OrchestrationClient {
    client: Client,
    base_url: String,
    template: RequestTemplate,
}

impl OrchestrationClient {
    /// Create a client.
    ///
    /// # Arguments
    ///
    /// * `address` - Service address, with or without scheme (e.g. "localhost:8889")
    /// * `template` - Keys merged into every create request
    #[must_use]
    pub fn new(address: &str, template: RequestTemplate) -> Self {
        Self::with_client(Client::new(), address, template)
    }

    /// Create a client around a preconfigured `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, address: &str, template: RequestTemplate) -> Self {
        let base_url = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{address}")
        };

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            template,
        }
    }

    /// Base URL of the service.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether create requests carry credentials.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.template.has_credentials()
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    fn item_url(&self, resource: Resource, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, resource, id)
    }

    /// Create a deployment from `config`, merged over the request template.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Request` on a non-success status or an
    /// array-shaped body.
    pub async fn create(&self, resource: Resource, config: &TopologyConfig) -> Result<Value> {
        let url = self.collection_url(resource);
        let body = self.template.apply(config.to_value()?)?;

        tracing::debug!(resource = %resource, body = %body, "Creating deployment");

        let response = self.client.post(&url).json(&body).send().await?;
        let description = Self::object_body("POST", &url, response).await?;

        tracing::debug!(resource = %resource, response = %description, "Deployment created");
        Ok(description)
    }

    /// Fetch the current description of a deployment.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Request` on a non-success status or an
    /// array-shaped body.
    pub async fn describe(&self, resource: Resource, id: &str) -> Result<Value> {
        let url = self.item_url(resource, id);
        let response = self.client.get(&url).send().await?;
        Self::object_body("GET", &url, response).await
    }

    /// Start or stop a deployment without removing it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Request` if the service rejects the action.
    pub async fn action(&self, resource: Resource, id: &str, action: Action) -> Result<()> {
        let url = self.item_url(resource, id);
        let response = self.client.post(&url).json(&action).send().await?;
        Self::ensure_success("POST", &url, response).await?;

        tracing::debug!(resource = %resource, id = %id, action = ?action, "Action applied");
        Ok(())
    }

    /// Remove a deployment and its processes.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Request` if the service rejects the deletion.
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<()> {
        let url = self.item_url(resource, id);
        let response = self.client.delete(&url).send().await?;
        Self::ensure_success("DELETE", &url, response).await?;

        tracing::debug!(resource = %resource, id = %id, "Deleted");
        Ok(())
    }

    /// List the ids of every deployment in a collection.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Request` on a non-success status and
    /// `ClientError::Parse` if the listing has no array under the collection key.
    pub async fn list(&self, resource: Resource) -> Result<Vec<String>> {
        let url = self.collection_url(resource);
        let response = self.client.get(&url).send().await?;
        let listing = Self::object_body("GET", &url, response).await?;

        let entries = listing
            .get(resource.as_str())
            .and_then(Value::as_array)
            .ok_or_else(|| ClientError::Parse(format!("listing has no `{resource}` array")))?;

        Ok(entries
            .iter()
            .filter_map(|entry| entry.get("id").and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }

    /// Delete every sharded cluster, replica set and server the service knows about.
    ///
    /// Best effort: failures are logged and counted, never returned, so
    /// resources already removed by an earlier teardown do not stop the rest.
    pub async fn shutdown_all(&self) -> CleanupSummary {
        let mut summary = CleanupSummary::default();

        for resource in Resource::TEARDOWN_ORDER {
            let ids = match self.list(resource).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!(resource = %resource, error = %e, "Failed to list deployments");
                    summary.failed += 1;
                    continue;
                }
            };

            for id in ids {
                match self.delete(resource, &id).await {
                    Ok(()) => summary.deleted += 1,
                    Err(e) => {
                        tracing::warn!(resource = %resource, id = %id, error = %e, "Failed to delete deployment");
                        summary.failed += 1;
                    }
                }
            }
        }

        summary
    }

    /// Decode a JSON value into a typed description.
    pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn ensure_success(method: &'static str, url: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!(method, url, status = %status, body = %body, "Orchestration request failed");

        Err(ClientError::Request {
            method,
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    /// Read a response that must be a JSON object. The service reports some
    /// failures as a JSON array even with a success status.
    async fn object_body(method: &'static str, url: &str, response: Response) -> Result<Value> {
        let response = Self::ensure_success(method, url, response).await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let value: Value =
            serde_json::from_str(&text).map_err(|e| ClientError::Parse(e.to_string()))?;

        if value.is_array() {
            tracing::error!(method, url, status, body = %text, "Orchestration returned an error list");
            return Err(ClientError::Request {
                method,
                url: url.to_string(),
                status,
                body: text,
            });
        }

        Ok(value)
    }
}
