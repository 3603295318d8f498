//! `reqwest`-based implementation of the transport traits

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::transport::{TaskTransport, TodolistTransport};
use crate::types::{
    ApiResponse, ItemPayload, Task, TaskId, TasksPage, Todolist, TodolistId, UpdateTaskModel,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

/// HTTP client for the todo service
///
/// Cheap to clone; implements both [`TodolistTransport`] and
/// [`TaskTransport`] so one value can back both environments.
#[derive(Clone)]
pub struct TodoApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TodoApiClient {
    /// Creates a client from explicit configuration
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url,
            api_key: config.api_key,
        }
    }

    /// Creates a client from environment configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingBaseUrl`] or [`ApiError::MissingApiKey`]
    /// when the corresponding variable is not set.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(ApiConfig::from_env()?))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Maps the HTTP status and deserializes a 2xx body
    async fn deserialize<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| ApiError::ResponseParseFailed(e.to_string())),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ApiError::HttpStatus {
                    status: status.as_u16(),
                    body,
                })
            },
        }
    }

    /// Unwraps a mutation envelope, turning `resultCode != 0` into
    /// [`ApiError::Rejected`]
    fn accept<T>(envelope: ApiResponse<T>) -> Result<T, ApiError> {
        if envelope.result_code == 0 {
            Ok(envelope.data)
        } else {
            Err(ApiError::Rejected {
                messages: envelope.messages,
            })
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .header("API-KEY", &self.api_key)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Self::deserialize(response).await
    }

    async fn post<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .header("API-KEY", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Self::deserialize(response).await
    }

    async fn put<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .put(self.url(path))
            .header("API-KEY", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Self::deserialize(response).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .delete(self.url(path))
            .header("API-KEY", &self.api_key)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Self::deserialize(response).await
    }
}

#[derive(serde::Serialize)]
struct TitlePayload<'a> {
    title: &'a str,
}

#[async_trait]
impl TodolistTransport for TodoApiClient {
    async fn get_todolists(&self) -> Result<Vec<Todolist>, ApiError> {
        self.get("todo-lists").await
    }

    async fn create_todolist(&self, title: &str) -> Result<Todolist, ApiError> {
        let envelope: ApiResponse<ItemPayload<Todolist>> =
            self.post("todo-lists", &TitlePayload { title }).await?;

        Self::accept(envelope).map(|payload| payload.item)
    }

    async fn delete_todolist(&self, id: &TodolistId) -> Result<(), ApiError> {
        let envelope: ApiResponse<serde_json::Value> =
            self.delete(&format!("todo-lists/{id}")).await?;

        Self::accept(envelope).map(|_| ())
    }

    async fn rename_todolist(&self, id: &TodolistId, title: &str) -> Result<(), ApiError> {
        let envelope: ApiResponse<serde_json::Value> = self
            .put(&format!("todo-lists/{id}"), &TitlePayload { title })
            .await?;

        Self::accept(envelope).map(|_| ())
    }
}

#[async_trait]
impl TaskTransport for TodoApiClient {
    async fn get_tasks(&self, todolist_id: &TodolistId) -> Result<Vec<Task>, ApiError> {
        let page: TasksPage = self.get(&format!("todo-lists/{todolist_id}/tasks")).await?;

        if let Some(error) = page.error {
            return Err(ApiError::Rejected {
                messages: vec![error],
            });
        }

        Ok(page.items)
    }

    async fn create_task(&self, todolist_id: &TodolistId, title: &str) -> Result<Task, ApiError> {
        let envelope: ApiResponse<ItemPayload<Task>> = self
            .post(
                &format!("todo-lists/{todolist_id}/tasks"),
                &TitlePayload { title },
            )
            .await?;

        Self::accept(envelope).map(|payload| payload.item)
    }

    async fn delete_task(
        &self,
        todolist_id: &TodolistId,
        task_id: &TaskId,
    ) -> Result<(), ApiError> {
        let envelope: ApiResponse<serde_json::Value> = self
            .delete(&format!("todo-lists/{todolist_id}/tasks/{task_id}"))
            .await?;

        Self::accept(envelope).map(|_| ())
    }

    async fn update_task(
        &self,
        todolist_id: &TodolistId,
        task_id: &TaskId,
        model: &UpdateTaskModel,
    ) -> Result<Task, ApiError> {
        let envelope: ApiResponse<ItemPayload<Task>> = self
            .put(&format!("todo-lists/{todolist_id}/tasks/{task_id}"), model)
            .await?;

        Self::accept(envelope).map(|payload| payload.item)
    }
}
