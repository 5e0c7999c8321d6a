//! HTTP binding of [`Transport`] for the remote todolist REST API

use super::{Transport, TransportError, TransportFuture};
use crate::config::ApiConfig;
use crate::types::{Task, TaskId, Todolist, TodolistId, UpdateTaskModel};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Standard response wrapper of the service's mutating endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<D> {
    result_code: i32,
    #[serde(default)]
    messages: Vec<String>,
    #[serde(default)]
    fields_errors: Vec<FieldError>,
    #[serde(default = "Option::default")]
    data: Option<D>,
}

#[derive(Debug, Deserialize)]
struct FieldError {
    field: String,
    error: String,
}

#[derive(Debug, Deserialize)]
struct Item<T> {
    item: T,
}

/// Page of tasks returned by the task listing endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskPage {
    items: Vec<Task>,
    #[allow(dead_code)]
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
struct TitleBody<'a> {
    title: &'a str,
}

impl<D> Envelope<D> {
    /// Split a 200 response into its data or a [`TransportError::Rejected`]
    fn into_data(self) -> Result<Option<D>, TransportError> {
        if self.result_code == 0 {
            return Ok(self.data);
        }

        let mut messages = self.messages;
        messages.extend(
            self.fields_errors
                .into_iter()
                .map(|e| format!("{}: {}", e.field, e.error)),
        );
        Err(TransportError::Rejected {
            result_code: self.result_code,
            messages,
        })
    }
}

/// [`Transport`] over the service's REST API
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a client for the configured service
    ///
    /// Sends `API-KEY` and, when a token is configured, `Authorization: Bearer`
    /// with every request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::RequestFailed`] if a credential is not a valid
    /// header value or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();

        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(api_key)
                .map_err(|e| TransportError::RequestFailed(format!("invalid API key: {e}")))?;
            headers.insert("API-KEY", value);
        }

        if let Some(token) = &config.auth_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| TransportError::RequestFailed(format!("invalid auth token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "Sending request");
        self.client.request(method, format!("{}/{path}", self.base_url))
    }

    /// Send a request and decode a 200 body as `T`
    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => response
                .json::<T>()
                .await
                .map_err(|e| TransportError::ResponseParseFailed(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(TransportError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::debug!(status = status.as_u16(), body = %body, "Request failed");
                Err(TransportError::Api {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }

    /// Send a request answered with an envelope whose data is ignored
    async fn send_ack(request: RequestBuilder) -> Result<(), TransportError> {
        Self::send::<Envelope<serde_json::Value>>(request)
            .await?
            .into_data()
            .map(|_| ())
    }

    /// Send a request answered with an envelope carrying `data.item`
    ///
    /// Rejections come back with `"data": {}`, so the result code is checked
    /// before `data` is decoded.
    async fn send_item<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, TransportError> {
        let data = Self::send::<Envelope<serde_json::Value>>(request)
            .await?
            .into_data()?
            .ok_or_else(|| TransportError::ResponseParseFailed("response has no data".to_string()))?;

        serde_json::from_value::<Item<T>>(data)
            .map(|data| data.item)
            .map_err(|e| TransportError::ResponseParseFailed(format!("bad data.item: {e}")))
    }
}

impl Transport for HttpTransport {
    fn list_todolists(&self) -> TransportFuture<'_, Vec<Todolist>> {
        Box::pin(Self::send(self.request(Method::GET, "todo-lists")))
    }

    fn create_todolist(&self, title: &str) -> TransportFuture<'_, Todolist> {
        let request = self
            .request(Method::POST, "todo-lists")
            .json(&TitleBody { title });
        Box::pin(Self::send_item(request))
    }

    fn update_todolist(&self, id: &TodolistId, title: &str) -> TransportFuture<'_, ()> {
        let request = self
            .request(Method::PUT, &format!("todo-lists/{id}"))
            .json(&TitleBody { title });
        Box::pin(Self::send_ack(request))
    }

    fn delete_todolist(&self, id: &TodolistId) -> TransportFuture<'_, ()> {
        Box::pin(Self::send_ack(
            self.request(Method::DELETE, &format!("todo-lists/{id}")),
        ))
    }

    fn list_tasks(&self, todolist_id: &TodolistId) -> TransportFuture<'_, Vec<Task>> {
        let request = self.request(Method::GET, &format!("todo-lists/{todolist_id}/tasks"));
        Box::pin(async move {
            let page: TaskPage = Self::send(request).await?;
            match page.error {
                Some(error) => Err(TransportError::Rejected {
                    result_code: 1,
                    messages: vec![error],
                }),
                None => Ok(page.items),
            }
        })
    }

    fn create_task(&self, todolist_id: &TodolistId, title: &str) -> TransportFuture<'_, Task> {
        let request = self
            .request(Method::POST, &format!("todo-lists/{todolist_id}/tasks"))
            .json(&TitleBody { title });
        Box::pin(Self::send_item(request))
    }

    fn update_task(
        &self,
        todolist_id: &TodolistId,
        task_id: &TaskId,
        model: &UpdateTaskModel,
    ) -> TransportFuture<'_, ()> {
        let request = self
            .request(Method::PUT, &format!("todo-lists/{todolist_id}/tasks/{task_id}"))
            .json(model);
        Box::pin(Self::send_ack(request))
    }

    fn delete_task(&self, todolist_id: &TodolistId, task_id: &TaskId) -> TransportFuture<'_, ()> {
        Box::pin(Self::send_ack(self.request(
            Method::DELETE,
            &format!("todo-lists/{todolist_id}/tasks/{task_id}"),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> ApiConfig {
        ApiConfig {
            base_url: "http://localhost:9/api/1.1/".to_string(),
            api_key: Some("key".to_string()),
            auth_token: None,
            request_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() -> Result<(), TransportError> {
        let transport = HttpTransport::new(&config())?;
        assert_eq!(transport.base_url, "http://localhost:9/api/1.1");
        Ok(())
    }

    #[test]
    fn invalid_api_key_is_rejected() {
        let config = ApiConfig {
            api_key: Some("bad\nkey".to_string()),
            ..config()
        };
        assert!(matches!(
            HttpTransport::new(&config),
            Err(TransportError::RequestFailed(_))
        ));
    }

    #[test]
    fn rejected_envelope_collects_field_errors() -> Result<(), serde_json::Error> {
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(
            r#"{"resultCode":1,"messages":["Title too long"],"fieldsErrors":[{"field":"title","error":"max 100"}],"data":{}}"#,
        )?;

        assert_eq!(
            envelope.into_data().err(),
            Some(TransportError::Rejected {
                result_code: 1,
                messages: vec!["Title too long".to_string(), "title: max 100".to_string()],
            })
        );
        Ok(())
    }
}
