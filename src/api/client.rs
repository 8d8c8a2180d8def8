use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::io::session::SharedSession;
use crate::model::{
    CreateFocusAreaRequest, CreateTaskRequest, FocusArea, LoginRequest, Task, TokenResponse,
    UpdateFocusAreaRequest, UpdateTaskRequest,
};

use super::error::ApiError;
use super::transport::{ApiRequest, ApiResponse, Method, Transport};

/// Stateless wrapper over the soq REST API. Every call attaches the
/// session's bearer token; a 401 from any endpoint clears the session
/// before `ApiError::Unauthorized` is returned.
pub struct Gateway {
    transport: Box<dyn Transport>,
    session: SharedSession,
}

impl Gateway {
    pub fn new(transport: Box<dyn Transport>, session: SharedSession) -> Self {
        Gateway { transport, session }
    }

    #[cfg(test)]
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Exchange credentials for a bearer token
    pub fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let body = encode(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        let response = self.send(Method::Post, "/auth/token", Some(body))?;
        // The token endpoint answers 200, unlike resource creation
        if response.status != 200 && response.status != 201 {
            return Err(unexpected(response));
        }
        let token: TokenResponse = decode(&response.body)?;
        Ok(token.token)
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.call(Method::Get, "/tasks", None)
    }

    pub fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ApiError> {
        self.call(Method::Post, "/tasks", Some(encode(request)?))
    }

    pub fn update_task(&self, task_id: u64, request: &UpdateTaskRequest) -> Result<Task, ApiError> {
        self.call(
            Method::Patch,
            &format!("/tasks/{}", task_id),
            Some(encode(request)?),
        )
    }

    pub fn resolve_task(&self, task_id: u64) -> Result<Task, ApiError> {
        self.call(Method::Patch, &format!("/tasks/{}/resolve", task_id), None)
    }

    pub fn delete_task(&self, task_id: u64) -> Result<(), ApiError> {
        self.call_no_content(Method::Delete, &format!("/tasks/{}", task_id))
    }

    pub fn list_focus_areas(&self) -> Result<Vec<FocusArea>, ApiError> {
        self.call(Method::Get, "/focusareas", None)
    }

    pub fn create_focus_area(&self, request: &CreateFocusAreaRequest) -> Result<FocusArea, ApiError> {
        self.call(Method::Post, "/focusareas", Some(encode(request)?))
    }

    pub fn update_focus_area(
        &self,
        focus_area_id: u64,
        request: &UpdateFocusAreaRequest,
    ) -> Result<FocusArea, ApiError> {
        self.call(
            Method::Patch,
            &format!("/focusareas/{}", focus_area_id),
            Some(encode(request)?),
        )
    }

    pub fn delete_focus_area(&self, focus_area_id: u64) -> Result<(), ApiError> {
        self.call_no_content(Method::Delete, &format!("/focusareas/{}", focus_area_id))
    }

    fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, body)?;
        if response.status != method.success_status() {
            return Err(unexpected(response));
        }
        decode(&response.body)
    }

    fn call_no_content(&self, method: Method, path: &str) -> Result<(), ApiError> {
        let response = self.send(method, path, None)?;
        if response.status != method.success_status() {
            return Err(unexpected(response));
        }
        Ok(())
    }

    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, ApiError> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            bearer: self.session.token(),
            body,
        };
        let response = self.transport.send(&request)?;
        debug!(method = method.as_str(), path, status = response.status, "api call");

        if response.status == 401 {
            warn!(method = method.as_str(), path, "unauthorized, clearing session");
            if let Err(e) = self.session.clear_token() {
                error!(error = %e, "failed to clear token");
            }
            return Err(ApiError::Unauthorized);
        }
        Ok(response)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(ApiError::Encode)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(ApiError::Decode)
}

fn unexpected(response: ApiResponse) -> ApiError {
    ApiError::UnexpectedStatus {
        status: response.status,
        body: response.body,
    }
}
