use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::io::session::{Session, SharedSession};

use super::client::Gateway;
use super::error::ApiError;
use super::transport::{ApiRequest, ApiResponse, Transport};

enum Reply {
    Respond(ApiResponse),
    Fail(String),
}

/// Scripted transport: replies are consumed in order, the last one repeats.
#[derive(Clone, Default)]
pub struct FakeTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.replies.lock().unwrap().push_back(Reply::Respond(ApiResponse {
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Fail(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            None
        };
        let reply = reply.as_ref().or(replies.front());
        match reply {
            Some(Reply::Respond(response)) => Ok(response.clone()),
            Some(Reply::Fail(message)) => Err(ApiError::Transport(message.clone())),
            None => Err(ApiError::Transport("no reply scripted".into())),
        }
    }
}

/// A gateway over `fake` with a session in a fresh temp dir, optionally
/// already holding `token`.
pub fn gateway_with(fake: FakeTransport, token: Option<&str>) -> (Gateway, TempDir) {
    let dir = TempDir::new().unwrap();
    let session = SharedSession::new(Session::new(dir.path()));
    if let Some(token) = token {
        session.set_token(token).unwrap();
    }
    (Gateway::new(Box::new(fake), session), dir)
}
