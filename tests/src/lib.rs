//! Shared fixtures for the Bitstamp integration tests

use async_trait::async_trait;
use bitstamp_http::{HttpError, HttpRequest, HttpResponse, HttpTransport, Result};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Transport that records requests and replays queued responses
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response with the given status
    pub fn respond_with(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse {
            status,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }));
        self
    }

    pub fn fail_with(self, error: HttpError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, response: Result<HttpResponse>) {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);

        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::NetworkError("no response queued".to_string())))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
