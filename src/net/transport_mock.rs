//! Replaying transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{HttpRequest, HttpResponse, HttpTransport, TransportError};

#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_raw(status, &body.to_string());
    }

    pub(crate) fn push_raw(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .expect("mock mutex should lock")
            .push_back(Ok(HttpResponse { status, body: body.to_owned() }));
    }

    pub(crate) fn push_network_error(&self, message: &str) {
        self.responses
            .lock()
            .expect("mock mutex should lock")
            .push_back(Err(TransportError::Request(message.to_owned())));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("mock mutex should lock").clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests()
            .pop()
            .expect("at least one request should have been sent")
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().expect("mock mutex should lock").push(request.clone());
        self.responses
            .lock()
            .expect("mock mutex should lock")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no mock response queued".to_owned())))
    }
}
