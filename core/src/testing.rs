//! Canned-response transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::client::{set_access_token, set_host, set_transport, Client};
use crate::error::{Error, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

pub(crate) const TEST_HOST: &str = "http://hydros.test";

#[derive(Default)]
pub(crate) struct StubTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<HttpResponse>>,
}

impl StubTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        });
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for StubTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Transport("no canned response".to_string()))
    }
}

pub(crate) fn client(stub: &Arc<StubTransport>) -> Client {
    let transport: Arc<dyn Transport> = stub.clone();
    Client::new([
        set_host(TEST_HOST),
        set_access_token("test-token"),
        set_transport(transport),
    ])
    .unwrap()
}
