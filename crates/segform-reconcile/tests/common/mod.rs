//! Shared test infrastructure for reconciler tests.
//!
//! [`FakeTransport`] answers requests from a script keyed by method and path
//! and records every request it sees, so tests can assert both outcomes and
//! the exact traffic a reconciliation produced.

#![allow(dead_code)]

use async_trait::async_trait;
use segform_client::{ClientError, ClientResult, Method, SegmentClient, Transport};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const WORKSPACE: &str = "acme";

/// Scripted reply for one request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Status and JSON body. Non-2xx statuses become remote rejections.
    Json(u16, Value),
    /// 2xx with an empty body.
    Empty,
    /// The request never reached the service.
    TransportFailure(String),
}

/// A request the fake transport received.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Script {
    routes: HashMap<(Method, String), VecDeque<Reply>>,
    requests: Vec<Recorded>,
}

/// In-memory transport driven by scripted replies.
///
/// Replies for a route are served in order; the last one repeats. Requests to
/// an unscripted route are answered with HTTP 501.
#[derive(Clone, Default)]
pub struct FakeTransport {
    script: Arc<Mutex<Script>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for `method` on `path` (relative to `workspaces/acme/`).
    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        let mut script = self.script.lock().unwrap();
        script
            .routes
            .entry((method, scoped(path)))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.script.lock().unwrap().requests.clone()
    }

    /// `"METHOD path"` for every request, in order.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    /// Body of the first request matching `method` and `path`.
    pub fn body_of(&self, method: Method, path: &str) -> Option<Value> {
        let full = scoped(path);
        self.requests()
            .into_iter()
            .find(|r| r.method == method && r.path == full)
            .and_then(|r| r.body)
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<Vec<u8>> {
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.requests.push(Recorded {
                method,
                path: path.to_string(),
                body: body.cloned(),
            });
            match script.routes.get_mut(&(method, path.to_string())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Json(status, value)) if (200..300).contains(&status) => {
                Ok(serde_json::to_vec(&value).unwrap())
            }
            Some(Reply::Json(status, value)) => Err(ClientError::Remote {
                status,
                body: value.to_string(),
            }),
            Some(Reply::Empty) => Ok(Vec::new()),
            Some(Reply::TransportFailure(message)) => Err(ClientError::Transport(message)),
            None => Err(ClientError::Remote {
                status: 501,
                body: format!("no scripted reply for {method} {path}"),
            }),
        }
    }
}

fn scoped(path: &str) -> String {
    format!("workspaces/{WORKSPACE}/{path}")
}

/// Client for workspace `acme` backed by `transport`.
pub fn client(transport: &FakeTransport) -> SegmentClient {
    SegmentClient::new(WORKSPACE, Arc::new(transport.clone()))
}

pub fn not_found() -> Reply {
    Reply::Json(404, serde_json::json!({"error": "not found"}))
}
