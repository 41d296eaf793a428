//! In-process stand-in for the SFSControl mod's HTTP server, used by tests.

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use serde_json::{Value, json};
use tiny_http::{Header, Method, Request, Response, Server};

/// A request as the mock server saw it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone)]
struct CannedResponse {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

/// Builder for a [`MockSfsServer`] with canned per-path responses.
#[derive(Default)]
pub(crate) struct MockSfsServerBuilder {
    routes: HashMap<String, CannedResponse>,
    control: HashMap<String, Value>,
}

impl MockSfsServerBuilder {
    /// Serve `body` as `application/json` on `path`.
    pub fn json(mut self, path: &str, body: Value) -> Self {
        self.routes.insert(
            path.to_string(),
            CannedResponse {
                status: 200,
                content_type: "application/json",
                body: body.to_string().into_bytes(),
            },
        );
        self
    }

    /// Serve raw bytes with an explicit content type on `path`.
    pub fn raw(mut self, path: &str, content_type: &'static str, body: &[u8]) -> Self {
        self.routes.insert(
            path.to_string(),
            CannedResponse {
                status: 200,
                content_type,
                body: body.to_vec(),
            },
        );
        self
    }

    /// Answer `path` with an empty body and the given status.
    pub fn status(mut self, path: &str, status: u16) -> Self {
        self.routes.insert(
            path.to_string(),
            CannedResponse {
                status,
                content_type: "text/plain",
                body: Vec::new(),
            },
        );
        self
    }

    /// Accept `/control` calls for `method`, replying with `reply`.
    /// Any other method gets the mod's "Unknown method" error.
    pub fn control(mut self, method: &str, reply: Value) -> Self {
        self.control.insert(method.to_string(), reply);
        self
    }

    pub fn start(self) -> MockSfsServer {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let port = server.server_addr().to_ip().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let thread_server = Arc::clone(&server);
        let thread_requests = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            for request in thread_server.incoming_requests() {
                handle_request(request, &self.routes, &self.control, &thread_requests);
            }
        });

        MockSfsServer {
            port,
            server,
            requests,
            handle: Some(handle),
        }
    }
}

/// A running mock server bound to an OS-assigned port on localhost.
pub(crate) struct MockSfsServer {
    port: u16,
    server: Arc<Server>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<JoinHandle<()>>,
}

impl MockSfsServer {
    pub fn builder() -> MockSfsServerBuilder {
        MockSfsServerBuilder::default()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received on `path`.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

impl Drop for MockSfsServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn handle_request(
    mut request: Request,
    routes: &HashMap<String, CannedResponse>,
    control: &HashMap<String, Value>,
    requests: &Mutex<Vec<RecordedRequest>>,
) {
    let (path, query) = match request.url().split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (request.url().to_string(), String::new()),
    };
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let method = request.method().clone();

    requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query,
        body: body.clone(),
    });

    let canned = match (&method, path.as_str()) {
        (Method::Post, "/control") if !routes.contains_key("/control") => {
            let call: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            let name = call["method"].as_str().unwrap_or_default();
            let reply = control
                .get(name)
                .cloned()
                .unwrap_or_else(|| json!({ "result": format!("Error: Unknown method {name}") }));
            CannedResponse {
                status: 200,
                content_type: "application/json",
                body: reply.to_string().into_bytes(),
            }
        }
        _ => routes.get(&path).cloned().unwrap_or(CannedResponse {
            status: 404,
            content_type: "text/plain",
            body: b"Not Found".to_vec(),
        }),
    };

    let header = Header::from_bytes(&b"Content-Type"[..], canned.content_type.as_bytes()).unwrap();
    let response = Response::from_data(canned.body)
        .with_status_code(canned.status)
        .with_header(header);
    let _ = request.respond(response);
}
