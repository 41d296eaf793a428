//! Blocking JSON-over-HTTP transport to the SFSControl mod.

use std::io::Read;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use sfs_config::ConnectionConfig;

use crate::error::ClientError;

/// Default host of the SFSControl HTTP server.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default port of the SFSControl HTTP server.
pub const DEFAULT_PORT: u16 = 27772;
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP transport bound to one SFSControl instance.
///
/// Host and port can be changed between requests; the timeout is fixed at
/// construction because it is baked into the underlying agent.
#[derive(Debug, Clone)]
pub struct HttpClient {
    host: String,
    port: u16,
    timeout: Duration,
    agent: ureq::Agent,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT)
    }
}

impl HttpClient {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            host: host.into(),
            port,
            timeout,
            agent,
        }
    }

    /// Build a client from the `connection` config section.
    ///
    /// A non-positive or non-finite timeout falls back to [`DEFAULT_TIMEOUT`].
    pub fn from_config(config: &ConnectionConfig) -> Self {
        let timeout = if config.timeout_seconds.is_finite() && config.timeout_seconds > 0.0 {
            Duration::from_secs_f64(config.timeout_seconds)
        } else {
            DEFAULT_TIMEOUT
        };
        Self::new(config.host.clone(), config.port, timeout)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// GET `path` with query parameters and parse the body as JSON.
    pub fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ClientError> {
        let url = self.url(path);
        tracing::debug!(%url, ?params, "GET");

        let mut request = self.agent.get(&url);
        for (key, value) in params {
            request = request.query(key, value);
        }
        let response = request
            .call()
            .map_err(|e| ClientError::from_ureq(&url, e))?;

        let body = response.into_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST `payload` as JSON to `path`.
    ///
    /// JSON responses are parsed directly. Other content types are parsed as
    /// JSON if possible, otherwise wrapped as `{"result": <text>}`.
    pub fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Value, ClientError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");

        let response = self
            .agent
            .post(&url)
            .send_json(payload)
            .map_err(|e| ClientError::from_ureq(&url, e))?;

        let is_json = response.content_type().starts_with("application/json");
        let text = response.into_string()?;
        if is_json {
            return Ok(serde_json::from_str(&text)?);
        }
        Ok(serde_json::from_str(&text).unwrap_or_else(|_| serde_json::json!({ "result": text })))
    }

    /// Capture the game view as encoded image bytes.
    pub fn screenshot(&self) -> Result<Vec<u8>, ClientError> {
        let url = self.url("/screenshot");
        tracing::debug!(%url, "GET screenshot");

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| ClientError::from_ureq(&url, e))?;

        let mut bytes = Vec::new();
        response.into_reader().read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::MockSfsServer;
    use serde_json::json;

    fn client_for(server: &MockSfsServer) -> HttpClient {
        HttpClient::new("127.0.0.1", server.port(), Duration::from_secs(5))
    }

    #[test]
    fn test_defaults() {
        let client = HttpClient::default();
        assert_eq!(client.base_url(), "http://127.0.0.1:27772");
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_from_config_rejects_bad_timeout() {
        let config = ConnectionConfig {
            host: "sfs.local".to_string(),
            port: 9000,
            timeout_seconds: -1.0,
        };
        let client = HttpClient::from_config(&config);
        assert_eq!(client.base_url(), "http://sfs.local:9000");
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_host_and_port_are_mutable() {
        let mut client = HttpClient::default();
        client.set_host("10.0.0.2");
        client.set_port(1234);
        assert_eq!(client.base_url(), "http://10.0.0.2:1234");
    }

    #[test]
    fn test_get_json_sends_query_params() {
        let server = MockSfsServer::builder()
            .json("/rocket_sim", json!({ "name": "Probe" }))
            .start();
        let client = client_for(&server);

        let body = client
            .get_json("/rocket_sim", &[("rocketIdOrName", "Probe".to_string())])
            .unwrap();
        assert_eq!(body["name"], "Probe");

        let requests = server.requests_to("/rocket_sim");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].query, "rocketIdOrName=Probe");
    }

    #[test]
    fn test_error_status_is_reported() {
        let server = MockSfsServer::builder().status("/planet", 500).start();
        let client = client_for(&server);

        let err = client.get_json("/planet", &[]).unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 500, .. }), "{err}");
    }

    #[test]
    fn test_unknown_path_is_404() {
        let server = MockSfsServer::builder().start();
        let err = client_for(&server).get_json("/nope", &[]).unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));
    }

    #[test]
    fn test_post_json_parses_json_response() {
        let server = MockSfsServer::builder()
            .json("/draw", json!({ "ok": true }))
            .start();
        let client = client_for(&server);

        let reply = client.post_json("/draw", &json!({ "cmd": "clear" })).unwrap();
        assert_eq!(reply, json!({ "ok": true }));
        assert_eq!(
            server.requests_to("/draw")[0].json_body(),
            json!({ "cmd": "clear" })
        );
    }

    #[test]
    fn test_post_json_parses_json_text_body() {
        let server = MockSfsServer::builder()
            .raw("/control", "text/plain", br#"{"result": "Success"}"#)
            .start();
        let reply = client_for(&server)
            .post_json("/control", &json!({ "method": "Launch", "args": [] }))
            .unwrap();
        assert_eq!(reply, json!({ "result": "Success" }));
    }

    #[test]
    fn test_post_json_wraps_plain_text() {
        let server = MockSfsServer::builder()
            .raw("/control", "text/plain", b"Success")
            .start();
        let reply = client_for(&server)
            .post_json("/control", &json!({ "method": "Launch", "args": [] }))
            .unwrap();
        assert_eq!(reply, json!({ "result": "Success" }));
    }

    #[test]
    fn test_screenshot_returns_raw_bytes() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let server = MockSfsServer::builder()
            .raw("/screenshot", "image/png", &png)
            .start();
        let bytes = client_for(&server).screenshot().unwrap();
        assert_eq!(bytes, png);
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        // Bind and immediately drop a listener to get a port nobody listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = HttpClient::new("127.0.0.1", port, Duration::from_millis(500));
        let err = client.get_json("/version", &[]).unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }), "{err}");
    }
}
