use serde_json::Value;
use sfs_config::ConnectionConfig;
use std::time::Duration;

use crate::calc::CalcApi;
use crate::control::{ControlApi, ControlReply};
use crate::draw::DrawApi;
use crate::error::ClientError;
use crate::http::HttpClient;
use crate::info::InfoApi;
use crate::values::ValuesApi;

/// Entry point to a running SFSControl instance.
///
/// Owns the transport and hands out borrowed views for each API group.
#[derive(Debug, Clone, Default)]
pub struct SfsClient {
    http: HttpClient,
}

impl SfsClient {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            http: HttpClient::new(host, port, timeout),
        }
    }

    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            http: HttpClient::from_config(config),
        }
    }

    /// Build a client and probe `/version`.
    ///
    /// A failed probe is logged and otherwise ignored so a client can be
    /// created before the game is running.
    pub fn connect(config: &ConnectionConfig) -> Self {
        let client = Self::from_config(config);
        match client.info().version() {
            Ok(version) => tracing::info!(
                url = %client.http.base_url(),
                version = %version.get("version").unwrap_or(&serde_json::Value::Null),
                "connected to SFSControl"
            ),
            Err(e) => tracing::warn!(
                url = %client.http.base_url(),
                "SFSControl not reachable: {e}"
            ),
        }
        client
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn http_mut(&mut self) -> &mut HttpClient {
        &mut self.http
    }

    pub fn host(&self) -> &str {
        self.http.host()
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.http.set_host(host);
    }

    pub fn port(&self) -> u16 {
        self.http.port()
    }

    pub fn set_port(&mut self, port: u16) {
        self.http.set_port(port);
    }

    pub fn info(&self) -> InfoApi<'_> {
        InfoApi::new(&self.http)
    }

    pub fn control(&self) -> ControlApi<'_> {
        ControlApi::new(&self.http)
    }

    pub fn values(&self) -> ValuesApi<'_> {
        ValuesApi::new(self.info())
    }

    pub fn calc(&self) -> CalcApi<'_> {
        CalcApi::new(self.info())
    }

    pub fn draw(&self) -> DrawApi<'_> {
        DrawApi::new(&self.http)
    }

    /// Call a control method by loosely spelled name, e.g. `"set_throttle"`.
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> Result<ControlReply, ClientError> {
        self.control().invoke(name, args)
    }

    /// Encoded image of the current game view.
    pub fn screenshot(&self) -> Result<Vec<u8>, ClientError> {
        self.http.screenshot()
    }
}
