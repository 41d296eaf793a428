//! Read-only telemetry endpoints.

use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::http::HttpClient;
use crate::rocket_ref::RocketRef;

fn rocket_params(rocket: Option<&RocketRef>) -> Vec<(&'static str, String)> {
    rocket
        .map(|r| vec![("rocketIdOrName", r.as_param())])
        .unwrap_or_default()
}

/// Accepts a bare array, `{ key: [...] }`, or a single object.
fn unwrap_list(data: Value, key: &str) -> Vec<Value> {
    match data {
        Value::Array(items) => items,
        Value::Object(mut map) if map.get(key).is_some_and(Value::is_array) => {
            match map.remove(key) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        other => vec![other],
    }
}

/// Telemetry queries against the `GET` endpoints of the mod.
#[derive(Debug, Clone, Copy)]
pub struct InfoApi<'a> {
    http: &'a HttpClient,
}

impl<'a> InfoApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Simulation state of a rocket (`GET /rocket_sim`).
    pub fn rocket_sim(&self, rocket: Option<&RocketRef>) -> Result<Value, ClientError> {
        self.http.get_json("/rocket_sim", &rocket_params(rocket))
    }

    /// Saved state of a rocket, including its location (`GET /rocket`).
    pub fn rocket_save(&self, rocket: Option<&RocketRef>) -> Result<Value, ClientError> {
        self.http.get_json("/rocket", &rocket_params(rocket))
    }

    /// Saved state of every rocket in the scene (`GET /rockets`).
    pub fn rockets(&self) -> Result<Vec<Value>, ClientError> {
        Ok(unwrap_list(self.http.get_json("/rockets", &[])?, "rockets"))
    }

    /// Current planet, or the planet with `codename` (`GET /planet`).
    pub fn planet(&self, codename: Option<&str>) -> Result<Value, ClientError> {
        let params = match codename {
            Some(code) if !code.is_empty() => vec![("codename", code.to_string())],
            _ => Vec::new(),
        };
        self.http.get_json("/planet", &params)
    }

    /// Every planet in the solar system (`GET /planets`).
    pub fn planets(&self) -> Result<Vec<Value>, ClientError> {
        Ok(unwrap_list(self.http.get_json("/planets", &[])?, "planets"))
    }

    /// Miscellaneous flight data: targets, timewarp, thrust, apsides (`GET /other`).
    pub fn other(&self, rocket: Option<&RocketRef>) -> Result<Value, ClientError> {
        self.http.get_json("/other", &rocket_params(rocket))
    }

    /// Mission and challenge state (`GET /mission`).
    pub fn mission(&self) -> Result<Value, ClientError> {
        self.http.get_json("/mission", &[])
    }

    /// The game's debug log (`GET /debuglog`).
    pub fn debug_log(&self) -> Result<Value, ClientError> {
        self.http.get_json("/debuglog", &[])
    }

    /// SFSControl version information (`GET /version`).
    pub fn version(&self) -> Result<Value, ClientError> {
        self.http.get_json("/version", &[])
    }

    /// The `parts` field of the rocket's simulation state, or `{}` if absent.
    pub fn parts_info(&self, rocket: Option<&RocketRef>) -> Result<Value, ClientError> {
        let mut data = self.rocket_sim(rocket)?;
        Ok(data
            .get_mut("parts")
            .map(Value::take)
            .unwrap_or_else(|| Value::Object(Map::new())))
    }

    /// Part entries (`{"id", "name", ...}`) of the rocket, empty if not a list.
    pub fn parts_list(&self, rocket: Option<&RocketRef>) -> Result<Vec<Value>, ClientError> {
        match self.parts_info(rocket)? {
            Value::Array(parts) => Ok(parts),
            _ => Ok(Vec::new()),
        }
    }
}
