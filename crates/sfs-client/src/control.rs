//! Command dispatch through `POST /control`.
//!
//! Every command is `{"method": <name>, "args": [...]}` with positional
//! arguments; optional arguments are sent as `null` and rocket references as
//! strings. [`ControlApi::invoke`] resolves loosely-cased names (`use_part`,
//! `usePart`, `UsePart`) against the mod by trying candidates in turn.

use std::fmt;

use serde_json::{Value, json};

use crate::error::ClientError;
use crate::http::HttpClient;
use crate::rocket_ref::{RocketRef, rocket_arg};

/// Fallback reply when no name candidate is recognized by the mod.
pub const UNKNOWN_METHOD_REPLY: &str = "Error: Unknown method";

/// Reply to a control command.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlReply {
    /// A plain message such as `"Success"` or `"Error: ..."`.
    Text(String),
    /// Structured data (rocket info, world info, ...).
    Data(Value),
}

impl ControlReply {
    /// Unwraps `{"result": x}` envelopes; strings become [`ControlReply::Text`].
    pub fn from_response(response: Value) -> Self {
        let inner = match response {
            Value::Object(mut map) if map.len() == 1 && map.contains_key("result") => {
                map.remove("result").unwrap_or(Value::Null)
            }
            other => other,
        };
        match inner {
            Value::String(text) => ControlReply::Text(text),
            other => ControlReply::Data(other),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ControlReply::Text(text) => Some(text),
            ControlReply::Data(_) => None,
        }
    }

    /// Whether the mod rejected the method name.
    pub fn is_unknown_method(&self) -> bool {
        self.as_text().is_some_and(|t| t.contains("Unknown method"))
    }

    pub fn into_value(self) -> Value {
        match self {
            ControlReply::Text(text) => Value::String(text),
            ControlReply::Data(value) => value,
        }
    }
}

impl fmt::Display for ControlReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlReply::Text(text) => f.write_str(text),
            ControlReply::Data(value) => write!(f, "{value}"),
        }
    }
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// First character upper-cased, the rest untouched.
fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn pascal_case(parts: &[&str]) -> String {
    parts.iter().map(|p| capitalize(p)).collect()
}

/// Method names to try for a loosely-cased `name`, deduplicated in order:
/// as given, first letter upper, PascalCase and camelCase from snake_case,
/// all lower, all upper, then the capitalized forms of the lower-cased name.
pub fn method_name_candidates(name: &str) -> Vec<String> {
    let mut options = vec![name.to_string()];
    if !name.is_empty() {
        options.push(upper_first(name));
    }
    if name.contains('_') {
        let parts: Vec<&str> = name.split('_').filter(|p| !p.is_empty()).collect();
        if let Some((first, rest)) = parts.split_first() {
            options.push(pascal_case(&parts));
            options.push(format!("{}{}", first.to_lowercase(), pascal_case(rest)));
        }
    }
    let lower = name.to_lowercase();
    options.push(lower.clone());
    options.push(name.to_uppercase());
    if lower != name {
        options.push(upper_first(&lower));
        if lower.contains('_') {
            let parts: Vec<&str> = lower.split('_').filter(|p| !p.is_empty()).collect();
            options.push(pascal_case(&parts));
        }
    }

    let mut seen = Vec::with_capacity(options.len());
    for option in options {
        if !seen.contains(&option) {
            seen.push(option);
        }
    }
    seen
}

fn opt<T: Into<Value>>(value: Option<T>) -> Value {
    value.map_or(Value::Null, Into::into)
}

/// Control commands sent to the mod.
#[derive(Debug, Clone, Copy)]
pub struct ControlApi<'a> {
    http: &'a HttpClient,
}

impl<'a> ControlApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Send `method` with positional `args`.
    pub fn control(&self, method: &str, args: Vec<Value>) -> Result<ControlReply, ClientError> {
        tracing::debug!(method, args = args.len(), "control");
        let payload = json!({ "method": method, "args": args });
        let response = self.http.post_json("/control", &payload)?;
        Ok(ControlReply::from_response(response))
    }

    /// Arbitrary command by exact method name.
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<ControlReply, ClientError> {
        self.control(method, args)
    }

    /// Alias of [`ControlApi::call`].
    pub fn custom(&self, method: &str, args: Vec<Value>) -> Result<ControlReply, ClientError> {
        self.control(method, args)
    }

    /// Command by loosely-cased name, trying each of [`method_name_candidates`]
    /// until the mod accepts one. Returns the last "Unknown method" reply if none do.
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> Result<ControlReply, ClientError> {
        let mut last = ControlReply::Text(UNKNOWN_METHOD_REPLY.to_string());
        for candidate in method_name_candidates(name) {
            let reply = self.control(&candidate, args.clone())?;
            if !reply.is_unknown_method() {
                return Ok(reply);
            }
            tracing::debug!(candidate, "method name not recognized");
            last = reply;
        }
        Ok(last)
    }

    // --- Flight ---

    pub fn set_throttle(
        &self,
        value: f64,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control("SetThrottle", vec![value.into(), rocket_arg(rocket)])
    }

    pub fn set_rcs(&self, on: bool, rocket: Option<&RocketRef>) -> Result<ControlReply, ClientError> {
        self.control("SetRCS", vec![on.into(), rocket_arg(rocket)])
    }

    pub fn stage(&self, rocket: Option<&RocketRef>) -> Result<ControlReply, ClientError> {
        self.control("Stage", vec![rocket_arg(rocket)])
    }

    /// Rotate to a named mode (`"Prograde"`, `"Target"`, ...) or an angle in degrees.
    pub fn rotate(
        &self,
        mode_or_angle: impl Into<Value>,
        offset: f64,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control(
            "Rotate",
            vec![mode_or_angle.into(), offset.into(), rocket_arg(rocket)],
        )
    }

    pub fn stop_rotate(
        &self,
        rocket: Option<&RocketRef>,
        stop_coroutine: bool,
    ) -> Result<ControlReply, ClientError> {
        self.control("StopRotate", vec![rocket_arg(rocket), stop_coroutine.into()])
    }

    pub fn set_rotation(
        &self,
        angle: f64,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control("SetRotation", vec![angle.into(), rocket_arg(rocket)])
    }

    pub fn rcs_thrust(
        &self,
        direction: &str,
        seconds: f64,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control(
            "RcsThrust",
            vec![direction.into(), seconds.into(), rocket_arg(rocket)],
        )
    }

    pub fn set_main_engine_on(
        &self,
        on: bool,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control("SetMainEngineOn", vec![on.into(), rocket_arg(rocket)])
    }

    pub fn use_part(
        &self,
        part_id: i64,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control("UsePart", vec![part_id.into(), rocket_arg(rocket)])
    }

    pub fn launch(&self) -> Result<ControlReply, ClientError> {
        self.control("Launch", vec![])
    }

    // --- Rockets and targets ---

    pub fn switch_rocket(&self, rocket: &RocketRef) -> Result<ControlReply, ClientError> {
        self.control("SwitchRocket", vec![rocket.to_json()])
    }

    pub fn rename_rocket(
        &self,
        rocket: &RocketRef,
        new_name: &str,
    ) -> Result<ControlReply, ClientError> {
        self.control("RenameRocket", vec![rocket.to_json(), new_name.into()])
    }

    /// Target a body or rocket by name or list index.
    pub fn set_target(&self, name_or_index: impl Into<Value>) -> Result<ControlReply, ClientError> {
        self.control("SetTarget", vec![name_or_index.into()])
    }

    pub fn clear_target(&self) -> Result<ControlReply, ClientError> {
        self.control("ClearTarget", vec![])
    }

    pub fn delete_rocket(&self, rocket: Option<&RocketRef>) -> Result<ControlReply, ClientError> {
        self.control(
            "DeleteRocket",
            vec![rocket.map_or(Value::Null, RocketRef::to_json)],
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_rocket(
        &self,
        planet_code: &str,
        blueprint_json: &str,
        rocket_name: Option<&str>,
        x: Option<f64>,
        y: Option<f64>,
        vx: Option<f64>,
        vy: Option<f64>,
        vr: Option<f64>,
    ) -> Result<ControlReply, ClientError> {
        self.control(
            "CreateRocket",
            vec![
                planet_code.into(),
                blueprint_json.into(),
                opt(rocket_name),
                opt(x),
                opt(y),
                opt(vx),
                opt(vy),
                opt(vr),
            ],
        )
    }

    pub fn set_map_icon_color(
        &self,
        rgba_value: &str,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control("SetMapIconColor", vec![rgba_value.into(), rocket_arg(rocket)])
    }

    // --- Building and staging ---

    pub fn build(&self, blueprint_info: &str) -> Result<ControlReply, ClientError> {
        self.control("Build", vec![blueprint_info.into()])
    }

    pub fn clear_blueprint(&self) -> Result<ControlReply, ClientError> {
        self.control("ClearBlueprint", vec![])
    }

    pub fn switch_to_build(&self) -> Result<ControlReply, ClientError> {
        self.control("SwitchToBuild", vec![])
    }

    pub fn clear_debris(&self) -> Result<ControlReply, ClientError> {
        self.control("ClearDebris", vec![])
    }

    pub fn add_stage(
        &self,
        index: i64,
        part_ids: &[i64],
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control(
            "AddStage",
            vec![index.into(), json!(part_ids), rocket_arg(rocket)],
        )
    }

    pub fn remove_stage(
        &self,
        index: i64,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control("RemoveStage", vec![index.into(), rocket_arg(rocket)])
    }

    // --- State manipulation ---

    pub fn set_orbit(
        &self,
        radius: f64,
        eccentricity: Option<f64>,
        true_anomaly: Option<f64>,
        counterclockwise: Option<bool>,
        planet_code: Option<&str>,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control(
            "SetOrbit",
            vec![
                radius.into(),
                opt(eccentricity),
                opt(true_anomaly),
                opt(counterclockwise),
                opt(planet_code),
                rocket_arg(rocket),
            ],
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_state(
        &self,
        x: Option<f64>,
        y: Option<f64>,
        vx: Option<f64>,
        vy: Option<f64>,
        angular_velocity: Option<f64>,
        blueprint_json: Option<&str>,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control(
            "SetState",
            vec![
                opt(x),
                opt(y),
                opt(vx),
                opt(vy),
                opt(angular_velocity),
                opt(blueprint_json),
                rocket_arg(rocket),
            ],
        )
    }

    pub fn transfer_fuel(
        &self,
        from_tank_id: i64,
        to_tank_id: i64,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control(
            "TransferFuel",
            vec![from_tank_id.into(), to_tank_id.into(), rocket_arg(rocket)],
        )
    }

    pub fn stop_fuel_transfer(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control("StopFuelTransfer", vec![rocket_arg(rocket)])
    }

    pub fn wheel_control(
        &self,
        enable: Option<bool>,
        turn_axis: Option<f64>,
        rocket: Option<&RocketRef>,
    ) -> Result<ControlReply, ClientError> {
        self.control(
            "WheelControl",
            vec![opt(enable), opt(turn_axis), rocket_arg(rocket)],
        )
    }

    // --- Time and map ---

    pub fn set_timewarp(
        &self,
        speed: f64,
        realtime_physics: Option<bool>,
        show_message: Option<bool>,
    ) -> Result<ControlReply, ClientError> {
        self.control(
            "SetTimewarp",
            vec![speed.into(), opt(realtime_physics), opt(show_message)],
        )
    }

    pub fn timewarp_plus(&self) -> Result<ControlReply, ClientError> {
        self.control("TimewarpPlus", vec![])
    }

    pub fn timewarp_minus(&self) -> Result<ControlReply, ClientError> {
        self.control("TimewarpMinus", vec![])
    }

    pub fn switch_map_view(&self, on: Option<bool>) -> Result<ControlReply, ClientError> {
        self.control("SwitchMapView", vec![opt(on)])
    }

    pub fn track(&self, name_or_index: impl Into<Value>) -> Result<ControlReply, ClientError> {
        self.control("Track", vec![name_or_index.into()])
    }

    pub fn unfocus(&self) -> Result<ControlReply, ClientError> {
        self.control("Unfocus", vec![])
    }

    // --- Game ---

    pub fn set_cheat(&self, cheat_name: &str, value: bool) -> Result<ControlReply, ClientError> {
        self.control("SetCheat", vec![cheat_name.into(), value.into()])
    }

    pub fn revert(&self, revert_type: &str) -> Result<ControlReply, ClientError> {
        self.control("Revert", vec![revert_type.into()])
    }

    pub fn complete_challenge(&self, challenge_id: &str) -> Result<ControlReply, ClientError> {
        self.control("CompleteChallenge", vec![challenge_id.into()])
    }

    pub fn wait_for_window(
        &self,
        mode: Option<&str>,
        parameter: Option<f64>,
    ) -> Result<ControlReply, ClientError> {
        self.control("WaitForWindow", vec![opt(mode), opt(parameter)])
    }

    pub fn show_toast(&self, toast: &str) -> Result<ControlReply, ClientError> {
        self.control("ShowToast", vec![toast.into()])
    }

    pub fn log_message(&self, msg_type: &str, message: &str) -> Result<ControlReply, ClientError> {
        self.control("LogMessage", vec![msg_type.into(), message.into()])
    }

    pub fn quicksave_manager(
        &self,
        operation: Option<&str>,
        name: Option<&str>,
    ) -> Result<ControlReply, ClientError> {
        self.control("QuicksaveManager", vec![opt(operation), opt(name)])
    }

    // --- Queries routed through /control ---

    pub fn get_rocket_info(&self, rocket: Option<&RocketRef>) -> Result<ControlReply, ClientError> {
        self.control("GetRocketInfo", vec![rocket_arg(rocket)])
    }

    pub fn get_rocket_list(&self) -> Result<ControlReply, ClientError> {
        self.control("GetRocketList", vec![])
    }

    pub fn get_world_info(&self) -> Result<ControlReply, ClientError> {
        self.control("GetWorldInfo", vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::MockSfsServer;
    use std::time::Duration;

    fn http_for(server: &MockSfsServer) -> HttpClient {
        HttpClient::new("127.0.0.1", server.port(), Duration::from_secs(5))
    }

    #[test]
    fn test_candidates_from_snake_case() {
        assert_eq!(
            method_name_candidates("use_part"),
            vec!["use_part", "Use_part", "UsePart", "usePart", "USE_PART"]
        );
    }

    #[test]
    fn test_candidates_from_pascal_case() {
        assert_eq!(
            method_name_candidates("SetThrottle"),
            vec!["SetThrottle", "setthrottle", "SETTHROTTLE", "Setthrottle"]
        );
    }

    #[test]
    fn test_candidates_from_mixed_snake_case() {
        let candidates = method_name_candidates("Set_RCS");
        assert_eq!(candidates[0], "Set_RCS");
        assert!(candidates.contains(&"SetRcs".to_string()));
        assert!(candidates.contains(&"setRcs".to_string()));
        assert!(candidates.contains(&"set_rcs".to_string()));
        assert!(candidates.contains(&"SET_RCS".to_string()));
        assert!(candidates.contains(&"Set_rcs".to_string()));
    }

    #[test]
    fn test_candidates_degenerate_names() {
        assert_eq!(method_name_candidates(""), vec![""]);
        assert_eq!(method_name_candidates("__"), vec!["__"]);
    }

    #[test]
    fn test_reply_unwraps_result_envelope() {
        assert_eq!(
            ControlReply::from_response(json!({ "result": "Success" })),
            ControlReply::Text("Success".to_string())
        );
        assert_eq!(
            ControlReply::from_response(json!({ "result": { "mass": 3.5 } })),
            ControlReply::Data(json!({ "mass": 3.5 }))
        );
        assert_eq!(
            ControlReply::from_response(json!({ "result": "ok", "extra": 1 })),
            ControlReply::Data(json!({ "result": "ok", "extra": 1 }))
        );
        assert_eq!(
            ControlReply::from_response(json!("Done")),
            ControlReply::Text("Done".to_string())
        );
    }

    #[test]
    fn test_typed_command_payload() {
        let server = MockSfsServer::builder()
            .control("SetThrottle", json!({ "result": "Success" }))
            .start();
        let http = http_for(&server);
        let control = ControlApi::new(&http);

        let reply = control.set_throttle(0.75, Some(&RocketRef::Id(1))).unwrap();
        assert_eq!(reply.as_text(), Some("Success"));

        let body = server.requests_to("/control")[0].json_body();
        assert_eq!(body, json!({ "method": "SetThrottle", "args": [0.75, "1"] }));
    }

    #[test]
    fn test_optional_arguments_are_null() {
        let server = MockSfsServer::builder()
            .control("SetOrbit", json!({ "result": "Success" }))
            .start();
        let http = http_for(&server);
        ControlApi::new(&http)
            .set_orbit(700_000.0, Some(0.1), None, Some(true), Some("Earth"), None)
            .unwrap();

        let body = server.requests_to("/control")[0].json_body();
        assert_eq!(
            body["args"],
            json!([700000.0, 0.1, null, true, "Earth", null])
        );
    }

    #[test]
    fn test_switch_rocket_sends_raw_reference() {
        let server = MockSfsServer::builder()
            .control("SwitchRocket", json!({ "result": "Success" }))
            .start();
        let http = http_for(&server);
        let control = ControlApi::new(&http);
        control.switch_rocket(&RocketRef::Id(3)).unwrap();
        control.switch_rocket(&RocketRef::from("Probe")).unwrap();

        let requests = server.requests_to("/control");
        assert_eq!(requests[0].json_body()["args"], json!([3]));
        assert_eq!(requests[1].json_body()["args"], json!(["Probe"]));
    }

    #[test]
    fn test_invoke_walks_candidates_until_accepted() {
        let server = MockSfsServer::builder()
            .control("UsePart", json!({ "result": "Success" }))
            .start();
        let http = http_for(&server);

        let reply = ControlApi::new(&http).invoke("use_part", vec![json!(4)]).unwrap();
        assert_eq!(reply, ControlReply::Text("Success".to_string()));

        let tried: Vec<String> = server
            .requests_to("/control")
            .iter()
            .map(|r| r.json_body()["method"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(tried, vec!["use_part", "Use_part", "UsePart"]);
    }

    #[test]
    fn test_invoke_returns_last_unknown_reply() {
        let server = MockSfsServer::builder().start();
        let http = http_for(&server);

        let reply = ControlApi::new(&http).invoke("warp_drive", vec![]).unwrap();
        assert!(reply.is_unknown_method());
        // The upper-case form is the last candidate tried.
        assert_eq!(reply.as_text(), Some("Error: Unknown method WARP_DRIVE"));
        assert_eq!(server.requests_to("/control").len(), 5);
    }

    #[test]
    fn test_structured_reply() {
        let server = MockSfsServer::builder()
            .control("GetWorldInfo", json!({ "result": { "worldTime": 12.5 } }))
            .start();
        let http = http_for(&server);
        let reply = ControlApi::new(&http).get_world_info().unwrap();
        assert_eq!(reply, ControlReply::Data(json!({ "worldTime": 12.5 })));
    }
}
