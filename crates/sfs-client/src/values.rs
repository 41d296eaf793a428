//! Single-field getters over the telemetry endpoints.
//!
//! The mod's JSON is loosely typed (numbers sometimes arrive as strings), so
//! fields are coerced leniently. Every getter returns `Ok(None)` when the field
//! is missing or not coercible and only fails on transport errors.

use glam::DVec2;
use serde_json::Value;

use crate::error::ClientError;
use crate::info::InfoApi;
use crate::rocket_ref::RocketRef;

/// Number, numeric string, or boolean as `f64`.
pub(crate) fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Integer, truncated float, integer string, or boolean as `i64`.
pub(crate) fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Truthiness of a present, non-null value.
pub(crate) fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => Some(!s.is_empty()),
        Value::Array(items) => Some(!items.is_empty()),
        Value::Object(map) => Some(!map.is_empty()),
    }
}

/// Strings as-is, other non-null scalars in their JSON text form.
pub(crate) fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn float_field(data: &Value, key: &str) -> Option<f64> {
    data.get(key).and_then(as_f64)
}

fn string_field(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(as_string)
}

fn value_field(data: &Value, key: &str) -> Option<Value> {
    data.get(key).filter(|v| !v.is_null()).cloned()
}

fn object_field(data: &Value, key: &str) -> Option<Value> {
    data.get(key).filter(|v| v.is_object()).cloned()
}

/// `location.<key>` of a saved rocket as a 2D vector; both components required.
pub(crate) fn location_vector(save: &Value, key: &str) -> Option<DVec2> {
    let v = save.get("location")?.get(key)?;
    Some(DVec2::new(as_f64(v.get("x")?)?, as_f64(v.get("y")?)?))
}

/// Telemetry fields, one value per call.
#[derive(Debug, Clone, Copy)]
pub struct ValuesApi<'a> {
    info: InfoApi<'a>,
}

impl<'a> ValuesApi<'a> {
    pub fn new(info: InfoApi<'a>) -> Self {
        Self { info }
    }

    /// `rocket_sim.<key>` as a float, falling back to `rocket.<fallback_key>`.
    fn sim_float_with_fallback(
        &self,
        rocket: Option<&RocketRef>,
        key: &str,
        fallback_key: &str,
    ) -> Result<Option<f64>, ClientError> {
        if let Some(v) = float_field(&self.info.rocket_sim(rocket)?, key) {
            return Ok(Some(v));
        }
        Ok(float_field(&self.info.rocket_save(rocket)?, fallback_key))
    }

    fn rocket_orbit_float(
        &self,
        rocket: Option<&RocketRef>,
        key: &str,
    ) -> Result<Option<f64>, ClientError> {
        Ok(self
            .rocket_orbit(rocket)?
            .and_then(|orbit| float_field(&orbit, key)))
    }

    fn other_float(&self, rocket: Option<&RocketRef>, key: &str) -> Result<Option<f64>, ClientError> {
        Ok(float_field(&self.info.other(rocket)?, key))
    }

    fn other_value(
        &self,
        rocket: Option<&RocketRef>,
        key: &str,
    ) -> Result<Option<Value>, ClientError> {
        Ok(value_field(&self.info.other(rocket)?, key))
    }

    fn planet_float(&self, codename: Option<&str>, key: &str) -> Result<Option<f64>, ClientError> {
        Ok(float_field(&self.info.planet(codename)?, key))
    }

    fn planet_orbit_float(
        &self,
        codename: Option<&str>,
        key: &str,
    ) -> Result<Option<f64>, ClientError> {
        Ok(self
            .planet_orbit(codename)?
            .and_then(|orbit| float_field(&orbit, key)))
    }

    fn version_string(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(string_field(&self.info.version()?, key))
    }

    // --- Rocket ---

    /// Rocket name from `rocket_sim.name`, falling back to `rocket.rocketName`.
    pub fn rocket_name(&self, rocket: Option<&RocketRef>) -> Result<Option<String>, ClientError> {
        if let Some(name) = string_field(&self.info.rocket_sim(rocket)?, "name") {
            return Ok(Some(name));
        }
        Ok(string_field(&self.info.rocket_save(rocket)?, "rocketName"))
    }

    /// Index of the rocket in the scene list.
    pub fn rocket_id(&self, rocket: Option<&RocketRef>) -> Result<Option<i64>, ClientError> {
        Ok(self.info.rocket_sim(rocket)?.get("id").and_then(as_i64))
    }

    /// Height above the terrain.
    pub fn rocket_altitude(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        self.sim_float_with_fallback(rocket, "height", "height")
    }

    /// Position relative to the parent planet's center (`rocket.location.position`).
    pub fn rocket_position(&self, rocket: Option<&RocketRef>) -> Result<Option<DVec2>, ClientError> {
        let save = self.info.rocket_save(rocket)?;
        let Some(pos) = save.get("location").and_then(|l| l.get("position")) else {
            return Ok(None);
        };
        match (pos.get("x"), pos.get("y")) {
            (Some(x), Some(y)) => Ok(Some(DVec2::new(
                as_f64(x).unwrap_or(0.0),
                as_f64(y).unwrap_or(0.0),
            ))),
            _ => Ok(None),
        }
    }

    /// Rotation in degrees.
    pub fn rocket_rotation(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        self.sim_float_with_fallback(rocket, "rotation", "rotation")
    }

    /// Planet-centric longitude in degrees, normalized to `[0, 360)`.
    pub fn rocket_longitude(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        let save = self.info.rocket_save(rocket)?;
        Ok(save
            .get("location")
            .and_then(|l| l.get("position"))
            .and_then(|p| p.get("AngleDegrees"))
            .and_then(as_f64)
            .map(|angle| angle.rem_euclid(360.0)))
    }

    pub fn rocket_angular_velocity(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        Ok(float_field(&self.info.rocket_sim(rocket)?, "angularVelocity"))
    }

    /// Throttle in `0..=1`.
    pub fn rocket_throttle(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        self.sim_float_with_fallback(rocket, "throttle", "throttlePercent")
    }

    pub fn rocket_rcs_on(&self, rocket: Option<&RocketRef>) -> Result<Option<bool>, ClientError> {
        let sim = self.info.rocket_sim(rocket)?;
        if let Some(rcs) = sim.get("rcs") {
            return Ok(as_bool(rcs));
        }
        Ok(self.info.rocket_save(rocket)?.get("RCS").and_then(as_bool))
    }

    /// Orbit object (`apoapsis`, `periapsis`, `period`, `trueAnomaly`).
    pub fn rocket_orbit(&self, rocket: Option<&RocketRef>) -> Result<Option<Value>, ClientError> {
        Ok(object_field(&self.info.rocket_sim(rocket)?, "orbit"))
    }

    pub fn rocket_orbit_apoapsis(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        self.rocket_orbit_float(rocket, "apoapsis")
    }

    pub fn rocket_orbit_periapsis(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        self.rocket_orbit_float(rocket, "periapsis")
    }

    pub fn rocket_orbit_period(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        self.rocket_orbit_float(rocket, "period")
    }

    pub fn rocket_orbit_true_anomaly(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        self.rocket_orbit_float(rocket, "trueAnomaly")
    }

    /// Codename of the body whose sphere of influence the rocket is in.
    pub fn rocket_parent_planet_code(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<String>, ClientError> {
        Ok(string_field(&self.info.rocket_sim(rocket)?, "parentPlanetCode"))
    }

    // --- Other ---

    pub fn other_target_angle(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "targetAngle")
    }

    pub fn other_quicksaves(&self, rocket: Option<&RocketRef>) -> Result<Option<Value>, ClientError> {
        self.other_value(rocket, "quicksaves")
    }

    pub fn other_nav_target(&self, rocket: Option<&RocketRef>) -> Result<Option<Value>, ClientError> {
        self.other_value(rocket, "navTarget")
    }

    pub fn other_timewarp_speed(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "timewarpSpeed")
    }

    pub fn other_world_time(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "worldTime")
    }

    pub fn other_scene_name(&self, rocket: Option<&RocketRef>) -> Result<Option<String>, ClientError> {
        Ok(string_field(&self.info.other(rocket)?, "sceneName"))
    }

    pub fn other_transfer_window_delta_v(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "transferWindowDeltaV")
    }

    pub fn other_mission_status(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<Value>, ClientError> {
        self.other_value(rocket, "missionStatus")
    }

    pub fn other_mass(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "mass")
    }

    pub fn other_thrust(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "thrust")
    }

    pub fn other_max_thrust(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "maxThrust")
    }

    /// Thrust-to-weight ratio.
    pub fn other_twr(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "TWR")
    }

    pub fn other_dist_to_apoapsis(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "distToApoapsis")
    }

    pub fn other_dist_to_periapsis(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "distToPeriapsis")
    }

    pub fn other_time_to_apoapsis(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "timeToApoapsis")
    }

    pub fn other_time_to_periapsis(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        self.other_float(rocket, "timeToPeriapsis")
    }

    pub fn other_inertia_info(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<Value>, ClientError> {
        self.other_value(rocket, "inertia")
    }

    // --- Planet ---

    /// Surface radius in meters.
    pub fn planet_radius(&self, codename: Option<&str>) -> Result<Option<f64>, ClientError> {
        self.planet_float(codename, "radius")
    }

    /// Surface gravity in m/s².
    pub fn planet_gravity(&self, codename: Option<&str>) -> Result<Option<f64>, ClientError> {
        self.planet_float(codename, "gravity")
    }

    /// Sphere of influence radius.
    pub fn planet_soi(&self, codename: Option<&str>) -> Result<Option<f64>, ClientError> {
        self.planet_float(codename, "SOI")
    }

    pub fn planet_has_atmosphere(&self, codename: Option<&str>) -> Result<Option<bool>, ClientError> {
        Ok(self.info.planet(codename)?.get("hasAtmosphere").and_then(as_bool))
    }

    pub fn planet_atmosphere_height(
        &self,
        codename: Option<&str>,
    ) -> Result<Option<f64>, ClientError> {
        self.planet_float(codename, "atmosphereHeight")
    }

    pub fn planet_parent(&self, codename: Option<&str>) -> Result<Option<String>, ClientError> {
        Ok(string_field(&self.info.planet(codename)?, "parent"))
    }

    pub fn planet_orbit(&self, codename: Option<&str>) -> Result<Option<Value>, ClientError> {
        Ok(object_field(&self.info.planet(codename)?, "orbit"))
    }

    pub fn planet_orbit_eccentricity(
        &self,
        codename: Option<&str>,
    ) -> Result<Option<f64>, ClientError> {
        self.planet_orbit_float(codename, "eccentricity")
    }

    pub fn planet_orbit_semi_major_axis(
        &self,
        codename: Option<&str>,
    ) -> Result<Option<f64>, ClientError> {
        self.planet_orbit_float(codename, "semiMajorAxis")
    }

    pub fn planet_orbit_argument_of_periapsis(
        &self,
        codename: Option<&str>,
    ) -> Result<Option<f64>, ClientError> {
        self.planet_orbit_float(codename, "argumentOfPeriapsis")
    }

    pub fn planet_orbit_current_true_anomaly(
        &self,
        codename: Option<&str>,
    ) -> Result<Option<f64>, ClientError> {
        self.planet_orbit_float(codename, "currentTrueAnomaly")
    }

    pub fn planet_orbit_current_radius(
        &self,
        codename: Option<&str>,
    ) -> Result<Option<f64>, ClientError> {
        self.planet_orbit_float(codename, "currentRadius")
    }

    pub fn planet_orbit_current_velocity(
        &self,
        codename: Option<&str>,
    ) -> Result<Option<f64>, ClientError> {
        self.planet_orbit_float(codename, "currentVelocity")
    }

    // --- SFSControl ---

    pub fn sfscontrol_version(&self) -> Result<Option<String>, ClientError> {
        self.version_string("version")
    }

    pub fn sfscontrol_build_date(&self) -> Result<Option<String>, ClientError> {
        self.version_string("buildDate")
    }

    pub fn sfscontrol_api_version(&self) -> Result<Option<String>, ClientError> {
        self.version_string("apiVersion")
    }

    pub fn sfscontrol_full_info(&self) -> Result<Value, ClientError> {
        self.info.version()
    }
}
