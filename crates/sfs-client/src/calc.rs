//! Quantities derived from telemetry, plus impact prediction.

use glam::DVec2;
use serde::Serialize;
use serde_json::Value;
use sfs_ballistics::{Body, ImpactOutcome, ImpactPoint, StepConfig};

use crate::error::ClientError;
use crate::info::InfoApi;
use crate::rocket_ref::RocketRef;
use crate::values::{as_string, float_field, location_vector};

/// Angle of `v` in degrees, normalized to `[0, 360)`.
fn direction_degrees(v: DVec2) -> f64 {
    v.y.atan2(v.x).to_degrees().rem_euclid(360.0)
}

/// Full velocity breakdown of a rocket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VelocityInfo {
    pub magnitude: f64,
    pub direction: f64,
    pub vx: f64,
    pub vy: f64,
}

impl From<DVec2> for VelocityInfo {
    fn from(v: DVec2) -> Self {
        Self {
            magnitude: v.length(),
            direction: direction_degrees(v),
            vx: v.x,
            vy: v.y,
        }
    }
}

/// Orbit elements reported by the game. Absent elements are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OrbitInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apoapsis: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periapsis: Option<f64>,
    #[serde(rename = "trueAnomaly", skip_serializing_if = "Option::is_none")]
    pub true_anomaly: Option<f64>,
}

impl OrbitInfo {
    fn is_empty(&self) -> bool {
        self.period.is_none()
            && self.apoapsis.is_none()
            && self.periapsis.is_none()
            && self.true_anomaly.is_none()
    }
}

/// Angles of a rocket in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AngleInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_direction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl AngleInfo {
    fn is_empty(&self) -> bool {
        self.velocity_direction.is_none()
            && self.normal_angle.is_none()
            && self.position_angle.is_none()
            && self.rotation.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CalcApi<'a> {
    info: InfoApi<'a>,
}

impl<'a> CalcApi<'a> {
    pub fn new(info: InfoApi<'a>) -> Self {
        Self { info }
    }

    /// Velocity vector from `rocket.location.velocity`.
    pub fn rocket_velocity_components(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<DVec2>, ClientError> {
        Ok(location_vector(&self.info.rocket_save(rocket)?, "velocity"))
    }

    pub fn rocket_velocity_magnitude(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        Ok(self.rocket_velocity_components(rocket)?.map(DVec2::length))
    }

    /// Direction of travel in degrees, `[0, 360)`.
    pub fn rocket_velocity_direction(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        Ok(self.rocket_velocity_components(rocket)?.map(direction_degrees))
    }

    /// Orbital period in seconds.
    pub fn rocket_orbit_period(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        let sim = self.info.rocket_sim(rocket)?;
        Ok(sim.get("orbit").and_then(|orbit| float_field(orbit, "period")))
    }

    /// Velocity direction rotated by 90°.
    pub fn rocket_normal_angle(&self, rocket: Option<&RocketRef>) -> Result<Option<f64>, ClientError> {
        Ok(self
            .rocket_velocity_direction(rocket)?
            .map(|direction| (direction + 90.0).rem_euclid(360.0)))
    }

    /// Angle from the planet center to the rocket, from `rocket_sim.position`.
    pub fn rocket_position_angle(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<f64>, ClientError> {
        let sim = self.info.rocket_sim(rocket)?;
        let Some(position) = sim.get("position") else {
            return Ok(None);
        };
        match (float_field(position, "x"), float_field(position, "y")) {
            (Some(x), Some(y)) => Ok(Some(direction_degrees(DVec2::new(x, y)))),
            _ => Ok(None),
        }
    }

    pub fn rocket_velocity_info(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<VelocityInfo>, ClientError> {
        Ok(self.rocket_velocity_components(rocket)?.map(VelocityInfo::from))
    }

    /// `None` when the rocket has no orbit or the orbit carries none of the elements.
    pub fn rocket_orbit_info(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<OrbitInfo>, ClientError> {
        let sim = self.info.rocket_sim(rocket)?;
        let Some(orbit) = sim.get("orbit").filter(|o| o.is_object()) else {
            return Ok(None);
        };
        let info = OrbitInfo {
            period: float_field(orbit, "period"),
            apoapsis: float_field(orbit, "apoapsis"),
            periapsis: float_field(orbit, "periapsis"),
            true_anomaly: float_field(orbit, "trueAnomaly"),
        };
        Ok((!info.is_empty()).then_some(info))
    }

    pub fn rocket_angle_info(
        &self,
        rocket: Option<&RocketRef>,
    ) -> Result<Option<AngleInfo>, ClientError> {
        let velocity_direction = self.rocket_velocity_direction(rocket)?;
        let info = AngleInfo {
            velocity_direction,
            normal_angle: velocity_direction.map(|d| (d + 90.0).rem_euclid(360.0)),
            position_angle: self.rocket_position_angle(rocket)?,
            rotation: float_field(&self.info.rocket_sim(rocket)?, "rotation"),
        };
        Ok((!info.is_empty()).then_some(info))
    }

    /// Offline impact prediction; see [`sfs_ballistics::impact_point`].
    #[allow(clippy::too_many_arguments)]
    pub fn impact_point(
        &self,
        rocket_x: f64,
        rocket_y: f64,
        vel_x: f64,
        vel_y: f64,
        planet_radius: f64,
        gravity: f64,
        config: &StepConfig,
    ) -> Option<ImpactPoint> {
        sfs_ballistics::impact_point(rocket_x, rocket_y, vel_x, vel_y, planet_radius, gravity, config)
    }

    /// Predict where the rocket hits `planet`, using live telemetry.
    ///
    /// The planet defaults to the rocket's parent planet. Position and velocity
    /// come from the rocket's saved location, radius and gravity from `/planet`.
    pub fn predict_impact(
        &self,
        rocket: Option<&RocketRef>,
        planet: Option<&str>,
        config: &StepConfig,
    ) -> Result<ImpactOutcome, ClientError> {
        let save = self.info.rocket_save(rocket)?;
        let position =
            location_vector(&save, "position").ok_or(ClientError::MissingField("location.position"))?;
        let velocity =
            location_vector(&save, "velocity").ok_or(ClientError::MissingField("location.velocity"))?;

        let parent = match planet {
            Some(code) => Some(code.to_string()),
            None => self
                .info
                .rocket_sim(rocket)?
                .get("parentPlanetCode")
                .and_then(as_string),
        };
        let planet_data: Value = self.info.planet(parent.as_deref())?;
        let radius = float_field(&planet_data, "radius").ok_or(ClientError::MissingField("radius"))?;
        let gravity =
            float_field(&planet_data, "gravity").ok_or(ClientError::MissingField("gravity"))?;

        tracing::debug!(
            planet = parent.as_deref().unwrap_or("<current>"),
            radius,
            gravity,
            "predicting impact"
        );
        Ok(sfs_ballistics::predict(
            position,
            velocity,
            &Body::new(radius, gravity),
            config,
        ))
    }
}
