//! Fixed-step Velocity-Verlet propagation to the first surface crossing.

use glam::DVec2;
use serde::Serialize;

use crate::body::{Body, StepConfig};
use crate::refine::segment_circle_entry;

/// Trajectories farther than this many body radii are treated as escaping.
pub const ESCAPE_RADIUS_FACTOR: f64 = 1.0e6;

/// A point on (or inside) the body's surface, in the body-centered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactPoint {
    pub x: f64,
    pub y: f64,
}

impl ImpactPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance from the body center.
    pub fn distance(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Polar angle of the impact in degrees, normalized to `[0, 360)`.
    pub fn angle_degrees(&self) -> f64 {
        self.y.atan2(self.x).to_degrees().rem_euclid(360.0)
    }
}

impl From<DVec2> for ImpactPoint {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<ImpactPoint> for DVec2 {
    fn from(p: ImpactPoint) -> Self {
        DVec2::new(p.x, p.y)
    }
}

/// How a prediction terminated.
///
/// Serializes flat, tagged by `outcome`: `{"outcome": "impact", "x": .., "y": ..}`
/// or `{"outcome": "escaped"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ImpactOutcome {
    /// The trajectory reaches the surface at this point.
    Impact(ImpactPoint),
    /// Started exactly at the body center; gravity direction is undefined.
    Degenerate,
    /// Left the divergence bound of [`ESCAPE_RADIUS_FACTOR`] radii.
    Escaped,
    /// Step budget exhausted without hitting or escaping (e.g. a stable orbit).
    Inconclusive,
}

impl ImpactOutcome {
    /// The impact point, treating every non-impact outcome alike.
    pub fn impact(self) -> Option<ImpactPoint> {
        match self {
            ImpactOutcome::Impact(point) => Some(point),
            _ => None,
        }
    }

    pub fn is_impact(&self) -> bool {
        matches!(self, ImpactOutcome::Impact(_))
    }
}

/// Acceleration `-μ r / |r|³` at `pos`, given its precomputed squared length.
#[inline]
fn gravity_accel(pos: DVec2, dist_sq: f64, mu: f64) -> DVec2 {
    let inv_d = 1.0 / dist_sq.sqrt();
    let inv_d3 = inv_d / dist_sq;
    pos * (-mu * inv_d3)
}

/// Propagate a point mass from `position` with `velocity` until it hits `body`,
/// escapes, or runs out of steps.
///
/// A start on or inside the surface is an immediate impact at the start point.
/// A start at the exact center is [`ImpactOutcome::Degenerate`]. A non-positive
/// `dt` in `config` falls back to the default step.
pub fn predict(position: DVec2, velocity: DVec2, body: &Body, config: &StepConfig) -> ImpactOutcome {
    let config = config.sanitized();
    let dt = config.dt;
    let half_dt = 0.5 * dt;

    let radius_sq = body.radius * body.radius;
    let mu = body.surface_gravity * radius_sq;
    let escape_sq = ESCAPE_RADIUS_FACTOR * ESCAPE_RADIUS_FACTOR * radius_sq;

    let dist_sq = position.length_squared();
    if dist_sq == 0.0 {
        return ImpactOutcome::Degenerate;
    }
    if dist_sq <= radius_sq {
        return ImpactOutcome::Impact(position.into());
    }

    let mut pos = position;
    let mut vel = velocity;
    let mut accel = gravity_accel(pos, dist_sq, mu);

    for step in 0..config.max_steps {
        let vel_half = vel + half_dt * accel;
        let next = pos + dt * vel_half;

        let next_dist_sq = next.length_squared();
        if next_dist_sq <= radius_sq {
            let hit = segment_circle_entry(pos, next, radius_sq).unwrap_or(next);
            tracing::trace!(step, x = hit.x, y = hit.y, "trajectory reached surface");
            return ImpactOutcome::Impact(hit.into());
        }
        if next_dist_sq > escape_sq {
            tracing::trace!(step, "trajectory escaped divergence bound");
            return ImpactOutcome::Escaped;
        }

        let next_accel = gravity_accel(next, next_dist_sq, mu);
        vel = vel_half + half_dt * next_accel;
        pos = next;
        accel = next_accel;
    }

    tracing::trace!(max_steps = config.max_steps, "step budget exhausted");
    ImpactOutcome::Inconclusive
}

/// Flat-argument form of [`predict`] returning only the impact point.
///
/// Every non-impact outcome (center start, escape, exhausted budget) is `None`.
pub fn impact_point(
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    radius: f64,
    gravity: f64,
    config: &StepConfig,
) -> Option<ImpactPoint> {
    predict(
        DVec2::new(x, y),
        DVec2::new(vx, vy),
        &Body::new(radius, gravity),
        config,
    )
    .impact()
}
