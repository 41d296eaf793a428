//! Gravitating body and integration step configuration.

/// Default integration time step in seconds.
pub const DEFAULT_DT: f64 = 0.02;

/// Default upper bound on integration steps per prediction.
pub const DEFAULT_MAX_STEPS: usize = 100_000;

/// A spherical gravitating body centered on the origin of the prediction frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Surface radius in meters. Must be positive.
    pub radius: f64,
    /// Surface gravity in m/s². Zero means free flight.
    pub surface_gravity: f64,
}

impl Body {
    pub fn new(radius: f64, surface_gravity: f64) -> Self {
        Self {
            radius,
            surface_gravity,
        }
    }

    /// Standard gravitational parameter `μ = g·R²`.
    pub fn mu(&self) -> f64 {
        self.surface_gravity * self.radius * self.radius
    }
}

/// Precision/runtime trade-off for a single prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConfig {
    /// Fixed time step in seconds.
    pub dt: f64,
    /// Maximum number of integration steps before giving up.
    pub max_steps: usize,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl StepConfig {
    pub fn new(dt: f64, max_steps: usize) -> Self {
        Self { dt, max_steps }
    }

    /// Returns a copy with a non-positive (or NaN) `dt` replaced by [`DEFAULT_DT`].
    pub fn sanitized(&self) -> Self {
        let dt = if self.dt > 0.0 { self.dt } else { DEFAULT_DT };
        Self {
            dt,
            max_steps: self.max_steps,
        }
    }
}
