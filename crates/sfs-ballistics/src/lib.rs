//! Ballistic impact-point prediction for the SFS Control client.
//!
//! Propagates a point mass under inverse-square gravity around a spherical body
//! with a fixed-step Velocity-Verlet integrator and reports where (if anywhere)
//! the trajectory first crosses the body's surface circle. Purely numeric: the
//! caller supplies position, velocity, radius, and surface gravity.

mod body;
mod predictor;
mod refine;

pub use body::{Body, DEFAULT_DT, DEFAULT_MAX_STEPS, StepConfig};
pub use predictor::{ESCAPE_RADIUS_FACTOR, ImpactOutcome, ImpactPoint, impact_point, predict};
