//! Blocking client for the SFSControl HTTP API of Spaceflight Simulator.
//!
//! [`SfsClient`] is the entry point. It hands out views for telemetry
//! ([`InfoApi`], [`ValuesApi`]), derived quantities and impact prediction
//! ([`CalcApi`]), rocket commands ([`ControlApi`]) and world overlays
//! ([`DrawApi`]).

mod calc;
mod client;
mod control;
mod draw;
mod error;
mod http;
mod info;
mod rocket_ref;
mod values;

#[cfg(test)]
mod mock_server;

pub use calc::{AngleInfo, CalcApi, OrbitInfo, VelocityInfo};
pub use client::SfsClient;
pub use control::{ControlApi, ControlReply, UNKNOWN_METHOD_REPLY, method_name_candidates};
pub use draw::{Color, DrawApi, DrawStyle, FillAxis, MIN_CIRCLE_RESOLUTION};
pub use error::ClientError;
pub use http::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT, HttpClient};
pub use info::InfoApi;
pub use rocket_ref::RocketRef;
pub use values::ValuesApi;

pub use sfs_ballistics::{Body, ImpactOutcome, ImpactPoint, StepConfig};
