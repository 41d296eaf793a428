//! Subcommand implementations. Results are printed to `out` as pretty JSON.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use glam::DVec2;
use serde_json::{Value, json};
use sfs_ballistics::{Body, ImpactOutcome, StepConfig};
use sfs_client::{RocketRef, SfsClient};
use sfs_config::Config;
use tracing::info;

use crate::error::CliError;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the SFSControl mod version.
    Version,

    /// Summarize a rocket's flight state.
    Rocket {
        /// Rocket index or name (defaults to the controlled rocket).
        #[arg(long)]
        rocket: Option<RocketRef>,
    },

    /// Show a planet's data.
    Planet {
        /// Planet codename (defaults to the current planet).
        codename: Option<String>,
    },

    /// Predict where a rocket will hit the ground, from live telemetry.
    Impact {
        #[arg(long)]
        rocket: Option<RocketRef>,

        /// Planet codename (defaults to the rocket's parent planet).
        #[arg(long)]
        planet: Option<String>,
    },

    /// Predict an impact offline from an explicit state.
    Simulate {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[arg(long, allow_negative_numbers = true)]
        vx: f64,
        #[arg(long, allow_negative_numbers = true)]
        vy: f64,
        /// Planet radius in meters.
        #[arg(long)]
        radius: f64,
        /// Surface gravity in m/s².
        #[arg(long)]
        gravity: f64,
    },

    /// Send a control command, e.g. `sfs control set_throttle 0.5`.
    ///
    /// The method name is matched loosely. Each argument is parsed as JSON
    /// and sent as a string if that fails.
    Control {
        method: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Save a screenshot of the game view.
    Screenshot {
        #[arg(short, long, default_value = "screenshot.png")]
        output: PathBuf,
    },
}

/// A command-line argument as a JSON value, falling back to a plain string.
pub fn parse_control_arg(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::from(arg))
}

/// The serialized outcome, with the impact longitude added for hits.
pub fn outcome_json(outcome: &ImpactOutcome) -> Result<Value, CliError> {
    let mut value = serde_json::to_value(outcome)?;
    if let Some(point) = outcome.impact()
        && let Some(fields) = value.as_object_mut()
    {
        fields.insert("angle".to_string(), point.angle_degrees().into());
    }
    Ok(value)
}

fn step_config(config: &Config) -> StepConfig {
    StepConfig::new(config.predictor.dt, config.predictor.max_steps)
}

fn print(out: &mut dyn Write, value: &Value) -> Result<(), CliError> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn rocket_summary(client: &SfsClient, rocket: Option<&RocketRef>) -> Result<Value, CliError> {
    let values = client.values();
    let calc = client.calc();
    Ok(json!({
        "name": values.rocket_name(rocket)?,
        "id": values.rocket_id(rocket)?,
        "parentPlanet": values.rocket_parent_planet_code(rocket)?,
        "altitude": values.rocket_altitude(rocket)?,
        "throttle": values.rocket_throttle(rocket)?,
        "velocity": calc.rocket_velocity_info(rocket)?,
        "orbit": calc.rocket_orbit_info(rocket)?,
        "angles": calc.rocket_angle_info(rocket)?,
    }))
}

fn save_screenshot(client: &SfsClient, output: &Path) -> Result<Value, CliError> {
    let bytes = client.screenshot()?;
    std::fs::write(output, &bytes)?;
    info!(path = %output.display(), bytes = bytes.len(), "screenshot saved");
    Ok(json!({ "path": output.display().to_string(), "bytes": bytes.len() }))
}

/// Run `command` against the instance described by `config`.
pub fn run(command: Command, config: &Config, out: &mut dyn Write) -> Result<(), CliError> {
    let client = SfsClient::from_config(&config.connection);
    let result = match command {
        Command::Version => client.info().version()?,
        Command::Rocket { rocket } => rocket_summary(&client, rocket.as_ref())?,
        Command::Planet { codename } => client.info().planet(codename.as_deref())?,
        Command::Impact { rocket, planet } => {
            let outcome =
                client
                    .calc()
                    .predict_impact(rocket.as_ref(), planet.as_deref(), &step_config(config))?;
            outcome_json(&outcome)?
        }
        Command::Simulate {
            x,
            y,
            vx,
            vy,
            radius,
            gravity,
        } => {
            let outcome = sfs_ballistics::predict(
                DVec2::new(x, y),
                DVec2::new(vx, vy),
                &Body::new(radius, gravity),
                &step_config(config),
            );
            outcome_json(&outcome)?
        }
        Command::Control { method, args } => {
            let args = args.iter().map(|a| parse_control_arg(a)).collect();
            client.invoke(&method, args)?.into_value()
        }
        Command::Screenshot { output } => save_screenshot(&client, &output)?,
    };
    print(out, &result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_args_parse_as_json_or_string() {
        assert_eq!(parse_control_arg("0.5"), json!(0.5));
        assert_eq!(parse_control_arg("true"), json!(true));
        assert_eq!(parse_control_arg("null"), Value::Null);
        assert_eq!(parse_control_arg("[1,2]"), json!([1, 2]));
        assert_eq!(parse_control_arg("Prograde"), json!("Prograde"));
    }

    #[test]
    fn test_outcome_json() {
        let hit = ImpactOutcome::Impact(sfs_ballistics::ImpactPoint::new(0.0, 10.0));
        let printed = outcome_json(&hit).unwrap();
        assert_eq!(printed["outcome"], "impact");
        assert_eq!(printed["x"], 0.0);
        assert_eq!(printed["y"], 10.0);
        assert!((printed["angle"].as_f64().unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(printed.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_non_impact_outcomes_are_bare_tags() {
        assert_eq!(
            outcome_json(&ImpactOutcome::Escaped).unwrap(),
            json!({ "outcome": "escaped" })
        );
        assert_eq!(
            outcome_json(&ImpactOutcome::Degenerate).unwrap(),
            json!({ "outcome": "degenerate" })
        );
        assert_eq!(
            outcome_json(&ImpactOutcome::Inconclusive).unwrap(),
            json!({ "outcome": "inconclusive" })
        );
    }

    #[test]
    fn test_simulate_runs_offline() {
        let mut config = Config::default();
        // Nothing listens here; simulate must not touch the network.
        config.connection.port = 1;
        let command = Command::Simulate {
            x: 100.0,
            y: 0.0,
            vx: -10.0,
            vy: 0.0,
            radius: 10.0,
            gravity: 0.0,
        };

        let mut out = Vec::new();
        run(command, &config, &mut out).unwrap();

        let printed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["outcome"], "impact");
        assert!((printed["x"].as_f64().unwrap() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_simulate_reports_stable_orbit_as_inconclusive() {
        let mut config = Config::default();
        config.predictor.max_steps = 1_000;
        // Circular orbit: v = sqrt(g R² / r).
        let v = (9.8_f64 * 100.0 * 100.0 / 200.0).sqrt();
        let command = Command::Simulate {
            x: 200.0,
            y: 0.0,
            vx: 0.0,
            vy: v,
            radius: 100.0,
            gravity: 9.8,
        };

        let mut out = Vec::new();
        run(command, &config, &mut out).unwrap();
        let printed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["outcome"], "inconclusive");
    }
}
