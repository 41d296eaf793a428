//! Rocket selection by scene index or name.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

/// Identifies a rocket in the current scene.
///
/// Query endpoints and most control commands receive the reference as a
/// string; commands that take "id or name" directly receive the raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RocketRef {
    /// Index in the scene's rocket list.
    Id(u32),
    /// Rocket name as shown in game.
    Name(String),
}

impl RocketRef {
    /// String form used for `rocketIdOrName` query parameters and command arguments.
    pub fn as_param(&self) -> String {
        self.to_string()
    }

    /// Raw JSON form: a number for ids, a string for names.
    pub fn to_json(&self) -> Value {
        match self {
            RocketRef::Id(id) => Value::from(*id),
            RocketRef::Name(name) => Value::from(name.as_str()),
        }
    }
}

impl fmt::Display for RocketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RocketRef::Id(id) => write!(f, "{id}"),
            RocketRef::Name(name) => f.write_str(name),
        }
    }
}

impl From<u32> for RocketRef {
    fn from(id: u32) -> Self {
        RocketRef::Id(id)
    }
}

impl From<&str> for RocketRef {
    fn from(name: &str) -> Self {
        RocketRef::Name(name.to_string())
    }
}

impl From<String> for RocketRef {
    fn from(name: String) -> Self {
        RocketRef::Name(name)
    }
}

impl FromStr for RocketRef {
    type Err = Infallible;

    /// All-digit input is an index, anything else a name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<u32>()
            .map(RocketRef::Id)
            .unwrap_or_else(|_| RocketRef::Name(s.to_string())))
    }
}

/// Optional rocket as a command argument: its string form, or `null`.
pub(crate) fn rocket_arg(rocket: Option<&RocketRef>) -> Value {
    rocket.map_or(Value::Null, |r| Value::from(r.as_param()))
}
