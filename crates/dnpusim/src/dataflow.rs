use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SimError};

/// How operands are held in the crossbar while the kernel sweeps a tile.
///
/// Only `WeightStationary` is modelled. Any other name still parses so the
/// rejection surfaces from `run`, where callers expect it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Dataflow {
    #[default]
    WeightStationary,
    InputStationary,
    Unknown(String),
}

impl Dataflow {
    pub fn as_str(&self) -> &str {
        match self {
            Dataflow::WeightStationary => "weight_stationary",
            Dataflow::InputStationary => "input_stationary",
            Dataflow::Unknown(name) => name,
        }
    }

    pub fn ensure_supported(&self) -> Result<()> {
        match self {
            Dataflow::WeightStationary => Ok(()),
            other => Err(SimError::unsupported(format!(
                "dataflow `{}` is not implemented, only weight_stationary is",
                other
            ))),
        }
    }
}

impl From<String> for Dataflow {
    fn from(name: String) -> Self {
        match name.as_str() {
            "weight_stationary" => Dataflow::WeightStationary,
            "input_stationary" => Dataflow::InputStationary,
            _ => Dataflow::Unknown(name),
        }
    }
}

impl From<&str> for Dataflow {
    fn from(name: &str) -> Self {
        Dataflow::from(name.to_owned())
    }
}

impl From<Dataflow> for String {
    fn from(dataflow: Dataflow) -> Self {
        dataflow.as_str().to_owned()
    }
}

impl fmt::Display for Dataflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
