use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::dataflow::Dataflow;
use crate::energy::EnergyTable;
use crate::error::{Result, SimError};
use crate::kernel::KernelMode;
use crate::tensor::{InputPattern, InputShape};

/// Everything a simulation run needs. Missing keys take the reference
/// driver's values: a 64x64 crossbar over 32x32 images of zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /* Crossbar config */
    /// input channels, one compute unit each
    pub rows: usize,
    /// output channels, one column each
    pub columns: usize,
    pub dataflow: Dataflow,
    pub kernel: KernelMode,

    /* Input config */
    pub height: usize,
    pub width: usize,
    pub input: InputPattern,

    /* Run config */
    pub parallel: bool,
    pub energy: EnergyTable,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            rows: 64,
            columns: 64,
            dataflow: Dataflow::WeightStationary,
            kernel: KernelMode::AccessOnly,
            height: 32,
            width: 32,
            input: InputPattern::Zeros,
            parallel: false,
            energy: EnergyTable::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
        let config = Self::from_toml_str(&config_str)?;
        info!("config loaded from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Reject topologies that cannot exist. The dataflow is left to `run`.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.columns == 0 {
            return Err(SimError::invalid_config(format!(
                "crossbar needs at least one row and one column, got {}x{}",
                self.rows, self.columns
            )));
        }
        let energies = [
            self.energy.adc,
            self.energy.dac,
            self.energy.dnpu,
            self.energy.digital_mac,
        ];
        if energies.iter().any(|e| !e.is_finite() || *e < 0.0) {
            return Err(SimError::invalid_config(
                "energy per access must be finite and non-negative",
            ));
        }
        Ok(())
    }

    pub fn input_shape(&self) -> InputShape {
        InputShape::new(self.columns, self.rows, self.height, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_reference_driver() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.input_shape().dims(), (64, 64, 32, 32));
    }

    #[test]
    fn parses_full_config() {
        let config = SimulationConfig::from_toml_str(
            r#"
rows = 2
columns = 3
height = 8
width = 9
dataflow = "input_stationary"
kernel = "convolve"
parallel = true

[input]
pattern = "gaussian"
seed = 42

[energy]
adc = 3.4e-14
dac = 1.8e-14
"#,
        )
        .unwrap();
        assert_eq!(config.rows, 2);
        assert_eq!(config.columns, 3);
        assert_eq!(config.dataflow, Dataflow::InputStationary);
        assert_eq!(config.kernel, KernelMode::Convolve);
        assert_eq!(config.input, InputPattern::Gaussian { seed: 42 });
        assert!(config.parallel);
        assert_eq!(config.energy.adc, 3.4e-14);
        assert_eq!(config.energy.dnpu, EnergyTable::default().dnpu);
        assert_eq!(config.input_shape().dims(), (3, 2, 8, 9));
    }

    #[test]
    fn unknown_dataflow_parses_but_stays_unsupported() {
        let config = SimulationConfig::from_toml_str("dataflow = \"row_stationary\"").unwrap();
        assert!(config.validate().is_ok());
        assert!(config.dataflow.ensure_supported().is_err());
    }

    #[test]
    fn rejects_empty_crossbar() {
        let config = SimulationConfig {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_negative_energy() {
        let mut config = SimulationConfig::default();
        config.energy.dac = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_toml_is_parse_error() {
        assert!(matches!(
            SimulationConfig::from_toml_str("rows = \"many\""),
            Err(SimError::ConfigParse { .. })
        ));
    }
}
