use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-channel weights of the vertical Sobel-style kernel held by each DNPU
pub const SOBEL_WEIGHTS: [f64; 3] = [-1.0, 0.0, 1.0];

/// DNPUs in one kernel, one per tile row
pub const DNPUS_PER_UNIT: usize = 3;

/// DACs driving the input electrodes of one kernel
pub const INPUT_DACS: u64 = 9;

/// DACs driving the control (weight) electrodes of one kernel
pub const WEIGHT_DACS: u64 = 12;

/// Side length of the square tile a kernel consumes
pub const TILE: usize = 3;

/// Whether compute units only count accesses or also evaluate the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelMode {
    #[default]
    AccessOnly,
    Convolve,
}

impl KernelMode {
    pub fn computes_output(self) -> bool {
        matches!(self, KernelMode::Convolve)
    }
}

impl fmt::Display for KernelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelMode::AccessOnly => f.write_str("access_only"),
            KernelMode::Convolve => f.write_str("convolve"),
        }
    }
}
