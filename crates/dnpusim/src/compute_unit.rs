//! One DNPU kernel: three DNPUs with current summing and linear scaling,
//! fed by 21 DACs split into input and weight groups.

use ndarray::ArrayView2;

use crate::counts::UnitAccess;
use crate::dataflow::Dataflow;
use crate::error::{Result, SimError};
use crate::kernel::{KernelMode, DNPUS_PER_UNIT, INPUT_DACS, SOBEL_WEIGHTS, TILE};

/// Result of one kernel invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitOutput {
    /// convolution value, only in `KernelMode::Convolve`
    pub value: Option<f64>,
    /// accesses charged by this call alone
    pub access: UnitAccess,
}

#[derive(Debug, Clone)]
pub struct ComputeUnit {
    dataflow: Dataflow,
    dac_input_share: bool,
    mode: KernelMode,
    /// cumulative over the unit's lifetime
    counts: UnitAccess,
}

impl ComputeUnit {
    pub fn new(dataflow: Dataflow, dac_input_share: bool, mode: KernelMode) -> Self {
        ComputeUnit {
            dataflow,
            dac_input_share,
            mode,
            counts: UnitAccess::default(),
        }
    }

    pub fn counts(&self) -> UnitAccess {
        self.counts
    }

    pub fn validate(&self) -> Result<()> {
        self.dataflow.ensure_supported()
    }

    fn weight_stationary_access(&self) -> UnitAccess {
        // weights are pre-loaded, so the WEIGHT_DACS stay idle; inputs need
        // fresh conversion unless the DACs are shared with the first column
        let dac = if self.dac_input_share { 0 } else { INPUT_DACS };
        UnitAccess {
            dac,
            dnpu: DNPUS_PER_UNIT as u64,
        }
    }

    /// Evaluate the kernel on a 3x3 tile and charge its accesses.
    pub fn run(&mut self, tile: ArrayView2<'_, f64>) -> Result<UnitOutput> {
        self.validate()?;
        if tile.dim() != (TILE, TILE) {
            let (h, w) = tile.dim();
            return Err(SimError::shape_mismatch(&[TILE, TILE], &[h, w]));
        }
        Ok(self.step(tile))
    }

    /// `run` without the checks; the owning column validates once up front.
    pub(crate) fn step(&mut self, tile: ArrayView2<'_, f64>) -> UnitOutput {
        let access = self.weight_stationary_access();
        let value = self.mode.computes_output().then(|| convolve(tile));
        self.counts += access;
        UnitOutput { value, access }
    }
}

/// Sum over DNPUs of the dot product between its tile row and the kernel weights.
pub fn convolve(tile: ArrayView2<'_, f64>) -> f64 {
    tile.rows()
        .into_iter()
        .map(|row| row.iter().zip(SOBEL_WEIGHTS.iter()).map(|(x, w)| x * w).sum::<f64>())
        .sum()
}
