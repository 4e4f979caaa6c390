//! A crossbar column: one compute unit per input channel, a shared ADC at the
//! bottom, and the DACs that feed the units.
//!
//! The column sweeps the kernel over every interior pixel of a
//! (channels, height, width) tile. Borders are not padded, so a tile yields
//! (height - 2) * (width - 2) output pixels.

use ndarray::{s, Array2, ArrayView3};
use tracing::debug;

use crate::compute_unit::ComputeUnit;
use crate::counts::AccessCounts;
use crate::dataflow::Dataflow;
use crate::error::{Result, SimError};
use crate::kernel::{KernelMode, TILE};

/// What one `ColumnArray::run` produced
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRun {
    /// accesses charged during this run
    pub counts: AccessCounts,
    /// (height, width) image with a zero border, only in `KernelMode::Convolve`
    pub output: Option<Array2<f64>>,
}

#[derive(Debug, Clone)]
pub struct ColumnArray {
    dataflow: Dataflow,
    dac_input_share: bool,
    mode: KernelMode,
    units: Vec<ComputeUnit>,
    counts: AccessCounts,
}

impl ColumnArray {
    pub fn new(size: usize, dataflow: Dataflow, dac_input_share: bool, mode: KernelMode) -> Self {
        let units = (0..size)
            .map(|_| ComputeUnit::new(dataflow.clone(), dac_input_share, mode))
            .collect();
        ColumnArray {
            dataflow,
            dac_input_share,
            mode,
            units,
            counts: AccessCounts::default(),
        }
    }

    pub fn size(&self) -> usize {
        self.units.len()
    }

    pub fn dac_input_share(&self) -> bool {
        self.dac_input_share
    }

    pub fn units(&self) -> &[ComputeUnit] {
        &self.units
    }

    /// Totals over every run of this column
    pub fn counts(&self) -> AccessCounts {
        self.counts
    }

    pub fn validate(&self) -> Result<()> {
        self.dataflow.ensure_supported()?;
        if self.dac_input_share && self.mode.computes_output() {
            return Err(SimError::unsupported(
                "DAC input sharing is not implemented for the convolving column",
            ));
        }
        Ok(())
    }

    fn check_shape(&self, tile: &ArrayView3<'_, f64>) -> Result<()> {
        let (channels, height, width) = tile.dim();
        if channels != self.units.len() {
            return Err(SimError::shape_mismatch(
                &[self.units.len(), height, width],
                &[channels, height, width],
            ));
        }
        Ok(())
    }

    /// Sweep the kernel over `tile` (channels, height, width).
    ///
    /// Fails before touching any counter if the dataflow is unsupported or
    /// the channel count differs from the number of compute units.
    pub fn run(&mut self, tile: ArrayView3<'_, f64>) -> Result<ColumnRun> {
        self.validate()?;
        self.check_shape(&tile)?;

        let (_, height, width) = tile.dim();
        let mut run = AccessCounts::default();
        let mut output = self
            .mode
            .computes_output()
            .then(|| Array2::<f64>::zeros((height, width)));

        for h in 1..height.saturating_sub(1) {
            for w in 1..width.saturating_sub(1) {
                let mut pixel = 0.0;
                for (c, unit) in self.units.iter_mut().enumerate() {
                    let window = tile.slice(s![c, h - 1..h - 1 + TILE, w - 1..w - 1 + TILE]);
                    let out = unit.step(window);
                    run.dac += out.access.dac;
                    run.dnpu += out.access.dnpu;
                    // the digital counterpart spends one MAC per kernel tap
                    run.digital_mac += 1;
                    if let Some(value) = out.value {
                        pixel += value;
                    }
                }
                // one conversion per output pixel, whatever the channel count
                run.adc += 1;
                if let Some(output) = output.as_mut() {
                    output[[h, w]] = pixel;
                }
            }
        }

        debug!(
            channels = self.units.len(),
            height,
            width,
            dac_input_share = self.dac_input_share,
            ?run,
            "column finished"
        );
        self.counts += run;
        Ok(ColumnRun {
            counts: run,
            output,
        })
    }
}
