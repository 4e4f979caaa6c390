//! The full crossbar: one column per output channel, one row of compute
//! units per input channel.

use ndarray::{Array2, ArrayView4, Axis};
use rayon::prelude::*;
use tracing::{info, info_span};

use crate::column::{ColumnArray, ColumnRun};
use crate::counts::AccessCounts;
use crate::dataflow::Dataflow;
use crate::error::{Result, SimError};
use crate::kernel::KernelMode;

/// Aggregate of one `CrossbarArray::run`
#[derive(Debug, Clone, PartialEq)]
pub struct CrossbarRun {
    pub totals: AccessCounts,
    /// per output channel
    pub columns: Vec<AccessCounts>,
    /// per output channel, only in `KernelMode::Convolve`
    pub outputs: Option<Vec<Array2<f64>>>,
}

#[derive(Debug, Clone)]
pub struct CrossbarArray {
    num_rows: usize,
    num_columns: usize,
    dataflow: Dataflow,
    mode: KernelMode,
    columns: Vec<ColumnArray>,
    totals: AccessCounts,
}

impl CrossbarArray {
    /// Build a `num_rows` x `num_columns` crossbar.
    ///
    /// Column 0 owns the input DACs; every other column shares them and is
    /// never charged for input conversion.
    pub fn new(num_rows: usize, num_columns: usize, dataflow: Dataflow, mode: KernelMode) -> Self {
        let columns = (0..num_columns)
            .map(|i| ColumnArray::new(num_rows, dataflow.clone(), i != 0, mode))
            .collect();
        CrossbarArray {
            num_rows,
            num_columns,
            dataflow,
            mode,
            columns,
            totals: AccessCounts::default(),
        }
    }

    pub fn columns(&self) -> &[ColumnArray] {
        &self.columns
    }

    /// Totals over every run so far
    pub fn totals(&self) -> AccessCounts {
        self.totals
    }

    /// Totals of each column over every run so far
    pub fn column_counts(&self) -> Vec<AccessCounts> {
        self.columns.iter().map(ColumnArray::counts).collect()
    }

    pub fn validate(&self) -> Result<()> {
        self.dataflow.ensure_supported()?;
        self.columns.iter().try_for_each(ColumnArray::validate)
    }

    fn check_shape(&self, tensor: &ArrayView4<'_, f64>) -> Result<()> {
        let (out_ch, in_ch, height, width) = tensor.dim();
        if out_ch != self.num_columns || in_ch != self.num_rows {
            return Err(SimError::shape_mismatch(
                &[self.num_columns, self.num_rows, height, width],
                &[out_ch, in_ch, height, width],
            ));
        }
        Ok(())
    }

    /// Drive every column with its slice of `tensor`
    /// (output channels, input channels, height, width) and sum the counts.
    pub fn run(&mut self, tensor: ArrayView4<'_, f64>) -> Result<CrossbarRun> {
        let _span = info_span!("crossbar", rows = self.num_rows, columns = self.num_columns).entered();
        self.validate()?;
        self.check_shape(&tensor)?;

        let runs = self
            .columns
            .iter_mut()
            .enumerate()
            .map(|(c_out, column)| column.run(tensor.index_axis(Axis(0), c_out)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.finish(runs))
    }

    /// Same totals as `run`, with columns spread over the rayon pool.
    ///
    /// Columns read disjoint slices and keep their own counters, so the only
    /// shared step is the final reduction.
    pub fn run_parallel(&mut self, tensor: ArrayView4<'_, f64>) -> Result<CrossbarRun> {
        let _span = info_span!("crossbar", rows = self.num_rows, columns = self.num_columns).entered();
        self.validate()?;
        self.check_shape(&tensor)?;

        let runs = self
            .columns
            .par_iter_mut()
            .enumerate()
            .map(|(c_out, column)| column.run(tensor.index_axis(Axis(0), c_out)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.finish(runs))
    }

    fn finish(&mut self, runs: Vec<ColumnRun>) -> CrossbarRun {
        let columns: Vec<AccessCounts> = runs.iter().map(|run| run.counts).collect();
        let totals: AccessCounts = columns.iter().copied().sum();
        let outputs = self
            .mode
            .computes_output()
            .then(|| runs.into_iter().filter_map(|run| run.output).collect());
        self.totals += totals;
        info!(
            adc = totals.adc,
            dac = totals.dac,
            dnpu = totals.dnpu,
            digital_mac = totals.digital_mac,
            "crossbar finished"
        );
        CrossbarRun {
            totals,
            columns,
            outputs,
        }
    }
}
