use derive_more::derive::{Add, AddAssign, Sum};
use serde::{Deserialize, Serialize};
use std::{fs::File, path::Path};
use tracing::info;

use crate::dataflow::Dataflow;
use crate::energy::EnergyTable;
use crate::error::{Result, Shape, SimError};
use crate::kernel::KernelMode;

/// Accesses charged to each hardware resource
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Add, AddAssign, Sum,
)]
pub struct AccessCounts {
    /// one sample per output pixel
    pub adc: u64,
    pub dac: u64,
    pub dnpu: u64,
    /// digital multiply-accumulate equivalents, one per kernel tap
    pub digital_mac: u64,
}

impl AccessCounts {
    pub fn is_zero(&self) -> bool {
        *self == AccessCounts::default()
    }
}

/// What a single compute unit invocation costs
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Add, AddAssign)]
pub struct UnitAccess {
    pub dac: u64,
    pub dnpu: u64,
}

/// A finished run as written to disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountsRecord {
    pub dataflow: Dataflow,
    pub kernel: KernelMode,
    /// (output channels, input channels, height, width)
    pub shape: Shape,
    pub totals: AccessCounts,
    /// totals of each column, indexed by output channel
    pub columns: Vec<AccessCounts>,
    /// prices the run was reported with
    pub energy: EnergyTable,
}

/// 保存累计的数据到文件
pub fn save_counts_to_file(record: &CountsRecord, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| SimError::io(path, e))?;
    serde_json::to_writer_pretty(file, record)?;
    info!("counts saved to {}", path.display());
    Ok(())
}

pub fn load_counts_from_file(path: impl AsRef<Path>) -> Result<CountsRecord> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SimError::io(path, e))?;
    Ok(serde_json::from_reader(file)?)
}
