use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;
pub mod column;
pub mod compute_unit;
pub mod config;
pub mod counts;
pub mod crossbar;
pub mod dataflow;
pub mod energy;
pub mod error;
pub mod kernel;
pub mod tensor;

pub use column::ColumnArray;
pub use compute_unit::ComputeUnit;
pub use config::SimulationConfig;
pub use counts::{AccessCounts, CountsRecord};
pub use crossbar::{CrossbarArray, CrossbarRun};
pub use dataflow::Dataflow;
pub use energy::{EnergyReport, EnergyTable};
pub use error::{Result, SimError};
pub use kernel::KernelMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// A finished simulation: the raw crossbar run, its energy report and the
/// record that `save_counts_to_file` persists.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub run: CrossbarRun,
    pub report: EnergyReport,
    pub record: CountsRecord,
}

/// Build the input and the crossbar described by `config`, run it once and
/// price the accesses.
pub fn simulate(config: &SimulationConfig) -> Result<SimulationOutcome> {
    config.validate()?;
    let shape = config.input_shape();
    let input = tensor::build_input(shape, config.input);
    let mut crossbar =
        CrossbarArray::new(config.rows, config.columns, config.dataflow.clone(), config.kernel);
    info!(
        rows = config.rows,
        columns = config.columns,
        height = config.height,
        width = config.width,
        dataflow = %config.dataflow,
        kernel = %config.kernel,
        "starting simulation"
    );

    let run = if config.parallel {
        crossbar.run_parallel(input.view())?
    } else {
        crossbar.run(input.view())?
    };
    let report = EnergyReport::from_counts(&run.totals, &config.energy);
    let record = CountsRecord {
        dataflow: config.dataflow.clone(),
        kernel: config.kernel,
        shape: shape.to_shape(),
        totals: run.totals,
        columns: run.columns.clone(),
        energy: config.energy,
    };
    Ok(SimulationOutcome {
        run,
        report,
        record,
    })
}

/// 初始化日志记录器
///
/// `RUST_LOG` overrides `level` when set.
pub fn init_logger(level: LogLevel) {
    let level = LevelFilter::from(level);

    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .try_init()
        .unwrap_or_else(|err| {
            eprintln!("Failed to init logger: {}", err);
        });
    info!("Logger initialized");
}
