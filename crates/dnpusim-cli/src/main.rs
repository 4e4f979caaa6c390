use clap::Parser;
use dnpusim::counts::save_counts_to_file;
use dnpusim::tensor::InputPattern;
use dnpusim::{init_logger, Dataflow, KernelMode, LogLevel, SimulationConfig};
use std::{path::PathBuf, process::ExitCode};
use tracing::error;

#[derive(clap::ValueEnum, Clone, Copy)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum Kernel {
    AccessOnly,
    Convolve,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum Input {
    Zeros,
    Gaussian,
    Ramp,
}

/// Count DNPU crossbar accesses for a Sobel sweep and compare the energy
/// against a digital MAC array.
#[derive(Parser)]
struct Cli {
    /// TOML config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// input channels
    #[arg(long)]
    rows: Option<usize>,
    /// output channels
    #[arg(long)]
    columns: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    #[arg(long)]
    width: Option<usize>,
    /// e.g. weight_stationary
    #[arg(long)]
    dataflow: Option<String>,
    #[arg(long, value_enum)]
    kernel: Option<Kernel>,
    #[arg(long, value_enum)]
    input: Option<Input>,
    /// seed for gaussian input, from --input or the config file
    #[arg(long)]
    seed: Option<u64>,
    /// run columns on the rayon pool
    #[arg(long)]
    parallel: bool,
    /// write the counts as JSON for show_counts
    #[arg(long)]
    save_counts: Option<PathBuf>,
    /// print the report as JSON instead of text
    #[arg(long)]
    json: bool,
    #[arg(short, long, value_enum, default_value = "info")]
    log_level: Level,
}

impl Cli {
    fn into_config(self) -> dnpusim::Result<(SimulationConfig, Option<PathBuf>, bool)> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(dataflow) = self.dataflow {
            config.dataflow = Dataflow::from(dataflow);
        }
        if let Some(kernel) = self.kernel {
            config.kernel = match kernel {
                Kernel::AccessOnly => KernelMode::AccessOnly,
                Kernel::Convolve => KernelMode::Convolve,
            };
        }
        if let Some(input) = self.input {
            config.input = match input {
                Input::Zeros => InputPattern::Zeros,
                Input::Gaussian => InputPattern::Gaussian { seed: 0 },
                Input::Ramp => InputPattern::Ramp,
            };
        }
        if let (Some(seed), InputPattern::Gaussian { .. }) = (self.seed, config.input) {
            config.input = InputPattern::Gaussian { seed };
        }
        config.parallel |= self.parallel;
        Ok((config, self.save_counts, self.json))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.log_level.into());
    match simulate(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn simulate(cli: Cli) -> dnpusim::Result<()> {
    let (config, save_counts, json) = cli.into_config()?;
    let outcome = dnpusim::simulate(&config)?;
    if let Some(path) = save_counts {
        save_counts_to_file(&outcome.record, path)?;
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        println!("{}", outcome.report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "dnpusim",
            "--rows",
            "2",
            "--columns",
            "3",
            "--height",
            "5",
            "--input",
            "gaussian",
            "--seed",
            "9",
            "--parallel",
        ]);
        let (config, save, json) = cli.into_config().unwrap();
        assert_eq!(config.rows, 2);
        assert_eq!(config.columns, 3);
        assert_eq!(config.height, 5);
        assert_eq!(config.width, 32);
        assert_eq!(config.input, InputPattern::Gaussian { seed: 9 });
        assert!(config.parallel);
        assert!(save.is_none());
        assert!(!json);
    }

    #[test]
    fn seed_overrides_gaussian_from_config_file() {
        let path = std::env::temp_dir().join(format!("dnpusim_cli_{}.toml", std::process::id()));
        std::fs::write(&path, "[input]\npattern = \"gaussian\"\nseed = 3\n").unwrap();
        let path_arg = path.to_str().unwrap();

        let cli = Cli::parse_from(["dnpusim", "--config", path_arg]);
        let (config, _, _) = cli.into_config().unwrap();
        assert_eq!(config.input, InputPattern::Gaussian { seed: 3 });

        let cli = Cli::parse_from(["dnpusim", "--config", path_arg, "--seed", "9"]);
        let (config, _, _) = cli.into_config().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.input, InputPattern::Gaussian { seed: 9 });
    }

    #[test]
    fn seed_leaves_other_patterns_alone() {
        let cli = Cli::parse_from(["dnpusim", "--input", "ramp", "--seed", "4"]);
        let (config, _, _) = cli.into_config().unwrap();
        assert_eq!(config.input, InputPattern::Ramp);
    }

    #[test]
    fn unknown_dataflow_fails_at_run() {
        let cli = Cli::parse_from([
            "dnpusim",
            "--rows",
            "1",
            "--columns",
            "1",
            "--height",
            "3",
            "--width",
            "3",
            "--dataflow",
            "input_stationary",
        ]);
        assert!(matches!(
            simulate(cli),
            Err(dnpusim::SimError::UnsupportedConfiguration { .. })
        ));
    }
}
