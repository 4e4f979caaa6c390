use clap::Parser;
use dnpusim::counts::{load_counts_from_file, CountsRecord};
use dnpusim::EnergyReport;
use std::{path::PathBuf, process::ExitCode};

#[derive(clap::ValueEnum, Clone)]
enum App {
    Summary,
    Columns,
    Energy,
}

#[derive(Parser)]
struct Cli {
    file_path: PathBuf,
    #[arg(short, long, default_value = "summary")]
    app: App,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let counts = match load_counts_from_file(&cli.file_path) {
        Ok(counts) => counts,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    match cli.app {
        App::Summary => summary(&counts),
        App::Columns => columns(&counts),
        App::Energy => energy(&counts),
    }
    ExitCode::SUCCESS
}

fn summary(counts: &CountsRecord) {
    println!(
        "dataflow: {} kernel: {} shape: {:?}",
        counts.dataflow, counts.kernel, counts.shape
    );
    let t = &counts.totals;
    println!("{:12}: {:>14}", "adc", t.adc);
    println!("{:12}: {:>14}", "dac", t.dac);
    println!("{:12}: {:>14}", "dnpu", t.dnpu);
    println!("{:12}: {:>14}", "digital_mac", t.digital_mac);
}

fn columns(counts: &CountsRecord) {
    println!(
        "{:>6} {:>12} {:>12} {:>12} {:>12}",
        "column", "adc", "dac", "dnpu", "digital_mac"
    );
    for (i, c) in counts.columns.iter().enumerate() {
        println!(
            "{:>6} {:>12} {:>12} {:>12} {:>12}",
            i, c.adc, c.dac, c.dnpu, c.digital_mac
        );
    }
}

fn energy(counts: &CountsRecord) {
    let report = EnergyReport::from_counts(&counts.totals, &counts.energy);
    println!("{report}");
}
