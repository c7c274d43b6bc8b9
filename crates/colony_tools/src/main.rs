//! Red Colony - Development Tools

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colony_tools::error::Result;
use colony_tools::loader::DataSet;
use colony_tools::report::{self, ReportFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "colony-tools")]
#[command(about = "Development tools for the Red Colony economy")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate data files
    Validate {
        /// Path to data directory
        #[arg(default_value = "assets/data")]
        path: PathBuf,
    },
    /// Run the scenario headless and print goods values
    Value {
        /// Path to data directory
        #[arg(default_value = "assets/data")]
        path: PathBuf,
        /// Sols to simulate
        #[arg(short, long, default_value_t = 10)]
        sols: u32,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,
        /// Only show goods whose name contains this text
        #[arg(short, long)]
        good: Option<String>,
    },
    /// Print the static price of every good
    Costs {
        /// Path to data directory
        #[arg(default_value = "assets/data")]
        path: PathBuf,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { path } => validate(&path),
        Commands::Value {
            path,
            sols,
            format,
            good,
        } => value(&path, sols, format, good.as_deref()),
        Commands::Costs { path } => costs(&path),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn validate(path: &Path) -> Result<()> {
    tracing::info!("Validating data files in: {}", path.display());
    let summary = colony_tools::validate::validate_data_directory(path)?;
    tracing::info!(
        goods = summary.goods,
        processes = summary.processes,
        settlements = summary.settlements,
        "Validation passed"
    );
    Ok(())
}

fn value(path: &Path, sols: u32, format: ReportFormat, good: Option<&str>) -> Result<()> {
    let data = DataSet::load(path)?;
    let mut colony = data.colony()?;
    tracing::info!(sols, settlements = colony.settlements().len(), "Simulating");
    colony.run(sols);
    println!("{}", report::render(&colony.report(), format, good)?);
    Ok(())
}

fn costs(path: &Path) -> Result<()> {
    let data = DataSet::load(path)?;
    print!("{}", report::cost_table(&data.context()?));
    Ok(())
}
