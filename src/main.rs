use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use erbound::{pairwise_class_balance, Labeling, PointReport, Scenario};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Lower bounds on pairwise precision, recall and F1 for entity resolution
#[derive(Parser, Debug)]
#[command(name = "erbound")]
#[command(about = "Semi-supervised entity-resolution metric bounds", long_about = None)]
struct Args {
    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate every operating point of a scenario file
    Evaluate {
        /// Path to the scenario JSON
        #[arg(short, long)]
        scenario: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Evaluate operating points in parallel
        #[arg(long)]
        parallel: bool,

        /// Maximum pairs per match-function batch
        #[arg(long)]
        max_batch_pairs: Option<usize>,
    },
    /// Print the pairwise class balance of a labeling file
    Balance {
        /// Path to a JSON list of [record_id, cluster_id] pairs
        #[arg(short, long)]
        labels: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting erbound v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Evaluate {
            scenario,
            format,
            parallel,
            max_batch_pairs,
        } => evaluate(scenario, format, parallel, max_batch_pairs),
        Command::Balance { labels } => balance(labels),
    }
}

fn evaluate(
    path: PathBuf,
    format: Format,
    parallel: bool,
    max_batch_pairs: Option<usize>,
) -> anyhow::Result<()> {
    let mut scenario = Scenario::load(&path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;
    if parallel {
        scenario.config.parallel = true;
    }
    if max_batch_pairs.is_some() {
        scenario.config.max_batch_pairs = max_batch_pairs;
    }

    let reports = scenario.evaluate()?;
    let failed = reports.iter().filter(|r| r.is_failed()).count();
    if failed > 0 {
        warn!(failed, total = reports.len(), "some operating points failed");
    }

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        Format::Text => {
            for report in &reports {
                print_report(report);
            }
        }
    }
    Ok(())
}

fn print_report(report: &PointReport) {
    match report.corruption {
        Some(corruption) => println!(
            "== threshold {} (corruption {}) ==",
            report.threshold, corruption
        ),
        None => println!("== threshold {} ==", report.threshold),
    }
    if let Some(metrics) = &report.metrics {
        println!("{}", metrics);
    }
    if let Some(truth) = &report.truth {
        println!(
            "True pairwise precision / recall / F1: {:.4} / {:.4} / {:.4}",
            truth.precision(),
            truth.recall(),
            truth.f1()
        );
    }
    if let Some(error) = &report.error {
        println!("Skipped: {}", error);
    }
    if let Some(error) = &report.truth_error {
        println!("Ground truth comparison skipped: {}", error);
    }
    println!();
}

fn balance(path: PathBuf) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let labeling: Labeling = serde_json::from_str(&text)?;
    let balance = pairwise_class_balance(&labeling)?;
    println!("{}", balance);
    Ok(())
}
