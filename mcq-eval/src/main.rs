//! MCQ Evaluation CLI

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mcq_eval::{
    config::Config,
    reporting::{print_console_report, JsonSummary},
    runner::{Executor, ExecutorConfig},
    tasks::{load_records_from_file, Variant},
};

/// Benchmark variant selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum VariantArg {
    /// AI2-THOR counting (frames 0-4, choices A-D)
    Counting,
    /// AI2-THOR perspective (marked image, choices A-B)
    Perspective,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Counting => Variant::Counting,
            VariantArg::Perspective => Variant::Perspective,
        }
    }
}

#[derive(Parser)]
#[command(name = "mcq-eval")]
#[command(about = "Score multiple-choice visual question benchmark responses")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score model results and report accuracy breakdowns
    Evaluate {
        /// Records file (.json array or .jsonl, one {doc, results} per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Benchmark variant (default: from configuration)
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,

        /// Seed for the no-match fallback choice
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory for the JSON summary
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write each document's prompt and selected images to text files
    DumpPrompts {
        /// Records file (.json array or .jsonl)
        #[arg(short, long)]
        input: PathBuf,

        /// Benchmark variant (default: from configuration)
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,

        /// Output directory for prompt files
        #[arg(short, long, default_value = "results/prompts")]
        output: PathBuf,
    },

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config/eval.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("mcq_eval=debug,info")
    } else {
        EnvFilter::new("mcq_eval=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(),
    };

    match cli.command {
        Commands::Evaluate {
            input,
            variant,
            seed,
            output,
        } => {
            evaluate(&config, input, variant, seed, output)?;
        }

        Commands::DumpPrompts {
            input,
            variant,
            output,
        } => {
            dump_prompts(&config, input, variant, output)?;
        }

        Commands::InitConfig { output } => {
            init_config(output)?;
        }
    }

    Ok(())
}

fn evaluate(
    config: &Config,
    input: PathBuf,
    variant: Option<VariantArg>,
    seed: Option<u64>,
    output_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let run_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();
    let variant = variant.map(Variant::from).unwrap_or(config.benchmark.variant);

    let records = load_records_from_file(&input)?;

    println!("=== MCQ Evaluation ===");
    println!("Run ID:  {}", run_id);
    println!("Variant: {}", variant);
    println!("Records: {}", records.len());

    let executor_config = ExecutorConfig {
        seed: seed.or(config.benchmark.seed),
        prompt: config.benchmark.prompt_options(),
    };
    let mut executor = Executor::new(variant, executor_config);
    let outcome = executor.run(&records);

    print_console_report(variant.title(), &outcome.report);
    println!("\nAccuracy: {:.5}", outcome.accuracy);

    if config.output.generate_json {
        let dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.output.output_dir));
        std::fs::create_dir_all(&dir)?;

        let path = dir.join(format!("summary-{}.json", run_id));
        JsonSummary::from_report(&run_id, variant, &outcome.report).write_to_file(&path)?;
        println!("Summary written to: {}", path.display());
    }

    Ok(())
}

fn dump_prompts(
    config: &Config,
    input: PathBuf,
    variant: Option<VariantArg>,
    output_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let variant = variant.map(Variant::from).unwrap_or(config.benchmark.variant);
    let records = load_records_from_file(&input)?;

    std::fs::create_dir_all(&output_dir)?;

    println!("=== Dumping Prompts ===");
    println!("Variant: {}", variant);
    println!("Records: {}", records.len());
    println!("Output:  {}", output_dir.display());
    println!();

    let executor = Executor::new(
        variant,
        ExecutorConfig {
            seed: config.benchmark.seed,
            prompt: config.benchmark.prompt_options(),
        },
    );

    let prompts = executor.prepare_prompts(&records);
    for prompt in &prompts {
        let filename = format!("{}-{:04}.txt", variant.as_str(), prompt.index);
        let images = if prompt.images.is_empty() {
            "none".to_string()
        } else {
            prompt
                .images
                .iter()
                .map(|i| i.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let content = format!(
            "=== Prompt: {} #{} ===\n\
             Images: {}\n\
             {}\n\
             === PROMPT ===\n\n\
             {}\n",
            variant,
            prompt.index,
            images,
            "=".repeat(50),
            prompt.text,
        );

        std::fs::write(output_dir.join(&filename), &content)?;
        println!("  #{} -> {}", prompt.index, filename);
    }

    println!("\nDone. {} files written to {}", prompts.len(), output_dir.display());
    Ok(())
}

fn init_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    // Ensure parent directory exists
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    config.save_toml(&output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}
