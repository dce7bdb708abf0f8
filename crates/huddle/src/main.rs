//! huddle - interest-based discussion groups
//!
//! Usage:
//!   huddle regroup students.csv          Form groups and print a summary
//!   huddle regroup students.json --format json --output plan.json
//!   huddle schedule 23                   Show how a bucket of 23 is split
//!   huddle config-path                   Print the default config location

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use huddle_core::{
    read_students, regroup_with_options, schedule, write_plan_csv, write_plan_json, Plan,
    PlanStats, Schedule,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

mod config;

use config::{default_config_path, load_config, Config};

#[derive(Parser)]
#[command(name = "huddle")]
#[command(about = "Assign students to discussion groups by shared interest")]
#[command(version)]
struct Cli {
    /// Show debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Form groups from a student roster (.json or .csv)
    Regroup {
        /// Student roster
        input: PathBuf,

        /// Number of trials to run (default: 100)
        #[arg(long)]
        trials: Option<usize>,

        /// Base seed, for reproducing an earlier run
        #[arg(long)]
        seed: Option<u64>,

        /// Run trials on a single thread
        #[arg(long)]
        sequential: bool,

        /// Shuffle the roster before bucketing in each trial
        #[arg(long)]
        shuffle: bool,

        /// Output format (default: table)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Write output to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Config file (defaults to the platform config directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the group sizes the partition table produces for a bucket
    Schedule {
        /// Bucket size
        size: usize,

        /// Output schedule as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the default config file path
    ConfigPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

struct RegroupArgs {
    input: PathBuf,
    trials: Option<usize>,
    seed: Option<u64>,
    sequential: bool,
    shuffle: bool,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Regroup {
            input,
            trials,
            seed,
            sequential,
            shuffle,
            format,
            output,
            config,
        } => cmd_regroup(RegroupArgs {
            input,
            trials,
            seed,
            sequential,
            shuffle,
            format,
            output,
            config,
        }),
        Commands::Schedule { size, json } => cmd_schedule(size, json),
        Commands::ConfigPath => {
            println!("{}", default_config_path()?.display());
            Ok(())
        }
    }
}

/// Load the config file. An explicitly named file must load; the default
/// location falls back to defaults with a warning.
fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return load_config(path);
    }

    let path = default_config_path()?;
    match load_config(&path) {
        Ok(config) => Ok(config),
        Err(err) => {
            eprintln!(
                "{} Failed to load config from {}: {err:#}. Using defaults.",
                "Warning:".yellow().bold(),
                path.display()
            );
            Ok(Config::default())
        }
    }
}

fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> Result<OutputFormat> {
    if let Some(format) = flag {
        return Ok(format);
    }
    match config.output_format() {
        Some(name) => OutputFormat::from_str(name, true)
            .map_err(|_| anyhow::anyhow!("invalid output format '{name}' in config")),
        None => Ok(OutputFormat::Table),
    }
}

fn cmd_regroup(args: RegroupArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref())?;

    let mut options = config.trial_options();
    if let Some(trials) = args.trials {
        options.trials = trials;
    }
    if let Some(seed) = args.seed {
        options.seed = Some(seed);
    }
    if args.sequential {
        options.parallel = false;
    }
    if args.shuffle {
        options.shuffle_before_bucketing = true;
    }
    options.validate()?;
    let format = resolve_format(args.format, &config)?;

    let students = read_students(&args.input)?;
    tracing::info!(students = students.len(), trials = options.trials, "regrouping");
    let plan = regroup_with_options(&students, &options)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            colored::control::set_override(false);
            let mut writer = BufWriter::new(file);
            write_plan(&mut writer, &plan, format)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_plan(&mut writer, &plan, format)?;
        }
    }
    Ok(())
}

fn write_plan<W: Write>(writer: &mut W, plan: &Plan<'_>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => render_table(writer, plan),
        OutputFormat::Json => {
            write_plan_json(&mut *writer, plan)?;
            writeln!(writer)?;
            Ok(())
        }
        OutputFormat::Csv => write_plan_csv(writer, plan),
    }
}

/// Human-readable plan summary
fn render_table<W: Write>(w: &mut W, plan: &Plan<'_>) -> Result<()> {
    let stats = PlanStats::from_plan(plan);

    writeln!(
        w,
        "{} {}",
        "Plan".cyan().bold(),
        format!("(trial {}, seed {})", stats.trial, stats.seed).dimmed()
    )?;
    writeln!(w, "{}", "═".repeat(50).dimmed())?;
    writeln!(
        w,
        "  {} students, {} grouped, {} ungrouped ({:.1}% placed)",
        stats.total_students,
        stats.grouped.to_string().green(),
        if stats.ungrouped == 0 {
            stats.ungrouped.to_string().green()
        } else {
            stats.ungrouped.to_string().yellow()
        },
        stats.placement_rate() * 100.0
    )?;
    writeln!(
        w,
        "  {} groups across {} interests",
        stats.groups, stats.interests_covered
    )?;

    for (index, group) in plan.groups().iter().enumerate() {
        writeln!(w)?;
        writeln!(
            w,
            "{} {} {}",
            format!("Group {}", index + 1).white().bold(),
            group.interest().cyan(),
            format!("({})", group.len()).dimmed()
        )?;
        let ids: Vec<&str> = group.members().iter().map(|s| s.id.as_str()).collect();
        writeln!(w, "  {}", ids.join(", "))?;
    }

    if !plan.ungrouped().is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{} {}",
            "Ungrouped".yellow().bold(),
            format!("({})", plan.ungrouped_count()).dimmed()
        )?;
        for student in plan.ungrouped() {
            writeln!(
                w,
                "  {} {}",
                student.id,
                format!("[{} / {}]", student.primary, student.secondary).dimmed()
            )?;
        }
    }
    Ok(())
}

fn cmd_schedule(size: usize, json: bool) -> Result<()> {
    let plan = schedule(size);
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("{}", describe_schedule(&plan));
    }
    Ok(())
}

fn describe_schedule(plan: &Schedule) -> String {
    let splits = if plan.splits.is_empty() {
        "no groups".to_string()
    } else {
        plan.splits
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(" + ")
    };
    format!(
        "bucket of {}: {} (remainder {})",
        plan.bucket_size, splits, plan.remainder
    )
}
