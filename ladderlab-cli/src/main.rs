//! LadderLab CLI — session, analysis, replicate, and generator commands.
//!
//! Commands:
//! - `run`: simulate patterns over a synthetic stream or recorded history
//! - `analyze`: streak, alternation, and pattern statistics for a history file
//! - `compare`: adaptive vs fixed across many seeded replicate streams
//! - `generate`: write a seeded synthetic stream as a history file

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use ladderlab_core::analysis::analyze_history;
use ladderlab_core::domain::Pattern;
use ladderlab_core::engine::StrategyMode;
use ladderlab_runner::export::{export_replicates_json, save_artifacts, write_sequence_txt};
use ladderlab_runner::runner::resolve_patterns;
use ladderlab_runner::{
    load_history, load_patterns, run_replicates, run_session, synthetic_sequence, Preset,
    ReplicateReport, SessionConfig, SessionReport,
};

#[derive(Parser)]
#[command(
    name = "ladderlab",
    about = "LadderLab CLI — pattern-triggered ladder staking simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by `run` and `compare`.
#[derive(clap::Args)]
struct SessionArgs {
    /// Path to a TOML session config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Named preset: optimal, max_advantage, quick. Defaults to optimal.
    #[arg(long)]
    preset: Option<String>,

    /// Synthetic stream length.
    #[arg(long)]
    rounds: Option<usize>,

    /// Maximum operations per activation (1-10).
    #[arg(long)]
    operations: Option<usize>,

    /// Pattern JSON file.
    #[arg(long)]
    patterns: Option<PathBuf>,

    /// Inline pattern; repeatable.
    #[arg(long = "pattern")]
    inline: Vec<String>,

    /// Master seed. A random seed is drawn and logged when omitted.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate every pattern in both modes and run the bankroll loop.
    Run {
        #[command(flatten)]
        session: SessionArgs,

        /// Replay a recorded history (txt, csv, or json) instead of generating.
        #[arg(long)]
        history: Option<PathBuf>,

        /// Bankroll mode: adaptive or fixed.
        #[arg(long)]
        mode: Option<String>,

        /// Starting bankroll.
        #[arg(long)]
        bankroll: Option<f64>,

        /// Save manifest, CSVs, and Markdown report under this directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Analyze a recorded history file.
    Analyze {
        /// History file (txt, csv, or json).
        #[arg(long)]
        history: PathBuf,

        /// Pattern JSON file whose occurrences to count.
        #[arg(long)]
        patterns: Option<PathBuf>,
    },
    /// Compare adaptive and fixed over independent synthetic streams.
    Compare {
        #[command(flatten)]
        session: SessionArgs,

        /// Number of replicate streams.
        #[arg(long, default_value_t = 20)]
        replicates: usize,

        /// Write the replicate report as JSON to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a seeded synthetic stream as a one-result-per-line history file.
    Generate {
        #[arg(long)]
        rounds: usize,

        #[arg(long)]
        seed: u64,

        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            session,
            history,
            mode,
            bankroll,
            output_dir,
        } => run_cmd(session, history, mode, bankroll, output_dir),
        Commands::Analyze { history, patterns } => analyze_cmd(history, patterns),
        Commands::Compare {
            session,
            replicates,
            out,
        } => compare_cmd(session, replicates, out),
        Commands::Generate { rounds, seed, out } => generate_cmd(rounds, seed, out),
    }
}

fn build_config(args: SessionArgs) -> Result<SessionConfig> {
    if args.config.is_some() && args.preset.is_some() {
        bail!("--config and --preset are mutually exclusive");
    }

    let mut config = match (&args.config, &args.preset) {
        (Some(path), _) => SessionConfig::from_file(path)?,
        (None, Some(name)) => name.parse::<Preset>()?.to_config(),
        (None, None) => Preset::Optimal.to_config(),
    };

    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(operations) = args.operations {
        config.max_operations = operations;
    }
    if let Some(path) = args.patterns {
        config.patterns_file = Some(path);
    }
    if !args.inline.is_empty() {
        config.patterns = args.inline;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn run_cmd(
    session: SessionArgs,
    history: Option<PathBuf>,
    mode: Option<String>,
    bankroll: Option<f64>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = build_config(session)?;
    if history.is_some() {
        config.history_file = history;
    }
    if let Some(mode) = mode {
        config.bankroll_mode = match mode.as_str() {
            "adaptive" => StrategyMode::Adaptive,
            "fixed" => StrategyMode::Fixed,
            other => bail!("unknown mode '{other}'. Valid: adaptive, fixed"),
        };
    }
    if let Some(initial) = bankroll {
        config.initial_bankroll = initial;
    }

    let report = run_session(&config)?;
    print_session(&report);

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(&report, &dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn analyze_cmd(history: PathBuf, patterns: Option<PathBuf>) -> Result<()> {
    let sequence = load_history(&history)?;

    let mut parsed = Vec::new();
    if let Some(path) = patterns {
        for text in load_patterns(&path)? {
            match text.parse::<Pattern>() {
                Ok(p) => parsed.push(p),
                Err(e) => warn!(pattern = %text, error = %e, "skipping pattern"),
            }
        }
    }

    let Some(analysis) = analyze_history(&sequence, &parsed) else {
        bail!("history too short to analyze: {} results", sequence.len());
    };
    let stats = sequence.stats();

    println!();
    println!("=== History Analysis ===");
    println!("File:           {}", history.display());
    println!("Dataset:        {}", sequence.dataset_hash().short());
    println!("Results:        {}", analysis.total_raw);
    println!(
        "Without zeros:  {} ({} removed)",
        analysis.total_filtered, analysis.wildcards_removed
    );
    println!("Black:          {} ({:.1}%)", stats.blacks, stats.pct_black);
    println!("Red:            {} ({:.1}%)", stats.reds, stats.pct_red);
    println!("Zero:           {} ({:.1}%)", stats.wildcards, stats.pct_wildcard);
    println!("Tendency:       {:?}", stats.tendency);
    println!("Longest Red:    {}", analysis.longest_red_streak);
    println!("Longest Black:  {}", analysis.longest_black_streak);
    println!("Alternation:    {:.1}%", analysis.alternation_pct);

    if !analysis.pattern_occurrences.is_empty() {
        println!();
        println!("--- Pattern Occurrences ---");
        for (pattern, count) in &analysis.pattern_occurrences {
            println!("{pattern:<14}{count}");
        }
    }
    Ok(())
}

fn compare_cmd(session: SessionArgs, replicates: usize, out: Option<PathBuf>) -> Result<()> {
    let config = build_config(session)?;
    let patterns = resolve_patterns(&config)?;
    let report = run_replicates(&config, replicates, &patterns)?;
    print_replicates(&report);

    if let Some(path) = out {
        std::fs::write(&path, export_replicates_json(&report)?)?;
        println!("Replicate report saved to: {}", path.display());
    }
    Ok(())
}

fn generate_cmd(rounds: usize, seed: u64, out: PathBuf) -> Result<()> {
    if rounds == 0 {
        bail!("--rounds must be greater than zero");
    }
    let sequence = synthetic_sequence(seed, rounds);
    write_sequence_txt(&sequence, &out)?;
    let stats = sequence.stats();
    println!(
        "Wrote {} results to {} (B {:.1}% / R {:.1}% / 0 {:.1}%, dataset {})",
        sequence.len(),
        out.display(),
        stats.pct_black,
        stats.pct_red,
        stats.pct_wildcard,
        sequence.dataset_hash().short()
    );
    Ok(())
}

fn print_session(report: &SessionReport) {
    let summary = &report.summary;
    let bank = &report.bankroll;

    println!();
    println!("=== Session Result ===");
    println!("Results:        {}", report.sequence_stats.total);
    println!("Max Operations: {}", report.config.max_operations);
    println!("Bankroll Mode:  {}", summary.mode);
    println!("Dataset:        {}", &report.dataset_hash[..report.dataset_hash.len().min(12)]);
    println!();
    println!(
        "{:<14}{:>9}{:>12}{:>10}{:>12}{:>10}",
        "Pattern", "Triggers", "Adaptive", "ROI", "Fixed", "ROI"
    );
    for p in &report.patterns {
        let c = &p.comparison;
        if let Some(flag) = &c.adaptive.flag {
            println!("{:<14}{:?}", format!("'{}'", c.pattern), flag);
            continue;
        }
        println!(
            "{:<14}{:>9}{:>12.2}{:>9.1}%{:>12.2}{:>9.1}%",
            c.pattern, c.trigger_count, c.adaptive.balance, c.adaptive.roi, c.fixed.balance, c.fixed.roi
        );
    }
    println!();
    println!("--- Operations ---");
    println!("Triggers:       {}", summary.total_triggers);
    println!("Activations:    {}", summary.total_activations);
    println!("Won / Lost:     {} / {}", summary.operations_won, summary.operations_lost);
    println!("Incomplete:     {}", summary.incomplete_operations);
    println!("Success Rate:   {:.1}%", summary.operation_success_rate);
    println!(
        "Profitable:     {}/{}",
        summary.profitable_patterns,
        summary.patterns_tested - summary.flagged_patterns
    );
    println!(
        "Adaptive Better:{} (fixed better: {})",
        summary.adaptive_better, summary.fixed_better
    );
    println!();
    println!("--- Bankroll ---");
    println!("Initial:        {:.2}", bank.initial);
    println!("Final:          {:.2}", bank.final_balance);
    println!("Lowest:         {:.2}", bank.lowest_balance);
    println!("ROI:            {:+.1}%", bank.roi);
    println!("Risk:           {:?}", bank.risk);
    println!("Evaluation:     {:?}", bank.evaluation);
    if !bank.alerts.is_empty() {
        println!();
        println!("WARNING: {} low-bankroll alerts", bank.alerts.len());
    }
}

fn print_replicates(report: &ReplicateReport) {
    println!();
    println!("=== Replicate Comparison ===");
    println!("Replicates:     {}", report.replicates);
    println!("Rounds:         {}", report.rounds);
    println!("Max Operations: {}", report.max_operations);
    println!("Master Seed:    {}", report.master_seed);
    println!();
    println!(
        "{:<14}{:>10}{:>10}{:>8}{:>14}{:>12}",
        "Pattern", "Adaptive", "Fixed", "Ties", "Adaptive ROI", "Fixed ROI"
    );
    for t in report.patterns.iter().chain(std::iter::once(&report.overall)) {
        if t.samples() == 0 {
            continue;
        }
        println!(
            "{:<14}{:>10}{:>10}{:>8}{:>13.1}%{:>11.1}%",
            t.pattern, t.adaptive_wins, t.fixed_wins, t.ties, t.mean_adaptive_roi, t.mean_fixed_roi
        );
    }
    println!();
    println!(
        "Adaptive beat fixed in {:.1}% of samples",
        report.overall.adaptive_win_rate()
    );
}
