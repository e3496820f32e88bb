//! Reporting and export — JSON, CSV, and Markdown artifact generation.
//!
//! All persisted artifacts include a `schema_version` field. Newer versions
//! are rejected on load.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use ladderlab_core::domain::RawSequence;
use ladderlab_core::engine::StrategyMode;

use crate::bankroll::BankrollEntry;
use crate::replicates::ReplicateReport;
use crate::runner::{PatternReport, SequenceSource, SessionReport, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json(report: &SessionReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize SessionReport to JSON")
}

/// Deserialize a `SessionReport`, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<SessionReport> {
    let report: SessionReport =
        serde_json::from_str(json).context("failed to deserialize SessionReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

pub fn export_replicates_json(report: &ReplicateReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ReplicateReport to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// One row per pattern with both modes side by side.
///
/// Columns: pattern, flag, triggers, ladder_depth, then for each of adaptive
/// and fixed: activations, skipped, ops_won, ops_lost, incomplete, investment,
/// profit, loss, balance, roi; finally adaptive_edge.
pub fn export_patterns_csv(patterns: &[PatternReport]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec![
        "pattern".to_string(),
        "flag".to_string(),
        "triggers".to_string(),
        "ladder_depth".to_string(),
    ];
    for mode in [StrategyMode::Adaptive, StrategyMode::Fixed] {
        for col in [
            "activations",
            "skipped",
            "ops_won",
            "ops_lost",
            "incomplete",
            "investment",
            "profit",
            "loss",
            "balance",
            "roi",
        ] {
            header.push(format!("{mode}_{col}"));
        }
    }
    header.push("adaptive_edge".to_string());
    wtr.write_record(&header)?;

    for p in patterns {
        let c = &p.comparison;
        let flag = match &c.adaptive.flag {
            Some(f) => format!("{f:?}"),
            None => String::new(),
        };
        let mut row = vec![
            c.pattern.clone(),
            flag,
            c.trigger_count.to_string(),
            c.adaptive.ladder_depth.to_string(),
        ];
        for r in [&c.adaptive, &c.fixed] {
            row.extend([
                r.activations_run.to_string(),
                r.activations_skipped.to_string(),
                r.operations_won.to_string(),
                r.operations_lost.to_string(),
                r.incomplete_operations.to_string(),
                format!("{:.2}", r.total_investment),
                format!("{:.2}", r.total_profit),
                format!("{:.2}", r.total_loss),
                format!("{:.2}", r.balance),
                format!("{:.2}", r.roi),
            ]);
        }
        row.push(format!("{:.2}", c.adaptive_edge()));
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Bankroll history: pattern, balance_before, change, balance_after, cumulative_roi.
pub fn export_bankroll_csv(history: &[BankrollEntry]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "pattern",
        "balance_before",
        "change",
        "balance_after",
        "cumulative_roi",
    ])?;
    for e in history {
        wtr.write_record([
            &e.pattern,
            &format!("{:.2}", e.balance_before),
            &format!("{:.2}", e.change),
            &format!("{:.2}", e.balance_after),
            &format!("{:.2}", e.cumulative_roi),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Sequence files ─────────────────────────────────────────────────

/// Write a sequence as a history `.txt` file, one result per line, so it can
/// be replayed with `history_file`.
pub fn write_sequence_txt(sequence: &RawSequence, path: &Path) -> Result<()> {
    let mut out = String::with_capacity(sequence.len() * 2);
    for symbol in sequence.symbols() {
        out.push(symbol.as_char());
        out.push('\n');
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a session.
///
/// Creates `session_{timestamp}/` under `output_dir` containing:
/// - `manifest.json`: the full `SessionReport`
/// - `patterns.csv`: per-pattern comparison
/// - `bankroll.csv`: bankroll history
/// - `report.md`: human-readable summary
///
/// Returns the path to the created directory.
pub fn save_artifacts(report: &SessionReport, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!("session_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("manifest.json"), export_json(report)?)?;
    std::fs::write(
        run_dir.join("patterns.csv"),
        export_patterns_csv(&report.patterns)?,
    )?;
    std::fs::write(
        run_dir.join("bankroll.csv"),
        export_bankroll_csv(&report.bankroll.history)?,
    )?;
    std::fs::write(run_dir.join("report.md"), generate_report(report))?;

    Ok(run_dir)
}

/// Load a `SessionReport` from an artifact directory's manifest.json.
pub fn load_artifacts(dir: &Path) -> Result<SessionReport> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

pub fn generate_report(report: &SessionReport) -> String {
    let mut md = String::with_capacity(2048);
    let stats = &report.sequence_stats;
    let summary = &report.summary;
    let bank = &report.bankroll;

    md.push_str("# Session Report\n\n");

    md.push_str("## Metadata\n\n| Field | Value |\n| --- | --- |\n");
    match &report.source {
        SequenceSource::Synthetic { seed, rounds } => {
            let _ = writeln!(md, "| Source | synthetic ({rounds} rounds, seed {seed}) |");
        }
        SequenceSource::History { path } => {
            let _ = writeln!(md, "| Source | history `{path}` |");
        }
    }
    let _ = writeln!(md, "| Max Operations | {} |", report.config.max_operations);
    let _ = writeln!(md, "| Bankroll Mode | {} |", summary.mode);
    let _ = writeln!(md, "| Dataset Hash | {} |", report.dataset_hash);
    let _ = writeln!(md, "| Created | {} |\n", report.created_at);

    md.push_str("## Sequence\n\n| Symbol | Count | Share |\n| --- | ---: | ---: |\n");
    let _ = writeln!(md, "| Black | {} | {:.1}% |", stats.blacks, stats.pct_black);
    let _ = writeln!(md, "| Red | {} | {:.1}% |", stats.reds, stats.pct_red);
    let _ = writeln!(md, "| Wildcard | {} | {:.1}% |\n", stats.wildcards, stats.pct_wildcard);

    md.push_str("## Patterns\n\n");
    md.push_str("| Pattern | Triggers | Adaptive Balance | Adaptive ROI | Fixed Balance | Fixed ROI |\n");
    md.push_str("| --- | ---: | ---: | ---: | ---: | ---: |\n");
    for p in &report.patterns {
        let c = &p.comparison;
        if c.adaptive.is_flagged() {
            let _ = writeln!(md, "| `{}` | flagged | | | | |", c.pattern);
            continue;
        }
        let _ = writeln!(
            md,
            "| `{}` | {} | {:+.2} | {:+.1}% | {:+.2} | {:+.1}% |",
            c.pattern, c.trigger_count, c.adaptive.balance, c.adaptive.roi, c.fixed.balance, c.fixed.roi
        );
    }
    md.push('\n');

    md.push_str("## Summary\n\n| Metric | Value |\n| --- | ---: |\n");
    let _ = writeln!(
        md,
        "| Profitable Patterns | {}/{} |",
        summary.profitable_patterns,
        summary.patterns_tested - summary.flagged_patterns
    );
    let _ = writeln!(md, "| Triggers | {} |", summary.total_triggers);
    let _ = writeln!(md, "| Operations Won | {} |", summary.operations_won);
    let _ = writeln!(md, "| Operations Lost | {} |", summary.operations_lost);
    let _ = writeln!(md, "| Success Rate | {:.1}% |", summary.operation_success_rate);
    let _ = writeln!(
        md,
        "| Adaptive / Fixed Better | {} / {} |\n",
        summary.adaptive_better, summary.fixed_better
    );

    md.push_str("## Bankroll\n\n| Metric | Value |\n| --- | ---: |\n");
    let _ = writeln!(md, "| Initial | {:.2} |", bank.initial);
    let _ = writeln!(md, "| Final | {:.2} |", bank.final_balance);
    let _ = writeln!(md, "| Lowest | {:.2} |", bank.lowest_balance);
    let _ = writeln!(md, "| ROI | {:+.1}% |", bank.roi);
    let _ = writeln!(md, "| Risk | {:?} |", bank.risk);
    let _ = writeln!(md, "| Evaluation | {:?} |", bank.evaluation);
    let _ = writeln!(md, "| Alerts | {} |", bank.alerts.len());

    md
}
