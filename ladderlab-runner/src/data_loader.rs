//! Pattern and history file loading.
//!
//! Pattern files are JSON: either a bare list of strings or an object holding
//! the list under `Padroes`, `padroes`, or `patterns`. Patterns are returned as
//! raw text so that malformed entries reach the simulator and come back
//! flagged instead of aborting the whole session.
//!
//! History files replay recorded results. The format follows the extension:
//! - `.txt`: one result per line (`R`, `B`, `0`); other lines are ignored
//! - `.csv`: a header row with a `resultado`, `result`, or `color` column,
//!   accepting spelled-out colors as well
//! - `.json`: a list of results, or an object with a `resultados` list

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use ladderlab_core::analysis::MIN_ANALYSIS_LEN;
use ladderlab_core::domain::{RawSequence, Symbol};

const PATTERN_KEYS: [&str; 3] = ["Padroes", "padroes", "patterns"];
const HISTORY_COLUMNS: [&str; 3] = ["resultado", "result", "color"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unrecognized pattern file structure in {path}: use 'Padroes', 'padroes', 'patterns', or a bare list")]
    UnrecognizedShape { path: PathBuf },

    #[error("unsupported history format '{extension}' for {path} (expected txt, csv, or json)")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("{path} has no 'resultado', 'result', or 'color' column")]
    MissingColumn { path: PathBuf },

    #[error("history in {path} too short: {len} results, need at least {min}")]
    HistoryTooShort { path: PathBuf, len: usize, min: usize },
}

// ─── Patterns ───────────────────────────────────────────────────────

/// Load raw pattern strings from a JSON file.
pub fn load_patterns(path: &Path) -> Result<Vec<String>, LoadError> {
    let content = read(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let patterns = patterns_from_value(&value).ok_or_else(|| {
        LoadError::UnrecognizedShape {
            path: path.to_path_buf(),
        }
    })?;
    info!(path = %path.display(), count = patterns.len(), "loaded patterns");
    Ok(patterns)
}

/// Extract the pattern list from parsed JSON. Non-string entries are dropped.
pub fn patterns_from_value(value: &Value) -> Option<Vec<String>> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(map) => PATTERN_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(Value::as_array)?,
        _ => return None,
    };
    Some(
        list.iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .collect(),
    )
}

// ─── History ────────────────────────────────────────────────────────

/// Load a recorded result history, picking the parser from the extension.
///
/// Histories shorter than [`MIN_ANALYSIS_LEN`] are rejected.
pub fn load_history(path: &Path) -> Result<RawSequence, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let symbols = match extension.as_str() {
        "txt" => parse_history_lines(&read(path)?),
        "csv" => parse_history_csv(path, &read(path)?)?,
        "json" => {
            let value: Value =
                serde_json::from_str(&read(path)?).map_err(|source| LoadError::Json {
                    path: path.to_path_buf(),
                    source,
                })?;
            history_from_value(&value)
        }
        _ => {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            })
        }
    };

    if symbols.len() < MIN_ANALYSIS_LEN {
        return Err(LoadError::HistoryTooShort {
            path: path.to_path_buf(),
            len: symbols.len(),
            min: MIN_ANALYSIS_LEN,
        });
    }
    info!(path = %path.display(), results = symbols.len(), "loaded history");
    Ok(RawSequence::new(symbols))
}

/// One result per line; anything that is not a single `R`, `B`, or `0` is skipped.
pub fn parse_history_lines(content: &str) -> Vec<Symbol> {
    content.lines().filter_map(single_result).collect()
}

fn parse_history_csv(path: &Path, content: &str) -> Result<Vec<Symbol>, LoadError> {
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers().map_err(csv_err)?.clone();
    let column = HISTORY_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|h| h.trim() == *name))
        .ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
        })?;

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        match record.get(column).and_then(Symbol::from_token) {
            Some(symbol) => symbols.push(symbol),
            None => debug!(row = ?record, "skipping unrecognized history row"),
        }
    }
    Ok(symbols)
}

/// Results from a JSON list or a `resultados` list. Numbers are read by their
/// text, so `0` is the wildcard.
pub fn history_from_value(value: &Value) -> Vec<Symbol> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("resultados").and_then(Value::as_array) {
            Some(items) => items,
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    list.iter()
        .filter_map(|item| match item {
            Value::String(s) => single_result(s),
            Value::Number(n) => single_result(&n.to_string()),
            _ => None,
        })
        .collect()
}

fn single_result(token: &str) -> Option<Symbol> {
    let mut chars = token.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Symbol::from_char(c),
        _ => None,
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    fn history_text(n: usize) -> String {
        (0..n)
            .map(|i| match i % 5 {
                0 => "R",
                1 => "B",
                2 => "0",
                3 => "b",
                _ => "r",
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn pattern_structures() {
        for key in PATTERN_KEYS {
            let v = json!({ key: ["RBRBRB", " BBBBBB "] });
            assert_eq!(
                patterns_from_value(&v).unwrap(),
                vec!["RBRBRB".to_string(), "BBBBBB".to_string()]
            );
        }
        assert_eq!(patterns_from_value(&json!(["RR", 5, "BB"])).unwrap().len(), 2);
        assert!(patterns_from_value(&json!({ "other": ["RR"] })).is_none());
        assert!(patterns_from_value(&json!("RR")).is_none());
    }

    #[test]
    fn load_patterns_keeps_malformed_entries() {
        let (_dir, path) = write_temp("p.json", r#"{"Padroes": ["RBR", "RXB", ""]}"#);
        let patterns = load_patterns(&path).unwrap();
        assert_eq!(patterns, vec!["RBR", "RXB", ""]);
    }

    #[test]
    fn load_patterns_reports_bad_json() {
        let (_dir, path) = write_temp("p.json", "{not json");
        assert!(matches!(load_patterns(&path), Err(LoadError::Json { .. })));
    }

    #[test]
    fn txt_history_skips_noise() {
        let symbols = parse_history_lines("R\nB\n\n0\nRED\nx\n  b  \n");
        assert_eq!(
            symbols,
            vec![Symbol::Red, Symbol::Black, Symbol::Wildcard, Symbol::Black]
        );
    }

    #[test]
    fn txt_history_loads() {
        let (_dir, path) = write_temp("h.txt", &history_text(60));
        let seq = load_history(&path).unwrap();
        assert_eq!(seq.len(), 60);
        assert_eq!(seq.symbols()[2], Symbol::Wildcard);
    }

    #[test]
    fn short_history_rejected() {
        let (_dir, path) = write_temp("h.txt", &history_text(49));
        assert!(matches!(
            load_history(&path),
            Err(LoadError::HistoryTooShort { len: 49, .. })
        ));
    }

    #[test]
    fn csv_history_accepts_color_names() {
        let mut content = String::from("time,color\n");
        for i in 0..50 {
            let c = ["RED", "black", "GREEN", "R", "B"][i % 5];
            content.push_str(&format!("{i},{c}\n"));
        }
        content.push_str("50,purple\n");
        let (_dir, path) = write_temp("h.csv", &content);
        let seq = load_history(&path).unwrap();
        assert_eq!(seq.len(), 50);
        assert_eq!(&seq.symbols()[..3], &[Symbol::Red, Symbol::Black, Symbol::Wildcard]);
    }

    #[test]
    fn csv_without_known_column() {
        let (_dir, path) = write_temp("h.csv", "a,b\n1,2\n");
        assert!(matches!(
            load_history(&path),
            Err(LoadError::MissingColumn { .. })
        ));
    }

    #[test]
    fn json_history_forms() {
        let list = json!(["R", "B", 0, "0", "RED", "r"]);
        assert_eq!(history_from_value(&list).len(), 5);
        let obj = json!({ "resultados": ["B", "B"] });
        assert_eq!(history_from_value(&obj), vec![Symbol::Black, Symbol::Black]);
        assert!(history_from_value(&json!({ "x": [] })).is_empty());
    }

    #[test]
    fn unsupported_extension() {
        let (_dir, path) = write_temp("h.xml", "R");
        assert!(matches!(
            load_history(&path),
            Err(LoadError::UnsupportedFormat { .. })
        ));
    }
}
