// File: src/report.rs
//! Post-processing and rendering of analysis results.

use crate::core::types::AnalysisResult;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Best score first.
    Score,
    Alpha,
    /// File position, for results that came from a binary scan.
    Offset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" => Ok(Self::Score),
            "alpha" => Ok(Self::Alpha),
            "offset" => Ok(Self::Offset),
            other => Err(format!("unknown sort method '{}'", other)),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Keeps one result per original string (the best scoring one), in the
/// order each string was first seen.
pub fn dedup_by_original(results: Vec<AnalysisResult>) -> Vec<AnalysisResult> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<AnalysisResult> = Vec::with_capacity(results.len());

    for result in results {
        match index.get(&result.original_string) {
            Some(&i) => {
                if result.score > unique[i].score {
                    unique[i] = result;
                }
            }
            None => {
                index.insert(result.original_string.clone(), unique.len());
                unique.push(result);
            }
        }
    }

    unique
}

pub fn sort_results(results: &mut [AnalysisResult], order: SortOrder) {
    match order {
        SortOrder::Score => {
            results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        }
        SortOrder::Alpha => results.sort_by(|a, b| a.original_string.cmp(&b.original_string)),
        SortOrder::Offset => results.sort_by_key(|r| r.offset.unwrap_or(0)),
    }
}

pub fn render(
    results: &[AnalysisResult],
    format: OutputFormat,
    verbose: bool,
) -> serde_json::Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(results)?,
        OutputFormat::Csv => render_csv(results),
        OutputFormat::Text if verbose => render_table(results),
        OutputFormat::Text => results
            .iter()
            .map(|r| r.original_string.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(rendered)
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn render_csv(results: &[AnalysisResult]) -> String {
    let has_offsets = results.iter().any(|r| r.offset.is_some());
    let mut lines = Vec::with_capacity(results.len() + 1);

    lines.push(if has_offsets {
        "string,score,threshold,valid,normalized,offset".to_string()
    } else {
        "string,score,threshold,valid,normalized".to_string()
    });

    for r in results {
        let mut row = format!(
            "{},{},{},{},{}",
            csv_quote(&r.original_string),
            r.score,
            r.threshold,
            r.is_valid,
            csv_quote(&r.normalized_string)
        );
        if has_offsets {
            row.push(',');
            if let Some(offset) = r.offset {
                row.push_str(&offset.to_string());
            }
        }
        lines.push(row);
    }

    lines.join("\n")
}

fn render_table(results: &[AnalysisResult]) -> String {
    let has_offsets = results.iter().any(|r| r.offset.is_some());
    let mut lines = Vec::with_capacity(results.len() + 2);

    let mut header = format!("{:<20}{:<12}{:<12}", "String", "Score", "Threshold");
    if has_offsets {
        header.push_str(&format!("{:<10}", "Offset"));
    }
    header.push_str("Valid");
    lines.push(header);
    lines.push("-".repeat(if has_offsets { 70 } else { 60 }));

    for r in results {
        let mut row = format!(
            "{:<20}{:<12}{:<12}",
            format!("\"{}\"", r.original_string),
            format!("{:.3}", r.score),
            format!("{:.3}", r.threshold)
        );
        if has_offsets {
            let offset = r.offset.map(|o| format!("0x{:X}", o)).unwrap_or_default();
            row.push_str(&format!("{:<10}", offset));
        }
        row.push_str(if r.is_valid { "\u{2713}" } else { "\u{2717}" });
        lines.push(row);
    }

    lines.join("\n")
}
