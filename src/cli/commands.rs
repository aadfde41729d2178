use std::collections::HashMap;

use crate::browser::session::BrowserSession;
use crate::field::field_model::{FieldRecord, FieldType};
use crate::matcher::data::DataDictionary;
use crate::matcher::label_matcher::best_match;
use crate::trace::logger::TraceLogger;
use crate::traversal::traversal_model::{RunReport, TraversalConfig};

// ============================================================================
// analyze subcommand
// ============================================================================

pub fn cmd_analyze(url: &str, json: bool, verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = BrowserSession::launch()?;

    if verbose > 0 {
        eprintln!("Analyzing {}...", url);
    }

    session.navigate(url)?;
    let (signals, scan) = crate::scan_page(&mut session)?;
    session.quit()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&scan.fields)?);
        return Ok(());
    }

    println!("URL: {}", signals.url);
    println!("Title: {}", signals.title);
    println!("Total fields found: {}", scan.fields.len());
    if !scan.skipped.is_empty() && verbose > 0 {
        eprintln!("Skipped {} elements during extraction", scan.skipped.len());
    }

    println!("\nField summary:");
    for (field_type, count) in field_summary(&scan.fields) {
        println!("  - {:?}: {}", field_type, count);
    }

    println!("\nDetailed fields:");
    for (i, field) in scan.fields.iter().enumerate() {
        let role = if field.is_next_button {
            " [next]"
        } else if field.is_final_submit {
            " [final submit]"
        } else {
            ""
        };
        println!(
            "  {}. [{:?}] {}{}",
            i + 1,
            field.field_type,
            field.display_name(),
            role
        );
    }

    Ok(())
}

/// Count fields per type, in first-seen order.
fn field_summary(fields: &[FieldRecord]) -> Vec<(FieldType, usize)> {
    let mut counts: HashMap<FieldType, usize> = HashMap::new();
    let mut order: Vec<FieldType> = Vec::new();

    for field in fields {
        if !counts.contains_key(&field.field_type) {
            order.push(field.field_type);
        }
        *counts.entry(field.field_type).or_insert(0) += 1;
    }

    order.into_iter().map(|t| (t, counts[&t])).collect()
}

// ============================================================================
// fill subcommand
// ============================================================================

/// Run a full traversal and return whether it succeeded.
pub fn cmd_fill(
    url: &str,
    data_path: &str,
    config: TraversalConfig,
    trace_path: Option<&str>,
    json: bool,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let data = DataDictionary::from_file(data_path)?;
    if data.is_empty() {
        eprintln!("Warning: data file '{}' holds no entries", data_path);
    }

    let tracer = match trace_path {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    let mut session = BrowserSession::launch()?;

    if verbose > 0 {
        eprintln!(
            "Filling {} (max_steps={}, min_score={})...",
            url, config.max_steps, config.min_score
        );
    }

    let report = crate::run_fill(&mut session, url, &data, config, &tracer)?;
    session.quit()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(report.success)
}

fn print_report(report: &RunReport) {
    println!(
        "{} after {} step(s){}",
        if report.success { "Succeeded" } else { "Failed" },
        report.steps_processed,
        if report.submitted { ", form submitted" } else { "" }
    );
    println!("  Filled:  {}", report.filled_fields.len());
    println!("  Failed:  {}", report.failed_fields.len());
    println!("  Skipped: {}", report.skipped_fields.len());

    for id in &report.filled_fields {
        println!("    + {}", id);
    }
    for id in &report.failed_fields {
        println!("    ! {}", id);
    }
    if !report.errors.is_empty() {
        println!("  Errors:");
        for error in &report.errors {
            println!("    - {}", error);
        }
    }
}

// ============================================================================
// match subcommand
// ============================================================================

/// Offline matching over a saved field inventory, for tuning data keys
/// without touching a browser.
pub fn cmd_match(
    fields_path: &str,
    data_path: &str,
    min_score: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(fields_path)?;
    let fields: Vec<FieldRecord> = serde_json::from_str(&content)?;
    let data = DataDictionary::from_file(data_path)?;

    for field in fields.iter().filter(|f| !f.field_type.is_button_like()) {
        let result = best_match(field.display_name(), &data);
        match &result.matched_key {
            Some(key) if result.score >= min_score => {
                println!(
                    "  {} -> '{}' (score {})",
                    field.display_name(),
                    key,
                    result.score
                );
            }
            Some(key) => {
                println!(
                    "  {} -> '{}' (score {}, below floor {})",
                    field.display_name(),
                    key,
                    result.score,
                    min_score
                );
            }
            None => {
                println!("  {} -> no match", field.display_name());
            }
        }
    }

    Ok(())
}
