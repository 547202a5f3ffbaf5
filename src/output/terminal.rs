// Colored terminal output for analysis reports and model status.

use std::path::Path;

use colored::Colorize;

use crate::analysis::orchestrator::AnalysisReport;
use crate::embedding::catalog::KNOWN_MODELS;
use crate::embedding::download::model_files_present;

/// Display an analysis report: one section per model, flagged pairs first.
pub fn display_report(report: &AnalysisReport, labels: &[String]) {
    if report.results.is_empty() {
        println!(
            "{}",
            "No requested model is loaded. Run `clonescope status` to check.".yellow()
        );
        return;
    }

    for (model, analysis) in &report.results {
        println!(
            "\n{}",
            format!(
                "=== {} ({} texts, {:.3}s) ===",
                model, report.text_count, analysis.processing_time
            )
            .bold()
        );

        if analysis.clones.is_empty() {
            println!(
                "  {} No pairs at or above {:.0}% similarity",
                "ok".green(),
                analysis.threshold * 100.0
            );
        } else {
            println!(
                "  {} {} pair(s) at or above {:.0}% similarity",
                "!!".red().bold(),
                analysis.clones.len(),
                analysis.threshold * 100.0
            );
            for pair in &analysis.clones {
                println!(
                    "    {:>6.2}%  {}  <->  {}",
                    pair.similarity * 100.0,
                    label(labels, pair.text1_index).bold(),
                    label(labels, pair.text2_index).bold(),
                );
                let preview = super::truncate_chars(&report.texts[pair.text1_index], 80);
                println!("             {}", preview.dimmed());
            }
        }
    }
    println!();
}

/// Show the model directory and which catalog models are ready to load.
pub fn display_model_status(model_dir: &Path) {
    println!("Model directory: {}", model_dir.display());
    for spec in &KNOWN_MODELS {
        let state = if model_files_present(model_dir, spec.name) {
            "ready".green()
        } else {
            "missing".red()
        };
        println!("  {:<26} {:<8} {}", spec.name, state, spec.description.dimmed());
    }
}

fn label(labels: &[String], index: usize) -> String {
    labels
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("#{index}"))
}
