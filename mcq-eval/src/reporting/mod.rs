//! Results reporting

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{Report, ReportSection, SectionEntry};
use crate::tasks::{Axis, Variant};

const RULE_WIDTH: usize = 80;

/// Render the multi-section breakdown, one string per line
pub fn report_lines(title: &str, report: &Report) -> Vec<String> {
    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        rule.clone(),
        title.to_string(),
        rule.clone(),
        format!(
            "Overall Accuracy: {:.2}% ({}/{})",
            report.overall_accuracy,
            report.overall.correct_count(),
            report.overall.total
        ),
        String::new(),
    ];

    for section in report.sections() {
        lines.push(section.heading().to_string());
        for entry in &section.entries {
            lines.push(entry_line(&section, entry));
        }
        lines.push(String::new());
    }

    lines.push(rule);
    lines
}

fn entry_line(section: &ReportSection, entry: &SectionEntry) -> String {
    let suffix = if section.axis == Some(Axis::Frames) {
        " frames"
    } else {
        ""
    };
    format!(
        "  {}{}: {:.2}% ({}/{})",
        entry.name,
        suffix,
        entry.accuracy,
        entry.correct.max(0.0) as u64,
        entry.total
    )
}

/// Emit the breakdown through the `tracing` info channel
pub fn log_report(title: &str, report: &Report) {
    for line in report_lines(title, report) {
        tracing::info!("{}", line);
    }
}

/// Print the breakdown to stdout
pub fn print_console_report(title: &str, report: &Report) {
    println!();
    for line in report_lines(title, report) {
        println!("{}", line);
    }
}

/// JSON summary export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub run_id: String,
    pub timestamp: String,
    pub variant: Variant,
    pub total_examples: u64,
    pub overall_accuracy: f64,
    pub sections: Vec<ReportSection>,
}

impl JsonSummary {
    pub fn from_report(run_id: impl Into<String>, variant: Variant, report: &Report) -> Self {
        Self {
            run_id: run_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            variant,
            total_examples: report.overall.total,
            overall_accuracy: report.rounded_overall(),
            sections: report.sections(),
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}
