// Report generation from a dependency tree

use crate::render::{FAILURE_CLASS, SUCCESS_CLASS, render, render_text};
use chainscope_scanner::result::DependencyResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Html,
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Some(ReportFormat::Html),
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

pub fn generate_report(tree: &DependencyResult, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Html => Ok(generate_html_report(tree)),
        ReportFormat::Text => Ok(generate_text_report(tree)),
        ReportFormat::Json => generate_json_report(tree),
    }
}

pub fn generate_html_report(tree: &DependencyResult) -> String {
    let mut report = String::new();

    report.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    report.push_str("<meta charset=\"utf-8\">\n");
    report.push_str("<title>Chainscope - Dependency results</title>\n");
    report.push_str("<style>\n");
    report.push_str("body { font-family: sans-serif; margin: 2em; }\n");
    report.push_str(&format!(".{} {{ color: #198754; }}\n", SUCCESS_CLASS));
    report.push_str(&format!(".{} {{ color: #dc3545; }}\n", FAILURE_CLASS));
    report.push_str("</style>\n</head>\n<body>\n");
    report.push_str("<h2>Dependency results</h2>\n");

    let body = render(tree, 0);
    if body.is_empty() {
        report.push_str("<p>No dependencies reported.</p>\n");
    } else {
        report.push_str(&body);
    }

    report.push_str("</body>\n</html>\n");
    report
}

pub fn generate_text_report(tree: &DependencyResult) -> String {
    let summary = tree.summary();
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Root: {}\n", tree.url));
    report.push_str(&format!("  Endpoints reached: {}\n", summary.nodes));
    report.push_str(&format!("  External calls: {}\n", summary.external_calls));
    report.push_str(&format!("  Recursive calls: {}\n", summary.recursive_calls));
    report.push_str(&format!("  Failed calls: {}\n", summary.failed_calls));
    report.push_str(&format!("  Depth: {}\n", summary.max_depth));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    let tree_text = render_text(tree);
    if tree_text.is_empty() {
        report.push_str("  (no dependencies reported)\n");
    } else {
        report.push_str(&tree_text);
    }

    report
}

pub fn generate_json_report(tree: &DependencyResult) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Chainscope",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": tree.summary(),
            "result": tree
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
