//! Console output formatter for archive runs

use colored::Colorize;
use harvest_application::{ArchiveSummary, CrawlError};
use harvest_domain::{ConfigIssue, Severity};

/// Formats run results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the summary of a completed run
    pub fn format(summary: &ArchiveSummary) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("amazon{} invoices", summary.profile_key)));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Already archived:".cyan().bold(),
            summary.already_archived
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Discovered:".cyan().bold(),
            summary.discovered
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Written:".cyan().bold(),
            summary.written.len()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Elapsed:".cyan().bold(),
            Self::elapsed(summary)
        ));

        if summary.written.is_empty() {
            output.push_str(&format!("\n{}\n", "Nothing new to archive.".dimmed()));
        } else {
            output.push_str(&Self::section_header("Written files"));
            for (id, path) in &summary.written {
                output.push_str(&format!("  {} {}\n", id.to_string().yellow(), path.display()));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(summary: &ArchiveSummary) -> String {
        serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format configuration warnings and errors, one per line
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a failed run, with a hint when re-running may help
    pub fn format_error(error: &CrawlError) -> String {
        let mut output = format!("{} {}", "Error:".red().bold(), error);
        if error.is_retryable() {
            output.push_str(&format!(
                "\n{}",
                "Invoices written so far are kept; re-run to continue.".dimmed()
            ));
        }
        output
    }

    fn elapsed(summary: &ArchiveSummary) -> String {
        let seconds = summary.elapsed().num_seconds().max(0);
        format!("{}m {:02}s", seconds / 60, seconds % 60)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
