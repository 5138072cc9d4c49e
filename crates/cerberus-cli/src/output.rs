//! Output formatting for the CLI.

use crate::commands::classify::ClassifyReport;
use crate::config::OutputFormat;
use crate::error::Result;
use cerberus_domain::{ArtifactMetadata, Decision, PipelineLocation};
use cerberus_orchestrator::PipelineStatus;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a pipeline status report.
    pub fn format_status(&self, status: &PipelineStatus) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(status)?);
        }

        let state = if status.running {
            self.colorize("running", "green")
        } else {
            self.colorize("paused", "yellow")
        };
        let mut lines = vec![format!(
            "Pipeline {} (up {}s)",
            state, status.uptime_secs
        )];

        let mut builder = Builder::default();
        builder.push_record(["Location", "Artifacts"]);
        for (location, count) in &status.counts {
            builder.push_record([location.to_string(), count.to_string()]);
        }
        lines.push(self.table(builder));

        let c = &status.counters;
        lines.push(format!(
            "captured {} | processed {} | discarded {} | routed {} | adjudicated {} | failures {}",
            c.captured, c.processed, c.discarded, c.routed, c.adjudicated, c.failures
        ));

        if !status.recent_errors.is_empty() {
            lines.push(self.warning("Recent failures:"));
            for failure in &status.recent_errors {
                let id = failure
                    .id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                lines.push(format!("  [{}] {} {}", failure.stage, id, failure.message));
            }
        }

        Ok(lines.join("\n"))
    }

    /// Format the artifacts at one location.
    pub fn format_artifacts(
        &self,
        location: PipelineLocation,
        artifacts: &[ArtifactMetadata],
    ) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(artifacts)?);
        }
        if artifacts.is_empty() {
            return Ok(self.colorize(&format!("No artifacts in {}.", location), "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Source", "Category", "Decision", "Last move"]);
        for meta in artifacts {
            let id = meta.id.to_string();
            let category = meta
                .classification
                .as_ref()
                .map(|c| c.category.to_string())
                .unwrap_or_else(|| "-".to_string());
            let decision = meta
                .latest_adjudication()
                .map(|ruling| self.decision(ruling.decision))
                .unwrap_or_else(|| "-".to_string());
            let last_move = meta
                .transitions
                .last()
                .map(|t| t.reason.clone())
                .unwrap_or_default();

            builder.push_record([
                id[..8].to_string(), // Truncate ID for readability
                meta.source_kind.to_string(),
                category,
                decision,
                last_move,
            ]);
        }

        Ok(self.table(builder))
    }

    /// Format a local classification.
    pub fn format_classification(&self, report: &ClassifyReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(report)?);
        }

        let Some(result) = &report.classification else {
            return Ok(self.warning("Discarded as noise; nothing to classify."));
        };

        let mut lines = vec![format!("Category: {}", result.category)];
        if result.safety_flag {
            lines.push(self.colorize("Safety flag raised", "red"));
        }
        let s = &result.scores;
        lines.push(format!(
            "Scores: truth {:.2} | fact {:.2} | lie {:.2} | hostility {:.2} | love {:.2}",
            s.truth, s.fact, s.lie, s.hostility, s.love
        ));
        if !result.reasons.is_empty() {
            lines.push(format!("Reasons: {}", result.reasons.join(", ")));
        }
        if let Some(route) = report.route {
            lines.push(format!("Routed to: {}", route));
        }
        if let Some(ruling) = &report.adjudication {
            lines.push(format!(
                "Decision: {} (covenant {})",
                self.decision(ruling.decision),
                ruling.covenant_score
            ));
            for reason in &ruling.reasons {
                lines.push(format!("  - {}", reason));
            }
        }

        Ok(lines.join("\n"))
    }

    /// Format audit log lines.
    pub fn format_logs(&self, lines: &[String]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(lines)?);
        }
        if lines.is_empty() {
            return Ok(self.info("Audit log is empty."));
        }

        let colored: Vec<String> = lines
            .iter()
            .map(|line| {
                if line.contains("[ALERT]") {
                    self.colorize(line, "red")
                } else if line.contains("[WARNING]") {
                    self.colorize(line, "yellow")
                } else {
                    line.clone()
                }
            })
            .collect();
        Ok(colored.join("\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn decision(&self, decision: Decision) -> String {
        let color = match decision {
            Decision::Accept => "green",
            Decision::Quarantine => "red",
            Decision::Review => "yellow",
        };
        self.colorize(decision.as_str(), color)
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
