//! Classify command implementation.

use crate::cli::TextArgs;
use crate::commands::read_text;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use cerberus_classifier::{ClassificationEngine, ClassificationOutcome, StageRouter};
use cerberus_domain::{
    AdjudicationDecision, Artifact, ClassificationResult, PipelineLocation, SourceKind,
};
use cerberus_gatekeeper::Adjudicator;
use serde::Serialize;

/// Everything the pipeline would decide about one piece of text
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    /// Scorer output; `None` when discarded as noise
    pub classification: Option<ClassificationResult>,
    /// Where the router would place it
    pub route: Option<PipelineLocation>,
    /// Final ruling
    pub adjudication: Option<AdjudicationDecision>,
}

/// Run classification, routing and adjudication over `text` in memory.
pub fn classify_text(config: &Config, text: &str) -> Result<ClassifyReport> {
    let engine = ClassificationEngine::new(config.classifier.clone())?;
    let router = StageRouter::new(config.classifier.unknown_destination)?;
    let adjudicator = Adjudicator::new(config.adjudication.clone())?;

    let artifact = Artifact::captured_now(text, SourceKind::Manual);
    let report = match engine.classify(&artifact)? {
        ClassificationOutcome::Discarded(_) => ClassifyReport {
            classification: None,
            route: None,
            adjudication: None,
        },
        ClassificationOutcome::Classified(result) => ClassifyReport {
            route: Some(router.route_result(&result)),
            adjudication: Some(adjudicator.adjudicate(text, &result)),
            classification: Some(result),
        },
    };
    Ok(report)
}

/// Execute the classify command.
pub fn execute_classify(args: TextArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = read_text(&args)?;
    let report = classify_text(config, &text)?;
    println!("{}", formatter.format_classification(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerberus_domain::{Category, Decision};

    #[test]
    fn test_hostile_text() {
        let report = classify_text(&Config::default(), "i hope you die").unwrap();
        let result = report.classification.unwrap();
        assert_eq!(result.category, Category::LieHostile);
        assert_eq!(report.route, Some(PipelineLocation::Quarantine));
        assert_eq!(report.adjudication.unwrap().decision, Decision::Quarantine);
    }

    #[test]
    fn test_danger_overrides_fact() {
        let report = classify_text(
            &Config::default(),
            "source: confirmed, the data shows a verified result. password: hunter2",
        )
        .unwrap();
        assert_eq!(report.classification.unwrap().category, Category::Fact);
        assert_eq!(report.route, Some(PipelineLocation::Accepted));
        assert!(report.adjudication.unwrap().danger_detected);
    }

    #[test]
    fn test_noise() {
        let report = classify_text(&Config::default(), "x").unwrap();
        assert!(report.classification.is_none());
        assert!(report.route.is_none());
        assert!(report.adjudication.is_none());
    }
}
