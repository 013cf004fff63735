//! Translation coverage statistics.
//!
//! Counts finished, unfinished, and orphaned messages per context. Orphaned
//! messages are excluded from the percentage since the application no
//! longer asks for them.

use serde::Serialize;

use crate::models::{Catalog, Context, TranslationStatus};

/// Counts for one context (or the whole catalog).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContextCoverage {
    pub context: String,
    /// Messages still used by the application.
    pub total: usize,
    pub finished: usize,
    pub unfinished: usize,
    /// Vanished or obsolete messages.
    pub orphaned: usize,
    /// Finished share of `total`, 0.0–100.0 (100.0 for an empty context).
    pub coverage_percent: f32,
}

impl ContextCoverage {
    fn from_context(context: &Context) -> Self {
        let mut coverage = Self {
            context: context.name.clone(),
            ..Default::default()
        };
        for message in &context.messages {
            match message.status {
                TranslationStatus::Finished => coverage.finished += 1,
                TranslationStatus::Unfinished => coverage.unfinished += 1,
                TranslationStatus::Vanished | TranslationStatus::Obsolete => {
                    coverage.orphaned += 1;
                }
            }
        }
        coverage.finalize();
        coverage
    }

    fn finalize(&mut self) {
        self.total = self.finished + self.unfinished;
        self.coverage_percent = if self.total == 0 {
            100.0
        } else {
            (self.finished as f32 / self.total as f32) * 100.0
        };
    }
}

/// Coverage report for a catalog.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub language: String,
    /// Per-context coverage, in catalog order.
    pub contexts: Vec<ContextCoverage>,
    /// Totals across all contexts.
    pub overall: ContextCoverage,
}

impl CoverageReport {
    /// Contexts with at least one unfinished message.
    pub fn incomplete(&self) -> impl Iterator<Item = &ContextCoverage> {
        self.contexts.iter().filter(|c| c.unfinished > 0)
    }
}

/// Generate a coverage report.
pub fn coverage(catalog: &Catalog) -> CoverageReport {
    let contexts: Vec<ContextCoverage> = catalog
        .contexts
        .iter()
        .map(ContextCoverage::from_context)
        .collect();

    let mut overall = ContextCoverage {
        context: "(all)".to_string(),
        ..Default::default()
    };
    for c in &contexts {
        overall.finished += c.finished;
        overall.unfinished += c.unfinished;
        overall.orphaned += c.orphaned;
    }
    overall.finalize();

    CoverageReport {
        language: catalog.language.clone(),
        contexts,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Message;

    fn catalog() -> Catalog {
        Catalog::new("fr_FR")
            .with_context(
                Context::new("DevicePanel")
                    .with_message(Message::new("Serial", "N° de série"))
                    .with_message(Message::new("Pair Device", "").unfinished())
                    .with_message(Message::new("Reboot", "Redémarrer"))
                    .with_message(
                        Message::new("Old", "Ancien").with_status(TranslationStatus::Vanished),
                    ),
            )
            .with_context(Context::new("InputDialog").with_message(Message::new("Cancel", "Annuler")))
            .with_context(Context::new("Empty"))
    }

    #[test]
    fn per_context_counts() {
        let report = coverage(&catalog());
        let device = &report.contexts[0];
        assert_eq!(device.total, 3);
        assert_eq!(device.finished, 2);
        assert_eq!(device.unfinished, 1);
        assert_eq!(device.orphaned, 1);
        assert!((device.coverage_percent - 66.666_66).abs() < 0.01);
    }

    #[test]
    fn empty_context_is_fully_covered() {
        let report = coverage(&catalog());
        assert!((report.contexts[2].coverage_percent - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn overall_totals() {
        let report = coverage(&catalog());
        assert_eq!(report.language, "fr_FR");
        assert_eq!(report.overall.total, 4);
        assert_eq!(report.overall.finished, 3);
        assert_eq!(report.overall.orphaned, 1);
        assert!((report.overall.coverage_percent - 75.0).abs() < f32::EPSILON);
    }

    #[test]
    fn incomplete_contexts() {
        let report = coverage(&catalog());
        let names: Vec<&str> = report.incomplete().map(|c| c.context.as_str()).collect();
        assert_eq!(names, vec!["DevicePanel"]);
    }
}
