//! Static validation of catalog data quality.
//!
//! None of these conditions break lookups, which fail open. They are
//! reported so that broken or stale entries are caught before shipping.
//!
//! | Check | Severity |
//! |-------|----------|
//! | Duplicate (source, comment) key within a context | error |
//! | Placeholder tokens differ between source and a translation | error |
//! | Numerus form count differs from the language's plural rule | error |
//! | Finished translation with empty text | warning |
//! | Unfinished translation | info |
//! | Vanished or obsolete message | info |

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::models::{Catalog, Message, Translation, TranslationStatus};
use crate::services::placeholder::placeholders;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// What was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    DuplicateKey,
    PlaceholderMismatch {
        /// Numerus form index, or `None` for a single translation.
        form: Option<usize>,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    NumerusFormCount { expected: usize, found: usize },
    EmptyTranslation,
    Unfinished,
    Orphaned,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateKey | Self::PlaceholderMismatch { .. } | Self::NumerusFormCount { .. } => {
                Severity::Error
            }
            Self::EmptyTranslation => Severity::Warning,
            Self::Unfinished | Self::Orphaned => Severity::Info,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey => f.write_str("duplicate source string in context"),
            Self::PlaceholderMismatch {
                form,
                missing,
                unexpected,
            } => {
                match form {
                    Some(index) => write!(f, "numerus form {index}: placeholder mismatch")?,
                    None => f.write_str("placeholder mismatch")?,
                }
                if !missing.is_empty() {
                    write!(f, ", missing {}", missing.join(" "))?;
                }
                if !unexpected.is_empty() {
                    write!(f, ", unexpected {}", unexpected.join(" "))?;
                }
                Ok(())
            }
            Self::NumerusFormCount { expected, found } => {
                write!(f, "expected {expected} numerus forms, found {found}")
            }
            Self::EmptyTranslation => f.write_str("finished translation is empty"),
            Self::Unfinished => f.write_str("translation is unfinished"),
            Self::Orphaned => f.write_str("message is no longer used by the application"),
        }
    }
}

/// One finding, located by context and source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub context: String,
    pub source: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}] {:?}: {}",
            self.severity, self.context, self.source, self.kind
        )
    }
}

/// All findings for a catalog, in catalog order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// Issues at or above `severity`.
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity >= severity)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }
}

/// Validate a catalog against its own plural rule.
pub fn validate(catalog: &Catalog) -> ValidationReport {
    let expected_forms = catalog.plural_rule().form_count();
    let mut issues = Vec::new();

    for context in &catalog.contexts {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();

        for message in &context.messages {
            let mut report = |kind: IssueKind| {
                issues.push(Issue {
                    severity: kind.severity(),
                    context: context.name.clone(),
                    source: message.source.clone(),
                    kind,
                });
            };

            if !seen.insert((message.source.as_str(), message.comment_str())) {
                report(IssueKind::DuplicateKey);
            }

            match message.status {
                TranslationStatus::Vanished | TranslationStatus::Obsolete => {
                    report(IssueKind::Orphaned);
                    continue;
                }
                TranslationStatus::Unfinished => report(IssueKind::Unfinished),
                TranslationStatus::Finished => {
                    if message.translation.is_empty() {
                        report(IssueKind::EmptyTranslation);
                    }
                }
            }

            if let Translation::Numerus(forms) = &message.translation {
                let has_text = forms.iter().any(|f| !f.is_empty());
                if (message.is_finished() || has_text) && forms.len() != expected_forms {
                    report(IssueKind::NumerusFormCount {
                        expected: expected_forms,
                        found: forms.len(),
                    });
                }
            }

            for issue in placeholder_issues(message) {
                report(issue);
            }
        }
    }

    ValidationReport { issues }
}

/// Compare placeholder tokens of every non-empty translation text.
fn placeholder_issues(message: &Message) -> Vec<IssueKind> {
    let expected = placeholders(&message.source);
    let numerus = message.is_numerus();

    message
        .translation
        .texts()
        .enumerate()
        .filter(|(_, text)| !text.is_empty())
        .filter_map(|(index, text)| {
            let found = placeholders(text);
            if found == expected {
                return None;
            }
            Some(IssueKind::PlaceholderMismatch {
                form: numerus.then_some(index),
                missing: expected.difference(&found).cloned().collect(),
                unexpected: found.difference(&expected).cloned().collect(),
            })
        })
        .collect()
}
