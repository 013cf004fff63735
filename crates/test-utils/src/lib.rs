//! tscat test utilities.
//!
//! Builders that render `.ts` documents for parser and lookup tests,
//! paths to the checked-in catalogs, and assertion helpers.

use std::fmt::Write as _;
use std::path::PathBuf;

use quick_xml::escape::escape;

/// Create a test catalog for the given language.
pub fn test_ts(language: &str) -> TestTs {
    TestTs {
        version: "2.1".to_string(),
        language: language.to_string(),
        source_language: None,
        contexts: Vec::new(),
    }
}

/// Create a test context.
pub fn test_context(name: &str) -> TestContext {
    TestContext {
        name: name.to_string(),
        messages: Vec::new(),
    }
}

/// Create a finished, translated message.
pub fn test_message(source: &str, translation: &str) -> TestMessage {
    TestMessage {
        source: source.to_string(),
        comment: None,
        status: None,
        translation: TestTranslation::Single(translation.to_string()),
    }
}

/// A test catalog builder.
#[derive(Debug, Clone)]
pub struct TestTs {
    pub version: String,
    pub language: String,
    pub source_language: Option<String>,
    pub contexts: Vec<TestContext>,
}

impl TestTs {
    /// Set the `sourcelanguage` attribute.
    pub fn with_source_language(mut self, language: &str) -> Self {
        self.source_language = Some(language.to_string());
        self
    }

    /// Append a context.
    pub fn with_context(mut self, context: TestContext) -> Self {
        self.contexts.push(context);
        self
    }

    /// Render the catalog as a `.ts` document.
    pub fn render(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n");
        let _ = write!(
            out,
            "<TS version=\"{}\" language=\"{}\"",
            escape(&self.version),
            escape(&self.language)
        );
        if let Some(source_language) = &self.source_language {
            let _ = write!(out, " sourcelanguage=\"{}\"", escape(source_language));
        }
        out.push_str(">\n");
        for context in &self.contexts {
            context.render_into(&mut out);
        }
        out.push_str("</TS>\n");
        out
    }
}

/// A test context builder.
#[derive(Debug, Clone)]
pub struct TestContext {
    pub name: String,
    pub messages: Vec<TestMessage>,
}

impl TestContext {
    /// Append a message.
    pub fn with_message(mut self, message: TestMessage) -> Self {
        self.messages.push(message);
        self
    }

    fn render_into(&self, out: &mut String) {
        let _ = writeln!(out, "<context>\n    <name>{}</name>", escape(&self.name));
        for message in &self.messages {
            message.render_into(out);
        }
        out.push_str("</context>\n");
    }
}

/// Translation payload of a test message.
#[derive(Debug, Clone)]
pub enum TestTranslation {
    Single(String),
    Numerus(Vec<String>),
}

/// A test message builder.
#[derive(Debug, Clone)]
pub struct TestMessage {
    pub source: String,
    pub comment: Option<String>,
    pub status: Option<String>,
    pub translation: TestTranslation,
}

impl TestMessage {
    /// Set the disambiguation comment.
    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Mark as unfinished.
    pub fn unfinished(mut self) -> Self {
        self.status = Some("unfinished".to_string());
        self
    }

    /// Mark as vanished.
    pub fn vanished(mut self) -> Self {
        self.status = Some("vanished".to_string());
        self
    }

    /// Turn into a numerus message with the given forms.
    pub fn with_forms(mut self, forms: &[&str]) -> Self {
        self.translation = TestTranslation::Numerus(forms.iter().map(|f| f.to_string()).collect());
        self
    }

    fn render_into(&self, out: &mut String) {
        match self.translation {
            TestTranslation::Numerus(_) => out.push_str("    <message numerus=\"yes\">\n"),
            TestTranslation::Single(_) => out.push_str("    <message>\n"),
        }
        let _ = writeln!(out, "        <source>{}</source>", escape(&self.source));
        if let Some(comment) = &self.comment {
            let _ = writeln!(out, "        <comment>{}</comment>", escape(comment));
        }

        out.push_str("        <translation");
        if let Some(status) = &self.status {
            let _ = write!(out, " type=\"{status}\"");
        }
        out.push('>');
        match &self.translation {
            TestTranslation::Single(text) => out.push_str(&escape(text)),
            TestTranslation::Numerus(forms) => {
                out.push('\n');
                for form in forms {
                    let _ = writeln!(out, "            <numerusform>{}</numerusform>", escape(form));
                }
                out.push_str("        ");
            }
        }
        out.push_str("</translation>\n    </message>\n");
    }
}

/// Paths to the checked-in catalogs.
pub mod fixtures {
    use std::path::PathBuf;

    /// The repository's `translations/` directory.
    pub fn translations_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("translations")
    }

    /// The French catalog.
    pub fn main_fr() -> PathBuf {
        translations_dir().join("main_fr.ts")
    }

    /// The languages manifest.
    pub fn languages_json() -> PathBuf {
        translations_dir().join("languages.json")
    }
}

/// A fresh, empty directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tscat-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Assertion helpers.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{}', got: {}",
            key,
            value
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let ts = test_ts("fr_FR")
            .with_source_language("en")
            .with_context(
                test_context("Settings")
                    .with_message(test_message("Save & Exit", "Enregistrer et quitter"))
                    .with_message(test_message("Reset", "").unfinished().with_comment("button")),
            )
            .render();

        assert::contains(&ts, "<!DOCTYPE TS>");
        assert::contains(&ts, "language=\"fr_FR\" sourcelanguage=\"en\"");
        assert::contains(&ts, "<source>Save &amp; Exit</source>");
        assert::contains(&ts, "<comment>button</comment>");
        assert::contains(&ts, "<translation type=\"unfinished\"></translation>");
        assert!(ts.ends_with("</TS>\n"));
    }

    #[test]
    fn test_numerus_builder() {
        let ts = test_ts("fr_FR")
            .with_context(
                test_context("QObject").with_message(
                    test_message("%n day(s)", "").with_forms(&["%n jour", "%n jours"]),
                ),
            )
            .render();

        assert::contains(&ts, "<message numerus=\"yes\">");
        assert::contains(&ts, "<numerusform>%n jours</numerusform>");
        assert::not_contains(&ts, "type=");
    }

    #[test]
    fn test_fixture_paths() {
        assert!(fixtures::main_fr().ends_with("translations/main_fr.ts"));
        assert!(fixtures::languages_json().ends_with("translations/languages.json"));
    }

    #[test]
    fn test_assertions() {
        let json = serde_json::json!({"language": "fr_FR"});
        assert::has_key(&json, "language");
        assert::contains("hello world", "world");
        assert::not_contains("hello world", "foo");
    }
}
