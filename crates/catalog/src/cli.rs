//! CLI command implementations.
//!
//! Each command works on catalog files directly; nothing is cached between
//! invocations. Output goes to the given writer (stdout in the binary).

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::CatalogError;
use crate::services::coverage::coverage;
use crate::services::languages::LanguageManifest;
use crate::services::locale::LocaleService;
use crate::services::ts_parser::{load_ts, parse_ts};
use crate::services::ts_writer::write_ts;
use crate::services::validate::{Severity, validate};

/// Validate catalogs. Fails if any file has errors or cannot be loaded.
pub fn cmd_check(out: &mut impl Write, files: &[PathBuf], min_severity: Severity) -> Result<()> {
    let mut failed = 0usize;

    for path in files {
        let catalog = match load_ts(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                writeln!(out, "{}: failed to load: {e}", path.display())?;
                failed += 1;
                continue;
            }
        };
        let report = validate(&catalog);

        for issue in report.at_least(min_severity) {
            writeln!(out, "{}: {issue}", path.display())?;
        }
        writeln!(
            out,
            "{}: {} error(s), {} warning(s), {} info",
            path.display(),
            report.count(Severity::Error),
            report.count(Severity::Warning),
            report.count(Severity::Info),
        )?;

        if report.has_errors() {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} catalog(s) failed validation");
    }
    Ok(())
}

/// Print translation coverage per context.
pub fn cmd_stats(out: &mut impl Write, path: &Path) -> Result<()> {
    let catalog = load_ts(path).with_context(|| format!("failed to load {}", path.display()))?;
    let report = coverage(&catalog);

    writeln!(
        out,
        "{:<28} {:>6} {:>9} {:>11} {:>9} {:>9}",
        "CONTEXT", "TOTAL", "FINISHED", "UNFINISHED", "ORPHANED", "COVERAGE"
    )?;
    writeln!(out, "{}", "-".repeat(77))?;

    for c in report.contexts.iter().chain(std::iter::once(&report.overall)) {
        writeln!(
            out,
            "{:<28} {:>6} {:>9} {:>11} {:>9} {:>8.1}%",
            c.context, c.total, c.finished, c.unfinished, c.orphaned, c.coverage_percent
        )?;
    }

    Ok(())
}

/// Arguments of a single lookup.
#[derive(Debug, Clone, Default)]
pub struct LookupRequest {
    pub language: Option<String>,
    pub context: String,
    pub source: String,
    pub comment: Option<String>,
    pub count: Option<i64>,
    pub args: Vec<String>,
}

/// Resolve one message through the configured translations directory.
pub fn cmd_lookup(out: &mut impl Write, config: &Config, request: &LookupRequest) -> Result<()> {
    let language = request
        .language
        .as_deref()
        .unwrap_or(&config.default_language);

    let mut service = LocaleService::new().with_unfinished(config.include_unfinished);
    if let Some(fallback) = &config.fallback_language {
        service = service.with_fallback(fallback.clone());
    }

    let fallback = config.fallback_language.as_deref();
    for code in std::iter::once(language).chain(fallback) {
        load_if_present(&service, &config.translations_dir, code)?;
    }

    let args: Vec<&str> = request.args.iter().map(String::as_str).collect();
    let text = service.translate_full(
        language,
        &request.context,
        &request.source,
        request.comment.as_deref().unwrap_or_default(),
        request.count,
        &args,
    );
    writeln!(out, "{text}")?;
    Ok(())
}

/// Load a language's catalog; a missing file means the source text is served.
fn load_if_present(service: &LocaleService, dir: &Path, code: &str) -> Result<()> {
    match service.load_language(dir, code) {
        Ok(_) => Ok(()),
        Err(CatalogError::Io { path, source }) if source.kind() == ErrorKind::NotFound => {
            info!(language = %code, path = %path, "no catalog on disk, serving source text");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("failed to load language '{code}'")),
    }
}

/// Rewrite a catalog in canonical layout, or verify it already is.
pub fn cmd_normalize(out: &mut impl Write, path: &Path, check: bool) -> Result<()> {
    let original = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let catalog =
        parse_ts(&original).with_context(|| format!("failed to parse {}", path.display()))?;
    let normalized = write_ts(&catalog);

    if normalized == original {
        writeln!(out, "{}: already canonical", path.display())?;
        return Ok(());
    }

    if check {
        bail!(
            "{} is not in canonical form. Fix with: tscat normalize {}",
            path.display(),
            path.display()
        );
    }

    std::fs::write(path, normalized)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writeln!(out, "{}: normalized", path.display())?;
    Ok(())
}

/// Dump a catalog as JSON.
pub fn cmd_export(out: &mut impl Write, path: &Path) -> Result<()> {
    let catalog = load_ts(path).with_context(|| format!("failed to load {}", path.display()))?;
    serde_json::to_writer_pretty(&mut *out, &catalog).context("failed to serialize catalog")?;
    writeln!(out)?;
    Ok(())
}

/// List languages from the manifest with their on-disk status.
pub fn cmd_languages(out: &mut impl Write, config: &Config) -> Result<()> {
    let manifest_path = config.languages_path();
    let manifest = LanguageManifest::load(&manifest_path)
        .with_context(|| format!("failed to load {}", manifest_path.display()))?;

    if manifest.is_empty() {
        writeln!(out, "No languages found.")?;
        return Ok(());
    }

    writeln!(out, "{:<20} {:<12} {:<10} {:<10}", "LANGUAGE", "CODE", "MESSAGES", "STATUS")?;
    writeln!(out, "{}", "-".repeat(55))?;

    for (name, code) in manifest.iter() {
        let path = config.translations_dir.join(format!("{code}.ts"));
        let (messages, status) = if !path.exists() {
            ("-".to_string(), "source")
        } else {
            match load_ts(&path) {
                Ok(catalog) => (catalog.message_count().to_string(), "ok"),
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "catalog failed to parse");
                    ("?".to_string(), "invalid")
                }
            }
        };
        writeln!(out, "{name:<20} {code:<12} {messages:<10} {status:<10}")?;
    }

    Ok(())
}
