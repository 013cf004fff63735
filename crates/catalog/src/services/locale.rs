//! Locale service for interface string translation.
//!
//! Loads catalogs into immutable lookup tables and resolves messages with
//! a fail-open chain: requested language, then the fallback language, then
//! the source text itself. Lookups never return an error.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Catalog, Translation, TranslationStatus};
use crate::services::placeholder::substitute;
use crate::services::plural::PluralRule;
use crate::services::ts_parser::load_ts;

/// Immutable lookup table built from one catalog.
#[derive(Debug, Clone)]
pub struct TranslationTable {
    language: String,
    rule: PluralRule,
    /// key = "context\0comment\0source" → translation.
    entries: HashMap<String, Translation>,
}

impl TranslationTable {
    /// Build a table from a catalog.
    ///
    /// Only finished translations are served unless `include_unfinished`
    /// is set, in which case unfinished entries with text are served too.
    /// Orphaned and empty entries are never served.
    pub fn from_catalog(catalog: &Catalog, include_unfinished: bool) -> Self {
        let mut entries = HashMap::with_capacity(catalog.message_count());

        for (context, message) in catalog.messages() {
            let servable = match message.status {
                TranslationStatus::Finished => true,
                TranslationStatus::Unfinished => include_unfinished,
                TranslationStatus::Vanished | TranslationStatus::Obsolete => false,
            };
            if !servable || message.translation.is_empty() {
                continue;
            }

            let key = cache_key(&context.name, message.comment_str(), &message.source);
            if entries.contains_key(&key) {
                debug!(context = %context.name, source = %message.source, "duplicate message ignored");
                continue;
            }
            entries.insert(key, message.translation.clone());
        }

        Self {
            language: catalog.language.clone(),
            rule: catalog.plural_rule(),
            entries,
        }
    }

    /// Target language tag of the source catalog.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn plural_rule(&self) -> PluralRule {
        self.rule
    }

    /// Number of servable entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a translation template.
    ///
    /// A disambiguated lookup that misses is retried without the comment.
    /// Numerus entries select a form by `count` (singular when absent).
    /// Returns `None` when nothing servable exists.
    pub fn lookup(
        &self,
        context: &str,
        source: &str,
        comment: &str,
        count: Option<i64>,
    ) -> Option<&str> {
        let entry = self
            .entries
            .get(&cache_key(context, comment, source))
            .or_else(|| {
                if comment.is_empty() {
                    None
                } else {
                    self.entries.get(&cache_key(context, "", source))
                }
            })?;

        let text = match entry {
            Translation::Single(text) => text.as_str(),
            Translation::Numerus(forms) => self.rule.select(forms, count.unwrap_or(1))?,
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Build a lookup key from context, comment, and source.
///
/// Uses null byte separator (`\0`) so that no combination of context and
/// source strings can collide.
fn cache_key(context: &str, comment: &str, source: &str) -> String {
    format!("{context}\0{comment}\0{source}")
}

/// Locale translation service.
#[derive(Clone, Default)]
pub struct LocaleService {
    /// Loaded tables keyed by catalog code (file stem, e.g. "main_fr").
    /// Clones share the same tables.
    tables: Arc<DashMap<String, Arc<TranslationTable>>>,
    fallback_language: Option<String>,
    include_unfinished: bool,
}

impl LocaleService {
    /// Create an empty service. Every lookup returns the source text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the catalog consulted when the requested one has no translation.
    pub fn with_fallback(mut self, language: impl Into<String>) -> Self {
        self.fallback_language = Some(language.into());
        self
    }

    /// Serve unfinished translations that carry text.
    pub fn with_unfinished(mut self, include: bool) -> Self {
        self.include_unfinished = include;
        self
    }

    /// Register a parsed catalog under `code`, replacing any previous one.
    pub fn register(&self, code: &str, catalog: &Catalog) -> usize {
        let table = TranslationTable::from_catalog(catalog, self.include_unfinished);
        let count = table.len();
        self.tables.insert(code.to_string(), Arc::new(table));
        info!(language = %code, count = count, "loaded locale translations");
        count
    }

    /// Load a `.ts` file and register it under `code`.
    pub fn load_file(&self, code: &str, path: &Path) -> CatalogResult<usize> {
        let catalog = load_ts(path)?;
        Ok(self.register(code, &catalog))
    }

    /// Load `<dir>/<code>.ts`.
    pub fn load_language(&self, dir: &Path, code: &str) -> CatalogResult<usize> {
        self.load_file(code, &dir.join(format!("{code}.ts")))
    }

    /// Load every `.ts` file in `dir`, keyed by file stem.
    ///
    /// Returns the loaded codes, sorted. A missing directory loads nothing.
    pub fn load_dir(&self, dir: &Path) -> CatalogResult<Vec<String>> {
        if !dir.exists() {
            info!(?dir, "translations directory does not exist, nothing to load");
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))?;
        let mut files: Vec<_> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    warn!(error = %e, "failed to read translations directory entry");
                    None
                }
            })
            .filter(|path| path.extension().is_some_and(|ext| ext == "ts"))
            .collect();
        files.sort();

        let mut loaded = Vec::with_capacity(files.len());
        for path in files {
            let Some(code) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!(?path, "skipping catalog with non UTF-8 name");
                continue;
            };
            self.load_file(code, &path)?;
            loaded.push(code.to_string());
        }
        Ok(loaded)
    }

    /// Drop a loaded catalog. Returns whether one was registered.
    pub fn unload(&self, code: &str) -> bool {
        self.tables.remove(code).is_some()
    }

    /// Drop every loaded catalog.
    pub fn clear(&self) {
        self.tables.clear();
    }

    /// Codes of all loaded catalogs, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.tables.iter().map(|e| e.key().clone()).collect();
        codes.sort_unstable();
        codes
    }

    /// Shared handle to a loaded table.
    pub fn table(&self, code: &str) -> Option<Arc<TranslationTable>> {
        self.tables.get(code).map(|t| Arc::clone(t.value()))
    }

    /// Translate a source string.
    ///
    /// Falls back to the source string if no translation is found.
    pub fn translate(&self, language: &str, context: &str, source: &str) -> String {
        self.translate_full(language, context, source, "", None, &[])
    }

    /// Translate a plural-sensitive source string and substitute `%n`.
    pub fn translate_plural(
        &self,
        language: &str,
        context: &str,
        source: &str,
        count: i64,
    ) -> String {
        self.translate_full(language, context, source, "", Some(count), &[])
    }

    /// Translate and substitute positional arguments (`%1`, `%2`, ...).
    pub fn format(&self, language: &str, context: &str, source: &str, args: &[&str]) -> String {
        self.translate_full(language, context, source, "", None, args)
    }

    /// Translate a plural-sensitive string, substituting `%n` and arguments.
    pub fn format_plural(
        &self,
        language: &str,
        context: &str,
        source: &str,
        count: i64,
        args: &[&str],
    ) -> String {
        self.translate_full(language, context, source, "", Some(count), args)
    }

    /// Full lookup: disambiguation comment, optional count, arguments.
    pub fn translate_full(
        &self,
        language: &str,
        context: &str,
        source: &str,
        comment: &str,
        count: Option<i64>,
        args: &[&str],
    ) -> String {
        match self.resolve(language, context, source, comment, count) {
            Some(template) => substitute(&template, args, count),
            None => {
                debug!(language = %language, context = %context, source = %source, "no translation, using source text");
                substitute(source, args, count)
            }
        }
    }

    /// Walk requested language then fallback; `None` means use the source.
    fn resolve(
        &self,
        language: &str,
        context: &str,
        source: &str,
        comment: &str,
        count: Option<i64>,
    ) -> Option<String> {
        let fallback = self
            .fallback_language
            .as_deref()
            .filter(|fallback| *fallback != language);

        std::iter::once(language)
            .chain(fallback)
            .filter_map(|code| self.table(code))
            .find_map(|table| {
                table
                    .lookup(context, source, comment, count)
                    .map(str::to_string)
            })
    }
}

impl std::fmt::Debug for LocaleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleService")
            .field("languages", &self.languages())
            .field("fallback_language", &self.fallback_language)
            .field("include_unfinished", &self.include_unfinished)
            .finish()
    }
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::{Context, Message};

    fn french() -> Catalog {
        Catalog::new("fr_FR")
            .with_context(
                Context::new("InputDialog")
                    .with_message(Message::new("Cancel", "Annuler"))
                    .with_message(Message::new("Save", "Enregistrer"))
                    .with_message(Message::new("Save", "Sauvegarder").with_comment("toolbar")),
            )
            .with_context(
                Context::new("DevicePanel")
                    .with_message(Message::new("Pair Device", "").unfinished())
                    .with_message(Message::new("VIEW", "VOIR").unfinished()),
            )
            .with_context(
                Context::new("QObject")
                    .with_message(Message::numerus(
                        "%n minute(s) ago",
                        ["il y a %n minute", "il y a %n minutes"],
                    ))
                    .with_message(Message::new("Uninstall %1", "Désinstaller %1")),
            )
    }

    fn service() -> LocaleService {
        let service = LocaleService::new();
        service.register("main_fr", &french());
        service
    }

    #[test]
    fn cache_key_format() {
        assert_eq!(cache_key("", "", "Hello"), "\0\0Hello");
        assert_eq!(cache_key("menu", "", "Hello"), "menu\0\0Hello");
    }

    #[test]
    fn cache_key_no_collision_with_separators() {
        let k1 = cache_key("a", "", "b:c");
        let k2 = cache_key("a:b", "", "c");
        assert_ne!(k1, k2);
    }

    #[test]
    fn translate_returns_translation() {
        assert_eq!(service().translate("main_fr", "InputDialog", "Cancel"), "Annuler");
    }

    #[test]
    fn translate_returns_source_when_missing() {
        let service = service();
        assert_eq!(service.translate("main_fr", "InputDialog", "Help"), "Help");
        assert_eq!(service.translate("main_fr", "Nowhere", "Cancel"), "Cancel");
        assert_eq!(service.translate("main_de", "InputDialog", "Cancel"), "Cancel");
    }

    #[test]
    fn unfinished_falls_back_to_source() {
        let service = service();
        assert_eq!(service.translate("main_fr", "DevicePanel", "Pair Device"), "Pair Device");
        assert_eq!(service.translate("main_fr", "DevicePanel", "VIEW"), "VIEW");
    }

    #[test]
    fn unfinished_served_when_enabled() {
        let service = LocaleService::new().with_unfinished(true);
        service.register("main_fr", &french());
        assert_eq!(service.translate("main_fr", "DevicePanel", "VIEW"), "VOIR");
        // Empty text still falls back.
        assert_eq!(service.translate("main_fr", "DevicePanel", "Pair Device"), "Pair Device");
    }

    #[test]
    fn plural_selection() {
        let service = service();
        assert_eq!(
            service.translate_plural("main_fr", "QObject", "%n minute(s) ago", 1),
            "il y a 1 minute"
        );
        assert_eq!(
            service.translate_plural("main_fr", "QObject", "%n minute(s) ago", 5),
            "il y a 5 minutes"
        );
        assert_eq!(
            service.translate_plural("main_fr", "QObject", "%n minute(s) ago", 0),
            "il y a 0 minute"
        );
    }

    #[test]
    fn missing_plural_substitutes_into_source() {
        assert_eq!(
            service().translate_plural("main_fr", "QObject", "%n hour(s) ago", 3),
            "3 hour(s) ago"
        );
    }

    #[test]
    fn positional_arguments() {
        assert_eq!(
            service().format("main_fr", "QObject", "Uninstall %1", &["openpilot"]),
            "Désinstaller openpilot"
        );
    }

    #[test]
    fn comment_disambiguates_and_falls_back() {
        let service = service();
        assert_eq!(
            service.translate_full("main_fr", "InputDialog", "Save", "toolbar", None, &[]),
            "Sauvegarder"
        );
        assert_eq!(
            service.translate_full("main_fr", "InputDialog", "Save", "dialog", None, &[]),
            "Enregistrer"
        );
    }

    #[test]
    fn fallback_language_consulted() {
        let service = LocaleService::new().with_fallback("main_fr");
        service.register("main_fr", &french());
        service.register(
            "main_ca",
            &Catalog::new("fr_CA").with_context(
                Context::new("InputDialog").with_message(Message::new("Save", "Sauver")),
            ),
        );
        assert_eq!(service.translate("main_ca", "InputDialog", "Save"), "Sauver");
        assert_eq!(service.translate("main_ca", "InputDialog", "Cancel"), "Annuler");
    }

    #[test]
    fn register_unload_and_list() {
        let service = service();
        assert_eq!(service.languages(), vec!["main_fr".to_string()]);
        assert_eq!(service.table("main_fr").unwrap().len(), 5);
        assert!(service.unload("main_fr"));
        assert!(!service.unload("main_fr"));
        assert_eq!(service.translate("main_fr", "InputDialog", "Cancel"), "Cancel");
    }

    #[test]
    fn load_language_reads_code_file() {
        let dir = std::env::temp_dir().join(format!("tscat-load-language-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        crate::services::ts_writer::save_ts(&dir.join("main_fr.ts"), &french()).unwrap();

        let service = LocaleService::new();
        assert_eq!(service.load_language(&dir, "main_fr").unwrap(), 5);
        assert_eq!(service.translate("main_fr", "InputDialog", "Cancel"), "Annuler");

        let err = service.load_language(&dir, "main_de").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("main_de.ts"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn clear_drops_every_table() {
        let service = service();
        service.register("main_de", &Catalog::new("de_DE"));
        let shared = service.clone();
        shared.clear();
        assert!(service.languages().is_empty());
        assert_eq!(service.translate("main_fr", "InputDialog", "Cancel"), "Cancel");
    }

    #[test]
    fn table_skips_orphaned() {
        let catalog = Catalog::new("fr_FR").with_context(Context::new("C").with_message(
            Message::new("Old", "Ancien").with_status(TranslationStatus::Vanished),
        ));
        let table = TranslationTable::from_catalog(&catalog, true);
        assert!(table.is_empty());
        assert_eq!(table.lookup("C", "Old", "", None), None);
    }

    #[test]
    fn empty_numerus_form_falls_back() {
        let catalog = Catalog::new("fr_FR").with_context(
            Context::new("C").with_message(Message::numerus("%n file(s)", ["%n fichier", ""])),
        );
        let table = TranslationTable::from_catalog(&catalog, false);
        assert_eq!(table.lookup("C", "%n file(s)", "", Some(1)), Some("%n fichier"));
        assert_eq!(table.lookup("C", "%n file(s)", "", Some(2)), None);
    }

    #[test]
    fn concurrent_readers_during_reload() {
        let service = service();
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let text = service.translate("main_fr", "InputDialog", "Cancel");
                        assert!(text == "Annuler" || text == "Cancel");
                    }
                })
            })
            .collect();

        for _ in 0..10 {
            service.unload("main_fr");
            service.register("main_fr", &french());
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(service.translate("main_fr", "InputDialog", "Cancel"), "Annuler");
    }
}
