#![allow(clippy::unwrap_used, clippy::expect_used)]
//! CLI command tests.

use tscat::cli::{self, LookupRequest};
use tscat::config::Config;
use tscat::services::validate::Severity;
use tscat_test_utils::{assert, fixtures, temp_dir, test_context, test_message, test_ts};

fn config() -> Config {
    Config {
        translations_dir: fixtures::translations_dir(),
        ..Config::default()
    }
}

fn lookup(config: &Config, request: &LookupRequest) -> String {
    let mut out = Vec::new();
    cli::cmd_lookup(&mut out, config, request).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_check_shipped_catalog() {
    let mut out = Vec::new();
    cli::cmd_check(&mut out, &[fixtures::main_fr()], Severity::Error).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert::contains(&out, "main_fr.ts: 0 error(s)");
}

#[test]
fn test_check_reports_failures() {
    let dir = temp_dir("check");
    let path = dir.join("broken.ts");
    let ts = test_ts("fr_FR")
        .with_context(test_context("Alerts").with_message(test_message("%1 left", "restant")))
        .render();
    std::fs::write(&path, ts).unwrap();

    let mut out = Vec::new();
    let err = cli::cmd_check(&mut out, &[path], Severity::Warning).unwrap_err();
    assert::contains(&err.to_string(), "1 catalog(s) failed validation");
    let out = String::from_utf8(out).unwrap();
    assert::contains(&out, "[Alerts] \"%1 left\": placeholder mismatch, missing %1");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_check_continues_past_unreadable_file() {
    let missing = fixtures::translations_dir().join("nope.ts");
    let mut out = Vec::new();
    let err = cli::cmd_check(&mut out, &[missing, fixtures::main_fr()], Severity::Error)
        .unwrap_err();
    assert::contains(&err.to_string(), "1 catalog(s) failed validation");

    let out = String::from_utf8(out).unwrap();
    assert::contains(&out, "nope.ts: failed to load");
    assert::contains(&out, "main_fr.ts: 0 error(s)");
}

#[test]
fn test_lookup_without_catalog_serves_source() {
    // main_en has no catalog on disk.
    let request = LookupRequest {
        context: "InputDialog".to_string(),
        source: "Cancel".to_string(),
        ..LookupRequest::default()
    };
    assert_eq!(lookup(&config(), &request), "Cancel\n");
}

#[test]
fn test_lookup_french_plural() {
    let request = LookupRequest {
        language: Some("main_fr".to_string()),
        context: "QObject".to_string(),
        source: "%n minute(s) ago".to_string(),
        count: Some(3),
        ..LookupRequest::default()
    };
    assert_eq!(lookup(&config(), &request), "il y a 3 minutes\n");
}

#[test]
fn test_lookup_through_fallback() {
    let config = Config {
        default_language: "main_en".to_string(),
        fallback_language: Some("main_fr".to_string()),
        ..config()
    };
    let request = LookupRequest {
        context: "InputDialog".to_string(),
        source: "Cancel".to_string(),
        ..LookupRequest::default()
    };
    assert_eq!(lookup(&config, &request), "Annuler\n");
}

#[test]
fn test_lookup_invalid_catalog_fails() {
    let dir = temp_dir("lookup-invalid");
    std::fs::write(dir.join("main_fr.ts"), "<TS><context>").unwrap();
    let config = Config {
        translations_dir: dir.clone(),
        ..Config::default()
    };
    let request = LookupRequest {
        language: Some("main_fr".to_string()),
        context: "InputDialog".to_string(),
        source: "Cancel".to_string(),
        ..LookupRequest::default()
    };

    let err = cli::cmd_lookup(&mut Vec::new(), &config, &request).unwrap_err();
    assert::contains(&err.to_string(), "failed to load language 'main_fr'");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_stats_table() {
    let mut out = Vec::new();
    cli::cmd_stats(&mut out, &fixtures::main_fr()).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("CONTEXT"));
    let overall = out.lines().last().unwrap();
    assert!(overall.starts_with("(all)"));
    assert::contains(overall, " 361 ");
    assert::contains(overall, " 263 ");
    assert::contains(overall, " 98 ");
}

#[test]
fn test_export_json() {
    let mut out = Vec::new();
    cli::cmd_export(&mut out, &fixtures::main_fr()).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    tscat_test_utils::assert::has_key(&json, "contexts");
    assert_eq!(json["language"], "fr_FR");
    assert_eq!(json["contexts"].as_array().unwrap().len(), 43);
}

#[test]
fn test_languages_table() {
    let mut out = Vec::new();
    cli::cmd_languages(&mut out, &config()).unwrap();
    let out = String::from_utf8(out).unwrap();
    let english = out.lines().find(|l| l.starts_with("English")).unwrap();
    assert::contains(english, "main_en");
    assert::contains(english, "source");
    let french = out.lines().find(|l| l.starts_with("Français")).unwrap();
    assert::contains(french, "361");
    assert::contains(french, "ok");
}

#[test]
fn test_shipped_catalog_is_canonical() {
    let mut out = Vec::new();
    cli::cmd_normalize(&mut out, &fixtures::main_fr(), true).unwrap();
    assert::contains(&String::from_utf8(out).unwrap(), "already canonical");
}
