//! Built-in extractors for IPython magics
//!
//! The stock extractor set for `python` host documents: `%%bigquery` and
//! `%%sql`/`%sql` produce SQL, `%%R`/`%R` produce R (persistent - rpy2
//! shares one R namespace across cells), and the presentation magics
//! (`%%html`, `%%js`, `%%javascript`, `%%markdown`, `%%latex`) produce
//! standalone fragments.
//!
//! Note on pattern syntax: `.` never matches a newline here; bodies that
//! span lines use an explicit `[\s\S]` class.

use crate::extractor::ExtractorOptions;
use crate::manifest::ExtractorManifest;
use crate::registry::ExtractorRegistry;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Matches connection strings such as `postgres://user@host/db`.
const SQL_URL_PATTERN: &str = "(?:(?:.*?)://(?:.*))";

// note: -a/--connection_arguments and -f/--file are not supported yet
const BIGQUERY_SINGLE_ARGUMENT_OPTIONS: &[&str] = &[
    "--destination_table",
    "--project",
    "--use_bqstorage_api",
    "--use_rest_api",
    "--use_legacy_sql",
    "--verbose",
    "--params",
];
const BIGQUERY_ZERO_ARGUMENT_OPTIONS: &[&str] = &["-l", "--connections"];

static BIGQUERY_COMMAND_PATTERN: Lazy<String> = Lazy::new(|| {
    let single: Vec<String> = BIGQUERY_SINGLE_ARGUMENT_OPTIONS
        .iter()
        .map(|option| format!(r"{option} \w+"))
        .collect();
    format!(
        "(?:{}|{})",
        BIGQUERY_ZERO_ARGUMENT_OPTIONS.join("|"),
        single.join("|")
    )
});

static BIGQUERY_PATTERN: Lazy<String> = Lazy::new(|| {
    format!(
        r"^%%bigquery(?: (?:{url}|{command}|(?:\w+ << )|(?:\w+@\w+)))?\n?((?:.+\n)?(?:[\s\S]*))",
        url = SQL_URL_PATTERN,
        command = *BIGQUERY_COMMAND_PATTERN,
    )
});

static SQL_CELL_PATTERN: Lazy<String> = Lazy::new(|| {
    format!(
        r"^%%sql\b(?: (?:{SQL_URL_PATTERN}|(?:\w+ << )|(?:\w+@\w+)))?\n?((?:.+\n)?(?:[\s\S]*))"
    )
});

static SQL_LINE_PATTERN: Lazy<String> =
    Lazy::new(|| format!(r"^%sql (?:{SQL_URL_PATTERN} )?(.*)\n?"));

fn sql(pattern: &str, standalone: bool) -> ExtractorOptions {
    ExtractorOptions {
        language: "sql".into(),
        pattern: pattern.into(),
        capture_groups: vec![1],
        standalone,
        file_extension: "sql".into(),
    }
}

fn rpy2(pattern: &str) -> ExtractorOptions {
    ExtractorOptions {
        language: "r".into(),
        pattern: pattern.into(),
        capture_groups: vec![1],
        standalone: false,
        file_extension: "r".into(),
    }
}

// The \b keeps one magic from claiming a longer one (%%js vs %%javascript).
fn cell_magic(magic: &str, language: &str, extension: &str) -> ExtractorOptions {
    ExtractorOptions {
        language: language.into(),
        pattern: format!(r"^%%{magic}\b(?: .*)?\n?([\s\S]*)"),
        capture_groups: vec![1],
        standalone: true,
        file_extension: extension.into(),
    }
}

/// The stock extractor configurations, as a manifest.
pub fn default_manifest() -> ExtractorManifest {
    let python = vec![
        sql(&BIGQUERY_PATTERN, true),
        sql(&SQL_CELL_PATTERN, true),
        sql(&SQL_LINE_PATTERN, false),
        rpy2(r"^%%R\b(?: .*)?\n?([\s\S]*)"),
        rpy2(r"^%R\b(?: -\w \S+)* ?(.*)\n?"),
        cell_magic("html", "html", "html"),
        cell_magic("js", "js", "js"),
        cell_magic("javascript", "js", "js"),
        cell_magic("markdown", "markdown", "md"),
        cell_magic("latex", "latex", "tex"),
    ];

    let mut languages = HashMap::new();
    languages.insert("python".to_string(), python);
    ExtractorManifest { languages }
}

/// A registry pre-populated with the stock extractors.
///
/// Every built-in pattern compiles and validates; a unit test pins that
/// down, so the skipped-entry path is unreachable here.
pub fn default_registry() -> ExtractorRegistry {
    let (registry, warnings) = default_manifest().into_registry();
    debug_assert!(warnings.is_empty(), "built-in extractors must validate");
    registry
}
