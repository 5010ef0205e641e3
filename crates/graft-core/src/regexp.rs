//! Pattern-based extractor
//!
//! The dominant extractor implementation: a regular expression with
//! designated capture groups. The pattern compiles once at registration,
//! where configuration errors surface; matching itself is total.

use crate::extractor::{ExtractorOptions, ForeignExtractor, ForeignSnippet};
use crate::position::{LineIndex, Range};
use eyre::{Result, WrapErr, bail};
use regex::{Regex, RegexBuilder};

/// Extractor backed by a textual pattern with capture groups.
///
/// The pattern is applied with global, multi-line semantics: `^` and `$`
/// match at line boundaries, and the scan walks every non-overlapping match
/// in the block. For each match the designated capture groups are
/// concatenated in declared order to form the foreign text, and the snippet
/// range is the envelope of the matched groups.
#[derive(Debug)]
pub struct RegexpExtractor {
    language: String,
    pattern: String,
    regex: Regex,
    capture_groups: Vec<usize>,
    standalone: bool,
    file_extension: String,
}

impl RegexpExtractor {
    /// Compile and validate an extractor configuration.
    ///
    /// Fails when the pattern does not compile, when no capture groups are
    /// declared, or when an index names a group the pattern does not have.
    /// Group 0 (the whole match) is rejected: extracting it would pull
    /// host-attributed text into the foreign buffer.
    pub fn new(options: ExtractorOptions) -> Result<Self> {
        let regex = RegexBuilder::new(&options.pattern)
            .multi_line(true)
            .build()
            .wrap_err_with(|| {
                format!(
                    "Failed to compile pattern for foreign language '{}'",
                    options.language
                )
            })?;

        if options.capture_groups.is_empty() {
            bail!(
                "Extractor for foreign language '{}' declares no capture groups",
                options.language
            );
        }
        for &index in &options.capture_groups {
            if index == 0 || index >= regex.captures_len() {
                bail!(
                    "Capture group {} does not exist in pattern for foreign language '{}' \
                     (pattern has {} groups)",
                    index,
                    options.language,
                    regex.captures_len() - 1
                );
            }
        }

        Ok(Self {
            language: options.language,
            pattern: options.pattern,
            regex,
            capture_groups: options.capture_groups,
            standalone: options.standalone,
            file_extension: options.file_extension,
        })
    }

    /// The pattern source this extractor was registered with.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl ForeignExtractor for RegexpExtractor {
    fn language(&self) -> &str {
        &self.language
    }

    fn standalone(&self) -> bool {
        self.standalone
    }

    fn file_extension(&self) -> &str {
        &self.file_extension
    }

    fn has_cell_magic(&self) -> bool {
        self.pattern.starts_with("^%%")
    }

    fn extract(&self, host_text: &str) -> Vec<ForeignSnippet> {
        let index = LineIndex::new(host_text);
        let mut snippets = Vec::new();

        for captures in self.regex.captures_iter(host_text) {
            let mut text = String::new();
            let mut span: Option<(usize, usize)> = None;

            for &group in &self.capture_groups {
                // Optional groups that did not participate contribute nothing.
                let Some(matched) = captures.get(group) else {
                    continue;
                };
                text.push_str(matched.as_str());
                span = Some(match span {
                    None => (matched.start(), matched.end()),
                    Some((start, end)) => {
                        (start.min(matched.start()), end.max(matched.end()))
                    }
                });
            }

            let Some((start, end)) = span else {
                continue;
            };
            snippets.push(ForeignSnippet {
                text,
                range: Range::new(index.position(start), index.position(end)),
            });
        }

        snippets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn sql_line_extractor() -> RegexpExtractor {
        RegexpExtractor::new(ExtractorOptions {
            language: "sql".into(),
            pattern: r"^SELECT (.*)$".into(),
            capture_groups: vec![1],
            standalone: true,
            file_extension: "sql".into(),
        })
        .expect("pattern compiles")
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let extractor = sql_line_extractor();
        assert!(extractor.extract("print('hello')\n").is_empty());
    }

    #[test]
    fn capture_range_excludes_pattern_prefix() {
        let extractor = sql_line_extractor();
        let snippets = extractor.extract("x = 1\nSELECT a, b\ny = 2\n");
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "a, b");
        assert_eq!(
            snippets[0].range,
            Range::new(Position::new(1, 7), Position::new(1, 11))
        );
    }

    #[test]
    fn scans_all_matches_globally() {
        let extractor = sql_line_extractor();
        let snippets = extractor.extract("SELECT 1\nSELECT 2\n");
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].text, "1");
        assert_eq!(snippets[1].text, "2");
    }

    #[test]
    fn explicit_class_crosses_line_boundaries() {
        let extractor = RegexpExtractor::new(ExtractorOptions {
            language: "sql".into(),
            pattern: r"^%%sql\n([\s\S]*)".into(),
            capture_groups: vec![1],
            standalone: true,
            file_extension: "sql".into(),
        })
        .expect("pattern compiles");

        let snippets = extractor.extract("%%sql\nSELECT 1\nFROM t\n");
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "SELECT 1\nFROM t\n");
        assert_eq!(
            snippets[0].range,
            Range::new(Position::new(1, 0), Position::new(3, 0))
        );
    }

    #[test]
    fn groups_concatenate_in_declared_order() {
        let extractor = RegexpExtractor::new(ExtractorOptions {
            language: "sql".into(),
            pattern: r"^(\w+) -- (\w+)$".into(),
            capture_groups: vec![2, 1],
            standalone: true,
            file_extension: "sql".into(),
        })
        .expect("pattern compiles");

        let snippets = extractor.extract("left -- right\n");
        assert_eq!(snippets.len(), 1);
        // Declared order, not source order.
        assert_eq!(snippets[0].text, "rightleft");
        // Envelope of both groups.
        assert_eq!(
            snippets[0].range,
            Range::new(Position::new(0, 0), Position::new(0, 13))
        );
    }

    #[test]
    fn cell_magic_detection_follows_the_anchor() {
        let cell = RegexpExtractor::new(ExtractorOptions {
            language: "sql".into(),
            pattern: r"^%%sql\n([\s\S]*)".into(),
            capture_groups: vec![1],
            standalone: true,
            file_extension: "sql".into(),
        })
        .expect("pattern compiles");
        assert!(cell.has_cell_magic());

        let line = sql_line_extractor();
        assert!(!line.has_cell_magic());
    }

    #[test]
    fn invalid_pattern_is_a_registration_error() {
        let result = RegexpExtractor::new(ExtractorOptions {
            language: "sql".into(),
            pattern: "(unclosed".into(),
            capture_groups: vec![1],
            standalone: true,
            file_extension: "sql".into(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_group_is_a_registration_error() {
        let result = RegexpExtractor::new(ExtractorOptions {
            language: "sql".into(),
            pattern: r"^SELECT (.*)$".into(),
            capture_groups: vec![2],
            standalone: true,
            file_extension: "sql".into(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn group_zero_is_rejected() {
        let result = RegexpExtractor::new(ExtractorOptions {
            language: "sql".into(),
            pattern: r"^SELECT (.*)$".into(),
            capture_groups: vec![0],
            standalone: true,
            file_extension: "sql".into(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn empty_group_list_is_rejected() {
        let result = RegexpExtractor::new(ExtractorOptions {
            language: "sql".into(),
            pattern: r"^SELECT (.*)$".into(),
            capture_groups: vec![],
            standalone: true,
            file_extension: "sql".into(),
        });
        assert!(result.is_err());
    }
}
