//! End-to-end properties of the extraction engine

use graft_core::{
    EditorId, ExtractionEngine, ExtractorOptions, ExtractorRegistry, HostBlock, Position, Range,
    RegexpExtractor, VirtualWorkspace, magics,
};
use std::sync::Arc;

fn registry_with(options: Vec<ExtractorOptions>) -> ExtractorRegistry {
    let mut registry = ExtractorRegistry::new();
    for config in options {
        registry.register(
            "python",
            Arc::new(RegexpExtractor::new(config).expect("pattern compiles")),
        );
    }
    registry
}

fn sql_options(pattern: &str, standalone: bool) -> ExtractorOptions {
    ExtractorOptions {
        language: "sql".into(),
        pattern: pattern.into(),
        capture_groups: vec![1],
        standalone,
        file_extension: "sql".into(),
    }
}

/// Byte offset of a position within `text` (test helper).
fn offset_of(text: &str, pos: Position) -> usize {
    if pos.line == 0 {
        return pos.column;
    }
    let mut line = 0;
    for (i, _) in text.match_indices('\n') {
        line += 1;
        if line == pos.line {
            return i + 1 + pos.column;
        }
    }
    text.len()
}

#[test]
fn no_registered_pattern_matches_yields_empty_map() {
    let registry = registry_with(vec![sql_options(r"^%%sql\n([\s\S]*)", true)]);
    let engine = ExtractionEngine::new(&registry);
    let editor = EditorId::new("cell");
    let block = HostBlock::new("import os\nprint(os.name)\n", Position::ZERO, &editor);

    assert!(engine.extract(&block, "python").is_empty());
}

#[test]
fn capture_lines_are_relative_to_the_supplied_origin() {
    let registry = registry_with(vec![sql_options(r"^%%sql\n([\s\S]*)", true)]);
    let engine = ExtractionEngine::new(&registry);
    let editor = EditorId::new("cell");

    // This cell starts at line 20 of the host notebook.
    let text = "%%sql\nSELECT a\nFROM t\n";
    let block = HostBlock::new(text, Position::new(20, 0), &editor);
    let map = engine.extract(&block, "python");

    assert_eq!(map.len(), 1);
    let (range, block) = map.iter().next().expect("one block");
    // Capture spans lines 1..=3 of the cell, so 21..=23 of the host.
    assert_eq!(*range, Range::new(Position::new(21, 0), Position::new(23, 0)));
    assert_eq!(block.text, "SELECT a\nFROM t\n");
}

#[test]
fn extraction_is_idempotent() {
    let registry = magics::default_registry();
    let engine = ExtractionEngine::new(&registry);
    let editor = EditorId::new("cell");
    let text = "%sql SELECT a\n%%html\n<p>x</p>\n";
    let block = HostBlock::new(text, Position::new(3, 0), &editor);

    let first = engine.extract(&block, "python");
    let second = engine.extract(&block, "python");
    assert_eq!(first, second);
}

#[test]
fn spans_and_gaps_reconstruct_the_host_text() {
    let registry = registry_with(vec![sql_options(r"^%sql (.*\n)", false)]);
    let engine = ExtractionEngine::new(&registry);
    let editor = EditorId::new("cell");
    let text = "x = 1\n%sql SELECT a\ny = 2\n%sql SELECT b\nz = 3\n";
    let block = HostBlock::new(text, Position::ZERO, &editor);

    let map = engine.extract(&block, "python");
    assert_eq!(map.len(), 2);

    let mut reconstructed = String::new();
    let mut cursor = 0;
    for (range, block) in &map {
        let start = offset_of(text, range.start);
        let end = offset_of(text, range.end);
        // The extracted text is exactly the host text under the range.
        assert_eq!(block.text, &text[start..end]);
        reconstructed.push_str(&text[cursor..start]);
        reconstructed.push_str(&text[start..end]);
        cursor = end;
    }
    reconstructed.push_str(&text[cursor..]);
    assert_eq!(reconstructed, text);
}

#[test]
fn standalone_passes_produce_distinct_buffers() {
    let registry = registry_with(vec![sql_options(r"^%%sql\n([\s\S]*)", true)]);
    let engine = ExtractionEngine::new(&registry);
    let editor = EditorId::new("cell");
    let mut workspace = VirtualWorkspace::new();

    let block = HostBlock::new("%%sql\nSELECT 1\n", Position::ZERO, &editor);
    workspace.apply(&engine.extract(&block, "python"));
    let first = workspace.standalone_buffers()[0].clone();

    let block = HostBlock::new("%%sql\nSELECT 2\n", Position::ZERO, &editor);
    workspace.apply(&engine.extract(&block, "python"));
    let second = workspace.standalone_buffers()[0].clone();

    // No continuity: the first buffer is gone, replaced by a fresh one.
    assert_eq!(first.text, "SELECT 1\n");
    assert_eq!(second.text, "SELECT 2\n");
    assert_eq!(workspace.len(), 1);
}

#[test]
fn persistent_identity_tracks_the_latest_pass() {
    let registry = registry_with(vec![sql_options(r"^%sql (.*\n)", false)]);
    let engine = ExtractionEngine::new(&registry);
    let editor = EditorId::new("cell");
    let mut workspace = VirtualWorkspace::new();

    let block = HostBlock::new("%sql SELECT 1\n", Position::ZERO, &editor);
    workspace.apply(&engine.extract(&block, "python"));

    let block = HostBlock::new("%sql SELECT 2\n", Position::ZERO, &editor);
    workspace.apply(&engine.extract(&block, "python"));

    let buffer = workspace.get("python-sql.sql").expect("one persistent buffer");
    assert_eq!(buffer.text, "SELECT 2\n");
    assert_eq!(workspace.len(), 1);
}

#[test]
fn bigquery_magic_extracts_standalone_sql() {
    let registry = magics::default_registry();
    let engine = ExtractionEngine::new(&registry);
    let editor = EditorId::new("cell");
    let block = HostBlock::new("%%bigquery\nSELECT 1\n", Position::ZERO, &editor);

    let map = engine.extract(&block, "python");
    assert_eq!(map.len(), 1);
    let (_, block) = map.iter().next().expect("one block");
    assert_eq!(block.language, "sql");
    assert_eq!(block.text, "SELECT 1\n");
    assert!(block.standalone);
}

#[test]
fn middle_line_match_leaves_surrounding_host_lines_untouched() {
    let registry = registry_with(vec![sql_options(r"^(SELECT .*\n)", true)]);
    let engine = ExtractionEngine::new(&registry);
    let editor = EditorId::new("cell");
    let text = "print(\"a\")\nSELECT 1\nprint(\"b\")\n";
    let block = HostBlock::new(text, Position::ZERO, &editor);

    let map = engine.extract(&block, "python");
    assert_eq!(map.len(), 1);
    let (range, block) = map.iter().next().expect("one block");
    assert_eq!(*range, Range::new(Position::new(1, 0), Position::new(2, 0)));
    assert_eq!(block.text, "SELECT 1\n");
}
