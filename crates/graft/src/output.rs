//! Output formatting for block maps

use graft_core::BlockMap;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// JSON report for one extraction pass.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    pub host_language: String,
    pub blocks: Vec<BlockEntry>,
}

/// One block of the report, with the range flattened for easy consumption.
#[derive(Debug, Clone, Serialize)]
pub struct BlockEntry {
    pub identity: String,
    pub language: String,
    pub standalone: bool,
    pub editor: String,
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub text: String,
}

/// Render a block map in the requested format.
pub fn render_map(host_language: &str, map: &BlockMap, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(map),
        OutputFormat::Json => render_json(host_language, map),
    }
}

fn render_text(map: &BlockMap) -> String {
    if map.is_empty() {
        return "No foreign code found.\n".to_string();
    }

    let mut output = String::new();
    for (range, block) in map {
        let kind = if block.standalone {
            "standalone"
        } else {
            "persistent"
        };
        output.push_str(&format!(
            "{} {} ({}, {})\n",
            range.to_string().bold(),
            block.identity.canonical().cyan(),
            block.language,
            kind
        ));
        for line in block.text.lines() {
            output.push_str(&format!("   | {}\n", line.dimmed()));
        }
    }
    output
}

fn render_json(host_language: &str, map: &BlockMap) -> String {
    let report = ExtractReport {
        host_language: host_language.to_string(),
        blocks: map
            .iter()
            .map(|(range, block)| BlockEntry {
                identity: block.identity.canonical(),
                language: block.language.clone(),
                standalone: block.standalone,
                editor: block.editor.as_str().to_string(),
                start_line: range.start.line,
                start_column: range.start.column,
                end_line: range.end.line,
                end_column: range.end.column,
                text: block.text.clone(),
            })
            .collect(),
    };
    let mut json = serde_json::to_string_pretty(&report).expect("JSON serialization failed");
    json.push('\n');
    json
}
