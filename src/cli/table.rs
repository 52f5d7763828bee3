//! Table rendering for `geoips list ...`
//!
//! Rows are plain strings; long docstrings are word-wrapped so the tables stay
//! readable in a terminal.

use std::fmt;
use std::str::FromStr;

use console::measure_text_width;
use tabled::{builder::Builder, settings::Style};

/// Allowed values of `--table-style`
pub const TABLE_STYLES: &[&str] = &["fancy", "markdown", "plain", "ascii"];

/// Column width at which docstrings are wrapped
pub const DOCSTRING_WIDTH: usize = 60;

/// Border style of a rendered table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStyle {
    #[default]
    Fancy,
    Markdown,
    Plain,
    Ascii,
}

impl TableStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStyle::Fancy => "fancy",
            TableStyle::Markdown => "markdown",
            TableStyle::Plain => "plain",
            TableStyle::Ascii => "ascii",
        }
    }

    /// Parse a configured style, falling back to the default with a warning
    pub fn from_config(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(style = %name, "unknown table style in config, using fancy");
            TableStyle::default()
        })
    }
}

impl FromStr for TableStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fancy" => Ok(TableStyle::Fancy),
            "markdown" => Ok(TableStyle::Markdown),
            "plain" => Ok(TableStyle::Plain),
            "ascii" => Ok(TableStyle::Ascii),
            other => Err(format!("unknown table style '{other}'")),
        }
    }
}

impl fmt::Display for TableStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render `rows` under `headers` in the given style
pub fn render(headers: &[&str], rows: Vec<Vec<String>>, style: TableStyle) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    match style {
        TableStyle::Fancy => table.with(Style::modern_rounded()),
        TableStyle::Markdown => table.with(Style::markdown()),
        TableStyle::Plain => table.with(Style::blank()),
        TableStyle::Ascii => table.with(Style::ascii()),
    };
    table.to_string()
}

/// Wrap text to fit within a maximum width, breaking at word boundaries
pub fn wrap_text(text: &str, max_width: usize) -> String {
    // Don't wrap if text already fits or width is too small to be useful
    if measure_text_width(text) <= max_width || max_width < 5 {
        return text.to_string();
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let fits = measure_text_width(&current_line) + 1 + measure_text_width(word) <= max_width;
        if !current_line.is_empty() && fits {
            current_line.push(' ');
            current_line.push_str(word);
            continue;
        }
        if !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
        }

        // Word longer than the column: hard break
        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_width).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current_line = piece;
            }
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines.join("\n")
}
