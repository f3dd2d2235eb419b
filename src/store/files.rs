// src/store/files.rs

//! Whole-file marshalling: line-oriented text and comma-separated tables.
//!
//! Reads load the entire file into memory; writes replace the full contents.
//! There is no streaming and no partial-write recovery.

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::errors::Result;

/// Read a text file as trimmed lines, one logical record per line.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))?;
    Ok(contents.lines().map(|l| l.trim().to_string()).collect())
}

/// Replace a text file's contents with the given lines.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut contents = lines.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    fs::write(path, contents).with_context(|| format!("writing file {:?}", path))?;
    Ok(())
}

/// Read a comma-separated file as an in-memory table.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))?;
    Ok(parse_rows(&contents))
}

/// Replace a comma-separated file's contents with the given table.
pub fn write_rows(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    fs::write(path, render_rows(rows)).with_context(|| format!("writing file {:?}", path))?;
    Ok(())
}

/// Parse comma-separated content with double-quote escaping.
///
/// Quoted fields may contain commas, quotes (doubled) and newlines. Both
/// `\n` and `\r\n` row terminators are accepted.
pub fn parse_rows(contents: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = contents.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    // Final row without a trailing newline.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Render a table as comma-separated content, quoting where needed.
pub fn render_rows(rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    for row in rows {
        let rendered: Vec<String> = row.iter().map(|f| quote_field(f)).collect();
        out.push_str(&rendered.join(","));
        out.push('\n');
    }
    out
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
