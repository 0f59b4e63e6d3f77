//! Render a settings mapping into the ConfigObj "unrepr" file layout, and
//! write it to a fresh file.
//!
//! Layout rules, per section:
//!
//! - Non-dict values are scalars, written as `KEY = <python literal>`.
//! - Dict values become sub-sections, marked `[KEY]`, `[[KEY]]`, ... by depth.
//! - Scalars are written before sub-sections; each group keeps insertion order.
//! - Entries are indented four spaces per depth level. A section marker sits at
//!   its parent's indentation.
//!
//! Dicts nested inside lists or tuples stay inline as Python dict literals.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::LetsconfigError;
use crate::value::{Dict, Value};

const INDENT: &str = "    ";

/// Render the whole mapping. The result always ends with a newline.
pub fn render(settings: &Dict) -> String {
    let mut lines = Vec::new();
    render_section(settings, 0, &mut lines);
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_section(section: &Dict, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);

    for (key, value) in section.iter() {
        if !matches!(value, Value::Dict(_)) {
            lines.push(format!("{indent}{} = {value}", quote_key(key)));
        }
    }

    for (key, value) in section.iter() {
        if let Value::Dict(sub) = value {
            let open = "[".repeat(depth + 1);
            let close = "]".repeat(depth + 1);
            lines.push(format!("{indent}{open}{}{close}", quote_key(key)));
            render_section(sub, depth + 1, lines);
        }
    }
}

/// Quote a key when it holds characters the format treats as syntax.
fn quote_key(key: &str) -> String {
    let needs_quotes = key.is_empty()
        || key.trim() != key
        || key
            .chars()
            .any(|c| matches!(c, '#' | '=' | '[' | ']' | ',' | '"' | '\'' | '\n' | '\r'));
    if !needs_quotes {
        return key.to_string();
    }
    if key.contains('"') {
        format!("'{key}'")
    } else {
        format!("\"{key}\"")
    }
}

/// Write `content` to `path`, creating parent directories.
///
/// The file is opened with `create_new`, so a file that appeared after the
/// up-front existence check still is not overwritten.
pub fn write_new(path: &Path, content: &str) -> Result<(), LetsconfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| LetsconfigError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => LetsconfigError::AlreadyExists(path.to_path_buf()),
            _ => LetsconfigError::IoError {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

    file.write_all(content.as_bytes())
        .map_err(|e| LetsconfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
}
