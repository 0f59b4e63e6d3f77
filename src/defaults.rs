//! Defaults discovery and loading.
//!
//! The defaults source is a settings file identified by name:
//!
//! - A name ending in `.toml` or `.json` is used as a path directly.
//! - Any other name is a dotted module path. `project.settings.base` maps to
//!   `project/settings/base`, tried as `.toml` then `.json` in every search
//!   directory. Directories are checked from the **highest-priority end** and
//!   the first file found wins.
//!
//! Only top-level keys that look like setting names (upper-case) are copied.
//! Nested values come through verbatim.

use std::path::{Path, PathBuf};

use crate::error::LetsconfigError;
use crate::types::SearchPath;
use crate::value::{Dict, Value};

/// Application name used for the platform config directory.
pub const APP_NAME: &str = "letsconfig";

const EXTENSIONS: [&str; 2] = ["toml", "json"];

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", APP_NAME)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Expand search paths into concrete directories (priority-ascending).
/// Paths that cannot be resolved are dropped.
pub fn expand_search_paths(search_paths: &[SearchPath]) -> Vec<PathBuf> {
    search_paths.iter().filter_map(resolve_search_path).collect()
}

/// Find the defaults file for `name`.
pub fn locate(name: &str, search_paths: &[SearchPath]) -> Result<PathBuf, LetsconfigError> {
    let direct = Path::new(name);
    if has_known_extension(direct) {
        if direct.is_file() {
            return Ok(direct.to_path_buf());
        }
        return Err(LetsconfigError::DefaultsNotFound {
            name: name.into(),
            searched: direct.display().to_string(),
        });
    }

    let relative: PathBuf = name.split('.').collect();
    let dirs = expand_search_paths(search_paths);
    for dir in dirs.iter().rev() {
        for ext in EXTENSIONS {
            let candidate = dir.join(&relative).with_extension(ext);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "found defaults");
                return Ok(candidate);
            }
        }
    }

    Err(LetsconfigError::DefaultsNotFound {
        name: name.into(),
        searched: dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

fn has_known_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXTENSIONS.contains(&e))
}

/// Locate and load the defaults for `name`.
pub fn load(name: &str, search_paths: &[SearchPath]) -> Result<Dict, LetsconfigError> {
    let path = locate(name, search_paths)?;
    load_file(&path)
}

/// Load a defaults file and keep its setting-named entries, in file order.
pub fn load_file(path: &Path) -> Result<Dict, LetsconfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| LetsconfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let all = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_json(path, &content)?,
        _ => parse_toml(path, &content)?,
    };

    let mut defaults = Dict::new();
    for (key, value) in all {
        if is_setting_name(&key) {
            defaults.insert(key, value);
        } else {
            tracing::debug!(key = %key, "skipping non-setting key in defaults");
        }
    }
    Ok(defaults)
}

/// Whether a key names a setting: it has at least one cased character and no
/// lower-case ones. `SITE_ID` and `X_FRAME_OPTIONS` qualify; `_private`,
/// `helper`, and `123` do not.
pub fn is_setting_name(key: &str) -> bool {
    key.chars().any(char::is_uppercase) && !key.chars().any(char::is_lowercase)
}

fn parse_toml(path: &Path, content: &str) -> Result<Dict, LetsconfigError> {
    let table: toml::Table = toml::from_str(content).map_err(|e| LetsconfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(table.into_iter().map(|(k, v)| (k, from_toml(v))).collect())
}

fn parse_json(path: &Path, content: &str) -> Result<Dict, LetsconfigError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| LetsconfigError::JsonError {
            path: path.to_path_buf(),
            source: e,
        })?;
    let serde_json::Value::Object(map) = value else {
        return Err(LetsconfigError::NotATable(path.to_path_buf()));
    };
    map.into_iter()
        .map(|(k, v)| {
            let value = from_json(&k, v);
            value.map(|value| (k, value))
        })
        .collect()
}

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Str(s),
        toml::Value::Integer(i) => Value::Int(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::Str(dt.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(t) => Value::Dict(t.into_iter().map(|(k, v)| (k, from_toml(v))).collect()),
    }
}

/// Convert a JSON value. `key` is the dotted path, used in errors.
fn from_json(key: &str, value: serde_json::Value) -> Result<Value, LetsconfigError> {
    Ok(match value {
        serde_json::Value::Null => Value::None,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if n.is_f64()
                && let Some(f) = n.as_f64()
            {
                Value::Float(f)
            } else {
                return Err(LetsconfigError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("integer {n} does not fit in 64 bits"),
                });
            }
        }
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => Value::List(
            items
                .into_iter()
                .map(|item| from_json(key, item))
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(map) => {
            let mut dict = Dict::new();
            for (k, v) in map {
                let value = from_json(&format!("{key}.{k}"), v)?;
                dict.insert(k, value);
            }
            Value::Dict(dict)
        }
    })
}
