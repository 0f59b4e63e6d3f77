use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LetsconfigError {
    #[error("Configuration file '{}' already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("You did not enter a value for {}", .0.join(", "))]
    MissingInputs(Vec<&'static str>),

    #[error("Unknown input '{0}'")]
    UnknownInput(String),

    #[error("Defaults '{name}' not found in: {searched}")]
    DefaultsNotFound { name: String, searched: String },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Defaults file {0} must contain a table at the top level")]
    NotATable(PathBuf),

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Config path is required, call .config_path() on the builder")]
    ConfigPathRequired,

    #[error("Defaults name is required, call .defaults() on the builder")]
    DefaultsRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_inputs_lists_every_field() {
        let err = LetsconfigError::MissingInputs(vec!["cache_path", "db_user"]);
        assert_eq!(
            err.to_string(),
            "You did not enter a value for cache_path, db_user"
        );
    }

    #[test]
    fn already_exists_names_the_file() {
        let err = LetsconfigError::AlreadyExists("/srv/site/settings.ini".into());
        assert!(err.to_string().contains("/srv/site/settings.ini"));
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn config_path_required_formats() {
        let err = LetsconfigError::ConfigPathRequired;
        assert!(err.to_string().contains("config_path"));
    }
}
