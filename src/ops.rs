//! Operation results returned to the caller for display.

use std::fmt;
use std::path::PathBuf;

/// Result of an [`Action`](crate::Action).
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The settings file was written.
    Written { path: PathBuf, settings: usize },
    /// The rendered settings file, not written anywhere.
    Preview(String),
    /// Resolved inputs, in declaration order.
    Inputs { entries: Vec<(String, String)> },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Written { path, settings } => {
                writeln!(f, "Wrote {settings} settings to {}", path.display())
            }
            Outcome::Preview(text) => write!(f, "{text}"),
            Outcome::Inputs { entries } => {
                let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
                for (key, value) in entries {
                    writeln!(f, "{key:<width$}  {value}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_mentions_path_and_count() {
        let out = Outcome::Written {
            path: "/srv/site/settings.ini".into(),
            settings: 42,
        };
        assert_eq!(out.to_string(), "Wrote 42 settings to /srv/site/settings.ini\n");
    }

    #[test]
    fn preview_is_verbatim() {
        let out = Outcome::Preview("DEBUG = True\n".into());
        assert_eq!(out.to_string(), "DEBUG = True\n");
    }

    #[test]
    fn inputs_are_aligned() {
        let out = Outcome::Inputs {
            entries: vec![
                ("db_user".into(), "web".into()),
                ("timezone".into(), "UTC".into()),
            ],
        };
        assert_eq!(out.to_string(), "db_user   web\ntimezone  UTC\n");
    }

    #[test]
    fn empty_inputs_render_nothing() {
        let out = Outcome::Inputs { entries: vec![] };
        assert_eq!(out.to_string(), "");
    }
}
