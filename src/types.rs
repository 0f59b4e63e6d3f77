//! Plain types shared between the builder, the defaults loader, and the CLI.

use std::path::PathBuf;

/// Where to search for the defaults file.
///
/// Lists of search paths are **priority-ascending**: the last entry wins when
/// the same defaults name exists in more than one directory.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory for `letsconfig` (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".letsconfig")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}

/// What to do with the assembled settings, independent of any CLI framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Write the settings file. Refuses to overwrite.
    Write,
    /// Render the settings file to a string without touching disk.
    Preview,
    /// Show the resolved inputs. Missing inputs are listed, not rejected.
    ListInputs,
}
