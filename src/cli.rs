//! Clap adapter for letsconfig.
//!
//! Compiled only when the `clap` Cargo feature is enabled (on by default).
//! [`GenerateArgs`] can be flattened into any clap `#[derive(Parser)]` struct.
//! The bridge to the core is [`GenerateArgs::action()`] plus
//! [`GenerateArgs::builder()`]; everything else goes through the clap-free
//! [`LetsconfigBuilder`](crate::LetsconfigBuilder) API.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::builder::{Letsconfig, LetsconfigBuilder};
use crate::error::LetsconfigError;
use crate::types::{Action, SearchPath};

/// Arguments for generating a settings file.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Settings file to create. Must not exist yet.
    pub config_path: PathBuf,

    /// Defaults module (e.g. `mysite.settings.base`) or a `.toml`/`.json` file.
    #[arg(long, required_unless_present = "list_inputs")]
    pub defaults: Option<String>,

    /// Extra directory to look for the defaults module in. Repeatable; later
    /// directories take priority.
    #[arg(long = "search-path", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,

    #[command(flatten)]
    pub inputs: InputArgs,

    /// Print the rendered file instead of writing it.
    #[arg(long, conflicts_with = "list_inputs")]
    pub dry_run: bool,

    /// Print the resolved inputs and exit.
    #[arg(long)]
    pub list_inputs: bool,
}

/// Input flags. Each one overrides its environment variable.
///
/// Serialized into the builder by field name, so unset flags are skipped and
/// fall through to the environment.
#[derive(Debug, Default, Args, Serialize)]
pub struct InputArgs {
    /// Disk cache directory [env: DJANGO_CACHE_PATH]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<String>,

    /// Email backend class
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_backend: Option<String>,

    /// Django project directory [env: DJANGO_PROJECT_PATH]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,

    /// Log directory [env: DJANGO_LOG_PATH]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,

    /// [env: DJANGO_MEDIA_ROOT]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_root: Option<String>,

    /// [env: DJANGO_STATIC_PATH]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_path: Option<String>,

    /// [env: DJANGO_STATIC_ROOT]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_root: Option<String>,

    /// Project templates directory [env: DJANGO_PROJECT_TEMPLATES_PATH]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_template_dir: Option<String>,

    /// Environment label; `Prod` for production [env: DJANGO_CONFIGURATION_DESC]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_name: Option<String>,

    /// [env: DEFAULT_DATABASE_PASSWORD]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_password: Option<String>,

    /// [env: DEFAULT_DATABASE_USER]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_user: Option<String>,

    /// [env: DEFAULT_DATABASE_NAME]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,

    /// [env: DATABASE_ENGINE]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_engine: Option<String>,

    /// Package holding the `formats` module [env: DJANGO_PROJECT]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Include Celery broker and worker settings.
    #[arg(long)]
    pub celery: bool,

    /// [env: DJANGO_ADMIN_NAME]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_name: Option<String>,

    /// [env: DJANGO_ADMIN_EMAIL]
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_email: Option<String>,
}

impl GenerateArgs {
    /// `--list-inputs` wins, then `--dry-run`; otherwise write.
    pub fn action(&self) -> Action {
        if self.list_inputs {
            Action::ListInputs
        } else if self.dry_run {
            Action::Preview
        } else {
            Action::Write
        }
    }

    /// A builder carrying the destination, defaults source, search paths, and
    /// input flags. Environment variables stay enabled.
    pub fn builder(&self) -> Result<LetsconfigBuilder, LetsconfigError> {
        let mut builder = Letsconfig::builder().config_path(&self.config_path);
        if let Some(defaults) = &self.defaults {
            builder = builder.defaults(defaults);
        }
        for dir in &self.search_paths {
            builder = builder.add_search_path(SearchPath::Path(dir.clone()));
        }
        builder.inputs_from(&self.inputs)
    }
}
