//! Generate a Django settings file, once, from a defaults module and a handful
//! of environment-provided inputs.
//!
//! ```ignore
//! Letsconfig::builder()
//!     .config_path("/srv/mysite/settings.ini")
//!     .defaults("mysite.settings.base")
//!     .handle(&Action::Write)?;
//! ```
//!
//! That call checks the destination does not exist, resolves every input from
//! explicit values or environment variables, loads the defaults module,
//! assembles the full settings mapping, and writes it as an indented
//! key-value file whose values are Python literals.
//!
//! # Inputs
//!
//! Inputs are a confique struct ([`Inputs`]). Each field declares its
//! environment variable with `#[config(env = ...)]`:
//!
//! | Input | Env var |
//! |-------|---------|
//! | `cache_path` | `DJANGO_CACHE_PATH` |
//! | `project_path` | `DJANGO_PROJECT_PATH` |
//! | `log_path` | `DJANGO_LOG_PATH` |
//! | `media_root` | `DJANGO_MEDIA_ROOT` |
//! | `static_path` | `DJANGO_STATIC_PATH` |
//! | `static_root` | `DJANGO_STATIC_ROOT` |
//! | `project_template_dir` | `DJANGO_PROJECT_TEMPLATES_PATH` |
//! | `configuration_name` | `DJANGO_CONFIGURATION_DESC` |
//! | `db_password` | `DEFAULT_DATABASE_PASSWORD` |
//! | `db_user` | `DEFAULT_DATABASE_USER` |
//! | `db_name` | `DEFAULT_DATABASE_NAME` |
//! | `db_engine` | `DATABASE_ENGINE` |
//! | `project` | `DJANGO_PROJECT` |
//! | `admin_name` / `admin_email` | `DJANGO_ADMIN_NAME` / `DJANGO_ADMIN_EMAIL` |
//!
//! Explicit values ([`input()`](LetsconfigBuilder::input),
//! [`inputs_from()`](LetsconfigBuilder::inputs_from), CLI flags) win over the
//! environment. An empty string counts as not supplied. Every missing required
//! input is reported at once:
//!
//! ```text
//! You did not enter a value for cache_path, db_password
//! ```
//!
//! # Defaults
//!
//! The defaults module is a TOML or JSON file named like a Python module:
//! `mysite.settings.base` is looked up as `mysite/settings/base.toml` (then
//! `.json`) under each [`SearchPath`]. Only upper-case top-level keys are
//! settings; everything else is ignored.
//!
//! # Assembly
//!
//! Computed settings overlay the defaults key by key. A `configuration_name`
//! of exactly `Prod` adds the production hardening; any other label turns on
//! `DEBUG` and the debug toolbar. [`celery()`](LetsconfigBuilder::celery)
//! adds the broker and worker settings.
//!
//! # Output
//!
//! Scalars are written as `KEY = <literal>`. Dict values become sections,
//! `[KEY]` at the top level and `[[KEY]]` one level down, each level indented
//! four more spaces. An existing file is never overwritten.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) provides
//! [`GenerateArgs`], which the `letsconfig` binary flattens into its parser.
//! Without clap, construct an [`Action`] directly.

pub mod error;
pub mod types;
pub mod value;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod defaults;
mod env;
mod inputs;
mod ops;
mod overrides;
mod render;
mod repr;
mod settings;

#[cfg(test)]
mod fixtures;

pub use builder::{Generator, Letsconfig, LetsconfigBuilder};
#[cfg(feature = "clap")]
pub use cli::{GenerateArgs, InputArgs};
pub use error::LetsconfigError;
pub use inputs::{Inputs, PRODUCTION, ResolvedInputs};
pub use ops::Outcome;
pub use render::render;
pub use repr::{repr_float, repr_str};
pub use settings::generate_secret_key;
pub use types::{Action, SearchPath};
pub use value::{Dict, Value};
