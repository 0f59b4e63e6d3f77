//! Generator inputs: what the settings are computed from.
//!
//! Inputs resolve through three layers, highest priority first:
//!
//! ```text
//! Explicit values     .input() / .inputs_from() / CLI flags
//!        ↓ fall back to
//! Environment vars    #[config(env = "...")] on the field
//!        ↓ fall back to
//! Compiled defaults   #[config(default = ...)]
//! ```
//!
//! Resolution is pure: env vars arrive pre-collected in [`ResolveInput`], so the
//! whole pipeline is testable with synthetic data. Required inputs are checked
//! afterwards by [`Inputs::validate`], which reports every missing name at once.

use std::path::Path;

use confique::Config;
use serde::{Deserialize, Serialize};
use toml::Value;

use crate::env;
use crate::error::LetsconfigError;
use crate::overrides;

/// The configuration name that switches on production settings.
pub const PRODUCTION: &str = "Prod";

const REDACTED: &str = "<redacted>";
const NOT_SET: &str = "<not set>";

/// Raw inputs after layering, before required-field checks.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Inputs {
    /// Directory for the disk cache backend.
    #[config(env = "DJANGO_CACHE_PATH")]
    pub cache_path: Option<String>,

    /// Dotted path of the email backend class.
    #[config(default = "django.core.mail.backends.console.EmailBackend")]
    pub email_backend: String,

    /// Absolute path of the Django project; its last component is the project name.
    #[config(env = "DJANGO_PROJECT_PATH")]
    pub project_path: Option<String>,

    /// Directory that receives `django.log` and `celery.log`.
    #[config(env = "DJANGO_LOG_PATH")]
    pub log_path: Option<String>,

    #[config(env = "DJANGO_MEDIA_ROOT")]
    pub media_root: Option<String>,

    /// Extra static files directory (`STATICFILES_DIRS`).
    #[config(env = "DJANGO_STATIC_PATH")]
    pub static_path: Option<String>,

    #[config(env = "DJANGO_STATIC_ROOT")]
    pub static_root: Option<String>,

    /// Project-level templates directory.
    #[config(env = "DJANGO_PROJECT_TEMPLATES_PATH")]
    pub project_template_dir: Option<String>,

    /// Environment label. `Prod` selects production settings; anything else is a
    /// development configuration.
    #[config(env = "DJANGO_CONFIGURATION_DESC")]
    pub configuration_name: Option<String>,

    #[config(env = "DEFAULT_DATABASE_PASSWORD")]
    pub db_password: Option<String>,

    #[config(env = "DEFAULT_DATABASE_USER")]
    pub db_user: Option<String>,

    #[config(env = "DEFAULT_DATABASE_NAME")]
    pub db_name: Option<String>,

    /// Dotted path of the database backend, e.g. `django.db.backends.postgresql`.
    #[config(env = "DATABASE_ENGINE")]
    pub db_engine: Option<String>,

    /// Python package holding the `formats` module. Defaults to the project name.
    #[config(env = "DJANGO_PROJECT")]
    pub project: Option<String>,

    /// Value for `TIME_ZONE` and `CELERY_TIMEZONE`.
    #[config(default = "Europe/Athens")]
    pub timezone: String,

    /// Include the Celery broker and worker settings.
    #[config(default = false)]
    pub celery: bool,

    /// Name listed in `ADMINS` and `MANAGERS`.
    #[config(env = "DJANGO_ADMIN_NAME")]
    pub admin_name: Option<String>,

    /// Email listed in `ADMINS` and `MANAGERS`.
    #[config(env = "DJANGO_ADMIN_EMAIL")]
    pub admin_email: Option<String>,
}

/// All pre-loaded data needed to resolve inputs. No I/O happens here.
pub struct ResolveInput {
    /// Explicit `(key, value)` pairs; later entries win.
    pub explicit: Vec<(String, Value)>,
    /// Raw environment variable pairs (`std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Whether to read environment variables at all.
    pub env_enabled: bool,
}

/// Resolve inputs from pre-loaded sources.
///
/// 1. Build the explicit layer, rejecting unknown keys
/// 2. Build the env layer from the fields' declared variable names
/// 3. Hand both to confique as preloaded layers (first added wins)
/// 4. confique fills compiled defaults
pub fn resolve(input: ResolveInput) -> Result<Inputs, LetsconfigError> {
    let valid = overrides::valid_keys(&Inputs::META);
    let explicit = overrides::overrides_to_table(&input.explicit, &valid)?;
    let explicit_layer = to_layer(explicit)?;

    let mut builder = Inputs::builder().preloaded(explicit_layer);
    if input.env_enabled {
        let env_table = env::env_to_table(&Inputs::META, input.env_vars);
        builder = builder.preloaded(to_layer(env_table)?);
    }

    builder.load().map_err(LetsconfigError::from)
}

fn to_layer(table: toml::Table) -> Result<<Inputs as Config>::Layer, LetsconfigError> {
    Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| LetsconfigError::InvalidValue {
            key: "<inputs>".into(),
            reason: e.to_string(),
        })
}

/// Inputs that passed the required-field checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
    pub cache_path: String,
    pub email_backend: String,
    pub project_path: String,
    pub project_name: String,
    pub log_path: String,
    pub media_root: String,
    pub static_path: String,
    pub static_root: String,
    pub project_template_dir: String,
    pub configuration_name: String,
    pub db_password: String,
    pub db_user: String,
    pub db_name: String,
    pub db_engine: String,
    pub project: String,
    pub timezone: String,
    pub celery: bool,
    pub admin: Option<(String, String)>,
}

impl ResolvedInputs {
    pub fn is_production(&self) -> bool {
        self.configuration_name == PRODUCTION
    }
}

impl Inputs {
    /// The project name: the last component of `project_path`.
    pub fn project_name(&self) -> Option<String> {
        let path = self.project_path.as_deref()?;
        Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
    }

    /// Check every required input and derive the computed ones.
    pub fn validate(self) -> Result<ResolvedInputs, LetsconfigError> {
        let project_name = self.project_name();
        let required: [(&'static str, Option<&str>); 14] = [
            ("cache_path", self.cache_path.as_deref()),
            ("email_backend", Some(self.email_backend.as_str())),
            ("project_path", self.project_path.as_deref()),
            ("project_name", project_name.as_deref()),
            ("log_path", self.log_path.as_deref()),
            ("media_root", self.media_root.as_deref()),
            ("static_path", self.static_path.as_deref()),
            ("static_root", self.static_root.as_deref()),
            ("project_template_dir", self.project_template_dir.as_deref()),
            ("configuration_name", self.configuration_name.as_deref()),
            ("db_password", self.db_password.as_deref()),
            ("db_user", self.db_user.as_deref()),
            ("db_name", self.db_name.as_deref()),
            ("db_engine", self.db_engine.as_deref()),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.is_none_or(str::is_empty))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(LetsconfigError::MissingInputs(missing));
        }

        let present = |v: Option<String>| v.unwrap_or_default();
        let project_name = present(project_name);
        let project = self
            .project
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| project_name.clone());
        let admin = match (self.admin_name, self.admin_email) {
            (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
                Some((name, email))
            }
            _ => None,
        };

        Ok(ResolvedInputs {
            cache_path: present(self.cache_path),
            email_backend: self.email_backend,
            project_path: present(self.project_path),
            project_name,
            log_path: present(self.log_path),
            media_root: present(self.media_root),
            static_path: present(self.static_path),
            static_root: present(self.static_root),
            project_template_dir: present(self.project_template_dir),
            configuration_name: present(self.configuration_name),
            db_password: present(self.db_password),
            db_user: present(self.db_user),
            db_name: present(self.db_name),
            db_engine: present(self.db_engine),
            project,
            timezone: self.timezone,
            celery: self.celery,
            admin,
        })
    }

    /// Every input with its display value, in declaration order.
    ///
    /// The database password is redacted; absent values show as `<not set>`.
    pub fn entries(&self) -> Vec<(String, String)> {
        let show = |v: &Option<String>| match v.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => NOT_SET.to_string(),
        };
        let password = match self.db_password.as_deref() {
            Some(s) if !s.is_empty() => REDACTED.to_string(),
            _ => NOT_SET.to_string(),
        };
        vec![
            ("cache_path".into(), show(&self.cache_path)),
            ("email_backend".into(), self.email_backend.clone()),
            ("project_path".into(), show(&self.project_path)),
            ("project_name".into(), show(&self.project_name())),
            ("log_path".into(), show(&self.log_path)),
            ("media_root".into(), show(&self.media_root)),
            ("static_path".into(), show(&self.static_path)),
            ("static_root".into(), show(&self.static_root)),
            ("project_template_dir".into(), show(&self.project_template_dir)),
            ("configuration_name".into(), show(&self.configuration_name)),
            ("db_password".into(), password),
            ("db_user".into(), show(&self.db_user)),
            ("db_name".into(), show(&self.db_name)),
            ("db_engine".into(), show(&self.db_engine)),
            ("project".into(), show(&self.project)),
            ("timezone".into(), self.timezone.clone()),
            ("celery".into(), self.celery.to_string()),
            ("admin_name".into(), show(&self.admin_name)),
            ("admin_email".into(), show(&self.admin_email)),
        ]
    }
}
