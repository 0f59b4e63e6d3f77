use std::path::{Path, PathBuf};

use rand::Rng;
use rand::rngs::OsRng;
use serde::Serialize;

use crate::defaults;
use crate::error::LetsconfigError;
use crate::inputs::{self, Inputs, ResolveInput, ResolvedInputs};
use crate::ops::Outcome;
use crate::overrides;
use crate::render;
use crate::settings;
use crate::types::{Action, SearchPath};
use crate::value::Dict;
use confique::Config;

/// Entry point for generating a settings file.
pub struct Letsconfig;

impl Letsconfig {
    pub fn builder() -> LetsconfigBuilder {
        LetsconfigBuilder::new()
    }
}

/// Builder that collects the destination, the defaults source, and the inputs.
pub struct LetsconfigBuilder {
    config_path: Option<PathBuf>,
    defaults: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    env_enabled: bool,
    inputs: Vec<(String, toml::Value)>,
}

impl LetsconfigBuilder {
    fn new() -> Self {
        Self {
            config_path: None,
            defaults: None,
            search_paths: None,
            env_enabled: true,
            inputs: Vec::new(),
        }
    }

    /// Where the settings file is written. The file must not exist yet.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Name of the defaults source: a module path like `mysite.settings.base`,
    /// or a direct `.toml`/`.json` path.
    pub fn defaults(mut self, name: &str) -> Self {
        self.defaults = Some(name.to_string());
        self
    }

    /// Replace the default search paths (`[Platform, Cwd]`) entirely.
    ///
    /// Paths are listed in **priority-ascending** order: the last entry has the
    /// highest priority.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path without replacing the defaults.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(default_search_paths)
            .push(path);
        self
    }

    /// Do not read inputs from environment variables.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Supply an input explicitly. `None` values are ignored (useful for optional clap args).
    pub fn input<V: Into<toml::Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.inputs.push((key.to_string(), v.into()));
        }
        self
    }

    /// Include (or leave out) the Celery settings.
    pub fn celery(self, enabled: bool) -> Self {
        self.input("celery", Some(enabled))
    }

    /// Supply inputs from any serializable source, matching by field name.
    ///
    /// Fields that are not inputs (`verbose`, `dry_run`, ...) are ignored, so a
    /// whole clap struct can be passed. Later calls take precedence.
    pub fn inputs_from<S: Serialize>(mut self, source: &S) -> Result<Self, LetsconfigError> {
        let valid = overrides::valid_keys(&Inputs::META);
        let pairs = overrides::pairs_from(source, &valid)?;
        self.inputs.extend(pairs);
        Ok(self)
    }

    fn effective_search_paths(&self) -> Vec<SearchPath> {
        self.search_paths
            .clone()
            .unwrap_or_else(default_search_paths)
    }

    fn build_input(&self) -> ResolveInput {
        let env_vars = if self.env_enabled {
            std::env::vars().collect()
        } else {
            Vec::new()
        };
        ResolveInput {
            explicit: self.inputs.clone(),
            env_vars,
            env_enabled: self.env_enabled,
        }
    }

    /// Resolve inputs through all layers without checking required ones.
    pub fn resolve_inputs(&self) -> Result<Inputs, LetsconfigError> {
        inputs::resolve(self.build_input())
    }

    /// Validate everything needed to generate, failing fast.
    ///
    /// Checks, in order: a destination is set and does not exist, every
    /// required input is present, a defaults name is set.
    pub fn load(self) -> Result<Generator, LetsconfigError> {
        let config_path = self
            .config_path
            .clone()
            .ok_or(LetsconfigError::ConfigPathRequired)?;
        if config_path.exists() {
            return Err(LetsconfigError::AlreadyExists(config_path));
        }
        self.load_unchecked_path(config_path)
    }

    fn load_unchecked_path(self, config_path: PathBuf) -> Result<Generator, LetsconfigError> {
        let inputs = self.resolve_inputs()?.validate()?;
        let defaults = self.defaults.clone().ok_or(LetsconfigError::DefaultsRequired)?;
        Ok(Generator {
            config_path,
            defaults,
            search_paths: self.effective_search_paths(),
            inputs,
        })
    }

    /// Handle an [`Action`] and print the result to stdout.
    pub fn handle_and_print(self, action: &Action) -> Result<(), LetsconfigError> {
        let result = self.handle(action)?;
        print!("{result}");
        Ok(())
    }

    /// Handle an [`Action`] (write / preview / list inputs).
    pub fn handle(self, action: &Action) -> Result<Outcome, LetsconfigError> {
        match action {
            Action::Write => self.load()?.write(&mut OsRng),
            Action::Preview => {
                let config_path = self
                    .config_path
                    .clone()
                    .ok_or(LetsconfigError::ConfigPathRequired)?;
                let generator = self.load_unchecked_path(config_path)?;
                let settings = generator.settings(&mut OsRng)?;
                Ok(Outcome::Preview(render::render(&settings)))
            }
            Action::ListInputs => {
                let inputs = self.resolve_inputs()?;
                Ok(Outcome::Inputs {
                    entries: inputs.entries(),
                })
            }
        }
    }
}

fn default_search_paths() -> Vec<SearchPath> {
    vec![SearchPath::Platform, SearchPath::Cwd]
}

/// A validated generation job: destination, defaults source, and inputs.
#[derive(Debug)]
pub struct Generator {
    config_path: PathBuf,
    defaults: String,
    search_paths: Vec<SearchPath>,
    inputs: ResolvedInputs,
}

impl Generator {
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn inputs(&self) -> &ResolvedInputs {
        &self.inputs
    }

    /// Load the defaults and assemble the full settings mapping.
    pub fn settings<R: Rng>(&self, rng: &mut R) -> Result<Dict, LetsconfigError> {
        let defaults = defaults::load(&self.defaults, &self.search_paths)?;
        tracing::debug!(count = defaults.len(), name = %self.defaults, "loaded defaults");
        Ok(settings::assemble(defaults, &self.inputs, rng))
    }

    /// Assemble, render, and write the settings file.
    pub fn write<R: Rng>(&self, rng: &mut R) -> Result<Outcome, LetsconfigError> {
        let settings = self.settings(rng)?;
        render::write_new(&self.config_path, &render::render(&settings))?;
        tracing::info!(path = %self.config_path.display(), settings = settings.len(), "wrote settings file");
        Ok(Outcome::Written {
            path: self.config_path.clone(),
            settings: settings.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{DEFAULTS_TOML, rng};
    use crate::value::Value;
    use std::fs;
    use tempfile::TempDir;

    /// A builder with every required input set explicitly and env disabled.
    fn complete(dir: &TempDir) -> LetsconfigBuilder {
        fs::write(dir.path().join("base.toml"), DEFAULTS_TOML).unwrap();
        Letsconfig::builder()
            .config_path(dir.path().join("out").join("settings.ini"))
            .defaults("base")
            .search_paths(vec![SearchPath::Path(dir.path().to_path_buf())])
            .no_env()
            .input("cache_path", Some("/var/cache/site"))
            .input("project_path", Some("/srv/mysite"))
            .input("log_path", Some("/var/log/site"))
            .input("media_root", Some("/srv/media"))
            .input("static_path", Some("/srv/mysite/static"))
            .input("static_root", Some("/srv/static"))
            .input("project_template_dir", Some("/srv/mysite/templates"))
            .input("configuration_name", Some("Dev"))
            .input("db_password", Some("s3cret"))
            .input("db_user", Some("web"))
            .input("db_name", Some("site"))
            .input("db_engine", Some("django.db.backends.postgresql"))
    }

    #[test]
    fn default_search_paths_platform_then_cwd() {
        let builder = Letsconfig::builder();
        assert_eq!(
            builder.effective_search_paths(),
            vec![SearchPath::Platform, SearchPath::Cwd]
        );
    }

    #[test]
    fn add_search_path_appends_to_defaults() {
        let builder = Letsconfig::builder().add_search_path(SearchPath::Path("/etc/site".into()));
        assert_eq!(
            builder.effective_search_paths(),
            vec![
                SearchPath::Platform,
                SearchPath::Cwd,
                SearchPath::Path("/etc/site".into())
            ]
        );
    }

    #[test]
    fn input_none_skipped() {
        let builder = Letsconfig::builder().input::<&str>("db_user", None);
        assert!(builder.inputs.is_empty());
    }

    #[test]
    fn celery_is_an_input() {
        let builder = Letsconfig::builder().celery(true);
        assert_eq!(
            builder.inputs[0],
            ("celery".to_string(), toml::Value::Boolean(true))
        );
    }

    #[test]
    fn missing_config_path_errors() {
        let result = Letsconfig::builder().no_env().load();
        assert!(matches!(result, Err(LetsconfigError::ConfigPathRequired)));
    }

    #[test]
    fn existing_file_checked_before_inputs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.ini");
        fs::write(&path, "").unwrap();

        let result = Letsconfig::builder().config_path(&path).no_env().load();
        assert!(matches!(result, Err(LetsconfigError::AlreadyExists(p)) if p == path));
    }

    #[test]
    fn missing_inputs_reported() {
        let dir = TempDir::new().unwrap();
        let result = Letsconfig::builder()
            .config_path(dir.path().join("settings.ini"))
            .defaults("base")
            .no_env()
            .load();
        assert!(matches!(result, Err(LetsconfigError::MissingInputs(m)) if m.len() == 13));
    }

    #[test]
    fn missing_defaults_name_errors() {
        let dir = TempDir::new().unwrap();
        let mut builder = complete(&dir);
        builder.defaults = None;
        assert!(matches!(
            builder.load(),
            Err(LetsconfigError::DefaultsRequired)
        ));
    }

    #[test]
    fn write_generates_file() {
        let dir = TempDir::new().unwrap();
        let generator = complete(&dir).load().unwrap();
        let outcome = generator.write(&mut rng()).unwrap();

        let path = dir.path().join("out").join("settings.ini");
        assert!(matches!(outcome, Outcome::Written { path: p, .. } if p == path));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("DEBUG = True"));
        assert!(content.contains("SITE_NAME = 'Example'"));
        assert!(content.contains("APPEND_SLASH = True"));
        assert!(!content.contains("helper"));
        assert!(content.contains("ROOT_URLCONF = 'mysite.urls'"));
        assert!(content.contains("[DATABASES]\n    [[default]]\n"));
        assert!(content.contains("        PASSWORD = 's3cret'"));
        assert!(content.contains("'debug_toolbar']"));
    }

    #[test]
    fn write_refuses_existing_file_created_after_load() {
        let dir = TempDir::new().unwrap();
        let generator = complete(&dir).load().unwrap();
        let path = generator.config_path().to_path_buf();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "KEEP = 1\n").unwrap();

        let result = generator.write(&mut rng());
        assert!(matches!(result, Err(LetsconfigError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "KEEP = 1\n");
    }

    #[test]
    fn second_run_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        complete(&dir).handle(&Action::Write).unwrap();
        let result = complete(&dir).handle(&Action::Write);
        assert!(matches!(result, Err(LetsconfigError::AlreadyExists(_))));
    }

    #[test]
    fn settings_defaults_precede_computed() {
        let dir = TempDir::new().unwrap();
        let generator = complete(&dir).load().unwrap();
        let settings = generator.settings(&mut rng()).unwrap();
        assert_eq!(settings.keys().next(), Some("SITE_NAME"));
        // computed DEBUG replaced the default in place
        assert_eq!(settings.keys().nth(1), Some("DEBUG"));
        assert_eq!(settings.get("DEBUG"), Some(&Value::Bool(true)));
    }

    #[test]
    fn production_via_input() {
        let dir = TempDir::new().unwrap();
        let generator = complete(&dir)
            .input("configuration_name", Some("Prod"))
            .load()
            .unwrap();
        assert!(generator.inputs().is_production());
        let settings = generator.settings(&mut rng()).unwrap();
        assert_eq!(settings.get("DEBUG"), Some(&Value::Bool(false)));
        assert_eq!(settings.get("SESSION_COOKIE_SECURE"), Some(&Value::Bool(true)));
    }

    #[test]
    fn celery_via_builder() {
        let dir = TempDir::new().unwrap();
        let generator = complete(&dir).celery(true).load().unwrap();
        let settings = generator.settings(&mut rng()).unwrap();
        assert_eq!(settings.get("CELERY_RESULT_BACKEND"), Some(&Value::from("rpc")));
        // computed value replaces the one from defaults
        assert_eq!(settings.get("CELERY_BROKER_URL"), Some(&Value::None));
    }

    #[test]
    fn preview_does_not_write() {
        let dir = TempDir::new().unwrap();
        let outcome = complete(&dir).handle(&Action::Preview).unwrap();
        match outcome {
            Outcome::Preview(text) => assert!(text.contains("SECRET_KEY = ")),
            other => panic!("Expected Preview, got {other:?}"),
        }
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn preview_allowed_when_destination_exists() {
        let dir = TempDir::new().unwrap();
        let builder = complete(&dir);
        let path = dir.path().join("out").join("settings.ini");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "KEEP = 1\n").unwrap();

        assert!(matches!(
            builder.handle(&Action::Preview),
            Ok(Outcome::Preview(_))
        ));
    }

    #[test]
    fn list_inputs_never_fails_on_missing() {
        let outcome = Letsconfig::builder()
            .no_env()
            .handle(&Action::ListInputs)
            .unwrap();
        match outcome {
            Outcome::Inputs { entries } => {
                let cache = entries.iter().find(|(k, _)| k == "cache_path").unwrap();
                assert_eq!(cache.1, "<not set>");
            }
            other => panic!("Expected Inputs, got {other:?}"),
        }
    }

    #[test]
    fn unknown_defaults_module_errors_at_write() {
        let dir = TempDir::new().unwrap();
        let generator = complete(&dir).defaults("missing").load().unwrap();
        assert!(matches!(
            generator.write(&mut rng()),
            Err(LetsconfigError::DefaultsNotFound { .. })
        ));
    }

    #[test]
    fn inputs_from_matches_known_keys() {
        #[derive(Serialize)]
        struct Args {
            #[serde(skip_serializing_if = "Option::is_none")]
            db_user: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            db_name: Option<String>,
            dry_run: bool,
        }
        let args = Args {
            db_user: Some("web".into()),
            db_name: None,
            dry_run: true,
        };
        let builder = Letsconfig::builder().inputs_from(&args).unwrap();
        assert_eq!(builder.inputs.len(), 1);
        assert_eq!(builder.inputs[0].0, "db_user");
    }

    #[test]
    fn inputs_from_composes_with_input() {
        #[derive(Serialize)]
        struct Args {
            db_user: String,
        }
        let builder = Letsconfig::builder()
            .input("db_user", Some("first"))
            .inputs_from(&Args {
                db_user: "second".into(),
            })
            .unwrap()
            .no_env();
        let inputs = builder.resolve_inputs().unwrap();
        assert_eq!(inputs.db_user.as_deref(), Some("second"));
    }

    #[test]
    fn unknown_input_key_errors_on_load() {
        let dir = TempDir::new().unwrap();
        let result = complete(&dir).input("debug", Some(true)).load();
        assert!(matches!(result, Err(LetsconfigError::UnknownInput(k)) if k == "debug"));
    }
}
