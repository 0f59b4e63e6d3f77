#[cfg(test)]
pub mod test {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use toml::Value;

    use crate::inputs::{ResolveInput, ResolvedInputs, resolve};

    pub fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    pub fn explicit(pairs: &[(&str, &str)]) -> Vec<(String, Value)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    /// Every env-backed required input, as a development configuration.
    pub fn complete_env() -> Vec<(String, String)> {
        vars(&[
            ("DJANGO_CACHE_PATH", "/var/cache/site"),
            ("DJANGO_PROJECT_PATH", "/srv/mysite"),
            ("DJANGO_LOG_PATH", "/var/log/site"),
            ("DJANGO_MEDIA_ROOT", "/srv/media"),
            ("DJANGO_STATIC_PATH", "/srv/mysite/static"),
            ("DJANGO_STATIC_ROOT", "/srv/static"),
            ("DJANGO_PROJECT_TEMPLATES_PATH", "/srv/mysite/templates"),
            ("DJANGO_CONFIGURATION_DESC", "Dev"),
            ("DEFAULT_DATABASE_PASSWORD", "s3cret"),
            ("DEFAULT_DATABASE_USER", "web"),
            ("DEFAULT_DATABASE_NAME", "site"),
            ("DATABASE_ENGINE", "django.db.backends.postgresql"),
        ])
    }

    /// Validated inputs for a configuration name, with optional explicit extras.
    pub fn resolved(configuration_name: &str, extra: &[(&str, &str)]) -> ResolvedInputs {
        let mut explicit_pairs = explicit(&[("configuration_name", configuration_name)]);
        explicit_pairs.extend(explicit(extra));
        resolve(ResolveInput {
            explicit: explicit_pairs,
            env_vars: complete_env(),
            env_enabled: true,
        })
        .unwrap()
        .validate()
        .unwrap()
    }

    pub fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// A defaults file in TOML, mixing setting names with helper keys.
    pub const DEFAULTS_TOML: &str = r#"
SITE_NAME = "Example"
helper = "not a setting"
DEBUG = true
CELERY_BROKER_URL = "amqp://localhost"
APPEND_SLASH = true

[LOGGING]
version = 0
"#;

    /// A defaults file in JSON, exercising `null`.
    pub const DEFAULTS_JSON: &str = r#"{
  "SESSION_ENGINE": "django.contrib.sessions.backends.cache",
  "lower": 1,
  "DATA_UPLOAD_MAX_NUMBER_FIELDS": null,
  "X_FRAME_OPTIONS": "SAMEORIGIN"
}"#;
}
