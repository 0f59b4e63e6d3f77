//! Settings assembly: defaults, then computed settings, then the branch
//! overlays for the environment label and the Celery flag.
//!
//! Every overlay is shallow. A computed key replaces the whole default value,
//! including nested dicts like `LOGGING`.

use std::path::Path;

use rand::Rng;

use crate::inputs::ResolvedInputs;
use crate::value::{Dict, Value, dict, list, tuple};

const SECRET_KEY_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*(-_=+)";
const SECRET_KEY_LEN: usize = 75;

/// A fresh `SECRET_KEY`.
pub fn generate_secret_key<R: Rng>(rng: &mut R) -> String {
    (0..SECRET_KEY_LEN)
        .map(|_| SECRET_KEY_CHARS[rng.gen_range(0..SECRET_KEY_CHARS.len())] as char)
        .collect()
}

/// Merge `defaults` with the settings computed from `inputs`.
pub fn assemble<R: Rng>(defaults: Dict, inputs: &ResolvedInputs, rng: &mut R) -> Dict {
    let mut settings = defaults;
    settings.update(base_settings(inputs, generate_secret_key(rng)));

    if inputs.is_production() {
        tracing::debug!("applying production settings");
        settings.update(production_settings());
    } else {
        tracing::debug!(configuration = %inputs.configuration_name, "applying development settings");
        if let Some(Value::List(apps)) = settings.get_mut("INSTALLED_APPS") {
            apps.push("debug_toolbar".into());
        }
        settings.insert("DEBUG", true);
    }

    if inputs.celery {
        tracing::debug!("applying celery settings");
        settings.update(celery_settings(inputs));
    }

    settings
}

fn join(base: &str, parts: &[&str]) -> String {
    let mut path = Path::new(base).to_path_buf();
    for part in parts {
        path.push(part);
    }
    path.to_string_lossy().into_owned()
}

fn people(inputs: &ResolvedInputs) -> Value {
    match &inputs.admin {
        Some((name, email)) => list([tuple([name.as_str(), email.as_str()])]),
        None => Value::List(vec![]),
    }
}

/// The settings every configuration gets.
pub fn base_settings(inputs: &ResolvedInputs, secret_key: String) -> Dict {
    let mut s = Dict::new();
    s.insert("ADMINS", people(inputs));
    s.insert("ALLOWED_HOSTS", list(["127.0.0.1", "localhost"]));
    s.insert("AUTH_USER_MODEL", "people.User");
    s.insert("BASE_DIR", inputs.project_path.as_str());
    s.insert("CACHES", caches(inputs));
    s.insert("DATABASES", databases(inputs));
    s.insert("DEBUG", false);
    s.insert("EMAIL_BACKEND", inputs.email_backend.as_str());
    s.insert("FORMAT_MODULE_PATH", format!("{}.formats", inputs.project));
    s.insert(
        "INSTALLED_APPS",
        list([
            "django.contrib.admin",
            "django.contrib.auth",
            "django.contrib.contenttypes",
            "django.contrib.sessions",
            "django.contrib.messages",
            "django.contrib.staticfiles",
            "people.apps.PeopleConfig",
        ]),
    );
    s.insert("INTERNAL_IPS", tuple(["127.0.0.1", "localhost"]));
    s.insert(
        "LANGUAGES",
        list([tuple(["en", "English"]), tuple(["el", "Greek"])]),
    );
    s.insert("LANGUAGE_CODE", "en");
    s.insert(
        "LOCALE_PATHS",
        list([join(&inputs.project_path, &["00", "locale"])]),
    );
    s.insert("LOGGING", logging(inputs));
    s.insert("MANAGERS", people(inputs));
    s.insert("MEDIA_ROOT", inputs.media_root.as_str());
    s.insert("MEDIA_URL", "/media/");
    s.insert(
        "MIDDLEWARE",
        list([
            "debug_toolbar.middleware.DebugToolbarMiddleware",
            "django.middleware.security.SecurityMiddleware",
            "django.middleware.http.ConditionalGetMiddleware",
            "django.contrib.sessions.middleware.SessionMiddleware",
            "django.middleware.locale.LocaleMiddleware",
            "django.middleware.common.CommonMiddleware",
            "django.middleware.csrf.CsrfViewMiddleware",
            "django.contrib.auth.middleware.AuthenticationMiddleware",
            "django.contrib.messages.middleware.MessageMiddleware",
            "django.middleware.clickjacking.XFrameOptionsMiddleware",
            "django.contrib.sites.middleware.CurrentSiteMiddleware",
        ]),
    );
    s.insert(
        "PASSWORD_HASHERS",
        list([
            "django.contrib.auth.hashers.Argon2PasswordHasher",
            "django.contrib.auth.hashers.PBKDF2PasswordHasher",
            "django.contrib.auth.hashers.PBKDF2SHA1PasswordHasher",
            "django.contrib.auth.hashers.BCryptSHA256PasswordHasher",
        ]),
    );
    s.insert("ROOT_URLCONF", format!("{}.urls", inputs.project_name));
    s.insert("SECRET_KEY", secret_key);
    s.insert("SESSION_EXPIRE_AT_BROWSER_CLOSE", true);
    s.insert("SITE_ID", 1i64);
    s.insert("STATICFILES_DIRS", list([inputs.static_path.as_str()]));
    s.insert("STATIC_ROOT", inputs.static_root.as_str());
    s.insert("STATIC_URL", "/static/");
    s.insert("TEMPLATES", templates(inputs));
    s.insert("TIME_ZONE", inputs.timezone.as_str());
    s.insert("USE_L10N", true);
    s.insert("USE_TZ", true);
    s.insert(
        "WSGI_APPLICATION",
        format!("{}.wsgi.application", inputs.project_name),
    );
    s
}

fn caches(inputs: &ResolvedInputs) -> Value {
    dict([(
        "default",
        dict([
            ("BACKEND", Value::from("diskcache.DjangoCache")),
            ("LOCATION", inputs.cache_path.as_str().into()),
            ("SHARDS", Value::Int(8)),
            ("DATABASE_TIMEOUT", Value::Float(1.0)),
            ("TIMEOUT", Value::Int(43200)),
            ("VERSION", Value::Int(1)),
            (
                "OPTIONS",
                dict([
                    ("size_limit", 4_294_967_296i64),
                    ("MAX_ENTRIES", 15000),
                    ("CULL_FREQUENCY", 3),
                ]),
            ),
        ]),
    )])
}

fn databases(inputs: &ResolvedInputs) -> Value {
    dict([(
        "default",
        dict([
            ("NAME", Value::from(inputs.db_name.as_str())),
            ("USER", inputs.db_user.as_str().into()),
            ("PASSWORD", inputs.db_password.as_str().into()),
            ("HOST", "localhost".into()),
            ("PORT", Value::Int(5432)),
            ("CONN_MAX_AGE", Value::Int(0)),
            ("ENGINE", inputs.db_engine.as_str().into()),
            ("ATOMIC_REQUESTS", Value::Bool(false)),
            ("AUTOCOMMIT", Value::Bool(true)),
            ("OPTIONS", Value::Dict(Dict::new())),
            ("TIME_ZONE", Value::None),
            (
                "TEST",
                dict([
                    ("CHARSET", Value::None),
                    ("COLLATION", Value::None),
                    ("NAME", Value::None),
                    ("MIRROR", Value::None),
                ]),
            ),
        ]),
    )])
}

fn logging(inputs: &ResolvedInputs) -> Value {
    let loggers = |handlers: [&str; 2], propagate: bool| {
        dict([
            ("handlers", list(handlers)),
            ("level", "INFO".into()),
            ("propagate", Value::Bool(propagate)),
        ])
    };

    dict([
        ("version", Value::Int(1)),
        ("disable_existing_loggers", Value::Bool(false)),
        (
            "formatters",
            dict([
                (
                    "verbose",
                    dict([
                        (
                            "format",
                            "{levelname} {asctime} {process:d} {thread:d} {name} {lineno} {message}",
                        ),
                        ("style", "{"),
                    ]),
                ),
                (
                    "simple",
                    dict([
                        ("format", "{levelname} {name} {lineno} {message}"),
                        ("style", "{"),
                    ]),
                ),
            ]),
        ),
        (
            "filters",
            dict([
                (
                    "require_debug_false",
                    dict([("()", "django.utils.log.RequireDebugFalse")]),
                ),
                (
                    "require_debug_true",
                    dict([("()", "django.utils.log.RequireDebugTrue")]),
                ),
            ]),
        ),
        (
            "handlers",
            dict([
                (
                    "console",
                    dict([
                        ("level", Value::from("INFO")),
                        ("filters", list(["require_debug_true"])),
                        ("class", "logging.StreamHandler".into()),
                        ("formatter", "simple".into()),
                    ]),
                ),
                (
                    "file",
                    dict([
                        ("level", Value::from("ERROR")),
                        ("filters", list(["require_debug_false"])),
                        ("class", "logging.FileHandler".into()),
                        ("filename", join(&inputs.log_path, &["django.log"]).into()),
                        ("formatter", "verbose".into()),
                    ]),
                ),
                (
                    "celery.file",
                    dict([
                        ("level", Value::from("INFO")),
                        ("filters", list(["require_debug_false"])),
                        ("class", "logging.FileHandler".into()),
                        ("filename", join(&inputs.log_path, &["celery.log"]).into()),
                    ]),
                ),
            ]),
        ),
        (
            "loggers",
            dict([
                (inputs.project_name.as_str(), loggers(["file", "console"], true)),
                ("django", loggers(["file", "console"], true)),
                ("celery", loggers(["celery.file", "console"], false)),
            ]),
        ),
    ])
}

fn templates(inputs: &ResolvedInputs) -> Value {
    list([dict([
        (
            "BACKEND",
            Value::from("django.template.backends.django.DjangoTemplates"),
        ),
        ("DIRS", list([inputs.project_template_dir.as_str()])),
        ("APP_DIRS", Value::Bool(true)),
        (
            "OPTIONS",
            dict([(
                "context_processors",
                list([
                    "django.template.context_processors.debug",
                    "django.template.context_processors.request",
                    "django.contrib.auth.context_processors.auth",
                    "django.contrib.messages.context_processors.messages",
                    "django.template.context_processors.i18n",
                    "django.template.context_processors.media",
                    "django.template.context_processors.static",
                    "django.template.context_processors.tz",
                ]),
            )]),
        ),
    ])])
}

/// Hardening applied when the configuration is `Prod`.
pub fn production_settings() -> Dict {
    let mut s = Dict::new();
    s.insert("CSRF_COOKIE_HTTPONLY", true);
    s.insert("CSRF_COOKIE_SECURE", true);
    s.insert("EMAIL_USE_TLS", true);
    s.insert("PREPEND_WWW", false);
    s.insert("SECURE_BROWSER_XSS_FILTER", true);
    s.insert("SECURE_CONTENT_TYPE_NOSNIFF", true);
    s.insert("SECURE_HSTS_INCLUDE_SUBDOMAINS", true);
    s.insert("SECURE_HSTS_PRELOAD", true);
    s.insert("SECURE_HSTS_SECONDS", 31_536_000i64);
    s.insert("SECURE_SSL_REDIRECT", true);
    s.insert("SESSION_COOKIE_AGE", 43200i64);
    s.insert("SESSION_COOKIE_SECURE", true);
    s.insert("X_FRAME_OPTIONS", "DENY");
    s
}

/// Broker and worker settings for Celery.
pub fn celery_settings(inputs: &ResolvedInputs) -> Dict {
    let mut s = Dict::new();
    s.insert("BROKER_CONNECTION_TIMEOUT", 30i64);
    s.insert("BROKER_HEARTBEAT", Value::None);
    s.insert("BROKER_POOL_LIMIT", 1i64);
    s.insert("BROKER_USE_SSL", true);
    s.insert("CELERYBEAT_SCHEDULER", "djcelery.schedulers.DatabaseScheduler");
    s.insert("CELERYD_CONCURRENCY", 50i64);
    s.insert("CELERYD_PREFETCH_MULTIPLIER", 1i64);
    s.insert("CELERYD_TASK_SOFT_TIME_LIMIT", 60i64);
    s.insert("CELERY_ACCEPT_CONTENT", list(["json"]));
    s.insert("CELERY_BROKER_URL", Value::None);
    s.insert("CELERY_ENABLE_UTC", false);
    s.insert("CELERY_EVENT_QUEUE_EXPIRES", 60i64);
    s.insert("CELERY_RESULT_BACKEND", "rpc");
    s.insert("CELERY_RESULT_SERIALIZER", "json");
    s.insert("CELERY_SEND_EVENTS", false);
    s.insert("CELERY_SEND_TASK_ERROR_EMAILS", true);
    s.insert("CELERY_TASK_SERIALIZER", "json");
    s.insert("CELERY_TIMEZONE", inputs.timezone.as_str());
    s
}
