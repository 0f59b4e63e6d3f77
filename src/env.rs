use confique::meta::{FieldKind, Meta};
use toml::{Table, Value};

/// Build a `toml::Table` layer from the env vars declared on a flat confique
/// struct.
///
/// Every field with `#[config(env = "NAME")]` is looked up in `vars`.
/// Values are kept as strings, and empty values are skipped so they fall
/// through to lower layers like an unset variable would.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_table(meta: &Meta, vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let vars: Vec<(String, String)> = vars.into_iter().collect();
    let mut table = Table::new();
    for field in meta.fields {
        let FieldKind::Leaf { env: Some(name), .. } = &field.kind else {
            continue;
        };
        let found = vars.iter().rev().find(|(k, _)| k == name).map(|(_, v)| v);
        if let Some(value) = found
            && !value.is_empty()
        {
            tracing::debug!(input = field.name, var = *name, "input taken from environment");
            table.insert(field.name.to_string(), Value::String(value.clone()));
        }
    }
    table
}
