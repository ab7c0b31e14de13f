//! `${VAR}` expansion for string settings.
//!
//! `${VAR:-default}` falls back to `default` when `VAR` is unset. Bare `$VAR`
//! is left untouched so literal dollar signs in URLs survive.

use crate::ConfigError;

/// Expand `${VAR}` references using the process environment.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |name| std::env::var(name).ok())
}

/// Expand `${VAR}` references using `lookup` to resolve variable names.
pub(crate) fn expand_with<F>(value: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| -> Result<Option<String>, Unset> {
        lookup(name).map(Some).ok_or_else(|| Unset(name.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Name of a variable that had no value and no default.
struct Unset(String);
