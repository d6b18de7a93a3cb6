use thiserror::Error;

/// An environment variable the caller needs is not set (or not valid unicode).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads `name`, failing with [`MissingEnvVarError`] when it is unset or blank.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    optional_env_var(name).ok_or_else(|| MissingEnvVarError(name.to_string()))
}

/// Reads `name`, treating unset and blank the same.
pub fn optional_env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
