use tracing::debug;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const API_TOKEN_ENV: &str = "BCB_API_TOKEN";

/// Resolve a configured secret. A value starting with `$` names an
/// environment variable; an unset variable resolves to nothing.
pub fn resolve_credential(value: &str) -> Option<String> {
    match value.strip_prefix('$') {
        Some(var_name) => match std::env::var(var_name) {
            Ok(resolved) if !resolved.is_empty() => {
                debug!(var = %var_name, "Resolved credential from environment");
                Some(resolved)
            }
            _ => {
                debug!(var = %var_name, "Environment variable not set");
                None
            }
        },
        None if value.is_empty() => None,
        None => Some(value.to_string()),
    }
}

/// First non-empty secret from: explicit flag, config file, environment variable.
pub fn resolve_secret(flag: Option<&str>, configured: Option<&str>, env_var: &str) -> Option<String> {
    flag.and_then(resolve_credential)
        .or_else(|| configured.and_then(resolve_credential))
        .or_else(|| std::env::var(env_var).ok().filter(|v| !v.is_empty()))
}
