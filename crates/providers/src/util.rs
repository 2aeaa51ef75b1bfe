//! Shared utility functions for provider adapters.

use tb_domain::error::{Error, Result};

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Http`].
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

/// Read the API key from the named environment variable.
///
/// Unset, non-UTF-8, and blank values are all rejected so the server
/// cannot start with an unusable credential.
pub fn resolve_api_key(env_var: &str) -> Result<String> {
    let value = std::env::var(env_var).map_err(|_| {
        Error::Auth(format!(
            "environment variable '{env_var}' not set or not valid UTF-8; \
             set it before starting the server"
        ))
    })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Auth(format!("environment variable '{env_var}' is empty")));
    }
    Ok(trimmed.to_owned())
}

/// Redact the API key from a URL for safe logging.
pub(crate) fn redact_url_key(url: &str) -> String {
    if let Some(idx) = url.find("key=") {
        let prefix = &url[..idx + 4];
        let rest = &url[idx + 4..];
        let end = rest.find('&').unwrap_or(rest.len());
        format!("{prefix}[REDACTED]{}", &rest[end..])
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_api_key_env_var() {
        let var_name = "TB_TEST_RESOLVE_ENV_KEY_1234";
        std::env::set_var(var_name, "  env-secret-value \n");
        let result = resolve_api_key(var_name).unwrap();
        assert_eq!(result, "env-secret-value");
        std::env::remove_var(var_name);
    }

    #[test]
    fn resolve_api_key_env_var_missing() {
        let err = resolve_api_key("TB_TEST_NONEXISTENT_VAR_8888").unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("TB_TEST_NONEXISTENT_VAR_8888"));
    }

    #[test]
    fn resolve_api_key_blank_is_rejected() {
        let var_name = "TB_TEST_BLANK_KEY_5555";
        std::env::set_var(var_name, "   ");
        let err = resolve_api_key(var_name).unwrap_err();
        assert!(err.to_string().contains("is empty"));
        std::env::remove_var(var_name);
    }

    #[test]
    fn redact_hides_key_but_keeps_other_params() {
        let url = "https://x/v1beta/models/m:generateContent?key=SECRET&alt=sse";
        assert_eq!(
            redact_url_key(url),
            "https://x/v1beta/models/m:generateContent?key=[REDACTED]&alt=sse"
        );
    }

    #[test]
    fn redact_without_key_is_identity() {
        assert_eq!(redact_url_key("https://x/y"), "https://x/y");
    }
}
