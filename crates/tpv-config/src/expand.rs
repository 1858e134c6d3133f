//! `${VAR}` and `${VAR:-default}` expansion in configuration values.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// `${VAR}` fails when `VAR` is unset; `${VAR:-default}` falls back to the
/// default. A value with no `${` is returned as written, bare `$VAR`
/// included. Once a value contains `${`, bare `$VAR` references in it are
/// expanded as well and fail the same way when unset. `field` names the
/// setting in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| match std::env::var(var) {
        Ok(val) => Ok(Some(val)),
        Err(_) => Err(UnsetVar(var.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("TPV_TEST_EXPAND_HOST", "0.0.0.0");
        }
        assert_eq!(expand_env("${TPV_TEST_EXPAND_HOST}", "server.host").unwrap(), "0.0.0.0");
        unsafe {
            std::env::remove_var("TPV_TEST_EXPAND_HOST");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::remove_var("TPV_TEST_EXPAND_UNSET");
        }
        assert_eq!(
            expand_env("${TPV_TEST_EXPAND_UNSET:-templates}", "templates.dir").unwrap(),
            "templates"
        );
    }

    #[test]
    fn test_expand_embedded() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("TPV_TEST_EXPAND_HOME", "/srv");
        }
        assert_eq!(
            expand_env("${TPV_TEST_EXPAND_HOME}/campaigns", "templates.dir").unwrap(),
            "/srv/campaigns"
        );
        unsafe {
            std::env::remove_var("TPV_TEST_EXPAND_HOME");
        }
    }

    #[test]
    fn test_missing_var_names_field_and_var() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::remove_var("TPV_TEST_EXPAND_MISSING");
        }
        let err = expand_env("${TPV_TEST_EXPAND_MISSING}", "templates.dir").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("templates.dir"), "{message}");
        assert!(message.contains("TPV_TEST_EXPAND_MISSING"), "{message}");
    }

    #[test]
    fn test_bare_var_expanded_alongside_braced() {
        // SAFETY: the variable names are unique to this test
        unsafe {
            std::env::set_var("TPV_TEST_EXPAND_BARE", "campaigns");
            std::env::remove_var("TPV_TEST_EXPAND_BARE_UNSET");
        }
        assert_eq!(
            expand_env("${TPV_TEST_EXPAND_BARE_UNSET:-/srv}/$TPV_TEST_EXPAND_BARE", "templates.dir")
                .unwrap(),
            "/srv/campaigns"
        );
        let mixed = "${TPV_TEST_EXPAND_BARE}/$TPV_TEST_EXPAND_BARE_UNSET";
        assert!(expand_env(mixed, "templates.dir").is_err());
        unsafe {
            std::env::remove_var("TPV_TEST_EXPAND_BARE");
        }
    }

    #[test]
    fn test_literals_unchanged() {
        assert_eq!(
            expand_env("phishing-templates", "templates.dir").unwrap(),
            "phishing-templates"
        );
        assert_eq!(expand_env("$HOME/x", "templates.dir").unwrap(), "$HOME/x");
    }
}
