//! Environment variable interpolation for config files.
//!
//! Supports the following syntax:
//! - `${VAR}` - substitute with env var value, error if unset or empty
//! - `${VAR:-default}` - use default if VAR is unset or empty
//! - `$$` - escape sequence for literal `$`

use regex::Regex;
use std::env;
use std::sync::LazyLock;

/// Matches `$$`, `${VAR}`, and `${VAR:-default}`.
static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$|\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid interpolation pattern")
});

/// Interpolate environment variables in the given text.
///
/// Missing variables are accumulated so the user sees every problem at once,
/// returned as one error line per variable.
pub fn interpolate(input: &str) -> Result<String, Vec<String>> {
    let mut errors = Vec::new();

    let text = ENV_VAR_PATTERN
        .replace_all(input, |caps: &regex::Captures| {
            let full_match = caps.get(0).unwrap().as_str();
            if full_match == "$$" {
                return "$".to_string();
            }

            let name = &caps[1];
            let value = env::var(name).ok().filter(|v| !v.is_empty());

            match (value, caps.get(2)) {
                (Some(value), _) => value,
                (None, Some(default)) => default.as_str().to_string(),
                (None, None) => {
                    errors.push(format!("environment variable '{name}' is not set"));
                    full_match.to_string()
                }
            }
        })
        .to_string();

    if errors.is_empty() {
        Ok(text)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
    where
        F: FnOnce() -> R,
    {
        // Save original values
        let originals: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var(k).ok())).collect();

        // SAFETY: each test uses its own FIRN_TEST_* variable names and
        // restores the original values before returning
        for (key, value) in vars {
            match value {
                Some(v) => unsafe { env::set_var(key, v) },
                None => unsafe { env::remove_var(key) },
            }
        }

        let result = f();

        // SAFETY: restoring original environment state
        for (key, original) in originals {
            match original {
                Some(v) => unsafe { env::set_var(key, v) },
                None => unsafe { env::remove_var(key) },
            }
        }

        result
    }

    #[test]
    fn test_braced_substitution() {
        with_env_vars(&[("FIRN_TEST_BRACED", Some("acme-prod"))], || {
            let text = interpolate("project_id: ${FIRN_TEST_BRACED}").unwrap();
            assert_eq!(text, "project_id: acme-prod");
        });
    }

    #[test]
    fn test_missing_variable_error() {
        with_env_vars(&[("FIRN_TEST_MISSING", None)], || {
            let errors = interpolate("project_id: ${FIRN_TEST_MISSING}").unwrap_err();
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("FIRN_TEST_MISSING"));
            assert!(errors[0].contains("not set"));
        });
    }

    #[test]
    fn test_multiple_missing_variables() {
        with_env_vars(
            &[("FIRN_TEST_MISS1", None), ("FIRN_TEST_MISS2", None)],
            || {
                let errors =
                    interpolate("a: ${FIRN_TEST_MISS1}, b: ${FIRN_TEST_MISS2}").unwrap_err();
                assert_eq!(errors.len(), 2);
            },
        );
    }

    #[test]
    fn test_default_value_unset() {
        with_env_vars(&[("FIRN_TEST_UNSET", None)], || {
            let text = interpolate("location: ${FIRN_TEST_UNSET:-US}").unwrap();
            assert_eq!(text, "location: US");
        });
    }

    #[test]
    fn test_default_value_empty() {
        with_env_vars(&[("FIRN_TEST_EMPTY", Some(""))], || {
            let text = interpolate("location: ${FIRN_TEST_EMPTY:-EU}").unwrap();
            assert_eq!(text, "location: EU");
        });
    }

    #[test]
    fn test_set_variable_wins_over_default() {
        with_env_vars(&[("FIRN_TEST_SET", Some("asia-northeast1"))], || {
            let text = interpolate("location: ${FIRN_TEST_SET:-US}").unwrap();
            assert_eq!(text, "location: asia-northeast1");
        });
    }

    #[test]
    fn test_escape_sequence() {
        let text = interpolate("pattern: $$VAR").unwrap();
        assert_eq!(text, "pattern: $VAR");
    }

    #[test]
    fn test_no_interpolation_needed() {
        let text = interpolate("plain text without variables").unwrap();
        assert_eq!(text, "plain text without variables");
    }
}
