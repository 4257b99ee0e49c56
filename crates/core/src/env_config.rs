//! Settings read from `SPELLFIX_*` environment variables.
//!
//! A missing variable means "use the default". A variable that is set but
//! unusable is logged at warn level and also falls back, so a typo in the
//! environment never stops the index from opening.

use std::fmt::Display;
use std::str::FromStr;

fn parse_var<T: FromStr>(var: &str) -> Option<Result<T, String>> {
    let raw = std::env::var(var).ok()?;
    Some(raw.trim().parse().map_err(|_| raw))
}

/// Parse `var`, falling back to `default` when it is unset or malformed.
pub fn env_parse_with_default<T: FromStr + Display>(var: &str, default: T) -> T {
    match parse_var(var) {
        None => default,
        Some(Ok(value)) => value,
        Some(Err(raw)) => {
            tracing::warn!(var, value = %raw, default = %default, "invalid env var value, using default");
            default
        },
    }
}

/// Like [`env_parse_with_default`], but values below `min` are raised to it.
pub fn env_parse_at_least<T: FromStr + Display + PartialOrd>(var: &str, default: T, min: T) -> T {
    let value = env_parse_with_default(var, default);
    if value < min {
        tracing::warn!(var, value = %value, min = %min, "env var value too small, using minimum");
        return min;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_valid_value() {
        let var_name = "SPELLFIX_TEST_ENV_PARSE_VALID_51821";
        unsafe { std::env::set_var(var_name, " 42 ") };
        let result: u32 = env_parse_with_default(var_name, 10);
        assert_eq!(result, 42);
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn test_env_parse_invalid_value() {
        let var_name = "SPELLFIX_TEST_ENV_PARSE_INVALID_51822";
        unsafe { std::env::set_var(var_name, "banana") };
        let result: i32 = env_parse_with_default(var_name, 400);
        assert_eq!(result, 400);
        unsafe { std::env::remove_var(var_name) };
    }

    #[test]
    fn test_env_parse_missing_var() {
        let var_name = "SPELLFIX_TEST_ENV_PARSE_MISSING_51823";
        unsafe { std::env::remove_var(var_name) };
        let result: u32 = env_parse_with_default(var_name, 8);
        assert_eq!(result, 8);
    }

    #[test]
    fn test_env_parse_at_least_clamps() {
        let var_name = "SPELLFIX_TEST_ENV_PARSE_MIN_51824";
        unsafe { std::env::set_var(var_name, "0") };
        assert_eq!(env_parse_at_least(var_name, 3_i64, 1), 1);
        unsafe { std::env::set_var(var_name, "5") };
        assert_eq!(env_parse_at_least(var_name, 3_i64, 1), 5);
        unsafe { std::env::remove_var(var_name) };
    }
}
