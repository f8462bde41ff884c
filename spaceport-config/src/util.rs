use std::str::FromStr;

use crate::loader::ConfigLoadError;

/// Split a comma-separated list, dropping blank entries.
pub fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

pub fn parse_csv_var(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|raw| parse_csv(&raw))
}

/// Parse a boolean value from a raw string, accepting common env-style forms.
///
/// Accepted truthy values (case-insensitive): `"1"`, `"true"`, `"yes"`, `"on"`.
/// Accepted falsy values: `"0"`, `"false"`, `"no"`, `"off"`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_bool_var(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|raw| parse_bool(&raw))
}

/// Non-blank value of an environment variable.
pub fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Parse a numeric setting; a value that does not parse is an error rather
/// than a silent fallback to the default.
pub fn parse_number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, ConfigLoadError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigLoadError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

pub fn parse_number_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigLoadError> {
    non_empty_var(name)
        .map(|raw| parse_number(name, &raw))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_drops_blank_entries() {
        assert_eq!(parse_csv(" a, ,b ,"), vec!["a".to_string(), "b".to_string()]);
        assert!(parse_csv("").is_empty());
    }

    #[test]
    fn bool_forms() {
        assert_eq!(parse_bool("YES"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn numbers_that_do_not_parse_are_errors() {
        assert_eq!(parse_number::<u16>("SERVER_PORT", " 8080 ").unwrap(), 8080);
        assert!(matches!(
            parse_number::<u16>("SERVER_PORT", "eighty"),
            Err(ConfigLoadError::InvalidNumber { field: "SERVER_PORT", .. })
        ));
        assert!(matches!(
            parse_number::<u16>("SERVER_PORT", "70000"),
            Err(ConfigLoadError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_number::<u32>("DATABASE_MAX_CONNECTIONS", "-1"),
            Err(ConfigLoadError::InvalidNumber { field: "DATABASE_MAX_CONNECTIONS", .. })
        ));
    }
}
