use log::warn;
use regex::Regex;

use crate::options::{ImportOptions, NamingConvention};

/// Derive a binding identifier from a raw candidate name (file base name or
/// package name). Deterministic and pure: the same raw name and options
/// always produce the same identifier.
///
/// Pipeline: the first predefined rule whose pattern matches substitutes and
/// short-circuits; otherwise any leading digit run is stripped and the
/// configured case convention is applied.
pub fn binding_identifier(raw: &str, opts: &ImportOptions) -> String {
    for rule in &opts.predefined_variable_names {
        match Regex::new(&rule.pattern) {
            Ok(re) => {
                if re.is_match(raw) {
                    return re.replace(raw, rule.replace.as_str()).to_string();
                }
            }
            Err(e) => {
                warn!("Ignoring invalid naming rule pattern '{}': {}", rule.pattern, e);
            }
        }
    }

    let stripped = raw.trim_start_matches(|c: char| c.is_ascii_digit());
    apply_convention(stripped, opts.variable_naming_convention)
}

fn apply_convention(name: &str, convention: NamingConvention) -> String {
    match convention {
        NamingConvention::CamelCase => {
            let words = split_words(name);
            let mut out = String::new();
            for (i, word) in words.iter().enumerate() {
                if i == 0 {
                    out.push_str(&word.to_lowercase());
                } else {
                    out.push_str(&capitalize(word));
                }
            }
            out
        }
        NamingConvention::PascalCase => {
            split_words(name).iter().map(|w| capitalize(w)).collect()
        }
        NamingConvention::SnakeCase => split_words(name)
            .iter()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join("_"),
        NamingConvention::LowerCase => {
            split_words(name).iter().map(|w| w.to_lowercase()).collect()
        }
        NamingConvention::Default => name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
            .collect(),
    }
}

/// Split a raw name into words at non-identifier separators and lower-to-upper
/// case boundaries
fn split_words(name: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in name.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::NamingRule;

    fn opts_with(convention: NamingConvention) -> ImportOptions {
        ImportOptions { variable_naming_convention: convention, ..ImportOptions::default() }
    }

    #[test]
    fn test_camel_case() {
        let opts = opts_with(NamingConvention::CamelCase);
        assert_eq!(binding_identifier("date-picker", &opts), "datePicker");
        assert_eq!(binding_identifier("my_module.spec", &opts), "myModuleSpec");
        assert_eq!(binding_identifier("HelperUtils", &opts), "helperUtils");
    }

    #[test]
    fn test_pascal_case() {
        let opts = opts_with(NamingConvention::PascalCase);
        assert_eq!(binding_identifier("date-picker", &opts), "DatePicker");
        assert_eq!(binding_identifier("helpers", &opts), "Helpers");
    }

    #[test]
    fn test_snake_case() {
        let opts = opts_with(NamingConvention::SnakeCase);
        assert_eq!(binding_identifier("date-picker", &opts), "date_picker");
        assert_eq!(binding_identifier("DatePicker", &opts), "date_picker");
    }

    #[test]
    fn test_lower_case_join() {
        let opts = opts_with(NamingConvention::LowerCase);
        assert_eq!(binding_identifier("date-picker", &opts), "datepicker");
    }

    #[test]
    fn test_default_strips_to_identifier_chars() {
        let opts = opts_with(NamingConvention::Default);
        assert_eq!(binding_identifier("date-picker", &opts), "datepicker");
        assert_eq!(binding_identifier("my$module_x", &opts), "my$module_x");
    }

    #[test]
    fn test_leading_digits_stripped() {
        let opts = opts_with(NamingConvention::CamelCase);
        assert_eq!(binding_identifier("123helpers", &opts), "helpers");
        let opts = opts_with(NamingConvention::Default);
        assert_eq!(binding_identifier("404page", &opts), "page");
    }

    #[test]
    fn test_pattern_rule_short_circuits() {
        let opts = ImportOptions {
            predefined_variable_names: vec![NamingRule {
                pattern: "^react-dom$".into(),
                replace: "ReactDOM".into(),
            }],
            variable_naming_convention: NamingConvention::SnakeCase,
            ..ImportOptions::default()
        };
        // The rule wins; the snake convention never runs
        assert_eq!(binding_identifier("react-dom", &opts), "ReactDOM");
        // Non-matching names fall through to the convention
        assert_eq!(binding_identifier("date-picker", &opts), "date_picker");
    }

    #[test]
    fn test_pattern_rule_with_capture() {
        let opts = ImportOptions {
            predefined_variable_names: vec![NamingRule {
                pattern: r"^(.+)\.service$".into(),
                replace: "${1}Service".into(),
            }],
            ..ImportOptions::default()
        };
        assert_eq!(binding_identifier("user.service", &opts), "userService");
    }

    #[test]
    fn test_deterministic() {
        let opts = opts_with(NamingConvention::CamelCase);
        let a = binding_identifier("my-date-picker", &opts);
        let b = binding_identifier("my-date-picker", &opts);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_rule_is_skipped() {
        let opts = ImportOptions {
            predefined_variable_names: vec![NamingRule {
                pattern: "([".into(),
                replace: "x".into(),
            }],
            variable_naming_convention: NamingConvention::CamelCase,
            ..ImportOptions::default()
        };
        assert_eq!(binding_identifier("date-picker", &opts), "datePicker");
    }
}
