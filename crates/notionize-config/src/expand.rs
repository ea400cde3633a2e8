//! Environment variable expansion for configuration values.
//!
//! Two spellings are understood:
//! - `${VAR}` / `${VAR:-default}` inside any string value
//! - the MkDocs `!ENV VAR` and `!ENV [VAR, default]` YAML tags

use serde_yaml::Value;
use serde_yaml::value::Tag;

use crate::ConfigError;

/// Expand `${VAR}` references using `lookup` to resolve variables.
///
/// Bare `$VAR` is left untouched so URLs containing `$` survive.
pub(crate) fn expand_with(
    value: &str,
    field: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| {
        lookup(var).map(Some).ok_or(MissingVar)
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.var_name),
    })
}

/// Variable referenced by a config value but absent from the environment.
struct MissingVar;

/// Resolve MkDocs `!ENV` tagged scalars against `lookup`.
///
/// `!ENV VAR` becomes the variable's value, or null when unset.
/// `!ENV [A, B, default]` takes the first variable that is set, falling back
/// to the last item as a literal.
pub(crate) fn untag_env(value: Value, lookup: &impl Fn(&str) -> Option<String>) -> Value {
    match value {
        Value::Tagged(tagged) if tagged.tag == Tag::new("ENV") => match tagged.value {
            Value::String(var) => lookup(&var).map_or(Value::Null, Value::String),
            Value::Sequence(items) => env_with_fallback(&items, lookup),
            other => other,
        },
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| (key, untag_env(value, lookup)))
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| untag_env(item, lookup))
                .collect(),
        ),
        other => other,
    }
}

fn env_with_fallback(items: &[Value], lookup: &impl Fn(&str) -> Option<String>) -> Value {
    let Some((last, vars)) = items.split_last() else {
        return Value::Null;
    };
    vars.iter()
        .filter_map(Value::as_str)
        .find_map(lookup)
        .map_or_else(|| last.clone(), Value::String)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn expand(value: &str, vars: &HashMap<String, String>) -> Result<String, ConfigError> {
        expand_with(value, "notion.notion_token", |var| vars.get(var).cloned())
    }

    #[test]
    fn test_expand_simple_var() {
        let vars = env(&[("NOTION_TOKEN", "secret_abc")]);
        assert_eq!(expand("${NOTION_TOKEN}", &vars).unwrap(), "secret_abc");
    }

    #[test]
    fn test_expand_default_used_when_unset() {
        let vars = env(&[]);
        assert_eq!(expand("${MISSING:-fallback}", &vars).unwrap(), "fallback");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        let err = expand("${MISSING_TOKEN}", &env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let msg = err.to_string();
        assert!(msg.contains("MISSING_TOKEN"));
        assert!(msg.contains("notion.notion_token"));
    }

    #[test]
    fn test_literal_and_bare_dollar_unchanged() {
        let vars = env(&[]);
        assert_eq!(expand("plain", &vars).unwrap(), "plain");
        assert_eq!(expand("$VAR", &vars).unwrap(), "$VAR");
        assert_eq!(
            expand("https://api.example.com/$v1", &vars).unwrap(),
            "https://api.example.com/$v1"
        );
    }

    fn untag(yaml: &str, vars: &HashMap<String, String>) -> Value {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        untag_env(value, &|var: &str| vars.get(var).cloned())
    }

    #[test]
    fn test_untag_env_scalar() {
        let vars = env(&[("NOTION_TOKEN", "secret_abc")]);
        let value = untag("token: !ENV NOTION_TOKEN", &vars);
        assert_eq!(value["token"].as_str(), Some("secret_abc"));

        let value = untag("token: !ENV NOTION_TOKEN", &env(&[]));
        assert!(value["token"].is_null());
    }

    #[test]
    fn test_untag_env_with_fallbacks() {
        let yaml = "token: !ENV [NOTION_TOKEN, NOTION_KEY, none]";

        let value = untag(yaml, &env(&[("NOTION_KEY", "second")]));
        assert_eq!(value["token"].as_str(), Some("second"));

        let value = untag(yaml, &env(&[]));
        assert_eq!(value["token"].as_str(), Some("none"));
    }

    #[test]
    fn test_untag_env_nested_in_plugin_list() {
        let yaml = "plugins:\n  - search\n  - notion:\n      notion_token: !ENV TOKEN\n";
        let value = untag(yaml, &env(&[("TOKEN", "t")]));
        assert_eq!(value["plugins"][1]["notion"]["notion_token"].as_str(), Some("t"));
    }

    #[test]
    fn test_untag_env_leaves_other_tags() {
        let value = untag("fmt: !!python/name:foo.bar", &env(&[]));
        assert!(matches!(value["fmt"], Value::Tagged(_)));
    }
}
