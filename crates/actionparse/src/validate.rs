//! Required-option checks and type coercion of matched values.

use indexmap::IndexMap;

use crate::action::Action;
use crate::error::ParseError;
use crate::matcher::RawHit;
use crate::option::{OptionDef, Value, ValueType};

/// Validate one option against its scan hit and produce the accepted value.
///
/// `Ok(None)` means the option was absent and not required.
pub(crate) fn accept(
    def: &OptionDef,
    hit: Option<&RawHit<'_>>,
) -> Result<Option<Value>, ParseError> {
    let Some(hit) = hit else {
        if def.required() {
            return Err(ParseError::MissingRequiredOption {
                option: def.preferred_alias().to_string(),
            });
        }
        return Ok(None);
    };

    let value = match (hit.value, def.value_type()) {
        (None, None | Some(ValueType::Boolean)) => Value::Bool(true),
        (None, Some(_)) => {
            return Err(ParseError::InvalidOptionValue {
                option: hit.alias.to_string(),
                value: "true".to_string(),
            });
        }
        (Some(raw), None) => Value::Text(raw.to_string()),
        (Some(raw), Some(ty)) => ty.coerce(raw).ok_or_else(|| ParseError::InvalidOptionValue {
            option: hit.alias.to_string(),
            value: raw.to_string(),
        })?,
    };
    Ok(Some(value))
}

/// Type-check bound positionals. Values stay strings.
pub(crate) fn check_args(
    action: &Action,
    bound: &IndexMap<String, String>,
) -> Result<(), ParseError> {
    for def in action.args() {
        let (Some(ty), Some(value)) = (def.value_type, bound.get(&def.name)) else {
            continue;
        };
        if ty.coerce(value).is_none() {
            return Err(ParseError::InvalidArgValue {
                arg: def.name.clone(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{action, arg};
    use crate::option::opt;

    fn hit<'a>(alias: &'a str, value: Option<&'a str>) -> RawHit<'a> {
        RawHit { alias, value }
    }

    #[test]
    fn required_option_reports_preferred_alias() {
        let def = opt(["n", "name"]).value_name("name").required(true).build().unwrap();
        let err = accept(&def, None).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingRequiredOption {
                option: "--name".to_string()
            }
        );
    }

    #[test]
    fn absent_optional_option_is_skipped() {
        let def = opt(["quiet", "q"]).build().unwrap();
        assert_eq!(accept(&def, None).unwrap(), None);
    }

    #[test]
    fn values_are_coerced_by_type() {
        let def = opt(["count", "c"])
            .value_name("n")
            .value_type(ValueType::Integer)
            .build()
            .unwrap();
        let value = accept(&def, Some(&hit("-c", Some("3")))).unwrap();
        assert_eq!(value, Some(Value::Int(3)));

        let err = accept(&def, Some(&hit("--count", Some("three")))).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidOptionValue {
                option: "--count".to_string(),
                value: "three".to_string()
            }
        );
    }

    #[test]
    fn untyped_values_stay_text() {
        let def = opt(["eye", "e"]).value_name("str").build().unwrap();
        let value = accept(&def, Some(&hit("-e", Some("42")))).unwrap();
        assert_eq!(value, Some(Value::Text("42".to_string())));
    }

    #[test]
    fn flags_only_pass_boolean_types() {
        let flag = opt(["think", "t"]).build().unwrap();
        assert_eq!(accept(&flag, Some(&hit("-t", None))).unwrap(), Some(Value::Bool(true)));

        let typed = opt(["think", "t"]).value_type(ValueType::Number).build().unwrap();
        assert!(matches!(
            accept(&typed, Some(&hit("-t", None))),
            Err(ParseError::InvalidOptionValue { .. })
        ));
    }

    #[test]
    fn typed_positionals_are_checked() {
        let action = action("repeat")
            .arg(arg("count").value_type(ValueType::Integer))
            .arg("text")
            .build()
            .unwrap();

        let mut bound = IndexMap::new();
        bound.insert("count".to_string(), "2".to_string());
        bound.insert("text".to_string(), "hi".to_string());
        assert!(check_args(&action, &bound).is_ok());

        bound.insert("count".to_string(), "two".to_string());
        assert_eq!(
            check_args(&action, &bound).unwrap_err(),
            ParseError::InvalidArgValue {
                arg: "count".to_string(),
                value: "two".to_string()
            }
        );
    }
}
