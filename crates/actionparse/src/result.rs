//! The per-invocation parse result handed to action handlers.

use indexmap::IndexMap;
use serde::Serialize;

use crate::action::Action;
use crate::alias::canonicalize;
use crate::option::Value;

/// Runtime state of one option for one parse pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionState {
    /// Accepted value, else the default, else `None`.
    pub value: Option<Value>,
    pub is_provided: bool,
}

/// Resolved action, bound positionals and option states of one invocation.
///
/// Built fresh for every pass, so a `Program` can be parsed repeatedly
/// without carrying values over.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    action: String,
    is_root: bool,
    args: IndexMap<String, String>,
    options: IndexMap<String, OptionState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stdin: Option<String>,
    #[serde(skip)]
    aliases: IndexMap<String, usize>,
}

impl ParseResult {
    pub(crate) fn new(action: &Action, is_root: bool, stdin: Option<String>) -> Self {
        let options = action
            .options()
            .options()
            .iter()
            .map(|def| {
                (
                    def.key().to_string(),
                    OptionState {
                        value: def.default_value().cloned(),
                        is_provided: false,
                    },
                )
            })
            .collect();
        let aliases = action
            .options()
            .alias_entries()
            .map(|(alias, idx)| (alias.to_string(), idx))
            .collect();
        Self {
            action: action.name().to_string(),
            is_root,
            args: IndexMap::new(),
            options,
            stdin,
            aliases,
        }
    }

    pub(crate) fn accept(&mut self, idx: usize, value: Value) {
        if let Some((_, state)) = self.options.get_index_mut(idx) {
            state.value = Some(value);
            state.is_provided = true;
        }
    }

    pub(crate) fn set_args(&mut self, args: IndexMap<String, String>) {
        self.args = args;
    }

    /// Name of the resolved action (the program name for the root).
    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Bound positional value by declared name.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }

    pub fn args(&self) -> &IndexMap<String, String> {
        &self.args
    }

    /// Option state by any spelling (`name`, `n`, `--name`, `-n`).
    pub fn option(&self, name: &str) -> Option<&OptionState> {
        let alias = canonicalize(name)?;
        let idx = *self.aliases.get(&alias)?;
        self.options.get_index(idx).map(|(_, state)| state)
    }

    /// Option states keyed by preferred alias without dashes, in registration order.
    pub fn options(&self) -> &IndexMap<String, OptionState> {
        &self.options
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.option(name).and_then(|s| s.value.as_ref())
    }

    /// Text value of an option, if it holds one.
    pub fn value_str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    pub fn is_provided(&self, name: &str) -> bool {
        self.option(name).is_some_and(|s| s.is_provided)
    }

    /// Options that were present on the command line.
    pub fn provided(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.options.iter().filter_map(|(key, state)| {
            if !state.is_provided {
                return None;
            }
            state.value.as_ref().map(|v| (key.as_str(), v))
        })
    }

    /// Text read from standard input before matching, if any.
    pub fn stdin(&self) -> Option<&str> {
        self.stdin.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::action;
    use crate::option::opt;

    fn sample() -> ParseResult {
        let action = action("list")
            .option(opt(["format", "f"]).value_name("fmt").default_value("plain"))
            .option(opt(["all", "a"]))
            .build()
            .unwrap();
        ParseResult::new(&action, false, None)
    }

    #[test]
    fn defaults_seed_values_without_marking_provided() {
        let result = sample();
        assert_eq!(result.value_str("format"), Some("plain"));
        assert!(!result.is_provided("f"));
        assert_eq!(result.value("all"), None);
        assert_eq!(result.provided().count(), 0);
    }

    #[test]
    fn accept_marks_option_provided() {
        let mut result = sample();
        result.accept(1, Value::Bool(true));
        assert!(result.is_provided("-a"));
        assert!(result.is_provided("all"));
        let provided: Vec<_> = result.provided().collect();
        assert_eq!(provided, vec![("all", &Value::Bool(true))]);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let mut result = sample();
        result.accept(0, Value::Text("json".to_string()));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["action"], "list");
        assert_eq!(json["options"]["format"]["value"], "json");
        assert_eq!(json["options"]["format"]["isProvided"], true);
        assert!(json.get("aliases").is_none());
    }
}
