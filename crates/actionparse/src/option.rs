//! Option definitions, value types and option handlers.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::alias::canonicalize;
use crate::dispatch::Flow;
use crate::error::SchemaError;
use crate::program::Program;

/// A coerced option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

/// Declared type of an option or positional value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[serde(alias = "String", alias = "str")]
    String,
    #[serde(alias = "Integer", alias = "int")]
    Integer,
    #[serde(alias = "Number", alias = "float")]
    Number,
    #[serde(alias = "Boolean", alias = "bool")]
    Boolean,
}

impl ValueType {
    /// Check `raw` against this type and convert it.
    ///
    /// Returns `None` when the raw text is not a valid value of the type.
    pub fn coerce(self, raw: &str) -> Option<Value> {
        match self {
            Self::String => Some(Value::Text(raw.to_string())),
            Self::Integer => raw.trim().parse::<i64>().ok().map(Value::Int),
            Self::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Value::Float),
            Self::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(Value::Bool(true)),
                "false" | "no" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
        }
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "str" => Ok(Self::String),
            "integer" | "int" => Ok(Self::Integer),
            "number" | "float" => Ok(Self::Number),
            "boolean" | "bool" => Ok(Self::Boolean),
            other => Err(format!("unknown value type '{other}'")),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        };
        f.write_str(s)
    }
}

/// Everything an option handler gets to see when its option is accepted.
pub struct OptionHit<'a> {
    pub option: &'a OptionDef,
    /// The alias as it appeared in argv.
    pub alias: &'a str,
    pub value: &'a Value,
    /// The resolved target action (root or child).
    pub action: &'a Action,
    pub program: &'a Program,
}

pub type OptionHandler = Arc<dyn Fn(&OptionHit<'_>) -> Flow + Send + Sync>;

/// A registered option.
///
/// Options are immutable once built and shared between actions via `Arc`
/// (global options live in every action's alias table).
#[derive(Clone)]
pub struct OptionDef {
    aliases: Vec<String>,
    value_name: Option<String>,
    description: String,
    default: Option<Value>,
    required: bool,
    value_type: Option<ValueType>,
    eager: bool,
    builtin: bool,
    handler: Option<OptionHandler>,
}

impl fmt::Debug for OptionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDef")
            .field("aliases", &self.aliases)
            .field("value_name", &self.value_name)
            .field("description", &self.description)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("value_type", &self.value_type)
            .field("eager", &self.eager)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

impl OptionDef {
    /// Canonical aliases, single-character ones first.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Value placeholder. `None` means the option is a boolean flag.
    pub fn value_name(&self) -> Option<&str> {
        self.value_name.as_deref()
    }

    pub fn takes_value(&self) -> bool {
        self.value_name.is_some()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    /// Eager options fire before scan errors and validation are reported.
    pub fn eager(&self) -> bool {
        self.eager
    }

    pub(crate) fn is_builtin(&self) -> bool {
        self.builtin
    }

    pub fn handler(&self) -> Option<&OptionHandler> {
        self.handler.as_ref()
    }

    /// Multi-character alias if there is one, otherwise the single-character one.
    pub fn preferred_alias(&self) -> &str {
        self.aliases
            .iter()
            .find(|a| a.starts_with("--"))
            .or_else(|| self.aliases.first())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Name used to key this option in a `ParseResult` (preferred alias without dashes).
    pub fn key(&self) -> &str {
        self.preferred_alias().trim_start_matches('-')
    }

    /// Default options (help/version) are built from known-good aliases.
    pub(crate) fn builtin(
        short: &str,
        long: &str,
        description: &str,
        handler: impl Fn(&OptionHit<'_>) -> Flow + Send + Sync + 'static,
    ) -> Self {
        Self {
            aliases: vec![format!("-{short}"), format!("--{long}")],
            value_name: None,
            description: description.to_string(),
            default: None,
            required: false,
            value_type: None,
            eager: true,
            builtin: true,
            handler: Some(Arc::new(handler)),
        }
    }
}

/// Start building an option from its alias list, e.g. `opt(["name", "n"])`.
pub fn opt<I, S>(aliases: I) -> OptionBuilder
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    OptionBuilder::new(aliases)
}

/// Builder for `OptionDef`.
#[derive(Clone, Default)]
pub struct OptionBuilder {
    aliases: Vec<String>,
    value_name: Option<String>,
    description: String,
    default: Option<Value>,
    required: bool,
    value_type: Option<ValueType>,
    eager: bool,
    handler: Option<OptionHandler>,
}

impl OptionBuilder {
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Make the option value-taking; `name` is shown as `<name>` in help.
    pub fn value_name(mut self, name: impl Into<String>) -> Self {
        self.value_name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    pub fn handler(
        mut self,
        handler: impl Fn(&OptionHit<'_>) -> Flow + Send + Sync + 'static,
    ) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<OptionDef, SchemaError> {
        if self.aliases.is_empty() {
            return Err(SchemaError::MissingAliases);
        }

        let mut aliases: Vec<String> = Vec::with_capacity(self.aliases.len());
        for raw in &self.aliases {
            let alias = canonicalize(raw).ok_or_else(|| SchemaError::InvalidAlias(raw.clone()))?;
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
        // Stable: single-character aliases first, declaration order otherwise.
        aliases.sort_by_key(|a| a.starts_with("--"));

        Ok(OptionDef {
            aliases,
            value_name: self.value_name,
            description: self.description,
            default: self.default,
            required: self.required,
            value_type: self.value_type,
            eager: self.eager,
            builtin: false,
            handler: self.handler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_orders_short_aliases_first() {
        let def = opt(["name", "n"]).value_name("name").build().unwrap();
        assert_eq!(def.aliases(), &["-n".to_string(), "--name".to_string()]);
        assert_eq!(def.preferred_alias(), "--name");
        assert_eq!(def.key(), "name");
        assert!(def.takes_value());
    }

    #[test]
    fn build_rejects_missing_aliases() {
        let err = opt(Vec::<String>::new()).build().unwrap_err();
        assert_eq!(err, SchemaError::MissingAliases);

        let err = OptionBuilder::default().build().unwrap_err();
        assert_eq!(err, SchemaError::MissingAliases);
    }

    #[test]
    fn build_rejects_blank_alias() {
        let err = opt(["--"]).build().unwrap_err();
        assert_eq!(err, SchemaError::InvalidAlias("--".to_string()));
    }

    #[test]
    fn build_rejects_alias_with_inline_value_separator() {
        let err = opt(["a=b"]).build().unwrap_err();
        assert_eq!(err, SchemaError::InvalidAlias("a=b".to_string()));
    }

    #[test]
    fn preferred_alias_falls_back_to_short() {
        let def = opt(["x"]).build().unwrap();
        assert_eq!(def.preferred_alias(), "-x");
        assert_eq!(def.key(), "x");
    }

    #[test]
    fn coerce_checks_types() {
        assert_eq!(ValueType::Integer.coerce("42"), Some(Value::Int(42)));
        assert_eq!(ValueType::Integer.coerce("4.2"), None);
        assert_eq!(ValueType::Number.coerce("4.5"), Some(Value::Float(4.5)));
        assert_eq!(ValueType::Number.coerce("NaN"), None);
        assert_eq!(ValueType::Boolean.coerce("yes"), Some(Value::Bool(true)));
        assert_eq!(ValueType::Boolean.coerce("maybe"), None);
        assert_eq!(
            ValueType::String.coerce("anything"),
            Some(Value::Text("anything".to_string()))
        );
    }

    #[test]
    fn value_type_parses_names() {
        assert_eq!("Number".parse::<ValueType>(), Ok(ValueType::Number));
        assert!("date".parse::<ValueType>().is_err());
    }
}
