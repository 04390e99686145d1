//! Actions (commands) and their positional argument definitions.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::alias::{OptionSet, canonicalize};
use crate::error::SchemaError;
use crate::option::{OptionBuilder, OptionDef, ValueType};

/// A positional argument, bound by declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ArgEntry")]
pub struct ArgDef {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    /// Take the value from standard input when it is missing on the command line.
    pub stdin: bool,
}

/// Manifest form: either a bare name or a full definition.
#[derive(Deserialize)]
#[serde(untagged)]
enum ArgEntry {
    Name(String),
    Full {
        name: String,
        #[serde(default, alias = "desc")]
        description: String,
        #[serde(default, rename = "type")]
        value_type: Option<ValueType>,
        #[serde(default)]
        stdin: bool,
    },
}

impl From<ArgEntry> for ArgDef {
    fn from(entry: ArgEntry) -> Self {
        match entry {
            ArgEntry::Name(name) => ArgDef::new(name),
            ArgEntry::Full {
                name,
                description,
                value_type,
                stdin,
            } => ArgDef {
                name,
                description,
                value_type,
                stdin,
            },
        }
    }
}

/// Start building a positional argument.
pub fn arg(name: impl Into<String>) -> ArgDef {
    ArgDef::new(name)
}

impl ArgDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            value_type: None,
            stdin: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn stdin(mut self, stdin: bool) -> Self {
        self.stdin = stdin;
        self
    }
}

impl From<&str> for ArgDef {
    fn from(name: &str) -> Self {
        ArgDef::new(name)
    }
}

impl From<String> for ArgDef {
    fn from(name: String) -> Self {
        ArgDef::new(name)
    }
}

/// A named command, or the root program itself.
#[derive(Debug, Clone, Default)]
pub struct Action {
    name: String,
    description: String,
    args: Vec<ArgDef>,
    options: OptionSet,
    examples: Vec<String>,
    notes: String,
    documentation: String,
}

impl Action {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Positional argument definitions in binding order.
    pub fn args(&self) -> &[ArgDef] {
        &self.args
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    /// Look up an option by any spelling (`name`, `-n`, `--name`).
    pub fn option(&self, name: &str) -> Option<&Arc<OptionDef>> {
        canonicalize(name).and_then(|alias| self.options.lookup(&alias))
    }

    pub fn reads_stdin(&self) -> bool {
        self.args.iter().any(|a| a.stdin)
    }

    pub(crate) fn add_option(&mut self, option: Arc<OptionDef>) -> Result<(), SchemaError> {
        self.options.register(option, &self.name)
    }

    pub(crate) fn options_mut(&mut self) -> &mut OptionSet {
        &mut self.options
    }

    pub(crate) fn from_parts(
        name: String,
        description: String,
        args: Vec<ArgDef>,
        examples: Vec<String>,
        notes: String,
        documentation: String,
    ) -> Self {
        Self {
            name,
            description,
            args,
            options: OptionSet::new(),
            examples,
            notes,
            documentation,
        }
    }
}

/// Start building a child action.
pub fn action(name: impl Into<String>) -> ActionBuilder {
    ActionBuilder::new(name)
}

/// Builder for a child `Action`; registered through `Program::action`.
#[derive(Clone, Default)]
pub struct ActionBuilder {
    pub(crate) name: String,
    description: String,
    args: Vec<ArgDef>,
    pub(crate) options: Vec<OptionBuilder>,
    examples: Vec<String>,
    notes: String,
    documentation: String,
}

impl ActionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn arg(mut self, arg: impl Into<ArgDef>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn option(mut self, option: OptionBuilder) -> Self {
        self.options.push(option);
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn documentation(mut self, url: impl Into<String>) -> Self {
        self.documentation = url.into();
        self
    }

    /// Build the action with its own options; globals are attached by the program.
    pub(crate) fn build(self) -> Result<Action, SchemaError> {
        let mut action = Action::from_parts(
            self.name,
            self.description,
            self.args,
            self.examples,
            self.notes,
            self.documentation,
        );
        for option in self.options {
            action.add_option(Arc::new(option.build()?))?;
        }
        Ok(action)
    }
}
