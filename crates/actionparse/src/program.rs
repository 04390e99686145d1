//! The program schema: root action, child actions and global options.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::action::{Action, ActionBuilder};
use crate::dispatch::{Exit, Flow};
use crate::error::SchemaError;
use crate::help::{self, HelpSettings};
use crate::info::ProgramInfo;
use crate::layout::{Layout, PlainLayout};
use crate::option::{OptionBuilder, OptionDef};

/// A command-line program: the root action plus its child actions.
///
/// Registration calls build the schema; `parse`/`run` then take `&self`, so
/// one program can be parsed any number of times.
pub struct Program {
    root: Action,
    version: String,
    actions: IndexMap<String, Action>,
    globals: Vec<Arc<OptionDef>>,
    layout: Arc<dyn Layout + Send + Sync>,
    help: HelpSettings,
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("root", &self.root)
            .field("version", &self.version)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("globals", &self.globals.len())
            .field("help", &self.help)
            .finish()
    }
}

impl Program {
    /// Create a program with the default `-h, --help` and `-v, --version` options.
    pub fn new(info: impl Into<ProgramInfo>) -> Self {
        let info = info.into();
        let name = info.program_name().to_string();
        let root = Action::from_parts(
            name,
            info.description,
            info.args,
            info.examples,
            info.notes,
            info.documentation,
        );
        let mut program = Self {
            root,
            version: info.version,
            actions: IndexMap::new(),
            globals: Vec::new(),
            layout: Arc::new(PlainLayout),
            help: HelpSettings::default(),
        };

        let defaults = [
            OptionDef::builtin("h", "help", "Displays this help.", |hit| {
                Flow::Exit(Exit::success(hit.program.help(hit.action)))
            }),
            OptionDef::builtin("v", "version", "Displays version information.", |hit| {
                Flow::Exit(Exit::success(hit.program.version_text()))
            }),
        ];
        for def in defaults {
            let def = Arc::new(def);
            // Empty table, distinct aliases.
            if program.root.add_option(Arc::clone(&def)).is_ok() {
                program.globals.push(def);
            }
        }
        program
    }

    /// Drop the default help and version options.
    pub fn without_default_options(mut self) -> Self {
        self.globals.retain(|o| !o.is_builtin());
        self.root.options_mut().retain(|o| !o.is_builtin());
        for action in self.actions.values_mut() {
            action.options_mut().retain(|o| !o.is_builtin());
        }
        self
    }

    pub fn with_layout(mut self, layout: impl Layout + Send + Sync + 'static) -> Self {
        self.layout = Arc::new(layout);
        self
    }

    pub fn with_help_settings(mut self, settings: HelpSettings) -> Self {
        self.help = settings;
        self
    }

    /// Register an option on the root action only.
    pub fn option(&mut self, option: OptionBuilder) -> Result<&mut Self, SchemaError> {
        let def = Arc::new(option.build()?);
        tracing::debug!(option = def.preferred_alias(), "registering root option");
        self.root.add_option(def)?;
        Ok(self)
    }

    /// Register several root options in order, stopping at the first failure.
    pub fn options(
        &mut self,
        options: impl IntoIterator<Item = OptionBuilder>,
    ) -> Result<&mut Self, SchemaError> {
        for option in options {
            self.option(option)?;
        }
        Ok(self)
    }

    /// Register an option on the root and on every action, present and future.
    ///
    /// Collisions are checked everywhere before anything is inserted.
    pub fn global_option(&mut self, option: OptionBuilder) -> Result<&mut Self, SchemaError> {
        let def = Arc::new(option.build()?);
        self.root.options().check(&def, self.root.name())?;
        for action in self.actions.values() {
            action.options().check(&def, action.name())?;
        }

        tracing::debug!(
            option = def.preferred_alias(),
            actions = self.actions.len(),
            "registering global option"
        );
        self.root.add_option(Arc::clone(&def))?;
        for action in self.actions.values_mut() {
            action.add_option(Arc::clone(&def))?;
        }
        self.globals.push(def);
        Ok(self)
    }

    /// Register a child action. It receives every global option registered so far.
    pub fn action(&mut self, action: ActionBuilder) -> Result<&mut Self, SchemaError> {
        if self.actions.contains_key(&action.name) {
            return Err(SchemaError::DuplicatedActionName(action.name));
        }
        let mut action = action.build()?;
        for def in &self.globals {
            action.add_option(Arc::clone(def))?;
        }
        tracing::debug!(action = action.name(), "registering action");
        self.actions.insert(action.name().to_string(), action);
        Ok(self)
    }

    /// Program name as shown in usage lines and error hints.
    pub fn name(&self) -> &str {
        self.root.name()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn root(&self) -> &Action {
        &self.root
    }

    /// Child action by name.
    pub fn action_named(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// Child actions in registration order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }

    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn globals(&self) -> &[Arc<OptionDef>] {
        &self.globals
    }

    pub fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    pub fn help_settings(&self) -> &HelpSettings {
        &self.help
    }

    /// Whether any action may take a positional value from standard input.
    pub fn reads_stdin(&self) -> bool {
        self.root.reads_stdin() || self.actions.values().any(Action::reads_stdin)
    }

    /// Help text for `action` (the root or one of the children).
    pub fn help(&self, action: &Action) -> String {
        help::render(self, action)
    }

    pub fn version_text(&self) -> String {
        help::render_version(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::action;
    use crate::option::opt;

    #[test]
    fn default_options_are_global() {
        let mut p = Program::new("greet");
        p.action(action("list")).unwrap();
        let list = p.action_named("list").unwrap();
        assert!(list.option("-h").is_some());
        assert!(list.option("--version").is_some());
        assert!(Arc::ptr_eq(
            list.option("help").unwrap(),
            p.root().option("help").unwrap()
        ));
    }

    #[test]
    fn defaults_can_be_dropped() {
        let p = Program::new("greet").without_default_options();
        assert!(p.root().options().is_empty());
        assert!(p.globals().is_empty());
    }

    #[test]
    fn global_added_after_action_is_visible_in_it() {
        let mut p = Program::new("greet");
        p.action(action("list")).unwrap();
        p.global_option(opt(["verbose", "V"])).unwrap();
        p.action(action("show")).unwrap();

        for name in ["list", "show"] {
            let found = p.action_named(name).unwrap().option("--verbose").unwrap();
            assert!(Arc::ptr_eq(found, p.root().option("-V").unwrap()));
        }
    }

    #[test]
    fn failed_global_leaves_schema_unchanged() {
        let mut p = Program::new("greet");
        p.action(action("list").option(opt(["long", "l"]))).unwrap();
        let before = p.root().options().len();

        let err = p.global_option(opt(["level", "l"])).unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateOption {
                alias: "-l".to_string(),
                action: "list".to_string()
            }
        );
        assert_eq!(p.root().options().len(), before);
        assert!(p.root().option("--level").is_none());
        assert!(p.action_named("list").unwrap().option("--level").is_none());
    }

    #[test]
    fn duplicate_action_names_are_rejected() {
        let mut p = Program::new("greet");
        p.action(action("list")).unwrap();
        let err = p.action(action("list")).unwrap_err();
        assert_eq!(err, SchemaError::DuplicatedActionName("list".to_string()));
    }

    #[test]
    fn action_option_clashing_with_global_is_rejected() {
        let mut p = Program::new("greet");
        let err = p.action(action("list").option(opt(["h"]))).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateOption { ref alias, .. } if alias == "-h"));
        assert!(!p.has_actions());
    }

    #[test]
    fn reads_stdin_checks_every_action() {
        let mut p = Program::new("greet");
        assert!(!p.reads_stdin());
        p.action(action("echo").arg(crate::action::arg("text").stdin(true)))
            .unwrap();
        assert!(p.reads_stdin());
    }
}
