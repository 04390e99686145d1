//! Parse passes and handler dispatch.
//!
//! `Program::parse` turns an invocation into either a `ParseResult` or an
//! early exit (help, version, a handler-requested stop). `Program::run` adds
//! the action handler table and the exit primitive on top.

use std::collections::HashMap;

use crate::action::Action;
use crate::error::ParseError;
use crate::input::Invocation;
use crate::matcher::{self, RawHit};
use crate::option::{OptionDef, OptionHit, Value};
use crate::program::Program;
use crate::result::ParseResult;
use crate::terminal::Terminal;
use crate::validate;

/// What an option handler wants the pass to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(Exit),
}

/// A terminal path: message plus process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub message: String,
    pub code: i32,
}

impl Exit {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 0,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 1,
        }
    }
}

/// Result of one parse pass that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Every check passed; the action handler should fire.
    Matched(ParseResult),
    /// An option handler ended the pass.
    Exit(Exit),
}

pub type ActionHandler<'h> = Box<dyn FnMut(&ParseResult) -> anyhow::Result<()> + 'h>;

/// Action handlers keyed by action name; `main` handles the root.
#[derive(Default)]
pub struct Dispatch<'h> {
    main: Option<ActionHandler<'h>>,
    actions: HashMap<String, ActionHandler<'h>>,
}

impl<'h> Dispatch<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn main(mut self, handler: impl FnMut(&ParseResult) -> anyhow::Result<()> + 'h) -> Self {
        self.main = Some(Box::new(handler));
        self
    }

    pub fn on(
        mut self,
        action: impl Into<String>,
        handler: impl FnMut(&ParseResult) -> anyhow::Result<()> + 'h,
    ) -> Self {
        self.actions.insert(action.into(), Box::new(handler));
        self
    }

    /// Fire the handler bound to the resolved action. Returns whether one was bound.
    pub fn fire(&mut self, result: &ParseResult) -> anyhow::Result<bool> {
        let handler = if result.is_root() {
            self.main.as_mut()
        } else {
            self.actions.get_mut(result.action())
        };
        let Some(handler) = handler else {
            tracing::debug!(action = result.action(), "no handler bound");
            return Ok(false);
        };
        tracing::debug!(action = result.action(), "dispatching action handler");
        handler(result)?;
        Ok(true)
    }
}

impl Program {
    /// Match, validate and bind one invocation without touching process state.
    pub fn parse(&self, invocation: &Invocation) -> Result<ParseOutcome, ParseError> {
        let argv = &invocation.argv;
        let (target, skip) = match matcher::select_action(self, argv) {
            Some((action, idx)) => (action, Some(idx)),
            None => (self.root(), None),
        };
        let is_root = skip.is_none();
        tracing::debug!(action = target.name(), is_root, "resolved target action");

        let scan = matcher::scan(target, argv, skip);
        let mut result = ParseResult::new(target, is_root, invocation.stdin.clone());
        let options = target.options().options();

        // Eager options (help, version) win over every error.
        for (idx, def) in options.iter().enumerate().filter(|(_, d)| d.eager()) {
            let Some(hit) = scan.hits[idx].as_ref() else {
                continue;
            };
            if let Some(value) = validate::accept(def, Some(hit))? {
                if let Flow::Exit(exit) = self.fire_option(def, hit, &value, target) {
                    return Ok(ParseOutcome::Exit(exit));
                }
                result.accept(idx, value);
            }
        }

        if let Some(err) = scan.error {
            return Err(err);
        }

        for (idx, def) in options.iter().enumerate() {
            let hit = scan.hits[idx].as_ref();
            if def.eager() && hit.is_some() {
                continue;
            }
            let Some(value) = validate::accept(def, hit)? else {
                continue;
            };
            if let Some(hit) = hit {
                if let Flow::Exit(exit) = self.fire_option(def, hit, &value, target) {
                    return Ok(ParseOutcome::Exit(exit));
                }
            }
            result.accept(idx, value);
        }

        let bound = matcher::bind_positionals(
            target.args(),
            &scan.positionals,
            invocation.stdin.as_deref(),
        )?;
        validate::check_args(target, &bound)?;
        tracing::debug!(args = bound.len(), "bound positionals");
        result.set_args(bound);

        Ok(ParseOutcome::Matched(result))
    }

    /// Parse, dispatch and route every terminal path through `terminal`.
    ///
    /// Returns the exit code; with a process terminal the call does not return
    /// on help, version or errors.
    pub fn run<T: Terminal + ?Sized>(
        &self,
        invocation: &Invocation,
        dispatch: &mut Dispatch<'_>,
        terminal: &mut T,
    ) -> i32 {
        let exit = match self.parse(invocation) {
            Ok(ParseOutcome::Matched(result)) => match dispatch.fire(&result) {
                Ok(_) => return 0,
                Err(err) => Exit::failure(format!("Error: {err:#}")),
            },
            Ok(ParseOutcome::Exit(exit)) => exit,
            Err(err) => {
                tracing::debug!(code = err.code(), "parse failed");
                Exit::failure(err.user_message(self.name()))
            }
        };
        terminal.exit(&exit.message, exit.code);
        exit.code
    }

    fn fire_option(
        &self,
        def: &OptionDef,
        hit: &RawHit<'_>,
        value: &Value,
        action: &Action,
    ) -> Flow {
        let Some(handler) = def.handler() else {
            return Flow::Continue;
        };
        tracing::debug!(option = hit.alias, "firing option handler");
        handler(&OptionHit {
            option: def,
            alias: hit.alias,
            value,
            action,
            program: self,
        })
    }
}
