//! Declarative command-line parsing with actions.
//!
//! A [`Program`] is built by registering options, positional arguments and
//! child actions. Each invocation is then matched against that schema: the
//! target action is selected, options are scanned and validated, positionals
//! are bound, and exactly one action handler fires. Help and version output is
//! rendered from the same schema.
//!
//! ```no_run
//! use actionparse::{Dispatch, Invocation, Program, ProcessTerminal, ProgramInfo, opt};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut program = Program::new(ProgramInfo::new("greet").version("0.1.0").arg("text"));
//! program.option(opt(["name", "n"]).value_name("name").required(true))?;
//!
//! let mut dispatch = Dispatch::new().main(|result| {
//!     let text = result.arg("text").unwrap_or_default();
//!     println!("{text}, {}!", result.value_str("name").unwrap_or_default());
//!     Ok(())
//! });
//! let invocation = Invocation::from_env(&program)?;
//! program.run(&invocation, &mut dispatch, &mut ProcessTerminal);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod alias;
pub mod dispatch;
pub mod error;
pub mod help;
pub mod info;
pub mod input;
pub mod layout;
mod matcher;
pub mod option;
pub mod program;
pub mod result;
pub mod terminal;
mod validate;

pub use action::{Action, ActionBuilder, ArgDef, action, arg};
pub use alias::{OptionSet, canonicalize};
pub use dispatch::{ActionHandler, Dispatch, Exit, Flow, ParseOutcome};
pub use error::{ManifestError, ParseError, SchemaError};
pub use help::HelpSettings;
pub use info::ProgramInfo;
pub use input::Invocation;
pub use layout::{Layout, PlainLayout};
pub use option::{OptionBuilder, OptionDef, OptionHandler, OptionHit, Value, ValueType, opt};
pub use program::Program;
pub use result::{OptionState, ParseResult};
pub use terminal::{ProcessTerminal, RecordingTerminal, Terminal};
