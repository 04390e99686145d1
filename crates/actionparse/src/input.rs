//! The raw input of one invocation.

use std::ffi::OsString;
use std::io::{self, BufRead, IsTerminal, Read};

use crate::matcher;
use crate::program::Program;

/// Upper bound on the bytes read from standard input for one positional.
pub const STDIN_LIMIT: u64 = 64 * 1024;

/// Arguments (executable name excluded) and optional standard-input text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<String>,
    pub stdin: Option<String>,
}

impl Invocation {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            stdin: None,
        }
    }

    pub fn with_stdin(mut self, text: impl Into<String>) -> Self {
        self.stdin = Some(text.into());
        self
    }

    /// Read the process arguments, then one line of stdin if `program` would
    /// bind it to a missing positional and stdin is not a terminal.
    ///
    /// Fails with `InvalidData` when an argument is not valid UTF-8.
    pub fn from_env(program: &Program) -> io::Result<Self> {
        let mut invocation = Self {
            argv: utf8_args(std::env::args_os().skip(1))?,
            stdin: None,
        };
        if invocation.needs_stdin(program) {
            let stdin = io::stdin();
            if !stdin.is_terminal() {
                invocation.stdin = read_line_from(stdin.lock())?;
                tracing::debug!(read = invocation.stdin.is_some(), "read standard input");
            }
        }
        Ok(invocation)
    }

    /// Whether parsing this invocation would take a positional from stdin.
    ///
    /// False when help or version is requested, when the scan already fails,
    /// or when the command line supplies every positional.
    pub fn needs_stdin(&self, program: &Program) -> bool {
        matcher::needs_stdin(program, &self.argv)
    }
}

pub(crate) fn utf8_args<I>(args: I) -> io::Result<Vec<String>>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            arg.into_string().map_err(|raw| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("argument is not valid UTF-8: {}", raw.to_string_lossy()),
                )
            })
        })
        .collect()
}

/// First line of `reader` without its line terminator, reading at most
/// `STDIN_LIMIT` bytes; `None` at EOF.
pub(crate) fn read_line_from<R: BufRead>(reader: R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.take(STDIN_LIMIT).read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}
