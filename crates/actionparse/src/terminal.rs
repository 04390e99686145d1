//! The exit primitive every terminal path goes through.

use std::io::Write;

pub trait Terminal {
    /// Emit `message` and end the run with `code`.
    ///
    /// Code 0 is help or version output, anything else is an error.
    fn exit(&mut self, message: &str, code: i32);
}

/// Writes to stdout (code 0) or stderr and terminates the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTerminal;

impl Terminal for ProcessTerminal {
    fn exit(&mut self, message: &str, code: i32) {
        if code == 0 {
            let mut out = std::io::stdout().lock();
            let _ = writeln!(out, "{message}");
            let _ = out.flush();
        } else {
            let mut err = std::io::stderr().lock();
            let _ = writeln!(err, "{message}");
            let _ = err.flush();
        }
        std::process::exit(code);
    }
}

/// Records exits instead of ending the process.
#[derive(Debug, Clone, Default)]
pub struct RecordingTerminal {
    pub exits: Vec<(String, i32)>,
}

impl RecordingTerminal {
    pub fn last(&self) -> Option<(&str, i32)> {
        self.exits.last().map(|(m, c)| (m.as_str(), *c))
    }
}

impl Terminal for RecordingTerminal {
    fn exit(&mut self, message: &str, code: i32) {
        self.exits.push((message.to_string(), code));
    }
}
