//! Help and version text.

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::layout::Layout;
use crate::option::OptionDef;
use crate::program::Program;

/// Wrap widths used by the help renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpSettings {
    /// Width for descriptions and notes.
    pub width: usize,
    /// Width for the description column of the command and option tables.
    pub column_width: usize,
}

impl Default for HelpSettings {
    fn default() -> Self {
        Self {
            width: 80,
            column_width: 50,
        }
    }
}

/// Render the help text for `action`, which is the program root or one of its children.
pub fn render(program: &Program, action: &Action) -> String {
    let layout = program.layout();
    let settings = program.help_settings();
    let is_root = std::ptr::eq(action, program.root());

    let mut sections = vec![usage(program, action, is_root)];

    let description = action.description().trim();
    if !description.is_empty() {
        sections.push(layout.wrap(description, settings.width));
    }

    if is_root && program.has_actions() {
        let rows: Vec<(String, String)> = program
            .actions()
            .map(|a| {
                (
                    a.name().to_string(),
                    layout.wrap(a.description().trim(), settings.column_width),
                )
            })
            .collect();
        sections.push(format!("Commands:\n{}", table(layout, &rows)));
    }

    if !action.options().is_empty() {
        let mut options: Vec<&OptionDef> = action
            .options()
            .options()
            .iter()
            .map(|o| o.as_ref())
            .collect();
        options.sort_by_key(|o| o.eager());
        let rows: Vec<(String, String)> = options
            .into_iter()
            .map(|o| (option_label(o), layout.wrap(&option_help(o), settings.column_width)))
            .collect();
        sections.push(format!("Options:\n{}", table(layout, &rows)));
    }

    if !action.examples().is_empty() {
        let examples: Vec<String> = action
            .examples()
            .iter()
            .map(|ex| {
                let ex = ex.trim_end();
                if ex.starts_with('$') || ex.starts_with('#') {
                    format!("  {ex}")
                } else {
                    format!("  $ {ex}")
                }
            })
            .collect();
        sections.push(format!("Examples:\n{}", examples.join("\n")));
    }

    let notes = action.notes().trim();
    if !notes.is_empty() {
        sections.push(layout.wrap(notes, settings.width));
    }

    let documentation = Some(action.documentation())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| program.root().documentation());
    if !documentation.is_empty() {
        sections.push(format!("Documentation can be found at {documentation}."));
    }

    sections.join("\n\n")
}

/// `<program> <version>`.
pub fn render_version(program: &Program) -> String {
    format!("{} {}", program.name(), program.version().trim())
}

fn usage(program: &Program, action: &Action, is_root: bool) -> String {
    let mut out = format!("Usage: {}", program.name());
    if !is_root {
        out.push(' ');
        out.push_str(action.name());
    } else if program.has_actions() {
        out.push_str(" <command>");
    }
    for arg in action.args() {
        out.push_str(&format!(" <{}>", arg.name));
    }
    if !action.options().is_empty() {
        out.push_str(" [options]");
    }
    out
}

fn option_label(def: &OptionDef) -> String {
    let mut label = def.aliases().join(", ");
    if let Some(name) = def.value_name() {
        label.push_str(&format!(" <{name}>"));
    }
    label
}

fn option_help(def: &OptionDef) -> String {
    let mut out = def.description().trim().to_string();
    if def.required() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str("(required)");
    }
    if let Some(default) = def.default_value() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("[default: {default}]"));
    }
    out
}

fn table(layout: &dyn Layout, rows: &[(String, String)]) -> String {
    layout
        .strip_markup(&layout.table(rows))
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
