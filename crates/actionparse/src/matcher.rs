//! Token matching: action selection, option scanning and positional binding.

use indexmap::IndexMap;

use crate::action::{Action, ArgDef};
use crate::alias::OptionSet;
use crate::error::ParseError;
use crate::program::Program;

/// An option occurrence found in argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawHit<'a> {
    /// Alias as written (without any `=value` suffix).
    pub alias: &'a str,
    /// `None` for boolean flags.
    pub value: Option<&'a str>,
}

/// Outcome of scanning argv against one action's alias table.
#[derive(Debug, Default)]
pub(crate) struct Scan<'a> {
    /// Last occurrence of each option, indexed by registration order.
    pub hits: Vec<Option<RawHit<'a>>>,
    pub positionals: Vec<&'a str>,
    /// First scan error; scanning continues so eager options are still seen.
    pub error: Option<ParseError>,
}

impl<'a> Scan<'a> {
    fn fail(&mut self, err: ParseError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// Decimal numbers only (`-5`, `-.5`, `-1e3`); `inf` and `nan` are not numbers here.
fn is_numeric(arg: &str) -> bool {
    let body = arg.strip_prefix('-').unwrap_or(arg);
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && arg.parse::<f64>().is_ok()
}

/// Whether `arg` should be treated as an option token for `options`.
///
/// `-` alone is positional; negative numbers are positional unless they
/// happen to be a registered alias.
fn is_option_token(arg: &str, options: &OptionSet) -> bool {
    if arg == "-" || !arg.starts_with('-') {
        return false;
    }
    if is_numeric(arg) {
        return options.contains(arg);
    }
    true
}

/// Split `--name=value` into flag and inline value. Short flags never carry one.
fn split_inline(arg: &str) -> (&str, Option<&str>) {
    if arg.starts_with("--") {
        if let Some((flag, value)) = arg.split_once('=') {
            return (flag, Some(value));
        }
    }
    (arg, None)
}

fn resolves(arg: &str, options: &OptionSet) -> bool {
    let (flag, _) = split_inline(arg);
    options.contains(flag)
}

/// Pick the child action named by the first bare token.
///
/// Tokens are read with the root's alias table so that values of root
/// value-taking options are not mistaken for an action name. Returns the
/// action and the index of the token that named it.
pub(crate) fn select_action<'p>(
    program: &'p Program,
    argv: &[String],
) -> Option<(&'p Action, usize)> {
    let options = program.root().options();
    let mut i = 0usize;
    while i < argv.len() {
        let arg = argv[i].as_str();
        if arg == "--" {
            return None;
        }
        if is_option_token(arg, options) {
            let (flag, inline) = split_inline(arg);
            let takes_value = options.lookup(flag).is_some_and(|o| o.takes_value());
            i += if takes_value && inline.is_none() { 2 } else { 1 };
            continue;
        }
        let selected = program.action_named(arg).map(|action| (action, i));
        tracing::debug!(token = arg, selected = selected.is_some(), "first bare token");
        return selected;
    }
    None
}

/// Scan `argv` against `action`'s alias table.
///
/// `skip` is the index of the action-name token, which is neither an option
/// nor a positional of the action it names.
pub(crate) fn scan<'a>(action: &Action, argv: &'a [String], skip: Option<usize>) -> Scan<'a> {
    let options = action.options();
    let mut out = Scan {
        hits: vec![None; options.len()],
        ..Default::default()
    };

    let mut i = 0usize;
    let mut after_separator = false;
    while i < argv.len() {
        let arg = argv[i].as_str();
        tracing::trace!(index = i, token = arg, "scan");

        if Some(i) == skip {
            i += 1;
            continue;
        }

        if after_separator || !is_option_token(arg, options) {
            out.positionals.push(arg);
            i += 1;
            continue;
        }

        if arg == "--" {
            after_separator = true;
            i += 1;
            continue;
        }

        let (flag, inline) = split_inline(arg);
        let Some(idx) = options.index_of(flag) else {
            out.fail(ParseError::UnknownOption {
                option: flag.to_string(),
            });
            i += 1;
            continue;
        };
        let def = &options.options()[idx];

        if !def.takes_value() {
            if inline.is_some() {
                out.fail(ParseError::UnexpectedValue {
                    option: flag.to_string(),
                });
            } else {
                out.hits[idx] = Some(RawHit {
                    alias: flag,
                    value: None,
                });
            }
            i += 1;
            continue;
        }

        if let Some(value) = inline {
            out.hits[idx] = Some(RawHit {
                alias: flag,
                value: Some(value),
            });
            i += 1;
            continue;
        }

        match argv.get(i + 1) {
            Some(next) if Some(i + 1) != skip && !resolves(next, options) => {
                out.hits[idx] = Some(RawHit {
                    alias: flag,
                    value: Some(next.as_str()),
                });
                i += 2;
            }
            _ => {
                out.fail(ParseError::MissingValue {
                    option: flag.to_string(),
                });
                i += 1;
            }
        }
    }

    out
}

/// Whether binding `argv` would take a positional from standard input.
///
/// True only when the target action has a stdin argument, the scan is clean,
/// no eager option (help, version) is present and exactly one positional is
/// missing.
pub(crate) fn needs_stdin(program: &Program, argv: &[String]) -> bool {
    let (target, skip) = match select_action(program, argv) {
        Some((action, idx)) => (action, Some(idx)),
        None => (program.root(), None),
    };
    if !target.reads_stdin() {
        return false;
    }

    let scan = scan(target, argv, skip);
    let eager = target
        .options()
        .options()
        .iter()
        .zip(&scan.hits)
        .any(|(def, hit)| def.eager() && hit.is_some());
    scan.error.is_none() && !eager && scan.positionals.len() + 1 == target.args().len()
}

/// Bind positional tokens to `args` left-to-right; the count must match exactly.
///
/// When exactly one token is missing and one argument reads stdin, the stdin
/// text fills that argument and the tokens fill the rest.
pub(crate) fn bind_positionals(
    args: &[ArgDef],
    tokens: &[&str],
    stdin: Option<&str>,
) -> Result<IndexMap<String, String>, ParseError> {
    let expected = args.len();
    let got = tokens.len();

    if got > expected {
        return Err(ParseError::TooManyActionArgs { expected, got });
    }

    if got == expected {
        return Ok(args
            .iter()
            .zip(tokens)
            .map(|(def, v)| (def.name.clone(), v.to_string()))
            .collect());
    }

    if got + 1 == expected {
        if let (Some(text), Some(stdin_idx)) = (stdin, args.iter().position(|a| a.stdin)) {
            tracing::debug!(arg = %args[stdin_idx].name, "binding positional from stdin");
            let mut tokens = tokens.iter();
            let mut bound = IndexMap::with_capacity(expected);
            for (idx, def) in args.iter().enumerate() {
                let value = if idx == stdin_idx {
                    text.to_string()
                } else {
                    tokens.next().map(|v| v.to_string()).unwrap_or_default()
                };
                bound.insert(def.name.clone(), value);
            }
            return Ok(bound);
        }
    }

    Err(ParseError::MissingActionArg {
        arg: args[got].name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{action, arg};
    use crate::info::ProgramInfo;
    use crate::option::opt;
    use crate::program::Program;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn program() -> Program {
        let mut p = Program::new(ProgramInfo::new("cowsay").arg("text"));
        p.option(opt(["eye", "e"]).value_name("str")).unwrap();
        p.option(opt(["think", "t"])).unwrap();
        p.action(action("list").option(opt(["list", "l"]))).unwrap();
        p
    }

    #[test]
    fn first_bare_token_selects_action() {
        let p = program();
        let (selected, idx) = select_action(&p, &argv(&["-t", "list"])).unwrap();
        assert_eq!(selected.name(), "list");
        assert_eq!(idx, 1);
    }

    #[test]
    fn option_value_is_not_an_action_name() {
        let p = program();
        assert!(select_action(&p, &argv(&["-e", "list", "moo"])).is_none());
        assert!(select_action(&p, &argv(&["moo", "list"])).is_none());
        assert!(select_action(&p, &argv(&["--", "list"])).is_none());
    }

    #[test]
    fn scan_collects_values_flags_and_positionals() {
        let p = program();
        let tokens = argv(&["-e", "oo", "--think", "hello"]);
        let scan = scan(p.root(), &tokens, None);
        assert!(scan.error.is_none());
        assert_eq!(scan.positionals, vec!["hello"]);

        let eye = p.root().options().index_of("-e").unwrap();
        let think = p.root().options().index_of("-t").unwrap();
        assert_eq!(
            scan.hits[eye],
            Some(RawHit {
                alias: "-e",
                value: Some("oo")
            })
        );
        assert_eq!(
            scan.hits[think],
            Some(RawHit {
                alias: "--think",
                value: None
            })
        );
    }

    #[test]
    fn scan_supports_inline_values_and_separator() {
        let p = program();
        let tokens = argv(&["--eye=^^", "--", "-t", "-"]);
        let scan = scan(p.root(), &tokens, None);
        assert!(scan.error.is_none());
        assert_eq!(scan.positionals, vec!["-t", "-"]);
        let eye = p.root().options().index_of("--eye").unwrap();
        assert_eq!(scan.hits[eye].as_ref().and_then(|h| h.value), Some("^^"));
    }

    #[test]
    fn scan_reports_missing_value_when_next_token_is_a_flag() {
        let p = program();
        let tokens = argv(&["-e", "-t"]);
        let scan = scan(p.root(), &tokens, None);
        assert_eq!(
            scan.error,
            Some(ParseError::MissingValue {
                option: "-e".to_string()
            })
        );

        let tokens = argv(&["hi", "--eye"]);
        let scan = super::scan(p.root(), &tokens, None);
        assert_eq!(
            scan.error,
            Some(ParseError::MissingValue {
                option: "--eye".to_string()
            })
        );
    }

    #[test]
    fn scan_reports_unknown_and_unexpected_values() {
        let p = program();
        let tokens = argv(&["--nope", "--think=yes"]);
        let scan = scan(p.root(), &tokens, None);
        assert_eq!(
            scan.error,
            Some(ParseError::UnknownOption {
                option: "--nope".to_string()
            })
        );

        let tokens = argv(&["--think=yes"]);
        let scan = super::scan(p.root(), &tokens, None);
        assert_eq!(
            scan.error,
            Some(ParseError::UnexpectedValue {
                option: "--think".to_string()
            })
        );
    }

    #[test]
    fn scan_keeps_negative_numbers_positional() {
        let p = program();
        let tokens = argv(&["-42"]);
        let scan = scan(p.root(), &tokens, None);
        assert!(scan.error.is_none());
        assert_eq!(scan.positionals, vec!["-42"]);

        let tokens = argv(&["-1.5e3"]);
        let scan = super::scan(p.root(), &tokens, None);
        assert!(scan.error.is_none());
        assert_eq!(scan.positionals, vec!["-1.5e3"]);
    }

    #[test]
    fn scan_treats_inf_and_nan_as_options() {
        let p = program();
        for token in ["-inf", "-nan", "-infinity"] {
            let tokens = argv(&[token]);
            let scan = scan(p.root(), &tokens, None);
            assert_eq!(
                scan.error,
                Some(ParseError::UnknownOption {
                    option: token.to_string()
                })
            );
            assert!(scan.positionals.is_empty());
        }
    }

    fn piped_program() -> Program {
        let mut p = Program::new(ProgramInfo::new("echo").arg(arg("text").stdin(true)));
        p.option(opt(["upper", "u"])).unwrap();
        p.action(action("list")).unwrap();
        p
    }

    #[test]
    fn stdin_needed_only_when_one_positional_is_missing() {
        let p = piped_program();
        assert!(needs_stdin(&p, &argv(&[])));
        assert!(needs_stdin(&p, &argv(&["-u"])));
        assert!(!needs_stdin(&p, &argv(&["hello"])));
        assert!(!needs_stdin(&p, &argv(&["-u", "hello"])));
    }

    #[test]
    fn stdin_not_needed_for_help_errors_or_other_actions() {
        let p = piped_program();
        assert!(!needs_stdin(&p, &argv(&["--help"])));
        assert!(!needs_stdin(&p, &argv(&["-v"])));
        assert!(!needs_stdin(&p, &argv(&["--nope"])));
        assert!(!needs_stdin(&p, &argv(&["list"])));
    }

    #[test]
    fn scan_skips_the_action_token() {
        let p = program();
        let list = p.action_named("list").unwrap();
        let tokens = argv(&["list", "-l"]);
        let scan = scan(list, &tokens, Some(0));
        assert!(scan.error.is_none());
        assert!(scan.positionals.is_empty());
    }

    #[test]
    fn bind_requires_exact_count() {
        let args = vec![arg("src"), arg("dst")];

        let bound = bind_positionals(&args, &["a", "b"], None).unwrap();
        assert_eq!(bound.get("src").map(String::as_str), Some("a"));
        assert_eq!(bound.get("dst").map(String::as_str), Some("b"));

        let err = bind_positionals(&args, &["a"], None).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingActionArg {
                arg: "dst".to_string()
            }
        );

        let err = bind_positionals(&args, &[], None).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingActionArg {
                arg: "src".to_string()
            }
        );

        let err = bind_positionals(&args, &["a", "b", "c"], None).unwrap_err();
        assert_eq!(
            err,
            ParseError::TooManyActionArgs {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn bind_rejects_tokens_when_no_args_declared() {
        let err = bind_positionals(&[], &["extra"], None).unwrap_err();
        assert_eq!(
            err,
            ParseError::TooManyActionArgs {
                expected: 0,
                got: 1
            }
        );
    }

    #[test]
    fn bind_fills_stdin_argument() {
        let args = vec![arg("text").stdin(true), arg("suffix")];
        let bound = bind_positionals(&args, &["!"], Some("piped")).unwrap();
        assert_eq!(bound.get("text").map(String::as_str), Some("piped"));
        assert_eq!(bound.get("suffix").map(String::as_str), Some("!"));

        let bound = bind_positionals(&args, &["a", "b"], Some("piped")).unwrap();
        assert_eq!(bound.get("text").map(String::as_str), Some("a"));
    }
}
