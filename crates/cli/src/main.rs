use std::fs;
use std::io::{self, Write};

use actionparse::{
    Dispatch, Invocation, ParseResult, ProcessTerminal, Program, ProgramInfo, Value, ValueType,
    action, arg, opt,
};
use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt};

const MANIFEST: &str = include_str!("../greet.json");

const GREETINGS: &[&str] = &["hello", "hi", "hey", "good morning", "good evening"];

fn main() -> Result<()> {
    init_tracing();

    let program = build_program()?;
    let invocation = Invocation::from_env(&program).context("failed to read the invocation")?;

    let mut dispatch = Dispatch::new()
        .main(greet)
        .on("list", list)
        .on("read", read);

    let code = program.run(&invocation, &mut dispatch, &mut ProcessTerminal);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn build_program() -> Result<Program> {
    let mut info = ProgramInfo::from_manifest_str(MANIFEST).context("invalid built-in manifest")?;
    info.version = env!("CARGO_PKG_VERSION").to_string();

    let mut program = Program::new(info);
    program
        .option(
            opt(["name", "n"])
                .value_name("name")
                .description("Who to greet.")
                .required(true),
        )?
        .option(opt(["shout", "s"]).description("Print the greeting in upper case."))?
        .option(
            opt(["times", "t"])
                .value_name("n")
                .value_type(ValueType::Integer)
                .default_value(1i64)
                .description("How many times to greet."),
        )?
        .action(
            action("list")
                .description("List the known greetings.")
                .option(opt(["json", "j"]).description("Print as a JSON array."))
                .example("actionparse-demo list --json"),
        )?
        .action(
            action("read")
                .description("Print the first lines of a greeting file.")
                .arg(arg("path").description("File to read."))
                .option(
                    opt(["lines", "l"])
                        .value_name("n")
                        .value_type(ValueType::Integer)
                        .description("Only print the first n lines."),
                ),
        )?
        .global_option(opt(["dump"]).description("Print the parse result as JSON and exit."))?;
    Ok(program)
}

/// Print the parse result as JSON when `--dump` was given.
fn dump(result: &ParseResult) -> Result<bool> {
    if !result.is_provided("dump") {
        return Ok(false);
    }
    let json = serde_json::to_string_pretty(result)?;
    writeln!(io::stdout().lock(), "{json}")?;
    Ok(true)
}

fn greet(result: &ParseResult) -> Result<()> {
    if dump(result)? {
        return Ok(());
    }

    let text = result.arg("text").unwrap_or_default().trim();
    let name = result.value_str("name").context("missing --name")?;
    let times = result.value("times").and_then(Value::as_i64).unwrap_or(1);
    anyhow::ensure!(times >= 0, "--times must not be negative, got {times}");

    let mut line = format!("{text}, {name}!");
    if result.is_provided("shout") {
        line = line.to_uppercase();
    }
    tracing::debug!(times, shout = result.is_provided("shout"), "greeting");

    let mut out = io::stdout().lock();
    for _ in 0..times {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn list(result: &ParseResult) -> Result<()> {
    if dump(result)? {
        return Ok(());
    }

    let mut out = io::stdout().lock();
    if result.is_provided("json") {
        writeln!(out, "{}", serde_json::to_string(GREETINGS)?)?;
    } else {
        for greeting in GREETINGS {
            writeln!(out, "{greeting}")?;
        }
    }
    Ok(())
}

fn read(result: &ParseResult) -> Result<()> {
    if dump(result)? {
        return Ok(());
    }

    let path = result.arg("path").context("missing path")?;
    let contents = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let limit = match result.value("lines").and_then(Value::as_i64) {
        Some(n) => usize::try_from(n).with_context(|| format!("invalid line count {n}"))?,
        None => usize::MAX,
    };
    tracing::debug!(path, limit, "reading greeting file");

    let mut out = io::stdout().lock();
    for line in contents.lines().take(limit) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
