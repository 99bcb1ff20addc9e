use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use errinfo::diagnostic::{ansi::AnsiRenderer, json};
use errinfo::term::Pid;
use errinfo::{Cause, Operation, StdProbe, Term, describe_failure_with, parse_term, parse_terms};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Color {
    Auto,
    Always,
    Never,
}

/// Explain why a standard-library call failed.
#[derive(Parser)]
#[command(name = "errinfo", version)]
struct Cli {
    /// Module of the failed call, e.g. `binary`
    module: String,
    /// Function name, e.g. `part`
    function: String,
    /// Arguments as an Erlang list literal, e.g. `[<<1,2,3>>, 2, 5]`
    args: String,
    /// Low-level cause reported by the failing call
    #[arg(long, default_value = "none")]
    cause: String,
    /// Treat this pid as a terminated process (repeatable)
    #[arg(long = "dead-pid", value_name = "PID")]
    dead_pids: Vec<String>,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    #[arg(long, value_enum, default_value_t = Color::Auto)]
    color: Color,
}

fn parse_pid(text: &str) -> Result<Pid, String> {
    match parse_term(text) {
        Ok(Term::Pid(pid)) => Ok(pid),
        Ok(other) => Err(format!("`{text}` is a {}, not a pid", other.kind())),
        Err(e) => Err(format!("bad pid `{text}`: {e}")),
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let args = parse_terms(&cli.args).map_err(|e| format!("cannot read arguments: {e}"))?;
    let op = Operation::parse(&cli.module, &cli.function, args.len())
        .ok_or_else(|| format!("unsupported module `{}`", cli.module))?;
    let cause = Cause::from_atom(&cli.cause);

    let mut probe = StdProbe::new();
    for text in &cli.dead_pids {
        probe = probe.with_dead_process(parse_pid(text)?);
    }

    let errors = describe_failure_with(&probe, &op, &args, &cause);
    Ok(match cli.format {
        Format::Json => json::render(&op, &args, &errors),
        Format::Text => {
            let use_color = match cli.color {
                Color::Always => true,
                Color::Never => false,
                Color::Auto => std::io::stdout().is_terminal(),
            };
            AnsiRenderer { use_color }.render(&op, &args, &errors)
        }
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(out) => {
            if out.ends_with('\n') {
                print!("{out}");
            } else {
                println!("{out}");
            }
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
