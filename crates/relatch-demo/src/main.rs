#![forbid(unsafe_code)]

//! Interactive driver for the two-block counter.
//!
//! Reads click commands from stdin (or a `--script` sequence), pumps the
//! runtime after each event, and prints the committed view. Arguments
//! are parsed manually (no external dependencies) with `RELATCH_*`
//! environment variable overrides.

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use relatch_demo::{AppView, CounterApp};
use relatch_runtime::{Runtime, StateSet, TraceLog};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
relatch-demo — stable-callback re-render demo

USAGE:
    relatch-demo [OPTIONS]

OPTIONS:
    --script=SEQ      Run a click sequence and exit ('1' = log block,
                      '2' = add block), e.g. --script=2221
    --trace-file=PATH Export the diagnostic trace as JSONL on exit
    --quiet           Suppress the view printout after each event
    --help, -h        Show this help message
    --version, -V     Show version

COMMANDS (interactive mode):
    1    Click the orange log block (logs the current count)
    2    Click the red add block (increments the count)
    t    Print the diagnostic trace so far
    q    Quit

ENVIRONMENT VARIABLES:
    RELATCH_SCRIPT       Override --script
    RELATCH_TRACE_FILE   Override --trace-file
";

#[derive(Debug, Default)]
struct Config {
    script: Option<String>,
    trace_file: Option<String>,
    quiet: bool,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Config, String> {
    let mut config = Config {
        script: env::var("RELATCH_SCRIPT").ok(),
        trace_file: env::var("RELATCH_TRACE_FILE").ok(),
        quiet: false,
    };

    for arg in args {
        if let Some(seq) = arg.strip_prefix("--script=") {
            config.script = Some(seq.to_string());
        } else if let Some(path) = arg.strip_prefix("--trace-file=") {
            config.trace_file = Some(path.to_string());
        } else if arg == "--quiet" {
            config.quiet = true;
        } else if arg == "--help" || arg == "-h" {
            print!("{HELP_TEXT}");
            process::exit(0);
        } else if arg == "--version" || arg == "-V" {
            println!("relatch-demo {VERSION}");
            process::exit(0);
        } else {
            return Err(format!("unknown argument: {arg}"));
        }
    }

    if let Some(script) = &config.script {
        if let Some(bad) = script.chars().find(|c| *c != '1' && *c != '2') {
            return Err(format!("invalid script character: {bad:?} (expected 1 or 2)"));
        }
    }
    Ok(config)
}

fn print_view(view: &AppView) {
    println!("count: {}", view.count);
    println!("  [{:>6}] {}", view.log.color, view.log.text);
    println!("  [{:>6}] {}", view.add.color, view.add.text);
}

fn print_trace(trace: &TraceLog) {
    for event in trace.events() {
        println!("  {event:?}");
    }
}

fn dispatch(runtime: &mut Runtime<CounterApp>, which: char) {
    tracing::debug!(block = %which, "dispatch click");
    match which {
        '1' => runtime.component().click_log(),
        '2' => runtime.component().click_add(),
        _ => unreachable!("script validated at parse time"),
    }
    // Commit-then-effect runs before we return to the event source.
    runtime.pump();
}

fn run(config: &Config) -> io::Result<()> {
    let trace = TraceLog::new();
    let mut states = StateSet::new();
    let app = CounterApp::new(&mut states, trace.clone());
    let mut runtime = Runtime::mount(app, states);

    if !config.quiet {
        print_view(runtime.view());
    }

    if let Some(script) = &config.script {
        for c in script.chars() {
            dispatch(&mut runtime, c);
            if !config.quiet {
                print_view(runtime.view());
            }
        }
    } else {
        let stdin = io::stdin();
        let mut out = io::stdout();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            match line.trim() {
                "1" | "2" => {
                    let c = line.trim().chars().next().unwrap_or('1');
                    dispatch(&mut runtime, c);
                    if !config.quiet {
                        print_view(runtime.view());
                    }
                }
                "t" => print_trace(&trace),
                "q" => break,
                "" => {}
                other => println!("unknown command: {other} (1, 2, t, q)"),
            }
        }
    }

    if let Some(path) = &config.trace_file {
        trace.export_jsonl(path)?;
        if !config.quiet {
            println!("trace written to {path}");
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = match parse_args(env::args().skip(1)) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}\n");
            eprint!("{HELP_TEXT}");
            process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let config = parse_args(std::iter::empty()).expect("parse");
        assert!(!config.quiet);
    }

    #[test]
    fn parse_script_and_trace_file() {
        let args = ["--script=2221", "--trace-file=/tmp/t.jsonl", "--quiet"]
            .into_iter()
            .map(String::from);
        let config = parse_args(args).expect("parse");
        assert_eq!(config.script.as_deref(), Some("2221"));
        assert_eq!(config.trace_file.as_deref(), Some("/tmp/t.jsonl"));
        assert!(config.quiet);
    }

    #[test]
    fn parse_rejects_unknown_argument() {
        let args = ["--bogus"].into_iter().map(String::from);
        assert!(parse_args(args).is_err());
    }

    #[test]
    fn parse_rejects_bad_script() {
        let args = ["--script=12x"].into_iter().map(String::from);
        assert!(parse_args(args).is_err());
    }
}
