use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use microlisp::error::EvalError;
use microlisp::eval::eval;
use microlisp::interp::Interp;
use microlisp::parser::Reader;
use microlisp::printer::stringify;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

const HISTORY_FILE: &str = ".microlisp_history";

/// Emacs-flavored Lisp interpreter reading forms from standard input
#[derive(Parser, Debug)]
#[command(name = "microlisp")]
#[command(version)]
#[command(about = "A small Lisp with dynamic scoping and a mark-sweep heap")]
struct CliArgs {
    /// Script file to execute instead of standard input
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Interactive read-eval-print loop: prompt, echo results, continue
    /// past errors
    #[arg(long = "repl")]
    repl: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let mut interp = Interp::new();

    if args.repl {
        return run_repl(&mut interp);
    }

    let source = match read_source(&args) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(1);
        }
    };
    run_batch(&mut interp, &source)
}

/// Batch source: the script file when given, standard input otherwise.
fn read_source(args: &CliArgs) -> Result<String, String> {
    match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read script file {}: {}", path.display(), e)),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .map_err(|e| format!("Cannot read standard input: {}", e))?;
            Ok(source)
        }
    }
}

/// Batch mode: read, evaluate, collect, repeat. Silent on success; the
/// first uncaught signal is reported and ends the run with exit code 1.
fn run_batch(interp: &mut Interp, source: &str) -> ExitCode {
    let mut reader = Reader::new(source);
    loop {
        let form = match reader.read(interp) {
            Ok(Some(form)) => form,
            Ok(None) => return ExitCode::SUCCESS,
            Err(signal) => {
                report_signal(interp, signal);
                return ExitCode::from(1);
            }
        };
        if let Err(signal) = eval(interp, form) {
            report_signal(interp, signal);
            return ExitCode::from(1);
        }
        interp.collect(&[form]);
    }
}

/// Interactive mode: prompt, evaluate, echo each result, report errors and
/// keep going. History persists across sessions.
fn run_repl(interp: &mut Interp) -> ExitCode {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl = match DefaultEditor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to initialize REPL: {}", e);
            return ExitCode::from(1);
        }
    };
    let _ = rl.load_history(HISTORY_FILE);

    loop {
        match rl.readline(">>> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                eval_line(interp, &line);
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C drops the current line
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    ExitCode::SUCCESS
}

/// Evaluates every form on one REPL line, echoing results.
fn eval_line(interp: &mut Interp, line: &str) {
    let mut reader = Reader::new(line);
    loop {
        let form = match reader.read(interp) {
            Ok(Some(form)) => form,
            Ok(None) => return,
            Err(signal) => {
                report_signal(interp, signal);
                return;
            }
        };
        match eval(interp, form) {
            Ok(result) => println!("{}", stringify(interp.heap(), result)),
            Err(signal) => report_signal(interp, signal),
        }
        interp.collect(&[form]);
    }
}

/// Top-level handler: renders the pending signal as its condition cons and
/// clears it. The condition is garbage afterwards; the next per-form
/// collection reclaims it.
fn report_signal(interp: &mut Interp, signal: EvalError) {
    let condition = signal.into_condition(interp);
    println!("ERROR: {}", stringify(interp.heap(), condition));
}
