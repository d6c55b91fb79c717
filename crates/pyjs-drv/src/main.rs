//! The `pyjs` command line interface.
//!
//! Reads one source buffer (file or stdin), runs the translation pipeline
//! and writes one target buffer. Exit code 0 on success, 1 with a
//! diagnostic on stderr for any error. `--emit tokens` and `--emit ast`
//! stop after the corresponding stage and dump its output for inspection.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser as ArgParser, ValueEnum};
use tracing_subscriber::EnvFilter;

use pyjs_lex::Lexer;
use pyjs_par::Parser;

#[derive(ArgParser)]
#[command(
    name = "pyjs",
    version,
    about = "Translate a Python subset to JavaScript"
)]
struct Cli {
    /// Input file, or '-' to read from stdin.
    input: PathBuf,

    /// Output file ('-' for stdout). Defaults to the input path with its
    /// extension replaced by .js; stdin input defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to emit.
    #[arg(long, value_enum, default_value_t = Emit::Js)]
    emit: Emit,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Pipeline stage output selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Token stream, one token per line.
    Tokens,
    /// Parsed AST in debug form.
    Ast,
    /// Translated JavaScript.
    Js,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let from_stdin = cli.input.as_os_str() == "-";
    let source = if from_stdin {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        buffer
    } else {
        fs::read_to_string(&cli.input)
            .with_context(|| format!("failed to read {}", cli.input.display()))?
    };

    match cli.emit {
        Emit::Tokens => {
            let tokens = Lexer::new(&source).tokenize()?;
            for token in &tokens {
                println!("{:?} {:?} @ {}", token.kind, token.lexeme, token.position);
            }
        }
        Emit::Ast => {
            let tokens = Lexer::new(&source).tokenize()?;
            let program = Parser::new(tokens).parse()?;
            println!("{program:#?}");
        }
        Emit::Js => {
            let target = pyjs_drv::translate(&source)?;
            write_target(cli, from_stdin, &target)?;
        }
    }
    Ok(())
}

fn write_target(cli: &Cli, from_stdin: bool, target: &str) -> anyhow::Result<()> {
    match &cli.output {
        Some(path) if path.as_os_str() == "-" => print!("{target}"),
        Some(path) => {
            fs::write(path, target)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None if from_stdin => print!("{target}"),
        None => {
            let path = pyjs_drv::default_output_path(&cli.input);
            fs::write(&path, target)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
    }
    Ok(())
}
