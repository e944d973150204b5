use minitri::{
    cli::{Cli, Command, RunArgs},
    compiler::Compiler,
    error::Error,
    repl,
    vm::{decompile, Chunk, Machine},
};

use clap::Parser as ClapParser;
use std::path::Path;
use std::process::ExitCode;
use tracing::Level;

fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let Some(command) = args.command.clone() else {
        repl::run(args)?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Command::Run(run) => run_file(run),
        Command::Build {
            file,
            output,
            listing,
        } => {
            let src = std::fs::read_to_string(&file)?;
            let chunk = match Compiler::default().listing(listing).compile(&src) {
                Ok(chunk) => chunk,
                Err(error) => return failed(&error, &file, &src),
            };
            let output = output.unwrap_or_else(|| {
                Path::new(&file)
                    .with_extension("mtc")
                    .to_string_lossy()
                    .to_string()
            });
            let bytes = match chunk.to_bytecode() {
                Ok(bytes) => bytes,
                Err(error) => return failed(&error, &file, &src),
            };
            std::fs::write(&output, bytes)?;
            tracing::info!(%output, ops = chunk.ops.len(), "wrote bytecode");
            Ok(ExitCode::SUCCESS)
        }
        Command::Exec { file, listing } => {
            let bytes = std::fs::read(&file)?;
            let chunk = match decompile(&bytes) {
                Ok(chunk) => chunk,
                Err(error) => return failed(&error, &file, ""),
            };
            if listing {
                eprint!("{chunk}");
            }
            execute(chunk, None, &file, "")
        }
    }
}

fn run_file(args: RunArgs) -> anyhow::Result<ExitCode> {
    let src = std::fs::read_to_string(&args.file)?;
    let compiled = Compiler::default()
        .debug_tokens(args.debug_tokens)
        .debug_ast(args.debug_ast)
        .listing(args.listing)
        .compile(&src);
    match compiled {
        Ok(chunk) => execute(chunk, args.step_limit, &args.file, &src),
        Err(error) => failed(&error, &args.file, &src),
    }
}

fn execute(
    chunk: Chunk,
    step_limit: Option<usize>,
    filename: &str,
    src: &str,
) -> anyhow::Result<ExitCode> {
    let stdin = std::io::stdin();
    let mut machine =
        Machine::new(chunk, stdin.lock(), std::io::stdout()).with_step_limit(step_limit);
    match machine.run() {
        Ok(Some(value)) => {
            println!("{value}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => Ok(ExitCode::SUCCESS),
        Err(error) => failed(&error, filename, src),
    }
}

fn failed(error: &Error, filename: &str, src: &str) -> anyhow::Result<ExitCode> {
    error.report(filename, src)?;
    Ok(ExitCode::FAILURE)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}
