use std::{fs, process::ExitCode};

use clap::Parser;
use plc::{Error, analyze, interpreter::evaluator::core::Interpreter, lex, parse_source};

/// plc runs programs written in a small, statically checked, procedural
/// language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells plc to read the program from a file instead of the argument.
    #[arg(short, long)]
    file: bool,

    /// Prints the tokens of the program before running it.
    #[arg(short, long)]
    tokens: bool,

    /// Pretty-prints the parsed syntax tree before running it.
    #[arg(short, long)]
    ast: bool,

    /// Skips static analysis and runs the program unchecked.
    #[arg(long)]
    no_analyze: bool,

    contents: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let program = if args.file {
        match fs::read_to_string(&args.contents) {
            Ok(program) => program,
            Err(e) => {
                eprintln!("Failed to read the input file '{}': {e}", &args.contents);
                return ExitCode::FAILURE;
            },
        }
    } else {
        args.contents.clone()
    };

    match run(&args, &program) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args, program: &str) -> Result<(), Error> {
    let tokens = lex(program)?;
    if args.tokens {
        for token in &tokens {
            println!("{token:?}");
        }
    }

    let mut source = parse_source(&tokens)?;
    if !args.no_analyze {
        analyze(&mut source)?;
    }
    if args.ast {
        println!("{source:#?}");
    }

    let result = Interpreter::new().execute(&source)?;
    println!("{result}");
    Ok(())
}
