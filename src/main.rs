use rocket_lang::evaluator;
use rocket_lang::repl;
use rocket_lang::{Environment, Lexer, Parser};
use std::collections::HashSet;
use std::process;

fn main() {
    let mut args = std::env::args().skip(1);

    match args.next() {
        Some(filename) => run_file(&filename),
        None => {
            if let Err(err) = repl::start() {
                eprintln!("rocket-lang: {}", err);
                process::exit(1);
            }
        }
    }
}

fn run_file(filename: &str) {
    let source = match std::fs::read_to_string(filename) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("rocket-lang: cannot read {}: {}", filename, err);
            process::exit(1);
        }
    };

    let parser = Parser::new(Lexer::new(source), HashSet::new());
    let (program, _imports) = match parser.parse_program() {
        Ok(parsed) => parsed,
        Err(errors) => {
            repl::print_parser_errors(&errors);
            process::exit(1);
        }
    };

    let env = Environment::new();
    if let Err(err) = evaluator::eval(program.into(), &env) {
        eprintln!("ERROR: {}", err);
        process::exit(1);
    }
}
