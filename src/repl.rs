use crate::environment::Environment;
use crate::evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::collections::HashSet;

pub const PROMPT: &str = "🚀 > ";
const HISTORY_FILE: &str = ".rocket_history";

static BUILD_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));
static BUILD_DATE: &str = "2022-01-15T00:00:00Z";

pub fn splash_screen() -> String {
    format!(
        r#"
   /\
  (  )     ___         _       _   _
  (  )    | _ \___  __| |_____| |_| |   __ _ _ _  __ _
 /|/\|\   |   / _ \/ _| / / -_)  _| |__/ _  | ' \/ _  |
/_||||_\  |_|_\___/\__|_\_\___|\__|____\__,_|_||_\__, |
              {:>10} | {:<15}   |___/
"#,
        BUILD_VERSION, BUILD_DATE
    )
}

pub fn splash_version() -> String {
    format!("rocket-lang version {} ({})", BUILD_VERSION, BUILD_DATE)
}

/// The interactive shell. Environment and recorded imports persist
/// across inputs.
pub fn start() -> rustyline::Result<()> {
    let mut editor = Editor::<(), DefaultHistory>::new()?;
    let _ = editor.load_history(HISTORY_FILE);

    let env = Environment::new();
    let mut imports: HashSet<String> = HashSet::new();

    println!("{}", splash_screen());

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());

                let parser = Parser::new(Lexer::new(line), imports.clone());
                match parser.parse_program() {
                    Err(errors) => print_parser_errors(&errors),
                    Ok((program, recorded)) => {
                        imports = recorded;
                        match evaluator::eval(program.into(), &env) {
                            Ok(evaluated) => println!("=> {}", evaluated),
                            Err(err) => println!("=> ERROR: {}", err),
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("readline error: {}", err);
                break;
            }
        }
    }

    let _ = editor.save_history(HISTORY_FILE);
    Ok(())
}

pub fn print_parser_errors(errors: &[String]) {
    println!("🔥 Great, you broke it!");
    println!(" parser errors:");
    for error in errors.iter() {
        println!("\t {}", error);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_splash_version() {
        let version = splash_version();

        assert!(version.starts_with("rocket-lang version v"));
        assert!(version.contains(BUILD_DATE));
    }

    #[test]
    fn test_splash_screen_carries_version() {
        assert!(splash_screen().contains(BUILD_VERSION));
    }
}
