use crate::environment::Environment;
use crate::evaluator;
use crate::lexer::Lexer;
use crate::object::{EvalError, HashValue, Result};
use crate::parser::Parser;
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

lazy_static! {
    /// Process-wide module search paths, seeded from ROCKETLANGPATH or
    /// the current working directory. Read-mostly after startup.
    static ref SEARCH_PATHS: RwLock<Vec<PathBuf>> = RwLock::new(initial_search_paths());
}

fn initial_search_paths() -> Vec<PathBuf> {
    match std::env::var("ROCKETLANGPATH") {
        Ok(paths) if !paths.is_empty() => paths.split(':').map(|path| absolute(path)).collect(),
        _ => std::env::current_dir().map(|cwd| vec![cwd]).unwrap_or_default(),
    }
}

fn absolute(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

pub fn add_path(path: impl AsRef<Path>) {
    if let Ok(mut paths) = SEARCH_PATHS.write() {
        paths.push(absolute(path));
    }
}

/// Resolves a module name to the first search path holding `<name>.rl`.
pub fn find_module(name: &str) -> Option<PathBuf> {
    let basename = format!("{}.rl", name);

    SEARCH_PATHS
        .read()
        .ok()?
        .iter()
        .map(|path| path.join(&basename))
        .find(|path| path.exists())
}

/// Loads, parses and evaluates a module in a fresh root environment and
/// returns that environment's bindings.
pub fn eval_module(name: &str) -> Result<HashValue> {
    let filename = find_module(name).ok_or_else(|| EvalError::ImportError {
        message: format!("no module named '{}' found", name),
    })?;

    let source = std::fs::read_to_string(&filename).map_err(|err| EvalError::IoError {
        message: format!("error reading module '{}': {}", name, err),
    })?;

    let parser = Parser::new(Lexer::new(source), HashSet::new());
    let (program, _imports) = parser.parse_program().map_err(|errors| EvalError::ParseError {
        message: errors.join(", "),
    })?;

    let env = Environment::new();
    evaluator::eval(program.into(), &env)?;

    let exported = env.borrow().exported();
    Ok(exported)
}
