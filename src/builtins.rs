use crate::object::{EvalError, FileObject, Object, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type Builtin = fn(Vec<Object>) -> Result<Object>;

fn puts(args: Vec<Object>) -> Result<Object> {
    for arg in args.into_iter() {
        println!("{}", arg);
    }

    Ok(Object::Null)
}

fn open(args: Vec<Object>) -> Result<Object> {
    if args.is_empty() || args.len() > 3 {
        return Err(EvalError::IncorrectArity {
            got: args.len(),
            want: 1,
        });
    }

    let mut args_iter = args.into_iter();

    let filename = match args_iter.next() {
        Some(Object::String(s)) => s.borrow().clone(),
        Some(obj) => {
            return Err(EvalError::UnsupportedArgType {
                fn_name: "open",
                kind: obj.type_name(),
            })
        }
        None => unreachable!(),
    };
    let mode = match args_iter.next() {
        Some(Object::String(s)) => s.borrow().clone(),
        Some(obj) => {
            return Err(EvalError::UnsupportedArgType {
                fn_name: "open",
                kind: obj.type_name(),
            })
        }
        None => "r".to_owned(),
    };
    let perm = match args_iter.next() {
        Some(Object::String(s)) => s.borrow().clone(),
        Some(obj) => {
            return Err(EvalError::UnsupportedArgType {
                fn_name: "open",
                kind: obj.type_name(),
            })
        }
        None => "0644".to_owned(),
    };

    let file = FileObject::open(&filename, &mode, &perm)?;

    Ok(Object::File(Rc::new(RefCell::new(file))))
}

fn exit(args: Vec<Object>) -> Result<Object> {
    if args.len() > 1 {
        return Err(EvalError::IncorrectArity {
            got: args.len(),
            want: 1,
        });
    }

    let code = match args.first() {
        Some(Object::Integer(n)) => *n as i32,
        Some(obj) => {
            return Err(EvalError::UnsupportedArgType {
                fn_name: "exit",
                kind: obj.type_name(),
            })
        }
        None => 0,
    };

    std::process::exit(code);
}

thread_local! {
    pub static BUILTINS: HashMap<&'static str, Object> = {
        let mut builtins: HashMap<&'static str, Object> = HashMap::new();
        builtins.insert("puts", Object::Builtin(puts));
        builtins.insert("open", Object::Builtin(open));
        builtins.insert("exit", Object::Builtin(exit));
        builtins
    };
}
