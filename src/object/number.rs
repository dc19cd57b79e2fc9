use super::{EvalError, Object, ObjectMethod, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Demotes a float carrying an exact integer value back to an integer.
pub fn try_integer(value: f64) -> Object {
    if value == ((value as i64) as f64) {
        Object::Integer(value as i64)
    } else {
        Object::Float(value)
    }
}

fn integer_plz_i(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    match receiver {
        Object::Integer(n) => Ok(Object::Integer(*n)),
        other => Err(EvalError::UndefinedMethod {
            method: "plz_i".to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn integer_plz_f(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    match receiver {
        Object::Integer(n) => Ok(Object::Float(*n as f64)),
        other => Err(EvalError::UndefinedMethod {
            method: "plz_f".to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn float_plz_i(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    match receiver {
        Object::Float(x) => Ok(Object::Integer(*x as i64)),
        other => Err(EvalError::UndefinedMethod {
            method: "plz_i".to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn float_plz_f(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    match receiver {
        Object::Float(x) => Ok(Object::Float(*x)),
        other => Err(EvalError::UndefinedMethod {
            method: "plz_f".to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn float_try_integer(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    match receiver {
        Object::Float(x) => Ok(try_integer(*x)),
        other => Err(EvalError::UndefinedMethod {
            method: "try_integer".to_owned(),
            kind: other.type_name(),
        }),
    }
}

lazy_static! {
    pub(super) static ref INTEGER_METHODS: HashMap<&'static str, ObjectMethod> = {
        let mut methods: HashMap<&'static str, ObjectMethod> = HashMap::new();
        methods.insert(
            "plz_i",
            ObjectMethod {
                description: "Returns the integer itself.",
                arg_pattern: &[],
                return_pattern: &[&["INTEGER"]],
                args_optional: false,
                method: integer_plz_i,
            },
        );
        methods.insert(
            "plz_f",
            ObjectMethod {
                description: "Converts the integer into a float.",
                arg_pattern: &[],
                return_pattern: &[&["FLOAT"]],
                args_optional: false,
                method: integer_plz_f,
            },
        );
        methods
    };
    pub(super) static ref FLOAT_METHODS: HashMap<&'static str, ObjectMethod> = {
        let mut methods: HashMap<&'static str, ObjectMethod> = HashMap::new();
        methods.insert(
            "plz_i",
            ObjectMethod {
                description: "Truncates the float into an integer.",
                arg_pattern: &[],
                return_pattern: &[&["INTEGER"]],
                args_optional: false,
                method: float_plz_i,
            },
        );
        methods.insert(
            "plz_f",
            ObjectMethod {
                description: "Returns the float itself.",
                arg_pattern: &[],
                return_pattern: &[&["FLOAT"]],
                args_optional: false,
                method: float_plz_f,
            },
        );
        methods.insert(
            "try_integer",
            ObjectMethod {
                description: "Returns an integer if the float carries an exact integer value.",
                arg_pattern: &[],
                return_pattern: &[&["INTEGER", "FLOAT"]],
                args_optional: false,
                method: float_try_integer,
            },
        );
        methods
    };
}
