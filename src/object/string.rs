use super::{EvalError, Object, ObjectMethod, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;

fn with_string<T>(receiver: &Object, method: &str, f: impl FnOnce(&str) -> T) -> Result<T> {
    match receiver {
        Object::String(s) => Ok(f(&s.borrow())),
        other => Err(EvalError::UndefinedMethod {
            method: method.to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn mutate_string(receiver: &Object, method: &str, f: impl FnOnce(&str) -> String) -> Result<Object> {
    match receiver {
        Object::String(s) => {
            let updated = f(&s.borrow());
            *s.borrow_mut() = updated;
            Ok(Object::Null)
        }
        other => Err(EvalError::UndefinedMethod {
            method: method.to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn argument_string(args: &[Object]) -> String {
    match args.first() {
        Some(Object::String(s)) => s.borrow().clone(),
        _ => String::new(),
    }
}

fn size(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_string(receiver, "size", |s| Object::Integer(s.len() as i64))
}

fn count(receiver: &Object, args: Vec<Object>) -> Result<Object> {
    let sub = argument_string(&args);
    with_string(receiver, "count", |s| {
        Object::Integer(s.matches(&sub).count() as i64)
    })
}

fn find(receiver: &Object, args: Vec<Object>) -> Result<Object> {
    let sub = argument_string(&args);
    with_string(receiver, "find", |s| {
        Object::Integer(s.find(&sub).map(|at| at as i64).unwrap_or(-1))
    })
}

fn replace(receiver: &Object, args: Vec<Object>) -> Result<Object> {
    let from = argument_string(&args);
    let to = match args.get(1) {
        Some(Object::String(s)) => s.borrow().clone(),
        _ => String::new(),
    };
    with_string(receiver, "replace", |s| Object::from(s.replace(&from, &to)))
}

fn reversed(s: &str) -> String {
    s.chars().rev().collect()
}

fn reverse(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_string(receiver, "reverse", |s| Object::from(reversed(s)))
}

fn reverse_in_place(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    mutate_string(receiver, "reverse!", reversed)
}

fn upcase(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_string(receiver, "upcase", |s| Object::from(s.to_uppercase()))
}

fn upcase_in_place(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    mutate_string(receiver, "upcase!", |s| s.to_uppercase())
}

fn downcase(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_string(receiver, "downcase", |s| Object::from(s.to_lowercase()))
}

fn downcase_in_place(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    mutate_string(receiver, "downcase!", |s| s.to_lowercase())
}

fn strip(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_string(receiver, "strip", |s| Object::from(s.trim()))
}

fn strip_in_place(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    mutate_string(receiver, "strip!", |s| s.trim().to_owned())
}

fn split(receiver: &Object, args: Vec<Object>) -> Result<Object> {
    with_string(receiver, "split", |s| {
        let parts: Vec<Object> = match args.first() {
            Some(Object::String(sep)) => s
                .split(sep.borrow().as_str())
                .map(Object::from)
                .collect(),
            _ => s.split_whitespace().map(Object::from).collect(),
        };

        Object::from(parts)
    })
}

fn lines(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_string(receiver, "lines", |s| {
        let lines: Vec<Object> = s.split('\n').map(Object::from).collect();

        Object::from(lines)
    })
}

// A leading `0x` is stripped and forces base 8, even over an explicit base
// argument. Unparseable content comes back as 0.
fn plz_i(receiver: &Object, args: Vec<Object>) -> Result<Object> {
    let mut base = match args.first() {
        Some(Object::Integer(n)) => *n,
        _ => 10,
    };

    with_string(receiver, "plz_i", |s| {
        let mut digits = s.trim().to_owned();
        if digits.starts_with("0x") {
            digits = digits.replace("0x", "");
            base = 8;
        }

        if !(2..=36).contains(&base) {
            return Object::Integer(0);
        }

        Object::Integer(i64::from_str_radix(&digits, base as u32).unwrap_or(0))
    })
}

fn plz_f(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_string(receiver, "plz_f", |s| {
        Object::Float(s.trim().parse().unwrap_or(0.0))
    })
}

lazy_static! {
    pub(super) static ref METHODS: HashMap<&'static str, ObjectMethod> = {
        let mut methods: HashMap<&'static str, ObjectMethod> = HashMap::new();
        methods.insert(
            "size",
            ObjectMethod {
                description: "Returns the amount of bytes in the string.",
                arg_pattern: &[],
                return_pattern: &[&["INTEGER"]],
                args_optional: false,
                method: size,
            },
        );
        methods.insert(
            "count",
            ObjectMethod {
                description: "Counts how often a given substring occurs in the string.",
                arg_pattern: &[&["STRING"]],
                return_pattern: &[&["INTEGER"]],
                args_optional: false,
                method: count,
            },
        );
        methods.insert(
            "find",
            ObjectMethod {
                description: "Returns the byte offset of the first occurrence, or -1.",
                arg_pattern: &[&["STRING"]],
                return_pattern: &[&["INTEGER"]],
                args_optional: false,
                method: find,
            },
        );
        methods.insert(
            "replace",
            ObjectMethod {
                description: "Replaces every occurrence of the first argument with the second.",
                arg_pattern: &[&["STRING"], &["STRING"]],
                return_pattern: &[&["STRING"]],
                args_optional: false,
                method: replace,
            },
        );
        methods.insert(
            "reverse",
            ObjectMethod {
                description: "Returns a reversed copy of the string.",
                arg_pattern: &[],
                return_pattern: &[&["STRING"]],
                args_optional: false,
                method: reverse,
            },
        );
        methods.insert(
            "reverse!",
            ObjectMethod {
                description: "Reverses the string in place.",
                arg_pattern: &[],
                return_pattern: &[&["NULL"]],
                args_optional: false,
                method: reverse_in_place,
            },
        );
        methods.insert(
            "upcase",
            ObjectMethod {
                description: "Returns an upper-cased copy of the string.",
                arg_pattern: &[],
                return_pattern: &[&["STRING"]],
                args_optional: false,
                method: upcase,
            },
        );
        methods.insert(
            "upcase!",
            ObjectMethod {
                description: "Upper-cases the string in place.",
                arg_pattern: &[],
                return_pattern: &[&["NULL"]],
                args_optional: false,
                method: upcase_in_place,
            },
        );
        methods.insert(
            "downcase",
            ObjectMethod {
                description: "Returns a lower-cased copy of the string.",
                arg_pattern: &[],
                return_pattern: &[&["STRING"]],
                args_optional: false,
                method: downcase,
            },
        );
        methods.insert(
            "downcase!",
            ObjectMethod {
                description: "Lower-cases the string in place.",
                arg_pattern: &[],
                return_pattern: &[&["NULL"]],
                args_optional: false,
                method: downcase_in_place,
            },
        );
        methods.insert(
            "strip",
            ObjectMethod {
                description: "Returns a copy with surrounding whitespace removed.",
                arg_pattern: &[],
                return_pattern: &[&["STRING"]],
                args_optional: false,
                method: strip,
            },
        );
        methods.insert(
            "strip!",
            ObjectMethod {
                description: "Removes surrounding whitespace in place.",
                arg_pattern: &[],
                return_pattern: &[&["NULL"]],
                args_optional: false,
                method: strip_in_place,
            },
        );
        methods.insert(
            "split",
            ObjectMethod {
                description: "Splits on the given separator, by default on whitespace.",
                arg_pattern: &[&["STRING"]],
                return_pattern: &[&["ARRAY"]],
                args_optional: true,
                method: split,
            },
        );
        methods.insert(
            "lines",
            ObjectMethod {
                description: "Splits the string on newlines.",
                arg_pattern: &[],
                return_pattern: &[&["ARRAY"]],
                args_optional: false,
                method: lines,
            },
        );
        methods.insert(
            "plz_i",
            ObjectMethod {
                description: "Interprets the string as an integer, with an optional base.",
                arg_pattern: &[&["INTEGER"]],
                return_pattern: &[&["INTEGER"]],
                args_optional: true,
                method: plz_i,
            },
        );
        methods.insert(
            "plz_f",
            ObjectMethod {
                description: "Interprets the string as a float.",
                arg_pattern: &[],
                return_pattern: &[&["FLOAT"]],
                args_optional: false,
                method: plz_f,
            },
        );
        methods
    };
}

#[cfg(test)]
mod test {
    use super::super::testing::eval_display;

    #[test]
    fn test_string_methods() {
        let cases = vec![
            (r#""test".count("e")"#, "1"),
            (r#""test".count()"#, "ERROR: to few arguments: want=1, got=0"),
            (r#""These are the days of summer".count("e")"#, "5"),
            (r#""test".find("e")"#, "1"),
            (r#""test".find()"#, "ERROR: to few arguments: want=1, got=0"),
            (r#""test".size()"#, "4"),
            (r#""test".plz_i()"#, "0"),
            (r#""125".plz_i()"#, "125"),
            (r#""test125".plz_i()"#, "0"),
            (r#""0125".plz_i()"#, "125"),
            (r#""1010".plz_i()"#, "1010"),
            (r#""1010".plz_i(2)"#, "10"),
            (r#""0x1022".plz_i()"#, "530"),
            (r#""0x1022".plz_i(8)"#, "530"),
            (r#""1022".plz_i(8)"#, "530"),
            (r#""test".replace("e", "s")"#, r#""tsst""#),
            (r#""test".replace()"#, "ERROR: to few arguments: want=2, got=0"),
            (r#""test".replace("e")"#, "ERROR: to few arguments: want=2, got=1"),
            (r#""abc".replace("a", "A")"#, r#""Abc""#),
            (r#""test".reverse()"#, r#""tset""#),
            (r#""ab".reverse()"#, r#""ba""#),
            (r#""test test1".split()"#, r#"["test", "test1"]"#),
            (r#""test test1".split(",")"#, r#"["test test1"]"#),
            (
                r#""test test1".split(",", "x")"#,
                "ERROR: To many arguments: want=1, got=2",
            ),
            (
                r#""test".split(1)"#,
                "ERROR: Wrong argument type on position 0: got=INTEGER, want=STRING",
            ),
            (r#""a,b,c".split(",")"#, r#"["a", "b", "c"]"#),
            (r#""test ".strip()"#, r#""test""#),
            (r#"" test ".strip()"#, r#""test""#),
            (r#""test".strip()"#, r#""test""#),
            (r#""     ".strip()"#, r#""""#),
            (r#""test".upcase()"#, r#""TEST""#),
            (r#""abc".upcase()"#, r#""ABC""#),
            (r#""a b c".upcase()"#, r#""A B C""#),
            (r#""a%b!c".upcase()"#, r#""A%B!C""#),
            (r#""tESt".downcase()"#, r#""test""#),
            (r#""A B C".downcase()"#, r#""a b c""#),
            (r#""A%B!C".downcase()"#, r#""a%b!c""#),
            (r#""test".type()"#, r#""STRING""#),
            (r#""test".nope()"#, "ERROR: Failed to invoke method: nope"),
            (r#""test".methods().type()"#, r#""ARRAY""#),
            (r#"("test".methods().size() > 0).plz_s()"#, r#""true""#),
            (r#""string".find("s")"#, "0"),
            (r#""string".find("string")"#, "0"),
            (r#""string".find("g")"#, "5"),
            (r#""string".find("tr")"#, "1"),
            (r#""string".find("ng")"#, "4"),
            (r#""string".find("x")"#, "-1"),
            (r#""one\ntwo".lines().size()"#, "2"),
            (r#""1.5".plz_f()"#, "1.5"),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(eval_display(input), output, "input: {}", input);
        }
    }

    #[test]
    fn test_string_mutating_methods() {
        let cases = vec![
            (r#"a = "test"; a.upcase!(); a"#, r#""TEST""#),
            (r#"a = "tESt"; a.downcase!(); a"#, r#""test""#),
            (r#"a = "test"; a.reverse!(); a"#, r#""tset""#),
            (r#"a = " test "; a.strip!(); a"#, r#""test""#),
            (r#""test".reverse!()"#, "null"),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(eval_display(input), output, "input: {}", input);
        }
    }

    #[test]
    fn test_string_foreach() {
        let cases = vec![
            (
                r#"a = "test"; b = []; foreach char in a { b.yoink(char) }; b.size()"#,
                "4",
            ),
            (r#"b = []; foreach char, i in "ab" { b.yoink(i) }; b"#, "[0, 1]"),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(eval_display(input), output, "input: {}", input);
        }
    }
}
