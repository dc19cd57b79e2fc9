use super::{EvalError, HashKey, Object, ObjectMethod, Result};
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;

fn with_elements<T>(
    receiver: &Object,
    method: &str,
    f: impl FnOnce(&Vec<Object>) -> T,
) -> Result<T> {
    match receiver {
        Object::Array(elements) => Ok(f(&elements.borrow())),
        other => Err(EvalError::UndefinedMethod {
            method: method.to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn size(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_elements(receiver, "size", |elements| {
        Object::Integer(elements.len() as i64)
    })
}

fn first(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_elements(receiver, "first", |elements| {
        elements.first().cloned().unwrap_or_default()
    })
}

fn last(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_elements(receiver, "last", |elements| {
        elements.last().cloned().unwrap_or_default()
    })
}

fn yeet(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    match receiver {
        Object::Array(elements) => Ok(elements.borrow_mut().pop().unwrap_or_default()),
        other => Err(EvalError::UndefinedMethod {
            method: "yeet".to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn yoink(receiver: &Object, args: Vec<Object>) -> Result<Object> {
    match receiver {
        Object::Array(elements) => {
            for arg in args {
                elements.borrow_mut().push(arg);
            }
            Ok(Object::Null)
        }
        other => Err(EvalError::UndefinedMethod {
            method: "yoink".to_owned(),
            kind: other.type_name(),
        }),
    }
}

fn index(receiver: &Object, args: Vec<Object>) -> Result<Object> {
    let needle = args.into_iter().next().unwrap_or_default();

    with_elements(receiver, "index", |elements| {
        let at = elements
            .iter()
            .position(|element| *element == needle)
            .map(|at| at as i64)
            .unwrap_or(-1);

        Object::Integer(at)
    })
}

fn uniq(receiver: &Object, _args: Vec<Object>) -> Result<Object> {
    with_elements(receiver, "uniq", |elements| {
        let mut seen = HashSet::new();
        let mut unique = vec![];

        for element in elements.iter() {
            let key = HashKey::try_from(element).map_err(|_| EvalError::NotUniqable {
                kind: element.type_name(),
            })?;
            if seen.insert(key) {
                unique.push(element.clone());
            }
        }

        Ok(Object::from(unique))
    })?
}

lazy_static! {
    pub(super) static ref METHODS: HashMap<&'static str, ObjectMethod> = {
        let mut methods: HashMap<&'static str, ObjectMethod> = HashMap::new();
        methods.insert(
            "size",
            ObjectMethod {
                description: "Returns the amount of elements in the array.",
                arg_pattern: &[],
                return_pattern: &[&["INTEGER"]],
                args_optional: false,
                method: size,
            },
        );
        methods.insert(
            "first",
            ObjectMethod {
                description: "Returns the first element of the array, null if empty.",
                arg_pattern: &[],
                return_pattern: &[],
                args_optional: false,
                method: first,
            },
        );
        methods.insert(
            "last",
            ObjectMethod {
                description: "Returns the last element of the array, null if empty.",
                arg_pattern: &[],
                return_pattern: &[],
                args_optional: false,
                method: last,
            },
        );
        methods.insert(
            "yeet",
            ObjectMethod {
                description: "Removes the last element of the array and returns it.",
                arg_pattern: &[],
                return_pattern: &[],
                args_optional: false,
                method: yeet,
            },
        );
        methods.insert(
            "yoink",
            ObjectMethod {
                description: "Appends the given element to the array.",
                arg_pattern: &[&[]],
                return_pattern: &[&["NULL"]],
                args_optional: false,
                method: yoink,
            },
        );
        methods.insert(
            "index",
            ObjectMethod {
                description: "Returns the position of the first equal element, or -1.",
                arg_pattern: &[&[]],
                return_pattern: &[&["INTEGER"]],
                args_optional: false,
                method: index,
            },
        );
        methods.insert(
            "uniq",
            ObjectMethod {
                description: "Returns the array without duplicate elements, keeping order.",
                arg_pattern: &[],
                return_pattern: &[&["ARRAY", "ERROR"]],
                args_optional: false,
                method: uniq,
            },
        );
        methods
    };
}

#[cfg(test)]
mod test {
    use super::super::testing::eval_display;

    #[test]
    fn test_array_equality() {
        let cases = vec![
            ("[1] == [1]", "true"),
            ("[1] == [true]", "false"),
            ("[1] == [true, 1]", "false"),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(eval_display(input), output);
        }
    }

    #[test]
    fn test_array_methods() {
        let cases = vec![
            ("[1,2,3][0]", "1"),
            ("[1,2,3].size()", "3"),
            ("[1,2,3].yeet()", "3"),
            ("a = [1,2]; a.yeet(); a", "[1]"),
            ("[].yeet()", "null"),
            ("[1,2,3].type()", "\"ARRAY\""),
            ("a = []; a.yoink(1); a", "[1]"),
            ("[].nope()", "ERROR: undefined method `.nope()` for ARRAY"),
            ("[1,2,3].index(4)", "-1"),
            ("[1,2,3].index(3)", "2"),
            ("[1,2,3].index(true)", "-1"),
            ("[1,2,3].index()", "ERROR: to few arguments: want=1, got=0"),
            ("[1,1,2].uniq().size()", "2"),
            ("[true,true,2].uniq().size()", "2"),
            ("[\"test\",\"test\",2].uniq().size()", "2"),
            ("[1,2,1,3].uniq()", "[1, 2, 3]"),
            (
                "[\"12\".reverse!()].uniq()",
                "ERROR: failed because element NULL is not hashable",
            ),
            ("[].first()", "null"),
            ("[1,2,3].first()", "1"),
            ("[].last()", "null"),
            ("[1,2,3].last()", "3"),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(eval_display(input), output, "input: {}", input);
        }
    }

    #[test]
    fn test_array_foreach() {
        let cases = vec![
            (
                "a = [\"a\", \"b\"]; b = []; foreach item, i in a { b.yoink(item) }; b.size()",
                "2",
            ),
            (
                "a = []; b = []; foreach i in a { b.yoink(a[i]) }; a.size() == b.size()",
                "true",
            ),
            ("b = []; foreach item, i in [\"a\", \"b\"] { b.yoink(i) }; b", "[0, 1]"),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(eval_display(input), output, "input: {}", input);
        }
    }
}
