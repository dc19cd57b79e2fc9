use crate::ast;
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub EvalError

    IdentifierNotFound{name: String} = "identifier not found: {name}",
    NotAFunction{kind: &'static str} = "not a function: {kind}",
    TypeMismatch{left: &'static str, operator: ast::Operator, right: &'static str} = "type mismatch: {left} {operator} {right}",
    UnknownPrefixOperator{operator: ast::Operator, operand: &'static str} = "unknown operator: {operator}{operand}",
    UnknownInfixOperator{left: &'static str, operator: ast::Operator, right: &'static str} = "unknown operator: {left} {operator} {right}",
    NotIndexable{kind: &'static str} = "index operator not supported: {kind}",
    NotHashable{kind: &'static str} = "unusable as hash key: {kind}",
    DivisionByZero = "devision by zero not allowed",
    NotIterable{kind: &'static str} = "{kind} object doesn't implement the Iterable interface",
    UndefinedMethod{method: String, kind: &'static str} = "undefined method `.{method}()` for {kind}",
    FailedMethodInvocation{method: String} = "Failed to invoke method: {method}",
    TooFewArguments{want: usize, got: usize} = "to few arguments: want={want}, got={got}",
    TooManyArguments{want: usize, got: usize} = "To many arguments: want={want}, got={got}",
    WrongArgumentType{position: usize, got: &'static str, want: String} = "Wrong argument type on position {position}: got={got}, want={want}",
    NotUniqable{kind: &'static str} = "failed because element {kind} is not hashable",
    IncorrectArity{got: usize, want: usize} = "wrong number of arguments. got={got}, want={want}",
    UnsupportedArgType{fn_name: &'static str, kind: &'static str} = "argument to `{fn_name}` not supported, got {kind}",
    InvalidFileMode{mode: String} = "invalid file mode, got `{mode}`",
    ImportError{message: String} = "Import Error: {message}",
    IoError{message: String} = "IO Error: {message}",
    ParseError{message: String} = "Parse Error: {message}",
    Custom{message: String} = "{message}",
}

impl EvalError {
    pub fn binary_op_error(
        left: &'static str,
        operator: ast::Operator,
        right: &'static str,
    ) -> Self {
        if left == right {
            Self::UnknownInfixOperator {
                left,
                operator,
                right,
            }
        } else {
            Self::TypeMismatch {
                left,
                operator,
                right,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_messages() {
        let cases = vec![
            (
                EvalError::IdentifierNotFound {
                    name: "foobar".to_owned(),
                },
                "identifier not found: foobar",
            ),
            (EvalError::DivisionByZero, "devision by zero not allowed"),
            (
                EvalError::TypeMismatch {
                    left: "INTEGER",
                    operator: ast::Operator::Plus,
                    right: "BOOLEAN",
                },
                "type mismatch: INTEGER + BOOLEAN",
            ),
            (
                EvalError::UndefinedMethod {
                    method: "nope".to_owned(),
                    kind: "ARRAY",
                },
                "undefined method `.nope()` for ARRAY",
            ),
            (
                EvalError::TooFewArguments { want: 1, got: 0 },
                "to few arguments: want=1, got=0",
            ),
            (
                EvalError::TooManyArguments { want: 1, got: 2 },
                "To many arguments: want=1, got=2",
            ),
            (
                EvalError::WrongArgumentType {
                    position: 0,
                    got: "INTEGER",
                    want: "STRING".to_owned(),
                },
                "Wrong argument type on position 0: got=INTEGER, want=STRING",
            ),
        ];

        for (err, message) in cases.into_iter() {
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn test_binary_op_error() {
        assert_eq!(
            EvalError::binary_op_error("STRING", ast::Operator::Minus, "STRING"),
            EvalError::UnknownInfixOperator {
                left: "STRING",
                operator: ast::Operator::Minus,
                right: "STRING",
            }
        );
        assert_eq!(
            EvalError::binary_op_error("INTEGER", ast::Operator::Plus, "BOOLEAN"),
            EvalError::TypeMismatch {
                left: "INTEGER",
                operator: ast::Operator::Plus,
                right: "BOOLEAN",
            }
        );
    }
}
