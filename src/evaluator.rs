use crate::ast::{self, Node, Operator};
use crate::builtins;
use crate::environment::{Env, Environment};
use crate::modules;
use crate::object::{
    number, ClassObject, EvalError, FunctionObject, HashValue, ModuleObject, Object, Result,
};
use std::convert::TryFrom;
use std::path::Path;
use std::rc::Rc;

pub fn eval(node: Node, env: &Env) -> Result<Object> {
    match node {
        Node::Program(program) => eval_program(program, env),
        Node::Statement(statement) => match statement {
            ast::Statement::Expr(stmt) => eval(stmt.expression.into(), env),
            ast::Statement::Block(stmt) => eval_block(stmt, env),
            ast::Statement::Return(stmt) => Ok(Object::ReturnValue(Box::new(eval(
                stmt.return_value.into(),
                env,
            )?))),
        },
        Node::Expression(expression) => match expression {
            ast::Expression::IntegerLiteral(literal) => Ok(literal.value.into()),
            ast::Expression::FloatLiteral(literal) => Ok(literal.value.into()),
            ast::Expression::StringLiteral(literal) => Ok(literal.value.into()),
            ast::Expression::Boolean(literal) => Ok(literal.value.into()),
            ast::Expression::Null => Ok(Object::Null),
            ast::Expression::Identifier(identifier) => eval_identifier(&identifier, env),
            ast::Expression::Prefix(prefix) => {
                let right = eval((*prefix.right).into(), env)?;
                eval_prefix_expression(prefix.operator, right)
            }
            ast::Expression::Infix(infix) => {
                let left = eval((*infix.left).into(), env)?;
                let right = eval((*infix.right).into(), env)?;
                eval_infix_expression(infix.operator, left, right)
            }
            ast::Expression::Assign(assign) => {
                let value = eval((*assign.value).into(), env)?;
                env.borrow_mut().set(&assign.name.value, value.clone());

                Ok(value)
            }
            ast::Expression::If(if_expression) => eval_if_expression(if_expression, env),
            ast::Expression::Function(fn_literal) => {
                let function = Object::Function(Rc::new(FunctionObject {
                    name: fn_literal.name.clone(),
                    parameters: fn_literal.parameters,
                    body: fn_literal.body,
                    env: Rc::clone(env),
                }));

                if let Some(name) = &fn_literal.name {
                    env.borrow_mut().set(name, function.clone());
                }

                Ok(function)
            }
            ast::Expression::Call(call) => {
                let function = eval((*call.callable).into(), env)?;
                let args = eval_expressions(call.arguments, env)?;
                apply_function(function, args)
            }
            ast::Expression::Array(array) => {
                eval_expressions(array.elements, env).map(Object::from)
            }
            ast::Expression::Hash(hash) => eval_hash_literal(hash.pairs, env),
            ast::Expression::Index(index) => {
                let left = eval((*index.left).into(), env)?;
                let index = eval((*index.index).into(), env)?;
                eval_index_expression(left, index)
            }
            ast::Expression::ObjectCall(object_call) => eval_object_call(object_call, env),
            ast::Expression::Foreach(foreach) => eval_foreach(foreach, env),
            ast::Expression::Import(import) => eval_import(import, env),
            ast::Expression::Class(class) => eval_class(class, env),
        },
    }
}

fn eval_program(program: ast::Program, env: &Env) -> Result<Object> {
    let mut result = Object::default();

    for stmt in program.statements.into_iter() {
        result = eval(stmt.into(), env)?;

        if let Object::ReturnValue(obj) = result {
            return Ok(*obj);
        }
    }

    Ok(result)
}

fn eval_block(block: ast::Block, env: &Env) -> Result<Object> {
    let mut result = Object::default();

    for stmt in block.statements.into_iter() {
        result = eval(stmt.into(), env)?;

        if result.is_return_value() {
            return Ok(result);
        }
    }

    Ok(result)
}

fn eval_expressions(exprs: Vec<ast::Expression>, env: &Env) -> Result<Vec<Object>> {
    let mut result = vec![];

    for expr in exprs.into_iter() {
        result.push(eval(expr.into(), env)?)
    }

    Ok(result)
}

fn eval_identifier(identifier: &ast::Identifier, env: &Env) -> Result<Object> {
    env.borrow()
        .get(&identifier.value)
        .or_else(|| builtins::BUILTINS.with(|b| b.get(identifier.value.as_str()).cloned()))
        .ok_or_else(|| EvalError::IdentifierNotFound {
            name: identifier.value.clone(),
        })
}

fn eval_prefix_expression(operator: Operator, right: Object) -> Result<Object> {
    match operator {
        Operator::Bang => Ok((!right.truth_value()).into()),
        Operator::Minus => match right {
            Object::Integer(n) => Ok((-n).into()),
            operand => Err(EvalError::UnknownPrefixOperator {
                operator: Operator::Minus,
                operand: operand.type_name(),
            }),
        },
        operator => Err(EvalError::UnknownPrefixOperator {
            operator,
            operand: right.type_name(),
        }),
    }
}

fn eval_infix_expression(operator: Operator, left: Object, right: Object) -> Result<Object> {
    match operator {
        Operator::Equal => Ok((left == right).into()),
        Operator::NotEqual => Ok((left != right).into()),
        operator if left.is_number() && right.is_number() => {
            eval_number_infix_expression(operator, left, right)
        }
        operator if left.type_name() != right.type_name() => Err(EvalError::TypeMismatch {
            left: left.type_name(),
            operator,
            right: right.type_name(),
        }),
        operator => match (&left, &right) {
            (Object::String(a), Object::String(b)) => match operator {
                Operator::Plus => Ok(Object::from(format!("{}{}", a.borrow(), b.borrow()))),
                operator => Err(EvalError::UnknownInfixOperator {
                    left: "STRING",
                    operator,
                    right: "STRING",
                }),
            },
            (Object::Array(a), Object::Array(b)) => match operator {
                Operator::Plus => {
                    let mut elements = a.borrow().clone();
                    elements.extend(b.borrow().iter().cloned());

                    Ok(elements.into())
                }
                operator => Err(EvalError::UnknownInfixOperator {
                    left: "ARRAY",
                    operator,
                    right: "ARRAY",
                }),
            },
            _ => Err(EvalError::UnknownInfixOperator {
                left: left.type_name(),
                operator,
                right: right.type_name(),
            }),
        },
    }
}

// Same-kind arithmetic stays in that kind, except `/` which always goes
// through floats. A float result from two integer operands demotes back
// when it carries an exact integer value.
fn eval_number_infix_expression(operator: Operator, left: Object, right: Object) -> Result<Object> {
    match (&left, &right) {
        (Object::Integer(a), Object::Integer(b)) if operator != Operator::Slash => {
            eval_integer_infix_expression(operator, *a, *b)
        }
        (Object::Float(a), Object::Float(b)) => eval_float_infix_expression(operator, *a, *b),
        _ => {
            let both_integers = matches!(
                (&left, &right),
                (Object::Integer(_), Object::Integer(_))
            );
            let a = match &left {
                Object::Integer(n) => *n as f64,
                Object::Float(x) => *x,
                _ => 0.0,
            };
            let b = match &right {
                Object::Integer(n) => *n as f64,
                Object::Float(x) => *x,
                _ => 0.0,
            };

            let result = eval_float_infix_expression(operator, a, b)?;

            if both_integers {
                if let Object::Float(value) = result {
                    return Ok(number::try_integer(value));
                }
            }

            Ok(result)
        }
    }
}

fn eval_integer_infix_expression(operator: Operator, left: i64, right: i64) -> Result<Object> {
    match operator {
        Operator::Plus => Ok((left + right).into()),
        Operator::Minus => Ok((left - right).into()),
        Operator::Asterisk => Ok((left * right).into()),
        Operator::LessThan => Ok((left < right).into()),
        Operator::GreaterThan => Ok((left > right).into()),
        operator => Err(EvalError::UnknownInfixOperator {
            left: "INTEGER",
            operator,
            right: "INTEGER",
        }),
    }
}

fn eval_float_infix_expression(operator: Operator, left: f64, right: f64) -> Result<Object> {
    match operator {
        Operator::Plus => Ok((left + right).into()),
        Operator::Minus => Ok((left - right).into()),
        Operator::Asterisk => Ok((left * right).into()),
        Operator::Slash => {
            if right == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok((left / right).into())
            }
        }
        Operator::LessThan => Ok((left < right).into()),
        Operator::GreaterThan => Ok((left > right).into()),
        operator => Err(EvalError::UnknownInfixOperator {
            left: "FLOAT",
            operator,
            right: "FLOAT",
        }),
    }
}

fn eval_if_expression(if_expression: ast::IfExpression, env: &Env) -> Result<Object> {
    let condition = eval((*if_expression.condition).into(), env)?;

    if condition.truth_value() {
        eval(ast::Statement::Block(if_expression.consequence).into(), env)
    } else if let Some(alternative) = if_expression.alternative {
        eval(ast::Statement::Block(alternative).into(), env)
    } else {
        Ok(Object::Null)
    }
}

fn apply_function(function: Object, args: Vec<Object>) -> Result<Object> {
    match function {
        Object::Function(function) => {
            let env = extend_function_env(&function, args);

            eval(ast::Statement::Block(function.body.clone()).into(), &env)
                .map(Object::unwrap_return)
        }
        Object::Builtin(function) => function(args),
        obj => Err(EvalError::NotAFunction {
            kind: obj.type_name(),
        }),
    }
}

fn extend_function_env(function: &FunctionObject, args: Vec<Object>) -> Env {
    let env = Environment::new_enclosed(&function.env);

    for (param, arg) in function.parameters.iter().zip(args.into_iter()) {
        env.borrow_mut().set(&param.value, arg);
    }

    env
}

fn eval_index_expression(left: Object, index: Object) -> Result<Object> {
    match (&left, &index) {
        (Object::Array(elements), Object::Integer(at)) => Ok(elements
            .borrow()
            .get(usize::try_from(*at).ok().unwrap_or(usize::MAX))
            .cloned()
            .unwrap_or_default()),
        (Object::Hash(hash), index) => {
            let value = hash.borrow().get(index)?;

            Ok(value.unwrap_or_default())
        }
        (Object::String(s), Object::Integer(at)) => Ok(usize::try_from(*at)
            .ok()
            .and_then(|at| s.borrow().as_bytes().get(at).copied())
            .map(|byte| Object::from((byte as char).to_string()))
            .unwrap_or_default()),
        (Object::Module(module), index) => match &module.attributes {
            Object::Hash(attributes) => {
                let value = attributes.borrow().get(index)?;

                Ok(value.unwrap_or_default())
            }
            _ => Ok(Object::Null),
        },
        _ => Err(EvalError::NotIndexable {
            kind: left.type_name(),
        }),
    }
}

fn eval_hash_literal(pairs: Vec<(ast::Expression, ast::Expression)>, env: &Env) -> Result<Object> {
    let mut hash = HashValue::default();

    for (key_expr, value_expr) in pairs.into_iter() {
        let key = eval(key_expr.into(), env)?;
        let value = eval(value_expr.into(), env)?;

        hash.insert(key, value)?;
    }

    Ok(hash.into())
}

// Methods stay callable on error values, so a failing receiver is reified
// instead of short-circuiting.
fn eval_object_call(object_call: ast::ObjectCallExpression, env: &Env) -> Result<Object> {
    let receiver = match eval((*object_call.object).into(), env) {
        Ok(obj) => obj,
        Err(err) => Object::Error(err),
    };

    match *object_call.call {
        ast::Expression::Call(call) => {
            let ast::CallExpression {
                callable,
                arguments,
            } = call;

            match *callable {
                ast::Expression::Identifier(method) => {
                    let args = eval_expressions(arguments, env)?;

                    receiver.invoke_method(&method.value, env, args)
                }
                other => Err(EvalError::FailedMethodInvocation {
                    method: other.to_string(),
                }),
            }
        }
        other => Err(EvalError::FailedMethodInvocation {
            method: other.to_string(),
        }),
    }
}

fn eval_foreach(foreach: ast::ForeachExpression, env: &Env) -> Result<Object> {
    let value = eval((*foreach.value).into(), env)?;

    let mut iterator = value.iterator().ok_or_else(|| EvalError::NotIterable {
        kind: value.type_name(),
    })?;

    let mut permit = vec![foreach.ident.clone()];
    if let Some(index) = &foreach.index {
        permit.push(index.clone());
    }

    // Only the loop variables live in the child scope, every other
    // assignment in the body lands in the enclosing environment.
    let child = Environment::new_temporary_scope(env, permit);

    iterator.reset();

    while let Some((item, index)) = iterator.next() {
        child.borrow_mut().set(&foreach.ident, item);
        if let Some(name) = &foreach.index {
            child.borrow_mut().set(name, index);
        }

        let result = eval(ast::Statement::Block(foreach.body.clone()).into(), &child)?;
        if result.is_return_value() {
            return Ok(result);
        }
    }

    Ok(value)
}

fn eval_import(import: ast::ImportExpression, env: &Env) -> Result<Object> {
    let name = eval((*import.name).into(), env)?;

    let path = match &name {
        Object::String(s) => s.borrow().clone(),
        other => {
            return Err(EvalError::ImportError {
                message: format!("invalid import path '{}'", other),
            })
        }
    };

    let attributes = modules::eval_module(&path)?;

    let basename = Path::new(&path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.clone());

    let module = Object::Module(Rc::new(ModuleObject {
        name: path,
        attributes: attributes.into(),
    }));
    env.borrow_mut().set(&basename, module);

    Ok(Object::Null)
}

fn eval_class(class: ast::ClassExpression, env: &Env) -> Result<Object> {
    let class_env = Environment::new_enclosed(env);
    eval(ast::Statement::Block(class.body).into(), &class_env)?;

    // TODO: route instance method calls through the class environment.
    let name = class.name.value;
    let class = Object::Class(Rc::new(ClassObject {
        name: name.clone(),
        env: class_env,
    }));
    env.borrow_mut().set(&name, class.clone());

    Ok(class)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;
    use std::collections::HashSet;

    fn test_eval(input: &str) -> Result<Object> {
        let env = Environment::new();
        let parser = Parser::new(Lexer::new(input.to_owned()), HashSet::new());
        let (program, _) = parser.parse_program().expect("Parse errors found");

        eval(program.into(), &env)
    }

    #[test]
    fn test_eval_integer_expression() {
        let cases = vec![
            ("5", 5),
            ("10", 10),
            ("-5", -5),
            ("-10", -10),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("-50 + 100 + -50", 0),
            ("5 * 2 + 10", 20),
            ("5 + 2 * 10", 25),
            ("20 + 2 * -10", 0),
            ("50 / 2 * 2 + 10", 60),
            ("2 * (5 + 10)", 30),
            ("3 * 3 * 3 + 10", 37),
            ("3 * (3 * 3) + 10", 37),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output.into(), "input: {}", input);
        }
    }

    #[test]
    fn test_eval_float_expression() {
        let cases = vec![
            ("2.5", Object::Float(2.5)),
            ("2.5 + 2.5", Object::Float(5.0)),
            ("1 + 2.5", Object::Float(3.5)),
            ("2.5 * 2", Object::Float(5.0)),
            // Integer division promotes through floats and demotes exact
            // results.
            ("5 / 2", Object::Float(2.5)),
            ("10 / 2", Object::Integer(5)),
            ("10 / 4", Object::Float(2.5)),
            ("1.5 < 2", Object::Boolean(true)),
            ("2.5 > 3", Object::Boolean(false)),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output, "input: {}", input);
        }

        // Equality promotes across kinds, so pin the kinds down too.
        assert!(matches!(test_eval("10 / 2").unwrap(), Object::Integer(5)));
        assert!(matches!(test_eval("5 / 2").unwrap(), Object::Float(_)));
    }

    #[test]
    fn test_eval_boolean_expression() {
        let cases = vec![
            ("true", true),
            ("false", false),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 < 1", false),
            ("1 > 1", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("1 == 2", false),
            ("1 != 2", true),
            ("true == true", true),
            ("false == false", true),
            ("true == false", false),
            ("true != false", true),
            ("(1 < 2) == true", true),
            ("(1 > 2) == false", true),
            ("2.0 == 2", true),
            ("null == null", true),
            ("\"a\" == \"a\"", true),
            ("\"a\" == \"b\"", false),
            ("[1] == [1]", true),
            ("1 == true", false),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output.into(), "input: {}", input);
        }
    }

    #[test]
    fn test_bang_operator() {
        let cases = vec![
            ("!true", false),
            ("!false", true),
            ("!5", false),
            ("!!true", true),
            ("!!false", false),
            ("!!5", true),
            ("!null", true),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output.into(), "input: {}", input);
        }
    }

    #[test]
    fn test_if_else_expressions() {
        let cases = vec![
            ("if (true) { 10 }", 10.into()),
            ("if (false) { 10 }", Object::Null),
            ("if (1) { 10 }", 10.into()),
            // Everything but false and null is truthy.
            ("if (0) { 10 }", 10.into()),
            ("if (\"\") { 10 }", 10.into()),
            ("if (1 < 2) { 10 }", 10.into()),
            ("if (1 > 2) { 10 }", Object::Null),
            ("if (1 < 2) { 10 } else { 20 }", 10.into()),
            ("if (1 > 2) { 10 } else { 20 }", 20.into()),
            ("if (null) { 10 } else { 20 }", 20.into()),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output, "input: {}", input);
        }
    }

    #[test]
    fn test_return_statements() {
        let cases = vec![
            ("return 10;", 10),
            ("return 10; 9;", 10),
            ("return 2 * 5; 9;", 10),
            ("9; return 2 * 5; 9;", 10),
            (
                "if (10 > 1) {
  if (10 > 1) {
    return 10;
  }

  return 1;
}",
                10,
            ),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output.into(), "input: {}", input);
        }
    }

    #[test]
    fn test_error_handling() {
        let cases = vec![
            (
                "5 + true;",
                EvalError::TypeMismatch {
                    left: "INTEGER",
                    operator: Operator::Plus,
                    right: "BOOLEAN",
                },
            ),
            (
                "5 + true; 5;",
                EvalError::TypeMismatch {
                    left: "INTEGER",
                    operator: Operator::Plus,
                    right: "BOOLEAN",
                },
            ),
            (
                "-true",
                EvalError::UnknownPrefixOperator {
                    operator: Operator::Minus,
                    operand: "BOOLEAN",
                },
            ),
            (
                "-2.5",
                EvalError::UnknownPrefixOperator {
                    operator: Operator::Minus,
                    operand: "FLOAT",
                },
            ),
            (
                "true + false;",
                EvalError::UnknownInfixOperator {
                    left: "BOOLEAN",
                    operator: Operator::Plus,
                    right: "BOOLEAN",
                },
            ),
            (
                "5; true + false; 5",
                EvalError::UnknownInfixOperator {
                    left: "BOOLEAN",
                    operator: Operator::Plus,
                    right: "BOOLEAN",
                },
            ),
            (
                "if (10 > 1) { true + false; }",
                EvalError::UnknownInfixOperator {
                    left: "BOOLEAN",
                    operator: Operator::Plus,
                    right: "BOOLEAN",
                },
            ),
            (
                "foobar",
                EvalError::IdentifierNotFound {
                    name: "foobar".to_owned(),
                },
            ),
            ("1 / 0", EvalError::DivisionByZero),
            ("2.5 / 0.0", EvalError::DivisionByZero),
            (
                "\"Hello\" - \"World\"",
                EvalError::UnknownInfixOperator {
                    left: "STRING",
                    operator: Operator::Minus,
                    right: "STRING",
                },
            ),
            (
                "{\"name\": \"rocket\"}[function(x) { x }];",
                EvalError::NotHashable {
                    kind: "FUNCTION",
                },
            ),
            (
                "[1, 2][true]",
                EvalError::NotIndexable { kind: "ARRAY" },
            ),
            ("5[0]", EvalError::NotIndexable { kind: "INTEGER" }),
            ("5(1)", EvalError::NotAFunction { kind: "INTEGER" }),
            (
                "foreach i in 5 { i }",
                EvalError::NotIterable { kind: "INTEGER" },
            ),
        ];

        for (input, err) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap_err(), err, "input: {}", input);
        }
    }

    #[test]
    fn test_assign_expressions() {
        let cases = vec![
            ("a = 5; a;", 5),
            ("a = 5 * 5; a;", 25),
            ("a = 5; b = a; b;", 5),
            ("a = 5; b = a; c = a + b + 5; c;", 15),
            // Assignment is itself an expression.
            ("a = 5", 5),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output.into(), "input: {}", input);
        }
    }

    #[test]
    fn test_function_object() {
        let input = "function(x) { x + 2; }";

        let fn_obj = match test_eval(input).unwrap() {
            Object::Function(function) => function,
            _ => panic!("not a function"),
        };

        assert_eq!(fn_obj.parameters.len(), 1);
        assert_eq!(fn_obj.parameters[0].to_string(), "x");
        assert_eq!(fn_obj.body.to_string(), "(x + 2)");
    }

    #[test]
    fn test_function_application() {
        let cases = vec![
            ("identity = function(x) { x; }; identity(5);", 5),
            ("identity = function(x) { return x; }; identity(5);", 5),
            ("double = function(x) { x * 2; }; double(5);", 10),
            ("add = function(x, y) { x + y; }; add(5, 5);", 10),
            ("add = function(x, y) { x + y; }; add(5 + 5, add(5, 5));", 20),
            ("function(x) { x; }(5)", 5),
            // A named function binds itself, which makes recursion work.
            (
                "function fact(n) { if (n < 2) { return 1; }; n * fact(n - 1); }; fact(5);",
                120,
            ),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output.into(), "input: {}", input);
        }
    }

    #[test]
    fn test_closures() {
        let input = "
newAdder = function(x) {
  function(y) { x + y; };
};

addTwo = newAdder(2);
addTwo(2);
";

        assert_eq!(test_eval(input).unwrap(), 4.into());
    }

    #[test]
    fn test_string_expressions() {
        let cases = vec![
            ("\"Hello World!\"", Object::from("Hello World!")),
            ("\"Hello\" + \" \" + \"World!\"", Object::from("Hello World!")),
            ("\"abc\"[0]", Object::from("a")),
            ("\"abc\"[2]", Object::from("c")),
            ("\"abc\"[3]", Object::Null),
            ("\"abc\"[-1]", Object::Null),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output, "input: {}", input);
        }
    }

    #[test]
    fn test_array_expressions() {
        let cases = vec![
            (
                "[1, 2 * 2, 3 + 3]",
                Object::from(vec![1.into(), 4.into(), 6.into()]),
            ),
            ("[1, 2, 3][0]", Object::Integer(1)),
            ("[1, 2, 3][2]", Object::Integer(3)),
            ("i = 0; [1][i];", Object::Integer(1)),
            ("[1, 2, 3][1 + 1];", Object::Integer(3)),
            ("myArray = [1, 2, 3]; myArray[2];", Object::Integer(3)),
            (
                "myArray = [1, 2, 3]; myArray[0] + myArray[1] + myArray[2];",
                Object::Integer(6),
            ),
            ("[1, 2, 3][3]", Object::Null),
            ("[1, 2, 3][-1]", Object::Null),
            (
                "[1, 2] + [3]",
                Object::from(vec![1.into(), 2.into(), 3.into()]),
            ),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output, "input: {}", input);
        }
    }

    #[test]
    fn test_hash_expressions() {
        let cases = vec![
            ("{\"foo\": 5}[\"foo\"]", Object::Integer(5)),
            ("{\"foo\": 5}[\"bar\"]", Object::Null),
            ("key = \"foo\"; {\"foo\": 5}[key]", Object::Integer(5)),
            ("{}[\"foo\"]", Object::Null),
            ("{5: 5}[5]", Object::Integer(5)),
            ("{true: 5}[true]", Object::Integer(5)),
            (
                "two = \"two\"; {\"one\": 10 - 9, two: 1 + 1, \"thr\" + \"ee\": 6 / 2}[\"three\"]",
                Object::Integer(3),
            ),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output, "input: {}", input);
        }
    }

    #[test]
    fn test_foreach_scoping() {
        let cases = vec![
            // Assignments to non-loop variables bleed into the enclosing
            // scope.
            ("counter = 0; foreach i in [1, 2, 3] { counter = counter + 1 }; counter", 3.into()),
            ("total = 0; foreach i in [1, 2, 3] { total = total + i }; total", 6.into()),
            // The loop variable itself does not.
            ("i = 99; foreach i in [1, 2] { i }; i", 99.into()),
            ("sum = 0; foreach value, i in [10, 20] { sum = sum + i }; sum", 1.into()),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(test_eval(input).unwrap(), output, "input: {}", input);
        }
    }

    #[test]
    fn test_foreach_result_is_the_iterable() {
        assert_eq!(
            test_eval("foreach i in [1, 2] { i }").unwrap(),
            Object::from(vec![1.into(), 2.into()])
        );
        assert_eq!(
            test_eval("foreach c in \"ab\" { c }").unwrap(),
            Object::from("ab")
        );
    }

    #[test]
    fn test_foreach_return_propagates() {
        let input = "
first = function(items) {
  foreach item in items {
    return item;
  };
  null;
};
first([7, 8, 9]);
";

        assert_eq!(test_eval(input).unwrap(), 7.into());
    }

    #[test]
    fn test_method_calls_on_errors() {
        assert_eq!(test_eval("(1 / 0).type()").unwrap(), Object::from("ERROR"));
        assert_eq!(
            test_eval("(1 / 0).plz_s()").unwrap(),
            Object::from("ERROR: devision by zero not allowed")
        );
    }

    #[test]
    fn test_class_expressions() {
        let evaluated = test_eval("class Foo { a = 1 }; Foo").unwrap();

        match &evaluated {
            Object::Class(class) => {
                assert_eq!(class.name, "Foo");
                assert_eq!(class.env.borrow().get("a"), Some(Object::Integer(1)));
            }
            other => panic!("not a class: {}", other),
        }
        assert_eq!(evaluated.type_name(), "CLASS");
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(test_eval("puts(1)").unwrap(), Object::Null);
        assert_eq!(
            test_eval("puts").unwrap().type_name(),
            "BUILTIN"
        );
    }
}
