use crate::ast;
use crate::builtins::Builtin;
use crate::environment::Env;
use lazy_static::lazy_static;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

mod eval_error;
pub use eval_error::EvalError;

pub mod hash;
pub use hash::{HashKey, HashPair, HashValue};

mod array;
mod file;
pub mod number;
mod string;
pub use file::FileObject;

pub type Result<T> = std::result::Result<T, EvalError>;

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(Rc<RefCell<String>>),
    Null,
    Array(Rc<RefCell<Vec<Object>>>),
    Hash(Rc<RefCell<HashValue>>),
    Function(Rc<FunctionObject>),
    Builtin(Builtin),
    Module(Rc<ModuleObject>),
    File(Rc<RefCell<FileObject>>),
    Class(Rc<ClassObject>),
    ReturnValue(Box<Object>),
    Error(EvalError),
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::String(s) => write!(f, "\"{}\"", s.borrow()),
            Self::Null => write!(f, "null"),
            Self::Array(a) => {
                let elements: Vec<String> = a.borrow().iter().map(Object::to_string).collect();

                write!(f, "[{}]", elements.join(", "))
            }
            Self::Hash(h) => write!(f, "{}", h.borrow()),
            Self::Function(func) => write!(f, "{}", func),
            Self::Builtin(_) => write!(f, "builtin function"),
            Self::Module(module) => write!(f, "<module:{}>", module.name),
            Self::File(file) => write!(f, "<file:{}>", file.borrow().filename),
            Self::Class(class) => write!(f, "class {} {{}}", class.name),
            Self::ReturnValue(obj) => write!(f, "{}", obj),
            Self::Error(err) => write!(f, "ERROR: {}", err),
        }
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::Null
    }
}

impl From<i64> for Object {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Object {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Self::String(Rc::new(RefCell::new(s)))
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        s.to_owned().into()
    }
}

impl From<Vec<Object>> for Object {
    fn from(a: Vec<Object>) -> Self {
        Self::Array(Rc::new(RefCell::new(a)))
    }
}

impl From<HashValue> for Object {
    fn from(h: HashValue) -> Self {
        Self::Hash(Rc::new(RefCell::new(h)))
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                (*a as f64) == *b
            }
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::String(a), Self::String(b)) => *a.borrow() == *b.borrow(),
            (Self::Array(a), Self::Array(b)) => *a.borrow() == *b.borrow(),
            (Self::Hash(a), Self::Hash(b)) => *a.borrow() == *b.borrow(),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Module(a), Self::Module(b)) => Rc::ptr_eq(a, b),
            (Self::File(a), Self::File(b)) => Rc::ptr_eq(a, b),
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            (Self::ReturnValue(a), Self::ReturnValue(b)) => a == b,
            (Self::Error(a), Self::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Object {
    pub fn is_return_value(&self) -> bool {
        matches!(self, Self::ReturnValue(_))
    }

    pub fn unwrap_return(self) -> Self {
        match self {
            Self::ReturnValue(obj) => *obj,
            obj => obj,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "INTEGER",
            Self::Float(_) => "FLOAT",
            Self::Boolean(_) => "BOOLEAN",
            Self::String(_) => "STRING",
            Self::Null => "NULL",
            Self::Array(_) => "ARRAY",
            Self::Hash(_) => "HASH",
            Self::Function(_) => "FUNCTION",
            Self::Builtin(_) => "BUILTIN",
            Self::Module(_) => "MODULE",
            Self::File(_) => "FILE",
            Self::Class(_) => "CLASS",
            Self::ReturnValue(obj) => obj.type_name(),
            Self::Error(_) => "ERROR",
        }
    }

    pub fn truth_value(&self) -> bool {
        !matches!(self, Self::Boolean(false) | Self::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }

    pub fn inspect(&self) -> String {
        self.to_string()
    }

    fn kind_methods(&self) -> Option<&'static HashMap<&'static str, ObjectMethod>> {
        match self {
            Self::String(_) => Some(&*string::METHODS),
            Self::Array(_) => Some(&*array::METHODS),
            Self::Hash(_) => Some(&*hash::METHODS),
            Self::Integer(_) => Some(&*number::INTEGER_METHODS),
            Self::Float(_) => Some(&*number::FLOAT_METHODS),
            Self::File(_) => Some(&*file::METHODS),
            _ => None,
        }
    }

    fn method_descriptor(&self, method: &str) -> Option<&'static ObjectMethod> {
        self.kind_methods()
            .and_then(|methods| methods.get(method))
            .or_else(|| UNIVERSAL_METHODS.get(method))
    }

    /// Every method name this value answers to, sorted.
    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<String> = UNIVERSAL_METHODS
            .keys()
            .map(|name| (*name).to_owned())
            .collect();
        if let Some(methods) = self.kind_methods() {
            names.extend(methods.keys().map(|name| (*name).to_owned()));
        }
        names.sort();
        names
    }

    pub fn invoke_method(&self, method: &str, _env: &Env, args: Vec<Object>) -> Result<Object> {
        if let Some(descriptor) = self.method_descriptor(method) {
            descriptor.validate_args(&args)?;
            return (descriptor.method)(self, args);
        }

        Err(match self {
            Self::String(_) => EvalError::FailedMethodInvocation {
                method: method.to_owned(),
            },
            other => EvalError::UndefinedMethod {
                method: method.to_owned(),
                kind: other.type_name(),
            },
        })
    }

    pub fn iterator(&self) -> Option<ObjectIterator> {
        match self {
            Self::Array(elements) => Some(ObjectIterator::Array {
                elements: Rc::clone(elements),
                offset: 0,
            }),
            Self::String(string) => Some(ObjectIterator::String {
                string: Rc::clone(string),
                offset: 0,
            }),
            Self::Hash(hash) => Some(ObjectIterator::Hash {
                pairs: hash
                    .borrow()
                    .pairs
                    .values()
                    .map(|pair| (pair.key.clone(), pair.value.clone()))
                    .collect(),
                offset: 0,
            }),
            _ => None,
        }
    }
}

pub struct FunctionObject {
    pub name: Option<String>,
    pub parameters: Vec<ast::Identifier>,
    pub body: ast::Block,
    pub env: Env,
}

// The captured environment can contain the function itself, so the
// derived Debug would recurse.
impl fmt::Debug for FunctionObject {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("FunctionObject")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl Display for FunctionObject {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(ast::Identifier::to_string)
            .collect();

        write!(f, "function({}) {{ {} }}", parameters.join(", "), self.body)
    }
}

#[derive(Debug)]
pub struct ModuleObject {
    pub name: String,
    pub attributes: Object,
}

pub struct ClassObject {
    pub name: String,
    pub env: Env,
}

impl fmt::Debug for ClassObject {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("ClassObject").field("name", &self.name).finish()
    }
}

/// A dispatchable method: the callable body plus the descriptors used for
/// validation and reflection (`methods()`, `wat()`).
pub struct ObjectMethod {
    pub description: &'static str,
    /// Acceptable type tags per argument position. An empty inner slice
    /// accepts any type at that position.
    pub arg_pattern: &'static [&'static [&'static str]],
    pub return_pattern: &'static [&'static [&'static str]],
    /// Allows fewer arguments than `arg_pattern` positions.
    pub args_optional: bool,
    pub method: fn(&Object, Vec<Object>) -> Result<Object>,
}

impl ObjectMethod {
    fn validate_args(&self, args: &[Object]) -> Result<()> {
        let want = self.arg_pattern.len();

        if args.len() > want {
            return Err(EvalError::TooManyArguments {
                want,
                got: args.len(),
            });
        }
        if args.len() < want && !self.args_optional {
            return Err(EvalError::TooFewArguments {
                want,
                got: args.len(),
            });
        }

        for (position, (arg, allowed)) in args.iter().zip(self.arg_pattern.iter()).enumerate() {
            if !allowed.is_empty() && !allowed.contains(&arg.type_name()) {
                return Err(EvalError::WrongArgumentType {
                    position,
                    got: arg.type_name(),
                    want: allowed.join(", "),
                });
            }
        }

        Ok(())
    }

    fn signature(&self, name: &str) -> String {
        let positions: Vec<String> = self
            .arg_pattern
            .iter()
            .map(|allowed| allowed.join("|"))
            .collect();

        format!("{}({})", name, positions.join(", "))
    }
}

lazy_static! {
    static ref UNIVERSAL_METHODS: HashMap<&'static str, ObjectMethod> = {
        let mut methods: HashMap<&'static str, ObjectMethod> = HashMap::new();
        methods.insert(
            "type",
            ObjectMethod {
                description: "Returns the type of the object.",
                arg_pattern: &[],
                return_pattern: &[&["STRING"]],
                args_optional: false,
                method: |receiver, _| Ok(receiver.type_name().into()),
            },
        );
        methods.insert(
            "methods",
            ObjectMethod {
                description: "Returns an array of all supported method names.",
                arg_pattern: &[],
                return_pattern: &[&["ARRAY"]],
                args_optional: false,
                method: |receiver, _| {
                    let names: Vec<Object> = receiver
                        .method_names()
                        .into_iter()
                        .map(Object::from)
                        .collect();

                    Ok(names.into())
                },
            },
        );
        methods.insert(
            "wat",
            ObjectMethod {
                description: "Returns the method signatures of the object.",
                arg_pattern: &[],
                return_pattern: &[&["STRING"]],
                args_optional: false,
                method: |receiver, _| {
                    let mut lines = vec![format!(
                        "{} supports the following methods:",
                        receiver.type_name()
                    )];
                    for name in receiver.method_names() {
                        if let Some(descriptor) = receiver.method_descriptor(&name) {
                            lines.push(format!(
                                "  {:<28}{}",
                                descriptor.signature(&name),
                                descriptor.description
                            ));
                        }
                    }

                    Ok(lines.join("\n").into())
                },
            },
        );
        methods.insert(
            "plz_s",
            ObjectMethod {
                description: "Converts the object into a string.",
                arg_pattern: &[],
                return_pattern: &[&["STRING"]],
                args_optional: false,
                method: |receiver, _| match receiver {
                    Object::String(s) => Ok(s.borrow().clone().into()),
                    other => Ok(other.to_string().into()),
                },
            },
        );
        methods
    };
}

pub enum ObjectIterator {
    Array {
        elements: Rc<RefCell<Vec<Object>>>,
        offset: usize,
    },
    String {
        string: Rc<RefCell<String>>,
        offset: usize,
    },
    Hash {
        pairs: Vec<(Object, Object)>,
        offset: usize,
    },
}

impl ObjectIterator {
    pub fn reset(&mut self) {
        match self {
            Self::Array { offset, .. } => *offset = 0,
            Self::String { offset, .. } => *offset = 0,
            Self::Hash { offset, .. } => *offset = 0,
        }
    }

    /// The next (value, index) pair: (element, position) for arrays,
    /// (byte as string, position) for strings, (key, value) for hashes.
    pub fn next(&mut self) -> Option<(Object, Object)> {
        match self {
            Self::Array { elements, offset } => {
                let element = elements.borrow().get(*offset).cloned()?;
                let index = Object::Integer(*offset as i64);
                *offset += 1;
                Some((element, index))
            }
            Self::String { string, offset } => {
                let byte = *string.borrow().as_bytes().get(*offset)?;
                let index = Object::Integer(*offset as i64);
                *offset += 1;
                Some(((byte as char).to_string().into(), index))
            }
            Self::Hash { pairs, offset } => {
                let (key, value) = pairs.get(*offset)?.clone();
                *offset += 1;
                Some((key, value))
            }
        }
    }
}


#[cfg(test)]
mod test {
    use super::testing::eval_display;
    use super::*;

    #[test]
    fn test_type_names() {
        let cases = vec![
            (Object::Integer(1), "INTEGER"),
            (Object::Float(1.5), "FLOAT"),
            (Object::Boolean(true), "BOOLEAN"),
            (Object::from("a"), "STRING"),
            (Object::Null, "NULL"),
            (Object::from(vec![]), "ARRAY"),
            (Object::from(HashValue::default()), "HASH"),
            (
                Object::Error(EvalError::DivisionByZero),
                "ERROR",
            ),
        ];

        for (object, type_name) in cases.into_iter() {
            assert_eq!(object.type_name(), type_name);
        }
    }

    #[test]
    fn test_truth_value() {
        assert!(Object::Boolean(true).truth_value());
        assert!(Object::Integer(0).truth_value());
        assert!(Object::from("").truth_value());
        assert!(!Object::Boolean(false).truth_value());
        assert!(!Object::Null.truth_value());
    }

    #[test]
    fn test_numeric_equality_promotes() {
        assert_eq!(Object::Integer(2), Object::Float(2.0));
        assert_ne!(Object::Integer(2), Object::Float(2.5));
        assert_ne!(Object::Integer(1), Object::Boolean(true));
    }

    #[test]
    fn test_universal_methods() {
        let cases = vec![
            ("1.type()", "\"INTEGER\""),
            ("1.5.type()", "\"FLOAT\""),
            ("true.type()", "\"BOOLEAN\""),
            ("null.type()", "\"NULL\""),
            ("true.plz_s()", "\"true\""),
            ("1.plz_s()", "\"1\""),
            ("[1, 2].plz_s()", "\"[1, 2]\""),
            ("(1 / 0).type()", "\"ERROR\""),
            ("null.methods().type()", "\"ARRAY\""),
        ];

        for (input, output) in cases.into_iter() {
            assert_eq!(eval_display(input), output);
        }
    }

    #[test]
    fn test_wat_lines_up_with_methods() {
        let inputs = vec![
            "(\"test\".wat().lines().size() == \"test\".methods().size() + 1).plz_s()",
            "([].wat().lines().size() == [].methods().size() + 1).plz_s()",
            "({}.wat().lines().size() == {}.methods().size() + 1).plz_s()",
            "(1.wat().lines().size() == 1.methods().size() + 1).plz_s()",
            "(null.wat().lines().size() == null.methods().size() + 1).plz_s()",
        ];

        for input in inputs.into_iter() {
            assert_eq!(eval_display(input), "\"true\"");
        }
    }
}
