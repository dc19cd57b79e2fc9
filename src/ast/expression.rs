use super::{Block, Identifier, Operator};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(IntegerLiteral),
    FloatLiteral(FloatLiteral),
    StringLiteral(StringLiteral),
    Boolean(BooleanLiteral),
    Null,
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    Assign(AssignExpression),
    If(IfExpression),
    Foreach(ForeachExpression),
    Function(FunctionLiteral),
    Call(CallExpression),
    Index(IndexExpression),
    ObjectCall(ObjectCallExpression),
    Array(ArrayLiteral),
    Hash(HashLiteral),
    Import(ImportExpression),
    Class(ClassExpression),
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Identifier(expr) => write!(f, "{}", expr),
            Self::IntegerLiteral(expr) => write!(f, "{}", expr.value),
            Self::FloatLiteral(expr) => write!(f, "{}", expr.value),
            Self::StringLiteral(expr) => write!(f, "\"{}\"", expr.value),
            Self::Boolean(expr) => write!(f, "{}", expr.value),
            Self::Null => write!(f, "null"),
            Self::Prefix(expr) => write!(f, "{}", expr),
            Self::Infix(expr) => write!(f, "{}", expr),
            Self::Assign(expr) => write!(f, "{}", expr),
            Self::If(expr) => write!(f, "{}", expr),
            Self::Foreach(expr) => write!(f, "{}", expr),
            Self::Function(expr) => write!(f, "{}", expr),
            Self::Call(expr) => write!(f, "{}", expr),
            Self::Index(expr) => write!(f, "{}", expr),
            Self::ObjectCall(expr) => write!(f, "{}", expr),
            Self::Array(expr) => write!(f, "{}", expr),
            Self::Hash(expr) => write!(f, "{}", expr),
            Self::Import(expr) => write!(f, "{}", expr),
            Self::Class(expr) => write!(f, "{}", expr),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntegerLiteral {
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct FloatLiteral {
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct BooleanLiteral {
    pub value: bool,
}

#[derive(Debug, Clone)]
pub struct PrefixExpression {
    pub operator: Operator,
    pub right: Box<Expression>,
}

impl Display for PrefixExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "({}{})", self.operator, self.right)
    }
}

#[derive(Debug, Clone)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: Operator,
    pub right: Box<Expression>,
}

impl Display for InfixExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

#[derive(Debug, Clone)]
pub struct AssignExpression {
    pub name: Identifier,
    pub value: Box<Expression>,
}

impl Display for AssignExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

#[derive(Debug, Clone)]
pub struct IfExpression {
    pub condition: Box<Expression>,
    pub consequence: Block,
    pub alternative: Option<Block>,
}

impl Display for IfExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "if ({}) {{ {} }}", self.condition, self.consequence)?;
        if let Some(alternative) = &self.alternative {
            write!(f, " else {{ {} }}", alternative)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ForeachExpression {
    pub ident: String,
    pub index: Option<String>,
    pub value: Box<Expression>,
    pub body: Block,
}

impl Display for ForeachExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "foreach {}", self.ident)?;
        if let Some(index) = &self.index {
            write!(f, ", {}", index)?;
        }
        write!(f, " in {} {{ {} }}", self.value, self.body)
    }
}

#[derive(Debug, Clone)]
pub struct FunctionLiteral {
    pub name: Option<String>,
    pub parameters: Vec<Identifier>,
    pub body: Block,
}

impl Display for FunctionLiteral {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let parameters: Vec<String> = self.parameters.iter().map(Identifier::to_string).collect();

        match &self.name {
            Some(name) => write!(f, "function {}({}) {{ {} }}", name, parameters.join(", "), self.body),
            None => write!(f, "function({}) {{ {} }}", parameters.join(", "), self.body),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CallExpression {
    pub callable: Box<Expression>,
    pub arguments: Vec<Expression>,
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let arguments: Vec<String> = self.arguments.iter().map(Expression::to_string).collect();

        write!(f, "{}({})", self.callable, arguments.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct IndexExpression {
    pub left: Box<Expression>,
    pub index: Box<Expression>,
}

impl Display for IndexExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "({}[{}])", self.left, self.index)
    }
}

#[derive(Debug, Clone)]
pub struct ObjectCallExpression {
    pub object: Box<Expression>,
    pub call: Box<Expression>,
}

impl Display for ObjectCallExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}.{}", self.object, self.call)
    }
}

#[derive(Debug, Clone)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
}

impl Display for ArrayLiteral {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let elements: Vec<String> = self.elements.iter().map(Expression::to_string).collect();

        write!(f, "[{}]", elements.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct HashLiteral {
    pub pairs: Vec<(Expression, Expression)>,
}

impl Display for HashLiteral {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let pairs: Vec<String> = self
            .pairs
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();

        write!(f, "{{{}}}", pairs.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct ImportExpression {
    pub name: Box<Expression>,
}

impl Display for ImportExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "import({})", self.name)
    }
}

#[derive(Debug, Clone)]
pub struct ClassExpression {
    pub name: Identifier,
    pub body: Block,
}

impl Display for ClassExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "class {} {{ {} }}", self.name, self.body)
    }
}
