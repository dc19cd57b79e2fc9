use strum_macros::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Illegal,
    Eof,

    // Identifiers and literals
    Ident,
    Int,
    Float,
    String,

    // Operators
    Assign,
    Plus,
    Minus,
    Slash,
    Asterisk,
    Bang,
    LT,
    GT,
    Eq,
    NotEq,

    // Delimiters
    Comma,
    Semicolon,
    Colon,
    Dot,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Class,
    Else,
    False,
    Foreach,
    Function,
    If,
    Import,
    In,
    Null,
    Return,
    True,
}

impl From<&str> for TokenType {
    fn from(text: &str) -> Self {
        match text {
            "class" => Self::Class,
            "else" => Self::Else,
            "false" => Self::False,
            "foreach" => Self::Foreach,
            "function" => Self::Function,
            "if" => Self::If,
            "import" => Self::Import,
            "in" => Self::In,
            "null" => Self::Null,
            "return" => Self::Return,
            "true" => Self::True,
            _ => Self::Ident,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        literal: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            token_type,
            literal: literal.into(),
            line,
            column,
        }
    }

    pub fn new_from_char(token_type: TokenType, ch: u8, line: usize, column: usize) -> Self {
        Self::new(token_type, (ch as char).to_string(), line, column)
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }
}
