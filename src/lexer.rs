use crate::token::{Token, TokenType};

pub struct Lexer {
    input: String,
    position: usize,
    read_position: usize,
    ch: u8,
    line: usize,
    column: usize,
}

fn is_letter(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_identifier_char(c: u8) -> bool {
    is_letter(c) || c.is_ascii_digit()
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_token())
    }
}

impl Lexer {
    pub fn new(input: String) -> Self {
        let mut lexer = Self {
            input,
            position: 0,
            read_position: 0,
            ch: 0,
            line: 1,
            column: 0,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        if self.ch == b'\n' {
            self.line += 1;
            self.column = 0;
        }
        self.ch = *self.input.as_bytes().get(self.read_position).unwrap_or(&0);
        self.position = self.read_position;
        self.read_position += 1;
        self.column += 1;
    }

    fn peek_char(&self) -> u8 {
        *self.input.as_bytes().get(self.read_position).unwrap_or(&0)
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;

        let token = match self.ch {
            b'=' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::new(TokenType::Eq, "==", line, column)
                } else {
                    Token::new_from_char(TokenType::Assign, self.ch, line, column)
                }
            }
            b'!' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::new(TokenType::NotEq, "!=", line, column)
                } else {
                    Token::new_from_char(TokenType::Bang, self.ch, line, column)
                }
            }
            b'+' => Token::new_from_char(TokenType::Plus, self.ch, line, column),
            b'-' => Token::new_from_char(TokenType::Minus, self.ch, line, column),
            b'*' => Token::new_from_char(TokenType::Asterisk, self.ch, line, column),
            b'/' => Token::new_from_char(TokenType::Slash, self.ch, line, column),
            b'<' => Token::new_from_char(TokenType::LT, self.ch, line, column),
            b'>' => Token::new_from_char(TokenType::GT, self.ch, line, column),
            b',' => Token::new_from_char(TokenType::Comma, self.ch, line, column),
            b';' => Token::new_from_char(TokenType::Semicolon, self.ch, line, column),
            b':' => Token::new_from_char(TokenType::Colon, self.ch, line, column),
            b'.' => Token::new_from_char(TokenType::Dot, self.ch, line, column),
            b'(' => Token::new_from_char(TokenType::LParen, self.ch, line, column),
            b')' => Token::new_from_char(TokenType::RParen, self.ch, line, column),
            b'{' => Token::new_from_char(TokenType::LBrace, self.ch, line, column),
            b'}' => Token::new_from_char(TokenType::RBrace, self.ch, line, column),
            b'[' => Token::new_from_char(TokenType::LBracket, self.ch, line, column),
            b']' => Token::new_from_char(TokenType::RBracket, self.ch, line, column),
            b'"' => Token::new(TokenType::String, self.read_string(), line, column),
            0 => Token::new(TokenType::Eof, "", line, column),
            c => {
                if is_letter(c) {
                    let literal = self.read_identifier();
                    let token_type = TokenType::from(literal.as_str());
                    return Token::new(token_type, literal, line, column);
                } else if c.is_ascii_digit() {
                    let (token_type, literal) = self.read_number();
                    return Token::new(token_type, literal, line, column);
                } else {
                    Token::new_from_char(TokenType::Illegal, c, line, column)
                }
            }
        };
        self.read_char();
        token
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while is_identifier_char(self.ch) {
            self.read_char()
        }
        // Mutating-method names carry a trailing bang, e.g. `upcase!()`.
        if self.ch == b'!' && self.peek_char() == b'(' {
            self.read_char();
        }
        self.input[start..self.position].to_owned()
    }

    fn read_number(&mut self) -> (TokenType, String) {
        let start = self.position;
        let mut token_type = TokenType::Int;
        while self.ch.is_ascii_digit() {
            self.read_char()
        }
        if self.ch == b'.' && self.peek_char().is_ascii_digit() {
            token_type = TokenType::Float;
            self.read_char();
            while self.ch.is_ascii_digit() {
                self.read_char()
            }
        }
        (token_type, self.input[start..self.position].to_owned())
    }

    fn read_string(&mut self) -> String {
        let mut bytes = Vec::new();
        loop {
            self.read_char();
            match self.ch {
                b'"' | 0 => break,
                b'\\' => {
                    self.read_char();
                    match self.ch {
                        b'n' => bytes.push(b'\n'),
                        b't' => bytes.push(b'\t'),
                        b'r' => bytes.push(b'\r'),
                        0 => break,
                        c => bytes.push(c),
                    }
                }
                c => bytes.push(c),
            }
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn skip_whitespace(&mut self) {
        loop {
            while self.ch.is_ascii_whitespace() {
                self.read_char();
            }
            if self.ch == b'#' {
                while self.ch != b'\n' && self.ch != 0 {
                    self.read_char();
                }
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_next_token() {
        let input = r#"five = 5;
ten = 10.5;

add = function(x, y) {
  x + y;
};

result = add(five, ten);
!-/*5;
5 < 10 > 5;

if (5 < 10) {
    return true;
} else {
    return false;
}

10 == 10;
10 != 9;
# a comment to skip
"hello world";
"with \"escapes\"\n";
[1, 2];
{"a": 1};
foreach i, item in result { item };
import("module");
a.upcase!();
class Foo { };
null;
"#
        .to_owned();

        let cases = [
            (TokenType::Ident, "five"),
            (TokenType::Assign, "="),
            (TokenType::Int, "5"),
            (TokenType::Semicolon, ";"),
            (TokenType::Ident, "ten"),
            (TokenType::Assign, "="),
            (TokenType::Float, "10.5"),
            (TokenType::Semicolon, ";"),
            (TokenType::Ident, "add"),
            (TokenType::Assign, "="),
            (TokenType::Function, "function"),
            (TokenType::LParen, "("),
            (TokenType::Ident, "x"),
            (TokenType::Comma, ","),
            (TokenType::Ident, "y"),
            (TokenType::RParen, ")"),
            (TokenType::LBrace, "{"),
            (TokenType::Ident, "x"),
            (TokenType::Plus, "+"),
            (TokenType::Ident, "y"),
            (TokenType::Semicolon, ";"),
            (TokenType::RBrace, "}"),
            (TokenType::Semicolon, ";"),
            (TokenType::Ident, "result"),
            (TokenType::Assign, "="),
            (TokenType::Ident, "add"),
            (TokenType::LParen, "("),
            (TokenType::Ident, "five"),
            (TokenType::Comma, ","),
            (TokenType::Ident, "ten"),
            (TokenType::RParen, ")"),
            (TokenType::Semicolon, ";"),
            (TokenType::Bang, "!"),
            (TokenType::Minus, "-"),
            (TokenType::Slash, "/"),
            (TokenType::Asterisk, "*"),
            (TokenType::Int, "5"),
            (TokenType::Semicolon, ";"),
            (TokenType::Int, "5"),
            (TokenType::LT, "<"),
            (TokenType::Int, "10"),
            (TokenType::GT, ">"),
            (TokenType::Int, "5"),
            (TokenType::Semicolon, ";"),
            (TokenType::If, "if"),
            (TokenType::LParen, "("),
            (TokenType::Int, "5"),
            (TokenType::LT, "<"),
            (TokenType::Int, "10"),
            (TokenType::RParen, ")"),
            (TokenType::LBrace, "{"),
            (TokenType::Return, "return"),
            (TokenType::True, "true"),
            (TokenType::Semicolon, ";"),
            (TokenType::RBrace, "}"),
            (TokenType::Else, "else"),
            (TokenType::LBrace, "{"),
            (TokenType::Return, "return"),
            (TokenType::False, "false"),
            (TokenType::Semicolon, ";"),
            (TokenType::RBrace, "}"),
            (TokenType::Int, "10"),
            (TokenType::Eq, "=="),
            (TokenType::Int, "10"),
            (TokenType::Semicolon, ";"),
            (TokenType::Int, "10"),
            (TokenType::NotEq, "!="),
            (TokenType::Int, "9"),
            (TokenType::Semicolon, ";"),
            (TokenType::String, "hello world"),
            (TokenType::Semicolon, ";"),
            (TokenType::String, "with \"escapes\"\n"),
            (TokenType::Semicolon, ";"),
            (TokenType::LBracket, "["),
            (TokenType::Int, "1"),
            (TokenType::Comma, ","),
            (TokenType::Int, "2"),
            (TokenType::RBracket, "]"),
            (TokenType::Semicolon, ";"),
            (TokenType::LBrace, "{"),
            (TokenType::String, "a"),
            (TokenType::Colon, ":"),
            (TokenType::Int, "1"),
            (TokenType::RBrace, "}"),
            (TokenType::Semicolon, ";"),
            (TokenType::Foreach, "foreach"),
            (TokenType::Ident, "i"),
            (TokenType::Comma, ","),
            (TokenType::Ident, "item"),
            (TokenType::In, "in"),
            (TokenType::Ident, "result"),
            (TokenType::LBrace, "{"),
            (TokenType::Ident, "item"),
            (TokenType::RBrace, "}"),
            (TokenType::Semicolon, ";"),
            (TokenType::Import, "import"),
            (TokenType::LParen, "("),
            (TokenType::String, "module"),
            (TokenType::RParen, ")"),
            (TokenType::Semicolon, ";"),
            (TokenType::Ident, "a"),
            (TokenType::Dot, "."),
            (TokenType::Ident, "upcase!"),
            (TokenType::LParen, "("),
            (TokenType::RParen, ")"),
            (TokenType::Semicolon, ";"),
            (TokenType::Class, "class"),
            (TokenType::Ident, "Foo"),
            (TokenType::LBrace, "{"),
            (TokenType::RBrace, "}"),
            (TokenType::Semicolon, ";"),
            (TokenType::Null, "null"),
            (TokenType::Semicolon, ";"),
            (TokenType::Eof, ""),
        ];

        let mut lexer = Lexer::new(input);

        for (token_type, literal) in cases.iter() {
            let token = lexer.next_token();
            assert_eq!(token.token_type, *token_type, "literal {:?}", token.literal);
            assert_eq!(token.literal, *literal);
        }
    }

    #[test]
    fn test_line_and_column() {
        let input = "one = 1;\ntwo = 2;".to_owned();
        let mut lexer = Lexer::new(input);

        let one = lexer.next_token();
        assert_eq!((one.line, one.column), (1, 1));

        lexer.next_token(); // =
        let value = lexer.next_token();
        assert_eq!((value.line, value.column), (1, 7));

        lexer.next_token(); // ;
        let two = lexer.next_token();
        assert_eq!((two.line, two.column), (2, 1));
    }

    #[test]
    fn test_float_requires_digit_after_dot() {
        let mut lexer = Lexer::new("1.plz_s()".to_owned());

        assert_eq!(lexer.next_token().token_type, TokenType::Int);
        assert_eq!(lexer.next_token().token_type, TokenType::Dot);
        assert_eq!(lexer.next_token().literal, "plz_s");
    }
}
