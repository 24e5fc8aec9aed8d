use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    Number(i32),
    Var,
    Procedure,
    Begin,
    End,
    If,
    Then,
    Else,
    While,
    Do,
    Writeln,
    Readln,
    Mod,
    Assign,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
    Plus,
    Minus,
    Multiply,
    Divide,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Ident(id) => return write!(f, "{}", id),
            Token::Number(n) => return write!(f, "{}", n),
            Token::Var => "VAR",
            Token::Procedure => "PROCEDURE",
            Token::Begin => "BEGIN",
            Token::End => "END",
            Token::If => "IF",
            Token::Then => "THEN",
            Token::Else => "ELSE",
            Token::While => "WHILE",
            Token::Do => "DO",
            Token::Writeln => "WRITELN",
            Token::Readln => "READLN",
            Token::Mod => "mod",
            Token::Assign => ":=",
            Token::Equal => "=",
            Token::NotEqual => "<>",
            Token::LessThan => "<",
            Token::GreaterThan => ">",
            Token::LessThanEqual => "<=",
            Token::GreaterThanEqual => ">=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Multiply => "*",
            Token::Divide => "/",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Semicolon => ";",
            Token::Eof => "EOF",
        };
        f.write_str(text)
    }
}
