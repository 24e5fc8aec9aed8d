use crate::errors::{PasError, PasResult};
use crate::frontend::token::Token;
use crate::LineNumber;
use std::{iter::Peekable, str::Chars};

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    state: LineNumber,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(file_content: &'a str) -> Self {
        Self {
            chars: file_content.chars().peekable(),
            state: LineNumber::default(),
            finished: false,
        }
    }

    /// Returns the next token together with the line it starts on. Once the
    /// terminating `.` or the end of the text is reached every further call
    /// yields `Token::Eof`.
    pub fn next_token(&mut self) -> PasResult<(Token, usize)> {
        if self.finished {
            return Ok((Token::Eof, self.state.line));
        }
        self.skip_whitespace_and_comments()?;
        let line = self.state.line;
        let token = match self.chars.peek().copied() {
            None | Some('.') => Token::Eof,
            Some(ch) if ch.is_ascii_alphabetic() => self.scan_identifier(),
            Some(ch) if ch.is_ascii_digit() => self.scan_number()?,
            Some(':') => self.scan_assignment()?,
            Some('<') => self.scan_less_than(),
            Some('>') => self.scan_greater_than(),
            Some(ch) => self.scan_single_char_token(ch)?,
        };
        if token == Token::Eof {
            self.finished = true;
        }
        Ok((token, line))
    }

    /// Scans the whole input, stopping before `Token::Eof`.
    pub fn scan(mut self) -> PasResult<Vec<(Token, usize)>> {
        let mut tokens = Vec::new();
        loop {
            let (token, line) = self.next_token()?;
            if token == Token::Eof {
                break;
            }
            tokens.push((token, line));
        }
        Ok(tokens)
    }

    fn skip_whitespace_and_comments(&mut self) -> PasResult<()> {
        loop {
            match self.chars.peek().copied() {
                Some(ch) if ch.is_whitespace() => self.scan_whitespace(),
                Some('/') if self.lookahead_is('/') => self.scan_line_comment(),
                Some('(') if self.lookahead_is('*') => self.scan_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    // Peeks one character past the current one without consuming anything.
    fn lookahead_is(&self, expected: char) -> bool {
        let mut rest = self.chars.clone();
        rest.next();
        rest.next() == Some(expected)
    }

    fn scan_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if !ch.is_whitespace() {
                break;
            }
            if ch == '\n' {
                self.state.line += 1;
            }
            self.chars.next();
        }
    }

    fn scan_line_comment(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch == '\n' {
                break;
            }
            self.chars.next();
        }
    }

    fn scan_block_comment(&mut self) -> PasResult<()> {
        let start_line = self.state.line;
        self.chars.next(); // Consume '('
        self.chars.next(); // Consume '*'
        while let Some(ch) = self.chars.next() {
            match ch {
                '\n' => self.state.line += 1,
                '*' if self.chars.peek() == Some(&')') => {
                    self.chars.next();
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(PasError::UnterminatedComment { line: start_line })
    }

    fn scan_identifier(&mut self) -> Token {
        let mut identifier = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_alphanumeric() {
                identifier.push(ch);
                self.chars.next();
            } else {
                break;
            }
        }
        keyword_or_identifier(identifier)
    }

    fn scan_number(&mut self) -> PasResult<Token> {
        let mut number_str = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                number_str.push(ch);
                self.chars.next();
            } else {
                break;
            }
        }
        number_str
            .parse::<i32>()
            .map(Token::Number)
            .map_err(|_| PasError::InvalidNumber { number: number_str, line: self.state.line })
    }

    fn scan_assignment(&mut self) -> PasResult<Token> {
        self.chars.next(); // Consume ':'
        match self.chars.peek() {
            Some(&'=') => {
                self.chars.next();
                Ok(Token::Assign)
            }
            _ => Err(PasError::lexer_error("Expected '=' after ':'", self.state.line)),
        }
    }

    fn scan_less_than(&mut self) -> Token {
        self.chars.next(); // Consume '<'
        match self.chars.peek() {
            Some(&'=') => {
                self.chars.next();
                Token::LessThanEqual
            }
            Some(&'>') => {
                self.chars.next();
                Token::NotEqual
            }
            _ => Token::LessThan,
        }
    }

    fn scan_greater_than(&mut self) -> Token {
        self.chars.next(); // Consume '>'
        if self.chars.peek() == Some(&'=') {
            self.chars.next();
            Token::GreaterThanEqual
        } else {
            Token::GreaterThan
        }
    }

    fn scan_single_char_token(&mut self, ch: char) -> PasResult<Token> {
        let token = match ch {
            '=' => Token::Equal,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Multiply,
            '/' => Token::Divide,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            _ => return Err(PasError::UnknownCharacter { ch, line: self.state.line }),
        };
        self.chars.next();
        Ok(token)
    }
}

fn keyword_or_identifier(identifier: String) -> Token {
    match identifier.as_str() {
        "VAR" => Token::Var,
        "PROCEDURE" => Token::Procedure,
        "BEGIN" => Token::Begin,
        "END" => Token::End,
        "IF" => Token::If,
        "THEN" => Token::Then,
        "ELSE" => Token::Else,
        "WHILE" => Token::While,
        "DO" => Token::Do,
        "WRITELN" => Token::Writeln,
        "READLN" => Token::Readln,
        "mod" => Token::Mod,
        _ => Token::Ident(identifier),
    }
}

// Convenience function mirroring the batch API used by the driver and tests
pub fn scan(file_content: &str) -> PasResult<Vec<(Token, usize)>> {
    Lexer::new(file_content).scan()
}
