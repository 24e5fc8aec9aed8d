use crate::ast::{BinaryOperator, Condition, Expression, ProcedureDeclaration, Program, RelationalOperator, Statement};
use crate::errors::{PasError, PasResult};
use crate::frontend::lexer::Lexer;
use crate::frontend::token::Token;

/// Recursive-descent parser with one token of lookahead pulled lazily from
/// the lexer. It never backtracks.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
    line_number: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> PasResult<Self> {
        let mut parser = Self {
            lexer: Lexer::new(source),
            current_token: Token::Eof,
            line_number: 1,
        };
        parser.next()?;
        Ok(parser)
    }

    fn next(&mut self) -> PasResult<()> {
        let (token, line) = self.lexer.next_token()?;
        self.current_token = token;
        self.line_number = line;
        Ok(())
    }

    fn syntax_error(&self, expected: impl Into<String>) -> PasError {
        PasError::syntax_error(expected, self.current_token.to_string(), self.line_number)
    }

    fn expect(&mut self, expected: Token) -> PasResult<()> {
        if self.current_token != expected {
            return Err(self.syntax_error(expected.to_string()));
        }
        self.next()
    }

    fn expect_ident(&mut self) -> PasResult<String> {
        match &self.current_token {
            Token::Ident(id) => {
                let id = id.clone();
                self.next()?;
                Ok(id)
            }
            _ => Err(self.syntax_error("identifier")),
        }
    }

    // ident { "," ident }
    fn parse_identifier_list(&mut self) -> PasResult<Vec<String>> {
        let mut idents = vec![self.expect_ident()?];
        while self.current_token == Token::Comma {
            self.expect(Token::Comma)?;
            idents.push(self.expect_ident()?);
        }
        Ok(idents)
    }

    // { "VAR" ident { "," ident } ";" }
    fn parse_var_declarations(&mut self) -> PasResult<Vec<String>> {
        let mut idents = Vec::new();
        while self.current_token == Token::Var {
            self.expect(Token::Var)?;
            idents.extend(self.parse_identifier_list()?);
            self.expect(Token::Semicolon)?;
        }
        Ok(idents)
    }

    /**
     * procedure = "PROCEDURE" ident "(" [ ident { "," ident } ] ")" ";"
     *             { "VAR" ident { "," ident } ";" } statement
     */
    fn parse_procedure(&mut self) -> PasResult<ProcedureDeclaration> {
        self.expect(Token::Procedure)?;
        let name = self.expect_ident()?;
        self.expect(Token::LParen)?;
        let params = if self.current_token == Token::RParen {
            Vec::new()
        } else {
            self.parse_identifier_list()?
        };
        self.expect(Token::RParen)?;
        self.expect(Token::Semicolon)?;
        let locals = self.parse_var_declarations()?;
        let body = self.parse_statement()?;
        Ok(ProcedureDeclaration::new(name, params, locals, body))
    }

    /**
     * statement = "WRITELN" "(" expression ")" ";"
     *           | "READLN" "(" ident ")" ";"
     *           | "BEGIN" { statement } "END" ";"
     *           | "IF" condition "THEN" statement [ "ELSE" statement ]
     *           | "WHILE" condition "DO" statement
     *           | ident ":=" expression ";"
     */
    pub fn parse_statement(&mut self) -> PasResult<Statement> {
        match &self.current_token {
            Token::Writeln => {
                self.expect(Token::Writeln)?;
                self.expect(Token::LParen)?;
                let value = self.parse_expression()?;
                self.expect(Token::RParen)?;
                self.expect(Token::Semicolon)?;
                Ok(Statement::Writeln(value))
            }
            Token::Readln => {
                self.expect(Token::Readln)?;
                self.expect(Token::LParen)?;
                let name = self.expect_ident()?;
                self.expect(Token::RParen)?;
                self.expect(Token::Semicolon)?;
                Ok(Statement::Readln(name))
            }
            Token::Begin => {
                self.expect(Token::Begin)?;
                let mut statements = Vec::new();
                while self.current_token != Token::End {
                    statements.push(self.parse_statement()?);
                }
                self.expect(Token::End)?;
                self.expect(Token::Semicolon)?;
                Ok(Statement::Block(statements))
            }
            Token::If => {
                self.expect(Token::If)?;
                let condition = self.parse_condition()?;
                self.expect(Token::Then)?;
                let then_branch = self.parse_statement()?;
                let else_branch = if self.current_token == Token::Else {
                    self.expect(Token::Else)?;
                    Some(self.parse_statement()?)
                } else {
                    None
                };
                Ok(Statement::if_then(condition, then_branch, else_branch))
            }
            Token::While => {
                self.expect(Token::While)?;
                let condition = self.parse_condition()?;
                self.expect(Token::Do)?;
                let body = self.parse_statement()?;
                Ok(Statement::while_do(condition, body))
            }
            Token::Ident(_) => {
                let name = self.expect_ident()?;
                self.expect(Token::Assign)?;
                let value = self.parse_expression()?;
                self.expect(Token::Semicolon)?;
                Ok(Statement::assignment(name, value))
            }
            _ => Err(self.syntax_error("statement")),
        }
    }

    // condition = expression relop expression
    fn parse_condition(&mut self) -> PasResult<Condition> {
        let left = self.parse_expression()?;
        let operator = match self.current_token {
            Token::Equal => RelationalOperator::Equal,
            Token::NotEqual => RelationalOperator::NotEqual,
            Token::LessThan => RelationalOperator::Less,
            Token::GreaterThan => RelationalOperator::Greater,
            Token::LessThanEqual => RelationalOperator::LessEqual,
            Token::GreaterThanEqual => RelationalOperator::GreaterEqual,
            _ => return Err(self.syntax_error("relational operator")),
        };
        self.next()?;
        let right = self.parse_expression()?;
        Ok(Condition::new(operator, left, right))
    }

    // expression = term { ( "+" | "-" ) term }
    pub fn parse_expression(&mut self) -> PasResult<Expression> {
        let mut lhs = self.parse_term()?;
        loop {
            let operator = match self.current_token {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.next()?;
            let rhs = self.parse_term()?;
            lhs = Expression::binary(operator, lhs, rhs);
        }
        Ok(lhs)
    }

    // term = factor { ( "*" | "/" | "mod" ) factor }
    fn parse_term(&mut self) -> PasResult<Expression> {
        let mut lhs = self.parse_factor()?;
        loop {
            let operator = match self.current_token {
                Token::Multiply => BinaryOperator::Multiply,
                Token::Divide => BinaryOperator::Divide,
                Token::Mod => BinaryOperator::Modulo,
                _ => break,
            };
            self.next()?;
            let rhs = self.parse_factor()?;
            lhs = Expression::binary(operator, lhs, rhs);
        }
        Ok(lhs)
    }

    /**
     * factor = "(" expression ")" | "-" factor | number
     *        | ident [ "(" [ expression { "," expression } ] ")" ]
     *
     * An identifier followed by "(" is always a call, so calls with no
     * arguments still need the parentheses.
     */
    fn parse_factor(&mut self) -> PasResult<Expression> {
        match &self.current_token {
            Token::LParen => {
                self.expect(Token::LParen)?;
                let expr = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Token::Minus => {
                self.expect(Token::Minus)?;
                let operand = self.parse_factor()?;
                Ok(Expression::negation(operand))
            }
            Token::Number(n) => {
                let n = *n;
                self.next()?;
                Ok(Expression::Number(n))
            }
            Token::Ident(_) => {
                let name = self.expect_ident()?;
                if self.current_token != Token::LParen {
                    return Ok(Expression::Variable(name));
                }
                self.expect(Token::LParen)?;
                let mut args = Vec::new();
                if self.current_token != Token::RParen {
                    args.push(self.parse_expression()?);
                    while self.current_token == Token::Comma {
                        self.expect(Token::Comma)?;
                        args.push(self.parse_expression()?);
                    }
                }
                self.expect(Token::RParen)?;
                Ok(Expression::call(name, args))
            }
            _ => Err(self.syntax_error("factor")),
        }
    }

    /**
     * program = [ "VAR" ident { "," ident } ";" ] { procedure } statement "."
     */
    pub fn parse_program(&mut self) -> PasResult<Program> {
        let variables = self.parse_var_declarations()?;
        let mut procedures = Vec::new();
        while self.current_token == Token::Procedure {
            procedures.push(self.parse_procedure()?);
        }
        let body = self.parse_statement()?;
        self.expect(Token::Eof)?;
        Ok(Program::new(variables, procedures, body))
    }
}

// Convenience function: lex and parse a whole program
pub fn parse(source: &str) -> PasResult<Program> {
    Parser::new(source)?.parse_program()
}
