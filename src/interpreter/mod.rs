// Tree-walking interpretation of the AST.

pub mod environment;

pub use environment::{Environment, Scope};

use crate::ast::{BinaryOperator, Condition, Expression, ProcedureDeclaration, Program, Statement};
use crate::errors::{PasError, PasResult};
use std::io::{BufRead, Write};

/// Executes a program against an input and an output stream. `READLN` pulls
/// one line per call from `input`, `WRITELN` writes one line to `output`.
pub struct Interpreter<'ast, R, W> {
    env: Environment<'ast>,
    input: R,
    output: W,
}

impl<'ast, R: BufRead, W: Write> Interpreter<'ast, R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            env: Environment::new(),
            input,
            output,
        }
    }

    pub fn environment(&self) -> &Environment<'ast> {
        &self.env
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Declares the globals as 0, registers every procedure, then runs the
    /// main statement.
    pub fn run(&mut self, program: &'ast Program) -> PasResult<()> {
        for name in &program.variables {
            self.env.declare(name, 0);
        }
        for procedure in &program.procedures {
            self.declare_procedure(procedure);
        }
        self.execute(&program.body)?;
        self.output.flush()?;
        Ok(())
    }

    /// Executing a declaration only makes it callable.
    pub fn declare_procedure(&mut self, procedure: &'ast ProcedureDeclaration) {
        self.env.register_procedure(procedure);
    }

    pub fn execute(&mut self, statement: &'ast Statement) -> PasResult<()> {
        match statement {
            Statement::Assignment { name, value } => {
                let value = self.evaluate(value)?;
                self.env.set(name, value);
            }
            Statement::Block(statements) => {
                for statement in statements {
                    self.execute(statement)?;
                }
            }
            Statement::If { condition, then_branch, else_branch } => {
                if self.evaluate_condition(condition)? == 1 {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }
            }
            Statement::While { condition, body } => {
                while self.evaluate_condition(condition)? == 1 {
                    self.execute(body)?;
                }
            }
            Statement::Readln(name) => {
                let value = self.read_integer()?;
                // Always the current scope, unlike assignment.
                self.env.declare(name, value);
            }
            Statement::Writeln(value) => {
                let value = self.evaluate(value)?;
                writeln!(self.output, "{}", value)?;
            }
        }
        Ok(())
    }

    pub fn evaluate(&mut self, expression: &'ast Expression) -> PasResult<i32> {
        match expression {
            Expression::Number(n) => Ok(*n),
            Expression::Variable(name) => Ok(self.env.get(name)),
            Expression::Binary { operator, left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                apply(*operator, left, right)
            }
            Expression::Relational(condition) => self.evaluate_condition(condition),
            Expression::Call { name, args } => self.call(name, args),
        }
    }

    /// Always 0 or 1.
    pub fn evaluate_condition(&mut self, condition: &'ast Condition) -> PasResult<i32> {
        let left = self.evaluate(&condition.left)?;
        let right = self.evaluate(&condition.right)?;
        Ok(i32::from(condition.operator.holds(left, right)))
    }

    fn call(&mut self, name: &str, args: &'ast [Expression]) -> PasResult<i32> {
        let procedure = self.env.lookup_procedure(name)?;
        if args.len() < procedure.params.len() {
            return Err(PasError::ArityError {
                name: name.to_string(),
                expected: procedure.params.len(),
                found: args.len(),
            });
        }

        // Arguments see the caller's scope only.
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.evaluate(arg)?);
        }

        let mut frame = Scope::new();
        frame.insert(procedure.name.clone(), 0);
        for (param, value) in procedure.params.iter().zip(values) {
            frame.insert(param.clone(), value);
        }
        for local in &procedure.locals {
            frame.insert(local.clone(), 0);
        }

        let caller = self.env.enter_call(frame);
        let result = self.execute(&procedure.body);
        let frame = self.env.leave_call(caller);
        result?;
        Ok(frame.get(&procedure.name).copied().unwrap_or(0))
    }

    fn read_integer(&mut self) -> PasResult<i32> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PasError::InputError("unexpected end of input".to_string()));
        }
        let text = line.trim();
        text.parse::<i32>()
            .map_err(|_| PasError::InputError(format!("'{}' is not an integer", text)))
    }
}

/// 32-bit two's-complement arithmetic; division and modulus truncate toward zero.
pub fn apply(operator: BinaryOperator, left: i32, right: i32) -> PasResult<i32> {
    match operator {
        BinaryOperator::Add => Ok(left.wrapping_add(right)),
        BinaryOperator::Subtract => Ok(left.wrapping_sub(right)),
        BinaryOperator::Multiply => Ok(left.wrapping_mul(right)),
        BinaryOperator::Divide if right == 0 => Err(PasError::division_by_zero("division")),
        BinaryOperator::Divide => Ok(left.wrapping_div(right)),
        BinaryOperator::Modulo if right == 0 => Err(PasError::division_by_zero("modulus")),
        BinaryOperator::Modulo => Ok(left.wrapping_rem(right)),
    }
}

/// Runs `program` with a fresh global scope.
pub fn interpret<R: BufRead, W: Write>(program: &Program, input: R, output: W) -> PasResult<()> {
    Interpreter::new(input, output).run(program)
}
