use crate::ast::{Condition, Expression};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment {
        name: String,
        value: Expression,
    },
    Block(Vec<Statement>),
    If {
        condition: Condition,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    While {
        condition: Condition,
        body: Box<Statement>,
    },
    Readln(String),
    Writeln(Expression),
}

impl Statement {
    pub fn assignment(name: impl Into<String>, value: Expression) -> Self {
        Statement::Assignment { name: name.into(), value }
    }

    pub fn if_then(condition: Condition, then_branch: Statement, else_branch: Option<Statement>) -> Self {
        Statement::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        }
    }

    pub fn while_do(condition: Condition, body: Statement) -> Self {
        Statement::While {
            condition,
            body: Box::new(body),
        }
    }

    /// Calls `visit` on every expression reachable from this statement,
    /// outermost first.
    pub fn walk_expressions<'a>(&'a self, visit: &mut dyn FnMut(&'a Expression)) {
        match self {
            Statement::Assignment { value, .. } => walk_expression(value, visit),
            Statement::Block(statements) => {
                for statement in statements {
                    statement.walk_expressions(visit);
                }
            }
            Statement::If { condition, then_branch, else_branch } => {
                walk_expression(&condition.left, visit);
                walk_expression(&condition.right, visit);
                then_branch.walk_expressions(visit);
                if let Some(else_branch) = else_branch {
                    else_branch.walk_expressions(visit);
                }
            }
            Statement::While { condition, body } => {
                walk_expression(&condition.left, visit);
                walk_expression(&condition.right, visit);
                body.walk_expressions(visit);
            }
            Statement::Readln(_) => {}
            Statement::Writeln(value) => walk_expression(value, visit),
        }
    }

    /// Names written by assignments and reads, in source order.
    pub fn assigned_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Statement::Assignment { name, .. } | Statement::Readln(name) => names.push(name),
            Statement::Block(statements) => {
                for statement in statements {
                    statement.assigned_names(names);
                }
            }
            Statement::If { then_branch, else_branch, .. } => {
                then_branch.assigned_names(names);
                if let Some(else_branch) = else_branch {
                    else_branch.assigned_names(names);
                }
            }
            Statement::While { body, .. } => body.assigned_names(names),
            Statement::Writeln(_) => {}
        }
    }

    pub(crate) fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Statement::Assignment { name, value } => writeln!(f, "{}{} := {};", pad, name, value),
            Statement::Block(statements) => {
                writeln!(f, "{}BEGIN", pad)?;
                for statement in statements {
                    statement.fmt_indented(f, depth + 1)?;
                }
                writeln!(f, "{}END;", pad)
            }
            Statement::If { condition, then_branch, else_branch } => {
                writeln!(f, "{}IF {} THEN", pad, condition)?;
                then_branch.fmt_indented(f, depth + 1)?;
                if let Some(else_branch) = else_branch {
                    writeln!(f, "{}ELSE", pad)?;
                    else_branch.fmt_indented(f, depth + 1)?;
                }
                Ok(())
            }
            Statement::While { condition, body } => {
                writeln!(f, "{}WHILE {} DO", pad, condition)?;
                body.fmt_indented(f, depth + 1)
            }
            Statement::Readln(name) => writeln!(f, "{}READLN({});", pad, name),
            Statement::Writeln(value) => writeln!(f, "{}WRITELN({});", pad, value),
        }
    }
}

fn walk_expression<'a>(expression: &'a Expression, visit: &mut dyn FnMut(&'a Expression)) {
    visit(expression);
    match expression {
        Expression::Number(_) | Expression::Variable(_) => {}
        Expression::Binary { left, right, .. } => {
            walk_expression(left, visit);
            walk_expression(right, visit);
        }
        Expression::Relational(condition) => {
            walk_expression(&condition.left, visit);
            walk_expression(&condition.right, visit);
        }
        Expression::Call { args, .. } => {
            for arg in args {
                walk_expression(arg, visit);
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
