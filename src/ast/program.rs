use crate::ast::{Expression, Statement};
use std::fmt;

/// A procedure owns its name, which doubles as its return slot, its
/// parameters, its locals and a single body statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDeclaration {
    pub name: String,
    pub params: Vec<String>,
    pub locals: Vec<String>,
    pub body: Statement,
}

impl ProcedureDeclaration {
    pub fn new(name: impl Into<String>, params: Vec<String>, locals: Vec<String>, body: Statement) -> Self {
        Self {
            name: name.into(),
            params,
            locals,
            body,
        }
    }

    /// True for the return slot, a parameter or a declared local.
    pub fn owns(&self, name: &str) -> bool {
        self.name == name || self.params.iter().any(|p| p == name) || self.locals.iter().any(|l| l == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub variables: Vec<String>,
    pub procedures: Vec<ProcedureDeclaration>,
    pub body: Statement,
}

impl Program {
    pub fn new(variables: Vec<String>, procedures: Vec<ProcedureDeclaration>, body: Statement) -> Self {
        Self {
            variables,
            procedures,
            body,
        }
    }

    /// Every name that lives in the global scope: the declared globals in
    /// declaration order, then any name the main statement or a procedure
    /// body touches outside a procedure frame without declaring it.
    pub fn global_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in &self.variables {
            push_unique(&mut names, name);
        }

        let mut touched: Vec<(&str, Option<&ProcedureDeclaration>)> = Vec::new();
        collect_touched(&self.body, None, &mut touched);
        for procedure in &self.procedures {
            collect_touched(&procedure.body, Some(procedure), &mut touched);
        }
        for (name, owner) in touched {
            if owner.map_or(true, |p| !p.owns(name)) {
                push_unique(&mut names, name);
            }
        }
        names
    }
}

fn push_unique<'a>(names: &mut Vec<&'a str>, name: &'a str) {
    if !names.contains(&name) {
        names.push(name);
    }
}

fn collect_touched<'a>(
    body: &'a Statement,
    owner: Option<&'a ProcedureDeclaration>,
    touched: &mut Vec<(&'a str, Option<&'a ProcedureDeclaration>)>,
) {
    let mut written = Vec::new();
    body.assigned_names(&mut written);
    touched.extend(written.into_iter().map(|name| (name, owner)));
    body.walk_expressions(&mut |expression| {
        if let Expression::Variable(name) = expression {
            touched.push((name.as_str(), owner));
        }
    });
}

impl fmt::Display for ProcedureDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PROCEDURE {}({});", self.name, self.params.join(", "))?;
        if !self.locals.is_empty() {
            writeln!(f, "VAR {};", self.locals.join(", "))?;
        }
        self.body.fmt_indented(f, 0)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.variables.is_empty() {
            writeln!(f, "VAR {};", self.variables.join(", "))?;
        }
        for procedure in &self.procedures {
            write!(f, "{}", procedure)?;
        }
        self.body.fmt_indented(f, 0)?;
        write!(f, ".")
    }
}
