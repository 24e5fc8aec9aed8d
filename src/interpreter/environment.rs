use crate::ast::ProcedureDeclaration;
use crate::errors::{PasError, PasResult};
use std::collections::HashMap;

pub type Scope = HashMap<String, i32>;

/// Runtime scope for the tree-walking interpreter.
///
/// There are never more than two levels: the global scope, and the scope of
/// the procedure call currently executing. A call scope always sits directly
/// on top of the globals, never on top of its caller, so procedures cannot
/// see each other's locals.
#[derive(Debug, Default)]
pub struct Environment<'ast> {
    globals: Scope,
    frame: Option<Scope>,
    procedures: HashMap<&'ast str, &'ast ProcedureDeclaration>,
}

impl<'ast> Environment<'ast> {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_mut(&mut self) -> &mut Scope {
        match &mut self.frame {
            Some(frame) => frame,
            None => &mut self.globals,
        }
    }

    pub fn in_call(&self) -> bool {
        self.frame.is_some()
    }

    /// Binds `name` in the current scope, shadowing any global of that name.
    pub fn declare(&mut self, name: &str, value: i32) {
        self.current_mut().insert(name.to_string(), value);
    }

    /// Writes through to the nearest scope that already holds `name`,
    /// otherwise binds it in the current scope.
    pub fn set(&mut self, name: &str, value: i32) {
        if let Some(slot) = self.frame.as_mut().and_then(|frame| frame.get_mut(name)) {
            *slot = value;
        } else if let Some(slot) = self.globals.get_mut(name) {
            *slot = value;
        } else {
            self.declare(name, value);
        }
    }

    /// Reads from the nearest scope that holds `name`. A name found nowhere
    /// is materialised as 0 in the current scope.
    pub fn get(&mut self, name: &str) -> i32 {
        if let Some(value) = self.frame.as_ref().and_then(|frame| frame.get(name)) {
            return *value;
        }
        if let Some(value) = self.globals.get(name) {
            return *value;
        }
        self.declare(name, 0);
        0
    }

    /// Looks a name up without the auto-declaring side effect of `get`.
    pub fn lookup(&self, name: &str) -> Option<i32> {
        self.frame
            .as_ref()
            .and_then(|frame| frame.get(name))
            .or_else(|| self.globals.get(name))
            .copied()
    }

    pub fn global(&self, name: &str) -> Option<i32> {
        self.globals.get(name).copied()
    }

    /// Procedures are always registered globally, whichever scope is active.
    pub fn register_procedure(&mut self, procedure: &'ast ProcedureDeclaration) {
        self.procedures.insert(procedure.name.as_str(), procedure);
    }

    pub fn lookup_procedure(&self, name: &str) -> PasResult<&'ast ProcedureDeclaration> {
        self.procedures
            .get(name)
            .copied()
            .ok_or_else(|| PasError::UndefinedProcedure { name: name.to_string() })
    }

    /// Makes `frame` the active call scope and hands back the caller's, which
    /// must be given to `leave_call` once the callee's body has run.
    pub fn enter_call(&mut self, frame: Scope) -> Option<Scope> {
        self.frame.replace(frame)
    }

    /// Restores the caller's scope and returns the finished call scope.
    pub fn leave_call(&mut self, caller: Option<Scope>) -> Scope {
        std::mem::replace(&mut self.frame, caller).unwrap_or_default()
    }
}
