use crate::ast::ProcedureDeclaration;
use crate::config::mips::WORD_SIZE;
use crate::errors::{PasError, PasResult};

/// Layout of the frame belonging to the procedure being emitted.
///
/// From the stack pointer upwards a frame holds: temporaries pushed while
/// evaluating the current expression, the locals (last declared nearest the
/// top), the parameters (last declared nearest the top), the return slot and
/// finally the caller's return address.
#[derive(Debug, Clone)]
pub struct StackFrame<'ast> {
    procedure: &'ast ProcedureDeclaration,
    excess_words: usize,
}

impl<'ast> StackFrame<'ast> {
    pub fn new(procedure: &'ast ProcedureDeclaration) -> Self {
        Self {
            procedure,
            excess_words: 0,
        }
    }

    /// Words pushed for temporaries and not yet popped.
    pub fn excess_height(&self) -> usize {
        self.excess_words
    }

    pub fn push(&mut self) {
        self.excess_words += 1;
    }

    pub fn pop(&mut self) -> PasResult<()> {
        self.excess_words = self.excess_words.checked_sub(1).ok_or_else(|| {
            PasError::codegen_error(format!(
                "stack underflow while emitting procedure '{}'",
                self.procedure.name
            ))
        })?;
        Ok(())
    }

    /// Byte offset of the return slot, which no local or parameter can shadow.
    pub fn return_slot_offset(&self) -> usize {
        (self.excess_words + self.procedure.locals.len() + self.procedure.params.len()) * WORD_SIZE
    }

    /// Byte offset of `name` from the current stack pointer, or `None` when
    /// the name is not part of this frame. Locals shadow parameters, which
    /// shadow the return slot.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        let locals = &self.procedure.locals;
        let params = &self.procedure.params;
        let mut words = self.excess_words;

        if let Some(i) = locals.iter().rposition(|local| local == name) {
            return Some((words + locals.len() - i - 1) * WORD_SIZE);
        }
        words += locals.len();

        if let Some(i) = params.iter().rposition(|param| param == name) {
            return Some((words + params.len() - i - 1) * WORD_SIZE);
        }
        words += params.len();

        if self.procedure.name == name {
            return Some(words * WORD_SIZE);
        }
        None
    }
}
