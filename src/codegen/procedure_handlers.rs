use super::{CodeEmitter, CodeGenerator};
use crate::{
    ast::ProcedureDeclaration,
    config::{labels, mips},
    errors::{PasError, PasResult},
};

impl<'ast> CodeGenerator<'ast> {
    /// Callee side of the calling convention: push one zeroed word per local,
    /// run the body against this procedure's frame, pop the locals and
    /// return through `$ra`.
    pub fn compile_procedure(&mut self, procedure: &'ast ProcedureDeclaration) -> PasResult<()> {
        self.emitter().emit_label(&labels::procedure(&procedure.name))?;
        for _ in &procedure.locals {
            self.emitter().emit_li(mips::ACCUMULATOR, 0)?;
            self.emit_push(mips::ACCUMULATOR)?;
        }

        self.set_procedure_context(procedure);
        self.compile_statement(&procedure.body)?;
        self.emit_shadowed_return(procedure)?;
        let frame = self.clear_procedure_context();
        if let Some(frame) = frame.filter(|frame| frame.excess_height() != 0) {
            return Err(PasError::codegen_error(format!(
                "{} temporaries left on the stack at the end of procedure '{}'",
                frame.excess_height(),
                procedure.name
            )));
        }

        for _ in &procedure.locals {
            self.emit_pop(mips::ACCUMULATOR)?;
        }
        self.emitter().emit_jr(mips::RETURN_ADDRESS)
    }

    // A local or parameter named like its procedure is the same variable as
    // the result, so its final value goes into the return slot.
    fn emit_shadowed_return(&mut self, procedure: &'ast ProcedureDeclaration) -> PasResult<()> {
        let name = procedure.name.as_str();
        let shadowed = procedure.locals.iter().chain(&procedure.params).any(|n| n == name);
        let slot = match self.frame.as_ref() {
            Some(frame) if shadowed => frame.return_slot_offset(),
            _ => return Ok(()),
        };
        self.emit_load_variable(name)?;
        self.emitter().emit_sw(mips::ACCUMULATOR, slot, mips::STACK_POINTER)
    }
}
