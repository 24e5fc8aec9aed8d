use super::{CodeEmitter, CodeGenerator};
use crate::{
    ast::Statement,
    config::{labels, mips},
    errors::PasResult,
};

impl<'ast> CodeGenerator<'ast> {
    pub fn compile_statement(&mut self, statement: &'ast Statement) -> PasResult<()> {
        match statement {
            Statement::Assignment { name, value } => {
                self.compile_expression(value)?;
                self.emit_store_variable(name)
            }
            Statement::Block(statements) => {
                for statement in statements {
                    self.compile_statement(statement)?;
                }
                Ok(())
            }
            Statement::If { condition, then_branch, else_branch } => {
                let id = self.next_label_id();
                let else_label = format!("{}{}", labels::ELSE_PREFIX, id);
                let endif_label = format!("{}{}", labels::ENDIF_PREFIX, id);
                self.compile_condition(condition, &else_label)?;
                self.compile_statement(then_branch)?;
                let mut emitter = self.emitter();
                emitter.emit_jump(&endif_label)?;
                emitter.emit_label(&else_label)?;
                if let Some(else_branch) = else_branch {
                    self.compile_statement(else_branch)?;
                }
                self.emitter().emit_label(&endif_label)
            }
            Statement::While { condition, body } => {
                let id = self.next_label_id();
                let loop_label = format!("{}{}", labels::LOOP_PREFIX, id);
                let end_label = format!("{}{}", labels::ENDLOOP_PREFIX, id);
                self.emitter().emit_label(&loop_label)?;
                self.compile_condition(condition, &end_label)?;
                self.compile_statement(body)?;
                let mut emitter = self.emitter();
                emitter.emit_jump(&loop_label)?;
                emitter.emit_label(&end_label)
            }
            Statement::Readln(name) => {
                let mut emitter = self.emitter();
                emitter.emit_li(mips::ACCUMULATOR, mips::SYSCALL_READ_INT)?;
                emitter.emit_syscall()?;
                self.emit_store_variable(name)
            }
            Statement::Writeln(value) => {
                self.compile_expression(value)?;
                let mut emitter = self.emitter();
                emitter.emit_move(mips::ARGUMENT, mips::ACCUMULATOR)?;
                emitter.emit_li(mips::ACCUMULATOR, mips::SYSCALL_PRINT_INT)?;
                emitter.emit_syscall()?;
                self.emit_newline()
            }
        }
    }
}
