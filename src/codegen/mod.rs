pub mod code_emitter;
pub mod expression_handlers;
pub mod frame;
pub mod procedure_handlers;
pub mod statement_handlers;

pub use code_emitter::{CodeEmitter, StringCodeEmitter};
pub use frame::StackFrame;

use crate::{
    ast::{ProcedureDeclaration, Program},
    config::{labels, mips},
    errors::{PasError, PasResult},
    VERSION,
};
use regex::Regex;
use std::collections::HashMap;

/// One-pass MIPS generator. Besides the text it carries the label counter,
/// the frame of the procedure being emitted (none while emitting the main
/// statement) and, through that frame, the number of temporaries pushed
/// since the procedure's emission began.
pub struct CodeGenerator<'ast> {
    pub(crate) label_counter: usize,
    pub(crate) data: String,
    pub(crate) code: String,
    pub(crate) frame: Option<StackFrame<'ast>>,
    pub(crate) procedures: HashMap<&'ast str, &'ast ProcedureDeclaration>,
}

impl<'ast> Default for CodeGenerator<'ast> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'ast> CodeGenerator<'ast> {
    pub fn new() -> Self {
        Self {
            label_counter: 0,
            data: String::with_capacity(256),
            code: String::with_capacity(4096),
            frame: None,
            procedures: HashMap::new(),
        }
    }

    pub(crate) fn emitter(&mut self) -> StringCodeEmitter<'_> {
        StringCodeEmitter::new(&mut self.code)
    }

    /// Returns a fresh label number; never reused within one generator.
    pub fn next_label_id(&mut self) -> usize {
        self.label_counter += 1;
        self.label_counter
    }

    /// Makes `procedure` the layout used for offset computation and starts
    /// its temporary count at zero.
    pub fn set_procedure_context(&mut self, procedure: &'ast ProcedureDeclaration) {
        self.frame = Some(StackFrame::new(procedure));
    }

    pub fn clear_procedure_context(&mut self) -> Option<StackFrame<'ast>> {
        self.frame.take()
    }

    pub fn excess_height(&self) -> usize {
        self.frame.as_ref().map_or(0, StackFrame::excess_height)
    }

    /// Stack offset of `name` when it lives in the active frame.
    pub fn local_offset(&self, name: &str) -> Option<usize> {
        self.frame.as_ref().and_then(|frame| frame.offset_of(name))
    }

    pub fn emit_push(&mut self, reg: &str) -> PasResult<()> {
        if let Some(frame) = self.frame.as_mut() {
            frame.push();
        }
        let word = mips::WORD_SIZE as i32;
        let mut emitter = self.emitter();
        emitter.emit_addiu(mips::STACK_POINTER, mips::STACK_POINTER, -word)?;
        emitter.emit_sw(reg, 0, mips::STACK_POINTER)
    }

    pub fn emit_pop(&mut self, reg: &str) -> PasResult<()> {
        if let Some(frame) = self.frame.as_mut() {
            frame.pop()?;
        }
        let word = mips::WORD_SIZE as i32;
        let mut emitter = self.emitter();
        emitter.emit_lw(reg, 0, mips::STACK_POINTER)?;
        emitter.emit_addiu(mips::STACK_POINTER, mips::STACK_POINTER, word)
    }

    /// Loads `name` into the accumulator from its frame slot or global word.
    pub fn emit_load_variable(&mut self, name: &str) -> PasResult<()> {
        let offset = self.local_offset(name);
        let mut emitter = self.emitter();
        match offset {
            Some(offset) => emitter.emit_lw(mips::ACCUMULATOR, offset, mips::STACK_POINTER),
            None => {
                emitter.emit_la(mips::SCRATCH, &labels::global(name))?;
                emitter.emit_lw(mips::ACCUMULATOR, 0, mips::SCRATCH)
            }
        }
    }

    /// Stores the accumulator into `name`'s frame slot or global word.
    pub fn emit_store_variable(&mut self, name: &str) -> PasResult<()> {
        let offset = self.local_offset(name);
        let mut emitter = self.emitter();
        match offset {
            Some(offset) => emitter.emit_sw(mips::ACCUMULATOR, offset, mips::STACK_POINTER),
            None => {
                emitter.emit_la(mips::SCRATCH, &labels::global(name))?;
                emitter.emit_sw(mips::ACCUMULATOR, 0, mips::SCRATCH)
            }
        }
    }

    pub(crate) fn emit_newline(&mut self) -> PasResult<()> {
        let mut emitter = self.emitter();
        emitter.emit_la(mips::ARGUMENT, labels::NEWLINE)?;
        emitter.emit_li(mips::ACCUMULATOR, mips::SYSCALL_PRINT_STRING)?;
        emitter.emit_syscall()
    }

    pub(crate) fn lookup_procedure(&self, name: &str) -> PasResult<&'ast ProcedureDeclaration> {
        self.procedures
            .get(name)
            .copied()
            .ok_or_else(|| PasError::UndefinedProcedure { name: name.to_string() })
    }

    /// Data section, entry label, main statement, exit, then every procedure.
    pub fn generate(&mut self, program: &'ast Program) -> PasResult<()> {
        for procedure in &program.procedures {
            if self.procedures.insert(procedure.name.as_str(), procedure).is_some() {
                return Err(PasError::codegen_error(format!(
                    "procedure '{}' is declared more than once",
                    procedure.name
                )));
            }
        }

        self.emit_data_section(program)?;

        let mut emitter = self.emitter();
        emitter.emit_directive(".text")?;
        emitter.emit_directive(&format!(".globl {}", labels::ENTRY_POINT))?;
        emitter.emit_label(labels::ENTRY_POINT)?;

        self.compile_statement(&program.body)?;

        let mut emitter = self.emitter();
        emitter.emit_li(mips::ACCUMULATOR, mips::SYSCALL_EXIT)?;
        emitter.emit_syscall()?;

        for procedure in &program.procedures {
            self.compile_procedure(procedure)?;
        }
        Ok(())
    }

    fn emit_data_section(&mut self, program: &'ast Program) -> PasResult<()> {
        let mut emitter = StringCodeEmitter::new(&mut self.data);
        emitter.emit_comment(&format!("MIPS code generated by mipas {}", VERSION))?;
        emitter.emit_directive(".data")?;
        emitter.emit_asciiz(labels::NEWLINE, "\\n")?;
        for name in program.global_names() {
            emitter.emit_word(&labels::global(name), 0)?;
        }
        Ok(())
    }

    pub fn get_output(&self) -> String {
        let mut output = String::with_capacity(self.data.len() + self.code.len());
        output.push_str(&self.data);
        output.push_str(&self.code);
        output
    }
}

/// Compiles a whole program to MIPS assembly text.
pub fn compile(program: &Program) -> PasResult<String> {
    let mut generator = CodeGenerator::new();
    generator.generate(program)?;
    Ok(generator.get_output())
}

/// Counts instructions in generated assembly, leaving out labels, directives
/// and comments.
pub fn instruction_count(asm: &str) -> PasResult<usize> {
    let instruction = Regex::new(r"(?m)^[ \t]+[a-z]+\b").map_err(|e| PasError::codegen_error(e.to_string()))?;
    Ok(instruction.find_iter(asm).count())
}
