use crate::errors::{PasError, PasResult};
use std::fmt::Write;

pub trait CodeEmitter {
    // Generic emission
    fn emit(&mut self, instruction: &str) -> PasResult<()>;
    fn emit_label(&mut self, label: &str) -> PasResult<()>;
    fn emit_comment(&mut self, text: &str) -> PasResult<()>;
    fn emit_directive(&mut self, directive: &str) -> PasResult<()>;

    // Static data
    fn emit_word(&mut self, label: &str, value: i32) -> PasResult<()>;
    fn emit_asciiz(&mut self, label: &str, escaped: &str) -> PasResult<()>;

    // Loads, stores and moves
    fn emit_li(&mut self, dest: &str, value: i32) -> PasResult<()>;
    fn emit_la(&mut self, dest: &str, label: &str) -> PasResult<()>;
    fn emit_lw(&mut self, dest: &str, offset: usize, base: &str) -> PasResult<()>;
    fn emit_sw(&mut self, src: &str, offset: usize, base: &str) -> PasResult<()>;
    fn emit_move(&mut self, dest: &str, src: &str) -> PasResult<()>;

    // Arithmetic
    fn emit_addu(&mut self, dest: &str, src1: &str, src2: &str) -> PasResult<()>;
    fn emit_subu(&mut self, dest: &str, src1: &str, src2: &str) -> PasResult<()>;
    fn emit_addiu(&mut self, dest: &str, src: &str, value: i32) -> PasResult<()>;
    fn emit_mult(&mut self, src1: &str, src2: &str) -> PasResult<()>;
    fn emit_div(&mut self, src1: &str, src2: &str) -> PasResult<()>;
    fn emit_mflo(&mut self, dest: &str) -> PasResult<()>;
    fn emit_mfhi(&mut self, dest: &str) -> PasResult<()>;

    // Control flow
    fn emit_branch(&mut self, mnemonic: &str, src1: &str, src2: &str, label: &str) -> PasResult<()>;
    fn emit_jump(&mut self, label: &str) -> PasResult<()>;
    fn emit_jal(&mut self, label: &str) -> PasResult<()>;
    fn emit_jr(&mut self, src: &str) -> PasResult<()>;
    fn emit_syscall(&mut self) -> PasResult<()>;
}

/// Appends MIPS assembly text to a borrowed buffer. Labels start in column
/// zero, everything else is indented by one tab.
pub struct StringCodeEmitter<'a> {
    output: &'a mut String,
}

impl<'a> StringCodeEmitter<'a> {
    pub fn new(output: &'a mut String) -> Self {
        StringCodeEmitter { output }
    }
}

impl<'a> CodeEmitter for StringCodeEmitter<'a> {
    fn emit(&mut self, instruction: &str) -> PasResult<()> {
        self.output.push('\t');
        self.output.push_str(instruction);
        self.output.push('\n');
        Ok(())
    }

    fn emit_label(&mut self, label: &str) -> PasResult<()> {
        self.output.push_str(label);
        self.output.push_str(":\n");
        Ok(())
    }

    fn emit_comment(&mut self, text: &str) -> PasResult<()> {
        self.output.push_str("# ");
        self.output.push_str(text);
        self.output.push('\n');
        Ok(())
    }

    fn emit_directive(&mut self, directive: &str) -> PasResult<()> {
        self.emit(directive)
    }

    fn emit_word(&mut self, label: &str, value: i32) -> PasResult<()> {
        writeln!(self.output, "{}: .word {}", label, value).map_err(|e| PasError::codegen_error(e.to_string()))
    }

    fn emit_asciiz(&mut self, label: &str, escaped: &str) -> PasResult<()> {
        writeln!(self.output, "{}: .asciiz \"{}\"", label, escaped).map_err(|e| PasError::codegen_error(e.to_string()))
    }

    fn emit_li(&mut self, dest: &str, value: i32) -> PasResult<()> {
        self.emit(&format!("li {}, {}", dest, value))
    }

    fn emit_la(&mut self, dest: &str, label: &str) -> PasResult<()> {
        self.emit(&format!("la {}, {}", dest, label))
    }

    fn emit_lw(&mut self, dest: &str, offset: usize, base: &str) -> PasResult<()> {
        self.emit(&format!("lw {}, {}({})", dest, offset, base))
    }

    fn emit_sw(&mut self, src: &str, offset: usize, base: &str) -> PasResult<()> {
        self.emit(&format!("sw {}, {}({})", src, offset, base))
    }

    fn emit_move(&mut self, dest: &str, src: &str) -> PasResult<()> {
        self.emit(&format!("move {}, {}", dest, src))
    }

    fn emit_addu(&mut self, dest: &str, src1: &str, src2: &str) -> PasResult<()> {
        self.emit(&format!("addu {}, {}, {}", dest, src1, src2))
    }

    fn emit_subu(&mut self, dest: &str, src1: &str, src2: &str) -> PasResult<()> {
        self.emit(&format!("subu {}, {}, {}", dest, src1, src2))
    }

    fn emit_addiu(&mut self, dest: &str, src: &str, value: i32) -> PasResult<()> {
        self.emit(&format!("addiu {}, {}, {}", dest, src, value))
    }

    fn emit_mult(&mut self, src1: &str, src2: &str) -> PasResult<()> {
        self.emit(&format!("mult {}, {}", src1, src2))
    }

    fn emit_div(&mut self, src1: &str, src2: &str) -> PasResult<()> {
        self.emit(&format!("div {}, {}", src1, src2))
    }

    fn emit_mflo(&mut self, dest: &str) -> PasResult<()> {
        self.emit(&format!("mflo {}", dest))
    }

    fn emit_mfhi(&mut self, dest: &str) -> PasResult<()> {
        self.emit(&format!("mfhi {}", dest))
    }

    fn emit_branch(&mut self, mnemonic: &str, src1: &str, src2: &str, label: &str) -> PasResult<()> {
        self.emit(&format!("{} {}, {}, {}", mnemonic, src1, src2, label))
    }

    fn emit_jump(&mut self, label: &str) -> PasResult<()> {
        self.emit(&format!("j {}", label))
    }

    fn emit_jal(&mut self, label: &str) -> PasResult<()> {
        self.emit(&format!("jal {}", label))
    }

    fn emit_jr(&mut self, src: &str) -> PasResult<()> {
        self.emit(&format!("jr {}", src))
    }

    fn emit_syscall(&mut self) -> PasResult<()> {
        self.emit("syscall")
    }
}
