// MIPS target constants
pub mod mips {
    // One stack slot / data word, in bytes
    pub const WORD_SIZE: usize = 4;

    // Register roles
    pub const ACCUMULATOR: &str = "$v0";
    pub const SCRATCH: &str = "$t0";
    pub const ARGUMENT: &str = "$a0";
    pub const STACK_POINTER: &str = "$sp";
    pub const RETURN_ADDRESS: &str = "$ra";

    // SPIM/MARS system call numbers, loaded into $v0
    pub const SYSCALL_PRINT_INT: i32 = 1;
    pub const SYSCALL_PRINT_STRING: i32 = 4;
    pub const SYSCALL_READ_INT: i32 = 5;
    pub const SYSCALL_EXIT: i32 = 10;
}

/// Naming conventions for everything the generator puts in the symbol space
/// of the assembler.
pub mod labels {
    pub const ENTRY_POINT: &str = "main";
    pub const NEWLINE: &str = "newLine";
    pub const GLOBAL_PREFIX: &str = "var";
    pub const PROCEDURE_PREFIX: &str = "proc";
    pub const ELSE_PREFIX: &str = "else";
    pub const ENDIF_PREFIX: &str = "endif";
    pub const LOOP_PREFIX: &str = "loop";
    pub const ENDLOOP_PREFIX: &str = "endloop";
    pub const FALSE_PREFIX: &str = "false";
    pub const DONE_PREFIX: &str = "done";

    pub fn global(name: &str) -> String {
        format!("{}{}", GLOBAL_PREFIX, name)
    }

    pub fn procedure(name: &str) -> String {
        format!("{}{}", PROCEDURE_PREFIX, name)
    }
}

// Source language surface
pub mod source {
    pub const FILE_EXTENSION: &str = "pas";
    pub const ASM_EXTENSION: &str = "asm";
}
