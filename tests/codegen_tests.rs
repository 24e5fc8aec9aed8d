use mipas::ast::{ProcedureDeclaration, Statement};
use mipas::codegen::{compile, instruction_count, CodeGenerator};
use mipas::errors::{PasError, PasResult};
use mipas::frontend::parser::parse;
use regex::Regex;

fn compile_source(source: &str) -> PasResult<String> {
    compile(&parse(source)?)
}

// Stack offsets used by `op $v0, N($sp)` in order of appearance.
fn sp_offsets(asm: &str, op: &str) -> Vec<usize> {
    let pattern = Regex::new(&format!(r"\t{} \$v0, (\d+)\(\$sp\)", op)).unwrap();
    pattern
        .captures_iter(asm)
        .map(|c| c[1].parse().unwrap())
        .collect()
}

fn procedure_text<'a>(asm: &'a str, name: &str) -> &'a str {
    let start = asm.find(&format!("proc{}:\n", name)).unwrap();
    let rest = &asm[start..];
    let end = rest.find("\tjr $ra\n").unwrap();
    &rest[..end]
}

#[test]
fn test_data_section_lists_globals() -> PasResult<()> {
    let asm = compile_source("VAR a, b; BEGIN c := a; WRITELN(d); END;.")?;
    assert!(asm.starts_with("# MIPS code generated by mipas"));
    assert!(asm.contains("\t.data\nnewLine: .asciiz \"\\n\"\n"));
    assert!(asm.contains("vara: .word 0\nvarb: .word 0\nvarc: .word 0\nvard: .word 0\n"));
    Ok(())
}

#[test]
fn test_procedure_names_stay_off_the_data_section() -> PasResult<()> {
    let source = "
        PROCEDURE p(k);
        VAR t;
        BEGIN
            t := k;
            p := t;
        END;
        WRITELN(p(1));
    .";
    let asm = compile_source(source)?;
    assert!(!asm.contains("vart:"));
    assert!(!asm.contains("vark:"));
    assert!(!asm.contains("varp:"));
    Ok(())
}

#[test]
fn test_entry_exit_and_procedure_placement() -> PasResult<()> {
    let source = "
        PROCEDURE add(a, b);
        add := a + b;
        WRITELN(add(1, 2));
    .";
    let asm = compile_source(source)?;
    let text = asm.find("\t.text\n\t.globl main\nmain:\n").unwrap();
    let exit = asm.find("\tli $v0, 10\n\tsyscall\n").unwrap();
    let procedure = asm.find("procadd:\n").unwrap();
    assert!(text < exit);
    assert!(exit < procedure);
    assert!(asm.contains("\tjal procadd\n"));
    assert!(asm.ends_with("\tjr $ra\n"));
    Ok(())
}

#[test]
fn test_writeln_sequence() -> PasResult<()> {
    let asm = compile_source("WRITELN(7);")?;
    assert!(asm.contains(
        "\tli $v0, 7\n\tmove $a0, $v0\n\tli $v0, 1\n\tsyscall\n\tla $a0, newLine\n\tli $v0, 4\n\tsyscall\n"
    ));
    Ok(())
}

#[test]
fn test_readln_stores_global() -> PasResult<()> {
    let asm = compile_source("READLN(n);")?;
    assert!(asm.contains("\tli $v0, 5\n\tsyscall\n\tla $t0, varn\n\tsw $v0, 0($t0)\n\tli $v0, 10\n"));
    assert!(asm.contains("varn: .word 0\n"));
    Ok(())
}

#[test]
fn test_binary_operator_sequences() -> PasResult<()> {
    let asm = compile_source("BEGIN x := a + b; x := a - b; x := a * b; x := a / b; x := a mod b; END;")?;
    assert!(asm.contains("\tlw $t0, 0($sp)\n\taddiu $sp, $sp, 4\n\taddu $v0, $t0, $v0\n"));
    assert!(asm.contains("\tsubu $v0, $t0, $v0\n"));
    assert!(asm.contains("\tmult $t0, $v0\n\tmflo $v0\n"));
    assert!(asm.contains("\tdiv $t0, $v0\n\tmflo $v0\n"));
    assert!(asm.contains("\tdiv $t0, $v0\n\tmfhi $v0\n"));
    assert!(asm.contains("\taddiu $sp, $sp, -4\n\tsw $v0, 0($sp)\n"));
    Ok(())
}

#[test]
fn test_conditions_branch_on_negation() -> PasResult<()> {
    let cases = [
        ("=", "bne"),
        ("<>", "beq"),
        ("<", "bge"),
        (">", "ble"),
        ("<=", "bgt"),
        (">=", "blt"),
    ];
    for (symbol, mnemonic) in cases {
        let asm = compile_source(&format!("IF a {} b THEN WRITELN(1);", symbol))?;
        let expected = format!("\t{} $t0, $v0, else1\n", mnemonic);
        assert!(asm.contains(&expected), "{} should compile to {}", symbol, mnemonic);
    }
    Ok(())
}

#[test]
fn test_if_else_labels() -> PasResult<()> {
    let asm = compile_source("IF 3 > 5 THEN WRITELN(1); ELSE WRITELN(2);")?;
    let branch = asm.find("\tble $t0, $v0, else1\n").unwrap();
    let jump = asm.find("\tj endif1\n").unwrap();
    let else_label = asm.find("\nelse1:\n").unwrap();
    let end_label = asm.find("\nendif1:\n").unwrap();
    assert!(branch < jump);
    assert!(jump < else_label);
    assert!(else_label < end_label);
    Ok(())
}

#[test]
fn test_while_labels() -> PasResult<()> {
    let asm = compile_source("WHILE i < 3 DO i := i + 1;")?;
    let top = asm.find("\nloop1:\n").unwrap();
    let exit = asm.find("\tbge $t0, $v0, endloop1\n").unwrap();
    let back = asm.find("\tj loop1\n").unwrap();
    let bottom = asm.find("\nendloop1:\n").unwrap();
    assert!(top < exit);
    assert!(exit < back);
    assert!(back < bottom);
    Ok(())
}

#[test]
fn test_labels_are_unique_per_construct() -> PasResult<()> {
    let source = "
        BEGIN
            IF a = 1 THEN a := 2;
            IF a = 2 THEN a := 3;
            WHILE a < 9 DO a := a + 1;
        END;
    .";
    let asm = compile_source(source)?;
    assert!(asm.contains("\nelse1:\n"));
    assert!(asm.contains("\nelse2:\n"));
    assert!(asm.contains("\nloop3:\n"));
    assert!(asm.contains("\nendloop3:\n"));
    Ok(())
}

#[test]
fn test_return_slot_offset() -> PasResult<()> {
    let source = "
        PROCEDURE add(a, b);
        BEGIN
            add := a + b;
        END;
        WRITELN(add(2, 3));
    .";
    let asm = compile_source(source)?;
    let body = procedure_text(&asm, "add");
    assert_eq!(sp_offsets(body, "lw"), vec![4, 4]);
    assert_eq!(sp_offsets(body, "sw"), vec![0, 8]);
    Ok(())
}

#[test]
fn test_offsets_follow_temporaries() -> PasResult<()> {
    let source = "
        PROCEDURE p(a);
        VAR x, y;
        BEGIN
            x := a + (a * a);
            p := x;
        END;
        WRITELN(p(3));
    .";
    let asm = compile_source(source)?;
    let body = procedure_text(&asm, "p");
    assert_eq!(sp_offsets(body, "lw"), vec![8, 12, 16, 4, 0, 0]);
    assert_eq!(sp_offsets(body, "sw"), vec![0, 0, 0, 0, 4, 12]);
    Ok(())
}

#[test]
fn test_call_pushes_only_declared_parameters() -> PasResult<()> {
    let source = "
        PROCEDURE one(a);
        one := a;
        WRITELN(one(4, 9));
    .";
    let asm = compile_source(source)?;
    let main = &asm[asm.find("main:\n").unwrap()..asm.find("procone:\n").unwrap()];
    let expected = "\taddiu $sp, $sp, -4\n\tsw $ra, 0($sp)\n\
                    \tli $v0, 0\n\taddiu $sp, $sp, -4\n\tsw $v0, 0($sp)\n\
                    \tli $v0, 4\n\taddiu $sp, $sp, -4\n\tsw $v0, 0($sp)\n\
                    \tli $v0, 9\n\
                    \tjal procone\n\
                    \tlw $v0, 0($sp)\n\taddiu $sp, $sp, 4\n\
                    \tlw $v0, 0($sp)\n\taddiu $sp, $sp, 4\n\
                    \tlw $ra, 0($sp)\n\taddiu $sp, $sp, 4\n";
    assert!(main.contains(expected), "unexpected call sequence:\n{}", main);
    Ok(())
}

#[test]
fn test_locals_are_pushed_and_popped() -> PasResult<()> {
    let source = "
        PROCEDURE p();
        VAR a, b, c;
        p := 1;
        WRITELN(p());
    .";
    let asm = compile_source(source)?;
    let body = procedure_text(&asm, "p");
    assert_eq!(body.matches("\tli $v0, 0\n\taddiu $sp, $sp, -4\n\tsw $v0, 0($sp)\n").count(), 3);
    assert_eq!(body.matches("\tlw $v0, 0($sp)\n\taddiu $sp, $sp, 4\n").count(), 3);
    Ok(())
}

#[test]
fn test_undefined_procedure_is_rejected() {
    let result = compile_source("WRITELN(nowhere());");
    assert!(
        matches!(result, Err(PasError::UndefinedProcedure { ref name }) if name == "nowhere"),
        "got: {:?}",
        result
    );
}

#[test]
fn test_too_few_arguments_is_rejected() {
    let result = compile_source("PROCEDURE f(a, b); f := a; WRITELN(f(1));");
    assert!(
        matches!(result, Err(PasError::ArityError { expected: 2, found: 1, .. })),
        "got: {:?}",
        result
    );
}

#[test]
fn test_duplicate_procedure_is_rejected() {
    let result = compile_source("PROCEDURE f(); f := 1; PROCEDURE f(); f := 2; WRITELN(f());");
    assert!(matches!(result, Err(PasError::CodeGenError { .. })), "got: {:?}", result);
}

#[test]
fn test_instruction_count() -> PasResult<()> {
    let asm = compile_source("BEGIN WRITELN(1); END;.")?;
    assert_eq!(instruction_count(&asm)?, 9);
    Ok(())
}

#[test]
fn test_generator_tracks_temporaries_inside_frames() -> PasResult<()> {
    let procedure = ProcedureDeclaration::new(
        "p",
        vec!["a".to_string()],
        vec!["x".to_string()],
        Statement::Block(vec![]),
    );
    let mut generator = CodeGenerator::new();
    assert_eq!(generator.local_offset("a"), None);

    generator.set_procedure_context(&procedure);
    assert_eq!(generator.local_offset("x"), Some(0));
    assert_eq!(generator.local_offset("a"), Some(4));
    assert_eq!(generator.local_offset("p"), Some(8));

    generator.emit_push("$v0")?;
    assert_eq!(generator.excess_height(), 1);
    assert_eq!(generator.local_offset("a"), Some(8));
    generator.emit_pop("$t0")?;
    assert_eq!(generator.excess_height(), 0);
    assert!(generator.emit_pop("$t0").is_err());

    assert!(generator.clear_procedure_context().is_some());
    generator.emit_push("$v0")?;
    assert_eq!(generator.excess_height(), 0);
    Ok(())
}

#[test]
fn test_label_ids_increase() {
    let mut generator = CodeGenerator::new();
    assert_eq!(generator.next_label_id(), 1);
    assert_eq!(generator.next_label_id(), 2);
}

#[test]
fn test_shadowing_local_is_copied_to_return_slot() -> PasResult<()> {
    let source = "
        PROCEDURE f();
        VAR f;
        f := 3;
        WRITELN(f());
    .";
    let asm = compile_source(source)?;
    let body = procedure_text(&asm, "f");
    assert!(body.contains("\tsw $v0, 0($sp)\n\tlw $v0, 0($sp)\n\tsw $v0, 4($sp)\n"));

    let asm = compile_source("PROCEDURE g(); g := 3; WRITELN(g());")?;
    assert_eq!(sp_offsets(procedure_text(&asm, "g"), "sw"), vec![0]);
    Ok(())
}
