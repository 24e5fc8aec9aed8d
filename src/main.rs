use clap::{Parser, ValueEnum};
use mipas::errors::{PasError, PasResult};
use mipas::{
    ast::Program, codegen, config::source, frontend::lexer::scan, frontend::parser::parse,
    interpreter::interpret, read,
};
use std::io;
use std::{fs, path::PathBuf, time::Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Interpret the program directly
    Run,
    /// Translate the program to MIPS assembly
    Compile,
    /// Interpret, then translate
    Both,
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Mini-Pascal interpreter and MIPS compiler",
    long_about = "Mini-Pascal interpreter and MIPS compiler.\n\
                 Runs a program directly with a tree-walking interpreter, or translates it\n\
                 into MIPS assembly for SPIM/MARS, or both.\n\
                 \n\
                 Example usage:\n\
                 mipas prog.pas                        # Interpret\n\
                 mipas prog.pas --mode compile         # Write prog.asm\n\
                 mipas prog.pas --mode both -o out.asm # Interpret and write out.asm\n\
                 mipas prog.pas --show-ast             # Display the parsed program\n\
                 mipas prog.pas --timing               # Show phase timing"
)]
struct Cli {
    // The path to the program
    path: PathBuf,

    // What to do with the parsed program
    #[arg(long, value_enum, default_value_t = Mode::Run)]
    mode: Mode,

    // Output file path (defaults to input file with .asm extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    // Print the token stream
    #[arg(long)]
    show_tokens: bool,

    // Show AST after parsing
    #[arg(long)]
    show_ast: bool,

    // Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    // Show phase timing
    #[arg(short, long)]
    timing: bool,
}

// Phase statistics for --timing
#[derive(Debug, Default)]
struct RunStats {
    lexer_time: f64,
    parser_time: f64,
    interpret_time: f64,
    codegen_time: f64,
    total_time: f64,
    token_count: usize,
    procedure_count: usize,
    asm_instructions: usize,
}

// Print error message and exit with error code
fn fatal(msg: &str) -> ! {
    eprintln!("Error: {}", msg);
    std::process::exit(1);
}

// Generate output file path from input path if not specified
fn determine_output_path(input_path: &PathBuf, output: &Option<PathBuf>) -> PathBuf {
    match output {
        Some(path) => path.clone(),
        None => {
            let basename = input_path.file_stem().unwrap_or_default();
            let mut path = PathBuf::from(basename);
            path.set_extension(source::ASM_EXTENSION);
            path
        }
    }
}

// Lexical analysis is repeated here only to report the token stream; the
// parser pulls its own tokens lazily.
fn lexical_analysis(source_str: &str, args: &Cli, stats: &mut RunStats) -> PasResult<()> {
    let lexer_start = Instant::now();
    let tokens = scan(source_str)?;
    stats.lexer_time = lexer_start.elapsed().as_secs_f64();
    stats.token_count = tokens.len();

    if args.show_tokens {
        println!("\n Tokens:");
        for (token, line) in &tokens {
            println!("  {:>4}  {}", line, token);
        }
    }
    if args.verbose {
        println!("Lexical analysis completed in {:.3}s", stats.lexer_time);
        println!("  Generated {} tokens", stats.token_count);
    }
    Ok(())
}

fn parsing_phase(source_str: &str, stats: &mut RunStats, verbose: bool) -> PasResult<Program> {
    let parser_start = Instant::now();
    let program = parse(source_str)?;
    stats.parser_time = parser_start.elapsed().as_secs_f64();
    stats.procedure_count = program.procedures.len();

    if verbose {
        println!("Parsing completed in {:.3}s", stats.parser_time);
        println!("  {} global(s), {} procedure(s)", program.variables.len(), stats.procedure_count);
    }
    Ok(program)
}

fn interpretation_phase(program: &Program, stats: &mut RunStats, verbose: bool) -> PasResult<()> {
    let start = Instant::now();
    let stdin = io::stdin();
    let stdout = io::stdout();
    interpret(program, stdin.lock(), stdout.lock())?;
    stats.interpret_time = start.elapsed().as_secs_f64();

    if verbose {
        println!("Interpretation completed in {:.3}s", stats.interpret_time);
    }
    Ok(())
}

fn code_generation_phase(program: &Program, stats: &mut RunStats, verbose: bool) -> PasResult<String> {
    let codegen_start = Instant::now();
    let asm = codegen::compile(program)?;
    stats.codegen_time = codegen_start.elapsed().as_secs_f64();
    stats.asm_instructions = codegen::instruction_count(&asm)?;

    if verbose {
        println!("Code generation completed in {:.3}s", stats.codegen_time);
        println!("  Generated {} MIPS instructions", stats.asm_instructions);
    }
    Ok(asm)
}

fn run(args: &Cli) -> PasResult<RunStats> {
    let start_time = Instant::now();
    let mut stats = RunStats::default();

    if args.verbose {
        println!("Processing: {}", args.path.display());
    }

    if !args.path.exists() {
        return Err(PasError::FileReadError(format!(
            "Input file does not exist: {}",
            args.path.display()
        )));
    }

    let source_str = read(&args.path)?;
    if args.verbose {
        println!("Read {} bytes from input file", source_str.len());
    }

    if args.show_tokens || args.verbose || args.timing {
        lexical_analysis(&source_str, args, &mut stats)?;
    }

    let program = parsing_phase(&source_str, &mut stats, args.verbose)?;

    if args.show_ast {
        println!("\n Abstract Syntax Tree:");
        println!("{}", program);
    }

    if matches!(args.mode, Mode::Run | Mode::Both) {
        interpretation_phase(&program, &mut stats, args.verbose)?;
    }

    if matches!(args.mode, Mode::Compile | Mode::Both) {
        let asm = code_generation_phase(&program, &mut stats, args.verbose)?;
        let output_path = determine_output_path(&args.path, &args.output);
        fs::write(&output_path, asm)?;
        if args.verbose {
            println!("Assembly written to: {}", output_path.display());
        }
    }

    stats.total_time = start_time.elapsed().as_secs_f64();
    Ok(stats)
}

fn print_stats(stats: &RunStats) {
    println!("\n Statistics:");
    println!("  Lexical Analysis    {:>8.3}s", stats.lexer_time);
    println!("  Parsing             {:>8.3}s", stats.parser_time);
    println!("  Interpretation      {:>8.3}s", stats.interpret_time);
    println!("  Code Generation     {:>8.3}s", stats.codegen_time);
    println!("  Total               {:>8.3}s", stats.total_time);
    println!("  Tokens:             {}", stats.token_count);
    println!("  Procedures:         {}", stats.procedure_count);
    println!("  MIPS instructions:  {}", stats.asm_instructions);
}

fn main() {
    let args = Cli::parse();

    // Validate input file extension
    if args.path.extension().map_or(true, |ext| ext != source::FILE_EXTENSION) {
        eprintln!("Warning: Input file does not have .{} extension", source::FILE_EXTENSION);
    }

    match run(&args) {
        Ok(stats) => {
            if args.timing {
                print_stats(&stats);
            }
        }
        Err(e) => fatal(&e.to_string()),
    }
}
