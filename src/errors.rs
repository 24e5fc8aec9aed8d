use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PasError {
    // File and I/O errors
    FileReadError(String),
    IoError(io::Error),

    // Lexical analysis errors
    LexerError {
        message: String,
        line: usize,
    },
    UnknownCharacter {
        ch: char,
        line: usize,
    },
    UnterminatedComment {
        line: usize,
    },
    InvalidNumber {
        number: String,
        line: usize,
    },

    // Parsing errors
    SyntaxError {
        expected: String,
        found: String,
        line: usize,
    },

    // Interpretation errors
    ArithmeticError {
        operation: String,
    },
    UndefinedProcedure {
        name: String,
    },
    ArityError {
        name: String,
        expected: usize,
        found: usize,
    },
    InputError(String),

    // Code generation errors
    CodeGenError {
        message: String,
    },

    // Generic errors
    GenericError(String),
}

impl PasError {
    /// Create a lexer error with line information
    pub fn lexer_error(message: impl Into<String>, line: usize) -> Self {
        PasError::LexerError {
            message: message.into(),
            line,
        }
    }

    /// Create a syntax error naming the expected and the actual token
    pub fn syntax_error(expected: impl Into<String>, found: impl Into<String>, line: usize) -> Self {
        PasError::SyntaxError {
            expected: expected.into(),
            found: found.into(),
            line,
        }
    }

    /// Create a code generation error
    pub fn codegen_error(message: impl Into<String>) -> Self {
        PasError::CodeGenError {
            message: message.into(),
        }
    }

    pub fn division_by_zero(operation: impl Into<String>) -> Self {
        PasError::ArithmeticError {
            operation: operation.into(),
        }
    }
}

impl fmt::Display for PasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasError::FileReadError(msg) => write!(f, "File read error: {}", msg),
            PasError::IoError(err) => write!(f, "I/O error: {}", err),

            PasError::LexerError { message, line } => {
                write!(f, "Lexer error at line {}: {}", line, message)
            }
            PasError::UnknownCharacter { ch, line } => {
                write!(f, "Character not recognized '{}' at line {}", ch, line)
            }
            PasError::UnterminatedComment { line } => {
                write!(f, "Unterminated comment starting at line {}", line)
            }
            PasError::InvalidNumber { number, line } => {
                write!(f, "Invalid number '{}' at line {}", number, line)
            }

            PasError::SyntaxError { expected, found, line } => {
                write!(f, "Syntax error at line {}: expected '{}', found '{}'", line, expected, found)
            }

            PasError::ArithmeticError { operation } => {
                write!(f, "Arithmetic error: {} by zero", operation)
            }
            PasError::UndefinedProcedure { name } => {
                write!(f, "Undefined procedure '{}'", name)
            }
            PasError::ArityError { name, expected, found } => {
                write!(
                    f,
                    "Procedure '{}' expects {} argument(s) but was called with {}",
                    name, expected, found
                )
            }
            PasError::InputError(msg) => write!(f, "Input error: {}", msg),

            PasError::CodeGenError { message } => {
                write!(f, "Code generation error: {}", message)
            }

            PasError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for PasError {}

// Conversion implementations for common error types
impl From<io::Error> for PasError {
    fn from(err: io::Error) -> Self {
        PasError::IoError(err)
    }
}

// Type alias for Result with PasError
pub type PasResult<T> = Result<T, PasError>;
