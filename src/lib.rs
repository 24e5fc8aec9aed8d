use std::{fs::File, io::Read, path::Path};

pub mod ast;
pub mod codegen;
pub mod config;
pub mod errors;
pub mod frontend;
pub mod interpreter;

pub const VERSION: &str = "0.1.0";

pub struct LineNumber {
    pub line: usize,
}

impl Default for LineNumber {
    fn default() -> Self {
        Self { line: 1 }
    }
}

use crate::errors::{PasError, PasResult};

pub fn read(filename: &Path) -> PasResult<String> {
    let path = Path::new(filename);
    if path.is_dir() {
        return Err(PasError::FileReadError(format!("{} is a directory", path.display())));
    }
    // Open the path in read-only mode, returns `io::Result<File>`
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}
