use super::{CompilerError, CompilerErrorDisplay};


pub mod lexer;
pub mod tokens;

pub type LexerResult<T> = Result<T, CompilerError<LexerError>>;

/// Errors which can be encountered while tokenizing a compilation unit
#[derive(Clone, Debug, PartialEq)]
pub enum LexerError {
    Locked(Option<char>),
    InvalidInteger(String),
    UnterminatedComment,
}

impl CompilerErrorDisplay for LexerError {
    fn format(&self) -> Result<String, String> {
        use LexerError::*;
        let msg = match self {
            Locked(None) => format!("Lexer locked on EOF"),
            Locked(Some(c)) => format!("Lexer locked on {}", c),
            InvalidInteger(text) => format!("Invalid integer: {}", text),
            UnterminatedComment => format!("Block comment is never closed"),
        };

        Ok(msg)
    }
}
