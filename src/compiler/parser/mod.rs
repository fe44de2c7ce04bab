use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::lexer::tokens::Lex;
use super::{CompilerError, CompilerErrorDisplay};
use crate::diagnostics::config::TracingConfig;

static ENABLE_TRACING: AtomicBool = AtomicBool::new(false);
static TRACE_START: AtomicUsize = AtomicUsize::new(0);
static TRACE_END: AtomicUsize = AtomicUsize::new(0);

/// Configures which source lines the parser prints a trace of its grammar
/// rules for.  A bound of 0 means unbounded.
pub fn set_tracing(config: TracingConfig) {
    let (enable, start, end) = match config {
        TracingConfig::All => (true, 0, 0),
        TracingConfig::After(start) => (true, start, 0),
        TracingConfig::Before(end) => (true, 0, end),
        TracingConfig::Between(start, end) => (true, start, end),
        TracingConfig::Only(line) => (true, line, line),
        TracingConfig::Off => (false, 0, 0),
    };
    ENABLE_TRACING.store(enable, Ordering::SeqCst);
    TRACE_START.store(start, Ordering::SeqCst);
    TRACE_END.store(end, Ordering::SeqCst);
}

fn should_trace(line: u32) -> bool {
    if !ENABLE_TRACING.load(Ordering::SeqCst) {
        return false;
    }
    let line = line as usize;
    let start = TRACE_START.load(Ordering::SeqCst);
    let end = TRACE_END.load(Ordering::SeqCst);
    (start == 0 || start <= line) && (end == 0 || line <= end)
}

macro_rules! trace {
    ($ts:expr) => {
        if let Some(token) = $ts.peek() {
            if crate::compiler::parser::should_trace(token.l) {
                println!("{} <- {}", stdext::function_name!(), token)
            }
        }
    };
}

mod expression;
mod parser;
mod statement;
mod tokenstream;

pub use parser::parse;

pub type ParserResult<T> = Result<T, CompilerError<ParserError>>;

/// Compiler errors that happen within the Parser stage of compilation.
#[derive(Clone, Debug, PartialEq)]
pub enum ParserError {
    EmptyProgram,
    ExpectedButFound(Vec<Lex>, Option<Lex>),
    ExpectedVarOrProcedure(Option<Lex>),
    ExpectedProcedure(Option<Lex>),
    ExpectedInstruction(Option<Lex>),
    ExpectedExpression(Option<Lex>),
    ExpectedAssignOrCall(Option<Lex>),
    ExpectedElseOrEndif(Option<Lex>),
    ExpectedArraySize(Option<Lex>),
    InvalidArraySize(i32),
}

fn lex_to_string(l: &Option<Lex>) -> String {
    match l {
        Some(l) => format!("{}", l),
        None => "EOF".into(),
    }
}

fn lex_set_to_string(ls: &[Lex]) -> String {
    let v: Vec<String> = ls
        .iter()
        .map(|l| match l {
            Lex::Identifier(_) => "identifier".into(),
            Lex::Integer(_) => "integer".into(),
            _ => format!("{}", l),
        })
        .collect();
    v.join(" or ")
}

impl CompilerErrorDisplay for ParserError {
    /// Format a ParserError into a human readable message.
    fn format(&self) -> Result<String, String> {
        let msg = match self {
            ParserError::EmptyProgram => "Program contains no procedures".into(),
            ParserError::ExpectedButFound(expected, actual) => format!(
                "Expected {}, but found {}",
                lex_set_to_string(expected),
                lex_to_string(actual)
            ),
            ParserError::ExpectedVarOrProcedure(actual) => format!(
                "Expected variable or procedure declaration, but found {}",
                lex_to_string(actual)
            ),
            ParserError::ExpectedProcedure(actual) => {
                format!("Expected procedure, but found {}", lex_to_string(actual))
            }
            ParserError::ExpectedInstruction(actual) => format!(
                "Expected valid instruction, but found {}",
                lex_to_string(actual)
            ),
            ParserError::ExpectedExpression(actual) => format!(
                "Expected valid expression, but found {}",
                lex_to_string(actual)
            ),
            ParserError::ExpectedAssignOrCall(actual) => format!(
                "Expected := or ( after identifier, but found {}",
                lex_to_string(actual)
            ),
            ParserError::ExpectedElseOrEndif(actual) => {
                format!("Expected endif, but found {}", lex_to_string(actual))
            }
            ParserError::ExpectedArraySize(actual) => format!(
                "Expected integer array size, but found {}",
                lex_to_string(actual)
            ),
            ParserError::InvalidArraySize(size) => {
                format!("Array size must be greater than 0, but was {}", size)
            }
        };
        Ok(msg)
    }
}
