pub mod cli;
pub mod compiler;
pub mod diagnostics;

pub use cli::*;

use compiler::{
    ast::Program,
    lexer::{lexer::Lexer, tokens::Token},
    semantics::SymbolTables,
    Compiler,
};
use diagnostics::{Tracing, TracingConfig};

/// Tokenizes the text of a Blaise program.  On failure every error that the
/// lexer reported is returned as a formatted message.
pub fn tokenize(text: &str, trace: TracingConfig) -> Result<Vec<Token>, Vec<String>> {
    let mut lexer = Lexer::new(text);
    lexer.set_tracing(trace);

    let mut tokens = vec![];
    let mut errors = vec![];
    for t in lexer.tokenize() {
        match t {
            Ok(t) => tokens.push(t),
            Err(e) => errors.push(format!("Lexer error @ {}", e)),
        }
    }

    if errors.is_empty() {
        Ok(tokens)
    } else {
        Err(errors)
    }
}

pub fn parse_tokens(tokens: &[Token]) -> Result<Program, String> {
    compiler::parser::parse(tokens).map_err(|e| format!("Parser error @ {}", e))
}

pub fn analyze(program: &Program) -> Result<SymbolTables, String> {
    compiler::semantics::analyze(program).map_err(|e| format!("Semantic error @ {}", e))
}

/// Generates the assembly text for an analyzed program.
pub fn generate(program: &Program, tables: &SymbolTables) -> Result<String, String> {
    let compiler = Compiler::compile(program, tables);
    let mut out = vec![];
    compiler
        .print(&mut out)
        .map_err(|e| format!("Failed to write assembly: {}", e))?;
    String::from_utf8(out).map_err(|e| format!("Failed to write assembly: {}", e))
}

/// Runs every stage of the compiler over `text` and returns the MIPS assembly,
/// or the message of the first stage that failed.
pub fn compile_source(text: &str) -> Result<String, String> {
    let tokens = tokenize(text, TracingConfig::Off).map_err(|errs| errs.join("\n"))?;
    let program = parse_tokens(&tokens)?;
    let tables = analyze(&program)?;
    generate(&program, &tables)
}

pub fn tables_to_json(tables: &SymbolTables) -> Result<String, String> {
    serde_json::to_string_pretty(tables).map_err(|e| format!("{}", e))
}

pub fn tables_to_yaml(tables: &SymbolTables) -> Result<String, String> {
    serde_yaml::to_string(tables).map_err(|e| format!("{}", e))
}
