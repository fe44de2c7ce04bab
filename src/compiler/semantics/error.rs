use crate::compiler::{ast::Type, CompilerErrorDisplay};

/// Errors generated during semantic analysis of a program.
#[derive(Clone, Debug, PartialEq)]
pub enum SemanticError {
    AlreadyDeclaredGlobal(String),
    AlreadyDeclared(String),
    ProcAlreadyDeclared(String),
    NoMain,
    MainHasArgs,
    NotDeclared(String),
    NotSingle(String),
    NotArray(String),
    ProcNotDeclared(String),
    WrongArgCount(String, usize, usize),
    ArgNotInteger(String),
    /// A value of the wrong type was used where `Type` is required.  The string
    /// names the construct that required it.
    Expected(Type, String),
    /// Declaring the variable would make its procedure's frame too large to address.
    FrameTooLarge(String),
}

impl CompilerErrorDisplay for SemanticError {
    /// Turn a SemanticError into a human readable message.
    fn format(&self) -> Result<String, String> {
        use SemanticError::*;
        let msg = match self {
            AlreadyDeclaredGlobal(id) => {
                format!("already declared a global variable with identifier: {}", id)
            }
            AlreadyDeclared(id) => format!("already declared a variable with identifier: {}", id),
            ProcAlreadyDeclared(id) => {
                format!("a procedure with the name {} has already been declared", id)
            }
            NoMain => "must have main procedure".into(),
            MainHasArgs => "main must take no arguments".into(),
            NotDeclared(id) => format!("{} is undeclared", id),
            NotSingle(id) => format!("{} is an array and must be indexed", id),
            NotArray(id) => format!("{} is not an array", id),
            ProcNotDeclared(id) => format!("{} has not yet been declared", id),
            WrongArgCount(id, expected, _) => format!("{} requires {} arguments", id, expected),
            ArgNotInteger(id) => format!("arguments to {} must be integers", id),
            Expected(Type::Integer, ctx) => format!("{} requires an integer", ctx),
            Expected(Type::Boolean, ctx) => format!("{} requires a boolean", ctx),
            FrameTooLarge(id) => format!("declaring {} makes the stack frame too large", id),
        };
        Ok(msg)
    }
}
