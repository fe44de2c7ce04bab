/*
 * Handles semantic analysis of a syntax tree.  This includes:
 * 1. Type checking: every operator, condition, argument, and return value must
 *    have the type that its position requires.
 * 2. Checking that every variable and procedure that is used has been declared
 *    with the right shape and, for procedures, the right number of arguments.
 * 3. Constructing the global variable table and laying out the stack frame of
 *    every procedure.
 */
mod analyzer;
mod error;
pub mod frame;
pub mod scope;
pub mod symbol_table;


pub use analyzer::{analyze, SemanticAnalyzer};
pub use error::SemanticError;
pub use frame::{FrameDescriptor, Slot, MAX_FRAME_SIZE, SAVE_AREA, WORD_SIZE};
pub use symbol_table::{GlobalTable, ProcedureTable, SymbolTables};

use super::CompilerError;

/// Captures the Failure state of any Semantic Analysis operation.
/// Which will, if it fails, result in a [`SemanticError`] wrapped
/// in a [`CompilerError`]
pub type SemanticResult<T> = Result<T, CompilerError<SemanticError>>;
