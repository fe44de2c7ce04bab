/**
 * The Compiler takes the text of a Blaise program and converts it into MIPS
 * assembly language for the SPIM simulator.
 *
 * Compilation runs through four stages, each in its own submodule:
 * 1. `lexer` converts the source text into tokens.
 * 2. `parser` converts the tokens into a syntax tree (`ast`).
 * 3. `semantics` type checks the tree, checks every use of a name against its
 *    declaration, and builds the symbol tables: the global variable table and
 *    one frame descriptor per procedure.
 * 4. `compiler` walks the tree and, using the symbol tables, emits the
 *    assembly through the `mips` module.
 *
 * The first three stages report User errors as a `CompilerError` carrying
 * the source line of the fault.  Semantic analysis is the last stage where a
 * User error can occur.  After it, the input is considered correct and any
 * fault in code generation can only come from a bug in the compiler itself,
 * so the code generator panics from exactly the point the fault is found.
 */
#[macro_use]
pub mod error;

pub mod ast;
pub mod compiler;
pub mod lexer;
pub mod mips;
pub mod parser;
pub mod semantics;

pub use compiler::Compiler;
pub use error::{CompilerError, CompilerErrorDisplay};
