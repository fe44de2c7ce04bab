mod expression;
mod printer;
mod program;
mod statement;
mod ty;

pub use self::expression::{BinaryOperator, Expression, OperatorClass, UnaryOperator};
pub use self::printer::{print_graphviz, print_tree};
pub use self::program::{Parameter, Procedure, Program, VarDecl};
pub use self::statement::{LValue, Statement};
pub use self::ty::{Shape, Type};

/// Every node is annotated with the source line of the first token it
/// was parsed from.
pub type Line = u32;

pub const MAIN_PROC: &str = "main";
