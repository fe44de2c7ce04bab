use super::{ty::Type, Line};

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Integer(Line, i32),
    Boolean(Line, bool),
    Identifier(Line, String),
    ArrayAt(Line, String, Box<Expression>),
    RoutineCall(Line, String, Vec<Expression>),
    BinaryOp(Line, BinaryOperator, Box<Expression>, Box<Expression>),
    UnaryOp(Line, UnaryOperator, Box<Expression>),
}

impl Expression {
    pub fn line(&self) -> Line {
        use Expression::*;
        match self {
            Integer(l, ..)
            | Boolean(l, ..)
            | Identifier(l, ..)
            | ArrayAt(l, ..)
            | RoutineCall(l, ..)
            | BinaryOp(l, ..)
            | UnaryOp(l, ..) => *l,
        }
    }

    /// The type of the value this expression produces.  This is decided
    /// entirely by the kind of node and does not look at any operands.
    pub fn get_type(&self) -> Type {
        use Expression::*;
        match self {
            Integer(..) | Identifier(..) | ArrayAt(..) | RoutineCall(..) => Type::Integer,
            Boolean(..) | UnaryOp(_, UnaryOperator::Not, _) => Type::Boolean,
            BinaryOp(_, op, ..) => op.result_type(),
        }
    }

    pub fn root_str(&self) -> String {
        use Expression::*;
        match self {
            Integer(_, v) => format!("{}", v),
            Boolean(_, b) => format!("{}", b),
            Identifier(_, id) => id.clone(),
            ArrayAt(_, id, _) => format!("{}[]", id),
            RoutineCall(_, id, _) => format!("{}()", id),
            BinaryOp(_, op, ..) => format!("{}", op),
            UnaryOp(_, op, _) => format!("{}", op),
        }
    }

    pub fn binary_op(
        line: Line,
        op: BinaryOperator,
        left: Expression,
        right: Expression,
    ) -> Expression {
        Expression::BinaryOp(line, op, Box::new(left), Box::new(right))
    }

    pub fn unary_op(line: Line, op: UnaryOperator, operand: Expression) -> Expression {
        Expression::UnaryOp(line, op, Box::new(operand))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Ls,
    LsEq,
    Eq,
    GrEq,
    Gr,
    BAnd,
    BOr,
}

/// Groups binary operators by the types they accept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OperatorClass {
    Arithmetic,
    Comparison,
    Logical,
}

impl BinaryOperator {
    pub fn class(&self) -> OperatorClass {
        use BinaryOperator::*;
        match self {
            Add | Sub | Mul | Div | Mod => OperatorClass::Arithmetic,
            Ls | LsEq | Eq | GrEq | Gr => OperatorClass::Comparison,
            BAnd | BOr => OperatorClass::Logical,
        }
    }

    /// The type that both operands of this operator must have.
    pub fn operand_type(&self) -> Type {
        match self.class() {
            OperatorClass::Arithmetic | OperatorClass::Comparison => Type::Integer,
            OperatorClass::Logical => Type::Boolean,
        }
    }

    pub fn result_type(&self) -> Type {
        match self.class() {
            OperatorClass::Arithmetic => Type::Integer,
            OperatorClass::Comparison | OperatorClass::Logical => Type::Boolean,
        }
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        use BinaryOperator::*;
        match self {
            Add => f.write_str("+"),
            Sub => f.write_str("-"),
            Mul => f.write_str("*"),
            Div => f.write_str("/"),
            Mod => f.write_str("%"),
            Ls => f.write_str("<"),
            LsEq => f.write_str("<="),
            Eq => f.write_str("="),
            GrEq => f.write_str(">="),
            Gr => f.write_str(">"),
            BAnd => f.write_str("and"),
            BOr => f.write_str("or"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UnaryOperator {
    Not,
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            UnaryOperator::Not => f.write_str("not"),
        }
    }
}
