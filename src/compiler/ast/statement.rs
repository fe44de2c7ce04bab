use super::{expression::Expression, ty::Shape, Line};

/// The storage location written by an assignment or an input instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum LValue {
    Variable(String),
    Element(String, Box<Expression>),
}

impl LValue {
    pub fn name(&self) -> &str {
        match self {
            LValue::Variable(id) | LValue::Element(id, _) => id,
        }
    }

    pub fn shape_str(&self) -> &str {
        match self {
            LValue::Variable(_) => "single",
            LValue::Element(..) => "array",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Declare(Line, String, Shape),
    Assign(Line, LValue, Expression),
    Block(Line, Vec<Statement>),
    If {
        annotation: Line,
        cond: Expression,
        if_arm: Box<Statement>,
        else_arm: Option<Box<Statement>>,
    },
    While {
        annotation: Line,
        cond: Expression,
        body: Box<Statement>,
    },
    Output(Line, Expression),
    Input(Line, LValue),
    Return(Line, Expression),
    Call(Line, String, Vec<Expression>),
}

impl Statement {
    pub fn line(&self) -> Line {
        use Statement::*;
        match self {
            Declare(l, ..)
            | Assign(l, ..)
            | Block(l, ..)
            | Output(l, ..)
            | Input(l, ..)
            | Return(l, ..)
            | Call(l, ..) => *l,
            If { annotation, .. } | While { annotation, .. } => *annotation,
        }
    }

    pub fn root_str(&self) -> String {
        use Statement::*;
        match self {
            Declare(_, id, shape) => format!("declare {} {}", shape, id),
            Assign(_, lv, _) => format!("assign {} {}", lv.shape_str(), lv.name()),
            Block(..) => "block".into(),
            If {
                else_arm: Some(_), ..
            } => "if-then-else".into(),
            If { .. } => "if-then".into(),
            While { .. } => "while".into(),
            Output(..) => "output".into(),
            Input(_, lv) => format!("input {} {}", lv.shape_str(), lv.name()),
            Return(..) => "return".into(),
            Call(_, id, _) => format!("call {}", id),
        }
    }
}
