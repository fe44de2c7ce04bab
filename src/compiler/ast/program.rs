use super::{statement::Statement, ty::Shape, Line};

/// A global variable declaration: `var int x;` or `var int a[10];`
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub line: Line,
    pub name: String,
    pub shape: Shape,
}

impl VarDecl {
    pub fn new(line: Line, name: &str, shape: Shape) -> VarDecl {
        VarDecl {
            line,
            name: name.into(),
            shape,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub line: Line,
    pub name: String,
}

impl Parameter {
    pub fn new(line: Line, name: &str) -> Parameter {
        Parameter {
            line,
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Procedure {
    pub line: Line,
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Statement,
}

impl Procedure {
    pub fn new(line: Line, name: &str, params: Vec<Parameter>, body: Statement) -> Procedure {
        Procedure {
            line,
            name: name.into(),
            params,
            body,
        }
    }
}

/// The root of a Blaise syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub globals: Vec<VarDecl>,
    pub procedures: Vec<Procedure>,
}

impl Program {
    pub fn new() -> Program {
        Program {
            globals: vec![],
            procedures: vec![],
        }
    }

    pub fn get_procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name == name)
    }
}
