#[derive(Debug, Clone, PartialEq)]
pub enum Lex {
    Integer(i32),
    Identifier(String),
    Add,
    Minus,
    Mul,
    Div,
    Mod,
    Ls,
    LsEq,
    Gr,
    GrEq,
    Eq,
    Assign,
    And,
    Or,
    Not,
    Var,
    Int,
    Bool,
    Void,
    Procedure,
    If,
    Else,
    Endif,
    While,
    Output,
    Input,
    Return,
    True,
    False,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
}

impl Lex {
    pub fn get_str(&self) -> Option<String> {
        match self {
            Lex::Identifier(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Lex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Lex::*;
        match self {
            Integer(i) => f.write_str(&format!("literal {}", i)),
            Identifier(id) => f.write_str(&format!("identifier {}", id)),
            Add => f.write_str("+"),
            Minus => f.write_str("-"),
            Mul => f.write_str("*"),
            Div => f.write_str("/"),
            Mod => f.write_str("%"),
            Ls => f.write_str("<"),
            LsEq => f.write_str("<="),
            Gr => f.write_str(">"),
            GrEq => f.write_str(">="),
            Eq => f.write_str("="),
            Assign => f.write_str(":="),
            And => f.write_str("and"),
            Or => f.write_str("or"),
            Not => f.write_str("not"),
            Var => f.write_str("var"),
            Int => f.write_str("int"),
            Bool => f.write_str("bool"),
            Void => f.write_str("void"),
            Procedure => f.write_str("procedure"),
            If => f.write_str("if"),
            Else => f.write_str("else"),
            Endif => f.write_str("endif"),
            While => f.write_str("while"),
            Output => f.write_str("output"),
            Input => f.write_str("input"),
            Return => f.write_str("return"),
            True => f.write_str("true"),
            False => f.write_str("false"),
            LParen => f.write_str("("),
            RParen => f.write_str(")"),
            LBrace => f.write_str("{"),
            RBrace => f.write_str("}"),
            LBracket => f.write_str("["),
            RBracket => f.write_str("]"),
            Semicolon => f.write_str(";"),
            Comma => f.write_str(","),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub l: u32,
    pub s: Lex,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("L{}: {}", self.l, self.s))
    }
}

impl Token {
    pub fn new(l: u32, s: Lex) -> Token {
        Token { l, s }
    }

    /// Compares the kind of this token against `a`, ignoring any value the
    /// token carries.
    pub fn token_eq(&self, a: &Lex) -> bool {
        match self.s {
            Lex::Integer(_) => matches!(a, Lex::Integer(_)),
            Lex::Identifier(_) => matches!(a, Lex::Identifier(_)),
            _ => *a == self.s,
        }
    }
}
