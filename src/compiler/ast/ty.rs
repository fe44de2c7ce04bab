/**
The types a Blaise value can have.  Every expression has exactly one of these,
fixed by the kind of the expression node: there is no inference and no
coercion between the two.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Type {
    Integer,
    Boolean,
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Integer => f.write_str("int"),
            Type::Boolean => f.write_str("bool"),
        }
    }
}

/// The storage shape of a declared variable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Single,
    Array(u32),
}

impl Shape {
    /// Number of 4 byte words needed to store a variable of this shape.
    pub fn words(&self) -> u32 {
        match self {
            Shape::Single => 1,
            Shape::Array(n) => *n,
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Single => f.write_str("single"),
            Shape::Array(n) => f.write_fmt(format_args!("array[{}]", n)),
        }
    }
}
