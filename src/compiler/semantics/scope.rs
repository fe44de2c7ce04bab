use std::collections::HashMap;

/// What an identifier in a scope refers to.  `Untyped` is what a lookup returns
/// for a name that is not declared and is never stored in a [`Scope`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VarKind {
    Untyped,
    Single,
    Array,
}

impl std::fmt::Display for VarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarKind::Untyped => f.write_str("untyped"),
            VarKind::Single => f.write_str("single"),
            VarKind::Array => f.write_str("array"),
        }
    }
}

/// The variables declared directly within a single lexical block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scope {
    vars: HashMap<String, VarKind>,
}

impl Scope {
    pub fn new() -> Scope {
        Scope {
            vars: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, kind: VarKind) -> Option<VarKind> {
        self.vars.insert(name.into(), kind)
    }

    pub fn get(&self, name: &str) -> VarKind {
        self.vars.get(name).copied().unwrap_or(VarKind::Untyped)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.vars.iter().collect();
        names.sort_by(|a, b| a.0.cmp(b.0));
        for (name, kind) in names {
            f.write_fmt(format_args!("[{}: {}] ", name, kind))?;
        }
        Ok(())
    }
}

/// The stack of scopes from the global scope down to the innermost block
/// currently being analyzed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScopeStack {
    stack: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> ScopeStack {
        ScopeStack { stack: vec![] }
    }

    pub fn push(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    pub fn pop(&mut self) -> Option<Scope> {
        self.stack.pop()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Searches from the innermost scope outward for `name`.
    pub fn find(&self, name: &str) -> VarKind {
        for scope in self.stack.iter().rev() {
            match scope.get(name) {
                VarKind::Untyped => (),
                kind => return kind,
            }
        }
        VarKind::Untyped
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.find(name) != VarKind::Untyped
    }

    /// Adds `name` to the innermost scope.  Returns false if there is no scope
    /// to declare into.
    pub fn declare(&mut self, name: &str, kind: VarKind) -> bool {
        match self.stack.last_mut() {
            Some(scope) => {
                scope.insert(name, kind);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Display for ScopeStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, scope) in self.stack.iter().rev().enumerate() {
            f.write_fmt(format_args!("{}: {}\n", i, scope))?;
        }
        Ok(())
    }
}
