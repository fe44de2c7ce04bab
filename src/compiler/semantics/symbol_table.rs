use indexmap::IndexMap;
use serde::Serialize;

use super::frame::FrameDescriptor;

/// Global variable name to its size in words.  Entries keep the order in which
/// the globals were declared.
pub type GlobalTable = IndexMap<String, u32>;

/// Procedure name to the finished layout of its frame.
pub type ProcedureTable = IndexMap<String, FrameDescriptor>;

/**
 The tables produced by semantic analysis of a [`Program`](crate::compiler::ast::Program).

 Code generation consults `globals` to decide whether an identifier is
 addressed through a data label or through the frame pointer, and
 `procedures` to find the frame layout of the procedure being emitted.
*/
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SymbolTables {
    pub globals: GlobalTable,
    pub procedures: ProcedureTable,
}

impl SymbolTables {
    pub fn new() -> SymbolTables {
        SymbolTables {
            globals: GlobalTable::new(),
            procedures: ProcedureTable::new(),
        }
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.globals.contains_key(name)
    }

    pub fn get_global(&self, name: &str) -> Option<u32> {
        self.globals.get(name).copied()
    }

    pub fn get_procedure(&self, name: &str) -> Option<&FrameDescriptor> {
        self.procedures.get(name)
    }
}

impl std::fmt::Display for SymbolTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("globals:\n")?;
        for (name, words) in &self.globals {
            f.write_fmt(format_args!("  {}: {}\n", name, words))?;
        }
        f.write_str("procedures:\n")?;
        for (name, frame) in &self.procedures {
            f.write_fmt(format_args!("  {}\n", name))?;
            for line in frame.to_string().lines() {
                f.write_fmt(format_args!("    {}\n", line))?;
            }
        }
        Ok(())
    }
}
