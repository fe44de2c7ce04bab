use log::debug;

use crate::compiler::{ast::*, CompilerError};

use super::{
    error::SemanticError,
    frame::FrameDescriptor,
    scope::{Scope, ScopeStack, VarKind},
    symbol_table::SymbolTables,
    SemanticResult,
};

/// Checks that `program` is well formed and builds the global variable table and
/// the frame layout of every procedure.  Analysis stops at the first error.
pub fn analyze(program: &Program) -> SemanticResult<SymbolTables> {
    SemanticAnalyzer::new().analyze(program)
}

/// The procedure whose body is currently being checked.
struct ProcedureContext<'a> {
    name: &'a str,
    frame: FrameDescriptor,
}

pub struct SemanticAnalyzer {
    scopes: ScopeStack,
    tables: SymbolTables,
}

impl SemanticAnalyzer {
    pub fn new() -> SemanticAnalyzer {
        SemanticAnalyzer {
            scopes: ScopeStack::new(),
            tables: SymbolTables::new(),
        }
    }

    pub fn analyze(mut self, program: &Program) -> SemanticResult<SymbolTables> {
        debug!("Start semantic analysis");
        self.scopes.push(Scope::new());

        for global in &program.globals {
            self.global(global)?;
        }

        for p in &program.procedures {
            self.procedure(p)?;
        }

        match program.get_procedure(MAIN_PROC) {
            None => {
                let line = program.procedures.last().map_or(1, |p| p.line);
                return err!(line, SemanticError::NoMain);
            }
            Some(main) if !main.params.is_empty() => {
                return err!(main.line, SemanticError::MainHasArgs);
            }
            Some(_) => (),
        }

        self.scopes.pop();
        debug!("Finished semantic analysis");
        Ok(self.tables)
    }

    fn global(&mut self, global: &VarDecl) -> SemanticResult<()> {
        if self.tables.is_global(&global.name) {
            return err!(
                global.line,
                SemanticError::AlreadyDeclaredGlobal(global.name.clone())
            );
        }

        self.scopes.declare(&global.name, kind_of(global.shape));
        self.tables
            .globals
            .insert(global.name.clone(), global.shape.words());
        Ok(())
    }

    fn procedure(&mut self, p: &Procedure) -> SemanticResult<()> {
        debug!("Analyzing procedure {}", p.name);
        if self.tables.get_procedure(&p.name).is_some() {
            return err!(p.line, SemanticError::ProcAlreadyDeclared(p.name.clone()));
        }

        let mut ctx = ProcedureContext {
            name: &p.name,
            frame: FrameDescriptor::new(),
        };

        self.scopes.push(Scope::new());
        for param in &p.params {
            self.declare(param.line, &param.name, VarKind::Single)?;
            ctx.frame
                .insert_arg(&param.name)
                .map_err(|e| CompilerError::new(param.line, e))?;
        }

        self.statement(&p.body, &mut ctx)?;
        self.scopes.pop();

        ctx.frame.finish();
        debug!("Frame of {}: {} bytes", p.name, ctx.frame.size());
        self.tables.procedures.insert(p.name.clone(), ctx.frame);
        Ok(())
    }

    /// Adds `name` to the innermost scope after making sure that it does not
    /// collide with anything visible from here, including globals.
    fn declare(&mut self, line: Line, name: &str, kind: VarKind) -> SemanticResult<()> {
        if self.scopes.is_declared(name) {
            return err!(line, SemanticError::AlreadyDeclared(name.into()));
        }
        self.scopes.declare(name, kind);
        Ok(())
    }

    /// Runs `f` inside a fresh scope which is discarded afterwards.
    fn scoped<F>(&mut self, f: F) -> SemanticResult<()>
    where
        F: FnOnce(&mut Self) -> SemanticResult<()>,
    {
        self.scopes.push(Scope::new());
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn statement(&mut self, stm: &Statement, ctx: &mut ProcedureContext) -> SemanticResult<()> {
        match stm {
            Statement::Declare(line, id, shape) => {
                self.declare(*line, id, kind_of(*shape))?;
                ctx.frame
                    .insert(id, shape.words())
                    .map_err(|e| CompilerError::new(*line, e))
            }
            Statement::Assign(line, target, value) => {
                expect_type(value, Type::Integer, "assignment")?;
                if let LValue::Element(_, index) = target {
                    expect_type(index, Type::Integer, "array index")?;
                }
                self.lvalue_kind(*line, target)?;
                self.expression(value, ctx)?;
                if let LValue::Element(_, index) = target {
                    self.expression(index, ctx)?;
                }
                Ok(())
            }
            Statement::Input(line, target) => {
                self.lvalue_kind(*line, target)?;
                if let LValue::Element(_, index) = target {
                    expect_type(index, Type::Integer, "array index")?;
                    self.expression(index, ctx)?;
                }
                Ok(())
            }
            Statement::Block(_, body) => self.scoped(|sa| {
                for s in body {
                    sa.statement(s, ctx)?;
                }
                Ok(())
            }),
            Statement::If {
                cond,
                if_arm,
                else_arm,
                ..
            } => {
                expect_type(cond, Type::Boolean, "if condition")?;
                self.expression(cond, ctx)?;
                self.scoped(|sa| sa.statement(if_arm, ctx))?;
                match else_arm {
                    Some(else_arm) => self.scoped(|sa| sa.statement(else_arm, ctx)),
                    None => Ok(()),
                }
            }
            Statement::While { cond, body, .. } => {
                expect_type(cond, Type::Boolean, "while condition")?;
                self.expression(cond, ctx)?;
                self.scoped(|sa| sa.statement(body, ctx))
            }
            Statement::Output(_, value) => {
                expect_type(value, Type::Integer, "output")?;
                self.expression(value, ctx)
            }
            Statement::Return(_, value) => {
                expect_type(value, Type::Integer, "return")?;
                self.expression(value, ctx)
            }
            Statement::Call(line, id, args) => self.call(*line, id, args, ctx),
        }
    }

    fn expression(&mut self, exp: &Expression, ctx: &mut ProcedureContext) -> SemanticResult<()> {
        match exp {
            Expression::Integer(..) | Expression::Boolean(..) => Ok(()),
            Expression::Identifier(line, id) => self.expect_kind(*line, id, VarKind::Single),
            Expression::ArrayAt(line, id, index) => {
                self.expect_kind(*line, id, VarKind::Array)?;
                expect_type(index, Type::Integer, "array index")?;
                self.expression(index, ctx)
            }
            Expression::RoutineCall(line, id, args) => self.call(*line, id, args, ctx),
            Expression::BinaryOp(_, op, left, right) => {
                let ctx_name = format!("{}", op);
                expect_type(left, op.operand_type(), &ctx_name)?;
                expect_type(right, op.operand_type(), &ctx_name)?;
                self.expression(left, ctx)?;
                self.expression(right, ctx)
            }
            Expression::UnaryOp(_, op, operand) => {
                expect_type(operand, Type::Boolean, &format!("{}", op))?;
                self.expression(operand, ctx)
            }
        }
    }

    fn call(
        &mut self,
        line: Line,
        id: &str,
        args: &[Expression],
        ctx: &mut ProcedureContext,
    ) -> SemanticResult<()> {
        // A procedure is visible to its own body so that it may recurse
        let arity = if id == ctx.name {
            ctx.frame.arg_count()
        } else {
            match self.tables.get_procedure(id) {
                Some(frame) => frame.arg_count(),
                None => return err!(line, SemanticError::ProcNotDeclared(id.into())),
            }
        };

        if args.iter().any(|a| a.get_type() != Type::Integer) {
            return err!(line, SemanticError::ArgNotInteger(id.into()));
        }

        if args.len() != arity {
            return err!(
                line,
                SemanticError::WrongArgCount(id.into(), arity, args.len())
            );
        }

        for a in args {
            self.expression(a, ctx)?;
        }
        Ok(())
    }

    fn lvalue_kind(&self, line: Line, target: &LValue) -> SemanticResult<()> {
        match target {
            LValue::Variable(id) => self.expect_kind(line, id, VarKind::Single),
            LValue::Element(id, _) => self.expect_kind(line, id, VarKind::Array),
        }
    }

    fn expect_kind(&self, line: Line, id: &str, expected: VarKind) -> SemanticResult<()> {
        match (self.scopes.find(id), expected) {
            (VarKind::Untyped, _) => err!(line, SemanticError::NotDeclared(id.into())),
            (VarKind::Array, VarKind::Single) => err!(line, SemanticError::NotSingle(id.into())),
            (VarKind::Single, VarKind::Array) => err!(line, SemanticError::NotArray(id.into())),
            _ => Ok(()),
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        SemanticAnalyzer::new()
    }
}

fn kind_of(shape: Shape) -> VarKind {
    match shape {
        Shape::Single => VarKind::Single,
        Shape::Array(_) => VarKind::Array,
    }
}

fn expect_type(exp: &Expression, expected: Type, context: &str) -> SemanticResult<()> {
    if exp.get_type() == expected {
        Ok(())
    } else {
        err!(exp.line(), SemanticError::Expected(expected, context.into()))
    }
}
