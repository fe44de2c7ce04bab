use log::debug;

use crate::mips;

use super::{
    ast::*,
    mips::{
        Address, Emitter, Inst,
        Register::{self, *},
    },
    semantics::{FrameDescriptor, SymbolTables, WORD_SIZE},
};

/**
Translates an analyzed program into MIPS assembly.

Generated code treats the runtime stack as the operand stack of a stack
machine: every expression leaves exactly one word on top of the stack and every
statement leaves the stack as it found it.

The input must have passed semantic analysis.  Anything missing from the symbol
tables at this point is a bug in the analyzer, so the compiler panics rather
than returning an error.
*/
pub struct Compiler {
    code: Emitter,
}

impl Compiler {
    pub fn compile(program: &Program, tables: &SymbolTables) -> Compiler {
        debug!("Start code generation");
        let mut code = Emitter::new();
        Compiler::data_section(tables, &mut code);

        for p in &program.procedures {
            let frame = match tables.get_procedure(&p.name) {
                Some(frame) => frame,
                None => panic!("No frame was computed for procedure {}", p.name),
            };
            ProcedureCompiler {
                name: &p.name,
                tables,
                frame,
                code: &mut code,
            }
            .procedure(p);
        }

        debug!("Finished code generation");
        Compiler { code }
    }

    pub fn instructions(&self) -> &[Inst] {
        self.code.instructions()
    }

    pub fn print(&self, output: &mut dyn std::io::Write) -> std::io::Result<()> {
        self.code.print(output)
    }

    fn data_section(tables: &SymbolTables, code: &mut Emitter) {
        code.push(Inst::Section(".data".into()));
        for (name, words) in &tables.globals {
            code.push(Inst::Word(Emitter::global_label(name), *words));
        }
        code.push(Inst::Section(".text".into()));
        code.push(Inst::Global(MAIN_PROC.into()));
    }
}

/// Generates the code for the body of a single procedure.
struct ProcedureCompiler<'a> {
    name: &'a str,
    tables: &'a SymbolTables,
    frame: &'a FrameDescriptor,
    code: &'a mut Emitter,
}

impl<'a> ProcedureCompiler<'a> {
    fn procedure(&mut self, p: &Procedure) {
        debug!("Compiling procedure {}", p.name);
        if p.name == MAIN_PROC {
            mips! {(self.code) {
                @{MAIN_PROC}:
            }};
        }

        // Arguments are already on the stack, pushed by the caller
        let reserve = self.frame.size() - self.frame.arg_count() as i32 * WORD_SIZE;
        mips! {(self.code) {
            @{Emitter::proc_label(&p.name)}:
                li T0, reserve;
                sub Sp, Sp, T0;
        }};
        self.code.save_registers();
        mips! {(self.code) {
            mov Fp, Sp;
        }};

        self.statement(&p.body);

        // Falling off the end returns 0
        mips! {(self.code) {
            li T0, 0;
        }};
        self.epilogue();
    }

    /// Tears down the frame and returns the value in `$t0` to the caller on
    /// top of the stack.
    fn epilogue(&mut self) {
        self.code.restore_registers();
        mips! {(self.code) {
            li T1, self.frame.size();
            add Sp, Sp, T1;
        }};
        self.code.push_reg(T0);
        mips! {(self.code) {
            jr Ra;
        }};
    }

    fn statement(&mut self, stm: &Statement) {
        match stm {
            Statement::Declare(..) => (),
            Statement::Assign(_, LValue::Variable(id), value) => {
                self.expression(value);
                self.code.pop_reg(S0);
                let addr = self.variable(id);
                mips! {(self.code) {
                    sw S0, addr;
                }};
            }
            Statement::Assign(_, LValue::Element(id, index), value) => {
                self.expression(index);
                self.expression(value);
                self.code.pop_reg(T1);
                self.code.pop_reg(T0);
                let addr = self.element(id, T2);
                mips! {(self.code) {
                    sw T1, addr;
                }};
            }
            Statement::Block(_, body) => {
                for s in body {
                    self.statement(s);
                }
            }
            Statement::If {
                cond,
                if_arm,
                else_arm: None,
                ..
            } => {
                let end = self.code.new_label();
                self.condition(cond, &end);
                self.statement(if_arm);
                mips! {(self.code) {
                    @{end}:
                }};
            }
            Statement::If {
                cond,
                if_arm,
                else_arm: Some(else_arm),
                ..
            } => {
                let else_lbl = self.code.new_label();
                let end = self.code.new_label();
                self.condition(cond, &else_lbl);
                self.statement(if_arm);
                mips! {(self.code) {
                        j end.clone();
                    @{else_lbl}:
                }};
                self.statement(else_arm);
                mips! {(self.code) {
                    @{end}:
                }};
            }
            Statement::While { cond, body, .. } => {
                let start = self.code.new_label();
                let end = self.code.new_label();
                mips! {(self.code) {
                    @{start.clone()}:
                }};
                self.condition(cond, &end);
                self.statement(body);
                mips! {(self.code) {
                        j start;
                    @{end}:
                }};
            }
            Statement::Output(_, value) => {
                self.expression(value);
                self.code.pop_reg(A0);
                self.code.print_int();
            }
            Statement::Input(_, LValue::Variable(id)) => {
                self.code.read_int();
                let addr = self.variable(id);
                mips! {(self.code) {
                    sw V0, addr;
                }};
            }
            Statement::Input(_, LValue::Element(id, index)) => {
                // $v0 must hold the input until the store
                self.expression(index);
                self.code.read_int();
                self.code.pop_reg(T0);
                let addr = self.element(id, T2);
                mips! {(self.code) {
                    sw V0, addr;
                }};
            }
            Statement::Return(_, value) => {
                self.expression(value);
                self.code.pop_reg(T0);
                self.epilogue();
            }
            Statement::Call(_, id, args) => {
                self.call(id, args);
                self.code.pop_reg(T0);
            }
        }
    }

    /// Evaluates `cond` and branches to `on_false` if it is 0.
    fn condition(&mut self, cond: &Expression, on_false: &str) {
        self.expression(cond);
        self.code.pop_reg(S0);
        mips! {(self.code) {
            beqz S0, on_false.into();
        }};
    }

    fn expression(&mut self, exp: &Expression) {
        match exp {
            Expression::Integer(_, v) => {
                mips! {(self.code) {
                    li S0, *v;
                }};
                self.code.push_reg(S0);
            }
            Expression::Boolean(_, b) => {
                mips! {(self.code) {
                    li S0, *b as i32;
                }};
                self.code.push_reg(S0);
            }
            Expression::Identifier(_, id) => {
                let addr = self.variable(id);
                mips! {(self.code) {
                    lw T0, addr;
                }};
                self.code.push_reg(T0);
            }
            Expression::ArrayAt(_, id, index) => {
                self.expression(index);
                self.code.pop_reg(T0);
                let addr = self.element(id, T1);
                mips! {(self.code) {
                    lw T1, addr;
                }};
                self.code.push_reg(T1);
            }
            Expression::RoutineCall(_, id, args) => self.call(id, args),
            Expression::BinaryOp(_, BinaryOperator::BAnd, left, right) => {
                self.short_circuit(left, right, false)
            }
            Expression::BinaryOp(_, BinaryOperator::BOr, left, right) => {
                self.short_circuit(left, right, true)
            }
            Expression::BinaryOp(_, op, left, right) => {
                // `l > r` is computed as `r < l` and `l >= r` as `r <= l`, so the
                // right operand is evaluated first
                let (first, second) = match op {
                    BinaryOperator::Gr | BinaryOperator::GrEq => (right, left),
                    _ => (left, right),
                };
                self.expression(first);
                self.expression(second);
                self.code.pop_reg(T1);
                self.code.pop_reg(T0);
                self.code.push(operator(*op)(S0, T0, T1));
                self.code.push_reg(S0);
            }
            Expression::UnaryOp(_, UnaryOperator::Not, operand) => {
                let end = self.code.new_label();
                self.expression(operand);
                self.code.pop_reg(T0);
                mips! {(self.code) {
                        li S0, 0;
                        bnez T0, end.clone();
                        li S0, 1;
                    @{end}:
                }};
                self.code.push_reg(S0);
            }
        }
    }

    /// Generates `and` (when `decided_by` is false) or `or` (when it is true).
    /// The right operand is only evaluated when the left operand does not equal
    /// `decided_by`, and `$s0` is set to exactly 0 or 1 on every path before
    /// it is pushed.
    fn short_circuit(&mut self, left: &Expression, right: &Expression, decided_by: bool) {
        let decided = self.code.new_label();
        let end = self.code.new_label();
        let branch: fn(Register, String) -> Inst = if decided_by {
            Inst::Bnez
        } else {
            Inst::Beqz
        };

        self.expression(left);
        self.code.pop_reg(T0);
        self.code.push(branch(T0, decided.clone()));
        self.expression(right);
        self.code.pop_reg(T0);
        self.code.push(branch(T0, decided.clone()));
        mips! {(self.code) {
                li S0, !decided_by as i32;
                j end.clone();
            @{decided}:
                li S0, decided_by as i32;
            @{end}:
        }};
        self.code.push_reg(S0);
    }

    /// Pushes each argument, left to right, and jumps to the procedure.  The
    /// callee leaves its result on the stack.
    fn call(&mut self, id: &str, args: &[Expression]) {
        for a in args {
            self.expression(a);
        }
        mips! {(self.code) {
            jal Emitter::proc_label(id);
        }};
    }

    /// The address of the single word variable `id`.
    fn variable(&self, id: &str) -> Address {
        if self.tables.is_global(id) {
            Address::Label(Emitter::global_label(id))
        } else {
            Address::Offset(self.offset(id), Fp)
        }
    }

    /// Scales the index in `$t0` to bytes, using `tmp` as scratch, and returns
    /// the address of that element of the array `id`.
    fn element(&mut self, id: &str, tmp: Register) -> Address {
        mips! {(self.code) {
            li tmp, WORD_SIZE;
            mul T0, T0, tmp;
        }};

        if self.tables.is_global(id) {
            Address::Indexed(Emitter::global_label(id), T0)
        } else {
            let offset = self.offset(id);
            mips! {(self.code) {
                li T4, offset;
                add T4, T4, T0;
                add T4, T4, Fp;
            }};
            Address::Indirect(T4)
        }
    }

    fn offset(&self, id: &str) -> i32 {
        match self.frame.lookup(id) {
            Some(offset) => offset,
            None => panic!("{} has no slot in the frame of {}", id, self.name),
        }
    }
}

fn operator(op: BinaryOperator) -> fn(Register, Register, Register) -> Inst {
    use BinaryOperator::*;
    match op {
        Add => Inst::Add,
        Sub => Inst::Sub,
        Mul => Inst::Mul,
        Div => Inst::Div,
        Mod => Inst::Rem,
        Ls => Inst::Slt,
        LsEq => Inst::Sle,
        Eq => Inst::Seq,
        Gr => Inst::Slt,
        GrEq => Inst::Sle,
        BAnd | BOr => panic!("{} is short circuited and has no single instruction", op),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{
        lexer::{lexer::Lexer, tokens::Token},
        parser::parse,
        semantics::analyze,
    };

    fn parse_text(text: &str) -> Program {
        let tokens: Vec<Token> = Lexer::new(text)
            .tokenize()
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        parse(&tokens).unwrap()
    }

    fn compile_text(text: &str) -> Compiler {
        let program = parse_text(text);
        let tables = analyze(&program).unwrap();
        Compiler::compile(&program, &tables)
    }

    fn asm(compiler: &Compiler) -> String {
        let mut out = vec![];
        compiler.print(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Generates the code for `exp` alone, using the globals in `decls`.
    fn expression_code(decls: &str, exp: &str) -> Vec<Inst> {
        let tables = analyze(&parse_text(&format!(
            "{} procedure int main() return 0;",
            decls
        )))
        .unwrap();
        let program = parse_text(&format!("procedure int main() return {};", exp));
        let exp = match &program.procedures[0].body {
            Statement::Return(_, e) => e.clone(),
            s => panic!("Expected return, got {:?}", s),
        };

        let mut code = Emitter::new();
        let mut pc = ProcedureCompiler {
            name: MAIN_PROC,
            tables: &tables,
            frame: tables.get_procedure(MAIN_PROC).unwrap(),
            code: &mut code,
        };
        pc.expression(&exp);
        code.instructions().to_vec()
    }

    fn statement_code(body: &str) -> Vec<Inst> {
        let program = parse_text(&format!(
            "var int g; var int ga[4]; procedure int main() {}",
            body
        ));
        let tables = analyze(&program).unwrap();

        let mut code = Emitter::new();
        let mut pc = ProcedureCompiler {
            name: MAIN_PROC,
            tables: &tables,
            frame: tables.get_procedure(MAIN_PROC).unwrap(),
            code: &mut code,
        };
        match &program.procedures[0].body {
            Statement::Block(_, body) => {
                for s in body {
                    pc.statement(s);
                }
            }
            s => pc.statement(s),
        }
        code.instructions().to_vec()
    }

    fn stack_effect(code: &[Inst]) -> i32 {
        code.iter().map(|i| i.stack_effect()).sum()
    }

    #[test]
    fn test_expressions_push_one_word() {
        for exp in vec![
            "1",
            "true",
            "g",
            "ga[2]",
            "1 + 2",
            "10 - 3 - 2",
            "g * ga[g] / 2 % 3",
            "(1 < 2) and (3 >= 4)",
            "(1 = 2) or not (g > 4)",
            "not (true)",
            "((g <= 1) and true) or false",
        ] {
            let code = expression_code("var int g; var int ga[4];", exp);
            assert_eq!(stack_effect(&code), -WORD_SIZE, "{}", exp);
        }
    }

    #[test]
    fn test_statements_leave_stack_unchanged() {
        for body in vec![
            "{ int x; x := 1 + 2; }",
            "{ int a[3]; a[1] := 2; }",
            "{ ga[1 + 1] := g; }",
            "{ g := ga[0]; }",
            "{ output(g * 2); }",
            "{ input(g); }",
            "{ int a[2]; input(a[1]); }",
            "{ if (g < 1) g := 1; endif }",
            "{ if (g < 1) g := 1; else g := 2; endif }",
            "{ while (g < 10) g := g + 1; }",
            "{ { int x; x := g; output(x); } }",
        ] {
            let code = statement_code(body);
            assert_eq!(stack_effect(&code), 0, "{}", body);
        }
    }

    #[test]
    fn test_subtraction_operand_order() {
        let code = expression_code("", "7 - 2");
        let tail: Vec<_> = code.iter().skip(code.len() - 7).cloned().collect();
        assert_eq!(
            tail,
            vec![
                Inst::Lw(T1, Address::Offset(4, Sp)),
                Inst::AddI(Sp, Sp, 4),
                Inst::Lw(T0, Address::Offset(4, Sp)),
                Inst::AddI(Sp, Sp, 4),
                Inst::Sub(S0, T0, T1),
                Inst::SubI(Sp, Sp, 4),
                Inst::Sw(S0, Address::Offset(4, Sp)),
            ]
        );

        // 7 is evaluated before 2
        assert_eq!(code[0], Inst::Li(S0, 7));
        assert_eq!(code[3], Inst::Li(S0, 2));
    }

    #[test]
    fn test_comparison_instructions() {
        for (exp, expected) in vec![
            ("1 < 2", Inst::Slt(S0, T0, T1)),
            ("1 <= 2", Inst::Sle(S0, T0, T1)),
            ("1 = 2", Inst::Seq(S0, T0, T1)),
            ("1 % 2", Inst::Rem(S0, T0, T1)),
            ("1 / 2", Inst::Div(S0, T0, T1)),
        ] {
            let code = expression_code("", exp);
            assert!(code.contains(&expected), "{}", exp);
        }
    }

    #[test]
    fn test_greater_than_swaps_operands() {
        for (exp, expected) in vec![
            ("1 > 2", Inst::Slt(S0, T0, T1)),
            ("1 >= 2", Inst::Sle(S0, T0, T1)),
        ] {
            let code = expression_code("", exp);
            // 2 is evaluated before 1 and ends up in $t0
            assert_eq!(code[0], Inst::Li(S0, 2), "{}", exp);
            assert_eq!(code[3], Inst::Li(S0, 1), "{}", exp);
            assert!(code.contains(&expected), "{}", exp);
        }
    }

    #[test]
    fn test_greater_than_calls_right_operand_first() {
        let text = asm(&compile_text(
            "procedure int f() { int x; input(x); return x; }
            procedure int g() { output(2); return 2; }
            procedure int main() {
                if (f() > g()) output(1); endif
                if (f() >= g()) output(1); endif
                return 0;
            }",
        ));
        let main = &text[text.find("\nproc_main:\n").unwrap()..];
        let calls: Vec<_> = main
            .lines()
            .filter(|l| l.starts_with("\tjal\t"))
            .collect();
        assert_eq!(
            calls,
            vec!["\tjal\tproc_g", "\tjal\tproc_f", "\tjal\tproc_g", "\tjal\tproc_f"]
        );
    }

    #[test]
    fn test_and_short_circuits() {
        let code = expression_code("var int g;", "false and (g < 1)");
        // left operand, then the branch that skips the right operand
        assert_eq!(code[0], Inst::Li(S0, 0));
        let branch = code
            .iter()
            .position(|i| matches!(i, Inst::Beqz(T0, _)))
            .unwrap();
        let decided = match &code[branch] {
            Inst::Beqz(_, lbl) => lbl.clone(),
            _ => unreachable!(),
        };

        // the right operand lies between the branch and the decided label
        let target = code
            .iter()
            .position(|i| *i == Inst::Label(decided.clone()))
            .unwrap();
        let right = code[branch..target]
            .iter()
            .position(|i| *i == Inst::Lw(T0, Address::Label("g_".into())));
        assert!(right.is_some());

        // both paths force $s0 to 0 or 1
        assert_eq!(code[target + 1], Inst::Li(S0, 0));
        assert!(code[branch..target].contains(&Inst::Li(S0, 1)));
    }

    #[test]
    fn test_or_short_circuits() {
        let code = expression_code("var int g;", "true or (g < 1)");
        let branch = code
            .iter()
            .position(|i| matches!(i, Inst::Bnez(T0, _)))
            .unwrap();
        let decided = match &code[branch] {
            Inst::Bnez(_, lbl) => lbl.clone(),
            _ => unreachable!(),
        };
        let target = code
            .iter()
            .position(|i| *i == Inst::Label(decided.clone()))
            .unwrap();
        assert_eq!(code[target + 1], Inst::Li(S0, 1));
        assert!(code[branch..target].contains(&Inst::Li(S0, 0)));
    }

    #[test]
    fn test_not() {
        let code = expression_code("", "not (true)");
        let tail: Vec<_> = code.iter().skip(3).cloned().collect();
        assert_eq!(
            tail,
            vec![
                Inst::Lw(T0, Address::Offset(4, Sp)),
                Inst::AddI(Sp, Sp, 4),
                Inst::Li(S0, 0),
                Inst::Bnez(T0, "label0".into()),
                Inst::Li(S0, 1),
                Inst::Label("label0".into()),
                Inst::SubI(Sp, Sp, 4),
                Inst::Sw(S0, Address::Offset(4, Sp)),
            ]
        );
    }

    #[test]
    fn test_local_array_store() {
        let code = statement_code("{ int a[10]; a[2] := 5; }");
        let store = code.iter().skip_while(|i| **i != Inst::Li(T2, 4));
        let store: Vec<_> = store.cloned().collect();
        let offset = 44;
        assert_eq!(
            store,
            vec![
                Inst::Li(T2, 4),
                Inst::Mul(T0, T0, T2),
                Inst::Li(T4, offset),
                Inst::Add(T4, T4, T0),
                Inst::Add(T4, T4, Fp),
                Inst::Sw(T1, Address::Indirect(T4)),
            ]
        );
    }

    #[test]
    fn test_global_array_store() {
        let code = statement_code("{ ga[2] := 5; }");
        assert_eq!(
            &code[code.len() - 3..],
            &[
                Inst::Li(T2, 4),
                Inst::Mul(T0, T0, T2),
                Inst::Sw(T1, Address::Indexed("ga_".into(), T0)),
            ]
        );
    }

    #[test]
    fn test_data_section() {
        let compiler = compile_text(
            "var int x; var int a[10]; var int b;
            procedure int main() return 0;",
        );
        let text = asm(&compiler);
        assert!(text.starts_with(".data\nx_:\t.word 0\na_:\t.word\t0:10\nb_:\t.word 0\n.text\n\t.globl\tmain\n"));
    }

    #[test]
    fn test_procedure_layout() {
        let compiler = compile_text(
            "procedure int f(int a) { int x; x := a; return x; }
            procedure int main() { output(f(3)); return 0; }",
        );
        let text = asm(&compiler);

        let f = text.find("\nproc_f:\n").unwrap();
        let main = text.find("\nmain:\n").unwrap();
        let proc_main = text.find("\nproc_main:\n").unwrap();
        assert!(f < main && main < proc_main);

        // f reserves room for x only, a was pushed by the caller
        assert!(text.contains("proc_f:\n\tli\t$t0, 4\n\tsub\t$sp, $sp, $t0\n\tsub\t$sp, $sp, 40\n"));
        // x := a
        assert!(text.contains("\tlw\t$t0, 48($fp)\n"));
        assert!(text.contains("\tsw\t$s0, 44($fp)\n"));
        // the call pushes 3 and jumps
        assert!(text.contains("\tjal\tproc_f\n"));
        // returning releases the whole frame then pushes the result
        assert!(text.contains(
            "\tadd\t$sp, $sp, 40\n\tli\t$t1, 8\n\tadd\t$sp, $sp, $t1\n\tsub\t$sp, $sp, 4\n\tsw\t$t0, 4($sp)\n\tjr\t$ra\n"
        ));
    }

    #[test]
    fn test_implicit_return_zero() {
        let compiler = compile_text("procedure int main() { output(1); }");
        let code = compiler.instructions();
        let n = code.len();
        assert_eq!(code[n - 1], Inst::Jr(Ra));
        assert_eq!(code[n - 2], Inst::Sw(T0, Address::Offset(4, Sp)));
        assert!(code.contains(&Inst::Li(T0, 0)));
    }

    #[test]
    fn test_labels_are_distinct() {
        let compiler = compile_text(
            "var int g;
            procedure int main() {
                while (g < 3) { if (g = 1) output(g); else output(0); endif g := g + 1; }
                if ((g > 1) and not (g = 2)) output(1); endif
                return 0;
            }",
        );
        let mut labels: Vec<_> = compiler
            .instructions()
            .iter()
            .filter_map(|i| match i {
                Inst::Label(l) => Some(l.clone()),
                _ => None,
            })
            .collect();
        let count = labels.len();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), count);
    }
}
