use blaise_lang::compiler::{
    ast::Program,
    mips::{Inst, Register},
    semantics::SymbolTables,
    Compiler,
};
use blaise_lang::diagnostics::TracingConfig;
use blaise_lang::{
    analyze, compile_source, generate, parse_tokens, tables_to_json, tables_to_yaml, tokenize,
};

fn front_end(text: &str) -> (Program, SymbolTables) {
    let tokens = tokenize(text, TracingConfig::Off).unwrap();
    let program = parse_tokens(&tokens).unwrap();
    let tables = analyze(&program).unwrap();
    (program, tables)
}

fn lines(asm: &str) -> Vec<&str> {
    asm.lines().filter(|l| !l.is_empty()).collect()
}

/// Asserts that `expected` appears in `asm` as a contiguous run of lines.
fn assert_sequence(asm: &str, expected: &[&str]) {
    let actual = lines(asm);
    assert!(
        actual.windows(expected.len()).any(|w| w == expected),
        "Could not find:\n{}\nin:\n{}",
        expected.join("\n"),
        asm
    );
}

#[test]
fn test_assign_and_output_global() {
    let asm = compile_source(
        "var int x;
        procedure int main() {
            x := 3 + 4;
            output(x);
            return 0;
        }",
    )
    .unwrap();

    assert!(asm.starts_with(".data\nx_:\t.word 0\n.text\n\t.globl\tmain\n\nmain:\n\nproc_main:\n"));
    assert_sequence(
        &asm,
        &[
            "\tli\t$s0, 3",
            "\tsub\t$sp, $sp, 4",
            "\tsw\t$s0, 4($sp)",
            "\tli\t$s0, 4",
            "\tsub\t$sp, $sp, 4",
            "\tsw\t$s0, 4($sp)",
            "\tlw\t$t1, 4($sp)",
            "\tadd\t$sp, $sp, 4",
            "\tlw\t$t0, 4($sp)",
            "\tadd\t$sp, $sp, 4",
            "\tadd\t$s0, $t0, $t1",
            "\tsub\t$sp, $sp, 4",
            "\tsw\t$s0, 4($sp)",
            "\tlw\t$s0, 4($sp)",
            "\tadd\t$sp, $sp, 4",
            "\tsw\t$s0, x_",
        ],
    );
    assert_sequence(
        &asm,
        &[
            "\tlw\t$t0, x_",
            "\tsub\t$sp, $sp, 4",
            "\tsw\t$t0, 4($sp)",
            "\tlw\t$a0, 4($sp)",
            "\tadd\t$sp, $sp, 4",
            "\tli\t$v0, 1",
            "\tsyscall",
            "\tli\t$v0, 11",
            "\tli\t$a0, 10",
            "\tsyscall",
        ],
    );
}

#[test]
fn test_global_array_store() {
    let asm = compile_source(
        "var int a[10];
        procedure int main() { a[2] := 5; return 0; }",
    )
    .unwrap();

    assert!(asm.contains("a_:\t.word\t0:10\n"));
    assert_sequence(
        &asm,
        &[
            "\tlw\t$t1, 4($sp)",
            "\tadd\t$sp, $sp, 4",
            "\tlw\t$t0, 4($sp)",
            "\tadd\t$sp, $sp, 4",
            "\tli\t$t2, 4",
            "\tmul\t$t0, $t0, $t2",
            "\tsw\t$t1, a_($t0)",
        ],
    );
}

#[test]
fn test_local_array_store() {
    let asm = compile_source("procedure int main() { int a[10]; a[2] := 5; return 0; }").unwrap();

    // no globals
    assert!(asm.starts_with(".data\n.text\n"));
    assert_sequence(
        &asm,
        &[
            "\tli\t$t2, 4",
            "\tmul\t$t0, $t0, $t2",
            "\tli\t$t4, 44",
            "\tadd\t$t4, $t4, $t0",
            "\tadd\t$t4, $t4, $fp",
            "\tsw\t$t1, ($t4)",
        ],
    );
    // the frame holds the 10 words of the array
    assert_sequence(&asm, &["proc_main:", "\tli\t$t0, 40", "\tsub\t$sp, $sp, $t0"]);
}

#[test]
fn test_procedure_call() {
    let asm = compile_source(
        "procedure int sub(int a, int b) return a - b;
        procedure int main() { output(sub(7, 2)); return 0; }",
    )
    .unwrap();

    // arguments are already on the stack so only the locals are reserved
    assert_sequence(&asm, &["proc_sub:", "\tli\t$t0, 0", "\tsub\t$sp, $sp, $t0"]);
    assert_sequence(&asm, &["\tlw\t$t0, 48($fp)"]);
    assert_sequence(&asm, &["\tlw\t$t0, 44($fp)"]);
    assert_sequence(&asm, &["\tsub\t$s0, $t0, $t1"]);
    assert_sequence(
        &asm,
        &[
            "\tli\t$t1, 8",
            "\tadd\t$sp, $sp, $t1",
            "\tsub\t$sp, $sp, 4",
            "\tsw\t$t0, 4($sp)",
            "\tjr\t$ra",
        ],
    );
    assert_sequence(&asm, &["\tjal\tproc_sub", "\tlw\t$a0, 4($sp)"]);
}

#[test]
fn test_statements_leave_the_stack_balanced() {
    let (program, tables) = front_end(
        "var int g[4];
        procedure int main() {
            int i;
            int buf[3];
            i := 0;
            while ((i < 3) and not (i = 5)) {
                buf[i] := i * 2;
                input(g[i]);
                i := i + 1;
            }
            if (false or (buf[1] > 0)) output(buf[1]); else { int t; input(t); output(t % 2); } endif
        }",
    );
    let compiler = Compiler::compile(&program, &tables);
    let code = compiler.instructions();

    let main = code
        .iter()
        .position(|i| *i == Inst::Label("proc_main".into()))
        .unwrap();
    let start = main
        + code[main..]
            .iter()
            .position(|i| *i == Inst::Move(Register::Fp, Register::Sp))
            .unwrap();
    let end = code
        .iter()
        .rposition(|i| *i == Inst::Li(Register::T0, 0))
        .unwrap();
    assert!(start < end);

    let net: i32 = code[start..end].iter().map(|i| i.stack_effect()).sum();
    assert_eq!(net, 0);
}

#[test]
fn test_short_circuit_skips_the_right_operand() {
    let asm = compile_source(
        "procedure int f() { output(1); return 1; }
        procedure int main() {
            if ((0 < 1) or (f() = 1)) output(2); endif
            return 0;
        }",
    )
    .unwrap();

    let asm_lines = lines(&asm);
    let branch = asm_lines
        .iter()
        .position(|l| l.starts_with("\tbnez\t$t0, label"))
        .unwrap();
    let call = asm_lines
        .iter()
        .position(|l| *l == "\tjal\tproc_f")
        .unwrap();
    assert!(branch < call);
}

#[test]
fn test_stage_errors() {
    let err = compile_source("procedure int main() { return 0; } $").unwrap_err();
    assert!(err.starts_with("Lexer error @ L1:"), "{}", err);

    let err = compile_source("procedure int main() return 0").unwrap_err();
    assert!(err.starts_with("Parser error @ L1:"), "{}", err);

    let err = compile_source("procedure int main()\n return g(1);").unwrap_err();
    assert_eq!(err, "Semantic error @ L2: g has not yet been declared");

    let err = compile_source("procedure int f() return 0;").unwrap_err();
    assert_eq!(err, "Semantic error @ L1: must have main procedure");

    let err = compile_source("procedure int main() {\n int x;\n x := true;\n return x; }").unwrap_err();
    assert!(err.starts_with("Semantic error @ L3:"), "{}", err);
}

#[test]
fn test_tables_as_json() {
    let (_, tables) = front_end(
        "var int g;
        var int h[10];
        procedure int f(int a, int b) { int x; return a + b; }
        procedure int main() return f(1, 2);",
    );
    let json = tables_to_json(&tables).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["globals"]["g"], 1);
    assert_eq!(value["globals"]["h"], 10);
    assert_eq!(value["procedures"]["f"]["slots"]["a"]["offset"], 52);
    assert_eq!(value["procedures"]["f"]["slots"]["b"]["offset"], 48);
    assert_eq!(value["procedures"]["f"]["slots"]["x"]["offset"], 44);
    assert_eq!(value["procedures"]["f"]["args"][0], "a");
    assert!(value["procedures"]["main"].is_object());

    // declaration order is kept
    let g = json.find("\"g\"").unwrap();
    let h = json.find("\"h\"").unwrap();
    assert!(g < h);
}

#[test]
fn test_tables_as_yaml() {
    let (_, tables) = front_end(
        "var int y;
        procedure int main() { int i; return 0; }",
    );
    let yaml = tables_to_yaml(&tables).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

    assert_eq!(value["globals"]["y"].as_u64(), Some(1));
    assert_eq!(
        value["procedures"]["main"]["slots"]["i"]["offset"].as_i64(),
        Some(44)
    );
}

#[test]
fn test_generate_matches_compile_source() {
    let text = "var int x;
        procedure int main() { input(x); if (x > 3) output(x); endif return 0; }";
    let (program, tables) = front_end(text);
    assert_eq!(generate(&program, &tables), compile_source(text));
}

#[test]
fn test_oversized_frames_are_rejected() {
    let err = compile_source("procedure int main() {\n int a[600000000];\n return 0; }").unwrap_err();
    assert_eq!(
        err,
        "Semantic error @ L2: declaring a makes the stack frame too large"
    );

    let err = compile_source(
        "procedure int main() {\n int a[300000000];\n int b[300000000];\n return 0; }",
    )
    .unwrap_err();
    assert!(err.starts_with("Semantic error @ L3:"), "{}", err);

    // globals live in the data section and are not bounded by the frame
    let asm = compile_source("var int big[600000000];\nprocedure int main() return 0;").unwrap();
    assert!(asm.contains("big_:\t.word\t0:600000000\n"));
}

#[test]
fn test_greater_than_evaluates_right_operand_first() {
    let asm = compile_source(
        "procedure int f() { int x; input(x); return x; }
        procedure int g() { int y; input(y); return y; }
        procedure int main() {
            if (f() > g()) output(1); endif
            return 0;
        }",
    )
    .unwrap();

    assert_sequence(
        &asm,
        &[
            "\tjal\tproc_g",
            "\tjal\tproc_f",
            "\tlw\t$t1, 4($sp)",
            "\tadd\t$sp, $sp, 4",
            "\tlw\t$t0, 4($sp)",
            "\tadd\t$sp, $sp, 4",
            "\tslt\t$s0, $t0, $t1",
        ],
    );
}
