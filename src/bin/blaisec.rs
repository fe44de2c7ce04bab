extern crate log;
extern crate simplelog;

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use blaise_lang::compiler::ast::{print_graphviz, print_tree};
use blaise_lang::compiler::{parser, Compiler};
use blaise_lang::*;

fn main() -> Result<(), i32> {
    let config = configure_cli().get_matches();

    if let Some(level) = get_log_level(&config) {
        if let Err(msg) = configure_logging(level) {
            eprintln!("Failed to configure logger: {}", msg);
        }
    }

    let stop_stage = get_stage(&config).map_err(|msg| usage_err(&msg))?;
    let emit = get_emit(&config).map_err(|msg| usage_err(&msg))?;
    let lexer_tracing = get_lexer_tracing(&config).map_err(|msg| usage_err(&msg))?;
    parser::set_tracing(get_parser_tracing(&config).map_err(|msg| usage_err(&msg))?);

    let input = match config.value_of("input") {
        Some(input) => input,
        None => return Err(usage_err("Expected an input source file to compile")),
    };
    let text = std::fs::read_to_string(input).map_err(|e| {
        print_errs(&[format!("Could not read {}: {}", input, e)]);
        ERR_IO
    })?;

    let tokenize_time = Instant::now();
    let tokens = match tokenize(&text, lexer_tracing) {
        Ok(tokens) => tokens,
        Err(errs) => {
            print_errs(&errs);
            return Err(ERR_LEXER_ERROR);
        }
    };
    eprintln!("Lexer: {}", tokenize_time.elapsed().as_secs_f32());

    if stop_stage == Some(Stage::Lexer) {
        return Ok(());
    }

    let parse_time = Instant::now();
    let program = match parse_tokens(&tokens) {
        Ok(program) => program,
        Err(msg) => {
            print_errs(&[msg]);
            return Err(ERR_PARSER_ERROR);
        }
    };
    if program.procedures.is_empty() {
        print_errs(&["No procedures were parsed".into()]);
        return Err(ERR_NO_AST);
    }
    eprintln!("Parser: {}", parse_time.elapsed().as_secs_f32());

    let output_target = get_output(&config);
    match emit {
        Emit::Ast => return write_output(output_target, |out| print_tree(&program, out)),
        Emit::Dot => return write_output(output_target, |out| print_graphviz(&program, out)),
        _ => (),
    }

    if stop_stage == Some(Stage::Parser) {
        return Ok(());
    }

    let semantic_time = Instant::now();
    let tables = match analyze(&program) {
        Ok(tables) => tables,
        Err(msg) => {
            print_errs(&[msg]);
            return Err(ERR_TYPE_CHECK);
        }
    };
    eprintln!("Semantic: {}", semantic_time.elapsed().as_secs_f32());

    match emit {
        Emit::TablesJson | Emit::TablesYaml => {
            let text = match emit {
                Emit::TablesJson => tables_to_json(&tables),
                _ => tables_to_yaml(&tables),
            }
            .map_err(|msg| {
                print_errs(&[msg]);
                ERR_CODEGEN_WRITE
            })?;
            return write_output(output_target, |out| writeln!(out, "{}", text));
        }
        _ => (),
    }

    if stop_stage == Some(Stage::Semantic) {
        return Ok(());
    }

    let codegen_time = Instant::now();
    let compiler = Compiler::compile(&program, &tables);
    write_output(output_target, |out| compiler.print(out))?;
    eprintln!("Codegen: {}", codegen_time.elapsed().as_secs_f32());

    Ok(())
}

fn usage_err(msg: &str) -> i32 {
    print_errs(&[msg.into()]);
    ERR_IO
}

/// Creates the output file, along with any missing parent directories, and
/// hands it to `write`.
fn write_output<F>(target: &str, write: F) -> Result<(), i32>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let path = Path::new(target);
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| {
                print_errs(&[format!("Could not create {}: {}", dir.display(), e)]);
                ERR_IO
            })?;
        }
    }

    let mut file = File::create(path).map_err(|e| {
        print_errs(&[format!("Could not create {}: {}", target, e)]);
        ERR_IO
    })?;
    write(&mut file).map_err(|e| {
        print_errs(&[format!("Failed to write {}: {}", target, e)]);
        ERR_CODEGEN_WRITE
    })
}
