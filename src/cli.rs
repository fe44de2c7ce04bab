use std::str::FromStr;

use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::diagnostics::config::TracingConfig;

// Exit Codes for different types of errors
pub const ERR_TYPE_CHECK: i32 = 1;
pub const ERR_NO_AST: i32 = 2;
pub const ERR_PARSER_ERROR: i32 = 3;
pub const ERR_CODEGEN_WRITE: i32 = 4;
pub const ERR_LEXER_ERROR: i32 = 5;
pub const ERR_IO: i32 = 6;

pub const DEFAULT_OUTPUT: &str = "./target/output.s";

pub fn print_errs(errs: &[String]) {
    for e in errs {
        println!("{}", e);
    }
}

pub fn configure_cli() -> clap::App<'static, 'static> {
    let app = App::new("Blaise Compiler")
        .version("0.1.0")
        .about("Compiles Blaise source files into MIPS assembly for the SPIM simulator")
        .arg(
            Arg::with_name("input")
                .short("i")
                .long("input")
                .takes_value(true)
                .required(true)
                .help("Source code file to compile"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(false)
                .help("Name the output file that the assembly will be written to. Defaults to ./target/output.s"),
        )
        .arg(
            Arg::with_name("stage")
                .long("stage")
                .possible_values(&["lexer", "parser", "semantic"])
                .takes_value(true)
                .help("Stop compilation after the given stage has completed")
        )
        .arg(
            Arg::with_name("emit")
                .long("emit")
                .possible_values(&["asm", "ast", "dot", "tables-json", "tables-yaml"])
                .takes_value(true)
                .help("Selects what is written to the output: the assembly (default), the syntax tree as indented text or as a Graphviz digraph, or the symbol tables as JSON or YAML")
        )
        .arg(
            Arg::with_name("log")
                .long("log")
                .possible_values(&["error", "warn", "info", "debug", "trace"])
                .takes_value(true)
                .help("Sets the level of log messages written to the terminal")
        )
        .arg(
            Arg::with_name("trace-lexer")
                .long("trace-lexer")
                .takes_value(true)
                .help("Prints out a trace of all the steps the lexer follows as it converts the source text into tokens.
                Accepts all, off, N, N:M, ..N, or N.. to select the source lines that are traced.")
        )
        .arg(
            Arg::with_name("trace-parser")
                .long("trace-parser")
                .takes_value(true)
                .help("Prints out a trace of all the steps the parser follows as it converts the token vector into an AST.  The current token is printed next to the step.
                Accepts all, off, N, N:M, ..N, or N.. to select the source lines that are traced.")
        );
    app
}

/// The stage after which compilation stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    Lexer,
    Parser,
    Semantic,
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexer" => Ok(Stage::Lexer),
            "parser" => Ok(Stage::Parser),
            "semantic" => Ok(Stage::Semantic),
            _ => Err(format!("Unknown stage: {}", s)),
        }
    }
}

pub fn get_stage(args: &ArgMatches) -> Result<Option<Stage>, String> {
    args.value_of("stage").map(|s| s.parse()).transpose()
}

/// What the compiler writes to its output file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emit {
    Asm,
    Ast,
    Dot,
    TablesJson,
    TablesYaml,
}

impl FromStr for Emit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asm" => Ok(Emit::Asm),
            "ast" => Ok(Emit::Ast),
            "dot" => Ok(Emit::Dot),
            "tables-json" => Ok(Emit::TablesJson),
            "tables-yaml" => Ok(Emit::TablesYaml),
            _ => Err(format!("Unknown emit format: {}", s)),
        }
    }
}

pub fn get_emit(args: &ArgMatches) -> Result<Emit, String> {
    args.value_of("emit").map_or(Ok(Emit::Asm), |s| s.parse())
}

pub fn get_output<'a>(args: &'a ArgMatches) -> &'a str {
    args.value_of("output").unwrap_or(DEFAULT_OUTPUT)
}

pub fn get_log_level(args: &ArgMatches) -> Option<LevelFilter> {
    match args.value_of("log")? {
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

pub fn configure_logging(level: LevelFilter) -> Result<(), String> {
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .map_err(|e| format!("{}", e))
}

fn get_tracing(args: &ArgMatches, name: &str) -> Result<TracingConfig, String> {
    args.value_of(name)
        .map_or(Ok(TracingConfig::Off), TracingConfig::from_str)
}

pub fn get_lexer_tracing(args: &ArgMatches) -> Result<TracingConfig, String> {
    get_tracing(args, "trace-lexer")
}

pub fn get_parser_tracing(args: &ArgMatches) -> Result<TracingConfig, String> {
    get_tracing(args, "trace-parser")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(args: &[&str]) -> ArgMatches<'static> {
        let mut argv = vec!["blaisec"];
        argv.extend_from_slice(args);
        configure_cli().get_matches_from_safe(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = matches(&["-i", "prog.bl"]);
        assert_eq!(args.value_of("input"), Some("prog.bl"));
        assert_eq!(get_output(&args), DEFAULT_OUTPUT);
        assert_eq!(get_stage(&args), Ok(None));
        assert_eq!(get_emit(&args), Ok(Emit::Asm));
        assert_eq!(get_log_level(&args), None);
        assert_eq!(get_lexer_tracing(&args), Ok(TracingConfig::Off));
        assert_eq!(get_parser_tracing(&args), Ok(TracingConfig::Off));
    }

    #[test]
    fn test_options() {
        let args = matches(&[
            "-i",
            "prog.bl",
            "-o",
            "out.s",
            "--stage",
            "parser",
            "--emit",
            "tables-yaml",
            "--log",
            "debug",
            "--trace-lexer",
            "2:5",
            "--trace-parser",
            "all",
        ]);
        assert_eq!(get_output(&args), "out.s");
        assert_eq!(get_stage(&args), Ok(Some(Stage::Parser)));
        assert_eq!(get_emit(&args), Ok(Emit::TablesYaml));
        assert_eq!(get_log_level(&args), Some(LevelFilter::Debug));
        assert_eq!(get_lexer_tracing(&args), Ok(TracingConfig::Between(2, 5)));
        assert_eq!(get_parser_tracing(&args), Ok(TracingConfig::All));
    }

    #[test]
    fn test_invalid_arguments() {
        let mut argv = vec!["blaisec"];
        assert!(configure_cli().get_matches_from_safe(argv.clone()).is_err());

        argv.extend_from_slice(&["-i", "prog.bl", "--stage", "codegen"]);
        assert!(configure_cli().get_matches_from_safe(argv).is_err());

        let args = matches(&["-i", "prog.bl", "--trace-lexer", "x"]);
        assert!(get_lexer_tracing(&args).is_err());
    }
}
