use log::debug;

use crate::compiler::{
    ast::*,
    lexer::tokens::{Lex, Token},
};

use super::statement::statement;
use super::tokenstream::TokenStream;
use super::{ParserError, ParserResult};

/*
    Grammar
    PROGRAM := VAR_DECL* PROCEDURE+
    VAR_DECL := var int IDENTIFIER [LBRACKET INTEGER RBRACKET] SEMICOLON
    PROCEDURE := procedure int IDENTIFIER LPAREN [PARAM [, PARAM]*] RPAREN INSTR
    PARAM := int IDENTIFIER
    INSTR := IDENTIFIER LPAREN [EXPRESSION [, EXPRESSION]*] RPAREN SEMICOLON
           | IDENTIFIER [LBRACKET EXPRESSION RBRACKET] ASSIGN EXPRESSION SEMICOLON
           | if LPAREN EXPRESSION RPAREN INSTR [else INSTR] endif
           | while LPAREN EXPRESSION RPAREN INSTR
           | output LPAREN EXPRESSION RPAREN SEMICOLON
           | input LPAREN IDENTIFIER [LBRACKET EXPRESSION RBRACKET] RPAREN SEMICOLON
           | LBRACE INSTR* RBRACE
           | return EXPRESSION SEMICOLON
           | int IDENTIFIER [LBRACKET INTEGER RBRACKET] SEMICOLON
    FACTOR := true | false | LPAREN EXPRESSION RPAREN | not LPAREN EXPRESSION RPAREN
            | INTEGER | IDENTIFIER LPAREN [EXPRESSION [, EXPRESSION]*] RPAREN
            | IDENTIFIER LBRACKET EXPRESSION RBRACKET | IDENTIFIER
    EXPRESSION := FACTOR [OPERATOR EXPRESSION]
    OPERATOR := + | - | * | / | % | < | <= | > | >= | = | and | or

    Every binary operator has the same precedence and the right hand side
    nests: `1 - 2 - 3` is `1 - (2 - 3)`.
*/

/// Parses a full token stream into a [`Program`].
pub fn parse(tokens: &[Token]) -> ParserResult<Program> {
    let mut stream = TokenStream::new(tokens);
    if stream.peek().is_none() {
        return err!(1, ParserError::EmptyProgram);
    }

    let mut program = Program::new();
    while let Some(v) = var_decl(&mut stream)? {
        debug!("Parsed global {}", v.name);
        program.globals.push(v);
    }

    if !stream.test_if(&Lex::Procedure) {
        return err!(
            stream.line(),
            ParserError::ExpectedVarOrProcedure(stream.peek_lex())
        );
    }

    while let Some(p) = procedure_def(&mut stream)? {
        debug!("Parsed procedure {}", p.name);
        program.procedures.push(p);
    }

    if stream.peek().is_some() {
        return err!(
            stream.line(),
            ParserError::ExpectedProcedure(stream.peek_lex())
        );
    }

    Ok(program)
}

fn var_decl(stream: &mut TokenStream) -> ParserResult<Option<VarDecl>> {
    trace!(stream);
    let line = match stream.next_if(&Lex::Var) {
        Some(t) => t.l,
        None => return Ok(None),
    };

    stream.next_must_be(&Lex::Int)?;
    let (_, id) = stream.next_must_be_id()?;
    let shape = array_size(stream)?;
    stream.next_must_be(&Lex::Semicolon)?;

    Ok(Some(VarDecl::new(line, &id, shape)))
}

/// Parses the optional `[ INTEGER ]` suffix of a declaration.
pub(super) fn array_size(stream: &mut TokenStream) -> ParserResult<Shape> {
    trace!(stream);
    if stream.next_if(&Lex::LBracket).is_none() {
        return Ok(Shape::Single);
    }

    let line = stream.line();
    let found = stream.peek_lex();
    let size = match stream.next_if_integer() {
        Some((_, size)) if size > 0 => size,
        Some((_, size)) => return err!(line, ParserError::InvalidArraySize(size)),
        None => return err!(line, ParserError::ExpectedArraySize(found)),
    };
    stream.next_must_be(&Lex::RBracket)?;

    Ok(Shape::Array(size as u32))
}

fn procedure_def(stream: &mut TokenStream) -> ParserResult<Option<Procedure>> {
    trace!(stream);
    let line = match stream.next_if(&Lex::Procedure) {
        Some(t) => t.l,
        None => return Ok(None),
    };

    stream.next_must_be(&Lex::Int)?;
    let (_, name) = stream.next_must_be_id()?;
    let params = parameter_list(stream)?;
    let body = statement(stream)?;

    Ok(Some(Procedure::new(line, &name, params, body)))
}

fn parameter_list(stream: &mut TokenStream) -> ParserResult<Vec<Parameter>> {
    trace!(stream);
    stream.next_must_be(&Lex::LParen)?;

    let mut params = vec![];
    if stream.next_if(&Lex::RParen).is_some() {
        return Ok(params);
    }

    loop {
        let int = stream.next_must_be(&Lex::Int)?;
        let (_, id) = stream.next_must_be_id()?;
        params.push(Parameter::new(int.l, &id));

        if stream.next_if(&Lex::Comma).is_none() {
            break;
        }
    }
    stream.next_must_be(&Lex::RParen)?;

    Ok(params)
}
