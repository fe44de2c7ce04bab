use crate::compiler::{
    ast::*,
    lexer::tokens::Lex,
};

use super::expression::{argument_list, expression};
use super::parser::array_size;
use super::tokenstream::TokenStream;
use super::{ParserError, ParserResult};

pub(super) fn statement(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let line = stream.line();
    let found = stream.peek_lex();
    let stm = match found {
        Some(Lex::Identifier(_)) => id_instruction(stream)?,
        Some(Lex::If) => if_instruction(stream)?,
        Some(Lex::While) => while_instruction(stream)?,
        Some(Lex::Output) => output_instruction(stream)?,
        Some(Lex::Input) => input_instruction(stream)?,
        Some(Lex::LBrace) => block(stream)?,
        Some(Lex::Return) => return_instruction(stream)?,
        Some(Lex::Int) => declaration(stream)?,
        _ => return err!(line, ParserError::ExpectedInstruction(found)),
    };
    Ok(stm)
}

/// Parses the instructions that start with an identifier: a procedure call or an
/// assignment to a variable or array element.
fn id_instruction(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let (line, id) = stream.next_must_be_id()?;

    let stm = if stream.test_if(&Lex::LParen) {
        let args = argument_list(stream)?;
        Statement::Call(line, id, args)
    } else {
        let target = lvalue_suffix(stream, id)?;
        if !stream.test_if(&Lex::Assign) {
            return err!(
                stream.line(),
                ParserError::ExpectedAssignOrCall(stream.peek_lex())
            );
        }
        stream.next_must_be(&Lex::Assign)?;
        let value = expression(stream)?;
        Statement::Assign(line, target, value)
    };
    stream.next_must_be(&Lex::Semicolon)?;

    Ok(stm)
}

/// Parses the optional `[ EXPRESSION ]` that follows the identifier being
/// written to.
fn lvalue_suffix(stream: &mut TokenStream, id: String) -> ParserResult<LValue> {
    trace!(stream);
    if stream.next_if(&Lex::LBracket).is_some() {
        let index = expression(stream)?;
        stream.next_must_be(&Lex::RBracket)?;
        Ok(LValue::Element(id, Box::new(index)))
    } else {
        Ok(LValue::Variable(id))
    }
}

fn condition(stream: &mut TokenStream) -> ParserResult<Expression> {
    stream.next_must_be(&Lex::LParen)?;
    let cond = expression(stream)?;
    stream.next_must_be(&Lex::RParen)?;
    Ok(cond)
}

fn if_instruction(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let line = stream.next_must_be(&Lex::If)?.l;
    let cond = condition(stream)?;
    let if_arm = statement(stream)?;

    let else_arm = if stream.next_if(&Lex::Else).is_some() {
        Some(Box::new(statement(stream)?))
    } else if stream.test_if(&Lex::Endif) {
        None
    } else {
        return err!(
            stream.line(),
            ParserError::ExpectedElseOrEndif(stream.peek_lex())
        );
    };
    stream.next_must_be(&Lex::Endif)?;

    Ok(Statement::If {
        annotation: line,
        cond,
        if_arm: Box::new(if_arm),
        else_arm,
    })
}

fn while_instruction(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let line = stream.next_must_be(&Lex::While)?.l;
    let cond = condition(stream)?;
    let body = statement(stream)?;

    Ok(Statement::While {
        annotation: line,
        cond,
        body: Box::new(body),
    })
}

fn output_instruction(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let line = stream.next_must_be(&Lex::Output)?.l;
    let value = condition(stream)?;
    stream.next_must_be(&Lex::Semicolon)?;
    Ok(Statement::Output(line, value))
}

fn input_instruction(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let line = stream.next_must_be(&Lex::Input)?.l;
    stream.next_must_be(&Lex::LParen)?;
    let (_, id) = stream.next_must_be_id()?;
    let target = lvalue_suffix(stream, id)?;
    stream.next_must_be(&Lex::RParen)?;
    stream.next_must_be(&Lex::Semicolon)?;
    Ok(Statement::Input(line, target))
}

fn block(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let line = stream.next_must_be(&Lex::LBrace)?.l;
    let mut body = vec![];
    while !stream.test_if(&Lex::RBrace) {
        if stream.peek().is_none() {
            return err!(
                stream.line(),
                ParserError::ExpectedButFound(vec![Lex::RBrace], None)
            );
        }
        body.push(statement(stream)?);
    }
    stream.next_must_be(&Lex::RBrace)?;
    Ok(Statement::Block(line, body))
}

fn return_instruction(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let line = stream.next_must_be(&Lex::Return)?.l;
    let value = expression(stream)?;
    stream.next_must_be(&Lex::Semicolon)?;
    Ok(Statement::Return(line, value))
}

fn declaration(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let line = stream.next_must_be(&Lex::Int)?.l;
    let (_, id) = stream.next_must_be_id()?;
    let shape = array_size(stream)?;
    stream.next_must_be(&Lex::Semicolon)?;
    Ok(Statement::Declare(line, id, shape))
}
