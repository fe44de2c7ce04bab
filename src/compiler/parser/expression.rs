use crate::compiler::{ast::*, lexer::tokens::Lex};

use super::tokenstream::TokenStream;
use super::{ParserError, ParserResult};

/// Parses a factor followed by an optional operator and right hand
/// expression.  There is no precedence between operators, the right hand
/// side always nests.
pub(super) fn expression(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    let left = factor(stream)?;

    let op_line = stream.line();
    match stream.peek_lex().and_then(|l| binary_operator(&l)) {
        Some(op) => {
            stream.next();
            let right = expression(stream)?;
            Ok(Expression::binary_op(op_line, op, left, right))
        }
        None => Ok(left),
    }
}

fn binary_operator(l: &Lex) -> Option<BinaryOperator> {
    let op = match l {
        Lex::Add => BinaryOperator::Add,
        Lex::Minus => BinaryOperator::Sub,
        Lex::Mul => BinaryOperator::Mul,
        Lex::Div => BinaryOperator::Div,
        Lex::Mod => BinaryOperator::Mod,
        Lex::Ls => BinaryOperator::Ls,
        Lex::LsEq => BinaryOperator::LsEq,
        Lex::Gr => BinaryOperator::Gr,
        Lex::GrEq => BinaryOperator::GrEq,
        Lex::Eq => BinaryOperator::Eq,
        Lex::And => BinaryOperator::BAnd,
        Lex::Or => BinaryOperator::BOr,
        _ => return None,
    };
    Some(op)
}

fn factor(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    let line = stream.line();
    let found = stream.peek_lex();
    let exp = match found {
        Some(Lex::True) => {
            stream.next();
            Expression::Boolean(line, true)
        }
        Some(Lex::False) => {
            stream.next();
            Expression::Boolean(line, false)
        }
        Some(Lex::LParen) => {
            stream.next();
            let exp = expression(stream)?;
            stream.next_must_be(&Lex::RParen)?;
            exp
        }
        Some(Lex::Not) => {
            stream.next();
            stream.next_must_be(&Lex::LParen)?;
            let operand = expression(stream)?;
            stream.next_must_be(&Lex::RParen)?;
            Expression::unary_op(line, UnaryOperator::Not, operand)
        }
        Some(Lex::Integer(i)) => {
            stream.next();
            Expression::Integer(line, i)
        }
        Some(Lex::Identifier(_)) => identifier_or_call(stream)?,
        _ => return err!(line, ParserError::ExpectedExpression(found)),
    };
    Ok(exp)
}

fn identifier_or_call(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    let (line, id) = stream.next_must_be_id()?;

    if stream.test_if(&Lex::LParen) {
        let args = argument_list(stream)?;
        Ok(Expression::RoutineCall(line, id, args))
    } else if stream.next_if(&Lex::LBracket).is_some() {
        let index = expression(stream)?;
        stream.next_must_be(&Lex::RBracket)?;
        Ok(Expression::ArrayAt(line, id, Box::new(index)))
    } else {
        Ok(Expression::Identifier(line, id))
    }
}

/// Parses `( [EXPRESSION [, EXPRESSION]*] )`
pub(super) fn argument_list(stream: &mut TokenStream) -> ParserResult<Vec<Expression>> {
    trace!(stream);
    stream.next_must_be(&Lex::LParen)?;

    let mut args = vec![];
    if stream.next_if(&Lex::RParen).is_some() {
        return Ok(args);
    }

    loop {
        args.push(expression(stream)?);
        if stream.next_if(&Lex::Comma).is_none() {
            break;
        }
    }
    stream.next_must_be(&Lex::RParen)?;

    Ok(args)
}
