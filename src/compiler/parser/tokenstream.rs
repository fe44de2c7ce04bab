use super::ParserError;
use crate::compiler::lexer::tokens::{Lex, Token};
use crate::compiler::CompilerError;

pub struct TokenStream<'a> {
    tokens: &'a [Token],
    index: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token]) -> TokenStream<'a> {
        TokenStream { tokens, index: 0 }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The line of the next token, or of the last token if the stream has been
    /// consumed.  Used to locate errors.
    pub fn line(&self) -> u32 {
        match self.peek() {
            Some(t) => t.l,
            None => self.tokens.last().map_or(1, |t| t.l),
        }
    }

    pub fn next(&mut self) -> Option<Token> {
        if self.index >= self.tokens.len() {
            None
        } else {
            self.index += 1;
            Some(self.tokens[self.index - 1].clone())
        }
    }

    pub fn next_if(&mut self, test: &Lex) -> Option<Token> {
        if self.test_if(test) {
            self.next()
        } else {
            None
        }
    }

    pub fn next_if_id(&mut self) -> Option<(u32, String)> {
        match self.next_if(&Lex::Identifier("".into())) {
            Some(Token {
                l,
                s: Lex::Identifier(id),
            }) => Some((l, id)),
            _ => None,
        }
    }

    pub fn next_if_integer(&mut self) -> Option<(u32, i32)> {
        match self.next_if(&Lex::Integer(0)) {
            Some(Token {
                l,
                s: Lex::Integer(i),
            }) => Some((l, i)),
            _ => None,
        }
    }

    pub fn next_must_be(&mut self, test: &Lex) -> Result<Token, CompilerError<ParserError>> {
        let line = self.line();
        let found = self.peek().map(|t| t.s.clone());
        match self.next_if(test) {
            Some(t) => Ok(t),
            None => err!(line, ParserError::ExpectedButFound(vec![test.clone()], found)),
        }
    }

    pub fn next_must_be_id(&mut self) -> Result<(u32, String), CompilerError<ParserError>> {
        let line = self.line();
        let found = self.peek().map(|t| t.s.clone());
        match self.next_if_id() {
            Some(id) => Ok(id),
            None => err!(
                line,
                ParserError::ExpectedButFound(vec![Lex::Identifier("".into())], found)
            ),
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        if self.index < self.tokens.len() {
            Some(&self.tokens[self.index])
        } else {
            None
        }
    }

    pub fn peek_at(&self, i: usize) -> Option<&Token> {
        if self.index + i < self.tokens.len() {
            Some(&self.tokens[self.index + i])
        } else {
            None
        }
    }

    pub fn peek_lex(&self) -> Option<Lex> {
        self.peek().map(|t| t.s.clone())
    }

    pub fn test_if(&self, test: &Lex) -> bool {
        match self.peek() {
            None => false,
            Some(t) => t.token_eq(test),
        }
    }

    pub fn test_if_one_of(&self, set: &[Lex]) -> bool {
        match self.peek() {
            None => false,
            Some(t) => set.iter().any(|l| t.token_eq(l)),
        }
    }
}
