// Lexer - converts the text of a Blaise program into a vector of tokens
// which each record the line they were read from
use log::debug;
use stdext::function_name;

use crate::diagnostics::config::{TracingConfig, Tracing};

use super::super::CompilerError;
use super::tokens::{Lex, Token};
use super::{LexerError, LexerResult};
use Lex::*;

macro_rules! trace {
    ($ts:expr) => {
        if $ts.tracing.includes($ts.line() as usize) {
            println!(
                "{} <- L{}:{:?}",
                function_name!(),
                $ts.line(),
                $ts.current_char()
            )
        }
    };
}

struct LexerBranch<'a> {
    lexer: &'a mut Lexer,
    index: usize,
    line: u32,
}

impl<'a> LexerBranch<'a> {
    fn from(l: &mut Lexer) -> LexerBranch {
        LexerBranch {
            index: l.index,
            line: l.line,
            lexer: l,
        }
    }

    /// Accepts everything the branch has consumed: the source lexer is moved
    /// up to the branch cursor and the consumed text is returned.
    fn merge(&mut self) -> String {
        let s: String = self.lexer.chars[self.lexer.index..self.index]
            .iter()
            .collect();

        self.lexer.index = self.index;
        self.lexer.line = self.line;

        s
    }

    fn next(&mut self) -> Option<char> {
        if self.index < self.lexer.chars.len() {
            let c = self.lexer.chars[self.index];
            self.index += 1;
            if c == '\n' {
                self.line += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    fn next_ifn(&mut self, t: &str) -> bool {
        if self.peek_ifn(t) {
            self.index += t.chars().count();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        if self.index < self.lexer.chars.len() {
            Some(self.lexer.chars[self.index])
        } else {
            None
        }
    }

    fn peek_ifn(&self, t: &str) -> bool {
        let tc: Vec<char> = t.chars().collect();
        self.lexer.chars[self.index..].starts_with(&tc)
    }
}

pub struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: u32,
    tracing: TracingConfig,
}

impl Tracing for Lexer {
    fn set_tracing(&mut self, config: TracingConfig) {
        self.tracing = config;
    }
}

impl Lexer {
    pub fn new(text: &str) -> Lexer {
        Lexer {
            chars: text.chars().collect(),
            index: 0,
            line: 1,
            tracing: TracingConfig::Off,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn current_char(&self) -> Option<char> {
        if self.index < self.chars.len() {
            Some(self.chars[self.index])
        } else {
            None
        }
    }

    /// Converts the entire text into tokens.  Tokenizing stops at the first
    /// error, which is the last element of the result.
    pub fn tokenize(&mut self) -> Vec<LexerResult<Token>> {
        debug!("Tokenizing {} characters", self.chars.len());
        let mut tokens = vec![];

        while self.index < self.chars.len() {
            let prev_index = self.index;
            match self.consume_ignorable() {
                Ok(()) => (),
                Err(e) => {
                    tokens.push(Err(e));
                    break;
                }
            }
            if self.index >= self.chars.len() {
                break;
            }

            match self.next_token() {
                Ok(Some(t)) => tokens.push(Ok(t)),
                Ok(None) => (),
                Err(e) => {
                    tokens.push(Err(e));
                    break;
                }
            }

            // Can no longer consume the input text
            if prev_index == self.index {
                tokens.push(Err(CompilerError::new(
                    self.line,
                    LexerError::Locked(self.current_char()),
                )));
                break;
            }
        }

        tokens
    }

    fn next_token(&mut self) -> LexerResult<Option<Token>> {
        match self.consume_integer()? {
            Some(i) => Ok(Some(i)),
            None => match self.consume_identifier() {
                Some(id) => Ok(Some(self.if_keyword_map(id))),
                None => Ok(self.consume_operator()),
            },
        }
    }

    /// Skips any run of whitespace and comments that precedes the next token.
    fn consume_ignorable(&mut self) -> LexerResult<()> {
        loop {
            let start = self.index;
            self.consume_whitespace();
            self.consume_line_comment();
            self.consume_block_comment()?;
            if self.index == start {
                return Ok(());
            }
        }
    }

    fn consume_whitespace(&mut self) {
        trace!(self);
        while self.index < self.chars.len() && self.chars[self.index].is_whitespace() {
            if self.chars[self.index] == '\n' {
                self.line += 1;
            }
            self.index += 1;
        }
    }

    fn consume_identifier(&mut self) -> Option<Token> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);
        if branch
            .peek()
            .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        {
            while branch
                .peek()
                .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
            {
                branch.next();
            }
        }

        let id = branch.merge();
        if id.is_empty() {
            None
        } else {
            Some(Token::new(line, Identifier(id)))
        }
    }

    fn consume_integer(&mut self) -> LexerResult<Option<Token>> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);

        if !branch.peek().map_or(false, |c| c.is_ascii_digit()) {
            return Ok(None);
        }

        while let Some(c) = branch.peek() {
            if c.is_ascii_digit() {
                branch.next();
            } else if c.is_ascii_alphabetic() || c == '_' {
                while branch
                    .peek()
                    .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_')
                {
                    branch.next();
                }
                let text = branch.merge();
                return Err(CompilerError::new(line, LexerError::InvalidInteger(text)));
            } else {
                break;
            }
        }

        let num = branch.merge();
        match num.parse::<i32>() {
            Ok(i) => Ok(Some(Token::new(line, Integer(i)))),
            Err(_) => Err(CompilerError::new(line, LexerError::InvalidInteger(num))),
        }
    }

    fn consume_operator(&mut self) -> Option<Token> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);
        let mut operators = vec![
            (":=", Assign),
            (">=", GrEq),
            ("<=", LsEq),
            ("(", LParen),
            (")", RParen),
            ("{", LBrace),
            ("}", RBrace),
            ("[", LBracket),
            ("]", RBracket),
            ("*", Mul),
            ("/", Div),
            ("%", Mod),
            ("+", Add),
            ("-", Minus),
            (";", Semicolon),
            (",", Comma),
            (">", Gr),
            ("<", Ls),
            ("=", Eq),
        ];
        operators.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut token = None;
        for (op, t) in operators.into_iter() {
            if branch.next_ifn(op) {
                token = Some(Token::new(line, t));
                break;
            }
        }
        branch.merge();
        token
    }

    fn consume_line_comment(&mut self) {
        trace!(self);
        let mut branch = LexerBranch::from(self);
        if branch.next_ifn("//") {
            while let Some(c) = branch.next() {
                if c == '\n' {
                    break;
                }
            }
        }
        branch.merge();
    }

    fn consume_block_comment(&mut self) -> LexerResult<()> {
        trace!(self);
        let line = self.line;
        let mut branch = LexerBranch::from(self);
        if branch.next_ifn("/*") {
            while !branch.next_ifn("*/") {
                if branch.next().is_none() {
                    return Err(CompilerError::new(line, LexerError::UnterminatedComment));
                }
            }
        }
        branch.merge();
        Ok(())
    }

    fn if_keyword_map(&self, token: Token) -> Token {
        trace!(self);
        let kw = match &token.s {
            Identifier(id) => match id.as_str() {
                "var" => Var,
                "int" => Int,
                "bool" => Bool,
                "void" => Void,
                "procedure" => Procedure,
                "if" => If,
                "else" => Else,
                "endif" => Endif,
                "while" => While,
                "output" => Output,
                "input" => Input,
                "return" => Return,
                "true" => True,
                "false" => False,
                "not" => Not,
                "and" => And,
                "or" => Or,
                _ => return token,
            },
            _ => return token,
        };
        Token::new(token.l, kw)
    }
}
