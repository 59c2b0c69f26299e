use crate::token::{lookup_identifier, Token};
use std::str::Chars;

pub struct Lexer<'a> {
    input: Chars<'a>,
    cur: Option<char>,
    peek: Option<char>,
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '?'
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Self {
            input: input.chars(),
            cur: None,
            peek: None,
        };
        lexer.read_char();
        lexer.read_char();
        lexer
    }
    fn read_char(&mut self) {
        self.cur = self.peek;
        self.peek = self.input.next();
    }
    fn skip_whitespace(&mut self) {
        while matches!(self.cur, Some(' ') | Some('\t') | Some('\n') | Some('\r')) {
            self.read_char();
        }
    }
    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut res = String::new();
        while let Some(c) = self.cur.filter(|&c| pred(c)) {
            res.push(c);
            self.read_char();
        }
        res
    }
    fn read_string(&mut self) -> String {
        // opening quote
        self.read_char();
        let res = self.read_while(|c| c != '"');
        // closing quote, absent when the input ends first
        self.read_char();
        res
    }
    /// Consumes the current character and, if the next one is `expected`, that
    /// one too, picking between the two-character and one-character tokens.
    fn either(&mut self, expected: char, double: Token, single: Token) -> Token {
        if self.peek == Some(expected) {
            self.read_char();
            self.read_char();
            double
        } else {
            self.read_char();
            single
        }
    }
    fn single(&mut self, token: Token) -> Token {
        self.read_char();
        token
    }

    /// Returns the next token, or `EOF` forever once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        use Token::*;
        self.skip_whitespace();
        let c = match self.cur {
            Some(c) => c,
            None => return EOF,
        };
        match c {
            '=' => self.either('=', EQ, ASSIGN),
            '!' => self.either('=', NEQ, BANG),
            '+' => self.single(PLUS),
            '-' => self.single(MINUS),
            '*' => self.single(ASTERISK),
            '/' => self.single(SLASH),
            '<' => self.single(LT),
            '>' => self.single(GT),
            ',' => self.single(COMMA),
            ';' => self.single(SEMICOLON),
            ':' => self.single(COLON),
            '(' => self.single(LPAREN),
            ')' => self.single(RPAREN),
            '{' => self.single(LBRACE),
            '}' => self.single(RBRACE),
            '[' => self.single(LBRACKET),
            ']' => self.single(RBRACKET),
            '"' => STRING(self.read_string()),
            c if is_letter(c) => lookup_identifier(&self.read_while(is_letter)),
            c if c.is_ascii_digit() => INT(self.read_while(|c| c.is_ascii_digit())),
            c => self.single(ILLEGAL(c)),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token::EOF => None,
            token => Some(token),
        }
    }
}
