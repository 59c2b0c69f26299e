use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt::{Display, Formatter};

#[derive(PartialEq, Debug, Clone)]
pub enum Token {
    ILLEGAL(char),
    EOF,

    IDENT(String), // foobar, x, y, ...
    INT(String),
    STRING(String),

    ASSIGN,   // =
    PLUS,     // +
    MINUS,    // -
    BANG,     // !
    ASTERISK, // *
    SLASH,    // /

    LT, // <
    GT, // >

    EQ,  // ==
    NEQ, // !=

    COMMA,     // ,
    SEMICOLON, // ;
    COLON,     // :

    LPAREN,   // (
    RPAREN,   // )
    LBRACE,   // {
    RBRACE,   // }
    LBRACKET, // [
    RBRACKET, // ]

    FUNCTION,
    LET,
    TRUE,
    FALSE,
    IF,
    ELSE,
    RETURN,
}

static KEYWORDS: Lazy<FxHashMap<&'static str, Token>> = Lazy::new(|| {
    use Token::*;
    let mut keywords = FxHashMap::default();
    keywords.insert("fn", FUNCTION);
    keywords.insert("let", LET);
    keywords.insert("true", TRUE);
    keywords.insert("false", FALSE);
    keywords.insert("if", IF);
    keywords.insert("else", ELSE);
    keywords.insert("return", RETURN);
    keywords
});

pub fn lookup_identifier(ident: &str) -> Token {
    KEYWORDS
        .get(ident)
        .cloned()
        .unwrap_or_else(|| Token::IDENT(ident.to_string()))
}

impl Token {
    /// Category name used in syntax error messages.
    pub fn kind(&self) -> &'static str {
        use Token::*;
        match self {
            ILLEGAL(_) => "ILLEGAL",
            EOF => "EOF",
            IDENT(_) => "IDENT",
            INT(_) => "INT",
            STRING(_) => "STRING",
            ASSIGN => "ASSIGN",
            PLUS => "PLUS",
            MINUS => "MINUS",
            BANG => "BANG",
            ASTERISK => "ASTERISK",
            SLASH => "SLASH",
            LT => "LT",
            GT => "GT",
            EQ => "EQ",
            NEQ => "NOT_EQ",
            COMMA => "COMMA",
            SEMICOLON => "SEMICOLON",
            COLON => "COLON",
            LPAREN => "LPAREN",
            RPAREN => "RPAREN",
            LBRACE => "LBRACE",
            RBRACE => "RBRACE",
            LBRACKET => "LBRACKET",
            RBRACKET => "RBRACKET",
            FUNCTION => "FUNCTION",
            LET => "LET",
            TRUE => "TRUE",
            FALSE => "FALSE",
            IF => "IF",
            ELSE => "ELSE",
            RETURN => "RETURN",
        }
    }

    /// The source text this token was read from.
    pub fn literal(&self) -> String {
        use Token::*;
        match self {
            ILLEGAL(c) => c.to_string(),
            EOF => String::new(),
            IDENT(s) | INT(s) | STRING(s) => s.clone(),
            ASSIGN => "=".to_string(),
            PLUS => "+".to_string(),
            MINUS => "-".to_string(),
            BANG => "!".to_string(),
            ASTERISK => "*".to_string(),
            SLASH => "/".to_string(),
            LT => "<".to_string(),
            GT => ">".to_string(),
            EQ => "==".to_string(),
            NEQ => "!=".to_string(),
            COMMA => ",".to_string(),
            SEMICOLON => ";".to_string(),
            COLON => ":".to_string(),
            LPAREN => "(".to_string(),
            RPAREN => ")".to_string(),
            LBRACE => "{".to_string(),
            RBRACE => "}".to_string(),
            LBRACKET => "[".to_string(),
            RBRACKET => "]".to_string(),
            FUNCTION => "fn".to_string(),
            LET => "let".to_string(),
            TRUE => "true".to_string(),
            FALSE => "false".to_string(),
            IF => "if".to_string(),
            ELSE => "else".to_string(),
            RETURN => "return".to_string(),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}

#[cfg(test)]
mod tests {
    use crate::token::{lookup_identifier, Token};

    #[test]
    fn test_lookup_identifier() {
        let tests = vec![
            ("fn", Token::FUNCTION),
            ("let", Token::LET),
            ("return", Token::RETURN),
            ("lettuce", Token::IDENT("lettuce".to_string())),
            ("empty?", Token::IDENT("empty?".to_string())),
        ];
        for (input, expected) in tests {
            assert_eq!(expected, lookup_identifier(input));
        }
    }

    #[test]
    fn test_kind_and_literal() {
        assert_eq!(Token::NEQ.kind(), "NOT_EQ");
        assert_eq!(Token::NEQ.literal(), "!=");
        assert_eq!(Token::IDENT("x".to_string()).literal(), "x");
        assert_eq!(format!("{}", Token::RPAREN), "RPAREN");
    }
}
