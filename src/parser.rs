use crate::ast::{BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement};
use crate::lexer::Lexer;
use crate::stack::ensure_sufficient_stack;
use crate::token::Token;
use anyhow::{anyhow, bail, Result};
use std::rc::Rc;
use tracing::debug;

#[derive(PartialOrd, PartialEq, Clone, Copy, Debug)]
enum Precedence {
    LOWEST,
    EQUALS,
    LESS,
    SUM,
    PRODUCT,
    PREFIX,
    CALL,
}

impl Token {
    fn precedence(&self) -> Precedence {
        use Precedence::*;
        use Token::*;
        match self {
            PLUS | MINUS => SUM,
            ASTERISK | SLASH => PRODUCT,
            LT | GT => LESS,
            EQ | NEQ => EQUALS,
            LPAREN | LBRACKET => CALL,
            _ => LOWEST,
        }
    }
}

/// Parses `input` into a program plus every syntax error met on the way.
pub fn parse(input: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    (program, parser.errors)
}

pub struct Parser<'a> {
    l: Lexer<'a>,
    cur: Token,
    peek: Token,
    errors: Vec<String>,
}

impl<'a> Parser<'a> {
    pub fn new(l: Lexer<'a>) -> Self {
        let mut parser = Parser {
            l,
            cur: Token::EOF,
            peek: Token::EOF,
            errors: Vec::new(),
        };
        parser.next_token();
        parser.next_token();
        parser
    }
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
    fn next_token(&mut self) {
        let next = self.l.next_token();
        self.cur = std::mem::replace(&mut self.peek, next);
    }
    fn cur_token_is(&self, token: &Token) -> bool {
        &self.cur == token
    }
    fn peek_token_is(&self, token: &Token) -> bool {
        &self.peek == token
    }
    /// Advances only when the next token is the expected one.
    fn expect_peek(&mut self, token: Token) -> Result<()> {
        if self.peek_token_is(&token) {
            self.next_token();
            Ok(())
        } else {
            bail!(
                "expected next token to be {}, got {} instead",
                token.kind(),
                self.peek.kind()
            )
        }
    }
    fn expect_peek_identifier(&mut self) -> Result<String> {
        match &self.peek {
            Token::IDENT(name) => {
                let name = name.clone();
                self.next_token();
                Ok(name)
            }
            other => bail!(
                "expected next token to be IDENT, got {} instead",
                other.kind()
            ),
        }
    }
    fn record_error(&mut self, err: anyhow::Error) {
        debug!(error = %err, "syntax error");
        self.errors.push(err.to_string());
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.cur_token_is(&Token::EOF) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => self.record_error(err),
            }
            self.next_token();
        }
        debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        Program { statements }
    }
    fn parse_statement(&mut self) -> Result<Statement> {
        match self.cur {
            Token::LET => self.parse_let_statement(),
            Token::RETURN => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }
    fn parse_let_statement(&mut self) -> Result<Statement> {
        let name = self.expect_peek_identifier()?;
        self.expect_peek(Token::ASSIGN)?;
        self.next_token();
        let value = self.parse_expression(Precedence::LOWEST)?;
        if self.peek_token_is(&Token::SEMICOLON) {
            self.next_token();
        }
        Ok(Statement::LetStatement { name, value })
    }
    fn parse_return_statement(&mut self) -> Result<Statement> {
        self.next_token();
        let value = self.parse_expression(Precedence::LOWEST)?;
        if self.peek_token_is(&Token::SEMICOLON) {
            self.next_token();
        }
        Ok(Statement::ReturnStatement { value })
    }
    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let exp = self.parse_expression(Precedence::LOWEST)?;
        if self.peek_token_is(&Token::SEMICOLON) {
            self.next_token();
        }
        Ok(Statement::ExpressionStatement(exp))
    }
    fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression> {
        ensure_sufficient_stack(|| -> Result<Expression> {
            let mut exp = self.parse_prefix()?;
            while !self.peek_token_is(&Token::SEMICOLON) && precedence < self.peek.precedence() {
                self.next_token();
                exp = match self.cur {
                    Token::LPAREN => self.parse_call_expression(exp)?,
                    Token::LBRACKET => self.parse_index_expression(exp)?,
                    _ => self.parse_infix_expression(exp)?,
                };
            }
            Ok(exp)
        })
    }
    fn parse_prefix(&mut self) -> Result<Expression> {
        use Expression::*;
        use Token::*;
        let exp = match &self.cur {
            IDENT(name) => Identifier(name.clone()),
            INT(literal) => {
                let value = literal
                    .parse::<i64>()
                    .map_err(|_| anyhow!("could not parse {:?} as integer", self.cur.literal()))?;
                IntegerLiteral { value }
            }
            STRING(value) => StringLiteral {
                value: value.clone(),
            },
            TRUE => Boolean { value: true },
            FALSE => Boolean { value: false },
            MINUS | BANG => self.parse_prefix_expression()?,
            LPAREN => self.parse_grouped_expression()?,
            IF => self.parse_if_expression()?,
            FUNCTION => self.parse_function_literal()?,
            LBRACKET => ArrayLiteral {
                elements: self.parse_expression_list(RBRACKET)?,
            },
            LBRACE => self.parse_hash_literal()?,
            token => bail!("no prefix parse function for {} found", token.kind()),
        };
        Ok(exp)
    }
    fn parse_grouped_expression(&mut self) -> Result<Expression> {
        self.next_token();
        let exp = self.parse_expression(Precedence::LOWEST)?;
        self.expect_peek(Token::RPAREN)?;
        Ok(exp)
    }
    fn parse_prefix_expression(&mut self) -> Result<Expression> {
        let op = match &self.cur {
            Token::MINUS => PrefixOperator::MINUS,
            Token::BANG => PrefixOperator::BANG,
            token => {
                bail!("unexpected operator: {}", token.kind());
            }
        };
        self.next_token();
        let right = self.parse_expression(Precedence::PREFIX)?;
        Ok(Expression::PrefixExpression {
            operator: op,
            right: Box::new(right),
        })
    }
    fn parse_infix_expression(&mut self, left: Expression) -> Result<Expression> {
        let op = match &self.cur {
            Token::PLUS => InfixOperator::PLUS,
            Token::MINUS => InfixOperator::MINUS,
            Token::ASTERISK => InfixOperator::ASTERISK,
            Token::SLASH => InfixOperator::SLASH,
            Token::LT => InfixOperator::LT,
            Token::GT => InfixOperator::GT,
            Token::EQ => InfixOperator::EQ,
            Token::NEQ => InfixOperator::NEQ,
            token => {
                bail!("unexpected operator: {}", token.kind());
            }
        };
        let precedence = self.cur.precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Ok(Expression::InfixExpression {
            left: Box::new(left),
            operator: op,
            right: Box::new(right),
        })
    }
    fn parse_call_expression(&mut self, function: Expression) -> Result<Expression> {
        let arguments = self.parse_expression_list(Token::RPAREN)?;
        Ok(Expression::CallExpression {
            function: Box::new(function),
            arguments,
        })
    }
    fn parse_index_expression(&mut self, left: Expression) -> Result<Expression> {
        self.next_token();
        let index = self.parse_expression(Precedence::LOWEST)?;
        self.expect_peek(Token::RBRACKET)?;
        Ok(Expression::IndexExpression {
            left: Box::new(left),
            index: Box::new(index),
        })
    }
    /// Comma-separated expressions up to `end`; the opening token is current.
    fn parse_expression_list(&mut self, end: Token) -> Result<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_token_is(&end) {
            self.next_token();
            return Ok(list);
        }
        self.next_token();
        list.push(self.parse_expression(Precedence::LOWEST)?);
        while self.peek_token_is(&Token::COMMA) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::LOWEST)?);
        }
        self.expect_peek(end)?;
        Ok(list)
    }
    fn parse_hash_literal(&mut self) -> Result<Expression> {
        let mut pairs = Vec::new();
        while !self.peek_token_is(&Token::RBRACE) {
            self.next_token();
            let key = self.parse_expression(Precedence::LOWEST)?;
            self.expect_peek(Token::COLON)?;
            self.next_token();
            let value = self.parse_expression(Precedence::LOWEST)?;
            pairs.push((key, value));
            if !self.peek_token_is(&Token::RBRACE) {
                self.expect_peek(Token::COMMA)?;
            }
        }
        self.expect_peek(Token::RBRACE)?;
        Ok(Expression::HashLiteral { pairs })
    }
    fn parse_if_expression(&mut self) -> Result<Expression> {
        self.expect_peek(Token::LPAREN)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::LOWEST)?;
        self.expect_peek(Token::RPAREN)?;
        self.expect_peek(Token::LBRACE)?;
        let consequence = self.parse_block_statement();
        let alternative = if self.peek_token_is(&Token::ELSE) {
            self.next_token();
            self.expect_peek(Token::LBRACE)?;
            Some(self.parse_block_statement())
        } else {
            None
        };
        Ok(Expression::IfExpression {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }
    fn parse_function_literal(&mut self) -> Result<Expression> {
        self.expect_peek(Token::LPAREN)?;
        let parameters = self.parse_function_parameters()?;
        self.expect_peek(Token::LBRACE)?;
        let body = self.parse_block_statement();
        Ok(Expression::FunctionLiteral {
            parameters,
            body: Rc::new(body),
        })
    }
    fn parse_function_parameters(&mut self) -> Result<Vec<String>> {
        let mut parameters = Vec::new();
        if self.peek_token_is(&Token::RPAREN) {
            self.next_token();
            return Ok(parameters);
        }
        parameters.push(self.expect_peek_identifier()?);
        while self.peek_token_is(&Token::COMMA) {
            self.next_token();
            parameters.push(self.expect_peek_identifier()?);
        }
        self.expect_peek(Token::RPAREN)?;
        Ok(parameters)
    }
    /// Statements up to the closing brace or end of input. A statement that
    /// fails is recorded and skipped so the rest of the block still parses.
    fn parse_block_statement(&mut self) -> BlockStatement {
        self.next_token();
        let mut statements = Vec::new();
        while !self.cur_token_is(&Token::RBRACE) && !self.cur_token_is(&Token::EOF) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => self.record_error(err),
            }
            self.next_token();
        }
        BlockStatement { statements }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{
        BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement,
    };
    use crate::parser::parse as parse_with_errors;
    use pretty_assertions::assert_eq;

    fn parse(input: &str) -> Program {
        let (program, errors) = parse_with_errors(input);
        assert!(errors.is_empty(), "parser errors for {:?}: {:?}", input, errors);
        program
    }

    fn ident(name: &str) -> Box<Expression> {
        Box::new(Expression::Identifier(name.to_string()))
    }

    fn int(value: i64) -> Box<Expression> {
        Box::new(Expression::IntegerLiteral { value })
    }

    #[test]
    fn test_integer_literal_expression() {
        let program = parse("123;");
        let statements = program.statements;
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0],
            Statement::ExpressionStatement(Expression::IntegerLiteral { value: 123 })
        );
    }

    #[test]
    fn test_let_and_return_statements() {
        let program = parse("let x = 5; let foobar = y; return 10;");
        assert_eq!(
            program.statements,
            vec![
                Statement::LetStatement {
                    name: "x".to_string(),
                    value: *int(5)
                },
                Statement::LetStatement {
                    name: "foobar".to_string(),
                    value: *ident("y")
                },
                Statement::ReturnStatement { value: *int(10) },
            ]
        );
    }

    #[test]
    fn test_prefix_expression() {
        let program = parse("!x;");
        assert_eq!(
            program.statements[0],
            Statement::ExpressionStatement(Expression::PrefixExpression {
                operator: PrefixOperator::BANG,
                right: ident("x"),
            })
        );
    }

    #[test]
    fn test_if_else_expression() {
        use Expression::*;
        use Statement::*;
        let program = parse("if (1 < 2) { 3; 4 } else { 5; };");
        let statements = program.statements;
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0],
            ExpressionStatement(IfExpression {
                condition: Box::new(InfixExpression {
                    left: int(1),
                    operator: InfixOperator::LT,
                    right: int(2),
                }),
                consequence: BlockStatement {
                    statements: vec![
                        ExpressionStatement(IntegerLiteral { value: 3 }),
                        ExpressionStatement(IntegerLiteral { value: 4 }),
                    ]
                },
                #[rustfmt::skip]
                alternative: Some(BlockStatement {
                    statements: vec![ExpressionStatement(IntegerLiteral { value: 5 })]
                }),
            })
        )
    }

    #[test]
    fn test_function_literal_parameters() {
        let tests = vec![
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ];
        for (input, expected) in tests {
            let program = parse(input);
            match &program.statements[0] {
                Statement::ExpressionStatement(Expression::FunctionLiteral {
                    parameters, ..
                }) => assert_eq!(parameters, &expected),
                other => panic!("not a function literal: {:?}", other),
            }
        }
    }

    #[test]
    fn test_call_expression() {
        let program = parse("add(1, 2 * 3, 4 + 5);");
        assert_eq!(
            program.statements[0],
            Statement::ExpressionStatement(Expression::CallExpression {
                function: ident("add"),
                arguments: vec![
                    *int(1),
                    Expression::InfixExpression {
                        left: int(2),
                        operator: InfixOperator::ASTERISK,
                        right: int(3),
                    },
                    Expression::InfixExpression {
                        left: int(4),
                        operator: InfixOperator::PLUS,
                        right: int(5),
                    },
                ],
            })
        );
    }

    #[test]
    fn test_hash_literals() {
        let tests = vec![
            ("{}", "{}"),
            (r#"{"one": 1, "two": 2}"#, r#"{"one": 1, "two": 2}"#),
            ("{true: 1, 4: 2}", "{true: 1, 4: 2}"),
            (
                r#"{"one": 0 + 1, "two": 10 - 8}"#,
                r#"{"one": (0 + 1), "two": (10 - 8)}"#,
            ),
        ];
        for (input, expected) in tests {
            assert_eq!(parse(input).to_string(), expected);
        }
    }

    #[test]
    fn test_array_and_index() {
        let program = parse("[1, 2 * 2, 3 + 3]; myArray[1 + 1]");
        assert_eq!(
            program.to_string(),
            "[1, (2 * 2), (3 + 3)]\n(myArray[(1 + 1)])"
        );
    }

    #[test]
    fn test_operator_precedence_parsing() {
        let tests = vec![
            ("1 + 2 + 3", "((1 + 2) + 3)"),
            ("1 + 2 * 3", "(1 + (2 * 3))"),
            ("1 + (2 + 3)", "(1 + (2 + 3))"),
            ("1 + 2 == 3", "((1 + 2) == 3)"),
            ("1 < 2 != 3 > 4", "((1 < 2) != (3 > 4))"),
            ("-1 * 2", "((-1) * 2)"),
            ("1 * -2", "(1 * (-2))"),
            ("-a", "(-a)"),
            ("!-a", "(!(-a))"),
            ("a + b * c", "(a + (b * c))"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4)\n((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("true != false", "(true != false)"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))",
            ),
            ("f(1)[0]", "(f(1)[0])"),
        ];
        for (input, expected) in tests {
            let program = parse(input);
            assert_eq!(expected, program.to_string());
        }
    }

    #[test]
    fn test_canonical_rendering_is_idempotent() {
        let inputs = vec![
            "a + b * c",
            "-a * b",
            "!-a",
            "a + b / c",
            "1 + (2 + 3) + 4",
            "a * [1, 2][b * c] * d",
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            r#"{"one": 1 + 1, two: [x]}"#,
            "if (x < y) { x } else { y }",
            "fn(x, y) { let z = x + y; return z * 2; }",
        ];
        for input in inputs {
            let once = parse(input).to_string();
            let twice = parse(&once).to_string();
            assert_eq!(once, twice, "rendering of {:?} is not stable", input);
        }
    }

    #[test]
    fn test_parser_errors() {
        let tests = vec![
            ("let = 5;", "expected next token to be IDENT, got ASSIGN instead"),
            ("let x 5;", "expected next token to be ASSIGN, got INT instead"),
            ("(1 + 2", "expected next token to be RPAREN, got EOF instead"),
            ("@", "no prefix parse function for ILLEGAL found"),
            (
                "99999999999999999999",
                r#"could not parse "99999999999999999999" as integer"#,
            ),
            ("{1 2}", "expected next token to be COLON, got INT instead"),
        ];
        for (input, expected) in tests {
            let (_, errors) = parse_with_errors(input);
            assert_eq!(errors.first().map(String::as_str), Some(expected), "{}", input);
        }
    }

    #[test]
    fn test_recovers_after_bad_statement() {
        let (program, errors) = parse_with_errors("let = 1; let y = 2; y");
        assert!(!errors.is_empty());
        assert_eq!(
            program.statements.last(),
            Some(&Statement::ExpressionStatement(*ident("y")))
        );
        assert!(program
            .statements
            .contains(&Statement::LetStatement {
                name: "y".to_string(),
                value: *int(2),
            }));
    }

    #[test]
    fn test_unclosed_block_ends_at_eof() {
        let (program, errors) = parse_with_errors("if (x) { 1");
        assert!(errors.is_empty());
        assert_eq!(program.to_string(), "if (x) { 1 }");
    }
}
