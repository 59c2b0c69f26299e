use std::fmt::{Display, Formatter};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    LetStatement { name: String, value: Expression },
    ReturnStatement { value: Expression },
    ExpressionStatement(Expression),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(String),
    IntegerLiteral {
        value: i64,
    },
    Boolean {
        value: bool,
    },
    StringLiteral {
        value: String,
    },
    ArrayLiteral {
        elements: Vec<Expression>,
    },
    /// Pairs in source order; duplicates are resolved at evaluation.
    HashLiteral {
        pairs: Vec<(Expression, Expression)>,
    },
    PrefixExpression {
        operator: PrefixOperator,
        right: Box<Expression>,
    },
    InfixExpression {
        left: Box<Expression>,
        operator: InfixOperator,
        right: Box<Expression>,
    },
    IndexExpression {
        left: Box<Expression>,
        index: Box<Expression>,
    },
    IfExpression {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    /// The body is shared with every function value created from this literal.
    FunctionLiteral {
        parameters: Vec<String>,
        body: Rc<BlockStatement>,
    },
    CallExpression {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

// Dropping is iterative: children move onto a heap worklist, so nesting depth
// is not bounded by the thread's stack.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut exp) = pending.pop() {
            exp.take_children(&mut pending);
        }
    }
}

impl Expression {
    fn take_children(&mut self, out: &mut Vec<Expression>) {
        use Expression::*;
        match self {
            Identifier(_) | IntegerLiteral { .. } | Boolean { .. } | StringLiteral { .. } => {}
            ArrayLiteral { elements } => out.append(elements),
            HashLiteral { pairs } => {
                for (key, value) in pairs.drain(..) {
                    out.push(key);
                    out.push(value);
                }
            }
            PrefixExpression { right, .. } => out.push(take_boxed(right)),
            InfixExpression { left, right, .. } => {
                out.push(take_boxed(left));
                out.push(take_boxed(right));
            }
            IndexExpression { left, index } => {
                out.push(take_boxed(left));
                out.push(take_boxed(index));
            }
            IfExpression {
                condition,
                consequence,
                alternative,
            } => {
                out.push(take_boxed(condition));
                consequence.take_expressions(out);
                if let Some(alt) = alternative {
                    alt.take_expressions(out);
                }
            }
            FunctionLiteral { body, .. } => {
                // A body still shared with a live function value is left alone.
                if let Some(body) = Rc::get_mut(body) {
                    body.take_expressions(out);
                }
            }
            CallExpression {
                function,
                arguments,
            } => {
                out.push(take_boxed(function));
                out.append(arguments);
            }
        }
    }
}

fn take_boxed(exp: &mut Box<Expression>) -> Expression {
    std::mem::replace(&mut **exp, Expression::Boolean { value: false })
}

impl BlockStatement {
    fn take_expressions(&mut self, out: &mut Vec<Expression>) {
        out.extend(self.statements.drain(..).map(|stmt| match stmt {
            Statement::LetStatement { value, .. } => value,
            Statement::ReturnStatement { value } => value,
            Statement::ExpressionStatement(exp) => exp,
        }));
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InfixOperator {
    PLUS,
    MINUS,
    ASTERISK,
    SLASH,
    LT,
    GT,
    EQ,
    NEQ,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrefixOperator {
    MINUS,
    BANG,
}

/// Any node the evaluator accepts.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Block(&'a BlockStatement),
    Expression(&'a Expression),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(program: &'a Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a Statement> for Node<'a> {
    fn from(statement: &'a Statement) -> Self {
        Node::Statement(statement)
    }
}

impl<'a> From<&'a BlockStatement> for Node<'a> {
    fn from(block: &'a BlockStatement) -> Self {
        Node::Block(block)
    }
}

impl<'a> From<&'a Expression> for Node<'a> {
    fn from(expression: &'a Expression) -> Self {
        Node::Expression(expression)
    }
}

fn write_separated<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> std::fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_separated(f, &self.statements, "\n")
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Statement::*;
        match self {
            LetStatement { name, value } => write!(f, "let {} = {};", name, value),
            ReturnStatement { value } => write!(f, "return {};", value),
            ExpressionStatement(exp) => write!(f, "{}", exp),
        }
    }
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_separated(f, &self.statements, " ")
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Expression::*;
        match self {
            Identifier(name) => write!(f, "{}", name),
            IntegerLiteral { value } => write!(f, "{}", value),
            Boolean { value } => write!(f, "{}", value),
            StringLiteral { value } => write!(f, "\"{}\"", value),
            ArrayLiteral { elements } => {
                write!(f, "[")?;
                write_separated(f, elements, ", ")?;
                write!(f, "]")
            }
            HashLiteral { pairs } => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            PrefixExpression { operator, right } => write!(f, "({}{})", operator, right),
            InfixExpression {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            IndexExpression { left, index } => write!(f, "({}[{}])", left, index),
            IfExpression {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if ({}) {{ {} }}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, " else {{ {} }}", alt)?;
                }
                Ok(())
            }
            FunctionLiteral { parameters, body } => {
                write!(f, "fn(")?;
                write_separated(f, parameters, ", ")?;
                write!(f, ") {{ {} }}", body)
            }
            CallExpression {
                function,
                arguments,
            } => {
                write!(f, "{}(", function)?;
                write_separated(f, arguments, ", ")?;
                write!(f, ")")
            }
        }
    }
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use PrefixOperator::*;
        match self {
            MINUS => write!(f, "-"),
            BANG => write!(f, "!"),
        }
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use InfixOperator::*;
        let op = match self {
            PLUS => "+",
            MINUS => "-",
            ASTERISK => "*",
            SLASH => "/",
            LT => "<",
            GT => ">",
            EQ => "==",
            NEQ => "!=",
        };
        write!(f, "{}", op)
    }
}
