use crate::ast::{Expression, InfixOperator, Node, PrefixOperator, Program, Statement};
use crate::builtins;
use crate::environment::{Env, Environment};
use crate::error::EvalError;
use crate::object::{Function, HashPair, Object};
use crate::stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;
use std::convert::TryFrom;
use std::rc::Rc;
use tracing::{debug, trace};

/// Why evaluation stopped before the end of a block.
#[derive(Debug)]
enum Signal {
    /// A `return` fired; unwrapped at the nearest function call or at the top.
    Return(Object),
    Error(EvalError),
}

impl From<EvalError> for Signal {
    fn from(err: EvalError) -> Self {
        Signal::Error(err)
    }
}

type Eval<T = Object> = Result<T, Signal>;

/// Evaluates any node as a complete unit: a pending `return` yields its value
/// and a runtime error becomes an `Object::Error`.
pub fn eval<'a>(node: impl Into<Node<'a>>, env: &Env) -> Object {
    let result = match node.into() {
        Node::Program(program) => eval_statements(&program.statements, env),
        Node::Block(block) => eval_statements(&block.statements, env),
        Node::Statement(statement) => eval_statement(statement, env),
        Node::Expression(expression) => eval_expression(expression, env),
    };
    match result {
        Ok(obj) | Err(Signal::Return(obj)) => obj,
        Err(Signal::Error(err)) => {
            debug!(error = %err, "evaluation failed");
            Object::Error {
                message: err.to_string(),
            }
        }
    }
}

#[tracing::instrument(level = "debug", skip_all, fields(statements = program.statements.len()))]
pub fn eval_program(program: &Program, env: &Env) -> Object {
    eval(program, env)
}

fn eval_statements(statements: &[Statement], env: &Env) -> Eval {
    let mut result = Object::Nil;
    for stmt in statements {
        result = eval_statement(stmt, env)?;
    }
    Ok(result)
}

fn eval_statement(statement: &Statement, env: &Env) -> Eval {
    use Statement::*;
    match statement {
        LetStatement { name, value } => {
            let value = eval_expression(value, env)?;
            env.borrow_mut().set(name, value);
            Ok(Object::Nil)
        }
        ReturnStatement { value } => Err(Signal::Return(eval_expression(value, env)?)),
        ExpressionStatement(exp) => eval_expression(exp, env),
    }
}

fn eval_expression(expression: &Expression, env: &Env) -> Eval {
    use Expression::*;
    ensure_sufficient_stack(|| -> Eval {
        match expression {
            Identifier(name) => eval_identifier(name, env),
            IntegerLiteral { value } => Ok(Object::integer(*value)),
            Boolean { value } => Ok(Object::boolean(*value)),
            StringLiteral { value } => Ok(Object::string(value.as_str())),
            ArrayLiteral { elements } => Ok(Object::array(eval_expressions(elements, env)?)),
            HashLiteral { pairs } => eval_hash_literal(pairs, env),
            PrefixExpression { operator, right } => {
                let right = eval_expression(right, env)?;
                Ok(eval_prefix_expression(*operator, right)?)
            }
            InfixExpression {
                left,
                operator,
                right,
            } => {
                let left = eval_expression(left, env)?;
                let right = eval_expression(right, env)?;
                Ok(eval_infix_expression(*operator, left, right)?)
            }
            IndexExpression { left, index } => {
                let left = eval_expression(left, env)?;
                let index = eval_expression(index, env)?;
                Ok(eval_index_expression(left, index)?)
            }
            IfExpression {
                condition,
                consequence,
                alternative,
            } => {
                let condition = eval_expression(condition, env)?;
                if condition.is_truthy() {
                    eval_statements(&consequence.statements, env)
                } else if let Some(alt) = alternative {
                    eval_statements(&alt.statements, env)
                } else {
                    Ok(Object::Nil)
                }
            }
            FunctionLiteral { parameters, body } => Ok(Object::Function(Rc::new(Function::new(
                parameters.clone(),
                Rc::clone(body),
                Rc::clone(env),
            )))),
            CallExpression {
                function,
                arguments,
            } => {
                let function = eval_expression(function, env)?;
                let args = eval_expressions(arguments, env)?;
                apply_function(function, args)
            }
        }
    })
}

/// Left to right, stopping at the first failure.
fn eval_expressions(expressions: &[Expression], env: &Env) -> Eval<Vec<Object>> {
    expressions
        .iter()
        .map(|exp| eval_expression(exp, env))
        .collect()
}

fn eval_identifier(name: &str, env: &Env) -> Eval {
    let bound = env.borrow().get(name);
    bound
        .or_else(|| builtins::lookup(name))
        .ok_or_else(|| EvalError::UnknownIdentifier(name.to_string()).into())
}

fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &Env) -> Eval {
    let mut evaluated = FxHashMap::default();
    for (key_exp, value_exp) in pairs {
        let key = eval_expression(key_exp, env)?;
        let hash_key = key
            .hash_key()
            .ok_or_else(|| EvalError::UnusableHashKey(key.r#type()))?;
        let value = eval_expression(value_exp, env)?;
        evaluated.insert(hash_key, HashPair { key, value });
    }
    Ok(Object::Hash {
        pairs: Rc::new(evaluated),
    })
}

fn eval_prefix_expression(operator: PrefixOperator, right: Object) -> Result<Object, EvalError> {
    match operator {
        PrefixOperator::BANG => Ok(Object::boolean(!right.is_truthy())),
        PrefixOperator::MINUS => match right {
            Object::Integer { value } => Ok(Object::integer(value.wrapping_neg())),
            other => Err(EvalError::UnknownPrefixOperator {
                operator: operator.to_string(),
                right: other.r#type(),
            }),
        },
    }
}

fn eval_infix_expression(
    operator: InfixOperator,
    left: Object,
    right: Object,
) -> Result<Object, EvalError> {
    match (&left, &right) {
        (Object::Integer { value: l }, Object::Integer { value: r }) => {
            eval_integer_infix_expression(operator, *l, *r)
        }
        (Object::String { value: l }, Object::String { value: r }) => {
            eval_string_infix_expression(operator, l, r)
        }
        (Object::String { value: s }, Object::Integer { value: n })
        | (Object::Integer { value: n }, Object::String { value: s })
            if operator == InfixOperator::ASTERISK =>
        {
            Ok(Object::string(repeat(s, *n)?))
        }
        _ => match operator {
            InfixOperator::EQ => Ok(Object::boolean(left == right)),
            InfixOperator::NEQ => Ok(Object::boolean(left != right)),
            _ if left.r#type() != right.r#type() => Err(EvalError::TypeMismatch {
                left: left.r#type(),
                operator: operator.to_string(),
                right: right.r#type(),
            }),
            _ => Err(unknown_infix_operator(operator, &left, &right)),
        },
    }
}

fn unknown_infix_operator(operator: InfixOperator, left: &Object, right: &Object) -> EvalError {
    EvalError::UnknownInfixOperator {
        left: left.r#type(),
        operator: operator.to_string(),
        right: right.r#type(),
    }
}

fn eval_integer_infix_expression(
    operator: InfixOperator,
    left: i64,
    right: i64,
) -> Result<Object, EvalError> {
    use InfixOperator::*;
    let result = match operator {
        PLUS => Object::integer(left.wrapping_add(right)),
        MINUS => Object::integer(left.wrapping_sub(right)),
        ASTERISK => Object::integer(left.wrapping_mul(right)),
        SLASH => {
            if right == 0 {
                return Err(EvalError::DivisionByZero);
            }
            Object::integer(left.wrapping_div(right))
        }
        LT => Object::boolean(left < right),
        GT => Object::boolean(left > right),
        EQ => Object::boolean(left == right),
        NEQ => Object::boolean(left != right),
    };
    Ok(result)
}

fn eval_string_infix_expression(
    operator: InfixOperator,
    left: &str,
    right: &str,
) -> Result<Object, EvalError> {
    match operator {
        InfixOperator::PLUS => Ok(Object::string(format!("{}{}", left, right))),
        InfixOperator::EQ => Ok(Object::boolean(left == right)),
        InfixOperator::NEQ => Ok(Object::boolean(left != right)),
        _ => Err(unknown_infix_operator(
            operator,
            &Object::string(left),
            &Object::string(right),
        )),
    }
}

/// Upper bound in bytes on a string built by repetition.
const MAX_REPEAT_LEN: usize = 1 << 30;

/// A count of zero or less gives the empty string.
fn repeat(s: &str, count: i64) -> Result<String, EvalError> {
    let n = match usize::try_from(count) {
        Ok(n) if !s.is_empty() => n,
        _ => return Ok(String::new()),
    };
    match s.len().checked_mul(n) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(s.repeat(n)),
        _ => Err(EvalError::StringTooLarge {
            len: s.len(),
            count,
        }),
    }
}

fn eval_index_expression(left: Object, index: Object) -> Result<Object, EvalError> {
    match (&left, &index) {
        (Object::Array { elements }, Object::Integer { value }) => Ok(usize::try_from(*value)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(Object::Nil)),
        (Object::Hash { pairs }, _) => {
            let key = index
                .hash_key()
                .ok_or_else(|| EvalError::UnusableHashKey(index.r#type()))?;
            Ok(pairs
                .get(&key)
                .map_or(Object::Nil, |pair| pair.value.clone()))
        }
        _ => Err(EvalError::IndexNotSupported {
            left: left.r#type(),
            index: index.r#type(),
        }),
    }
}

fn apply_function(function: Object, args: Vec<Object>) -> Eval {
    match function {
        Object::Function(function) => {
            if args.len() != function.parameters.len() {
                return Err(EvalError::WrongArgumentCount {
                    got: args.len(),
                    want: function.parameters.len(),
                }
                .into());
            }
            trace!(parameters = ?function.parameters, "calling function");
            let mut scope = Environment::new_enclosed(Rc::clone(&function.env));
            for (param, arg) in function.parameters.iter().zip(args) {
                scope.set(param, arg);
            }
            match eval_statements(&function.body.statements, &scope.into_env()) {
                Err(Signal::Return(value)) => Ok(value),
                other => other,
            }
        }
        Object::Builtin(builtin) => {
            trace!(name = builtin.name, "calling builtin");
            Ok((builtin.func)(&args)?)
        }
        other => Err(EvalError::NotAFunction(other.r#type()).into()),
    }
}
