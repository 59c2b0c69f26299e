use thiserror::Error;

/// Runtime failures. Once raised, an error unwinds the whole evaluation; the
/// language has no way to catch one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("identifier not found: {0}")]
    UnknownIdentifier(String),
    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: &'static str,
        operator: String,
        right: &'static str,
    },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        operator: String,
        right: &'static str,
    },
    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator {
        operator: String,
        right: &'static str,
    },
    #[error("division by zero: it is impossible to divide by zero")]
    DivisionByZero,
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("wrong number of arguments. got={got}, want={want}")]
    WrongArgumentCount { got: usize, want: usize },
    #[error("{0}")]
    UnsupportedArgument(String),
    #[error("unusable as hash key: {0}")]
    UnusableHashKey(&'static str),
    #[error("string too large: {len} bytes repeated {count} times")]
    StringTooLarge { len: usize, count: i64 },
    #[error("index operator not supported: {left}[{index}]")]
    IndexNotSupported {
        left: &'static str,
        index: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use crate::error::EvalError;

    #[test]
    fn test_messages() {
        let tests = vec![
            (
                EvalError::TypeMismatch {
                    left: "INTEGER",
                    operator: "+".to_string(),
                    right: "BOOLEAN",
                },
                "type mismatch: INTEGER + BOOLEAN",
            ),
            (
                EvalError::UnknownPrefixOperator {
                    operator: "-".to_string(),
                    right: "BOOLEAN",
                },
                "unknown operator: -BOOLEAN",
            ),
            (
                EvalError::WrongArgumentCount { got: 2, want: 1 },
                "wrong number of arguments. got=2, want=1",
            ),
            (EvalError::UnusableHashKey("FUNCTION"), "unusable as hash key: FUNCTION"),
            (
                EvalError::StringTooLarge { len: 2, count: 3 },
                "string too large: 2 bytes repeated 3 times",
            ),
        ];
        for (err, expected) in tests {
            assert_eq!(err.to_string(), expected);
        }
    }
}
