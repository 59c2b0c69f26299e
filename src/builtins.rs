use crate::error::EvalError;
use crate::object::{Builtin, BuiltinFunction, Object};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

static BUILTINS: Lazy<FxHashMap<&'static str, Builtin>> = Lazy::new(|| {
    let table: [(&'static str, BuiltinFunction); 7] = [
        ("len", len),
        ("first", first),
        ("last", last),
        ("head", head),
        ("tail", tail),
        ("push", push),
        ("puts", puts),
    ];
    table
        .iter()
        .map(|&(name, func)| (name, Builtin { name, func }))
        .collect()
});

pub fn lookup(name: &str) -> Option<Object> {
    BUILTINS.get(name).map(|&builtin| Object::Builtin(builtin))
}

fn check_arity(args: &[Object], want: usize) -> Result<(), EvalError> {
    if args.len() != want {
        return Err(EvalError::WrongArgumentCount {
            got: args.len(),
            want,
        });
    }
    Ok(())
}

fn invalid_argument(arg: &Object, name: &str, expected: &str) -> EvalError {
    EvalError::UnsupportedArgument(format!(
        "invalid argument {} to '{}', must be {}",
        arg.r#type(),
        name,
        expected
    ))
}

fn len(args: &[Object]) -> Result<Object, EvalError> {
    check_arity(args, 1)?;
    let n = match &args[0] {
        Object::String { value } => value.chars().count(),
        Object::Array { elements } => elements.len(),
        other => {
            return Err(EvalError::UnsupportedArgument(format!(
                "argument to `len` not supported, got {}",
                other.r#type()
            )))
        }
    };
    Ok(Object::integer(n as i64))
}

fn first(args: &[Object]) -> Result<Object, EvalError> {
    check_arity(args, 1)?;
    match &args[0] {
        Object::Array { elements } => Ok(elements.first().cloned().unwrap_or(Object::Nil)),
        Object::String { value } => Ok(value
            .chars()
            .next()
            .map_or(Object::Nil, |c| Object::string(c))),
        other => Err(invalid_argument(other, "first", "ARRAY or STRING")),
    }
}

fn last(args: &[Object]) -> Result<Object, EvalError> {
    check_arity(args, 1)?;
    match &args[0] {
        Object::Array { elements } => Ok(elements.last().cloned().unwrap_or(Object::Nil)),
        Object::String { value } => Ok(value
            .chars()
            .last()
            .map_or(Object::Nil, |c| Object::string(c))),
        other => Err(invalid_argument(other, "last", "ARRAY or STRING")),
    }
}

/// All but the last element.
fn head(args: &[Object]) -> Result<Object, EvalError> {
    check_arity(args, 1)?;
    match &args[0] {
        Object::Array { elements } => Ok(match elements.split_last() {
            Some((_, rest)) => Object::array(rest.to_vec()),
            None => Object::Nil,
        }),
        other => Err(invalid_argument(other, "head", "ARRAY")),
    }
}

/// All but the first element.
fn tail(args: &[Object]) -> Result<Object, EvalError> {
    check_arity(args, 1)?;
    match &args[0] {
        Object::Array { elements } => Ok(match elements.split_first() {
            Some((_, rest)) => Object::array(rest.to_vec()),
            None => Object::Nil,
        }),
        other => Err(invalid_argument(other, "tail", "ARRAY")),
    }
}

fn push(args: &[Object]) -> Result<Object, EvalError> {
    check_arity(args, 2)?;
    match &args[0] {
        Object::Array { elements } => {
            let mut new_elements = Vec::with_capacity(elements.len() + 1);
            new_elements.extend(elements.iter().cloned());
            new_elements.push(args[1].clone());
            Ok(Object::array(new_elements))
        }
        other => Err(invalid_argument(other, "push", "ARRAY")),
    }
}

fn puts(args: &[Object]) -> Result<Object, EvalError> {
    for arg in args {
        println!("{}", arg);
    }
    Ok(Object::Nil)
}

#[cfg(test)]
mod tests {
    use crate::builtins::lookup;
    use crate::error::EvalError;
    use crate::object::Object;
    use pretty_assertions::assert_eq;

    fn call(name: &str, args: Vec<Object>) -> Result<Object, EvalError> {
        match lookup(name) {
            Some(Object::Builtin(builtin)) => (builtin.func)(&args),
            other => panic!("{} is not a builtin: {:?}", name, other),
        }
    }

    #[test]
    fn test_lookup() {
        for name in &["len", "first", "last", "head", "tail", "push", "puts"] {
            assert!(lookup(name).is_some(), "{}", name);
        }
        assert_eq!(lookup("map"), None);
    }

    #[test]
    fn test_push_leaves_original_untouched() {
        let original = Object::array(vec![Object::integer(1)]);
        let pushed = call("push", vec![original.clone(), Object::integer(2)]).unwrap();
        assert_eq!(original.to_string(), "[1]");
        assert_eq!(pushed.to_string(), "[1, 2]");
    }

    #[test]
    fn test_string_first_last() {
        assert_eq!(
            call("first", vec![Object::string("foobar")]),
            Ok(Object::string("f"))
        );
        assert_eq!(call("last", vec![Object::string("gap")]), Ok(Object::string("p")));
        assert_eq!(call("first", vec![Object::string("")]), Ok(Object::Nil));
        assert_eq!(call("first", vec![Object::string("été")]), Ok(Object::string("é")));
        assert_eq!(call("len", vec![Object::string("héllo")]), Ok(Object::integer(5)));
    }

    #[test]
    fn test_argument_errors() {
        assert_eq!(
            call("len", vec![Object::integer(1)]).unwrap_err().to_string(),
            "argument to `len` not supported, got INTEGER"
        );
        assert_eq!(
            call("len", vec![Object::string("one"), Object::string("two")])
                .unwrap_err()
                .to_string(),
            "wrong number of arguments. got=2, want=1"
        );
        assert_eq!(
            call("tail", vec![Object::integer(1)]).unwrap_err().to_string(),
            "invalid argument INTEGER to 'tail', must be ARRAY"
        );
        assert_eq!(
            call("push", vec![Object::Nil]).unwrap_err(),
            EvalError::WrongArgumentCount { got: 1, want: 2 }
        );
    }

    #[test]
    fn test_puts_returns_nil() {
        assert_eq!(call("puts", vec![Object::string("hi")]), Ok(Object::Nil));
    }
}
