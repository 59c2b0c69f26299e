use crate::ast::BlockStatement;
use crate::environment::Env;
use crate::error::EvalError;
use rustc_hash::FxHashMap;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

pub type BuiltinFunction = fn(&[Object]) -> Result<Object, EvalError>;

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Integer { value: i64 },
    Boolean { value: bool },
    Nil,
    String { value: String },
    Array { elements: Rc<Vec<Object>> },
    Hash { pairs: Rc<FxHashMap<HashKey, HashPair>> },
    Function(Rc<Function>),
    Builtin(Builtin),
    Error { message: String },
}

impl Object {
    pub fn r#type(&self) -> &'static str {
        use Object::*;
        match self {
            Integer { .. } => "INTEGER",
            Boolean { .. } => "BOOLEAN",
            Nil => "NIL",
            String { .. } => "STRING",
            Array { .. } => "ARRAY",
            Hash { .. } => "HASH",
            Function(_) => "FUNCTION",
            Builtin(_) => "BUILTIN",
            Error { .. } => "ERROR",
        }
    }

    /// `nil`, `false` and `0` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(
            self,
            Object::Nil | Object::Boolean { value: false } | Object::Integer { value: 0 }
        )
    }

    /// `None` for values that cannot be used as hash keys.
    pub fn hash_key(&self) -> Option<HashKey> {
        let key = match self {
            Object::Integer { value } => HashKey {
                kind: HashKind::Integer,
                value: *value as u64,
            },
            Object::Boolean { value } => HashKey {
                kind: HashKind::Boolean,
                value: *value as u64,
            },
            Object::String { value } => HashKey {
                kind: HashKind::String,
                value: fnv1a(value.as_bytes()),
            },
            _ => return None,
        };
        Some(key)
    }

    pub fn integer(value: i64) -> Self {
        Object::Integer { value }
    }

    pub fn boolean(value: bool) -> Self {
        Object::Boolean { value }
    }

    pub fn array(elements: Vec<Object>) -> Self {
        Object::Array {
            elements: Rc::new(elements),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Object::String {
            value: value.into(),
        }
    }
}

/// 64-bit FNV-1a offset basis.
const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
/// 64-bit FNV-1a prime.
const FNV_PRIME: u64 = 1_099_511_628_211;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashKind {
    Integer,
    Boolean,
    String,
}

/// Keys of different kinds never compare equal, whatever their bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashKey {
    pub kind: HashKind,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

pub struct Function {
    pub parameters: Vec<String>,
    pub body: Rc<BlockStatement>,
    pub env: Env,
}

impl Function {
    pub fn new(parameters: Vec<String>, body: Rc<BlockStatement>, env: Env) -> Self {
        Self {
            parameters,
            body,
            env,
        }
    }
}

// identity: two function values are equal only if they are the same closure
impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

// the captured environment may contain this very function
impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish()
    }
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFunction,
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Object::*;
        match self {
            Integer { value } => write!(f, "{}", value),
            Boolean { value } => write!(f, "{}", value),
            Nil => write!(f, "nil"),
            String { value } => write!(f, "\"{}\"", value),
            Array { elements } => {
                write!(f, "[")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                write!(f, "]")
            }
            Hash { pairs } => {
                let mut sorted: Vec<_> = pairs.iter().collect();
                sorted.sort_by_key(|(key, _)| **key);
                write!(f, "{{")?;
                for (i, (_, pair)) in sorted.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                write!(f, "}}")
            }
            Function(function) => {
                write!(f, "fn({}) {{ {} }}", function.parameters.join(", "), function.body)
            }
            Builtin(builtin) => write!(f, "builtin function {}", builtin.name),
            Error { message } => write!(f, "ERROR {}", message),
        }
    }
}
